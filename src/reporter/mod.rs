// Copyright (c) 2025  Brendan Molloy <brendan@bbqsrc.net>,
//                     Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                     Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tools for outputting [`Outcome`]s of a run.

pub mod basic;
pub mod json;
#[cfg(feature = "output-junit")]
pub mod junit;
pub mod summarize;
pub mod tap;
pub mod tee;

use sealed::sealed;

use crate::outcome::Outcome;

#[cfg(feature = "output-junit")]
#[doc(inline)]
pub use self::junit::JUnit;
#[doc(inline)]
pub use self::{
    basic::{Basic, Verbosity},
    json::Json,
    summarize::{RunSummary, Stats, Summarize},
    tap::Tap,
    tee::Tee,
};

/// Consumer of a stream of [`Outcome`] records.
///
/// The [`Runner`] produces [`Outcome`]s in scheduling order and forwards each
/// one exactly once, so a [`Reporter`] can aggregate counts without
/// deduplication.
///
/// [`Runner`]: crate::Runner
pub trait Reporter {
    /// Consumes the [`Outcome`] of one test case.
    fn report(&mut self, outcome: &Outcome);

    /// Finalizes the output once all scheduled test cases have been reported.
    fn finish(&mut self, summary: &RunSummary) {
        let _ = summary;
    }
}

/// Extension of a [`Reporter`] allowing its summarization and fan-out.
#[sealed]
pub trait Ext: Sized {
    /// Wraps this [`Reporter`] to count outcomes per [`Status`] along the
    /// way.
    ///
    /// [`Status`]: crate::Status
    #[must_use]
    fn summarized(self) -> Summarize<Self>;

    /// Wraps this [`Reporter`] to pass every [`Outcome`] to the `other` one
    /// as well.
    #[must_use]
    fn tee<R: Reporter>(self, other: R) -> Tee<Self, R>;
}

#[sealed]
impl<T: Reporter> Ext for T {
    fn summarized(self) -> Summarize<Self> {
        Summarize::new(self)
    }

    fn tee<R: Reporter>(self, other: R) -> Tee<Self, R> {
        Tee::new(self, other)
    }
}

// Copyright (c) 2025  Brendan Molloy <brendan@bbqsrc.net>,
//                     Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                     Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Passing [`Outcome`]s to multiple [`Reporter`]s simultaneously.
//!
//! [`Outcome`]: crate::Outcome

use crate::{
    outcome::Outcome,
    reporter::{Reporter, RunSummary},
};

/// Wrapper for passing every [`Outcome`] to two [`Reporter`]s, e.g. a console
/// one and a JUnit XML one.
#[derive(Clone, Debug)]
pub struct Tee<L, R> {
    /// Left [`Reporter`].
    left: L,

    /// Right [`Reporter`].
    right: R,
}

impl<L, R> Tee<L, R> {
    /// Creates a new [`Tee`] [`Reporter`] passing [`Outcome`]s both to the
    /// `left` and `right` [`Reporter`]s.
    #[must_use]
    pub const fn new(left: L, right: R) -> Self {
        Self { left, right }
    }

    /// Unwraps this [`Tee`] into the underlying [`Reporter`]s.
    pub fn into_parts(self) -> (L, R) {
        (self.left, self.right)
    }
}

impl<L: Reporter, R: Reporter> Reporter for Tee<L, R> {
    fn report(&mut self, outcome: &Outcome) {
        self.left.report(outcome);
        self.right.report(outcome);
    }

    fn finish(&mut self, summary: &RunSummary) {
        self.left.finish(summary);
        self.right.finish(summary);
    }
}

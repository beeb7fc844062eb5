// Copyright (c) 2025  Brendan Molloy <brendan@bbqsrc.net>,
//                     Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                     Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [TAP (Test Anything Protocol)][1] [`Reporter`] implementation.
//!
//! [1]: https://testanything.org

use std::io;

use crate::{
    outcome::{Outcome, Status},
    reporter::{Reporter, RunSummary},
};

/// [TAP][1] [`Reporter`] implementation outputting to an [`io::Write`]
/// implementor.
///
/// Emits the plan line (`1..N`) at the end of the output, once the number of
/// scheduled test cases is known.
///
/// [1]: https://testanything.org
#[derive(Debug)]
pub struct Tap<Out: io::Write> {
    /// [`io::Write`] implementor to output into.
    output: Out,

    /// Number of [`Outcome`]s emitted so far.
    emitted: usize,
}

impl<Out: io::Write> Tap<Out> {
    /// Creates a new [`Tap`] [`Reporter`] outputting into the given `output`.
    #[must_use]
    pub const fn new(output: Out) -> Self {
        Self { output, emitted: 0 }
    }

    /// Unwraps the underlying `output`.
    pub fn into_inner(self) -> Out {
        self.output
    }

    /// Writes the line(s) of a single [`Outcome`].
    fn write_outcome(&mut self, outcome: &Outcome) -> io::Result<()> {
        if self.emitted == 0 {
            writeln!(self.output, "TAP version 14")?;
        }
        self.emitted += 1;
        let n = self.emitted;
        let id = &outcome.test_id;

        match outcome.status {
            Status::Passed => writeln!(self.output, "ok {n} - {id}"),
            Status::Skipped => {
                let reason = outcome.failure.as_deref().unwrap_or("skipped");
                writeln!(self.output, "ok {n} - {id} # SKIP {reason}")
            }
            Status::Incomplete => {
                let reason = outcome.failure.as_deref().unwrap_or("incomplete");
                writeln!(self.output, "not ok {n} - {id} # TODO {reason}")
            }
            Status::Failed | Status::Errored => {
                writeln!(self.output, "not ok {n} - {id}")?;
                for (i, step) in outcome.steps.iter().enumerate() {
                    let mark = if outcome.failing_step == Some(i) {
                        "✘"
                    } else {
                        "✔"
                    };
                    writeln!(self.output, "# {mark} I {step}")?;
                }
                if let Some(failure) = &outcome.failure {
                    for line in failure.lines() {
                        writeln!(self.output, "# {line}")?;
                    }
                }
                Ok(())
            }
        }
    }
}

impl<Out: io::Write> Reporter for Tap<Out> {
    fn report(&mut self, outcome: &Outcome) {
        self.write_outcome(outcome)
            .unwrap_or_else(|e| panic!("failed to write TAP output: {e}"));
    }

    fn finish(&mut self, _summary: &RunSummary) {
        writeln!(self.output, "1..{}", self.emitted)
            .unwrap_or_else(|e| panic!("failed to write TAP output: {e}"));
    }
}

// Copyright (c) 2025  Brendan Molloy <brendan@bbqsrc.net>,
//                     Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                     Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Default console [`Reporter`] implementation.

use std::{io, time::Duration};

use console::style;
use smart_default::SmartDefault;

use crate::{
    outcome::{Outcome, Status},
    reporter::{Reporter, RunSummary},
};

/// Verbosity of a [`Basic`] [`Reporter`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, SmartDefault)]
pub enum Verbosity {
    /// Step log is printed for failing test cases only.
    #[default]
    Default,

    /// Step log is printed for every test case.
    AllSteps,
}

impl Verbosity {
    /// Indicates whether the step log of a passing test case should be
    /// printed.
    #[must_use]
    const fn shows_all_steps(self) -> bool {
        matches!(self, Self::AllSteps)
    }
}

/// Default [`Reporter`] printing to an [`io::Write`] implementor, usually the
/// terminal.
#[derive(Debug)]
pub struct Basic<Out: io::Write = io::Stdout> {
    /// [`io::Write`] implementor to print into.
    output: Out,

    /// [`Verbosity`] of this [`Reporter`].
    verbosity: Verbosity,
}

impl Basic {
    /// Creates a new [`Basic`] [`Reporter`] printing to [`io::Stdout`].
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout(), Verbosity::default())
    }
}

impl<Out: io::Write> Basic<Out> {
    /// Creates a new [`Basic`] [`Reporter`] printing to the given `output`.
    #[must_use]
    pub const fn new(output: Out, verbosity: Verbosity) -> Self {
        Self { output, verbosity }
    }

    /// Unwraps the underlying `output`.
    pub fn into_inner(self) -> Out {
        self.output
    }

    /// Prints the headline of the given [`Outcome`].
    fn write_headline(&mut self, outcome: &Outcome) -> io::Result<()> {
        let mark = match outcome.status {
            Status::Passed => style("✔").green(),
            Status::Failed => style("✘").red(),
            Status::Errored => style("✘").red().bold(),
            Status::Skipped => style("-").cyan(),
            Status::Incomplete => style("?").yellow(),
        };
        writeln!(
            self.output,
            "{mark} {} ({})",
            outcome.test_id,
            format_elapsed(outcome.elapsed),
        )
    }

    /// Prints the step log of the given [`Outcome`], marking the failing
    /// [`Step`].
    ///
    /// [`Step`]: crate::Step
    fn write_steps(&mut self, outcome: &Outcome) -> io::Result<()> {
        for (i, step) in outcome.steps.iter().enumerate() {
            if outcome.failing_step == Some(i) {
                writeln!(self.output, "  {} I {step}", style("✘").red())?;
            } else {
                writeln!(self.output, "  {} I {step}", style("✔").green())?;
            }
        }
        Ok(())
    }

    /// Prints the whole record of the given [`Outcome`].
    fn write_outcome(&mut self, outcome: &Outcome) -> io::Result<()> {
        self.write_headline(outcome)?;
        if self.verbosity.shows_all_steps() || outcome.status.is_failure() {
            self.write_steps(outcome)?;
        }
        if let Some(failure) = &outcome.failure {
            for line in failure.lines() {
                writeln!(self.output, "  {}", style(line).red())?;
            }
        }
        Ok(())
    }
}

impl<Out: io::Write> Reporter for Basic<Out> {
    fn report(&mut self, outcome: &Outcome) {
        self.write_outcome(outcome)
            .unwrap_or_else(|e| panic!("failed to write output: {e}"));
    }

    fn finish(&mut self, summary: &RunSummary) {
        let stats = summary.stats;
        let verdict = if stats.has_failures() {
            style("FAIL").red().bold()
        } else {
            style("OK").green().bold()
        };
        writeln!(
            self.output,
            "\n{verdict} {} tests ({} passed, {} failed, {} errored, \
             {} skipped, {} incomplete) in {}",
            stats.total(),
            stats.passed,
            stats.failed,
            stats.errored,
            stats.skipped,
            stats.incomplete,
            format_elapsed(summary.elapsed),
        )
        .unwrap_or_else(|e| panic!("failed to write output: {e}"));
    }
}

/// Renders the given [`Duration`] with millisecond precision.
fn format_elapsed(elapsed: Duration) -> String {
    let truncated = Duration::from_millis(
        u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
    );
    humantime::format_duration(truncated).to_string()
}

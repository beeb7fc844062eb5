// Copyright (c) 2025  Brendan Molloy <brendan@bbqsrc.net>,
//                     Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                     Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Execution statistics and the [`Summarize`] wrapper [`Reporter`].

use std::time::Duration;

use serde::Serialize;

use crate::{
    outcome::{Outcome, Status},
    reporter::Reporter,
};

/// Per-[`Status`] counts of reported [`Outcome`]s.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Stats {
    /// Number of [`Status::Passed`] test cases.
    pub passed: usize,

    /// Number of [`Status::Failed`] test cases.
    pub failed: usize,

    /// Number of [`Status::Errored`] test cases.
    pub errored: usize,

    /// Number of [`Status::Skipped`] test cases.
    pub skipped: usize,

    /// Number of [`Status::Incomplete`] test cases.
    pub incomplete: usize,
}

impl Stats {
    /// Creates a new [`Stats`] with all counts at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { passed: 0, failed: 0, errored: 0, skipped: 0, incomplete: 0 }
    }

    /// Counts the given [`Status`] in.
    pub fn record(&mut self, status: Status) {
        match status {
            Status::Passed => self.passed += 1,
            Status::Failed => self.failed += 1,
            Status::Errored => self.errored += 1,
            Status::Skipped => self.skipped += 1,
            Status::Incomplete => self.incomplete += 1,
        }
    }

    /// Total number of reported test cases.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed + self.failed + self.errored + self.skipped + self.incomplete
    }

    /// Indicates whether any test case failed or errored.
    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.failed > 0 || self.errored > 0
    }

    /// Indicates whether nothing has been counted yet.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Aggregated result of a whole run.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct RunSummary {
    /// Per-[`Status`] counts.
    pub stats: Stats,

    /// Wall time of the whole run.
    pub elapsed: Duration,
}

/// Wrapper around a [`Reporter`] counting outcomes per [`Status`] along the
/// way, for inspection after the run.
#[derive(Clone, Debug)]
pub struct Summarize<R> {
    /// Original [`Reporter`] to summarize the output of.
    inner: R,

    /// Accumulated [`Stats`].
    stats: Stats,
}

impl<R> Summarize<R> {
    /// Wraps the given [`Reporter`] into a [`Summarize`]d version.
    #[must_use]
    pub const fn new(inner: R) -> Self {
        Self { inner, stats: Stats::new() }
    }

    /// [`Stats`] accumulated so far.
    #[must_use]
    pub const fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Unwraps the original [`Reporter`].
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Reporter> Reporter for Summarize<R> {
    fn report(&mut self, outcome: &Outcome) {
        self.stats.record(outcome.status);
        self.inner.report(outcome);
    }

    fn finish(&mut self, summary: &RunSummary) {
        self.inner.finish(summary);
    }
}

// Copyright (c) 2025  Brendan Molloy <brendan@bbqsrc.net>,
//                     Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                     Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`Outcome`]: the final structured result of running one test case.

use std::{collections::BTreeMap, time::Duration};

use derive_more::Display;
use serde::Serialize;

/// Terminal status of a test [`Case`].
///
/// [`Case`]: crate::Case
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// All [`Scenario`] steps executed without failure or error.
    ///
    /// [`Scenario`]: crate::Scenario
    #[display("passed")]
    Passed,

    /// An assertion condition turned out to be `false`.
    #[display("failed")]
    Failed,

    /// An unexpected fault occurred: an unresolved action, a driver transport
    /// fault, a hook failure or a panic.
    #[display("errored")]
    Errored,

    /// Excluded by filters or explicitly skipped; never executed.
    #[display("skipped")]
    Skipped,

    /// Marked as not implemented yet; never executed.
    #[display("incomplete")]
    Incomplete,
}

impl Status {
    /// Indicates whether this [`Status`] represents a failed or errored run.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Failed | Self::Errored)
    }
}

/// Final structured result of running one test [`Case`].
///
/// Produced exactly once per test case by the [`Runner`], regardless of how
/// many retries occurred, and consumed by the configured [`Reporter`]s in
/// scheduling order.
///
/// [`Case`]: crate::Case
/// [`Reporter`]: crate::Reporter
/// [`Runner`]: crate::Runner
#[derive(Clone, Debug, Serialize)]
pub struct Outcome {
    /// Identifier of the test [`Case`].
    ///
    /// [`Case`]: crate::Case
    pub test_id: String,

    /// Terminal [`Status`].
    pub status: Status,

    /// Time the test case took, including all retries.
    pub elapsed: Duration,

    /// Human-readable message: the failure for [`Status::Failed`] and
    /// [`Status::Errored`], the reason for [`Status::Skipped`] and
    /// [`Status::Incomplete`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,

    /// 0-based index of the first [`Step`] whose action did not complete
    /// successfully. [`None`] when the failure did not come from a recorded
    /// [`Step`], e.g. a failure returned by the test body itself.
    ///
    /// [`Scenario`]: crate::Scenario
    /// [`Step`]: crate::Step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failing_step: Option<usize>,

    /// Renderings of every attempted [`Step`], in invocation order.
    ///
    /// [`Step`]: crate::Step
    pub steps: Vec<String>,

    /// Report fields of the test [`Case`], taken verbatim.
    ///
    /// [`Case`]: crate::Case
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub report_fields: BTreeMap<String, String>,
}

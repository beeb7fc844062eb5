// Copyright (c) 2025  Brendan Molloy <brendan@bbqsrc.net>,
//                     Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                     Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [JUnit XML report][1] [`Reporter`] implementation.
//!
//! [1]: https://llg.cubic.org/docs/junit

use std::{fmt::Write as _, io, mem};

use junit_report::{Duration, Report, TestCase, TestCaseBuilder, TestSuiteBuilder};

use crate::{
    outcome::{Outcome, Status},
    reporter::{Reporter, RunSummary},
};

/// Report field carrying the JUnit `classname` attribute of a `<testcase>`.
const CLASSNAME_FIELD: &str = "classname";

/// [JUnit XML report][1] [`Reporter`] implementation outputting XML into an
/// [`io::Write`] implementor once the run finishes.
///
/// The `classname` report field maps onto the `<testcase>` attribute of the
/// same name; remaining report fields and the step log land in the test
/// case's `<system-out>` verbatim.
///
/// [1]: https://llg.cubic.org/docs/junit
#[derive(Debug)]
pub struct JUnit<Out: io::Write> {
    /// [`io::Write`] implementor to output the XML report into.
    output: Out,

    /// Name of the produced JUnit `<testsuite>`.
    suite_name: String,

    /// Test cases accumulated so far.
    cases: Vec<TestCase>,
}

impl<Out: io::Write> JUnit<Out> {
    /// Creates a new [`JUnit`] [`Reporter`] outputting the XML report into
    /// the given `output`, under a single `<testsuite>` with the given name.
    #[must_use]
    pub fn new(output: Out, suite_name: impl Into<String>) -> Self {
        Self { output, suite_name: suite_name.into(), cases: Vec::new() }
    }

    /// Forms a [`TestCase`] out of the given [`Outcome`].
    fn build_case(outcome: &Outcome) -> TestCase {
        let duration =
            Duration::try_from(outcome.elapsed).unwrap_or(Duration::ZERO);
        let message = outcome.failure.as_deref().unwrap_or_default();

        let mut builder = match outcome.status {
            Status::Passed => {
                TestCaseBuilder::success(&outcome.test_id, duration)
            }
            Status::Failed => TestCaseBuilder::failure(
                &outcome.test_id,
                duration,
                "assertion",
                message,
            ),
            Status::Errored => TestCaseBuilder::error(
                &outcome.test_id,
                duration,
                "error",
                message,
            ),
            Status::Skipped | Status::Incomplete => {
                TestCaseBuilder::skipped(&outcome.test_id)
            }
        };

        if let Some(classname) = outcome.report_fields.get(CLASSNAME_FIELD) {
            _ = builder.set_classname(classname);
        }
        let system_out = Self::render_system_out(outcome);
        if !system_out.is_empty() {
            _ = builder.set_system_out(&system_out);
        }
        builder.build()
    }

    /// Renders the step log and the remaining report fields of the given
    /// [`Outcome`] for `<system-out>`.
    fn render_system_out(outcome: &Outcome) -> String {
        let mut out = String::new();
        for (name, value) in &outcome.report_fields {
            if name != CLASSNAME_FIELD {
                _ = writeln!(out, "{name}={value}");
            }
        }
        for (i, step) in outcome.steps.iter().enumerate() {
            let mark =
                if outcome.failing_step == Some(i) { "✘" } else { "✔" };
            _ = writeln!(out, "{mark} I {step}");
        }
        out
    }
}

impl<Out: io::Write> Reporter for JUnit<Out> {
    fn report(&mut self, outcome: &Outcome) {
        self.cases.push(Self::build_case(outcome));
    }

    fn finish(&mut self, _summary: &RunSummary) {
        let mut suite = TestSuiteBuilder::new(&self.suite_name).build();
        for case in mem::take(&mut self.cases) {
            suite.add_testcase(case);
        }
        let mut report = Report::new();
        report.add_testsuite(suite);
        report
            .write_xml(&mut self.output)
            .unwrap_or_else(|e| panic!("failed to write JUnit XML report: {e}"));
    }
}

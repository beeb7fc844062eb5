// Copyright (c) 2025  Brendan Molloy <brendan@bbqsrc.net>,
//                     Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                     Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Newline-delimited JSON [`Reporter`] implementation.

use std::io;

use crate::{
    outcome::Outcome,
    reporter::{Reporter, RunSummary},
};

/// [`Reporter`] outputting one JSON object per [`Outcome`], newline-delimited,
/// followed by a closing summary object.
#[derive(Debug)]
pub struct Json<Out: io::Write> {
    /// [`io::Write`] implementor to output into.
    output: Out,
}

impl<Out: io::Write> Json<Out> {
    /// Creates a new [`Json`] [`Reporter`] outputting into the given
    /// `output`.
    #[must_use]
    pub const fn new(output: Out) -> Self {
        Self { output }
    }

    /// Unwraps the underlying `output`.
    pub fn into_inner(self) -> Out {
        self.output
    }
}

impl<Out: io::Write> Reporter for Json<Out> {
    fn report(&mut self, outcome: &Outcome) {
        serde_json::to_writer(&mut self.output, outcome)
            .unwrap_or_else(|e| panic!("failed to write JSON output: {e}"));
        writeln!(self.output)
            .unwrap_or_else(|e| panic!("failed to write JSON output: {e}"));
    }

    fn finish(&mut self, summary: &RunSummary) {
        serde_json::to_writer(
            &mut self.output,
            &serde_json::json!({ "summary": summary }),
        )
        .unwrap_or_else(|e| panic!("failed to write JSON output: {e}"));
        writeln!(self.output)
            .unwrap_or_else(|e| panic!("failed to write JSON output: {e}"));
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeMap, time::Duration};

    use super::*;
    use crate::{
        outcome::Status,
        reporter::Stats,
    };

    #[test]
    fn emits_one_parseable_line_per_outcome() {
        let mut reporter = Json::new(Vec::new());
        reporter.report(&Outcome {
            test_id: "login".into(),
            status: Status::Failed,
            elapsed: Duration::from_millis(7),
            failure: Some("nope".into()),
            failing_step: Some(0),
            steps: vec!["see \"Welcome\"".into()],
            report_fields: BTreeMap::from([("classname".into(), "Auth".into())]),
        });
        let mut stats = Stats::new();
        stats.record(Status::Failed);
        reporter.finish(&RunSummary { stats, elapsed: Duration::ZERO });

        let out = String::from_utf8(reporter.into_inner()).unwrap();
        let mut lines = out.lines();

        let record: serde_json::Value =
            serde_json::from_str(lines.next().unwrap()).unwrap();
        assert_eq!(record["test_id"], "login");
        assert_eq!(record["status"], "failed");
        assert_eq!(record["failing_step"], 0);
        assert_eq!(record["report_fields"]["classname"], "Auth");

        let summary: serde_json::Value =
            serde_json::from_str(lines.next().unwrap()).unwrap();
        assert_eq!(summary["summary"]["stats"]["failed"], 1);
        assert!(lines.next().is_none());
    }
}

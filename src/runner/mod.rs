// Copyright (c) 2025  Brendan Molloy <brendan@bbqsrc.net>,
//                     Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                     Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`Runner`]: the top-level sequential control loop.
//!
//! Test cases run single-threaded, one to completion (including all retries)
//! before the next begins. Cross-test isolation, not speed, is the core
//! guarantee: parallelism, if ever offered, is an orthogonal worker-pool
//! extension outside this contract.

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    time::Instant,
};

use crate::{
    actor::Actor,
    case::{Body, Case, Kind},
    error::{ActionError, Failure, ModuleConfigError},
    module::ModuleContainer,
    outcome::{Outcome, Status},
    reporter::{Reporter, RunSummary, Stats},
    scenario::Scenario,
};

/// Group and environment filters applied to every scheduled [`Case`].
///
/// A [`Case`] excluded by the active filters yields a [`Status::Skipped`]
/// [`Outcome`] without executing.
#[derive(Clone, Debug, Default)]
pub struct Filter {
    /// Groups to run; empty meaning all.
    groups: Vec<String>,

    /// Groups to exclude, overriding [`Filter::groups`].
    excluded: Vec<String>,

    /// Active environment, if any.
    env: Option<String>,
}

impl Filter {
    /// Creates an empty [`Filter`] allowing every [`Case`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the run to [`Case`]s within the given group.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.push(group.into());
        self
    }

    /// Excludes [`Case`]s within the given group.
    #[must_use]
    pub fn excluding_group(mut self, group: impl Into<String>) -> Self {
        self.excluded.push(group.into());
        self
    }

    /// Sets the active environment.
    ///
    /// [`Case`]s constrained to environments not listing it are skipped;
    /// unconstrained ones always run.
    #[must_use]
    pub fn with_env(mut self, env: impl Into<String>) -> Self {
        self.env = Some(env.into());
        self
    }

    /// Checks whether the given [`Case`] passes this [`Filter`].
    fn allows(&self, case: &Case) -> bool {
        if case.groups().iter().any(|g| self.excluded.contains(g)) {
            return false;
        }
        if !self.groups.is_empty()
            && !case.groups().iter().any(|g| self.groups.contains(g))
        {
            return false;
        }
        if let Some(env) = &self.env {
            if !case.envs().is_empty() && !case.envs().iter().any(|e| e == env) {
                return false;
            }
        }
        true
    }
}

/// Sequential scheduler of test [`Case`]s.
///
/// For each scheduled [`Case`]: applies the [`Filter`], runs `before` hooks,
/// executes the [`Scenario`], runs `after` hooks regardless of the outcome,
/// and produces exactly one [`Outcome`] forwarded to the [`Reporter`] before
/// proceeding. [`Outcome`]s are emitted in scheduling order, however many
/// retries happened inside.
#[derive(Debug)]
pub struct Runner {
    /// Shared [`ModuleContainer`] of the run.
    container: ModuleContainer,

    /// Active group/environment [`Filter`].
    filter: Filter,
}

impl Runner {
    /// Creates a new [`Runner`] on top of the given [`ModuleContainer`].
    #[must_use]
    pub fn new(container: ModuleContainer) -> Self {
        Self { container, filter: Filter::new() }
    }

    /// Replaces the active [`Filter`].
    #[must_use]
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    /// Runs the scheduled `cases` in order, forwarding every [`Outcome`] to
    /// the given [`Reporter`].
    ///
    /// # Errors
    ///
    /// Propagates the [`ModuleConfigError`] of container initialization,
    /// halting the run before any test executes.
    pub fn run<R: Reporter>(
        mut self,
        cases: &[Case],
        reporter: &mut R,
    ) -> Result<RunSummary, ModuleConfigError> {
        self.container.initialize_all()?;

        let started = Instant::now();
        let mut stats = Stats::new();
        for case in cases {
            let outcome = self.run_case(case);
            stats.record(outcome.status);
            reporter.report(&outcome);
        }

        let summary = RunSummary { stats, elapsed: started.elapsed() };
        reporter.finish(&summary);
        tracing::info!(
            total = stats.total(),
            failed = stats.failed,
            errored = stats.errored,
            "run finished",
        );
        Ok(summary)
    }

    /// Produces exactly one [`Outcome`] for the given [`Case`].
    fn run_case(&self, case: &Case) -> Outcome {
        let started = Instant::now();

        if !self.filter.allows(case) {
            return Self::outcome_without_run(
                case,
                Status::Skipped,
                "excluded by active filters".to_owned(),
                started,
            );
        }

        match &case.kind {
            Kind::Skip(reason) => Self::outcome_without_run(
                case,
                Status::Skipped,
                reason.clone(),
                started,
            ),
            Kind::Incomplete(reason) => Self::outcome_without_run(
                case,
                Status::Incomplete,
                reason.clone(),
                started,
            ),
            Kind::Run(body) => self.run_scenario(case, body, started),
        }
    }

    /// Executes the [`Scenario`] of a regular [`Case`] with full lifecycle
    /// hook orchestration.
    fn run_scenario(&self, case: &Case, body: &Body, started: Instant) -> Outcome {
        tracing::debug!(test = case.id(), "starting test case");

        let mut actor =
            Actor::new(&self.container, Scenario::new(case.feature()));

        if let Err(failure) = self.container.run_before_hooks(case) {
            // `after` hooks still run: guaranteed cleanup on every path.
            self.container.run_after_hooks(case);
            return Self::outcome_without_run(
                case,
                Status::Errored,
                format!("before hook failed: {failure}"),
                started,
            );
        }

        let result = panic::catch_unwind(AssertUnwindSafe(|| body(&mut actor)));
        let mut scenario = actor.into_scenario();
        // Terminal at this point only when a recorded step's dispatch failed;
        // a failure returned (or a panic raised) by the body directly leaves
        // the scenario running, with no step to blame.
        let failed_in_step = scenario.state().is_terminal();

        let (status, message) = match result {
            Ok(Ok(())) => {
                scenario.complete();
                (Status::Passed, None)
            }
            Ok(Err(failure)) => {
                if failure.is_assertion() {
                    scenario.fail();
                } else {
                    scenario.error();
                }
                self.container.run_fail_hooks(case, &failure);
                let status = if failure.is_assertion() {
                    Status::Failed
                } else {
                    Status::Errored
                };
                (status, Some(failure.to_string()))
            }
            Err(payload) => {
                scenario.error();
                let failure = Failure::Action(ActionError::Panic {
                    message: panic_message(&*payload),
                });
                self.container.run_fail_hooks(case, &failure);
                (Status::Errored, Some(failure.to_string()))
            }
        };

        self.container.run_after_hooks(case);

        let failing_step = (status.is_failure() && failed_in_step)
            .then(|| scenario.current_index())
            .flatten();
        let failure = message.map(|msg| match failing_step {
            Some(i) => {
                format!("{msg}\n  at step {i}: {}", scenario.steps()[i])
            }
            None => msg,
        });

        tracing::debug!(test = case.id(), status = %status, "finished test case");

        Outcome {
            test_id: case.id().to_owned(),
            status,
            elapsed: started.elapsed(),
            failure,
            failing_step,
            steps: scenario.rendered_steps(),
            report_fields: case.report_fields().clone(),
        }
    }

    /// Builds the [`Outcome`] of a [`Case`] whose [`Scenario`] never ran.
    fn outcome_without_run(
        case: &Case,
        status: Status,
        message: String,
        started: Instant,
    ) -> Outcome {
        Outcome {
            test_id: case.id().to_owned(),
            status,
            elapsed: started.elapsed(),
            failure: Some(message),
            failing_step: None,
            steps: Vec::new(),
            report_fields: case.report_fields().clone(),
        }
    }
}

/// Coerces a panic payload into a readable message.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| payload.downcast_ref::<&str>().map(|s| (*s).to_owned()))
        .unwrap_or_else(|| "(could not resolve panic payload)".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case_with_groups(groups: &[&str], envs: &[&str]) -> Case {
        let mut case = Case::new("c", |_| Ok(()));
        for g in groups {
            case = case.in_group(*g);
        }
        for e in envs {
            case = case.in_env(*e);
        }
        case
    }

    #[test]
    fn empty_filter_allows_everything() {
        let filter = Filter::new();
        assert!(filter.allows(&case_with_groups(&[], &[])));
        assert!(filter.allows(&case_with_groups(&["auth"], &["staging"])));
    }

    #[test]
    fn group_filter_requires_membership() {
        let filter = Filter::new().with_group("smoke");
        assert!(filter.allows(&case_with_groups(&["smoke", "auth"], &[])));
        assert!(!filter.allows(&case_with_groups(&["auth"], &[])));
        assert!(!filter.allows(&case_with_groups(&[], &[])));
    }

    #[test]
    fn exclusion_overrides_inclusion() {
        let filter = Filter::new().with_group("smoke").excluding_group("flaky");
        assert!(!filter.allows(&case_with_groups(&["smoke", "flaky"], &[])));
    }

    #[test]
    fn env_constrained_cases_need_a_matching_env() {
        let filter = Filter::new().with_env("staging");
        assert!(filter.allows(&case_with_groups(&[], &["staging", "dev"])));
        assert!(!filter.allows(&case_with_groups(&[], &["prod"])));
        // Env-agnostic cases always run.
        assert!(filter.allows(&case_with_groups(&[], &[])));
    }

    #[test]
    fn panic_payloads_are_coerced() {
        assert_eq!(panic_message(&"boom".to_owned()), "boom");
        assert_eq!(panic_message(&"boom"), "boom");
        assert_eq!(panic_message(&42_i32), "(could not resolve panic payload)");
    }
}

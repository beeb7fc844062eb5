// Copyright (c) 2025  Brendan Molloy <brendan@bbqsrc.net>,
//                     Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                     Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`Actor`]: the façade test bodies invoke named actions through.

use serde_json::Value;

use crate::{
    error::Failure,
    module::ModuleContainer,
    retry::RetryPolicy,
    scenario::Scenario,
    step::{Arg, Step},
};

/// Façade dispatching named actions to the [`Module`] implementing them,
/// without the caller knowing which one that is.
///
/// Every resolved invocation is recorded as a [`Step`] on the active
/// [`Scenario`], in invocation order, before the underlying action executes,
/// so the step log reflects the attempted order even if the action throws.
///
/// [`Module`]: crate::Module
pub struct Actor<'run> {
    /// Shared [`ModuleContainer`] of the run.
    container: &'run ModuleContainer,

    /// [`Scenario`] of the test case being executed.
    scenario: Scenario,
}

impl<'run> Actor<'run> {
    /// Creates a new [`Actor`] recording onto the given [`Scenario`].
    #[must_use]
    pub(crate) fn new(
        container: &'run ModuleContainer,
        scenario: Scenario,
    ) -> Self {
        Self { container, scenario }
    }

    /// The active [`Scenario`] of this [`Actor`].
    #[must_use]
    pub const fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// Unwraps this [`Actor`] into its [`Scenario`] for outcome extraction.
    pub(crate) fn into_scenario(self) -> Scenario {
        self.scenario
    }

    /// Declares the intent of the active [`Scenario`].
    pub fn want_to(&mut self, intent: impl Into<String>) {
        self.scenario.set_feature(intent);
    }

    /// Dispatches the named action with the given arguments.
    ///
    /// # Errors
    ///
    /// Propagates the [`Failure`] of the resolved action, or of the
    /// resolution itself, terminating the [`Scenario`].
    pub fn perform(
        &mut self,
        action: &str,
        args: Vec<Arg>,
    ) -> Result<Value, Failure> {
        self.dispatch(action, args, None, true)
    }

    /// Dispatches the named action, re-invoking it under the given
    /// [`RetryPolicy`] until it succeeds or a bound is exceeded.
    ///
    /// # Errors
    ///
    /// Propagates the last captured [`Failure`] once the [`RetryPolicy`] is
    /// exhausted.
    pub fn perform_with(
        &mut self,
        action: &str,
        args: Vec<Arg>,
        retry: RetryPolicy,
    ) -> Result<Value, Failure> {
        self.dispatch(action, args, Some(retry), true)
    }

    /// Best-effort variant of [`Actor::perform()`]: absorbs any [`Failure`]
    /// of the underlying action into `false` plus a logged warning, rather
    /// than terminating the [`Scenario`].
    pub fn attempt(&mut self, action: &str, args: Vec<Arg>) -> bool {
        self.dispatch(action, args, None, false).is_ok()
    }

    /// Best-effort variant of [`Actor::perform_with()`]: returns `false` once
    /// the [`RetryPolicy`] bounds are exceeded, rather than propagating.
    pub fn attempt_with(
        &mut self,
        action: &str,
        args: Vec<Arg>,
        retry: RetryPolicy,
    ) -> bool {
        self.dispatch(action, args, Some(retry), false).is_ok()
    }

    /// Records the invocation as a [`Step`] and routes it to the resolved
    /// [`Module`].
    ///
    /// A `fatal` dispatch transitions the [`Scenario`] into a terminal state
    /// on failure; a best-effort one only logs.
    ///
    /// [`Module`]: crate::Module
    fn dispatch(
        &mut self,
        action: &str,
        args: Vec<Arg>,
        retry: Option<RetryPolicy>,
        fatal: bool,
    ) -> Result<Value, Failure> {
        self.scenario.start();

        let step = Step::new(action, args, retry);
        let literals = step.literal_args();
        // Recorded before execution, so the log reflects attempted order.
        _ = self.scenario.begin_step(step);

        let container = self.container;
        let result = match retry {
            Some(policy) => policy.run(|| container.invoke(action, &literals)),
            None => container.invoke(action, &literals),
        };

        match result {
            Ok(value) => Ok(value),
            Err(failure) if fatal => {
                if failure.is_assertion() {
                    self.scenario.fail();
                } else {
                    self.scenario.error();
                }
                Err(failure)
            }
            Err(failure) => {
                tracing::warn!(action, error = %failure, "best-effort action failed");
                Err(failure)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::{ActionError, AssertionError},
        module::{Config, Module},
        scenario::State,
    };

    struct Flaky;

    impl Module for Flaky {
        fn name(&self) -> &'static str {
            "flaky"
        }

        fn actions(&self) -> &'static [&'static str] {
            &["see", "crash"]
        }

        fn perform(
            &mut self,
            action: &str,
            _args: &[Value],
        ) -> Result<Value, Failure> {
            match action {
                "see" => Err(AssertionError::new("not visible").into()),
                "crash" => Err(ActionError::transport(
                    "crash",
                    std::io::Error::new(std::io::ErrorKind::Other, "conn reset"),
                )
                .into()),
                _ => unreachable!("undeclared action"),
            }
        }
    }

    fn container() -> ModuleContainer {
        let mut container = ModuleContainer::new();
        container.register(Box::new(Flaky), Config::new()).unwrap();
        container.initialize_all().unwrap();
        container
    }

    #[test]
    fn step_is_recorded_before_the_action_runs() {
        let container = container();
        let mut actor = Actor::new(&container, Scenario::new("t"));

        let result = actor.perform("see", vec![Arg::new("Welcome")]);

        assert!(result.is_err());
        let scenario = actor.into_scenario();
        assert_eq!(scenario.steps().len(), 1);
        assert_eq!(scenario.current_index(), Some(0));
        assert_eq!(scenario.state(), State::Failed);
    }

    #[test]
    fn unresolved_action_errors_the_scenario() {
        let container = container();
        let mut actor = Actor::new(&container, Scenario::new("t"));

        let err = actor.perform("fly", vec![]).unwrap_err();

        assert!(matches!(
            err,
            Failure::Action(ActionError::Unresolved { .. })
        ));
        assert_eq!(actor.scenario().state(), State::Errored);
    }

    #[test]
    fn transport_fault_errors_the_scenario() {
        let container = container();
        let mut actor = Actor::new(&container, Scenario::new("t"));

        let err = actor.perform("crash", vec![]).unwrap_err();

        assert!(!err.is_assertion());
        assert_eq!(actor.scenario().state(), State::Errored);
    }

    #[test]
    fn attempt_absorbs_the_failure() {
        let container = container();
        let mut actor = Actor::new(&container, Scenario::new("t"));

        assert!(!actor.attempt("see", vec![Arg::new("Welcome")]));

        // The scenario keeps running: best-effort steps are not terminal.
        let scenario = actor.into_scenario();
        assert_eq!(scenario.state(), State::Running);
        assert_eq!(scenario.steps().len(), 1);
    }

    #[test]
    fn attempt_with_retry_still_returns_a_bool() {
        use std::time::Duration;

        let container = container();
        let mut actor = Actor::new(&container, Scenario::new("t"));
        let retry =
            RetryPolicy::attempts(2).with_backoff(Duration::ZERO);

        assert!(!actor.attempt_with("see", vec![], retry));
        assert_eq!(actor.scenario().state(), State::Running);
    }
}

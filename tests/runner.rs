use std::{cell::RefCell, rc::Rc};

use serde_json::Value;
use stagehand::{
    args, config, ActionError, AssertionError, Case, Config, Failure, Filter,
    Module, ModuleConfigError, ModuleContainer, Outcome, Reporter, RetryPolicy,
    Runner, RunSummary, Status,
};

/// Reporter collecting every record for later assertions.
#[derive(Default)]
struct Collect {
    outcomes: Vec<Outcome>,
    finished: bool,
}

impl Reporter for Collect {
    fn report(&mut self, outcome: &Outcome) {
        self.outcomes.push(outcome.clone());
    }

    fn finish(&mut self, _summary: &RunSummary) {
        self.finished = true;
    }
}

/// Log of module lifecycle hook invocations, shared across modules.
type HookLog = Rc<RefCell<Vec<String>>>;

/// Browser-like module with a login form and a page assertion.
#[derive(Default)]
struct Web {
    logged_in: bool,
    see_calls: Rc<RefCell<usize>>,
    hooks: Option<HookLog>,
}

impl Module for Web {
    fn name(&self) -> &'static str {
        "web"
    }

    fn actions(&self) -> &'static [&'static str] {
        &["login", "assertSee", "flakySee"]
    }

    fn before(&mut self, _case: &Case) -> Result<(), Failure> {
        // Reset per-test state to its baseline.
        self.logged_in = false;
        if let Some(hooks) = &self.hooks {
            hooks.borrow_mut().push("web.before".into());
        }
        Ok(())
    }

    fn after(&mut self, _case: &Case) {
        if let Some(hooks) = &self.hooks {
            hooks.borrow_mut().push("web.after".into());
        }
    }

    fn failed(&mut self, _case: &Case, _failure: &Failure) {
        if let Some(hooks) = &self.hooks {
            hooks.borrow_mut().push("web.failed".into());
        }
    }

    fn perform(&mut self, action: &str, args: &[Value]) -> Result<Value, Failure> {
        match action {
            "login" => {
                self.logged_in = true;
                Ok(Value::Bool(true))
            }
            "assertSee" => {
                let text = args[0].as_str().unwrap_or_default();
                let content =
                    if self.logged_in { "Dashboard" } else { "Login form" };
                if content.contains(text) {
                    Ok(Value::Bool(true))
                } else {
                    Err(AssertionError::mismatch(
                        format!("\"{text}\""),
                        format!("\"{content}\""),
                    )
                    .into())
                }
            }
            "flakySee" => {
                let mut calls = self.see_calls.borrow_mut();
                *calls += 1;
                if *calls < 3 {
                    Err(AssertionError::new("not rendered yet").into())
                } else {
                    Ok(Value::Bool(true))
                }
            }
            _ => unreachable!("undeclared action"),
        }
    }
}

/// Database-like module used for hook ordering checks.
struct Db {
    hooks: HookLog,
    fail_before: bool,
}

impl Module for Db {
    fn name(&self) -> &'static str {
        "db"
    }

    fn actions(&self) -> &'static [&'static str] {
        &["seeInDatabase"]
    }

    fn before(&mut self, _case: &Case) -> Result<(), Failure> {
        self.hooks.borrow_mut().push("db.before".into());
        if self.fail_before {
            return Err(Failure::Action(ActionError::transport(
                "db.before",
                std::io::Error::new(std::io::ErrorKind::Other, "no connection"),
            )));
        }
        Ok(())
    }

    fn after(&mut self, _case: &Case) {
        self.hooks.borrow_mut().push("db.after".into());
    }

    fn failed(&mut self, _case: &Case, _failure: &Failure) {
        self.hooks.borrow_mut().push("db.failed".into());
    }

    fn perform(&mut self, _action: &str, _args: &[Value]) -> Result<Value, Failure> {
        Ok(Value::Bool(true))
    }
}

/// Module whose setup hook fails, poisoning the whole run.
struct Broken;

impl Module for Broken {
    fn name(&self) -> &'static str {
        "broken"
    }

    fn actions(&self) -> &'static [&'static str] {
        &["noop"]
    }

    fn initialize(&mut self, _config: &Config) -> Result<(), ModuleConfigError> {
        Err(ModuleConfigError::Setup {
            module: "broken".into(),
            reason: "driver binary not found".into(),
        })
    }

    fn perform(&mut self, _action: &str, _args: &[Value]) -> Result<Value, Failure> {
        Ok(Value::Null)
    }
}

fn web_container() -> ModuleContainer {
    let mut container = ModuleContainer::new();
    container
        .register(Box::new(Web::default()), config! {})
        .unwrap();
    container
}

#[test]
fn failed_assertion_freezes_the_failing_step() {
    let case = Case::new("login_shows_welcome", |i| {
        i.perform("login", vec![
            stagehand::Arg::new("davert"),
            stagehand::Arg::secret("s3cr3t"),
        ])?;
        i.perform("assertSee", args!["Welcome"])?;
        Ok(())
    });

    let mut reporter = Collect::default();
    let summary = Runner::new(web_container())
        .run(&[case], &mut reporter)
        .unwrap();

    assert_eq!(summary.stats.failed, 1);
    let outcome = &reporter.outcomes[0];
    assert_eq!(outcome.status, Status::Failed);
    assert_eq!(outcome.failing_step, Some(1));
    assert_eq!(outcome.steps.len(), 2);

    // The masked password never shows up in the step log.
    assert_eq!(outcome.steps[0], "login \"davert\", ******");
    assert!(!outcome.steps[0].contains("s3cr3t"));

    let failure = outcome.failure.as_deref().unwrap();
    assert!(failure.contains("expected \"Welcome\""));
    assert!(failure.contains("at step 1: assert see \"Welcome\""));
}

#[test]
fn body_level_failure_blames_no_step() {
    let case = Case::new("checks_the_balance", |i| {
        i.perform("login", args!["davert"])?;
        // All recorded steps succeeded; the body asserts on its own.
        Err(Failure::assertion("balance mismatch"))
    });

    let mut reporter = Collect::default();
    let summary = Runner::new(web_container())
        .run(&[case], &mut reporter)
        .unwrap();

    assert_eq!(summary.stats.failed, 1);
    let outcome = &reporter.outcomes[0];
    assert_eq!(outcome.status, Status::Failed);
    assert_eq!(outcome.failing_step, None);
    assert_eq!(outcome.failure.as_deref(), Some("balance mismatch"));
    assert_eq!(outcome.steps, ["login \"davert\""]);
}

#[test]
fn pre_initialized_container_dispatches_normally() {
    let mut container = web_container();
    container.initialize_all().unwrap();

    let case = Case::new("logs_in", |i| {
        i.perform("login", args!["davert"])?;
        Ok(())
    });

    let mut reporter = Collect::default();
    let summary = Runner::new(container).run(&[case], &mut reporter).unwrap();

    assert_eq!(summary.stats.passed, 1);
    assert_eq!(reporter.outcomes[0].status, Status::Passed);
}

#[test]
fn one_outcome_per_case_in_scheduling_order() {
    let cases = vec![
        Case::new("first", |i| {
            i.perform("login", args!["a"])?;
            Ok(())
        }),
        Case::new("second", |i| {
            i.perform("login", args!["b"])?;
            i.perform("assertSee", args!["Welcome"])?;
            Ok(())
        }),
        Case::skipped("third", "flaky on CI"),
    ];

    let mut reporter = Collect::default();
    let summary = Runner::new(web_container())
        .run(&cases, &mut reporter)
        .unwrap();

    let ids = reporter
        .outcomes
        .iter()
        .map(|o| o.test_id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(ids, ["first", "second", "third"]);
    assert_eq!(summary.stats.total(), 3);
    assert_eq!(summary.stats.passed, 1);
    assert_eq!(summary.stats.failed, 1);
    assert_eq!(summary.stats.skipped, 1);
    assert!(reporter.finished);
}

#[test]
fn retry_recovers_a_flaky_step() {
    let calls = Rc::new(RefCell::new(0));
    let mut container = ModuleContainer::new();
    container
        .register(
            Box::new(Web { see_calls: Rc::clone(&calls), ..Web::default() }),
            config! {},
        )
        .unwrap();

    let case = Case::new("eventually_sees", |i| {
        let retry = RetryPolicy::attempts(5)
            .with_backoff(std::time::Duration::ZERO);
        i.perform_with("flakySee", args![], retry)?;
        Ok(())
    });

    let mut reporter = Collect::default();
    let summary =
        Runner::new(container).run(&[case], &mut reporter).unwrap();

    assert_eq!(summary.stats.passed, 1);
    assert_eq!(*calls.borrow(), 3);
    // Retries re-run the action, not the step recording.
    assert_eq!(reporter.outcomes[0].steps, vec!["flaky see"]);
}

#[test]
fn after_hooks_run_even_when_the_scenario_errors() {
    let hooks: HookLog = Rc::default();
    let mut container = ModuleContainer::new();
    container
        .register(
            Box::new(Web { hooks: Some(Rc::clone(&hooks)), ..Web::default() }),
            config! {},
        )
        .unwrap();
    container
        .register(
            Box::new(Db { hooks: Rc::clone(&hooks), fail_before: false }),
            config! {},
        )
        .unwrap();

    let case = Case::new("hits_an_unknown_action", |i| {
        i.perform("teleport", args![])?;
        Ok(())
    });

    let mut reporter = Collect::default();
    let summary =
        Runner::new(container).run(&[case], &mut reporter).unwrap();

    assert_eq!(summary.stats.errored, 1);
    assert_eq!(reporter.outcomes[0].status, Status::Errored);
    assert_eq!(
        *hooks.borrow(),
        [
            // `before`/`failed` in registration order, `after` reversed.
            "web.before",
            "db.before",
            "web.failed",
            "db.failed",
            "db.after",
            "web.after",
        ],
    );
}

#[test]
fn before_hook_failure_errors_the_case_and_unwinds() {
    let hooks: HookLog = Rc::default();
    let mut container = ModuleContainer::new();
    container
        .register(
            Box::new(Web { hooks: Some(Rc::clone(&hooks)), ..Web::default() }),
            config! {},
        )
        .unwrap();
    container
        .register(
            Box::new(Db { hooks: Rc::clone(&hooks), fail_before: true }),
            config! {},
        )
        .unwrap();

    let case = Case::new("never_runs", |i| {
        i.perform("login", args!["davert"])?;
        Ok(())
    });

    let mut reporter = Collect::default();
    let summary =
        Runner::new(container).run(&[case], &mut reporter).unwrap();

    assert_eq!(summary.stats.errored, 1);
    let outcome = &reporter.outcomes[0];
    assert_eq!(outcome.status, Status::Errored);
    // The scenario never started.
    assert!(outcome.steps.is_empty());
    assert!(outcome.failure.as_deref().unwrap().contains("before hook failed"));

    assert_eq!(
        *hooks.borrow(),
        [
            "web.before",
            "db.before",
            // Only the module whose `before` completed gets the fail hook.
            "web.failed",
            "db.after",
            "web.after",
        ],
    );
}

#[test]
fn filters_produce_skipped_outcomes_without_executing() {
    let hooks: HookLog = Rc::default();
    let mut container = ModuleContainer::new();
    container
        .register(
            Box::new(Web { hooks: Some(Rc::clone(&hooks)), ..Web::default() }),
            config! {},
        )
        .unwrap();

    let cases = vec![
        Case::new("smoke_check", |i| {
            i.perform("login", args!["davert"])?;
            Ok(())
        })
        .in_group("smoke"),
        Case::new("nightly_only", |i| {
            i.perform("login", args!["davert"])?;
            Ok(())
        })
        .in_group("nightly"),
        Case::new("staging_only", |_| Ok(())).in_env("staging"),
    ];

    let filter = Filter::new().with_group("smoke").with_env("dev");
    let mut reporter = Collect::default();
    let summary = Runner::new(container)
        .with_filter(filter)
        .run(&cases, &mut reporter)
        .unwrap();

    assert_eq!(summary.stats.passed, 1);
    assert_eq!(summary.stats.skipped, 2);
    assert_eq!(reporter.outcomes[1].status, Status::Skipped);
    assert_eq!(reporter.outcomes[2].status, Status::Skipped);

    // Hooks ran for the single executed case only.
    assert_eq!(*hooks.borrow(), ["web.before", "web.after"]);
}

#[test]
fn panicking_body_is_trapped_as_errored() {
    let case = Case::new("panics", |i| {
        i.perform("login", args!["davert"])?;
        panic!("made a wrong turn");
    });

    let mut reporter = Collect::default();
    let summary = Runner::new(web_container())
        .run(&[case], &mut reporter)
        .unwrap();

    assert_eq!(summary.stats.errored, 1);
    let outcome = &reporter.outcomes[0];
    assert_eq!(outcome.status, Status::Errored);
    assert!(outcome
        .failure
        .as_deref()
        .unwrap()
        .contains("made a wrong turn"));
}

#[test]
fn incomplete_cases_are_reported_without_executing() {
    let case = Case::incomplete("payments_flow", "waiting for the sandbox");

    let mut reporter = Collect::default();
    let summary = Runner::new(web_container())
        .run(&[case], &mut reporter)
        .unwrap();

    assert_eq!(summary.stats.incomplete, 1);
    let outcome = &reporter.outcomes[0];
    assert_eq!(outcome.status, Status::Incomplete);
    assert_eq!(outcome.failure.as_deref(), Some("waiting for the sandbox"));
}

#[test]
fn setup_failure_halts_the_run_before_any_test() {
    let mut container = ModuleContainer::new();
    container.register(Box::new(Broken), config! {}).unwrap();

    let case = Case::new("never_scheduled", |_| Ok(()));
    let mut reporter = Collect::default();
    let err = Runner::new(container)
        .run(&[case], &mut reporter)
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "module `broken` failed to initialize: driver binary not found",
    );
    assert!(reporter.outcomes.is_empty());
    assert!(!reporter.finished);
}

#[test]
fn best_effort_attempt_keeps_the_case_passing() {
    let case = Case::new("best_effort", |i| {
        i.perform("login", args!["davert"])?;
        // Absorbed into `false` instead of failing the case.
        assert!(!i.attempt("assertSee", args!["Welcome"]));
        Ok(())
    });

    let mut reporter = Collect::default();
    let summary = Runner::new(web_container())
        .run(&[case], &mut reporter)
        .unwrap();

    assert_eq!(summary.stats.passed, 1);
    assert_eq!(reporter.outcomes[0].steps.len(), 2);
}

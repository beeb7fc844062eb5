// Copyright (c) 2025  Brendan Molloy <brendan@bbqsrc.net>,
//                     Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                     Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#![cfg_attr(docsrs, feature(doc_cfg))]

//! Scenario-driven test execution framework with pluggable environment
//! modules.
//!
//! Test cases invoke named actions through an [`Actor`] façade without
//! knowing which [`Module`] implements them. Every invocation is recorded as
//! a [`Step`] on the active [`Scenario`] before it executes, steps may be
//! wrapped into a [`RetryPolicy`], and the [`Runner`] turns each test case
//! into exactly one [`Outcome`] forwarded to the configured [`Reporter`]s
//! (console, TAP, JSON, JUnit XML).
//!
//! Execution is single-threaded and sequential: one test case runs to
//! completion, including all of its retries, before the next begins.
//! Cross-test isolation is the core guarantee.
//!
//! # Example
//!
//! ```rust
//! use stagehand::{
//!     args, config,
//!     reporter::{Basic, Ext as _, Verbosity},
//!     serde_json::Value,
//!     Case, Failure, Module, ModuleContainer, Runner,
//! };
//!
//! #[derive(Debug, Default)]
//! struct Terminal {
//!     output: String,
//! }
//!
//! impl Module for Terminal {
//!     fn name(&self) -> &'static str {
//!         "terminal"
//!     }
//!
//!     fn actions(&self) -> &'static [&'static str] {
//!         &["runCommand", "seeOutput"]
//!     }
//!
//!     fn perform(
//!         &mut self,
//!         action: &str,
//!         args: &[Value],
//!     ) -> Result<Value, Failure> {
//!         match action {
//!             "runCommand" => {
//!                 self.output = format!("ran {}", args[0]);
//!                 Ok(Value::Null)
//!             }
//!             "seeOutput" => {
//!                 let expected = args[0].as_str().unwrap_or_default();
//!                 if self.output.contains(expected) {
//!                     Ok(Value::Bool(true))
//!                 } else {
//!                     Err(Failure::assertion(format!(
//!                         "`{expected}` not found in terminal output",
//!                     )))
//!                 }
//!             }
//!             _ => unreachable!("undeclared action"),
//!         }
//!     }
//! }
//!
//! let mut container = ModuleContainer::new();
//! container.register(Box::new(Terminal::default()), config! {})?;
//!
//! let case = Case::new("run_ls", |i| {
//!     i.want_to("run a shell command and check its output");
//!     i.perform("runCommand", args!["ls"])?;
//!     i.perform("seeOutput", args!["ran"])?;
//!     Ok(())
//! });
//!
//! let mut reporter =
//!     Basic::new(Vec::new(), Verbosity::default()).summarized();
//! let summary = Runner::new(container).run(&[case], &mut reporter)?;
//!
//! assert_eq!(summary.stats.passed, 1);
//! assert!(!summary.stats.has_failures());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod actor;
pub mod case;
pub mod error;
mod macros;
pub mod module;
pub mod outcome;
pub mod reporter;
pub mod retry;
pub mod runner;
pub mod scenario;
pub mod step;

// Re-exported for the `args!` and `config!` macros, and as the dynamic value
// type of action dispatch.
pub use serde_json;

#[doc(inline)]
pub use self::{
    actor::Actor,
    case::Case,
    error::{ActionError, AssertionError, Failure, ModuleConfigError},
    module::{Config, Module, ModuleContainer, Resolution},
    outcome::{Outcome, Status},
    reporter::{Reporter, RunSummary, Stats},
    retry::RetryPolicy,
    runner::{Filter, Runner},
    scenario::{Scenario, State},
    step::{Arg, Step},
};

// Copyright (c) 2025  Brendan Molloy <brendan@bbqsrc.net>,
//                     Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                     Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error taxonomy of the execution core.
//!
//! Every fault a [`Step`] can raise is either an [`AssertionError`] (an
//! expected-vs-actual mismatch, terminating its [`Scenario`] as
//! [`State::Failed`]) or an [`ActionError`] (dispatch or driver fault,
//! terminating it as [`State::Errored`]). Both are unified under [`Failure`],
//! which is the error type flowing out of [`Module::perform()`] and test-case
//! bodies. [`ModuleConfigError`]s are fatal and surface before any test case
//! executes.
//!
//! [`Module::perform()`]: crate::Module::perform
//! [`Scenario`]: crate::Scenario
//! [`State::Errored`]: crate::scenario::State::Errored
//! [`State::Failed`]: crate::scenario::State::Failed
//! [`Step`]: crate::Step

use derive_more::{Display, Error, From};

/// Fault raised by a single [`Step`]'s underlying action.
///
/// Caught by the [`Scenario`] executor and converted into a terminal
/// [`Scenario`] state, never propagating past the [`Runner`]'s per-test-case
/// boundary.
///
/// [`Runner`]: crate::Runner
/// [`Scenario`]: crate::Scenario
/// [`Step`]: crate::Step
#[derive(Debug, Display, Error, From)]
pub enum Failure {
    /// Assertion condition turned out to be `false`.
    #[display("{_0}")]
    Assertion(AssertionError),

    /// Unexpected fault distinct from an assertion failure.
    #[display("{_0}")]
    Action(ActionError),
}

impl Failure {
    /// Shortcut for constructing an [`AssertionError`] [`Failure`] out of the
    /// given `message`.
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::Assertion(AssertionError::new(message))
    }

    /// Indicates whether this [`Failure`] represents an assertion mismatch,
    /// rather than an execution error.
    #[must_use]
    pub const fn is_assertion(&self) -> bool {
        matches!(self, Self::Assertion(_))
    }
}

/// Expected-vs-actual mismatch reported by an assertion action.
#[derive(Debug, Display, Error)]
#[display("{message}")]
pub struct AssertionError {
    /// Human-readable description of the mismatch.
    pub message: String,

    /// Rendering of the expected value, if one was captured.
    pub expected: Option<String>,

    /// Rendering of the actual value, if one was captured.
    pub actual: Option<String>,
}

impl AssertionError {
    /// Creates a new [`AssertionError`] with the given `message` only.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), expected: None, actual: None }
    }

    /// Creates a new [`AssertionError`] out of the `expected` and `actual`
    /// renderings.
    #[must_use]
    pub fn mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        let (expected, actual) = (expected.into(), actual.into());
        Self {
            message: format!("expected {expected}, got {actual}"),
            expected: Some(expected),
            actual: Some(actual),
        }
    }
}

/// Fault of resolving or executing an action, as opposed to an assertion
/// mismatch.
#[derive(Debug, Display, Error)]
pub enum ActionError {
    /// No registered [`Module`] declares the requested action.
    ///
    /// [`Module`]: crate::Module
    #[display("no registered module implements action `{action}`")]
    Unresolved {
        /// Name of the requested action.
        action: String,
    },

    /// Multiple registered [`Module`]s declare the requested action, while the
    /// [`ModuleContainer`] runs under [`Resolution::Strict`].
    ///
    /// [`Module`]: crate::Module
    /// [`ModuleContainer`]: crate::ModuleContainer
    /// [`Resolution::Strict`]: crate::Resolution::Strict
    #[display(
        "action `{action}` is declared by multiple modules: {}",
        providers.join(", ")
    )]
    Ambiguous {
        /// Name of the requested action.
        action: String,

        /// Names of the [`Module`]s declaring it, in registration order.
        ///
        /// [`Module`]: crate::Module
        providers: Vec<String>,
    },

    /// Driver or transport fault surfaced by the underlying [`Module`].
    ///
    /// [`Module`]: crate::Module
    #[display("action `{action}` raised a transport error: {source}")]
    Transport {
        /// Name of the failed action.
        action: String,

        /// Underlying driver error.
        #[error(not(source))]
        source: anyhow::Error,
    },

    /// Test-case body panicked outside of regular error propagation.
    #[display("test case panicked: {message}")]
    Panic {
        /// Coerced panic payload.
        message: String,
    },
}

impl ActionError {
    /// Wraps the given driver error into an [`ActionError::Transport`] for the
    /// named `action`.
    #[must_use]
    pub fn transport(
        action: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Transport { action: action.into(), source: source.into() }
    }
}

/// Fatal configuration error of a [`Module`].
///
/// Aborts the whole run (or the specific test case's setup) and is never
/// recorded as a per-test failure.
///
/// [`Module`]: crate::Module
#[derive(Debug, Display, Error)]
pub enum ModuleConfigError {
    /// Required configuration option was not provided at registration.
    #[display("module `{module}` is missing required option `{option}`")]
    MissingOption {
        /// Name of the misconfigured [`Module`].
        ///
        /// [`Module`]: crate::Module
        module: String,

        /// Name of the missing option.
        option: String,
    },

    /// Provided configuration option failed the [`Module`]'s own validation.
    ///
    /// [`Module`]: crate::Module
    #[display("module `{module}` option `{option}` is invalid: {reason}")]
    InvalidOption {
        /// Name of the misconfigured [`Module`].
        ///
        /// [`Module`]: crate::Module
        module: String,

        /// Name of the invalid option.
        option: String,

        /// Why the value was rejected.
        reason: String,
    },

    /// [`Module`] with the same identifier is already registered.
    ///
    /// At most one active instance per identifier is allowed within a run.
    ///
    /// [`Module`]: crate::Module
    #[display("module `{module}` is already registered")]
    AlreadyRegistered {
        /// Name of the duplicated [`Module`].
        ///
        /// [`Module`]: crate::Module
        module: String,
    },

    /// [`Module`]'s setup hook failed during
    /// [`ModuleContainer::initialize_all()`].
    ///
    /// [`Module`]: crate::Module
    /// [`ModuleContainer::initialize_all()`]: crate::ModuleContainer::initialize_all
    #[display("module `{module}` failed to initialize: {reason}")]
    Setup {
        /// Name of the failed [`Module`].
        ///
        /// [`Module`]: crate::Module
        module: String,

        /// Why the setup hook failed.
        reason: String,
    },
}

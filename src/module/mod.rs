// Copyright (c) 2025  Brendan Molloy <brendan@bbqsrc.net>,
//                     Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                     Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pluggable environment [`Module`]s and their [`ModuleContainer`].
//!
//! A [`Module`] is the unit behind the [`Actor`]'s dynamic interface: a
//! browser driver, an HTTP client, a database helper. The core depends only
//! on the capability contract declared here, never on a module's internals.
//!
//! [`Actor`]: crate::Actor

pub mod container;

use std::collections::HashMap;

use serde_json::Value;

use crate::{
    case::Case,
    error::{Failure, ModuleConfigError},
};

pub use self::container::{ModuleContainer, Resolution};

/// Configuration of a single [`Module`]: a mapping of option name to value.
///
/// Validated against [`Module::required_options()`] at registration time. A
/// missing required option is a hard [`ModuleConfigError`], not a runtime
/// skip.
pub type Config = HashMap<String, Value>;

/// Pluggable environment module implementing a set of named actions plus
/// lifecycle hooks.
///
/// Module instances are shared read-mostly state across all test cases within
/// a run. Only [`Module::before()`] and [`Module::after()`] may mutate
/// per-test state, and [`Module::before()`] must reset it to a known baseline
/// to avoid cross-test leakage. Execution is sequential, so this discipline
/// is enforced by convention, not by a lock.
pub trait Module {
    /// Unique identifier of this [`Module`] within a [`ModuleContainer`].
    fn name(&self) -> &'static str;

    /// Names of the actions this [`Module`] implements.
    ///
    /// The basis for dispatch resolution: an action is routed to the module
    /// declaring it.
    fn actions(&self) -> &'static [&'static str];

    /// Names of the configuration options this [`Module`] cannot run without.
    fn required_options(&self) -> &'static [&'static str] {
        &[]
    }

    /// Setup hook, invoked once per run by
    /// [`ModuleContainer::initialize_all()`] with the validated [`Config`].
    ///
    /// A failure here aborts the run as a fatal configuration error.
    fn initialize(&mut self, _config: &Config) -> Result<(), ModuleConfigError> {
        Ok(())
    }

    /// Hook invoked before each test [`Case`] this [`Module`] participates
    /// in.
    ///
    /// Resets per-test state to its baseline. A [`Failure`] here aborts the
    /// test case with an [`Status::Errored`] outcome.
    ///
    /// [`Status::Errored`]: crate::Status::Errored
    fn before(&mut self, _case: &Case) -> Result<(), Failure> {
        Ok(())
    }

    /// Hook invoked after each test [`Case`], regardless of its outcome.
    fn after(&mut self, _case: &Case) {}

    /// Hook invoked when a test [`Case`] fails or errors, before
    /// [`Module::after()`].
    fn failed(&mut self, _case: &Case, _failure: &Failure) {}

    /// Performs the given resolved action.
    ///
    /// Receives literal argument values, with any masked renderings already
    /// stripped. Either returns normally or raises a [`Failure`]
    /// distinguishable as an assertion failure vs. a transport error.
    fn perform(&mut self, action: &str, args: &[Value]) -> Result<Value, Failure>;
}

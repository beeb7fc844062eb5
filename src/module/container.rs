// Copyright (c) 2025  Brendan Molloy <brendan@bbqsrc.net>,
//                     Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                     Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`ModuleContainer`]: registry of environment [`Module`]s, capability
//! resolution and lifecycle hook orchestration.

use std::{cell::RefCell, collections::HashMap, fmt};

use linked_hash_map::LinkedHashMap;
use serde_json::Value;

use crate::{
    case::Case,
    error::{ActionError, Failure, ModuleConfigError},
    module::{Config, Module},
};

/// Policy applied when multiple [`Module`]s declare the same action name.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Resolution {
    /// Resolving an action declared by multiple [`Module`]s is a hard
    /// [`ActionError::Ambiguous`].
    #[default]
    Strict,

    /// The first registered provider wins, deterministically.
    FirstRegistered,
}

/// Registered [`Module`] paired with its validated [`Config`].
struct Entry {
    /// The [`Module`] instance, behind interior mutability as it's shared
    /// across all test cases of a sequential run.
    module: RefCell<Box<dyn Module>>,

    /// Validated configuration, handed to [`Module::initialize()`].
    config: Config,
}

/// Registry of environment [`Module`]s.
///
/// Owns module instances, their configuration and the capability registry
/// mapping action names to providers, built once at
/// [`ModuleContainer::initialize_all()`] time rather than via reflection at
/// call time. Torn down after the last dependent test case completes.
pub struct ModuleContainer {
    /// Registered [`Module`]s, in registration order.
    entries: LinkedHashMap<String, Entry>,

    /// Action name to provider names, providers in registration order.
    capabilities: HashMap<String, Vec<String>>,

    /// Ambiguity [`Resolution`] policy.
    resolution: Resolution,

    /// Whether [`ModuleContainer::initialize_all()`] has run.
    initialized: bool,
}

impl ModuleContainer {
    /// Creates an empty [`ModuleContainer`] with the default
    /// [`Resolution::Strict`] policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_resolution(Resolution::default())
    }

    /// Creates an empty [`ModuleContainer`] with the given ambiguity
    /// [`Resolution`] policy.
    #[must_use]
    pub fn with_resolution(resolution: Resolution) -> Self {
        Self {
            entries: LinkedHashMap::new(),
            capabilities: HashMap::new(),
            resolution,
            initialized: false,
        }
    }

    /// Ambiguity [`Resolution`] policy of this [`ModuleContainer`].
    #[must_use]
    pub const fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Names of the registered [`Module`]s, in registration order.
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Registers the given [`Module`] under its declared name, validating
    /// `config` against the module's required options.
    ///
    /// Has no side effect on the module itself until
    /// [`ModuleContainer::initialize_all()`] is called.
    ///
    /// # Errors
    ///
    /// - [`ModuleConfigError::AlreadyRegistered`], if a [`Module`] with the
    ///   same name is registered already.
    /// - [`ModuleConfigError::MissingOption`], if `config` lacks a required
    ///   option.
    pub fn register(
        &mut self,
        module: Box<dyn Module>,
        config: Config,
    ) -> Result<(), ModuleConfigError> {
        let name = module.name().to_owned();
        if self.entries.contains_key(&name) {
            return Err(ModuleConfigError::AlreadyRegistered { module: name });
        }
        for option in module.required_options() {
            if !config.contains_key(*option) {
                return Err(ModuleConfigError::MissingOption {
                    module: name,
                    option: (*option).to_owned(),
                });
            }
        }
        _ = self
            .entries
            .insert(name, Entry { module: RefCell::new(module), config });
        Ok(())
    }

    /// Runs every registered [`Module`]'s setup hook, in registration order,
    /// and builds the capability registry.
    ///
    /// Idempotent: once this [`ModuleContainer`] is initialized, repeated
    /// calls are no-ops, so a pre-initialized container may be handed to a
    /// [`Runner`] as-is.
    ///
    /// # Errors
    ///
    /// Propagates the first [`ModuleConfigError`] raised by a setup hook,
    /// aborting the run as a fatal configuration error (not a per-test
    /// failure).
    ///
    /// [`Runner`]: crate::Runner
    pub fn initialize_all(&mut self) -> Result<(), ModuleConfigError> {
        if self.initialized {
            return Ok(());
        }
        for (name, entry) in &self.entries {
            entry.module.borrow_mut().initialize(&entry.config)?;
            for action in entry.module.borrow().actions() {
                self.capabilities
                    .entry((*action).to_owned())
                    .or_default()
                    .push(name.clone());
            }
        }
        self.initialized = true;
        Ok(())
    }

    /// Resolves the [`Module`] implementing the given action name.
    ///
    /// # Errors
    ///
    /// - [`ActionError::Unresolved`], if no registered [`Module`] declares
    ///   the action.
    /// - [`ActionError::Ambiguous`], if multiple do and this
    ///   [`ModuleContainer`] runs under [`Resolution::Strict`].
    pub fn resolve(&self, action: &str) -> Result<&str, ActionError> {
        let providers = self
            .capabilities
            .get(action)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ActionError::Unresolved { action: action.to_owned() })?;
        match (providers.as_slice(), self.resolution) {
            ([single], _) => Ok(single.as_str()),
            (many, Resolution::FirstRegistered) => Ok(many[0].as_str()),
            (many, Resolution::Strict) => Err(ActionError::Ambiguous {
                action: action.to_owned(),
                providers: many.to_vec(),
            }),
        }
    }

    /// Resolves and performs the given action with the provided literal
    /// `args`.
    pub(crate) fn invoke(
        &self,
        action: &str,
        args: &[Value],
    ) -> Result<Value, Failure> {
        let provider = self.resolve(action).map_err(Failure::Action)?;
        self.entries[provider].module.borrow_mut().perform(action, args)
    }

    /// Runs `before` hooks in registration order.
    ///
    /// # Errors
    ///
    /// Propagates the first hook [`Failure`], after triggering `failed` hooks
    /// for the [`Module`]s whose `before` hook already completed.
    pub(crate) fn run_before_hooks(&self, case: &Case) -> Result<(), Failure> {
        let mut entered = Vec::new();
        for (name, entry) in &self.entries {
            let result = entry.module.borrow_mut().before(case);
            if let Err(failure) = result {
                for done in &entered {
                    self.entries[*done]
                        .module
                        .borrow_mut()
                        .failed(case, &failure);
                }
                return Err(failure);
            }
            entered.push(name.as_str());
        }
        Ok(())
    }

    /// Runs `after` hooks in reverse registration order, unwinding resources
    /// symmetrically to `before`.
    pub(crate) fn run_after_hooks(&self, case: &Case) {
        for (_, entry) in self.entries.iter().rev() {
            entry.module.borrow_mut().after(case);
        }
    }

    /// Runs `failed` hooks in registration order.
    pub(crate) fn run_fail_hooks(&self, case: &Case, failure: &Failure) {
        for (_, entry) in &self.entries {
            entry.module.borrow_mut().failed(case, failure);
        }
    }
}

impl Default for ModuleContainer {
    fn default() -> Self {
        Self::new()
    }
}

// Manual implementation, as `dyn Module` isn't `Debug`.
impl fmt::Debug for ModuleContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleContainer")
            .field("modules", &self.entries.keys().collect::<Vec<_>>())
            .field("resolution", &self.resolution)
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssertionError;

    struct Clicker {
        name: &'static str,
    }

    impl Module for Clicker {
        fn name(&self) -> &'static str {
            self.name
        }

        fn actions(&self) -> &'static [&'static str] {
            &["click"]
        }

        fn perform(
            &mut self,
            _action: &str,
            _args: &[Value],
        ) -> Result<Value, Failure> {
            Ok(Value::from(self.name))
        }
    }

    struct Db;

    impl Module for Db {
        fn name(&self) -> &'static str {
            "db"
        }

        fn actions(&self) -> &'static [&'static str] {
            &["seeInDatabase"]
        }

        fn required_options(&self) -> &'static [&'static str] {
            &["dsn"]
        }

        fn perform(
            &mut self,
            _action: &str,
            _args: &[Value],
        ) -> Result<Value, Failure> {
            Err(AssertionError::new("no such row").into())
        }
    }

    #[test]
    fn missing_required_option_is_a_hard_error() {
        let mut container = ModuleContainer::new();
        let err = container.register(Box::new(Db), Config::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "module `db` is missing required option `dsn`",
        );
    }

    #[test]
    fn one_active_instance_per_identifier() {
        let mut container = ModuleContainer::new();
        container
            .register(Box::new(Clicker { name: "web" }), Config::new())
            .unwrap();
        let err = container
            .register(Box::new(Clicker { name: "web" }), Config::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "module `web` is already registered");
    }

    #[test]
    fn unresolved_action_is_reported() {
        let mut container = ModuleContainer::new();
        container.initialize_all().unwrap();
        let err = container.resolve("click").unwrap_err();
        assert!(matches!(err, ActionError::Unresolved { .. }));
    }

    #[test]
    fn ambiguity_errors_under_strict_resolution() {
        let mut container = ModuleContainer::new();
        container
            .register(Box::new(Clicker { name: "web" }), Config::new())
            .unwrap();
        container
            .register(Box::new(Clicker { name: "phantom" }), Config::new())
            .unwrap();
        container.initialize_all().unwrap();

        let err = container.resolve("click").unwrap_err();
        match err {
            ActionError::Ambiguous { providers, .. } => {
                assert_eq!(providers, vec!["web", "phantom"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn first_registered_provider_wins_when_opted_in() {
        let mut container =
            ModuleContainer::with_resolution(Resolution::FirstRegistered);
        container
            .register(Box::new(Clicker { name: "web" }), Config::new())
            .unwrap();
        container
            .register(Box::new(Clicker { name: "phantom" }), Config::new())
            .unwrap();
        container.initialize_all().unwrap();

        assert_eq!(container.resolve("click").unwrap(), "web");
        let result = container.invoke("click", &[]).unwrap();
        assert_eq!(result, Value::from("web"));
    }

    #[test]
    fn repeated_initialization_does_not_duplicate_providers() {
        let mut container = ModuleContainer::new();
        container
            .register(Box::new(Clicker { name: "web" }), Config::new())
            .unwrap();
        container.initialize_all().unwrap();
        container.initialize_all().unwrap();

        // A single module must not become its own ambiguity.
        assert_eq!(container.resolve("click").unwrap(), "web");
    }

    #[test]
    fn single_provider_resolves_under_either_policy() {
        let mut container = ModuleContainer::new();
        container
            .register(Box::new(Clicker { name: "web" }), Config::new())
            .unwrap();
        container.initialize_all().unwrap();
        assert_eq!(container.resolve("click").unwrap(), "web");
    }
}

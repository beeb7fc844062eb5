// Copyright (c) 2025  Brendan Molloy <brendan@bbqsrc.net>,
//                     Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                     Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Test [`Case`] model: identity, grouping, environments and the executable
//! body.

use std::{collections::BTreeMap, fmt};

use crate::{actor::Actor, error::Failure};

/// Executable body of a scenario-driven test [`Case`].
pub type Body = Box<dyn Fn(&mut Actor<'_>) -> Result<(), Failure>>;

/// What running a [`Case`] amounts to.
pub(crate) enum Kind {
    /// Regular test case executing its body against an [`Actor`].
    Run(Body),

    /// Explicitly skipped test case, never executed.
    Skip(String),

    /// Test case marked as not implemented yet, never executed.
    Incomplete(String),
}

/// Single discovered test case: scenario-driven ("Cest"/"Cept" style) or a
/// classic unit test wrapped into a body.
///
/// Carries the metadata the [`Runner`] filters on (groups, environments) and
/// the report fields flowing verbatim into [`Reporter`]s.
///
/// [`Reporter`]: crate::Reporter
/// [`Runner`]: crate::Runner
pub struct Case {
    /// Unique test identifier.
    id: String,

    /// Feature/intent description, free text.
    feature: String,

    /// Groups this [`Case`] belongs to.
    groups: Vec<String>,

    /// Environments this [`Case`] is constrained to, empty meaning any.
    envs: Vec<String>,

    /// Report fields serialized verbatim by [`Reporter`]s.
    ///
    /// [`Reporter`]: crate::Reporter
    report_fields: BTreeMap<String, String>,

    /// Executable [`Kind`] of this [`Case`].
    pub(crate) kind: Kind,
}

impl Case {
    /// Creates a new test [`Case`] executing the given `body`.
    ///
    /// The feature text defaults to the `id` and may be refined via
    /// [`Case::with_feature()`] or [`Actor::want_to()`] inside the body.
    ///
    /// [`Actor::want_to()`]: crate::Actor::want_to
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        body: impl Fn(&mut Actor<'_>) -> Result<(), Failure> + 'static,
    ) -> Self {
        let id = id.into();
        Self {
            feature: id.clone(),
            id,
            groups: Vec::new(),
            envs: Vec::new(),
            report_fields: BTreeMap::new(),
            kind: Kind::Run(Box::new(body)),
        }
    }

    /// Creates an explicitly skipped test [`Case`].
    ///
    /// Reported as [`Status::Skipped`] without ever executing.
    ///
    /// [`Status::Skipped`]: crate::Status::Skipped
    #[must_use]
    pub fn skipped(id: impl Into<String>, reason: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            feature: id.clone(),
            id,
            groups: Vec::new(),
            envs: Vec::new(),
            report_fields: BTreeMap::new(),
            kind: Kind::Skip(reason.into()),
        }
    }

    /// Creates a test [`Case`] marked as not implemented yet.
    ///
    /// Reported as [`Status::Incomplete`] without ever executing.
    ///
    /// [`Status::Incomplete`]: crate::Status::Incomplete
    #[must_use]
    pub fn incomplete(id: impl Into<String>, reason: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            feature: id.clone(),
            id,
            groups: Vec::new(),
            envs: Vec::new(),
            report_fields: BTreeMap::new(),
            kind: Kind::Incomplete(reason.into()),
        }
    }

    /// Sets the feature/intent description of this [`Case`].
    #[must_use]
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.feature = feature.into();
        self
    }

    /// Adds this [`Case`] to the given group.
    #[must_use]
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.groups.push(group.into());
        self
    }

    /// Constrains this [`Case`] to the given environment.
    #[must_use]
    pub fn in_env(mut self, env: impl Into<String>) -> Self {
        self.envs.push(env.into());
        self
    }

    /// Attaches a report field serialized verbatim by [`Reporter`]s.
    ///
    /// [`Reporter`]: crate::Reporter
    #[must_use]
    pub fn with_report_field(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        _ = self.report_fields.insert(name.into(), value.into());
        self
    }

    /// Unique identifier of this [`Case`].
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Feature/intent description of this [`Case`].
    #[must_use]
    pub fn feature(&self) -> &str {
        &self.feature
    }

    /// Groups this [`Case`] belongs to.
    #[must_use]
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Environments this [`Case`] is constrained to, empty meaning any.
    #[must_use]
    pub fn envs(&self) -> &[String] {
        &self.envs
    }

    /// Report fields of this [`Case`].
    #[must_use]
    pub const fn report_fields(&self) -> &BTreeMap<String, String> {
        &self.report_fields
    }
}

// Manual implementation, as the body isn't `Debug`.
impl fmt::Debug for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Case")
            .field("id", &self.id)
            .field("feature", &self.feature)
            .field("groups", &self.groups)
            .field("envs", &self.envs)
            .field("report_fields", &self.report_fields)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_defaults_to_id() {
        let case = Case::new("login_works", |_| Ok(()));
        assert_eq!(case.id(), "login_works");
        assert_eq!(case.feature(), "login_works");
    }

    #[test]
    fn builder_accumulates_metadata() {
        let case = Case::new("login_works", |_| Ok(()))
            .with_feature("log in as a regular user")
            .in_group("auth")
            .in_group("smoke")
            .in_env("staging")
            .with_report_field("classname", "AuthCest");

        assert_eq!(case.feature(), "log in as a regular user");
        assert_eq!(case.groups(), ["auth", "smoke"]);
        assert_eq!(case.envs(), ["staging"]);
        assert_eq!(
            case.report_fields().get("classname").map(String::as_str),
            Some("AuthCest"),
        );
    }
}

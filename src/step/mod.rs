// Copyright (c) 2025  Brendan Molloy <brendan@bbqsrc.net>,
//                     Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                     Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Definitions of a recorded [`Step`] and its [`Arg`]uments.

pub mod arg;

use std::fmt;

use itertools::Itertools as _;
use serde_json::Value;

use crate::retry::RetryPolicy;

pub use self::arg::Arg;

/// Atomic recorded action invocation of a [`Scenario`].
///
/// Created whenever an [`Actor`] method is invoked, immutable once created,
/// and owned exclusively by the [`Scenario`] that recorded it.
///
/// [`Actor`]: crate::Actor
/// [`Scenario`]: crate::Scenario
#[derive(Clone, Debug)]
pub struct Step {
    /// Name of the dispatched action.
    action: String,

    /// Ordered arguments of the invocation.
    args: Vec<Arg>,

    /// [`RetryPolicy`] attached at authoring time, if any.
    retry: Option<RetryPolicy>,
}

impl Step {
    /// Creates a new recorded [`Step`].
    #[must_use]
    pub(crate) fn new(
        action: impl Into<String>,
        args: Vec<Arg>,
        retry: Option<RetryPolicy>,
    ) -> Self {
        Self { action: action.into(), args, retry }
    }

    /// Name of the dispatched action.
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Ordered arguments of the invocation.
    #[must_use]
    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// [`RetryPolicy`] attached to this [`Step`], if any.
    #[must_use]
    pub const fn retry(&self) -> Option<RetryPolicy> {
        self.retry
    }

    /// Literal argument values handed to the underlying action.
    ///
    /// Masked renderings never leak in here.
    #[must_use]
    pub(crate) fn literal_args(&self) -> Vec<Value> {
        self.args.iter().map(|a| a.value().clone()).collect()
    }
}

impl fmt::Display for Step {
    /// Human-readable rendering of this [`Step`], with masked [`Arg`]uments
    /// substituted by their declared output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", humanize(&self.action))?;
        if !self.args.is_empty() {
            write!(f, " {}", self.args.iter().map(Arg::output).join(", "))?;
        }
        Ok(())
    }
}

/// Turns a camelCase or snake_case action name into spaced lowercase text
/// (`seeInTitle` becomes `see in title`).
fn humanize(action: &str) -> String {
    let mut out = String::with_capacity(action.len() + 4);
    for c in action.chars() {
        if c == '_' {
            out.push(' ');
        } else if c.is_uppercase() {
            if !out.is_empty() && !out.ends_with(' ') {
                out.push(' ');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

// Copyright (c) 2025  Brendan Molloy <brendan@bbqsrc.net>,
//                     Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                     Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`Step`] argument wrappers.
//!
//! An [`Arg`] is either a plain literal value, or a literal paired with a
//! masked rendering substituted into logs and reports. Masking affects
//! display only: the literal value is always the one handed to the resolved
//! [`Module`] action.
//!
//! [`Module`]: crate::Module
//! [`Step`]: crate::Step

use std::fmt;

use serde_json::Value;

/// Substitute rendering of a secret [`Arg`].
const SECRET_OUTPUT: &str = "******";

/// Single argument of a recorded [`Step`].
///
/// [`Step`]: crate::Step
#[derive(Clone, Debug, PartialEq)]
pub struct Arg {
    /// Literal value passed to the underlying action.
    value: Value,

    /// Masked rendering for logs, replacing the literal one.
    output: Option<String>,
}

impl Arg {
    /// Creates a plain [`Arg`] rendering its literal `value`.
    #[must_use]
    pub fn new(value: impl Into<Value>) -> Self {
        Self { value: value.into(), output: None }
    }

    /// Creates an [`Arg`] rendering the given `output` in logs, while passing
    /// the literal `value` to the underlying action.
    #[must_use]
    pub fn masked(value: impl Into<Value>, output: impl Into<String>) -> Self {
        Self { value: value.into(), output: Some(output.into()) }
    }

    /// Creates an [`Arg`] rendering `******` in logs.
    #[must_use]
    pub fn secret(value: impl Into<Value>) -> Self {
        Self::masked(value, SECRET_OUTPUT)
    }

    /// Returns the literal value of this [`Arg`].
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Unwraps this [`Arg`] into its literal value, dropping any masked
    /// rendering.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Returns the rendering of this [`Arg`] for logs and reports.
    ///
    /// Differs from [`Arg::value()`] only for masked arguments.
    #[must_use]
    pub fn output(&self) -> String {
        self.output
            .clone()
            .unwrap_or_else(|| self.value.to_string())
    }

    /// Indicates whether this [`Arg`] renders a masked substitute.
    #[must_use]
    pub const fn is_masked(&self) -> bool {
        self.output.is_some()
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.output())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_arg_renders_literal() {
        let arg = Arg::new("users.csv");
        assert_eq!(arg.output(), "\"users.csv\"");
        assert_eq!(arg.value(), &Value::from("users.csv"));
        assert!(!arg.is_masked());
    }

    #[test]
    fn masking_never_alters_the_literal() {
        let arg = Arg::secret("hunter2");

        assert_eq!(arg.output(), "******");
        assert_eq!(arg.to_string(), "******");
        // The executed value stays untouched.
        assert_eq!(arg.value(), &Value::from("hunter2"));
        assert_eq!(arg.into_value(), Value::from("hunter2"));
    }

    #[test]
    fn custom_mask_is_rendered_verbatim() {
        let arg = Arg::masked(42, "<token>");
        assert_eq!(arg.output(), "<token>");
        assert_eq!(arg.value(), &Value::from(42));
    }
}

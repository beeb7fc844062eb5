// Copyright (c) 2025  Brendan Molloy <brendan@bbqsrc.net>,
//                     Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                     Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Helper macros for authoring test cases and [`Module`] configurations.
//!
//! [`Module`]: crate::Module

/// Builds a [`Vec`] of plain [`Arg`]s out of the given values.
///
/// Use [`Arg::masked()`] or [`Arg::secret()`] directly for arguments whose
/// rendering should differ from the executed literal.
///
/// # Example
///
/// ```rust
/// use stagehand::{args, Arg};
///
/// let plain = args!["login", 42];
/// assert_eq!(plain.len(), 2);
///
/// let mixed = vec![Arg::new("davert"), Arg::secret("s3cr3t")];
/// assert_eq!(mixed[1].output(), "******");
/// ```
///
/// [`Arg`]: crate::Arg
/// [`Arg::masked()`]: crate::Arg::masked
/// [`Arg::secret()`]: crate::Arg::secret
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::step::Arg>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::step::Arg::new($value)),+]
    };
}

/// Builds a [`Config`] out of `option => value` pairs.
///
/// # Example
///
/// ```rust
/// use stagehand::config;
///
/// let config = config! {
///     "url" => "https://localhost:8000",
///     "port" => 8000,
/// };
/// assert_eq!(config["port"], 8000);
/// ```
///
/// [`Config`]: crate::Config
#[macro_export]
macro_rules! config {
    () => {
        $crate::module::Config::new()
    };
    ($($option:expr => $value:expr),+ $(,)?) => {{
        let mut config = $crate::module::Config::new();
        $(
            let _ = config.insert(
                ::std::string::String::from($option),
                $crate::serde_json::Value::from($value),
            );
        )+
        config
    }};
}

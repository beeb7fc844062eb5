// Copyright (c) 2025  Brendan Molloy <brendan@bbqsrc.net>,
//                     Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                     Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Retry logic for a single [`Step`]'s action.
//!
//! [`Step`]: crate::Step

use std::{
    thread,
    time::{Duration, Instant},
};

use crate::error::Failure;

/// Pause between attempts, unless overridden via
/// [`RetryPolicy::with_backoff()`].
const DEFAULT_BACKOFF: Duration = Duration::from_millis(100);

/// Bounded re-invocation of a single [`Step`]'s underlying action.
///
/// A policy is meaningful only with at least one bound set, which every
/// constructor guarantees. With both bounds set, retrying stops at whichever
/// bound is reached first. Elapsed time is measured monotonically from the
/// first attempt, so wall-clock adjustments never skew the duration bound.
///
/// Attached per [`Step`] invocation at authoring time and evaluated fresh on
/// each invocation, without any cross-test state.
///
/// [`Step`]: crate::Step
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, [`None`] meaning unlimited.
    max_attempts: Option<usize>,

    /// Maximum elapsed time across attempts, [`None`] meaning unlimited.
    max_duration: Option<Duration>,

    /// Pause before each re-attempt.
    backoff: Duration,
}

impl RetryPolicy {
    /// Creates a [`RetryPolicy`] bounded by the number of attempts.
    ///
    /// A zero `max` is clamped to one: the action always runs at least once.
    #[must_use]
    pub const fn attempts(max: usize) -> Self {
        Self {
            max_attempts: Some(clamp_attempts(max)),
            max_duration: None,
            backoff: DEFAULT_BACKOFF,
        }
    }

    /// Creates a [`RetryPolicy`] bounded by elapsed time.
    #[must_use]
    pub const fn within(max: Duration) -> Self {
        Self {
            max_attempts: None,
            max_duration: Some(max),
            backoff: DEFAULT_BACKOFF,
        }
    }

    /// Adds an attempt-count bound to this [`RetryPolicy`].
    ///
    /// A zero `max` is clamped to one: the action always runs at least once.
    #[must_use]
    pub const fn with_attempts(mut self, max: usize) -> Self {
        self.max_attempts = Some(clamp_attempts(max));
        self
    }

    /// Adds an elapsed-time bound to this [`RetryPolicy`].
    #[must_use]
    pub const fn with_duration(mut self, max: Duration) -> Self {
        self.max_duration = Some(max);
        self
    }

    /// Overrides the pause between attempts.
    #[must_use]
    pub const fn with_backoff(mut self, pause: Duration) -> Self {
        self.backoff = pause;
        self
    }

    /// Maximum number of attempts, if bounded.
    #[must_use]
    pub const fn max_attempts(&self) -> Option<usize> {
        self.max_attempts
    }

    /// Maximum elapsed time, if bounded.
    #[must_use]
    pub const fn max_duration(&self) -> Option<Duration> {
        self.max_duration
    }

    /// Re-invokes the given `action` until it succeeds or a bound of this
    /// [`RetryPolicy`] is exceeded, then surfaces the last captured
    /// [`Failure`].
    ///
    /// The backoff sleep blocks only the current test's execution thread.
    pub fn run<T>(
        &self,
        mut action: impl FnMut() -> Result<T, Failure>,
    ) -> Result<T, Failure> {
        let started = Instant::now();
        let mut attempts = 0;
        loop {
            attempts += 1;
            match action() {
                Ok(value) => return Ok(value),
                Err(failure) => {
                    if self.exhausted(attempts, started.elapsed()) {
                        return Err(failure);
                    }
                    thread::sleep(self.backoff);
                }
            }
        }
    }

    /// Checks whether any bound is reached, treating an unset bound as
    /// unlimited.
    fn exhausted(&self, attempts: usize, elapsed: Duration) -> bool {
        if let Some(max) = self.max_attempts {
            if attempts >= max {
                return true;
            }
        }
        if let Some(max) = self.max_duration {
            if elapsed >= max {
                return true;
            }
        }
        false
    }
}

/// Clamps an attempt bound to at least one attempt.
const fn clamp_attempts(max: usize) -> usize {
    if max == 0 { 1 } else { max }
}

// Copyright (c) 2025  Brendan Molloy <brendan@bbqsrc.net>,
//                     Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                     Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`Scenario`]: the ordered [`Step`] log of one test case and its execution
//! state machine.

use crate::step::Step;

/// Execution state of a [`Scenario`].
///
/// Transitions: [`Recording`] → [`Running`] → [`Completed`] | [`Failed`] |
/// [`Errored`]. The three right-hand states are terminal.
///
/// [`Completed`]: State::Completed
/// [`Errored`]: State::Errored
/// [`Failed`]: State::Failed
/// [`Recording`]: State::Recording
/// [`Running`]: State::Running
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum State {
    /// [`Step`]s are being appended, none has run yet.
    Recording,

    /// [`Step`]s are executing in order.
    Running,

    /// All [`Step`]s executed without failure or error.
    Completed,

    /// A [`Step`]'s assertion condition turned out to be `false`.
    Failed,

    /// A [`Step`] raised an unexpected fault distinct from an assertion
    /// failure.
    Errored,
}

impl State {
    /// Indicates whether this [`State`] is terminal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Errored)
    }
}

/// Ordered sequence of [`Step`]s bound to one test case.
///
/// The [`Step`] log is append-only during recording. The number of started
/// [`Step`]s strictly increases during execution, so after a terminal
/// transition the last attempted [`Step`]'s index is frozen for reporting.
///
/// Created per test-case run and discarded after the [`Outcome`] is
/// extracted.
///
/// [`Outcome`]: crate::Outcome
#[derive(Debug)]
pub struct Scenario {
    /// Feature/intent description of the owning test case.
    feature: String,

    /// Recorded [`Step`]s, in invocation order.
    steps: Vec<Step>,

    /// Number of [`Step`]s whose execution has started.
    started: usize,

    /// Current execution [`State`].
    state: State,
}

impl Scenario {
    /// Creates a new [`Scenario`] in the [`State::Recording`] state.
    #[must_use]
    pub fn new(feature: impl Into<String>) -> Self {
        Self {
            feature: feature.into(),
            steps: Vec::new(),
            started: 0,
            state: State::Recording,
        }
    }

    /// Feature/intent description of the owning test case.
    #[must_use]
    pub fn feature(&self) -> &str {
        &self.feature
    }

    /// Replaces the feature/intent description.
    pub(crate) fn set_feature(&mut self, feature: impl Into<String>) {
        self.feature = feature.into();
    }

    /// Current execution [`State`].
    #[must_use]
    pub const fn state(&self) -> State {
        self.state
    }

    /// All recorded [`Step`]s, in invocation order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// 0-based index of the last attempted [`Step`], if any has started.
    ///
    /// After [`State::Failed`] or [`State::Errored`], marks the first [`Step`]
    /// whose action did not complete successfully.
    #[must_use]
    pub const fn current_index(&self) -> Option<usize> {
        self.started.checked_sub(1)
    }

    /// [`Step`]s up to and including the last attempted one.
    #[must_use]
    pub fn attempted_steps(&self) -> &[Step] {
        &self.steps[..self.started]
    }

    /// Renders every attempted [`Step`] for reporting.
    #[must_use]
    pub fn rendered_steps(&self) -> Vec<String> {
        self.attempted_steps().iter().map(ToString::to_string).collect()
    }

    /// Performs the [`State::Recording`] → [`State::Running`] transition.
    ///
    /// No-op when already running or terminal.
    pub(crate) fn start(&mut self) {
        if self.state == State::Recording {
            self.state = State::Running;
        }
    }

    /// Appends the given [`Step`] and marks it as started, returning its
    /// 0-based index.
    ///
    /// After a terminal transition the log is frozen: the [`Step`] is
    /// dropped and the frozen index is returned unchanged, so a body that
    /// ignored a terminal [`Failure`] cannot shift the failing step.
    ///
    /// [`Failure`]: crate::error::Failure
    pub(crate) fn begin_step(&mut self, step: Step) -> usize {
        if self.state.is_terminal() {
            return self.started.saturating_sub(1);
        }
        debug_assert_eq!(self.state, State::Running, "step begun out of order");
        self.steps.push(step);
        self.started += 1;
        self.started - 1
    }

    /// Performs the [`State::Running`] → [`State::Failed`] transition,
    /// freezing the current index at the failing [`Step`].
    pub(crate) fn fail(&mut self) {
        if !self.state.is_terminal() {
            self.state = State::Failed;
        }
    }

    /// Performs the [`State::Running`] → [`State::Errored`] transition,
    /// freezing the current index at the faulting [`Step`].
    pub(crate) fn error(&mut self) {
        if !self.state.is_terminal() {
            self.state = State::Errored;
        }
    }

    /// Performs the [`State::Running`] → [`State::Completed`] transition.
    pub(crate) fn complete(&mut self) {
        if !self.state.is_terminal() {
            self.state = State::Completed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::{Arg, Step};

    fn step(action: &str) -> Step {
        Step::new(action, vec![Arg::new("x")], None)
    }

    #[test]
    fn starts_recording_and_transitions_to_running() {
        let mut scenario = Scenario::new("log in");
        assert_eq!(scenario.state(), State::Recording);
        assert_eq!(scenario.current_index(), None);

        scenario.start();
        assert_eq!(scenario.state(), State::Running);
    }

    #[test]
    fn index_tracks_started_steps() {
        let mut scenario = Scenario::new("log in");
        scenario.start();

        assert_eq!(scenario.begin_step(step("amOnPage")), 0);
        assert_eq!(scenario.begin_step(step("click")), 1);
        assert_eq!(scenario.current_index(), Some(1));
        assert_eq!(scenario.attempted_steps().len(), 2);
    }

    #[test]
    fn failure_freezes_index_and_state() {
        let mut scenario = Scenario::new("log in");
        scenario.start();
        scenario.begin_step(step("amOnPage"));
        scenario.begin_step(step("see"));
        scenario.fail();

        assert_eq!(scenario.state(), State::Failed);
        assert_eq!(scenario.current_index(), Some(1));

        // A terminal state sticks, whatever comes afterwards.
        scenario.complete();
        scenario.error();
        assert_eq!(scenario.state(), State::Failed);
    }

    #[test]
    fn terminal_state_freezes_the_step_log() {
        let mut scenario = Scenario::new("log in");
        scenario.start();
        scenario.begin_step(step("amOnPage"));
        scenario.fail();

        // Recording past the terminal state neither grows the log nor moves
        // the frozen index.
        assert_eq!(scenario.begin_step(step("click")), 0);
        assert_eq!(scenario.steps().len(), 1);
        assert_eq!(scenario.current_index(), Some(0));
        assert_eq!(scenario.state(), State::Failed);
    }

    #[test]
    fn completion_covers_all_steps() {
        let mut scenario = Scenario::new("log in");
        scenario.start();
        scenario.begin_step(step("amOnPage"));
        scenario.complete();

        assert_eq!(scenario.state(), State::Completed);
        assert_eq!(scenario.rendered_steps(), vec!["am on page \"x\""]);
    }
}

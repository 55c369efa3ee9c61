//! In-memory injector used by tests in this crate and downstream crates
//! (enabled with the `testing` feature).

use std::time::Duration;

use crate::{KeyError, KeyInjector, SubmitKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Char(char),
    Submit(SubmitKey),
    Pause(Duration),
}

#[derive(Debug, Default)]
pub struct RecordingInjector {
    pub actions: Vec<KeyAction>,
    fail_after: Option<usize>,
    injected: usize,
}

impl RecordingInjector {
    /// Succeeds for the first `n` keystrokes, then fails every later one.
    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::default()
        }
    }

    pub fn typed_count(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, KeyAction::Char(_)))
            .count()
    }

    pub fn submit_count(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, KeyAction::Submit(_)))
            .count()
    }

    pub fn typed_text(&self) -> String {
        self.actions
            .iter()
            .filter_map(|a| match a {
                KeyAction::Char(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    pub fn pauses(&self) -> Vec<Duration> {
        self.actions
            .iter()
            .filter_map(|a| match a {
                KeyAction::Pause(d) => Some(*d),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, action: KeyAction) -> Result<(), KeyError> {
        if self.fail_after.is_some_and(|limit| self.injected >= limit) {
            return Err(KeyError::Inject("simulated injection failure".to_string()));
        }
        self.injected += 1;
        self.actions.push(action);
        Ok(())
    }
}

impl KeyInjector for RecordingInjector {
    fn type_char(&mut self, c: char) -> Result<(), KeyError> {
        self.record(KeyAction::Char(c))
    }

    fn submit(&mut self, key: SubmitKey) -> Result<(), KeyError> {
        self.record(KeyAction::Submit(key))
    }

    fn pause(&mut self, duration: Duration) {
        if !duration.is_zero() {
            self.actions.push(KeyAction::Pause(duration));
        }
    }
}

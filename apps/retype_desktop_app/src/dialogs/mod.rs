//! Modal dialogs used to collect input from the user.
//!
//! Orchestration only sees the [`InputPrompt`] trait; [`TerminalDialog`] is the
//! crossterm implementation used by the binary.

mod form;
mod terminal_dialog;

pub use form::{Closing, Focus, FormEvent, PromptForm};
pub use terminal_dialog::TerminalDialog;

use crate::core::error::PromptError;

pub const NO_VALUE_STATUS: &str = "No Value Submitted";
pub const EXIT_STATUS: &str = "Exiting Application...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub title: String,
    pub message: String,
}

impl PromptRequest {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

pub trait InputPrompt {
    /// Blocks until the user submits or cancels.
    ///
    /// Returns `None` when the dialog was cancelled or submitted empty.
    fn prompt(&mut self, request: &PromptRequest) -> Result<Option<String>, PromptError>;

    /// Blocking message box with a single acknowledge button.
    ///
    /// Returns `false` when the box was dismissed with Esc or Ctrl+C.
    fn acknowledge(&mut self, title: &str, message: &str) -> Result<bool, PromptError>;

    fn notify_error(&mut self, title: &str, message: &str) -> Result<(), PromptError> {
        self.acknowledge(title, message).map(|_| ())
    }
}

mod core;
mod dialogs;

pub use crate::core::app::{App, RunOutcome, Settings};
pub use crate::core::error::AppError;
pub use dialogs::{InputPrompt, PromptRequest, TerminalDialog};

use retype_keys::EnigoInjector;

pub type Result<T> = std::result::Result<T, crate::core::error::AppError>;

pub fn run() -> Result<RunOutcome> {
    let settings = Settings::load()?;
    let dialog = TerminalDialog::new(settings.feedback_delay());

    // Connecting can fail without accessibility access, so the app connects
    // only after it has checked.
    App::new(settings, dialog, EnigoInjector::new).run()
}

mod conversions;

use retype_keys::KeyError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Keyboard error: {0}")]
    Keys(#[from] KeyError),

    #[error("System error: {0}")]
    System(#[from] SystemError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Terminal error: {0}")]
    Terminal(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum InputError {
    #[error("'{value}' is not a valid number of repetitions (gave up after {attempts} attempts)")]
    InvalidCount { value: String, attempts: u32 },
}

#[derive(Error, Debug)]
pub enum SystemError {
    #[error("Permission error: {0}")]
    Permission(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Loading error: {0}")]
    Loading(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

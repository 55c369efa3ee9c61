use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, time::Duration};
use thiserror::Error;

pub mod enigo_injector;
#[cfg(any(test, feature = "testing"))]
pub mod recording;

pub use enigo_injector::EnigoInjector;

pub const DEFAULT_KEYSTROKE_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Failed to initialize keyboard simulator: {0}")]
    Init(String),

    #[error("Failed to inject keystroke: {0}")]
    Inject(String),
}

/// Key action sent after each repetition of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SubmitKey {
    #[default]
    #[serde(rename = "enter")]
    Enter,
    #[serde(rename = "shift+enter")]
    ShiftEnter,
}

impl fmt::Display for SubmitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitKey::Enter => write!(f, "enter"),
            SubmitKey::ShiftEnter => write!(f, "shift+enter"),
        }
    }
}

impl FromStr for SubmitKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enter" | "return" => Ok(SubmitKey::Enter),
            "shift+enter" | "shift+return" => Ok(SubmitKey::ShiftEnter),
            other => Err(format!("Unknown submit key '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepeatJob {
    pub line: String,
    pub times: u32,
    pub inter_delay: Duration,
    pub keystroke_interval: Duration,
    pub submit_key: SubmitKey,
}

impl RepeatJob {
    pub fn new(line: impl Into<String>, times: u32) -> Self {
        Self {
            line: line.into(),
            times,
            inter_delay: Duration::ZERO,
            keystroke_interval: DEFAULT_KEYSTROKE_INTERVAL,
            submit_key: SubmitKey::default(),
        }
    }

    pub fn with_inter_delay(mut self, delay: Duration) -> Self {
        self.inter_delay = delay;
        self
    }

    pub fn with_keystroke_interval(mut self, interval: Duration) -> Self {
        self.keystroke_interval = interval;
        self
    }

    pub fn with_submit_key(mut self, key: SubmitKey) -> Self {
        self.submit_key = key;
        self
    }
}

/// Low-level keystroke sink. Whatever window holds OS focus receives the input.
pub trait KeyInjector {
    fn type_char(&mut self, c: char) -> Result<(), KeyError>;

    fn submit(&mut self, key: SubmitKey) -> Result<(), KeyError>;

    fn pause(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

impl<T: KeyInjector + ?Sized> KeyInjector for &mut T {
    fn type_char(&mut self, c: char) -> Result<(), KeyError> {
        (**self).type_char(c)
    }

    fn submit(&mut self, key: SubmitKey) -> Result<(), KeyError> {
        (**self).submit(key)
    }

    fn pause(&mut self, duration: Duration) {
        (**self).pause(duration)
    }
}

pub struct Repeater<I: KeyInjector> {
    injector: I,
}

impl<I: KeyInjector> Repeater<I> {
    pub fn new(injector: I) -> Self {
        Self { injector }
    }

    /// Types `job.line` followed by the submit key, `job.times` times.
    ///
    /// Returns the number of completed repetitions. The first injection
    /// failure aborts the loop; nothing is retried.
    pub fn repeat(&mut self, job: &RepeatJob) -> Result<u32, KeyError> {
        log::info!(
            "Repeating {} character line {} times ({})",
            job.line.chars().count(),
            job.times,
            job.submit_key
        );

        for iteration in 0..job.times {
            for c in job.line.chars() {
                self.injector.type_char(c)?;
                self.injector.pause(job.keystroke_interval);
            }
            self.injector.submit(job.submit_key)?;
            self.injector.pause(job.inter_delay);

            log::debug!("Completed repetition {}/{}", iteration + 1, job.times);
        }

        log::info!("Finished {} repetitions", job.times);
        Ok(job.times)
    }

    pub fn into_inner(self) -> I {
        self.injector
    }
}

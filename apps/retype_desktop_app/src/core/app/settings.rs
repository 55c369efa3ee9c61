use crate::core::error::ConfigError;
use retype_keys::SubmitKey;
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

const SETTINGS_DIR: &str = "retype";
const SETTINGS_FILE: &str = "settings.json";
const SETTINGS_ENV: &str = "RETYPE_SETTINGS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub title: String,
    pub countdown_secs: f64,
    pub repeat_delay_secs: f64,
    pub keystroke_interval_secs: f64,
    pub feedback_delay_secs: f64,
    pub submit_key: SubmitKey,
    pub max_count_attempts: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: "Line Repeater".to_string(),
            countdown_secs: 7.0,
            repeat_delay_secs: 0.5,
            keystroke_interval_secs: 0.1,
            feedback_delay_secs: 2.0,
            submit_key: SubmitKey::ShiftEnter,
            max_count_attempts: 3,
        }
    }
}

impl Settings {
    /// Reads settings from `$RETYPE_SETTINGS`, falling back to the user config
    /// directory and finally to defaults. Never writes anything back.
    pub fn load() -> Result<Self, ConfigError> {
        if let Some(path) = std::env::var_os(SETTINGS_ENV) {
            return Self::load_from(Path::new(&path));
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Self::load_from(&path),
            _ => {
                log::info!("No settings file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        log::info!("Loading settings from {}", path.display());

        let contents = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::Loading(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| ConfigError::Loading(format!("Failed to parse settings: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(SETTINGS_DIR).join(SETTINGS_FILE))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let durations = [
            ("countdown_secs", self.countdown_secs),
            ("repeat_delay_secs", self.repeat_delay_secs),
            ("keystroke_interval_secs", self.keystroke_interval_secs),
            ("feedback_delay_secs", self.feedback_delay_secs),
        ];

        for (name, value) in durations {
            if Duration::try_from_secs_f64(value).is_err() {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a non-negative number of seconds that fits a duration, got {}",
                    name, value
                )));
            }
        }

        if self.max_count_attempts == 0 {
            return Err(ConfigError::Invalid(
                "max_count_attempts must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn countdown(&self) -> Duration {
        seconds(self.countdown_secs)
    }

    pub fn repeat_delay(&self) -> Duration {
        seconds(self.repeat_delay_secs)
    }

    pub fn keystroke_interval(&self) -> Duration {
        seconds(self.keystroke_interval_secs)
    }

    pub fn feedback_delay(&self) -> Duration {
        seconds(self.feedback_delay_secs)
    }
}

/// Out-of-range values are rejected by `validate`; unvalidated ones saturate
/// instead of collapsing to zero.
fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(if value > 0.0 {
        Duration::MAX
    } else {
        Duration::ZERO
    })
}

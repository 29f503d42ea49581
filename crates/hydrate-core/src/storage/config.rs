//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - Reminder interval and daily glass goal
//! - Hour at which the logical day rolls over
//! - Auto-start after logging water
//! - Sound preferences (stored and echoed; playback is up to the front end)
//! - Whether the inactivity poll is enabled
//!
//! Configuration is stored at `<data dir>/config.toml`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, CoreError, ValidationError};

pub const INTERVAL_RANGE: (u32, u32) = (1, 24 * 60);
pub const GOAL_RANGE: (u32, u32) = (1, 20);
pub const RESET_HOUR_RANGE: (u32, u32) = (0, 23);

/// Alert sound choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SoundType {
    #[default]
    #[serde(rename = "alarm-1")]
    Alarm1,
    #[serde(rename = "alarm-2")]
    Alarm2,
    #[serde(rename = "alarm-3")]
    Alarm3,
    #[serde(rename = "bell")]
    Bell,
    #[serde(rename = "droplet")]
    Droplet,
}

impl SoundType {
    pub const ALL: [SoundType; 5] = [
        SoundType::Alarm1,
        SoundType::Alarm2,
        SoundType::Alarm3,
        SoundType::Bell,
        SoundType::Droplet,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SoundType::Alarm1 => "alarm-1",
            SoundType::Alarm2 => "alarm-2",
            SoundType::Alarm3 => "alarm-3",
            SoundType::Bell => "bell",
            SoundType::Droplet => "droplet",
        }
    }
}

impl fmt::Display for SoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SoundType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SoundType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "sound_type".into(),
                message: format!("unknown sound '{s}'"),
            })
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data dir>/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u32,
    #[serde(default = "default_daily_goal")]
    pub daily_goal: u32,
    #[serde(default = "default_daily_reset_hour")]
    pub daily_reset_hour: u32,
    #[serde(default = "default_true")]
    pub auto_start: bool,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    #[serde(default)]
    pub sound_type: SoundType,
    /// Enables the 60-second inactivity poll. Smart reminders cover the
    /// same ground and stay on regardless.
    #[serde(default)]
    pub inactivity_alerts: bool,
}

fn default_interval_minutes() -> u32 {
    30
}
fn default_daily_goal() -> u32 {
    8
}
fn default_daily_reset_hour() -> u32 {
    5
}
fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval_minutes: default_interval_minutes(),
            daily_goal: default_daily_goal(),
            daily_reset_hour: default_daily_reset_hour(),
            auto_start: true,
            sound_enabled: true,
            sound_type: SoundType::default(),
            inactivity_alerts: false,
        }
    }
}

pub(crate) fn check_range(
    field: &'static str,
    value: u32,
    (min, max): (u32, u32),
) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            min: i64::from(min),
            max: i64::from(max),
            value: i64::from(value),
        });
    }
    Ok(())
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), CoreError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown().into());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                            .into(),
                    ),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown().into())
    }

    /// Location of the config file in the data directory.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data directory, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed or fails
    /// validation, or if the default config cannot be written.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate().map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Check every bounded field.
    ///
    /// # Errors
    /// Returns the first out-of-range field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range("interval_minutes", self.interval_minutes, INTERVAL_RANGE)?;
        check_range("daily_goal", self.daily_goal, GOAL_RANGE)?;
        check_range("daily_reset_hour", self.daily_reset_hour, RESET_HOUR_RANGE)?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key in memory, validating the result.
    /// The caller decides whether and where to save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the resulting config is out of range. `self` is untouched on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Keys accepted by `get`/`set`.
    pub fn keys() -> Vec<String> {
        match serde_json::to_value(Self::default()) {
            Ok(serde_json::Value::Object(map)) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }
}

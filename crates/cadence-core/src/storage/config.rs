//! TOML-based scheduler configuration.
//!
//! Holds the tunable constants of the pattern learner:
//! - Learning threshold for the cold-start gate
//! - Neutral score and awake-hour window for the pattern model
//! - History window (all time or trailing days)
//! - Evidence thresholds for suggestion confidence
//! - Clock-skew tolerance for incoming completions
//!
//! Configuration is stored at `~/.config/cadence/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;

/// Longest trailing window accepted, in days.
pub const MAX_TRAILING_DAYS: u32 = 36_500;

/// Cold-start gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LearningConfig {
    /// Completions needed before rankings and suggestions are served.
    #[serde(default = "default_threshold")]
    pub threshold: u32,
}

/// Which part of the log feeds hour scores.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HistoryWindow {
    AllTime,
    Trailing,
}

/// Pattern model configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatternConfig {
    /// Score reported for hours without samples and used for unrated completions.
    #[serde(default = "default_neutral_score")]
    pub neutral_score: f64,
    /// First hour shown in rankings (inclusive).
    #[serde(default = "default_awake_start")]
    pub awake_start_hour: u8,
    /// Last hour shown in rankings (inclusive).
    #[serde(default = "default_awake_end")]
    pub awake_end_hour: u8,
    #[serde(default = "default_history")]
    pub history: HistoryWindow,
    /// Length of the trailing window when `history = "trailing"`.
    #[serde(default = "default_trailing_days")]
    pub trailing_days: u32,
}

/// Suggestion generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuggestionConfig {
    /// Category completions needed before category-specific hours are used.
    #[serde(default = "default_min_category_samples")]
    pub min_category_samples: u64,
    /// Samples at the chosen hour that count as strong evidence.
    #[serde(default = "default_strong_hour_samples")]
    pub strong_hour_samples: u64,
    /// Category completions that count as strong evidence.
    #[serde(default = "default_strong_category_samples")]
    pub strong_category_samples: u64,
    /// Minute offset applied to the suggested hour.
    #[serde(default)]
    pub default_minute: u8,
}

/// Input validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationConfig {
    #[serde(default = "default_max_future_skew")]
    pub max_future_skew_minutes: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/cadence/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub learning: LearningConfig,
    #[serde(default)]
    pub pattern: PatternConfig,
    #[serde(default)]
    pub suggestions: SuggestionConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

// Default functions
fn default_threshold() -> u32 {
    14
}
fn default_neutral_score() -> f64 {
    0.5
}
fn default_awake_start() -> u8 {
    6
}
fn default_awake_end() -> u8 {
    21
}
fn default_history() -> HistoryWindow {
    HistoryWindow::AllTime
}
fn default_trailing_days() -> u32 {
    90
}
fn default_min_category_samples() -> u64 {
    3
}
fn default_strong_hour_samples() -> u64 {
    5
}
fn default_strong_category_samples() -> u64 {
    5
}
fn default_max_future_skew() -> u32 {
    5
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            neutral_score: default_neutral_score(),
            awake_start_hour: default_awake_start(),
            awake_end_hour: default_awake_end(),
            history: default_history(),
            trailing_days: default_trailing_days(),
        }
    }
}

impl PatternConfig {
    /// Hours exposed by rankings, inclusive on both ends.
    pub fn awake_hours(&self) -> std::ops::RangeInclusive<u8> {
        self.awake_start_hour..=self.awake_end_hour
    }
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            min_category_samples: default_min_category_samples(),
            strong_hour_samples: default_strong_hour_samples(),
            strong_category_samples: default_strong_category_samples(),
            default_minute: 0,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_future_skew_minutes: default_max_future_skew(),
        }
    }
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
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or fails
    /// validation, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load and validate a config file at `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: Config =
            toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
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

    /// Set a config value by key without persisting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed, or
    /// the resulting config fails validation. On error `self` is unchanged.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check cross-field consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| {
            Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: message.to_string(),
            })
        };

        if self.learning.threshold == 0 {
            return invalid("learning.threshold", "must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.pattern.neutral_score) {
            return invalid("pattern.neutral_score", "must be within [0, 1]");
        }
        if self.pattern.awake_end_hour > 23 {
            return invalid("pattern.awake_end_hour", "must be within 0-23");
        }
        if self.pattern.awake_start_hour > self.pattern.awake_end_hour {
            return invalid("pattern.awake_start_hour", "must not be after awake_end_hour");
        }
        if self.pattern.history == HistoryWindow::Trailing && self.pattern.trailing_days == 0 {
            return invalid("pattern.trailing_days", "must be at least 1 for a trailing window");
        }
        if self.pattern.trailing_days > MAX_TRAILING_DAYS {
            return invalid("pattern.trailing_days", "must be at most 36500");
        }
        if self.suggestions.default_minute > 59 {
            return invalid("suggestions.default_minute", "must be within 0-59");
        }
        Ok(())
    }
}

//! TOML-based game-balance configuration.
//!
//! Holds the tunable constants of the engines:
//! - event roll weights and time-of-day windows
//! - chaos quest synthesis (XP seed, multiplier band, credit ratio)
//! - heatmap defaults
//!
//! Configuration is stored at `~/.config/questlog/balance.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, CoreError, Result};
use crate::linker::LinkerConfig;
use crate::unpredictability::UnpredictabilityConfig;

/// Heatmap display defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeatmapConfig {
    #[serde(default = "default_weeks")]
    pub default_weeks: u32,
}

fn default_weeks() -> u32 {
    52
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            default_weeks: default_weeks(),
        }
    }
}

/// Game-balance configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BalanceConfig {
    #[serde(default)]
    pub unpredictability: UnpredictabilityConfig,
    #[serde(default)]
    pub linker: LinkerConfig,
    #[serde(default)]
    pub heatmap: HeatmapConfig,
}

/// Returns `~/.config/questlog[-dev]/` based on QUESTLOG_ENV.
///
/// Set QUESTLOG_ENV=dev to use the development directory.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("QUESTLOG_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("questlog-dev")
    } else {
        base_dir.join("questlog")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DirectoryUnavailable(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

impl BalanceConfig {
    /// Split `section.field`. Every balance key is exactly two levels deep.
    fn split_key(key: &str) -> std::result::Result<(&str, &str), ConfigError> {
        key.split_once('.')
            .filter(|(section, field)| !section.is_empty() && !field.is_empty() && !field.contains('.'))
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))
    }

    fn set_json_field(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> std::result::Result<(), ConfigError> {
        let (section, field) = Self::split_key(key)?;
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let slot = root
            .get_mut(section)
            .and_then(|s| s.get_mut(field))
            .ok_or_else(unknown)?;

        let new_value = match &*slot {
            serde_json::Value::Number(_) => match value.parse::<u64>() {
                Ok(n) => serde_json::Value::Number(n.into()),
                Err(_) => value
                    .parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .map(serde_json::Value::Number)
                    .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?,
            },
            // The seed is the only optional field; it is null until set.
            serde_json::Value::Null if value == "none" => serde_json::Value::Null,
            serde_json::Value::Null => serde_json::Value::Number(
                value
                    .parse::<u64>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as integer")))?
                    .into(),
            ),
            _ => return Err(invalid("cannot set a whole section".to_string())),
        };
        *slot = new_value;
        Ok(())
    }

    /// Default location of the balance file.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("balance.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if !path.exists() {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            tracing::info!(path = %path.display(), "wrote default balance config");
            return Ok(cfg);
        }
        Self::load_from(&path)
    }

    /// Load from `path`. Missing sections and keys take their defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_failed(e.to_string()))?;
        let cfg: BalanceConfig =
            toml::from_str(&content).map_err(|e| load_failed(e.message().to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, falling back to defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default balance config");
            Self::default()
        })
    }

    /// Reject values the engines cannot work with.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let u = &self.unpredictability;
        let weights = [
            ("unpredictability.no_event_weight", u.no_event_weight),
            ("unpredictability.micro_reward_base", u.micro_reward_base),
            ("unpredictability.micro_reward_per_streak_day", u.micro_reward_per_streak_day),
            ("unpredictability.chaos_quest_base", u.chaos_quest_base),
            ("unpredictability.chaos_quest_per_streak_day", u.chaos_quest_per_streak_day),
            ("unpredictability.shadow_warning_base", u.shadow_warning_base),
            ("unpredictability.shadow_warning_per_miss", u.shadow_warning_per_miss),
            ("unpredictability.pattern_break_base", u.pattern_break_base),
            ("unpredictability.pattern_break_urgency_bonus", u.pattern_break_urgency_bonus),
            ("unpredictability.late_night_warning_weight", u.late_night_warning_weight),
            ("unpredictability.late_night_pattern_break_weight", u.late_night_pattern_break_weight),
            ("unpredictability.early_morning_micro_reward_weight", u.early_morning_micro_reward_weight),
            ("unpredictability.early_morning_chaos_quest_weight", u.early_morning_chaos_quest_weight),
            ("linker.xp_seed", self.linker.xp_seed),
            ("linker.credit_ratio", self.linker.credit_ratio),
        ];
        for (key, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("must be a non-negative number, got {value}"),
                });
            }
        }

        if !(0.0..=1.0).contains(&u.time_event_chance) {
            return Err(ConfigError::InvalidValue {
                key: "unpredictability.time_event_chance".to_string(),
                message: format!("must be within 0..=1, got {}", u.time_event_chance),
            });
        }

        for (key, hour) in [
            ("unpredictability.late_night_start_hour", u.late_night_start_hour),
            ("unpredictability.late_night_end_hour", u.late_night_end_hour),
            ("unpredictability.early_morning_start_hour", u.early_morning_start_hour),
            ("unpredictability.early_morning_end_hour", u.early_morning_end_hour),
        ] {
            if hour > 24 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("must be an hour within 0..=24, got {hour}"),
                });
            }
        }

        let l = &self.linker;
        if !(l.min_multiplier.is_finite() && l.max_multiplier.is_finite())
            || l.min_multiplier < 0.0
            || l.min_multiplier > l.max_multiplier
        {
            return Err(ConfigError::InvalidValue {
                key: "linker.min_multiplier".to_string(),
                message: format!(
                    "multiplier band {}..{} is not a valid range",
                    l.min_multiplier, l.max_multiplier
                ),
            });
        }

        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let (section, field) = Self::split_key(key).ok()?;
        let json = serde_json::to_value(self).ok()?;
        json.get(section)?.get(field).map(|v| v.to_string())
    }

    /// Set a value by dot-separated key. Does not save.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_field(&mut json, key, value)?;
        let updated: BalanceConfig = serde_json::from_value(json).map_err(|e| {
            CoreError::Config(ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

//! Configuration file support for Pepdose.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/pepdose/config.toml`.

use crate::schedule::{DEFAULT_GRACE_PERIOD_MINUTES, MAX_GRACE_PERIOD_MINUTES};
use chrono::Duration;
use crate::{Error, MassUnit, Result, ScheduleFrequency, SyringeType};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub calculator: CalculatorConfig,

    #[serde(default)]
    pub schedule: ScheduleConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Calculator defaults used when a flag is omitted
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalculatorConfig {
    #[serde(default)]
    pub default_syringe: SyringeType,

    #[serde(default = "default_dose_unit")]
    pub default_dose_unit: MassUnit,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            default_syringe: SyringeType::default(),
            default_dose_unit: default_dose_unit(),
        }
    }
}

/// Scheduling parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_grace_period_minutes")]
    pub grace_period_minutes: i64,

    #[serde(default)]
    pub default_frequency: ScheduleFrequency,
}

impl ScheduleConfig {
    /// Grace window as a duration; falls back to the default if out of range
    pub fn grace_period(&self) -> Duration {
        let minutes = if (0..=MAX_GRACE_PERIOD_MINUTES).contains(&self.grace_period_minutes) {
            self.grace_period_minutes
        } else {
            DEFAULT_GRACE_PERIOD_MINUTES
        };
        Duration::minutes(minutes)
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            grace_period_minutes: default_grace_period_minutes(),
            default_frequency: ScheduleFrequency::default(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("pepdose")
}

fn default_dose_unit() -> MassUnit {
    MassUnit::Mcg
}

fn default_grace_period_minutes() -> i64 {
    DEFAULT_GRACE_PERIOD_MINUTES
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("pepdose").join("config.toml")
    }

    /// Reject values that parse but make no sense
    pub fn validate(&self) -> Result<()> {
        if self.schedule.grace_period_minutes < 0 {
            return Err(Error::Config(format!(
                "grace_period_minutes must not be negative, got {}",
                self.schedule.grace_period_minutes
            )));
        }
        if self.schedule.grace_period_minutes > MAX_GRACE_PERIOD_MINUTES {
            return Err(Error::Config(format!(
                "grace_period_minutes must be at most {}, got {}",
                MAX_GRACE_PERIOD_MINUTES, self.schedule.grace_period_minutes
            )));
        }
        Ok(())
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

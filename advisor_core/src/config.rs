//! Configuration file support for the advisor.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/advisor/config.toml`.

use crate::ranking::RankingWeights;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub student: StudentConfig,

    #[serde(default)]
    pub ranking: RankingConfig,
}

/// Data file locations
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// JSON course catalog; the built-in catalog when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,

    /// TOML requirement rules; the built-in rules when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements_path: Option<PathBuf>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            catalog_path: None,
            requirements_path: None,
        }
    }
}

/// Student profile used for recommendations
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StudentConfig {
    #[serde(default = "default_major")]
    pub major: String,

    #[serde(default = "default_year")]
    pub year: u32,
}

impl Default for StudentConfig {
    fn default() -> Self {
        Self {
            major: default_major(),
            year: default_year(),
        }
    }
}

/// Recommendation scoring
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RankingConfig {
    #[serde(flatten)]
    pub weights: RankingWeights,

    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            weights: RankingWeights::default(),
            default_limit: default_limit(),
        }
    }
}

// Default value functions
fn home_or_current() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| home_or_current().join(".local/share"));
    base.join("advisor")
}

fn default_major() -> String {
    "Computer Science".into()
}

fn default_year() -> u32 {
    1
}

fn default_limit() -> usize {
    20
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
        if config.student.year == 0 {
            return Err(Error::Config("student.year must be at least 1".into()));
        }
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| home_or_current().join(".config"));
        base.join("advisor").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
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

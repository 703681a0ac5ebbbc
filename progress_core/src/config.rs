//! Configuration file support for the progress tracker.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/progress/config.toml`.
//! It supplies the data directory, the default personal profile and the
//! daily deficit goal; the tracker never writes it.

use crate::{PersonalProfile, Result, DEFICIT_GOAL_RANGE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the record file inside the data directory
pub const RECORD_FILE_NAME: &str = "progress.csv";

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub profile: PersonalProfile,

    #[serde(default)]
    pub goals: GoalsConfig,
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

impl DataConfig {
    /// Path of the record file within `data_dir`
    pub fn record_path(data_dir: &Path) -> PathBuf {
        data_dir.join(RECORD_FILE_NAME)
    }
}

/// Daily goal configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GoalsConfig {
    #[serde(default = "default_deficit_kcal")]
    pub deficit_kcal: f64,
}

impl Default for GoalsConfig {
    fn default() -> Self {
        Self {
            deficit_kcal: default_deficit_kcal(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("progress")
}

fn default_deficit_kcal() -> f64 {
    500.0
}

/// Replace a leading `~` with the user's home directory
fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;
        config.validate()?;
        config.data.data_dir = expand_home(&config.data.data_dir);
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("progress").join("config.toml")
    }

    /// Check the configured profile and goal against the input ranges
    pub fn validate(&self) -> Result<()> {
        self.profile.validate()?;
        DEFICIT_GOAL_RANGE.check(self.goals.deficit_kcal)?;
        Ok(())
    }
}

//! Configuration management using config.toml

use badgewatch_core::{cell_size, BadgewatchError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_PATH: &str = "config.toml";

const DEFAULT_REFRESH_INTERVAL: u64 = 5;
const DEFAULT_ACHIEVEMENTS_PER_ROW: usize = 8;
const DEFAULT_SIZE_MULTIPLE: usize = 1;

const ENV_USERNAME: &str = "RA_USERNAME";
const ENV_API_KEY: &str = "RA_API_KEY";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub connect: ConnectConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectConfig {
    /// RetroAchievements username whose progress is shown
    #[serde(default)]
    pub username: String,

    /// Web API key from the RetroAchievements control panel
    #[serde(default)]
    pub api_key: String,

    /// Seconds between refreshes
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayConfig {
    #[serde(default = "default_achievements_per_row")]
    pub achievements_per_row: usize,

    /// Integer scale applied to every badge cell
    #[serde(default = "default_size_multiple")]
    pub achievement_size_multiple: usize,

    #[serde(default)]
    pub disable_auto_mode: bool,

    #[serde(default)]
    pub hide_mode: bool,

    /// Poll and allow toggling to the Achievement of the Week
    #[serde(default = "default_true")]
    pub show_weekly: bool,
}

fn default_refresh_interval() -> u64 {
    DEFAULT_REFRESH_INTERVAL
}

fn default_achievements_per_row() -> usize {
    DEFAULT_ACHIEVEMENTS_PER_ROW
}

fn default_size_multiple() -> usize {
    DEFAULT_SIZE_MULTIPLE
}

fn default_true() -> bool {
    true
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            api_key: String::new(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            achievements_per_row: DEFAULT_ACHIEVEMENTS_PER_ROW,
            achievement_size_multiple: DEFAULT_SIZE_MULTIPLE,
            disable_auto_mode: false,
            hide_mode: false,
            show_weekly: true,
        }
    }
}

impl DisplayConfig {
    /// Edge length of one badge cell in logical pixels
    pub fn cell_size(&self) -> f32 {
        cell_size(self.achievement_size_multiple)
    }
}

impl Config {
    /// Path from the first command line argument, or config.toml
    pub fn path_from_args() -> PathBuf {
        std::env::args_os()
            .nth(1)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_PATH))
    }

    /// Load config from file. A missing file is created from the defaults so
    /// the user has something to fill in; credentials are checked separately.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Config::default();
            if let Err(e) = config.save(path) {
                tracing::warn!("Could not create {}: {}", path.display(), e);
            } else {
                tracing::info!("Created default config at {}", path.display());
            }
            return Ok(config.normalized());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            BadgewatchError::Config(format!("error reading {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
            .map_err(|e| BadgewatchError::Config(format!("error loading {}: {}", path.display(), e)))
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(content)?;
        Ok(config.normalized())
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Credentials from the environment (or a .env file) take precedence
    pub fn apply_env_overrides(&mut self) {
        if let Ok(username) = std::env::var(ENV_USERNAME) {
            if !username.trim().is_empty() {
                self.connect.username = username;
            }
        }
        if let Ok(api_key) = std::env::var(ENV_API_KEY) {
            if !api_key.trim().is_empty() {
                self.connect.api_key = api_key;
            }
        }
    }

    /// Clamp values into usable ranges and derive hideMode
    pub fn normalized(mut self) -> Self {
        self.connect.username = self.connect.username.trim().to_string();
        self.connect.api_key = self.connect.api_key.trim().to_string();
        self.connect.refresh_interval = self.connect.refresh_interval.max(1);
        self.display.achievements_per_row = self.display.achievements_per_row.max(1);
        self.display.achievement_size_multiple = self.display.achievement_size_multiple.max(1);
        if self.display.disable_auto_mode {
            self.display.hide_mode = true;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.has_credentials() {
            Ok(())
        } else {
            Err(BadgewatchError::MissingCredentials)
        }
    }

    pub fn has_credentials(&self) -> bool {
        !self.connect.username.trim().is_empty() && !self.connect.api_key.trim().is_empty()
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.connect.refresh_interval)
    }

    pub fn auto_mode_enabled(&self) -> bool {
        !self.display.disable_auto_mode
    }
}

//! Application configuration.
//!
//! Read from `config.toml` in the platform config directory, then overridden
//! by `CALENDAR_API_URL`, `CALENDAR_API_TOKEN` and `CALENDAR_SYNC_ENABLED`.
//! Every section is optional; missing keys take their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::interaction::GridGeometry;
use crate::services::slots::TimeGrid;

pub const ENV_API_URL: &str = "CALENDAR_API_URL";
pub const ENV_API_TOKEN: &str = "CALENDAR_API_TOKEN";
pub const ENV_SYNC_ENABLED: &str = "CALENDAR_SYNC_ENABLED";

const CONFIG_FILE_NAME: &str = "config.toml";
const DATABASE_FILE_NAME: &str = "calendar.db";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub grid: GridConfig,
    pub share: ShareConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    /// Id of the signed-in user, for permission checks on shared calendars.
    pub user_id: Option<String>,
    /// When false every request fails immediately and the stores work offline.
    pub sync_enabled: bool,
    pub timeout_secs: u64,
    pub max_retries: usize,
    pub retry_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001/api".to_string(),
            token: None,
            user_id: None,
            sync_enabled: true,
            timeout_secs: 20,
            max_retries: 2,
            retry_delay_ms: 400,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub start_hour: u32,
    pub end_hour: u32,
    pub interval_minutes: u32,
    /// Pixel height of one hour row.
    pub cell_height: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        let grid = TimeGrid::default();
        Self {
            start_hour: grid.start_hour,
            end_hour: grid.end_hour,
            interval_minutes: grid.interval_minutes,
            cell_height: GridGeometry::default().cell_height,
        }
    }
}

impl GridConfig {
    pub fn time_grid(&self) -> TimeGrid {
        TimeGrid {
            start_hour: self.start_hour,
            end_hour: self.end_hour,
            interval_minutes: self.interval_minutes,
        }
    }

    pub fn geometry(&self) -> GridGeometry {
        GridGeometry::new(self.time_grid(), self.cell_height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    /// Page that share links point at.
    pub base_url: String,
    pub expiry_days: u32,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5173/".to_string(),
            expiry_days: 7,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Defaults to `calendar.db` in the platform data directory.
    pub database_path: Option<PathBuf>,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "Ken24T", "CalendarPlanner")
}

impl AppConfig {
    /// `config.toml` inside the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Load from `path` (or the default location), apply environment
    /// overrides and validate. A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).or_else(Self::default_path);

        let mut config = match path {
            Some(ref path) if path.exists() => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                log::info!("Loaded configuration from {}", path.display());
                Self::from_toml_str(&content)
                    .with_context(|| format!("Invalid config file {}", path.display()))?
            }
            _ => {
                log::debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse configuration")
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, self.to_toml_string()?)
            .with_context(|| format!("Failed to write config file {}", path.display()))
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.trim().is_empty() {
                self.api.base_url = url.trim().to_string();
            }
        }

        if let Ok(token) = std::env::var(ENV_API_TOKEN) {
            self.api.token = Some(token).filter(|t| !t.trim().is_empty());
        }

        if let Ok(flag) = std::env::var(ENV_SYNC_ENABLED) {
            self.api.sync_enabled = !matches!(flag.trim().to_ascii_lowercase().as_str(), "false" | "0" | "no");
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.grid
            .time_grid()
            .validate()
            .map_err(|e| anyhow!("Invalid [grid] settings: {}", e))?;

        if !(self.grid.cell_height.is_finite() && self.grid.cell_height > 0.0) {
            return Err(anyhow!("Grid cell height must be a positive number"));
        }

        if self.share.expiry_days == 0 {
            return Err(anyhow!("Share link expiry must be at least one day"));
        }

        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://")) {
            return Err(anyhow!("API base URL must start with http:// or https://"));
        }

        Ok(())
    }

    /// Resolved location of the SQLite database.
    pub fn database_path(&self) -> PathBuf {
        if let Some(ref path) = self.storage.database_path {
            return path.clone();
        }

        match project_dirs() {
            Some(dirs) => dirs.data_dir().join(DATABASE_FILE_NAME),
            None => PathBuf::from(DATABASE_FILE_NAME),
        }
    }
}

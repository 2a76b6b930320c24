use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    icon::DEFAULT_ICON_KEY,
    provider::weatherapi::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT},
    session::{DEFAULT_CITY, DEFAULT_DEBOUNCE, DEFAULT_LOOKUP_AFTER_LEN, SessionSettings},
};

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// api_key = "..."
/// default_city = "Islamabad"
/// debounce_ms = 1200
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// weatherapi.com key.
    pub api_key: Option<String>,

    /// City shown on startup when nothing has been selected yet.
    pub default_city: Option<String>,

    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub debounce_ms: Option<u64>,
}

impl Config {
    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty()).ok_or_else(|| {
            anyhow!(
                "No API key configured for weatherapi.com.\n\
                 Hint: run `skycast configure` and enter your API key."
            )
        })
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Empty input clears the override and restores the built-in default.
    pub fn set_default_city(&mut self, city: &str) {
        let city = city.trim();
        self.default_city = (!city.is_empty()).then(|| city.to_string());
    }

    pub fn default_city(&self) -> &str {
        self.default_city.as_deref().unwrap_or(DEFAULT_CITY)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// A zero timeout would fail every request, so it counts as unset.
    pub fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs.filter(|secs| *secs > 0).unwrap_or(DEFAULT_TIMEOUT.as_secs())
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            default_city: self.default_city().to_string(),
            fallback_icon: DEFAULT_ICON_KEY.to_string(),
            request_timeout: Duration::from_secs(self.request_timeout_secs()),
            debounce: self.debounce_ms.map(Duration::from_millis).unwrap_or(DEFAULT_DEBOUNCE),
            lookup_after_len: DEFAULT_LOOKUP_AFTER_LEN,
        }
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! the backend URL, the web app origin the offline controller serves, and
//! the cache version tag. Environment variables override the saved values.
//!
//! Configuration is stored at `~/.config/intotheheaven/config.json`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::api::client::DEFAULT_API_BASE_URL;
use crate::worker::config::DEFAULT_CACHE_VERSION;
use crate::worker::{ControllerConfig, OfflinePage};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "intotheheaven";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Origin of the web app when nothing else is configured (Vite dev server).
const DEFAULT_APP_ORIGIN: &str = "http://localhost:5173";

/// Subdirectory of the data directory holding cache store files
const CACHE_STORES_DIR: &str = "caches";

pub const ENV_API_BASE_URL: &str = "INTOTHEHEAVEN_API_BASE_URL";
pub const ENV_APP_ORIGIN: &str = "INTOTHEHEAVEN_APP_ORIGIN";
pub const ENV_CACHE_VERSION: &str = "INTOTHEHEAVEN_CACHE_VERSION";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub app_origin: Option<String>,
    pub cache_version: Option<String>,
    /// Offline page language: "ko" (default) or "en".
    pub offline_locale: Option<String>,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            let config: Self =
                serde_json::from_str(&contents).context("Failed to parse config file")?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for device state, logs and cache stores.
    pub fn data_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn cache_stores_dir(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(CACHE_STORES_DIR))
    }

    /// Apply environment overrides on top of the saved values.
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var(ENV_API_BASE_URL) {
            self.api_base_url = Some(url);
        }
        if let Ok(origin) = std::env::var(ENV_APP_ORIGIN) {
            self.app_origin = Some(origin);
        }
        if let Ok(version) = std::env::var(ENV_CACHE_VERSION) {
            self.cache_version = Some(version);
        }
        self
    }

    pub fn api_base_url(&self) -> String {
        self.api_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
    }

    pub fn app_origin(&self) -> Result<Url> {
        let origin = self.app_origin.as_deref().unwrap_or(DEFAULT_APP_ORIGIN);
        Url::parse(origin).with_context(|| format!("Invalid app origin: {}", origin))
    }

    pub fn controller_config(&self) -> Result<ControllerConfig> {
        let page = match self.offline_locale.as_deref() {
            Some("en") => OfflinePage::english(),
            _ => OfflinePage::default(),
        };
        Ok(ControllerConfig::new(self.app_origin()?)
            .with_version(
                self.cache_version
                    .clone()
                    .unwrap_or_else(|| DEFAULT_CACHE_VERSION.to_string()),
            )
            .with_offline_page(page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_base_url(), "http://localhost:8080");
        assert_eq!(config.app_origin().unwrap().as_str(), "http://localhost:5173/");

        let controller = config.controller_config().unwrap();
        assert_eq!(controller.static_store_name(), "intotheheaven-static-v2");
        assert_eq!(controller.offline_page, OfflinePage::default());
    }

    #[test]
    fn test_saved_values_are_used() {
        let config = Config {
            app_origin: Some("https://intotheheaven.app".to_string()),
            cache_version: Some("v7".to_string()),
            offline_locale: Some("en".to_string()),
            ..Default::default()
        };
        let controller = config.controller_config().unwrap();
        assert_eq!(controller.dynamic_store_name(), "intotheheaven-dynamic-v7");
        assert_eq!(controller.offline_page, OfflinePage::english());
        assert!(controller.is_same_origin(&Url::parse("https://intotheheaven.app/groups").unwrap()));
    }

    #[test]
    fn test_invalid_origin() {
        let config = Config {
            app_origin: Some("not a url".to_string()),
            ..Default::default()
        };
        assert!(config.controller_config().is_err());
    }
}

//! Configuration loading.
//!
//! Settings live in `config.toml` under the platform config directory (or a
//! path given on the command line). A missing file is created with defaults;
//! partial files fall back to defaults per field.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "browse-rs";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub services: ServiceConfig,
    pub storage: StorageConfig,
    pub player: PlayerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub min_query_len: usize,
    pub debounce_ms: u64,
    pub result_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub content_url: String,
    pub geocoder_url: String,
    pub request_timeout_secs: u64,
    pub connectivity_host: String,
    pub connectivity_timeout_ms: u64,
    pub offline_message: String,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub command: String,
    pub args: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_len: 3,
            debounce_ms: 300,
            result_limit: 10,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            content_url: "http://localhost:8080/api".to_string(),
            geocoder_url: "https://nominatim.openstreetmap.org/search".to_string(),
            request_timeout_secs: 10,
            connectivity_host: "1.1.1.1:443".to_string(),
            connectivity_timeout_ms: 1500,
            offline_message: "No internet connection. Connect and try again.".to_string(),
            user_agent: concat!("browse-rs/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            command: "mpv".to_string(),
            args: vec!["--no-video".to_string(), "--really-quiet".to_string()],
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl ServiceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connectivity_timeout(&self) -> Duration {
        Duration::from_millis(self.connectivity_timeout_ms)
    }
}

impl StorageConfig {
    pub fn favorites_path(&self) -> PathBuf {
        self.data_dir.join("favorites.json")
    }

    pub fn profile_path(&self) -> PathBuf {
        self.data_dir.join("profile.json")
    }
}

impl Config {
    /// Load from `path`, or from the default location when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path(),
        };

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .with_context(|| format!("reading {}", config_path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("parsing {}", config_path.display()))?;
            tracing::debug!(path = %config_path.display(), "Config loaded");
            Ok(config)
        } else {
            let config = Config::default();
            config.save(&config_path)?;
            tracing::info!(path = %config_path.display(), "Wrote default config");
            Ok(config)
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join(CONFIG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_search_contract() {
        let config = Config::default();
        assert_eq!(config.search.min_query_len, 3);
        assert_eq!(config.search.debounce(), Duration::from_millis(300));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [search]
            debounce_ms = 150

            [services]
            content_url = "https://example.org/api"
            "#,
        )
        .unwrap();

        assert_eq!(config.search.debounce_ms, 150);
        assert_eq!(config.search.min_query_len, 3);
        assert_eq!(config.services.content_url, "https://example.org/api");
        assert_eq!(config.services.request_timeout_secs, 10);
        assert_eq!(config.player.command, "mpv");
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load(Some(&path)).unwrap();
        assert!(path.exists());
        assert_eq!(config.search.result_limit, 10);

        let reloaded = Config::load(Some(&path)).unwrap();
        assert_eq!(reloaded.services.geocoder_url, config.services.geocoder_url);
    }
}

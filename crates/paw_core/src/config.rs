//! Client configuration.
//!
//! Stored as TOML in the platform config directory
//! (`~/.config/pawph/config.toml` on Linux). A missing file means defaults;
//! `PAW_SERVER_URL` overrides the server address for a single run.

use anyhow::{Context, Result};
use directories_next::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const SERVER_URL_ENV: &str = "PAW_SERVER_URL";
pub const PREDICT_PATH: &str = "/api/predict";
pub const HEALTH_PATH: &str = "/api/health";

const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguagePreference {
    #[default]
    System,
    Korean,
    English,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server_url: String,
    pub timeout_secs: u64,
    pub language: LanguagePreference,
    /// Per-run address from `PAW_SERVER_URL`. Never written back to disk.
    #[serde(skip)]
    pub server_override: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            language: LanguagePreference::System,
            server_override: None,
        }
    }
}

impl ClientConfig {
    /// Loads the user config, falling back to defaults on any problem, then
    /// applies the environment override.
    pub fn load() -> Self {
        let cfg = match config_path() {
            Some(path) => Self::load_from(&path).unwrap_or_else(|e| {
                tracing::warn!("Config {} ignored: {e:#}", path.display());
                Self::default()
            }),
            None => Self::default(),
        };
        cfg.with_server_override(std::env::var(SERVER_URL_ENV).ok())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        toml::from_str(&raw).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = config_path().context("no config directory on this platform")?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let raw = toml::to_string_pretty(self)?;
        fs::write(path, raw).with_context(|| format!("cannot write {}", path.display()))
    }

    pub fn with_server_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            tracing::info!("{SERVER_URL_ENV} overrides server url: {url}");
            self.server_override = Some(url.trim().to_string());
        }
        self
    }

    /// The address requests go to: the override when set, else the saved one.
    pub fn effective_server_url(&self) -> &str {
        self.server_override.as_deref().unwrap_or(&self.server_url)
    }

    pub fn predict_url(&self) -> String {
        self.endpoint(PREDICT_PATH)
    }

    pub fn health_url(&self) -> String {
        self.endpoint(HEALTH_PATH)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.effective_server_url().trim_end_matches('/'))
    }
}

pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("kr", "pawph", "pawph").map(|d| d.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() -> Result<()> {
        let dir = tempdir()?;
        let cfg = ClientConfig::load_from(&dir.path().join("config.toml"))?;
        assert_eq!(cfg, ClientConfig::default());
        Ok(())
    }

    #[test]
    fn partial_file_keeps_other_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "server_url = \"https://ph.example.org/\"\nlanguage = \"english\"\n")?;
        let cfg = ClientConfig::load_from(&path)?;
        assert_eq!(cfg.server_url, "https://ph.example.org/");
        assert_eq!(cfg.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(cfg.language, LanguagePreference::English);
        assert_eq!(cfg.predict_url(), "https://ph.example.org/api/predict");
        Ok(())
    }

    #[test]
    fn invalid_file_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "timeout_secs = \"soon\"")?;
        assert!(ClientConfig::load_from(&path).is_err());
        Ok(())
    }

    #[test]
    fn save_then_load() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("config.toml");
        let cfg = ClientConfig {
            server_url: "http://10.0.0.2:9000".into(),
            timeout_secs: 5,
            language: LanguagePreference::Korean,
            server_override: None,
        };
        cfg.save_to(&path)?;
        assert_eq!(ClientConfig::load_from(&path)?, cfg);
        Ok(())
    }

    #[test]
    fn env_override_ignores_blank() {
        let cfg = ClientConfig::default().with_server_override(Some("  ".into()));
        assert_eq!(cfg.server_url, DEFAULT_SERVER_URL);
        let cfg = cfg.with_server_override(Some("http://gpu-box:8000".into()));
        assert_eq!(cfg.health_url(), "http://gpu-box:8000/api/health");
        assert_eq!(cfg.server_url, DEFAULT_SERVER_URL);
    }

    #[test]
    fn env_override_is_not_saved() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "server_url = \"http://ph-server:8000\"\n")?;

        let mut cfg = ClientConfig::load_from(&path)?
            .with_server_override(Some("http://temp-override:1".into()));
        assert_eq!(cfg.predict_url(), "http://temp-override:1/api/predict");
        cfg.language = LanguagePreference::English;
        cfg.save_to(&path)?;

        let reloaded = ClientConfig::load_from(&path)?;
        assert_eq!(reloaded.server_url, "http://ph-server:8000");
        assert_eq!(reloaded.server_override, None);
        assert_eq!(reloaded.language, LanguagePreference::English);
        assert!(!fs::read_to_string(&path)?.contains("temp-override"));
        Ok(())
    }
}

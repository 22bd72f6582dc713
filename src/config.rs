//! Runtime configuration: TOML file plus environment overrides

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

const PUBLISHED_SHEET: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vRgEUgMmfOesihAmasrySyIVfm4-nB04ayKyKHwNoSBEMC779DmVoEOaby0wCFnfWDve-n0eAzg0m_4/pub";

pub const CONFIG_PATH_ENV: &str = "STOREFRONT_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "storefront.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {name}: {value}")]
    Env { name: &'static str, value: String },
}

/// The three published CSV exports. An empty URL disables that source.
///
/// Keys missing from a config file fall back to the published tabs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default = "SheetSources::published")]
pub struct SheetSources {
    pub properties_url: String,
    pub sponsors_url: String,
    pub config_url: String,
}

impl SheetSources {
    /// The storefront's own published tabs
    pub fn published() -> Self {
        Self {
            properties_url: format!("{PUBLISHED_SHEET}?gid=0&single=true&output=csv"),
            sponsors_url: format!("{PUBLISHED_SHEET}?gid=1764848062&single=true&output=csv"),
            config_url: format!("{PUBLISHED_SHEET}?gid=1983973278&single=true&output=csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(flatten)]
    pub sources: SheetSources,
    pub poll_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// File backing the locally uploaded fallback logo
    pub logo_store_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sources: SheetSources::published(),
            poll_interval_secs: 300,
            request_timeout_secs: 30,
            user_agent: crate::sheets::http::DEFAULT_USER_AGENT.to_string(),
            logo_store_path: None,
        }
    }
}

impl AppConfig {
    /// Load from `$STOREFRONT_CONFIG` (or `storefront.toml` when present),
    /// then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
        let path = explicit
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut config = if explicit.is_some() || path.exists() {
            Self::from_file(&path)?
        } else {
            debug!("No config file, using defaults");
            Self::default()
        };

        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply `STOREFRONT_*` overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("STOREFRONT_PROPERTIES_URL") {
            self.sources.properties_url = url;
        }
        if let Some(url) = lookup("STOREFRONT_SPONSORS_URL") {
            self.sources.sponsors_url = url;
        }
        if let Some(url) = lookup("STOREFRONT_CONFIG_URL") {
            self.sources.config_url = url;
        }
        if let Some(value) = lookup("STOREFRONT_POLL_SECS") {
            self.poll_interval_secs = match value.trim().parse() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Env {
                        name: "STOREFRONT_POLL_SECS",
                        value,
                    })
                }
            };
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_point_at_published_tabs() {
        let config = AppConfig::default();
        assert!(config.sources.properties_url.contains("gid=0"));
        assert!(config.sources.sponsors_url.contains("gid=1764848062"));
        assert!(config.sources.config_url.ends_with("output=csv"));
        assert_eq!(config.poll_interval(), Duration::from_secs(300));
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = AppConfig::from_toml(
            r#"
            properties_url = "https://example.test/props.csv"
            poll_interval_secs = 60
            "#,
        )
        .unwrap();

        assert_eq!(config.sources.properties_url, "https://example.test/props.csv");
        assert_eq!(config.sources.sponsors_url, SheetSources::published().sponsors_url);
        assert_eq!(config.poll_interval_secs, 60);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn env_overrides_win() {
        let vars: HashMap<&str, &str> = [
            ("STOREFRONT_SPONSORS_URL", ""),
            ("STOREFRONT_POLL_SECS", "120"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config
            .apply_env(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.sources.sponsors_url, "");
        assert_eq!(config.poll_interval_secs, 120);
    }

    #[test]
    fn bad_poll_interval_is_rejected() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env(|name| (name == "STOREFRONT_POLL_SECS").then(|| "0".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env { .. }));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.toml");
        std::fs::write(&path, "config_url = \"\"\nrequest_timeout_secs = 5\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.sources.config_url, "");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }
}

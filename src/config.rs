//! Application configuration
//!
//! Stored as JSON in `~/.pollen-tui/config.json`. Values resolve in order:
//! config file, then environment, then command-line flags.

use crate::model::filter::DEFAULT_MAX_RESULTS;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

pub const ENV_API_URL: &str = "POLLEN_API_URL";
pub const ENV_CATALOG_ID: &str = "POLLEN_CATALOG_ID";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid catalog id '{0}'")]
    InvalidCatalogId(String),

    #[error("no catalog id configured; pass --catalog-id, set {ENV_CATALOG_ID} or use --demo")]
    MissingCatalogId,

    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub catalog_id: Option<Uuid>,
    /// Where focal-plane images are served from
    pub image_base_url: String,
    pub max_results: u32,
    pub request_timeout_secs: u64,
    /// Use the built-in demo catalog instead of the API
    pub demo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            catalog_id: None,
            image_base_url: "http://localhost:8000/images".to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            request_timeout_secs: 10,
            demo: false,
        }
    }
}

/// Values that override the config file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub api_base_url: Option<String>,
    pub catalog_id: Option<String>,
    pub max_results: Option<u32>,
    pub demo: bool,
}

impl Overrides {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            api_base_url: non_empty(ENV_API_URL),
            catalog_id: non_empty(ENV_CATALOG_ID),
            max_results: None,
            demo: false,
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".pollen-tui"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    /// Load the config file, if there is one
    pub fn load() -> Result<Option<Config>, ConfigError> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path).map(Some),
            _ => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save the config to disk
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn apply(&mut self, overrides: &Overrides) -> Result<(), ConfigError> {
        if let Some(url) = &overrides.api_base_url {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(raw) = &overrides.catalog_id {
            let id = Uuid::parse_str(raw.trim())
                .map_err(|_| ConfigError::InvalidCatalogId(raw.clone()))?;
            self.catalog_id = Some(id);
        }
        if let Some(max) = overrides.max_results {
            self.max_results = max;
        }
        if overrides.demo {
            self.demo = true;
        }
        Ok(())
    }

    /// Merge file, environment and CLI values
    pub fn resolve(
        file: Option<Config>,
        env: &Overrides,
        cli: &Overrides,
    ) -> Result<Config, ConfigError> {
        let mut config = file.unwrap_or_default();
        config.apply(env)?;
        config.apply(cli)?;
        if config.max_results == 0 {
            config.max_results = DEFAULT_MAX_RESULTS;
        }
        if !config.demo && config.catalog_id.is_none() {
            return Err(ConfigError::MissingCatalogId);
        }
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const CATALOG: &str = "5b3c8f0e-2a41-4e6b-9d3a-7f1e2c4b6a80";

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: Config = serde_json::from_str(r#"{"max_results": 25}"#).unwrap();
        assert_eq!(config.max_results, 25);
        assert_eq!(config.request_timeout_secs, 10);
        assert!(!config.demo);
        assert!(config.catalog_id.is_none());
    }

    #[test]
    fn test_env_lookup_ignores_blank_values() {
        let vars: HashMap<&str, &str> =
            HashMap::from([(ENV_API_URL, "  "), (ENV_CATALOG_ID, CATALOG)]);
        let overrides = Overrides::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(overrides.api_base_url, None);
        assert_eq!(overrides.catalog_id.as_deref(), Some(CATALOG));
    }

    #[test]
    fn test_cli_overrides_env_and_file() {
        let file = Config {
            api_base_url: "http://file".into(),
            ..Config::default()
        };
        let env = Overrides {
            api_base_url: Some("http://env".into()),
            catalog_id: Some(CATALOG.into()),
            ..Overrides::default()
        };
        let cli = Overrides {
            api_base_url: Some("http://cli".into()),
            max_results: Some(40),
            ..Overrides::default()
        };

        let config = Config::resolve(Some(file), &env, &cli).unwrap();
        assert_eq!(config.api_base_url, "http://cli");
        assert_eq!(config.catalog_id, Some(Uuid::parse_str(CATALOG).unwrap()));
        assert_eq!(config.max_results, 40);
    }

    #[test]
    fn test_catalog_id_required_outside_demo() {
        let none = Overrides::default();
        assert!(matches!(
            Config::resolve(None, &none, &none),
            Err(ConfigError::MissingCatalogId)
        ));

        let demo = Overrides {
            demo: true,
            ..Overrides::default()
        };
        assert!(Config::resolve(None, &none, &demo).is_ok());
    }

    #[test]
    fn test_invalid_catalog_id_rejected() {
        let cli = Overrides {
            catalog_id: Some("not-a-uuid".into()),
            ..Overrides::default()
        };
        assert!(matches!(
            Config::resolve(None, &Overrides::default(), &cli),
            Err(ConfigError::InvalidCatalogId(_))
        ));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            catalog_id: Some(Uuid::parse_str(CATALOG).unwrap()),
            demo: true,
            ..Config::default()
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}

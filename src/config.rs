use crate::api::{DEFAULT_API_BASE, DEFAULT_IIIF_BASE};
use crate::listing::DEFAULT_PER_PAGE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const MAX_PER_PAGE: u32 = 100;
const CONFIG_FILE: &str = "config.json";
const LOG_FILE: &str = "artwork-explorer.log";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid configuration in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigError::Io { path, .. } => {
                format!("Could not read configuration file {}", path.display())
            }
            ConfigError::Parse { path, source } => {
                format!("Configuration file {} is malformed: {}", path.display(), source)
            }
            ConfigError::Invalid(msg) => msg.clone(),
        }
    }
}

/// Runtime settings, read from `config.json` and overridden by CLI flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub api_base: String,
    pub iiif_base: String,
    pub items_per_page: u32,
    pub request_timeout_secs: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            iiif_base: DEFAULT_IIIF_BASE.to_string(),
            items_per_page: DEFAULT_PER_PAGE,
            request_timeout_secs: None,
            log_file: None,
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("edu", "artic", "artwork-explorer")
}

impl Configuration {
    /// Load from `explicit` if given (it must exist), otherwise from the
    /// per-user config directory when a file is there, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base.trim().is_empty() {
            return Err(ConfigError::Invalid("api_base must not be empty".to_string()));
        }
        if self.iiif_base.trim().is_empty() {
            return Err(ConfigError::Invalid("iiif_base must not be empty".to_string()));
        }
        if self.items_per_page == 0 || self.items_per_page > MAX_PER_PAGE {
            return Err(ConfigError::Invalid(format!(
                "items_per_page must be between 1 and {}, got {}",
                MAX_PER_PAGE, self.items_per_page
            )));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Where logs go: the configured file, else the per-user cache dir.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| project_dirs().map(|dirs| dirs.cache_dir().join(LOG_FILE)))
    }
}

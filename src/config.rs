use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_DATABASE_PATH: &str = "data/profile.db";
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    pub bind: String,
    pub database_path: PathBuf,
    /// When set, logs are written as JSON to a daily rolling file in this directory.
    pub log_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            log_dir: None,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> AppResult<SocketAddr> {
        self.bind
            .parse::<SocketAddr>()
            .map_err(|error| AppError::Config(format!("invalid bind address '{}': {}", self.bind, error)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    pub api_url: String,
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub server: ServerConfig,
    pub client: ClientConfig,
}

impl Config {
    /// Defaults, then the optional YAML file, then `PROFILE_*` environment overrides.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> AppResult<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|error| AppError::Config(format!("cannot read {}: {}", path.display(), error)))?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> AppResult<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(bind) = lookup("PROFILE_BIND") {
            self.server.bind = bind;
        }
        if let Some(database) = lookup("PROFILE_DATABASE") {
            self.server.database_path = PathBuf::from(database);
        }
        if let Some(log_dir) = lookup("PROFILE_LOG_DIR") {
            self.server.log_dir = Some(PathBuf::from(log_dir));
        }
        if let Some(api_url) = lookup("PROFILE_API_URL") {
            self.client.api_url = api_url;
        }
    }
}

//! Application configuration.
//!
//! Settings come from a TOML file (path in `MURAKAMI_VIZ_CONFIG`, default
//! `config.toml`). Every field has a default, so a missing file is not an
//! error. `DATABASE_URL`, `MURAKAMI_VIZ_HOST` and `MURAKAMI_VIZ_PORT` override
//! the file.

use crate::config::database::DEFAULT_DATABASE_URL;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::{env, fs, path::Path};
use tracing::{debug, info, warn};

/// Environment variable naming the config file.
pub const CONFIG_PATH_VAR: &str = "MURAKAMI_VIZ_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Top-level configuration.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

/// `[server]` table.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; empty allows any origin
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// `host:port` for the listener.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// `[database]` table.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

/// Parses configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config: {e}"),
    })
}

/// Reads the config file at `path`. A file that does not exist yields defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    if !path_ref.exists() {
        warn!("No config file at {:?}, using defaults", path_ref);
        return Ok(AppConfig::default());
    }
    let contents = fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;
    parse_config(&contents)
}

impl AppConfig {
    /// Applies overrides from a variable lookup.
    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(host) = lookup("MURAKAMI_VIZ_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("MURAKAMI_VIZ_PORT") {
            self.server.port = port.parse().map_err(|_| Error::Config {
                message: format!("MURAKAMI_VIZ_PORT '{port}' is not a valid port"),
            })?;
        }
        Ok(())
    }
}

/// Loads the application configuration: file first, then environment overrides.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let mut config = load_config(&path)?;
    config.apply_overrides(|name| env::var(name).ok())?;
    info!(address = %config.server.bind_address(), "Configuration loaded");
    Ok(config)
}

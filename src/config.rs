//! Configuration System
//!
//! Layered configuration for the client: an explicit `--config` file,
//! otherwise the global `~/.config/kiln/config.toml`, overridden by
//! `KILN_*` environment variables, with built-in defaults underneath.

use crate::error::CommandError;
use crate::logging::LoggingConfig;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Connection settings for the build service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the service
    #[serde(default = "default_url")]
    pub url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_url() -> String {
    "http://localhost:4000".to_string()
}

fn default_timeout() -> u64 {
    120
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout: default_timeout(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KilnConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Path to the global config file. Uses `XDG_CONFIG_HOME` when set,
/// otherwise `~/.config/kiln/config.toml`.
pub fn global_config_path() -> Option<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg).join("kiln").join("config.toml"));
    }
    std::env::var("HOME").ok().map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("kiln")
            .join("config.toml")
    })
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration. An explicit path must exist; the global file
    /// is optional. Environment variables (`KILN_API_URL`,
    /// `KILN_LOGGING_LEVEL`, ...) override file values.
    pub fn load(explicit: Option<&Path>) -> Result<KilnConfig, CommandError> {
        let mut builder = Config::builder();
        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path.to_path_buf()));
        } else if let Some(global) = global_config_path() {
            if global.exists() {
                builder = builder.add_source(File::from(global).required(false));
            }
        }
        builder = builder.add_source(Environment::with_prefix("KILN").separator("_"));
        let settings = builder.build()?;
        settings.try_deserialize().map_err(Into::into)
    }
}

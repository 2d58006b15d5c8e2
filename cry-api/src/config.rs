//! Configuration resolution for cry-api
//!
//! Each setting is resolved in priority order:
//! 1. Command-line argument
//! 2. Environment variable (`CRY_*`)
//! 3. TOML config file
//! 4. Compiled default
//!
//! Steps 1 and 2 are handled by clap; this module layers the TOML file and
//! defaults underneath.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Command-line arguments for cry-api
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "cry-api")]
#[command(about = "Infant cry reason classification service")]
#[command(version)]
pub struct Args {
    /// Path to TOML config file
    #[arg(long, env = "CRY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "CRY_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "CRY_PORT")]
    pub port: Option<u16>,

    /// Maximum accepted request body in bytes
    #[arg(long, env = "CRY_MAX_UPLOAD_BYTES")]
    pub max_upload_bytes: Option<usize>,

    /// Log filter (e.g. "info", "cry_api=debug")
    #[arg(long, env = "CRY_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// Optional settings file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TomlConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub max_upload_bytes: Option<usize>,
    pub log_level: Option<String>,
}

/// Fully resolved service settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load the TOML layer named by `args` (or the default location) and merge
    pub fn resolve(args: &Args) -> Result<Self, ConfigError> {
        let toml_config = load_toml_config(args.config.as_deref())?;
        Self::merge(args, toml_config)
    }

    /// Merge CLI/env values over TOML values over defaults
    pub fn merge(args: &Args, toml_config: TomlConfig) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            host: args
                .host
                .clone()
                .or(toml_config.host)
                .unwrap_or(defaults.host),
            port: args.port.or(toml_config.port).unwrap_or(defaults.port),
            max_upload_bytes: args
                .max_upload_bytes
                .or(toml_config.max_upload_bytes)
                .unwrap_or(defaults.max_upload_bytes),
            log_level: args
                .log_level
                .clone()
                .or(toml_config.log_level)
                .unwrap_or(defaults.log_level),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("host must not be empty".to_string()));
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_upload_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// `host:port` string accepted by `TcpListener::bind`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Default config file location: `<config_dir>/cry-reason/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cry-reason").join("config.toml"))
}

/// Load the TOML layer.
///
/// An explicitly named file must exist and parse. Without one, the default
/// location is used if present; otherwise the layer is empty.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig, ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(TomlConfig::default()),
        },
    };

    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;

    info!("Loaded config file: {}", path.display());
    Ok(config)
}

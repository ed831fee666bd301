//! # Configuration
//!
//! Server configuration is assembled in layers, later layers winning:
//!
//! 1. Default values
//! 2. JSON configuration file (`--config` or `GBCE_CONFIG_FILE`)
//! 3. Environment variables prefixed with `GBCE_`
//! 4. Command-line flags
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `GBCE_HOST` | Listen address | `0.0.0.0` |
//! | `GBCE_PORT` | Listen port | `5555` |
//! | `GBCE_CATALOG` | Stock catalog file | `data/sample_data.json` |
//! | `GBCE_LOG_LEVEL` | Log level | `info` |
//! | `GBCE_LOG_FORMAT` | Log format (compact/pretty/json) | `compact` |

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_FILE_ENV: &str = "GBCE_CONFIG_FILE";

/// Catalog shipped with the repository, relative to its root.
pub const DEFAULT_CATALOG_PATH: &str = "data/sample_data.json";

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line human-readable output.
    #[default]
    Compact,
    /// Multi-line human-readable output.
    Pretty,
    /// Structured JSON, one object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::InvalidValue {
                field: String::from("log_format"),
                message: format!("unknown format '{other}', expected compact, pretty or json"),
            }),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Exchange server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Stock catalog in the sample data layout.
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    #[serde(default)]
    pub log: LogConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            catalog_path: default_catalog_path(),
            log: LogConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Defaults, then the config file (explicit path or `GBCE_CONFIG_FILE`),
    /// then process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_FILE_ENV).map(PathBuf::from));

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Apply `GBCE_*` overrides looked up through `lookup`.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(host) = lookup("GBCE_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("GBCE_PORT") {
            self.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: String::from("port"),
                message: format!("'{port}' is not a valid port"),
            })?;
        }
        if let Some(catalog) = lookup("GBCE_CATALOG") {
            self.catalog_path = PathBuf::from(catalog);
        }
        if let Some(level) = lookup("GBCE_LOG_LEVEL") {
            self.log.level = level;
        }
        if let Some(format) = lookup("GBCE_LOG_FORMAT") {
            self.log.format = format.parse()?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: String::from("host"),
                message: String::from("cannot be empty"),
            });
        }
        if self.catalog_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: String::from("catalog_path"),
                message: String::from("cannot be empty"),
            });
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
                field: String::from("host"),
                message: e.to_string(),
            })
    }
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    5555
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from(DEFAULT_CATALOG_PATH)
}

fn default_log_level() -> String {
    String::from("info")
}

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing_subscriber::filter;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// log level, can be "info", "debug", "trace".
    pub log_level: Option<String>,
    /// Use debug level if true and no log_level is set.
    pub debug: Option<bool>,
    /// Path to the cofferd RPC socket. Defaults to `cofferd.sock` in the
    /// datadir.
    pub backend_socket: Option<PathBuf>,
}

pub const DEFAULT_FILE_NAME: &str = "gui.toml";

pub const SOCKET_FILE_NAME: &str = "cofferd.sock";

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let config = std::fs::read_to_string(path)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ConfigError::NotFound,
                _ => ConfigError::ReadingFile(format!("Reading configuration file: {}", e)),
            })
            .and_then(|content| {
                toml::from_str::<Config>(&content).map_err(|e| {
                    ConfigError::ReadingFile(format!("Parsing configuration file: {}", e))
                })
            })?;

        // check if log_level field is valid
        config.log_level()?;
        Ok(config)
    }

    pub fn log_level(&self) -> Result<filter::LevelFilter, ConfigError> {
        if let Some(level) = &self.log_level {
            match level.as_ref() {
                "info" => Ok(filter::LevelFilter::INFO),
                "debug" => Ok(filter::LevelFilter::DEBUG),
                "trace" => Ok(filter::LevelFilter::TRACE),
                _ => Err(ConfigError::InvalidField(
                    "log_level",
                    format!("Unknown value '{}'", level),
                )),
            }
        } else if let Some(true) = self.debug {
            Ok(filter::LevelFilter::DEBUG)
        } else {
            Ok(filter::LevelFilter::INFO)
        }
    }

    /// The socket `cofferd` listens on, relative paths resolved against
    /// the datadir.
    pub fn socket_path(&self, datadir: &Path) -> PathBuf {
        match &self.backend_socket {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => datadir.join(path),
            None => datadir.join(SOCKET_FILE_NAME),
        }
    }
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub enum ConfigError {
    InvalidField(&'static str, String),
    NotFound,
    ReadingFile(String),
    Unexpected(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "Config file not found"),
            Self::InvalidField(field, message) => {
                write!(f, "Config field {} is invalid: {}", field, message)
            }
            Self::ReadingFile(e) => write!(f, "Error while reading file: {}", e),
            Self::Unexpected(e) => write!(f, "Unexpected error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Get the absolute path to the coffer configuration folder.
///
/// This is a "Coffer" directory in the XDG standard configuration
/// directory for all OSes but Linux-based ones, for which it's
/// `~/.coffer`. The wallet files, RPC socket and logs all live next to the
/// configuration file.
pub fn default_datadir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    #[cfg(target_os = "linux")]
    let configs_dir = dirs::home_dir();

    #[cfg(not(target_os = "linux"))]
    let configs_dir = dirs::config_dir();

    if let Some(mut path) = configs_dir {
        #[cfg(target_os = "linux")]
        path.push(".coffer");

        #[cfg(not(target_os = "linux"))]
        path.push("Coffer");

        return Ok(path);
    }

    Err("Failed to get default data directory".into())
}

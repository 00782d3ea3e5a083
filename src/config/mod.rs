use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Log configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LogConfig {
  /// Log file path, if not set, logs will be printed to stdout
  pub file: Option<String>,
  /// Log level, default is "info"
  #[serde(default = "default_log_level")]
  pub level: String,
}

fn default_log_level() -> String {
  "info".to_string()
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      file: None,
      level: default_log_level(),
    }
  }
}

/// WordDB configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
  /// HTTP listening address
  #[serde(default = "default_server_addr")]
  pub server_addr: String,

  /// File the dictionary is persisted to
  #[serde(default = "default_dictionary_file")]
  pub dictionary_file: PathBuf,

  /// Bearer token required on every non-health route; auth is off when unset
  #[serde(default)]
  pub auth_token: Option<String>,

  /// Log configuration
  #[serde(default)]
  pub log: LogConfig,
}

fn default_server_addr() -> String {
  "0.0.0.0:8080".to_string()
}

fn default_dictionary_file() -> PathBuf {
  PathBuf::from("dictionary.txt")
}

impl Default for Config {
  fn default() -> Self {
    Self {
      server_addr: default_server_addr(),
      dictionary_file: default_dictionary_file(),
      auth_token: None,
      log: LogConfig::default(),
    }
  }
}

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Failed to read config file '{path}': {source}")]
  Read {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to parse config file '{path}': {source}")]
  Parse {
    path: String,
    #[source]
    source: toml::de::Error,
  },

  #[error("invalid config: {0}")]
  Invalid(String),
}

impl Config {
  /// Load configuration from TOML file
  pub fn from_file(path: &str) -> Result<Self, ConfigError> {
    let config_str = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_string(),
      source,
    })?;

    let config: Config = toml::from_str(&config_str).map_err(|source| ConfigError::Parse {
      path: path.to_string(),
      source,
    })?;

    config.validate()?;

    Ok(config)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.dictionary_file.as_os_str().is_empty() {
      return Err(ConfigError::Invalid(
        "dictionary_file must not be empty".to_string(),
      ));
    }
    if matches!(&self.auth_token, Some(token) if token.trim().is_empty()) {
      return Err(ConfigError::Invalid(
        "auth_token must not be empty when set".to_string(),
      ));
    }
    Ok(())
  }
}

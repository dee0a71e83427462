//! # Bridge Configuration
//!
//! Configuration is resolved once at startup and handed to the upstream
//! client and the web server explicitly.
//!
//! ## Example: TOML Configuration
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 3000
//! static_dir = "public"
//!
//! [octoprint]
//! url = "http://octopi.local/api"
//! api_key = "0123456789ABCDEF"
//! timeout_secs = 10
//! mock = false
//!
//! [logging]
//! level = "info"
//! ```
//!
//! After the file is loaded, `OCTO_URL`, `API_KEY`, `PORT` and `MOCK_DATA`
//! from the environment take precedence (see [`Config::apply_env`]).

// src/config.rs - Single configuration file
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration struct for the HTTP server, the upstream printer API and logging.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub octoprint: OctoPrintConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Listening socket and static assets.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
        }
    }
}

/// Upstream printer control server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OctoPrintConfig {
    /// Base URL including the API prefix, e.g. `http://octopi.local/api`.
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub mock: bool,
    /// Length of the synthetic print job served in mock mode.
    #[serde(default = "default_mock_print_seconds")]
    pub mock_print_seconds: u64,
}

impl Default for OctoPrintConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
            mock: false,
            mock_print_seconds: default_mock_print_seconds(),
        }
    }
}

impl OctoPrintConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn mock_print_window(&self) -> Duration {
        Duration::from_secs(self.mock_print_seconds)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

impl LoggingConfig {
    /// Falls back to INFO for anything `tracing` does not recognise.
    pub fn max_level(&self) -> tracing::Level {
        self.level.parse().unwrap_or(tracing::Level::INFO)
    }
}

impl Config {
    /// Apply the process environment on top of the file values.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::apply_env`] with an injectable lookup, so tests never touch the real environment.
    pub fn apply_vars<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("OCTO_URL") {
            self.octoprint.url = url;
        }
        if let Some(key) = lookup("API_KEY") {
            self.octoprint.api_key = key;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("PORT '{}' is not a valid port", port)))?;
        }
        if let Some(mock) = lookup("MOCK_DATA") {
            self.octoprint.mock = is_truthy(&mock);
        }
        Ok(())
    }

    /// Validate values serde cannot check on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.octoprint.timeout_secs == 0 {
            return Err(ConfigError::Invalid("octoprint.timeout_secs must be > 0".to_string()));
        }
        if self.octoprint.mock_print_seconds == 0 {
            return Err(ConfigError::Invalid("octoprint.mock_print_seconds must be > 0".to_string()));
        }
        if !self.octoprint.mock && self.octoprint.url.trim().is_empty() {
            return Err(ConfigError::Invalid("octoprint.url is required unless mock mode is enabled".to_string()));
        }
        Ok(())
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 3000 }
fn default_url() -> String { "http://localhost/api".to_string() }
fn default_timeout_secs() -> u64 { 10 }
fn default_mock_print_seconds() -> u64 { 7200 }
fn default_log_level() -> String { "info".to_string() }

/// Load configuration from a TOML file at the given path.
pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::error!("Failed to parse config TOML: {}", e);
                Err(ConfigError::Toml(e))
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file '{}': {}", path, e);
            Err(ConfigError::Io(e))
        }
    }
}

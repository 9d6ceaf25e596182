use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::dashboard::DEFAULT_MAX_TOASTS;

pub const ENV_PREFIX: &str = "TRADER_DASHBOARD";
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to write configuration: {0}")]
    Write(#[from] std::io::Error),

    #[error("failed to encode configuration: {0}")]
    Encode(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Root of the bot's HTTP API.
    pub base_url: String,
    pub poll_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub max_toasts: usize,
    /// Where logs go while the terminal UI owns the screen.
    pub log_file: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            poll_interval_secs: 10,
            request_timeout_secs: 10,
            max_toasts: DEFAULT_MAX_TOASTS,
            log_file: "trader-dashboard.log".to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults, then the optional file, then `TRADER_DASHBOARD__*` variables.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let layered = ::config::Config::builder()
            .add_source(::config::Config::try_from(&ClientConfig::default())?)
            .add_source(::config::File::with_name(path).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let cfg: ClientConfig = layered.try_deserialize()?;
        cfg.validate().map_err(|errors| ConfigError::Invalid(errors.join(", ")))?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            errors.push(format!("base_url must be an http(s) URL, got {:?}", self.base_url));
        }
        if self.poll_interval_secs == 0 {
            errors.push("poll_interval_secs must be > 0".to_string());
        }
        if self.request_timeout_secs == 0 {
            errors.push("request_timeout_secs must be > 0".to_string());
        }
        if self.max_toasts == 0 {
            errors.push("max_toasts must be > 0".to_string());
        }
        if self.log_file.trim().is_empty() {
            errors.push("log_file must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Writes this configuration as TOML, refusing to overwrite.
    pub fn write_to(&self, path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            return Err(ConfigError::Invalid(format!(
                "{} already exists",
                path.display()
            )));
        }
        let body = toml::to_string_pretty(self)?;
        std::fs::write(path, body)?;
        info!("Wrote default configuration to {}", path.display());
        Ok(())
    }
}

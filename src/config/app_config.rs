use std::env;
use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://muslimaikeyboard.tech";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

pub const BASE_URL_VAR: &str = "PROBE_BASE_URL";
pub const TIMEOUT_VAR: &str = "PROBE_TIMEOUT_SECONDS";

/// Settings for one run. Built once at startup and handed to whatever needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Server root; probe paths are appended to it as-is.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("invalid timeout {0:?}: expected a positive number of seconds")]
    InvalidTimeout(String),
}

fn default_user_agent() -> String {
    format!("probebox/{}", env!("CARGO_PKG_VERSION"))
}

/// Load the configuration from the environment.
/// A `.env` file in the working directory is read first when present. `PROBE_BASE_URL` and
/// `PROBE_TIMEOUT_SECONDS` override the built-in defaults.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    if let Ok(path) = dotenvy::dotenv() {
        log::debug!("Loaded environment from {}", path.display());
    }

    let config = config_from(|key| env::var(key).ok())?;

    log::info!(
        "Using base URL {} with a {}s timeout",
        config.base_url,
        config.timeout.as_secs()
    );

    Ok(config)
}

/// Build a configuration from a variable lookup, falling back to defaults for missing keys.
pub fn config_from(lookup: impl Fn(&str) -> Option<String>) -> Result<AppConfig, ConfigError> {
    let defaults = AppConfig::default();

    let base_url = match lookup(BASE_URL_VAR) {
        Some(raw) => validate_base_url(raw.trim())?,
        None => defaults.base_url,
    };

    let timeout = match lookup(TIMEOUT_VAR) {
        Some(raw) => parse_timeout(&raw)?,
        None => defaults.timeout,
    };

    Ok(AppConfig {
        base_url,
        timeout,
        user_agent: defaults.user_agent,
    })
}

/// A base URL must be absolute and name a host.
fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let parsed = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if parsed.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }

    Ok(raw.to_string())
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(seconds) if seconds > 0 => Ok(Duration::from_secs(seconds)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

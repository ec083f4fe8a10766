//! Runtime configuration for the admin core.
//!
//! # Responsibility
//! - Collect API, storage and logging settings from the environment.
//! - Provide defaults that work against a local development API.
//!
//! # Invariants
//! - `api_base_url` never ends with `/`.
//! - `http_timeout` is non-zero.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_DB_FILE_NAME: &str = "portfolio_local.sqlite3";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

const ENV_API_BASE: &str = "PORTFOLIO_API_BASE";
const ENV_AUTH_TOKEN: &str = "PORTFOLIO_AUTH_TOKEN";
const ENV_DB_PATH: &str = "PORTFOLIO_DB_PATH";
const ENV_STATIC_DIR: &str = "PORTFOLIO_STATIC_DIR";
const ENV_SEED_FILE: &str = "PORTFOLIO_SEED_FILE";
const ENV_LOG_LEVEL: &str = "PORTFOLIO_LOG_LEVEL";
const ENV_LOG_DIR: &str = "PORTFOLIO_LOG_DIR";
const ENV_HTTP_TIMEOUT: &str = "PORTFOLIO_HTTP_TIMEOUT_SECS";

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { name: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, value } => {
                write!(f, "invalid value `{value}` for {name}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Settings shared by the API client, local storage and logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioConfig {
    /// API root without the `/api` suffix.
    pub api_base_url: String,
    /// Sent as `Authorization: Bearer <token>` when set.
    pub auth_token: Option<String>,
    pub http_timeout: Duration,
    /// SQLite file backing local storage.
    pub db_path: PathBuf,
    /// Directory holding `{collection}.json` static seed files.
    pub static_dir: Option<PathBuf>,
    /// Optional `seed` data module, tried before the bundled `mock` one.
    pub seed_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            auth_token: None,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            static_dir: None,
            seed_file: None,
            log_level: None,
            log_dir: None,
        }
    }
}

impl PortfolioConfig {
    /// Loads `.env` (if present) and reads `PORTFOLIO_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(base) = read(ENV_API_BASE) {
            config = config.with_api_base_url(base);
        }
        config.auth_token = read(ENV_AUTH_TOKEN);
        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        config.static_dir = read(ENV_STATIC_DIR).map(PathBuf::from);
        config.seed_file = read(ENV_SEED_FILE).map(PathBuf::from);
        config.log_level = read(ENV_LOG_LEVEL);
        config.log_dir = read(ENV_LOG_DIR).map(PathBuf::from);
        if let Some(raw) = read(ENV_HTTP_TIMEOUT) {
            config.http_timeout = parse_timeout(&raw)?;
        }
        Ok(config)
    }

    pub fn with_api_base_url(mut self, base: impl Into<String>) -> Self {
        self.api_base_url = base.into().trim().trim_end_matches('/').to_string();
        self
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidValue {
            name: ENV_HTTP_TIMEOUT,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, PortfolioConfig, DEFAULT_API_BASE_URL};
    use std::collections::HashMap;
    use std::time::Duration;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = PortfolioConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, PortfolioConfig::default());
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn reads_and_trims_variables() {
        let config = PortfolioConfig::from_lookup(lookup(&[
            ("PORTFOLIO_API_BASE", " https://api.example.com/ "),
            ("PORTFOLIO_AUTH_TOKEN", "secret"),
            ("PORTFOLIO_HTTP_TIMEOUT_SECS", "5"),
            ("PORTFOLIO_STATIC_DIR", "/srv/data"),
            ("PORTFOLIO_LOG_LEVEL", "  "),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.auth_token.as_deref(), Some("secret"));
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert_eq!(config.static_dir.unwrap().to_str(), Some("/srv/data"));
        assert_eq!(config.log_level, None);
    }

    #[test]
    fn rejects_zero_or_garbage_timeout() {
        for raw in ["0", "soon"] {
            let err =
                PortfolioConfig::from_lookup(lookup(&[("PORTFOLIO_HTTP_TIMEOUT_SECS", raw)]))
                    .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { .. }));
        }
    }
}

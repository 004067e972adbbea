//! Server configuration, read from the environment.

use std::net::SocketAddr;

use thiserror::Error;

use exposer_observability::LogFormat;

use crate::exposure::DEFAULT_ITEMS_PER_PAGE;

const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: {message}")]
    Invalid { var: &'static str, message: String },
}

impl ConfigError {
    fn invalid(var: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            var,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    /// Prefix that model mount points are derived from, e.g. `/api/v1`.
    pub api_base: String,
    pub log_format: LogFormat,
    pub default_items_per_page: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            api_base: "/api/v1".to_string(),
            log_format: LogFormat::default(),
            default_items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

impl ApiConfig {
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a config from an arbitrary variable source; unset variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup("BIND_ADDR") {
            config.bind_addr = raw
                .parse()
                .map_err(|e| ConfigError::invalid("BIND_ADDR", format!("{raw:?}: {e}")))?;
        }

        match lookup("JWT_SECRET") {
            Some(secret) if !secret.is_empty() => config.jwt_secret = secret,
            Some(_) => return Err(ConfigError::invalid("JWT_SECRET", "must not be empty")),
            None => {}
        }

        if let Some(raw) = lookup("API_BASE") {
            config.api_base = normalize_base(&raw);
        }

        if let Some(raw) = lookup("LOG_FORMAT") {
            config.log_format = raw
                .parse()
                .map_err(|e: String| ConfigError::invalid("LOG_FORMAT", e))?;
        }

        if let Some(raw) = lookup("DEFAULT_ITEMS_PER_PAGE") {
            config.default_items_per_page = match raw.trim().parse::<u64>() {
                Ok(n) if n >= 2 => n,
                _ => {
                    return Err(ConfigError::invalid(
                        "DEFAULT_ITEMS_PER_PAGE",
                        format!("expected an integer >= 2, got {raw:?}"),
                    ));
                }
            };
        }

        Ok(config)
    }
}

fn normalize_base(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

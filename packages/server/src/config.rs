//! Server configuration loaded from environment variables.

use std::str::FromStr;
use std::time::Duration;

use actix_web::http::Uri;

/// Default service name reported by the root endpoint.
pub const DEFAULT_APP_NAME: &str = "Heatmap Analysis System";

/// Errors produced while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable was set to a value that could not be used.
    #[error("Invalid value {value:?} for {key}: {message}")]
    Invalid {
        /// Environment variable name.
        key: &'static str,
        /// Raw value that was rejected.
        value: String,
        /// Why it was rejected.
        message: String,
    },
}

/// Runtime settings for the HTTP server and push ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Service name returned by `GET /`.
    pub app_name: String,
    /// Address to bind.
    pub bind_addr: String,
    /// Port to bind.
    pub port: u16,
    /// Enables debug-level logging when `RUST_LOG` is unset.
    pub debug: bool,
    /// Time between realtime pushes.
    pub push_interval: Duration,
    /// Maximum number of points per realtime push.
    pub push_point_limit: usize,
    /// Allowed CORS origins. A single `"*"` allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            bind_addr: "0.0.0.0".to_string(),
            port: 8000,
            debug: true,
            push_interval: Duration::from_secs(2),
            push_point_limit: 100,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
            ],
        }
    }
}

impl ServerConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if any variable is set but cannot be
    /// parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, falling back to
    /// [`ServerConfig::default`] for unset variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if any variable is set but cannot be
    /// parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let push_interval_secs: u64 = parse_or(&lookup, "PUSH_INTERVAL_SECS", 2)?;
        if push_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "PUSH_INTERVAL_SECS",
                value: "0".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        let debug = match lookup("DEBUG") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::Invalid {
                key: "DEBUG",
                value: raw.clone(),
                message: "expected a boolean".to_string(),
            })?,
            None => defaults.debug,
        };

        let cors_origins = match lookup("CORS_ORIGINS") {
            Some(raw) => parse_origins(&raw)?,
            None => defaults.cors_origins,
        };

        Ok(Self {
            app_name: lookup("APP_NAME").unwrap_or(defaults.app_name),
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            debug,
            push_interval: Duration::from_secs(push_interval_secs),
            push_point_limit: parse_or(&lookup, "PUSH_POINT_LIMIT", defaults.push_point_limit)?,
            cors_origins,
        })
    }

    /// Whether CORS should accept any origin.
    #[must_use]
    pub fn cors_permissive(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw.clone(),
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Result<Vec<String>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|origin| {
            if origin == "*" {
                return Ok(origin.to_string());
            }
            let valid = origin
                .parse::<Uri>()
                .is_ok_and(|uri| uri.scheme().is_some() && uri.host().is_some());
            if valid {
                Ok(origin.to_string())
            } else {
                Err(ConfigError::Invalid {
                    key: "CORS_ORIGINS",
                    value: origin.to_string(),
                    message: "expected an origin like http://host:port".to_string(),
                })
            }
        })
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

//! Startup configuration resolved from the environment.

use std::env;

use secrecy::SecretString;

use crate::domain::ConfigError;

/// Exporter configuration, resolved once before the listener binds.
///
/// Missing credentials or malformed values are fatal: the process must
/// not start serving scrapes it can never answer.
#[derive(Debug)]
pub struct ExporterConfig {
    pub api_key: SecretString,
    pub api_secret: SecretString,
    /// Value of the `job` label on every exported record.
    pub job: String,
    pub port: u16,
    pub log_level: String,
    pub api_endpoint: String,
}

impl ExporterConfig {
    /// Read configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = require("BINANCE_KEY")?;
        let api_secret = require("BINANCE_SECRET")?;

        let job = env::var("BINANCE_EXPORTER_NAME")
            .unwrap_or_else(|_| "binance-exporter".to_string());
        let port = parse_port(
            &env::var("BINANCE_EXPORTER_PORT").unwrap_or_else(|_| "8123".to_string()),
        )?;
        let log_level = parse_level(
            &env::var("BINANCE_EXPORTER_LOGLEVEL").unwrap_or_else(|_| "info".to_string()),
        )?;
        let api_endpoint = env::var("BINANCE_API_ENDPOINT")
            .unwrap_or_else(|_| "https://api.binance.com".to_string());

        Ok(Self {
            api_key: SecretString::from(api_key),
            api_secret: SecretString::from(api_secret),
            job,
            port,
            log_level,
            api_endpoint,
        })
    }
}

fn require(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidValue {
        key: "BINANCE_EXPORTER_PORT".to_string(),
        message: format!("'{raw}' is not a valid port"),
    })
}

fn parse_level(raw: &str) -> Result<String, ConfigError> {
    raw.parse::<tracing::Level>()
        .map(|level| level.to_string().to_lowercase())
        .map_err(|_| ConfigError::InvalidValue {
            key: "BINANCE_EXPORTER_LOGLEVEL".to_string(),
            message: format!("'{raw}' is not a valid log level"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    // from_env itself is not exercised here: std::env::set_var is unsafe
    // in Rust 2024 edition, so the parsing helpers are tested directly.

    #[test]
    fn test_parse_port_valid() {
        assert_eq!(parse_port("8123").unwrap(), 8123);
        assert_eq!(parse_port("80").unwrap(), 80);
    }

    #[test]
    fn test_parse_port_invalid() {
        assert!(parse_port("not-a-port").is_err());
        assert!(parse_port("70000").is_err());
        assert!(parse_port("").is_err());
    }

    #[test]
    fn test_parse_level_valid() {
        assert_eq!(parse_level("info").unwrap(), "info");
        assert_eq!(parse_level("DEBUG").unwrap(), "debug");
        assert_eq!(parse_level("Warn").unwrap(), "warn");
    }

    #[test]
    fn test_parse_level_invalid() {
        let err = parse_level("loud").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { key, .. } if key == "BINANCE_EXPORTER_LOGLEVEL"
        ));
    }
}

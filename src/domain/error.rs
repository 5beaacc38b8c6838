//! Exporter error types with proper error chaining.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },
    #[error("Request to {endpoint} timed out: {message}")]
    Timeout { endpoint: String, message: String },
    #[error("Exchange returned {status} for {endpoint}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    #[error("Server time sync failed: {0}")]
    ClockSync(String),
}

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Invalid JSON from {endpoint}: {message}")]
    Json { endpoint: String, message: String },
    #[error("Response from {endpoint} is missing field '{field}'")]
    MissingField { endpoint: String, field: String },
    #[error("Field '{field}' from {endpoint} is not numeric: {value}")]
    NotNumeric {
        endpoint: String,
        field: String,
        value: String,
    },
    #[error("Unexpected response shape from {endpoint}: {message}")]
    Shape { endpoint: String, message: String },
}

/// Top-level error for the collection pipeline.
///
/// Nothing is recovered locally; any variant reaching the scrape handler
/// terminates the process after the in-flight response is answered.
#[derive(Error, Debug)]
pub enum ExporterError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Exchange(#[from] ExchangeError),
    #[error(transparent)]
    Data(#[from] DataError),
}

impl ExporterError {
    /// Whether this error came from a non-2xx exchange response.
    #[must_use]
    pub fn is_status(&self) -> bool {
        matches!(self, ExporterError::Exchange(ExchangeError::Status { .. }))
    }
}

//! Mock implementations for testing.
//!
//! These mocks provide in-memory implementations of domain traits that
//! can be configured to simulate success, transport failures, and
//! exchange-side error statuses.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::{ExchangeApi, ExchangeError, ExporterError, HttpMethod};

/// Fixed server time returned by the mock clock.
pub const MOCK_SERVER_TIME: i64 = 1_700_000_000_000;

/// Configuration for mock behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// If true, signed calls fail with a transport error.
    pub should_fail: bool,
    /// Custom error message for failures.
    pub error_message: Option<String>,
    /// If set, signed calls fail with this HTTP status instead.
    pub fail_status: Option<(u16, String)>,
}

impl MockConfig {
    /// Creates a config that always succeeds.
    #[must_use]
    pub fn success() -> Self {
        Self::default()
    }

    /// Creates a config that fails every signed call at transport level.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            error_message: Some(message.into()),
            fail_status: None,
        }
    }

    /// Creates a config where the exchange answers with a non-2xx status.
    #[must_use]
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            error_message: None,
            fail_status: Some((status, body.into())),
        }
    }
}

/// Mock exchange API with canned responses per (method, endpoint).
///
/// # Example
///
/// ```
/// use binance_exporter::domain::HttpMethod;
/// use binance_exporter::test_utils::MockExchangeApi;
///
/// let mock = MockExchangeApi::new();
/// mock.respond(
///     HttpMethod::Post,
///     "/sapi/v3/asset/getUserAsset",
///     r#"[{"asset":"ETH","free":"2.3"}]"#,
/// );
/// ```
pub struct MockExchangeApi {
    responses: Mutex<HashMap<(HttpMethod, String), String>>,
    config: MockConfig,
    call_count: AtomicU64,
    calls: Mutex<Vec<(HttpMethod, String)>>,
}

impl MockExchangeApi {
    /// Creates a new mock with default (success) configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::success())
    }

    /// Creates a new mock with the given configuration.
    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            config,
            call_count: AtomicU64::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Creates a mock whose signed calls always fail at transport level.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig::failure(message))
    }

    /// Registers a canned response body for an endpoint.
    pub fn respond(&self, method: HttpMethod, endpoint: &str, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert((method, endpoint.to_string()), body.to_string());
    }

    /// Number of signed calls made so far.
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Every signed call made so far, in order.
    pub fn calls(&self) -> Vec<(HttpMethod, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockExchangeApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExchangeApi for MockExchangeApi {
    async fn server_time(&self) -> Result<i64, ExporterError> {
        if self.config.should_fail && self.config.fail_status.is_none() {
            let message = self
                .config
                .error_message
                .clone()
                .unwrap_or_else(|| "Mock clock failure".to_string());
            return Err(ExchangeError::ClockSync(message).into());
        }
        Ok(MOCK_SERVER_TIME)
    }

    async fn signed_call(
        &self,
        method: HttpMethod,
        endpoint: &str,
        _params: &[(&str, &str)],
    ) -> Result<String, ExporterError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.calls
            .lock()
            .unwrap()
            .push((method, endpoint.to_string()));

        if let Some((status, body)) = &self.config.fail_status {
            return Err(ExchangeError::Status {
                endpoint: endpoint.to_string(),
                status: *status,
                body: body.clone(),
            }
            .into());
        }
        if self.config.should_fail {
            let message = self
                .config
                .error_message
                .clone()
                .unwrap_or_else(|| "Mock transport failure".to_string());
            return Err(ExchangeError::Transport {
                endpoint: endpoint.to_string(),
                message,
            }
            .into());
        }

        self.responses
            .lock()
            .unwrap()
            .get(&(method, endpoint.to_string()))
            .cloned()
            .ok_or_else(|| {
                ExchangeError::Transport {
                    endpoint: endpoint.to_string(),
                    message: "no canned response registered".to_string(),
                }
                .into()
            })
    }
}

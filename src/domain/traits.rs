//! Domain traits defining contracts for external systems.

use async_trait::async_trait;

use super::error::ExporterError;
use super::types::HttpMethod;

/// Signed access to the exchange's private REST API.
///
/// The collector only ever talks to the exchange through this trait,
/// which keeps the normalization pipeline testable against canned
/// responses.
#[async_trait]
pub trait ExchangeApi: Send + Sync {
    /// Fetch the exchange's authoritative clock, milliseconds since epoch.
    ///
    /// There is no local fallback: a drifted timestamp would fail
    /// authentication on every subsequent signed call anyway.
    async fn server_time(&self) -> Result<i64, ExporterError>;

    /// Execute one signed call and return the raw JSON body.
    ///
    /// `params` are the endpoint's fixed parameters; the implementation
    /// adds the timestamp and signature. Any non-2xx response is an
    /// error carrying the response body.
    async fn signed_call(
        &self,
        method: HttpMethod,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<String, ExporterError>;
}

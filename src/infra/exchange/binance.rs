//! Signed REST client for the Binance private API.

use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::domain::{ExchangeApi, ExchangeError, ExporterError, HttpMethod};

use super::signer::{encode_query, sign_query};

use async_trait::async_trait;

/// Header carrying the API key on every private call.
const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// Unauthenticated endpoint serving the exchange's clock.
const TIME_ENDPOINT: &str = "/api/v3/time";

/// Configuration for the Binance REST client.
#[derive(Debug, Clone)]
pub struct BinanceApiConfig {
    pub base_url: String,
    /// Per-call timeout; bounds worst-case scrape latency.
    pub timeout: Duration,
}

impl Default for BinanceApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.binance.com".to_string(),
            timeout: Duration::from_secs(2),
        }
    }
}

/// Binance REST client implementing [`ExchangeApi`].
///
/// Every signed call fetches the server time first: the exchange rejects
/// requests whose declared timestamp drifts from its clock, and a local
/// wall clock cannot be trusted to stay within the window.
pub struct BinanceApi {
    http: Client,
    base_url: String,
    api_key: SecretString,
    api_secret: SecretString,
}

#[derive(Debug, Deserialize)]
struct ServerTime {
    #[serde(rename = "serverTime")]
    server_time: i64,
}

impl BinanceApi {
    /// Create a new client with custom configuration.
    pub fn new(
        config: BinanceApiConfig,
        api_key: SecretString,
        api_secret: SecretString,
    ) -> Result<Self, ExporterError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ExchangeError::Transport {
                endpoint: config.base_url.clone(),
                message: e.to_string(),
            })?;
        info!(base_url = %config.base_url, "Created exchange client");
        Ok(Self {
            http,
            base_url: config.base_url,
            api_key,
            api_secret,
        })
    }

    /// Create a new client with default configuration.
    pub fn with_defaults(
        api_key: SecretString,
        api_secret: SecretString,
    ) -> Result<Self, ExporterError> {
        Self::new(BinanceApiConfig::default(), api_key, api_secret)
    }

    /// Build the signed query for a call: timestamp first, then the
    /// endpoint's fixed parameters, then the signature over the whole
    /// encoded string.
    fn signed_query(&self, timestamp: i64, params: &[(&str, &str)]) -> String {
        let ts = timestamp.to_string();
        let mut all: Vec<(&str, &str)> = vec![("timestamp", ts.as_str())];
        all.extend_from_slice(params);
        let query = encode_query(&all);
        let signature = sign_query(&self.api_secret, &query);
        format!("{query}&signature={signature}")
    }

    fn map_send_error(endpoint: &str, e: &reqwest::Error) -> ExchangeError {
        if e.is_timeout() {
            ExchangeError::Timeout {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            }
        } else {
            ExchangeError::Transport {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl ExchangeApi for BinanceApi {
    #[instrument(skip(self))]
    async fn server_time(&self) -> Result<i64, ExporterError> {
        let url = format!("{}{}", self.base_url, TIME_ENDPOINT);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ExchangeError::ClockSync(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ExchangeError::ClockSync(format!(
                "status {}",
                response.status()
            ))
            .into());
        }
        let time: ServerTime = response
            .json()
            .await
            .map_err(|e| ExchangeError::ClockSync(e.to_string()))?;
        Ok(time.server_time)
    }

    #[instrument(skip(self, params))]
    async fn signed_call(
        &self,
        method: HttpMethod,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<String, ExporterError> {
        let timestamp = self.server_time().await?;
        let query = self.signed_query(timestamp, params);

        let request = match method {
            HttpMethod::Get => self.http.get(format!(
                "{}{}?{}",
                self.base_url, endpoint, query
            )),
            HttpMethod::Post => self.http.post(format!(
                "{}{}?{}",
                self.base_url, endpoint, query
            )),
            HttpMethod::PostForm => self
                .http
                .post(format!("{}{}", self.base_url, endpoint))
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(query),
        };

        let response = request
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .send()
            .await
            .map_err(|e| Self::map_send_error(endpoint, &e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Self::map_send_error(endpoint, &e))?;

        if !status.is_success() {
            return Err(ExchangeError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            }
            .into());
        }

        debug!(endpoint = %endpoint, body = %body, "Exchange call succeeded");
        Ok(body)
    }
}

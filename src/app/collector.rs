//! Wallet balance collection and normalization.
//!
//! Walks the metric catalog, issues one signed exchange call per entry,
//! and flattens the heterogeneous wallet responses into uniform records.

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, instrument};

use crate::domain::{
    CATALOG, DataError, ExchangeApi, ExporterError, MetricRecord, MetricSpec,
};

/// Field naming the instrument in every balance line item.
const ASSET_FIELD: &str = "asset";

/// Produces a fresh snapshot of wallet balance records on demand.
///
/// Constructed once at startup and handed to the exposition layer by
/// reference; holds no state between scrapes. Catalog entries are walked
/// strictly sequentially, and the first failure of any kind aborts the
/// whole snapshot.
pub struct WalletCollector {
    api: Arc<dyn ExchangeApi>,
    catalog: &'static [MetricSpec],
    job: String,
}

impl WalletCollector {
    /// Creates a collector over the full wallet catalog.
    #[must_use]
    pub fn new(api: Arc<dyn ExchangeApi>, job: impl Into<String>) -> Self {
        Self::with_catalog(api, CATALOG, job)
    }

    /// Creates a collector over a custom catalog.
    #[must_use]
    pub fn with_catalog(
        api: Arc<dyn ExchangeApi>,
        catalog: &'static [MetricSpec],
        job: impl Into<String>,
    ) -> Self {
        Self {
            api,
            catalog,
            job: job.into(),
        }
    }

    /// Collects one complete snapshot: one exchange call per catalog
    /// entry, one record per returned line item.
    ///
    /// Output order is deterministic: catalog order, then response order.
    ///
    /// # Errors
    ///
    /// Any transport failure, non-2xx status, or unexpected response
    /// shape fails the entire snapshot; no partial result is returned.
    #[instrument(skip(self))]
    pub async fn collect_snapshot(&self) -> Result<Vec<MetricRecord>, ExporterError> {
        let mut records = Vec::new();
        for spec in self.catalog {
            let body = self
                .api
                .signed_call(spec.method, spec.endpoint, spec.query)
                .await?;
            self.normalize(spec, &body, &mut records)?;
        }
        info!(records = records.len(), "Collected wallet snapshot");
        Ok(records)
    }

    /// Flatten one endpoint response into records.
    fn normalize(
        &self,
        spec: &MetricSpec,
        body: &str,
        records: &mut Vec<MetricRecord>,
    ) -> Result<(), ExporterError> {
        let parsed: Value = serde_json::from_str(body).map_err(|e| DataError::Json {
            endpoint: spec.endpoint.to_string(),
            message: e.to_string(),
        })?;

        let items = match spec.unwrap_key {
            Some(key) => parsed
                .get(key)
                .ok_or_else(|| DataError::MissingField {
                    endpoint: spec.endpoint.to_string(),
                    field: key.to_string(),
                })?
                .as_array()
                .ok_or_else(|| DataError::Shape {
                    endpoint: spec.endpoint.to_string(),
                    message: format!("'{key}' is not an array"),
                })?,
            None => parsed.as_array().ok_or_else(|| DataError::Shape {
                endpoint: spec.endpoint.to_string(),
                message: "expected a top-level array".to_string(),
            })?,
        };

        for item in items {
            let asset = item
                .get(ASSET_FIELD)
                .ok_or_else(|| DataError::MissingField {
                    endpoint: spec.endpoint.to_string(),
                    field: ASSET_FIELD.to_string(),
                })?
                .as_str()
                .ok_or_else(|| DataError::Shape {
                    endpoint: spec.endpoint.to_string(),
                    message: format!("'{ASSET_FIELD}' is not a string"),
                })?;

            let raw = item
                .get(spec.value_field)
                .ok_or_else(|| DataError::MissingField {
                    endpoint: spec.endpoint.to_string(),
                    field: spec.value_field.to_string(),
                })?;
            let value = parse_amount(spec, raw)?;

            let mut labels = vec![
                ("job".to_string(), self.job.clone()),
                (ASSET_FIELD.to_string(), asset.to_string()),
            ];
            labels.extend(
                spec.labels
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string())),
            );

            records.push(MetricRecord {
                name: spec.name,
                help: spec.help,
                value_kind: spec.value_kind,
                value,
                labels,
            });
        }

        Ok(())
    }
}

/// Binance reports amounts as decimal strings; plain numbers are also
/// accepted. Anything else fails the snapshot.
fn parse_amount(spec: &MetricSpec, raw: &Value) -> Result<f64, DataError> {
    match raw {
        Value::String(s) => s.parse().map_err(|_| DataError::NotNumeric {
            endpoint: spec.endpoint.to_string(),
            field: spec.value_field.to_string(),
            value: s.clone(),
        }),
        Value::Number(n) => n.as_f64().ok_or_else(|| DataError::NotNumeric {
            endpoint: spec.endpoint.to_string(),
            field: spec.value_field.to_string(),
            value: n.to_string(),
        }),
        other => Err(DataError::NotNumeric {
            endpoint: spec.endpoint.to_string(),
            field: spec.value_field.to_string(),
            value: other.to_string(),
        }),
    }
}

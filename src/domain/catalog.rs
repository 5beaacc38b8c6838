//! The static metric catalog: one entry per wallet data source.
//!
//! Pure data, deliberately separate from the collector so an entry can be
//! added or unit-tested without touching the normalization logic.

use super::types::{HttpMethod, MetricSpec, ValueKind};

/// Every wallet source scraped per collection cycle, in output order.
///
/// The two earn entries share one metric family and are told apart by
/// their `type` label. Simple-earn position endpoints wrap their line
/// items in a `rows` object; the asset endpoints return a bare array.
pub const CATALOG: &[MetricSpec] = &[
    MetricSpec {
        name: "binance_earn_wallet",
        help: "Binance Earn Wallet",
        value_kind: ValueKind::Gauge,
        value_field: "totalAmount",
        method: HttpMethod::Get,
        endpoint: "/sapi/v1/simple-earn/flexible/position",
        query: &[],
        labels: &[("type", "flexible")],
        unwrap_key: Some("rows"),
    },
    MetricSpec {
        name: "binance_earn_wallet",
        help: "Binance Earn Wallet",
        value_kind: ValueKind::Gauge,
        value_field: "amount",
        method: HttpMethod::Get,
        endpoint: "/sapi/v1/simple-earn/locked/position",
        query: &[],
        labels: &[("type", "locked")],
        unwrap_key: Some("rows"),
    },
    MetricSpec {
        name: "binance_funding_wallet",
        help: "Binance Funding Wallet",
        value_kind: ValueKind::Gauge,
        value_field: "free",
        method: HttpMethod::Post,
        endpoint: "/sapi/v1/asset/get-funding-asset",
        query: &[],
        labels: &[],
        unwrap_key: None,
    },
    MetricSpec {
        name: "binance_spot_wallet",
        help: "Binance Spot Wallet",
        value_kind: ValueKind::Gauge,
        value_field: "free",
        method: HttpMethod::Post,
        endpoint: "/sapi/v3/asset/getUserAsset",
        query: &[],
        labels: &[],
        unwrap_key: None,
    },
];

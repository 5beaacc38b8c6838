//! Binance Wallet Exporter
//!
//! A Prometheus exporter that signs requests against Binance's private
//! REST API, collects account balances from the earn, funding, and spot
//! wallets, and serves them in the text exposition format.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                  API Layer                   │
//! │   GET /metrics, exposition text rendering    │
//! ├─────────────────────────────────────────────┤
//! │              Application Layer               │
//! │   catalog walk, response normalization       │
//! ├─────────────────────────────────────────────┤
//! │                Domain Layer                  │
//! │   metric catalog, traits, types, errors      │
//! ├─────────────────────────────────────────────┤
//! │            Infrastructure Layer              │
//! │   signed Binance REST client, HMAC signer    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Key Properties
//!
//! - **Declarative catalog**: each wallet source is one data entry; the
//!   collector never special-cases an endpoint
//! - **Fresh per scrape**: every scrape performs a full round of signed
//!   exchange calls; nothing is cached between scrapes
//! - **Fail fast**: any transport, protocol, or data-shape error tears
//!   the process down rather than serving a partial snapshot
//! - **Testability**: the exchange sits behind a trait; mocks drive the
//!   whole pipeline in tests
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use binance_exporter::api::create_router;
//! use binance_exporter::app::{AppState, WalletCollector};
//! use binance_exporter::infra::BinanceApi;
//!
//! let api = Arc::new(BinanceApi::with_defaults(key, secret)?);
//! let collector = Arc::new(WalletCollector::new(api.clone(), "binance-exporter"));
//! let state = Arc::new(AppState::new(collector, api, shutdown_tx));
//! let router = create_router(state);
//! axum::serve(listener, router).await?;
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod domain;
pub mod infra;
pub mod test_utils;

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use dotenvy::dotenv;
use tokio::sync::watch;
use tracing::info;

use binance_exporter::api::{RateLimitConfig, create_router_with_rate_limit};
use binance_exporter::app::{AppState, WalletCollector};
use binance_exporter::config::ExporterConfig;
use binance_exporter::domain::ExchangeApi;
use binance_exporter::infra::observability::init_tracing;
use binance_exporter::infra::{BinanceApi, BinanceApiConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = ExporterConfig::from_env()?;
    init_tracing(&config.log_level).context("failed to install tracing subscriber")?;

    let api_config = BinanceApiConfig {
        base_url: config.api_endpoint.clone(),
        ..BinanceApiConfig::default()
    };
    let api: Arc<dyn ExchangeApi> = Arc::new(BinanceApi::new(
        api_config,
        config.api_key,
        config.api_secret,
    )?);

    let collector = Arc::new(WalletCollector::new(Arc::clone(&api), config.job.clone()));

    // The scrape handler flips this on any collection failure; the server
    // drains and the process exits nonzero for the supervisor to restart.
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let state = Arc::new(AppState::new(collector, api, shutdown_tx.clone()));
    let router = create_router_with_rate_limit(state, &RateLimitConfig::from_env());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(port = config.port, job = %config.job, "Starting Binance exporter");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Received interrupt, shutting down");
                }
                _ = shutdown_rx.changed() => {}
            }
        })
        .await?;

    if *shutdown_tx.borrow() {
        bail!("collection pipeline failed; exiting so the supervisor restarts the exporter");
    }
    Ok(())
}

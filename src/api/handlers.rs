//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use tracing::{error, warn};

use crate::app::AppState;

use super::exposition;

/// Serve one scrape: exactly one fresh collection cycle per request.
///
/// A failed collection answers the in-flight request with 500 and then
/// signals process shutdown; the exporter never serves a partial or
/// stale snapshot.
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.collector.collect_snapshot().await {
        Ok(records) => {
            let body = exposition::render(&records);
            (
                [(header::CONTENT_TYPE, exposition::CONTENT_TYPE)],
                body,
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Snapshot collection failed, shutting down");
            state.request_shutdown();
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("snapshot collection failed: {e}\n"),
            )
                .into_response()
        }
    }
}

/// The root path points scrapers at the exposition endpoint.
pub async fn root_handler() -> Redirect {
    Redirect::to("/metrics")
}

/// Liveness probe.
pub async fn liveness_handler() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe: the exporter is ready when the exchange clock is
/// reachable, since every signed call starts with a time sync.
pub async fn readiness_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    match state.api.server_time().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

//! Application state management.
//!
//! This module provides the shared application state that is accessible
//! to all request handlers via Axum's State extractor.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::error;

use crate::domain::ExchangeApi;

use super::collector::WalletCollector;

/// Shared state for the exposition server.
///
/// Holds the injected collector (the process-wide singleton registry of
/// the original design, re-architected as an explicit object) and the
/// shutdown handle used to honor the fail-fast policy from request
/// handlers without burying an exit call in the pipeline.
#[derive(Clone)]
pub struct AppState {
    /// Produces a fresh wallet snapshot per scrape.
    pub collector: Arc<WalletCollector>,

    /// Exchange client, used directly by the readiness probe.
    pub api: Arc<dyn ExchangeApi>,

    shutdown: watch::Sender<bool>,
}

impl AppState {
    /// Creates a new `AppState` instance.
    #[must_use]
    pub fn new(
        collector: Arc<WalletCollector>,
        api: Arc<dyn ExchangeApi>,
        shutdown: watch::Sender<bool>,
    ) -> Self {
        Self {
            collector,
            api,
            shutdown,
        }
    }

    /// Signal the process to shut down after the current responses drain.
    pub fn request_shutdown(&self) {
        if self.shutdown.send(true).is_err() {
            // Receiver already gone; the process is exiting anyway.
            error!("Shutdown receiver dropped before shutdown was requested");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockExchangeApi;

    fn test_state() -> (AppState, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        let api: Arc<dyn ExchangeApi> = Arc::new(MockExchangeApi::new());
        let collector = Arc::new(WalletCollector::new(Arc::clone(&api), "test"));
        (AppState::new(collector, api, tx), rx)
    }

    #[test]
    fn test_request_shutdown_signals_receiver() {
        let (state, rx) = test_state();
        assert!(!*rx.borrow());

        state.request_shutdown();
        assert!(*rx.borrow());
    }

    #[test]
    fn test_app_state_is_clone() {
        let (state, rx) = test_state();
        let cloned = state.clone();

        cloned.request_shutdown();
        assert!(*rx.borrow());
        assert!(Arc::ptr_eq(&state.collector, &cloned.collector));
    }
}

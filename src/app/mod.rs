//! Application layer containing the collection pipeline and shared state.

pub mod collector;
pub mod state;

pub use collector::WalletCollector;
pub use state::AppState;

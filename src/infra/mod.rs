//! Infrastructure layer implementations.

pub mod exchange;
pub mod observability;

pub use exchange::{BinanceApi, BinanceApiConfig};

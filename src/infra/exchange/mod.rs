//! Exchange client implementations.

pub mod binance;
pub mod signer;

pub use binance::{BinanceApi, BinanceApiConfig};

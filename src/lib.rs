// Core modules
pub mod config;
pub mod error;
pub mod execution;
pub mod feeds;
pub mod indicators;
pub mod models;
pub mod orders;
pub mod ports;
pub mod scanner;

// Re-export commonly used types
pub use error::{Error, Result};
pub use models::*;
pub use orders::{OrderIntent, OrderKind, OrderRequest, OrderRequestBuilder, OrderResult, Side};
pub use ports::{ExecutionPort, MarketDataPort};
pub use scanner::{ScanConfig, SignalScanner};

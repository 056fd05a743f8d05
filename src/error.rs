use thiserror::Error;

/// Errors produced by the signal and order pipeline.
///
/// Data-fetch errors (`NoData`, `NoOrderBook`, `Timeout`, `SymbolNotFound`) are recoverable
/// per symbol during a scan. `InvalidOrder` is raised before any I/O happens.
#[derive(Error, Debug)]
pub enum Error {
    #[error("No candle data available for {0}")]
    NoData(String),

    #[error("No order book available for {0}")]
    NoOrderBook(String),

    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    #[error("Order rejected by exchange: {0}")]
    ExchangeRejected(String),

    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid timeframe: {0}")]
    InvalidTimeframe(String),

    #[error("Request timed out after {millis}ms: {operation}")]
    Timeout { operation: String, millis: u64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for failures that should only drop the affected symbol from a scan.
    pub fn is_per_symbol(&self) -> bool {
        matches!(
            self,
            Error::NoData(_)
                | Error::NoOrderBook(_)
                | Error::SymbolNotFound(_)
                | Error::Timeout { .. }
        )
    }
}

impl From<::config::ConfigError> for Error {
    fn from(err: ::config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

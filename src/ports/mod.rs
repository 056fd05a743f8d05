// Interfaces to the exchange: market data in, orders out
pub mod execution;
pub mod market_data;
pub mod throttled;

pub use execution::ExecutionPort;
pub use market_data::MarketDataPort;
pub use throttled::ThrottledMarketData;

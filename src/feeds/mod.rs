// Offline market data sources
pub mod snapshot;
pub mod synthetic;

pub use snapshot::{SnapshotMarketData, SymbolSnapshot};
pub use synthetic::{MarketScenario, SyntheticDataGenerator, SyntheticMarketData};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::{Candle, OrderBookSnapshot, Ticker, Timeframe};
use crate::ports::MarketDataPort;

/// Recorded market state for one symbol
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymbolSnapshot {
    #[serde(default)]
    pub candles: Vec<Candle>,
    #[serde(default)]
    pub order_book: Option<OrderBookSnapshot>,
    /// Falls back to the last candle close when absent
    #[serde(default)]
    pub ticker: Option<f64>,
}

/// Replays a recorded market from JSON
///
/// The file maps symbols to their state:
///
/// ```json
/// {
///   "XBTUSDTM": {
///     "candles": [{"timestamp": "2024-03-01T00:00:00Z", "open": 1.0, "high": 1.0,
///                  "low": 1.0, "close": 1.0, "volume": 1.0}],
///     "order_book": {"bids": [{"price": 1.0, "size": 2.0}], "asks": []},
///     "ticker": 1.0
///   }
/// }
/// ```
///
/// Candles are served as recorded, whatever timeframe is requested.
#[derive(Debug, Clone, Default)]
pub struct SnapshotMarketData {
    symbols: BTreeMap<String, SymbolSnapshot>,
}

impl SnapshotMarketData {
    pub fn new(symbols: BTreeMap<String, SymbolSnapshot>) -> Self {
        Self { symbols }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let symbols: BTreeMap<String, SymbolSnapshot> = serde_json::from_str(json)?;
        Ok(Self::new(symbols))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let feed = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            symbols = feed.symbols.len(),
            "Loaded market snapshot"
        );
        Ok(feed)
    }

    fn get(&self, symbol: &str) -> Result<&SymbolSnapshot> {
        self.symbols
            .get(symbol)
            .ok_or_else(|| Error::SymbolNotFound(symbol.to_string()))
    }
}

#[async_trait]
impl MarketDataPort for SnapshotMarketData {
    async fn fetch_candles(&self, symbol: &str, _timeframe: Timeframe) -> Result<Vec<Candle>> {
        let snapshot = self.get(symbol)?;
        if snapshot.candles.is_empty() {
            return Err(Error::NoData(symbol.to_string()));
        }
        Ok(snapshot.candles.clone())
    }

    async fn fetch_order_book(&self, symbol: &str, depth: usize) -> Result<OrderBookSnapshot> {
        self.get(symbol)?
            .order_book
            .clone()
            .map(|book| book.truncated(depth))
            .ok_or_else(|| Error::NoOrderBook(symbol.to_string()))
    }

    async fn fetch_ticker(&self, symbol: &str) -> Result<Ticker> {
        let snapshot = self.get(symbol)?;
        let last = snapshot
            .ticker
            .or_else(|| snapshot.candles.last().map(|c| c.close))
            .ok_or_else(|| Error::NoData(symbol.to_string()))?;
        Ok(Ticker {
            symbol: symbol.to_string(),
            last,
        })
    }

    async fn list_symbols(&self) -> Result<Vec<String>> {
        Ok(self.symbols.keys().cloned().collect())
    }

    fn name(&self) -> &str {
        "snapshot"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "ETHUSDTM": {
            "candles": [
                {"timestamp": "2024-03-01T00:00:00Z", "open": 10.0, "high": 11.0, "low": 9.0, "close": 10.5, "volume": 3.0},
                {"timestamp": "2024-03-01T00:15:00Z", "open": 10.5, "high": 12.0, "low": 10.0, "close": 11.5, "volume": 4.0}
            ],
            "order_book": {
                "bids": [{"price": 11.4, "size": 2.0}, {"price": 11.3, "size": 3.0}],
                "asks": [{"price": 11.6, "size": 1.0}]
            }
        },
        "XBTUSDTM": {"candles": [], "ticker": 65000.0}
    }"#;

    #[tokio::test]
    async fn test_replays_recorded_state() {
        let feed = SnapshotMarketData::from_json(SNAPSHOT).unwrap();

        assert_eq!(feed.list_symbols().await.unwrap(), vec!["ETHUSDTM", "XBTUSDTM"]);

        let candles = feed.fetch_candles("ETHUSDTM", Timeframe::Hour4).await.unwrap();
        assert_eq!(candles.len(), 2);

        // No recorded ticker: last close
        assert_eq!(feed.fetch_ticker("ETHUSDTM").await.unwrap().last, 11.5);
        assert_eq!(feed.fetch_ticker("XBTUSDTM").await.unwrap().last, 65000.0);

        let book = feed.fetch_order_book("ETHUSDTM", 1).await.unwrap();
        assert_eq!(book.bids.len(), 1);
        assert_eq!(book.asks.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_data_errors() {
        let feed = SnapshotMarketData::from_json(SNAPSHOT).unwrap();

        assert!(matches!(
            feed.fetch_candles("XBTUSDTM", Timeframe::Minute15).await,
            Err(Error::NoData(_))
        ));
        assert!(matches!(
            feed.fetch_order_book("XBTUSDTM", 100).await,
            Err(Error::NoOrderBook(_))
        ));
        assert!(matches!(
            feed.fetch_ticker("DOGEUSDTM").await,
            Err(Error::SymbolNotFound(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            SnapshotMarketData::from_json("{\"X\": 1}"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = SnapshotMarketData::from_path("/definitely/not/here.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}

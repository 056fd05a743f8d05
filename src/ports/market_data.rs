use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{Candle, OrderBookSnapshot, Ticker, Timeframe};

/// Source of exchange market data.
///
/// Implementations wrap an exchange client for one account. All methods may
/// be called concurrently for different symbols.
#[async_trait]
pub trait MarketDataPort: Send + Sync {
    /// Fetch OHLCV candles, oldest first.
    ///
    /// Fails with `NoData` when the exchange returns no candles.
    async fn fetch_candles(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<Candle>>;

    /// Fetch the top `depth` levels of each side of the book.
    ///
    /// Fails with `NoOrderBook` when the book is unavailable.
    async fn fetch_order_book(&self, symbol: &str, depth: usize) -> Result<OrderBookSnapshot>;

    /// Fetch the latest traded price.
    async fn fetch_ticker(&self, symbol: &str) -> Result<Ticker>;

    /// List every tradable symbol.
    async fn list_symbols(&self) -> Result<Vec<String>>;

    /// Get the source name.
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: MarketDataPort + ?Sized> MarketDataPort for Arc<T> {
    async fn fetch_candles(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<Candle>> {
        (**self).fetch_candles(symbol, timeframe).await
    }

    async fn fetch_order_book(&self, symbol: &str, depth: usize) -> Result<OrderBookSnapshot> {
        (**self).fetch_order_book(symbol, depth).await
    }

    async fn fetch_ticker(&self, symbol: &str) -> Result<Ticker> {
        (**self).fetch_ticker(symbol).await
    }

    async fn list_symbols(&self) -> Result<Vec<String>> {
        (**self).list_symbols().await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

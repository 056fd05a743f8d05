// Market scanner: RSI extremes enriched with order book imbalance
pub mod config;

pub use config::{classify_rsi, RsiThresholds, ScanConfig};

use futures::stream::{self, StreamExt};

use crate::error::Result;
use crate::indicators::{compute_frame, order_book_imbalance, support_resistance};
use crate::models::Signal;
use crate::ports::MarketDataPort;

/// Scans a symbol universe for RSI extremes
///
/// Each symbol is analysed independently. A failure for one symbol is logged
/// and the symbol is left out; it never aborts the scan. The order of the
/// returned signals is unspecified.
pub struct SignalScanner<P> {
    market: P,
    config: ScanConfig,
}

impl<P: MarketDataPort> SignalScanner<P> {
    pub fn new(market: P, config: ScanConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { market, config })
    }

    /// Scan every tradable symbol
    ///
    /// Only a failure to list the symbol universe is returned as an error.
    pub async fn scan(&self) -> Result<Vec<Signal>> {
        let symbols = self.market.list_symbols().await?;
        Ok(self.scan_symbols(&symbols).await)
    }

    /// Scan the given symbols
    pub async fn scan_symbols(&self, symbols: &[String]) -> Vec<Signal> {
        tracing::info!(
            source = self.market.name(),
            symbols = symbols.len(),
            timeframe = %self.config.timeframe,
            "Starting scan"
        );

        let outcomes: Vec<(&String, Result<Option<Signal>>)> = stream::iter(symbols)
            .map(|symbol| async move { (symbol, self.analyze_symbol(symbol).await) })
            .buffer_unordered(self.config.concurrency)
            .collect()
            .await;

        let mut signals = Vec::new();
        let mut skipped = 0usize;

        for (symbol, outcome) in outcomes {
            match outcome {
                Ok(Some(signal)) => signals.push(signal),
                Ok(None) => {}
                Err(e) if e.is_per_symbol() => {
                    skipped += 1;
                    tracing::warn!(symbol = %symbol, error = %e, "Skipping symbol");
                }
                Err(e) => {
                    skipped += 1;
                    tracing::error!(symbol = %symbol, error = %e, "Skipping symbol after unexpected error");
                }
            }
        }

        tracing::info!(
            scanned = symbols.len(),
            signals = signals.len(),
            skipped,
            "Scan complete"
        );

        signals
    }

    /// Run the full pipeline for one symbol
    ///
    /// Returns `Ok(None)` when the symbol is not in an RSI extreme or does not
    /// have enough candles for an RSI value yet.
    pub async fn analyze_symbol(&self, symbol: &str) -> Result<Option<Signal>> {
        let (candles, ticker) = tokio::try_join!(
            self.market.fetch_candles(symbol, self.config.timeframe),
            self.market.fetch_ticker(symbol),
        )?;

        let frame = compute_frame(symbol, &candles, &self.config.indicators)?;

        let Some(latest_rsi) = frame.latest_rsi() else {
            tracing::debug!(
                symbol,
                candles = candles.len(),
                "Not enough candles for RSI"
            );
            return Ok(None);
        };

        let levels = support_resistance(&frame);

        let Some(zone) = self.config.thresholds.classify(latest_rsi) else {
            return Ok(None);
        };

        let book = match self
            .market
            .fetch_order_book(symbol, self.config.order_book_depth)
            .await
        {
            Ok(book) => Some(book.truncated(self.config.order_book_depth)),
            Err(e) => {
                tracing::warn!(symbol, error = %e, "Order book unavailable");
                None
            }
        };
        let imbalance = order_book_imbalance(book.as_ref()).ok();

        tracing::info!(
            symbol,
            %zone,
            rsi = latest_rsi,
            imbalance = ?imbalance,
            price = ticker.last,
            "RSI extreme"
        );

        Ok(Some(Signal {
            symbol: symbol.to_string(),
            zone,
            latest_rsi,
            order_book_imbalance: imbalance,
            current_price: ticker.last,
            support: levels.map(|l| l.support),
            resistance: levels.map(|l| l.resistance),
            rsi_history: frame.rsi,
        }))
    }
}

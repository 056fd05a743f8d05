use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use std::future::Future;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use super::MarketDataPort;
use crate::error::{Error, Result};
use crate::models::{Candle, OrderBookSnapshot, Ticker, Timeframe};

// Type alias for the rate limiter to simplify signatures
type ExchangeRateLimiter = RateLimiter<
    governor::state::direct::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Rate-limited market data with a per-request timeout
///
/// Every request waits on a shared limiter before it is sent, so concurrent
/// scans stay within the exchange's request budget. This struct is cloneable;
/// all clones share the same limiter.
#[derive(Clone)]
pub struct ThrottledMarketData<P> {
    inner: P,
    rate_limiter: Arc<ExchangeRateLimiter>,
    timeout: Duration,
}

impl<P: MarketDataPort> ThrottledMarketData<P> {
    pub fn new(inner: P, requests_per_second: u32, timeout: Duration) -> Result<Self> {
        let rate = NonZeroU32::new(requests_per_second).ok_or_else(|| {
            Error::InvalidParameter("requests_per_second must be positive".to_string())
        })?;
        if timeout.is_zero() {
            return Err(Error::InvalidParameter("timeout must be positive".to_string()));
        }

        Ok(Self {
            inner,
            rate_limiter: Arc::new(RateLimiter::direct(Quota::per_second(rate))),
            timeout,
        })
    }

    async fn guarded<T, F>(&self, operation: String, request: F) -> Result<T>
    where
        F: Future<Output = Result<T>> + Send,
    {
        self.rate_limiter.until_ready().await;

        match tokio::time::timeout(self.timeout, request).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    source = self.inner.name(),
                    %operation,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Market data request timed out"
                );
                Err(Error::Timeout {
                    operation,
                    millis: self.timeout.as_millis() as u64,
                })
            }
        }
    }
}

#[async_trait]
impl<P: MarketDataPort> MarketDataPort for ThrottledMarketData<P> {
    async fn fetch_candles(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<Candle>> {
        self.guarded(
            format!("candles {} {}", symbol, timeframe),
            self.inner.fetch_candles(symbol, timeframe),
        )
        .await
    }

    async fn fetch_order_book(&self, symbol: &str, depth: usize) -> Result<OrderBookSnapshot> {
        self.guarded(
            format!("order book {}", symbol),
            self.inner.fetch_order_book(symbol, depth),
        )
        .await
    }

    async fn fetch_ticker(&self, symbol: &str) -> Result<Ticker> {
        self.guarded(format!("ticker {}", symbol), self.inner.fetch_ticker(symbol))
            .await
    }

    async fn list_symbols(&self) -> Result<Vec<String>> {
        self.guarded("symbols".to_string(), self.inner.list_symbols())
            .await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[derive(Clone)]
    struct SlowTicker {
        delay: Duration,
    }

    #[async_trait]
    impl MarketDataPort for SlowTicker {
        async fn fetch_candles(&self, _symbol: &str, _timeframe: Timeframe) -> Result<Vec<Candle>> {
            Ok(vec![Candle {
                timestamp: Utc::now(),
                open: 1.0,
                high: 1.0,
                low: 1.0,
                close: 1.0,
                volume: 0.0,
            }])
        }

        async fn fetch_order_book(&self, symbol: &str, _depth: usize) -> Result<OrderBookSnapshot> {
            Err(Error::NoOrderBook(symbol.to_string()))
        }

        async fn fetch_ticker(&self, symbol: &str) -> Result<Ticker> {
            tokio::time::sleep(self.delay).await;
            Ok(Ticker {
                symbol: symbol.to_string(),
                last: 42.0,
            })
        }

        async fn list_symbols(&self) -> Result<Vec<String>> {
            Ok(vec!["BTCUSDTM".to_string()])
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    #[test]
    fn test_zero_rate_rejected() {
        let port = SlowTicker {
            delay: Duration::ZERO,
        };
        let result = ThrottledMarketData::new(port, 0, Duration::from_secs(1));
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[tokio::test]
    async fn test_passes_through_results_and_errors() {
        let port = SlowTicker {
            delay: Duration::ZERO,
        };
        let throttled = ThrottledMarketData::new(port, 100, Duration::from_secs(1)).unwrap();

        let ticker = throttled.fetch_ticker("BTCUSDTM").await.unwrap();
        assert_eq!(ticker.last, 42.0);

        let candles = throttled
            .fetch_candles("BTCUSDTM", Timeframe::Minute15)
            .await
            .unwrap();
        assert_eq!(candles.len(), 1);

        let book = throttled.fetch_order_book("BTCUSDTM", 100).await;
        assert!(matches!(book, Err(Error::NoOrderBook(_))));
        assert_eq!(throttled.name(), "slow");
    }

    #[tokio::test]
    async fn test_slow_request_times_out() {
        let port = SlowTicker {
            delay: Duration::from_secs(5),
        };
        let throttled = ThrottledMarketData::new(port, 100, Duration::from_millis(50)).unwrap();

        let result = throttled.fetch_ticker("ETHUSDTM").await;
        match result {
            Err(Error::Timeout { operation, millis }) => {
                assert_eq!(millis, 50);
                assert!(operation.contains("ETHUSDTM"));
            }
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_clones_share_one_budget() {
        let port = SlowTicker {
            delay: Duration::ZERO,
        };
        // burst of 4, then one request every 250ms
        let first = ThrottledMarketData::new(port, 4, Duration::from_secs(5)).unwrap();
        let second = first.clone();

        let started = std::time::Instant::now();
        for _ in 0..3 {
            first.fetch_ticker("BTCUSDTM").await.unwrap();
            second.fetch_ticker("ETHUSDTM").await.unwrap();
        }
        let elapsed = started.elapsed();

        // two independent budgets would have let all six through at once
        assert!(
            elapsed >= Duration::from_millis(400),
            "six requests finished in {:?}",
            elapsed
        );
    }
}

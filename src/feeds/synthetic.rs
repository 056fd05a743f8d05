use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::models::{Candle, OrderBookSnapshot, PriceLevel, Ticker, Timeframe};
use crate::ports::MarketDataPort;

/// Well-known perpetual contracts used before falling back to generated names
const KNOWN_SYMBOLS: &[&str] = &[
    "XBTUSDTM", "ETHUSDTM", "SOLUSDTM", "XRPUSDTM", "ADAUSDTM", "DOGEUSDTM", "LINKUSDTM",
    "AVAXUSDTM", "DOTUSDTM", "LTCUSDTM", "BNBUSDTM", "ATOMUSDTM",
];

/// Price path shape for a synthetic symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketScenario {
    /// Persistent rise, every close above the previous one
    Uptrend,
    /// Persistent fall, every close below the previous one
    Downtrend,
    /// Mean-reverting chop (±1% around the base price)
    Sideways,
    /// Large swings (±5% per candle)
    Volatile,
}

impl MarketScenario {
    pub const ALL: [MarketScenario; 4] = [
        MarketScenario::Uptrend,
        MarketScenario::Downtrend,
        MarketScenario::Sideways,
        MarketScenario::Volatile,
    ];
}

impl fmt::Display for MarketScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MarketScenario::Uptrend => "uptrend",
            MarketScenario::Downtrend => "downtrend",
            MarketScenario::Sideways => "sideways",
            MarketScenario::Volatile => "volatile",
        };
        f.write_str(name)
    }
}

impl FromStr for MarketScenario {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "uptrend" => Ok(MarketScenario::Uptrend),
            "downtrend" => Ok(MarketScenario::Downtrend),
            "sideways" => Ok(MarketScenario::Sideways),
            "volatile" => Ok(MarketScenario::Volatile),
            other => Err(Error::InvalidParameter(format!("unknown scenario: {}", other))),
        }
    }
}

/// Seeded generator of candles and order books
pub struct SyntheticDataGenerator {
    rng: StdRng,
    base_price: f64,
    base_volume: f64,
}

impl SyntheticDataGenerator {
    /// Create a new generator with a seed for reproducibility
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            base_price: 150.0,
            base_volume: 1_000_000.0,
        }
    }

    pub fn with_base_price(mut self, base_price: f64) -> Self {
        self.base_price = base_price;
        self
    }

    pub fn base_price(&self) -> f64 {
        self.base_price
    }

    /// Generate `num_candles` candles ending at `end`, oldest first
    pub fn generate(
        &mut self,
        scenario: MarketScenario,
        num_candles: usize,
        interval_minutes: i64,
        end: DateTime<Utc>,
    ) -> Vec<Candle> {
        let start_time = end - Duration::minutes(num_candles as i64 * interval_minutes);
        let mut candles = Vec::with_capacity(num_candles);
        let mut current_price = self.base_price;

        for i in 0..num_candles {
            let timestamp = start_time + Duration::minutes((i as i64 + 1) * interval_minutes);
            current_price = self.next_price(scenario, current_price);
            candles.push(self.create_candle(current_price, timestamp));
        }

        candles
    }

    fn next_price(&mut self, scenario: MarketScenario, price: f64) -> f64 {
        match scenario {
            // Drift dominates noise so the direction never flips
            MarketScenario::Uptrend => price * (1.0 + 0.004 + self.rng.gen_range(-0.003..0.003)),
            MarketScenario::Downtrend => price * (1.0 - 0.004 + self.rng.gen_range(-0.003..0.003)),
            MarketScenario::Sideways => {
                let reversion = (self.base_price - price) * 0.1;
                let noise = price * self.rng.gen_range(-0.01..0.01);
                price + reversion + noise
            }
            MarketScenario::Volatile => {
                let next = price * (1.0 + self.rng.gen_range(-0.05..0.05));
                next.max(self.base_price * 0.5)
            }
        }
    }

    /// Build OHLCV around a close price
    fn create_candle(&mut self, price: f64, timestamp: DateTime<Utc>) -> Candle {
        let noise_pct = 0.002; // ±0.2% intrabar movement

        let high = price * (1.0 + self.rng.gen_range(0.0..noise_pct));
        let low = price * (1.0 - self.rng.gen_range(0.0..noise_pct));

        let open_raw = price * (1.0 + self.rng.gen_range(-noise_pct..noise_pct));
        let open = open_raw.clamp(low, high);

        // Vary volume ±30%
        let volume = self.base_volume * self.rng.gen_range(0.7..1.3);

        Candle {
            timestamp,
            open,
            high,
            low,
            close: price,
            volume,
        }
    }

    /// Book of `depth` levels per side around `mid`, best level first
    pub fn order_book(&mut self, mid: f64, depth: usize) -> OrderBookSnapshot {
        let tick = mid * 0.0005;
        let bids = (0..depth)
            .map(|i| PriceLevel::new(mid - tick * (i as f64 + 1.0), self.rng.gen_range(0.5..50.0)))
            .collect();
        let asks = (0..depth)
            .map(|i| PriceLevel::new(mid + tick * (i as f64 + 1.0), self.rng.gen_range(0.5..50.0)))
            .collect();
        OrderBookSnapshot { bids, asks }
    }
}

/// Offline `MarketDataPort` backed by seeded synthetic series
///
/// Every request for a symbol regenerates its data from a seed derived from
/// the feed seed and the symbol name, so repeated calls agree with each other
/// and the feed needs no interior mutability.
#[derive(Debug, Clone)]
pub struct SyntheticMarketData {
    seed: u64,
    symbols: Vec<(String, MarketScenario)>,
    candles_per_series: usize,
    anchor: DateTime<Utc>,
}

impl SyntheticMarketData {
    /// `count` symbols with scenarios assigned round-robin
    pub fn new(seed: u64, count: usize) -> Self {
        let symbols = (0..count)
            .map(|i| {
                let name = KNOWN_SYMBOLS
                    .get(i)
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| format!("SYN{}USDTM", i));
                (name, MarketScenario::ALL[i % MarketScenario::ALL.len()])
            })
            .collect();

        Self {
            seed,
            symbols,
            candles_per_series: 200,
            anchor: Utc::now(),
        }
    }

    /// Empty feed; add symbols with [`SyntheticMarketData::with_symbol`]
    pub fn empty(seed: u64) -> Self {
        Self::new(seed, 0)
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>, scenario: MarketScenario) -> Self {
        self.symbols.push((symbol.into(), scenario));
        self
    }

    pub fn with_candles_per_series(mut self, candles: usize) -> Self {
        self.candles_per_series = candles;
        self
    }

    pub fn scenario(&self, symbol: &str) -> Option<MarketScenario> {
        self.symbols
            .iter()
            .find(|(name, _)| name == symbol)
            .map(|(_, scenario)| *scenario)
    }

    fn generator_for(&self, symbol: &str) -> Result<(SyntheticDataGenerator, MarketScenario)> {
        let scenario = self
            .scenario(symbol)
            .ok_or_else(|| Error::SymbolNotFound(symbol.to_string()))?;

        let symbol_seed = self.seed ^ fnv1a(symbol);
        // Spread base prices so symbols do not all trade around the same level
        let base_price = 1.0 + (symbol_seed % 50_000) as f64 / 10.0;
        let generator = SyntheticDataGenerator::new(symbol_seed).with_base_price(base_price);
        Ok((generator, scenario))
    }

    fn series(&self, symbol: &str, timeframe: Timeframe) -> Result<(SyntheticDataGenerator, Vec<Candle>)> {
        let (mut generator, scenario) = self.generator_for(symbol)?;
        let candles = generator.generate(
            scenario,
            self.candles_per_series,
            timeframe.as_minutes(),
            self.anchor,
        );
        Ok((generator, candles))
    }
}

/// Stable across runs and platforms, unlike `DefaultHasher`
fn fnv1a(text: &str) -> u64 {
    text.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ byte as u64).wrapping_mul(0x0100_0000_01b3)
    })
}

#[async_trait]
impl MarketDataPort for SyntheticMarketData {
    async fn fetch_candles(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<Candle>> {
        let (_, candles) = self.series(symbol, timeframe)?;
        Ok(candles)
    }

    async fn fetch_order_book(&self, symbol: &str, depth: usize) -> Result<OrderBookSnapshot> {
        let (mut generator, candles) = self.series(symbol, Timeframe::default())?;
        let mid = candles
            .last()
            .map(|c| c.close)
            .ok_or_else(|| Error::NoOrderBook(symbol.to_string()))?;
        Ok(generator.order_book(mid, depth))
    }

    async fn fetch_ticker(&self, symbol: &str) -> Result<Ticker> {
        let (_, candles) = self.series(symbol, Timeframe::default())?;
        let last = candles
            .last()
            .map(|c| c.close)
            .ok_or_else(|| Error::NoData(symbol.to_string()))?;
        Ok(Ticker {
            symbol: symbol.to_string(),
            last,
        })
    }

    async fn list_symbols(&self) -> Result<Vec<String>> {
        Ok(self.symbols.iter().map(|(name, _)| name.clone()).collect())
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}

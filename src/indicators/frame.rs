use serde::{Deserialize, Serialize};

use super::bollinger::bollinger_bands;
use super::moving_average::{rolling_max_series, rolling_min_series};
use super::rsi::rsi_series;
use crate::error::{Error, Result};
use crate::models::Candle;

/// Window parameters for the indicator frame
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IndicatorParams {
    /// Rolling min/max window over closes
    pub window_size: usize,
    pub bollinger_window: usize,
    pub bollinger_dev: f64,
    pub rsi_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            window_size: 20,
            bollinger_window: 20,
            bollinger_dev: 2.0,
            rsi_period: 14,
        }
    }
}

impl IndicatorParams {
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 || self.bollinger_window == 0 || self.rsi_period == 0 {
            return Err(Error::InvalidParameter(format!(
                "indicator windows must be positive (window_size={}, bollinger_window={}, rsi_period={})",
                self.window_size, self.bollinger_window, self.rsi_period
            )));
        }
        if !self.bollinger_dev.is_finite() || self.bollinger_dev < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "bollinger_dev must be a non-negative number, got {}",
                self.bollinger_dev
            )));
        }
        Ok(())
    }
}

/// Per-candle indicator columns
///
/// Every column has the same length as the candle series it was computed
/// from. Entries are `None` until the relevant window has filled.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IndicatorFrame {
    pub close: Vec<f64>,
    pub rolling_min: Vec<Option<f64>>,
    pub rolling_max: Vec<Option<f64>>,
    pub sma: Vec<Option<f64>>,
    pub upper_band: Vec<Option<f64>>,
    pub lower_band: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
}

impl IndicatorFrame {
    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    /// RSI of the most recent candle, if the RSI window has filled
    pub fn latest_rsi(&self) -> Option<f64> {
        self.rsi.last().copied().flatten()
    }

    /// Most recent defined SMA value
    pub fn latest_sma(&self) -> Option<f64> {
        self.sma.iter().rev().find_map(|v| *v)
    }
}

/// Support and resistance estimate for a symbol
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SupportResistance {
    pub support: f64,
    pub resistance: f64,
}

/// Compute every indicator column for a candle series
///
/// Fails only on an empty series or invalid parameters. Too few candles for a
/// window leave that column `None` instead of failing.
pub fn compute_frame(symbol: &str, candles: &[Candle], params: &IndicatorParams) -> Result<IndicatorFrame> {
    if candles.is_empty() {
        return Err(Error::NoData(symbol.to_string()));
    }
    params.validate()?;

    let close: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let bands = bollinger_bands(&close, params.bollinger_window, params.bollinger_dev);

    let frame = IndicatorFrame {
        rolling_min: rolling_min_series(&close, params.window_size),
        rolling_max: rolling_max_series(&close, params.window_size),
        sma: bands.middle,
        upper_band: bands.upper,
        lower_band: bands.lower,
        rsi: rsi_series(&close, params.rsi_period),
        close,
    };

    tracing::debug!(
        symbol,
        candles = frame.len(),
        rsi = ?frame.latest_rsi(),
        sma = ?frame.latest_sma(),
        "Computed indicator frame"
    );

    Ok(frame)
}

/// Support/resistance from the last defined SMA(bollinger_window)
///
/// NOTE: support and resistance are the same SMA value; existing consumers
/// read both fields and expect them to match.
pub fn support_resistance(frame: &IndicatorFrame) -> Option<SupportResistance> {
    let level = frame.latest_sma()?;
    Some(SupportResistance {
        support: level,
        resistance: level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle {
                timestamp: start + Duration::minutes(15 * i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    #[test]
    fn test_empty_series_is_no_data() {
        let result = compute_frame("BTC", &[], &IndicatorParams::default());
        assert!(matches!(result, Err(Error::NoData(s)) if s == "BTC"));
    }

    #[test]
    fn test_short_series_yields_undefined_columns() {
        let candles = candles_from_closes(&[100.0, 101.0, 102.0, 101.5, 103.0]);
        let frame = compute_frame("ETH", &candles, &IndicatorParams::default()).unwrap();

        assert_eq!(frame.len(), 5);
        assert_eq!(frame.sma.len(), 5);
        assert_eq!(frame.rsi.len(), 5);
        assert!(frame.sma.iter().all(Option::is_none));
        assert!(frame.upper_band.iter().all(Option::is_none));
        assert!(frame.rsi.iter().all(Option::is_none));
        // min_periods = 1
        assert!(frame.rolling_min.iter().all(Option::is_some));
        assert_eq!(frame.rolling_max[4], Some(103.0));

        assert!(frame.latest_rsi().is_none());
        assert!(support_resistance(&frame).is_none());
    }

    #[test]
    fn test_support_resistance_is_last_sma() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let candles = candles_from_closes(&closes);
        let frame = compute_frame("SOL", &candles, &IndicatorParams::default()).unwrap();

        let levels = support_resistance(&frame).unwrap();
        // mean of 110..=129
        assert!((levels.support - 119.5).abs() < 1e-9);
        assert_eq!(levels.support, levels.resistance);
    }

    #[test]
    fn test_zero_period_rejected() {
        let candles = candles_from_closes(&[1.0, 2.0, 3.0]);
        let params = IndicatorParams {
            rsi_period: 0,
            ..Default::default()
        };

        let result = compute_frame("XRP", &candles, &params);
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_uptrend_rsi_is_overbought() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64 * 2.0).collect();
        let candles = candles_from_closes(&closes);
        let frame = compute_frame("DOGE", &candles, &IndicatorParams::default()).unwrap();

        assert_eq!(frame.latest_rsi(), Some(100.0));
    }
}

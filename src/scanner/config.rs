use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::indicators::IndicatorParams;
use crate::models::{RsiZone, Timeframe};

/// RSI levels that make a symbol worth reporting
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RsiThresholds {
    pub overbought: f64,
    pub oversold: f64,
}

impl Default for RsiThresholds {
    fn default() -> Self {
        Self {
            overbought: 74.0,
            oversold: 26.0,
        }
    }
}

impl RsiThresholds {
    pub fn classify(&self, rsi: f64) -> Option<RsiZone> {
        classify_rsi(rsi, self)
    }
}

/// Zone for an RSI value; both comparisons are strict
pub fn classify_rsi(rsi: f64, thresholds: &RsiThresholds) -> Option<RsiZone> {
    if rsi > thresholds.overbought {
        Some(RsiZone::Overbought)
    } else if rsi < thresholds.oversold {
        Some(RsiZone::Oversold)
    } else {
        None
    }
}

/// Configuration for a market scan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScanConfig {
    pub timeframe: Timeframe,
    pub thresholds: RsiThresholds,
    pub indicators: IndicatorParams,
    /// Levels fetched per side of the book for flagged symbols
    pub order_book_depth: usize,
    /// Symbols analysed at the same time
    pub concurrency: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            timeframe: Timeframe::Minute15,
            thresholds: RsiThresholds::default(),
            indicators: IndicatorParams::default(),
            order_book_depth: 100,
            concurrency: 8,
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> Result<()> {
        self.indicators.validate()?;

        let RsiThresholds { overbought, oversold } = self.thresholds;
        if !(0.0..=100.0).contains(&oversold)
            || !(0.0..=100.0).contains(&overbought)
            || oversold >= overbought
        {
            return Err(Error::InvalidParameter(format!(
                "RSI thresholds must satisfy 0 <= oversold < overbought <= 100 (got {}/{})",
                oversold, overbought
            )));
        }
        if self.order_book_depth == 0 {
            return Err(Error::InvalidParameter("order_book_depth must be positive".to_string()));
        }
        if self.concurrency == 0 {
            return Err(Error::InvalidParameter("concurrency must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScanConfig::default();
        assert_eq!(config.timeframe, Timeframe::Minute15);
        assert_eq!(config.thresholds.overbought, 74.0);
        assert_eq!(config.thresholds.oversold, 26.0);
        assert_eq!(config.indicators.window_size, 20);
        assert_eq!(config.indicators.bollinger_window, 20);
        assert_eq!(config.indicators.rsi_period, 14);
        assert_eq!(config.indicators.bollinger_dev, 2.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_classify_is_strict() {
        let thresholds = RsiThresholds::default();

        assert_eq!(thresholds.classify(75.0), Some(RsiZone::Overbought));
        assert_eq!(thresholds.classify(25.9), Some(RsiZone::Oversold));
        assert_eq!(thresholds.classify(50.0), None);
        assert_eq!(thresholds.classify(74.0), None);
        assert_eq!(thresholds.classify(26.0), None);
        assert_eq!(thresholds.classify(f64::NAN), None);
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let config = ScanConfig {
            thresholds: RsiThresholds {
                overbought: 30.0,
                oversold: 70.0,
            },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let config: ScanConfig =
            serde_json::from_str(r#"{"timeframe": "1h", "thresholds": {"overbought": 80.0}}"#)
                .unwrap();

        assert_eq!(config.timeframe, Timeframe::Hour1);
        assert_eq!(config.thresholds.overbought, 80.0);
        assert_eq!(config.thresholds.oversold, 26.0);
        assert_eq!(config.order_book_depth, 100);
    }
}

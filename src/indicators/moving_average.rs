/// Calculate Simple Moving Average (SMA) of the last `period` values
pub fn calculate_sma(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period {
        return None;
    }

    let sum: f64 = prices.iter().rev().take(period).sum();
    Some(sum / period as f64)
}

/// SMA for every index of `prices`
///
/// Entry `i` averages `prices[i + 1 - period..=i]`; indices before the
/// window fills are `None`.
pub fn sma_series(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; prices.len()];
    if period == 0 || prices.len() < period {
        return out;
    }

    let mut sum: f64 = prices[..period].iter().sum();
    out[period - 1] = Some(sum / period as f64);

    for i in period..prices.len() {
        sum += prices[i] - prices[i - period];
        out[i] = Some(sum / period as f64);
    }

    out
}

/// Trailing minimum over at most `window` values (minimum one period)
pub fn rolling_min_series(prices: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling_extreme(prices, window, f64::min)
}

/// Trailing maximum over at most `window` values (minimum one period)
pub fn rolling_max_series(prices: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling_extreme(prices, window, f64::max)
}

fn rolling_extreme(prices: &[f64], window: usize, pick: fn(f64, f64) -> f64) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; prices.len()];
    }

    (0..prices.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            prices[start..=i].iter().copied().reduce(pick)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_uses_trailing_window() {
        let closes = vec![10.0, 50.0, 20.0, 30.0, 40.0];

        assert_eq!(calculate_sma(&closes, 3), Some(30.0));
        assert_eq!(calculate_sma(&closes, 5), Some(30.0));
        assert_eq!(calculate_sma(&closes, 1), Some(40.0));
    }

    #[test]
    fn test_sma_short_or_zero_period() {
        assert_eq!(calculate_sma(&[1.0, 2.0], 3), None);
        assert_eq!(calculate_sma(&[1.0, 2.0], 0), None);
        assert_eq!(calculate_sma(&[], 1), None);
    }

    #[test]
    fn test_sma_series_alignment() {
        let prices = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let sma = sma_series(&prices, 3);

        assert_eq!(sma.len(), prices.len());
        assert_eq!(sma[0], None);
        assert_eq!(sma[1], None);
        assert_eq!(sma[2], Some(2.0));
        assert_eq!(sma[3], Some(3.0));
        assert_eq!(sma[4], Some(4.0));
        assert_eq!(sma[4], calculate_sma(&prices, 3));
    }

    #[test]
    fn test_sma_series_short_input() {
        let sma = sma_series(&[1.0, 2.0], 20);
        assert_eq!(sma, vec![None, None]);
    }

    #[test]
    fn test_rolling_min_max_min_periods_one() {
        let prices = vec![5.0, 3.0, 4.0, 1.0, 2.0];
        let min = rolling_min_series(&prices, 3);
        let max = rolling_max_series(&prices, 3);

        assert_eq!(min, vec![Some(5.0), Some(3.0), Some(3.0), Some(1.0), Some(1.0)]);
        assert_eq!(max, vec![Some(5.0), Some(5.0), Some(5.0), Some(4.0), Some(4.0)]);
    }
}

/// Relative Strength Index (RSI) for every index of `prices`
///
/// Uses Wilder's smoothing: the first average is the simple mean of the first
/// `period` gains/losses, later averages are `(prev * (period - 1) + x) / period`.
/// Entries `0..period` are `None` because no full window of changes exists yet.
pub fn rsi_series(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; prices.len()];
    if period == 0 || prices.len() < period + 1 {
        return out;
    }

    let mut gains = Vec::with_capacity(prices.len() - 1);
    let mut losses = Vec::with_capacity(prices.len() - 1);

    for window in prices.windows(2) {
        let change = window[1] - window[0];
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(change.abs());
        }
    }

    let p = period as f64;
    let mut avg_gain: f64 = gains[..period].iter().sum::<f64>() / p;
    let mut avg_loss: f64 = losses[..period].iter().sum::<f64>() / p;
    out[period] = rsi_from_averages(avg_gain, avg_loss);

    for i in period..gains.len() {
        avg_gain = (avg_gain * (p - 1.0) + gains[i]) / p;
        avg_loss = (avg_loss * (p - 1.0) + losses[i]) / p;
        // change i sits between prices i and i+1
        out[i + 1] = rsi_from_averages(avg_gain, avg_loss);
    }

    out
}

/// Latest RSI value, or `None` with fewer than `period + 1` prices
pub fn calculate_rsi(prices: &[f64], period: usize) -> Option<f64> {
    rsi_series(prices, period).last().copied().flatten()
}

/// `None` once a non-finite price has leaked into the averages
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if !avg_gain.is_finite() || !avg_loss.is_finite() {
        return None;
    }
    if avg_loss == 0.0 {
        // flat series has no momentum either way
        return Some(if avg_gain == 0.0 { 50.0 } else { 100.0 });
    }

    let rs = avg_gain / avg_loss;
    Some((100.0 - (100.0 / (1.0 + rs))).clamp(0.0, 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_wilder_values() {
        let mut prices = vec![
            44.0, 44.25, 44.5, 43.75, 44.0, 44.5, 45.0, 45.5, 45.25, 45.5,
            46.0, 46.5, 46.25, 46.0, 46.5,
        ];

        // Seed: gains 4.0 / 14, losses 1.5 / 14, so RS = 8/3 and RSI = 800/11
        let seed = calculate_rsi(&prices, 14).unwrap();
        assert!((seed - 800.0 / 11.0).abs() < 1e-9, "seed RSI {}", seed);

        // One smoothed step: +0.5 gain, no loss
        prices.push(47.0);
        let avg_gain = (4.0 / 14.0 * 13.0 + 0.5) / 14.0;
        let avg_loss = (1.5 / 14.0 * 13.0) / 14.0;
        let expected = 100.0 - 100.0 / (1.0 + avg_gain / avg_loss);

        let smoothed = calculate_rsi(&prices, 14).unwrap();
        assert!((smoothed - expected).abs() < 1e-9, "smoothed RSI {}", smoothed);
        assert!((smoothed - 75.1592).abs() < 1e-3);
    }

    #[test]
    fn test_rsi_non_finite_price_is_undefined() {
        let mut prices: Vec<f64> = (0..20).map(|i| 100.0 + (i % 3) as f64).collect();
        prices[17] = f64::NAN;

        let series = rsi_series(&prices, 14);
        assert!(series[14..17].iter().all(Option::is_some));
        assert!(series[17..].iter().all(Option::is_none));
        assert_eq!(calculate_rsi(&[1.0, f64::INFINITY, 2.0], 2), None);
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let prices = vec![100.0, 102.0, 101.0];
        let rsi = calculate_rsi(&prices, 14);
        assert!(rsi.is_none());
        assert_eq!(rsi_series(&prices, 14), vec![None, None, None]);
    }

    #[test]
    fn test_rsi_all_gains() {
        let prices = vec![100.0, 101.0, 102.0, 103.0, 104.0, 105.0];
        let rsi = calculate_rsi(&prices, 5);
        assert_eq!(rsi, Some(100.0)); // All gains = RSI 100
    }

    #[test]
    fn test_rsi_all_losses() {
        let prices = vec![105.0, 104.0, 103.0, 102.0, 101.0, 100.0, 99.0];
        let rsi = calculate_rsi(&prices, 5);
        assert_eq!(rsi, Some(0.0));
    }

    #[test]
    fn test_rsi_flat_is_neutral() {
        let prices = vec![100.0; 20];
        assert_eq!(calculate_rsi(&prices, 14), Some(50.0));
    }

    #[test]
    fn test_rsi_series_leading_none() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let series = rsi_series(&prices, 14);

        assert_eq!(series.len(), prices.len());
        assert!(series[..14].iter().all(Option::is_none));
        assert!(series[14..].iter().all(Option::is_some));
    }

    #[test]
    fn test_rsi_bounded() {
        let prices: Vec<f64> = (0..200)
            .map(|i| 50.0 + ((i * 7919) % 97) as f64 - ((i * 104729) % 89) as f64 * 0.5)
            .collect();

        for value in rsi_series(&prices, 14).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&value), "RSI out of range: {}", value);
        }
    }
}

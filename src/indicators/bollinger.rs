use super::moving_average::sma_series;

/// Upper and lower Bollinger band columns, aligned with the input prices
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub middle: Vec<Option<f64>>,
    pub upper: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

/// Sample standard deviation (n - 1) over a trailing window
///
/// Same alignment as `sma_series`. A window of 1 has no sample deviation and
/// yields `None` everywhere.
pub fn rolling_std_series(prices: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; prices.len()];
    if window < 2 || prices.len() < window {
        return out;
    }

    let n = window as f64;
    for (i, slice) in prices.windows(window).enumerate() {
        let mean = slice.iter().sum::<f64>() / n;
        let variance = slice.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
        out[i + window - 1] = Some(variance.sqrt());
    }

    out
}

/// Bollinger Bands: SMA(window) ± `deviations` * stddev(window)
pub fn bollinger_bands(prices: &[f64], window: usize, deviations: f64) -> BollingerBands {
    let middle = sma_series(prices, window);
    let std = rolling_std_series(prices, window);

    let (upper, lower) = middle
        .iter()
        .zip(&std)
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => (Some(m + deviations * s), Some(m - deviations * s)),
            _ => (None, None),
        })
        .unzip();

    BollingerBands { middle, upper, lower }
}

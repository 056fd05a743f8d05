use crate::error::{Error, Result};
use crate::models::OrderBookSnapshot;

/// Resting size totals for each side of a book
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BookTotals {
    pub bids: f64,
    pub asks: f64,
}

impl BookTotals {
    pub fn of(book: &OrderBookSnapshot) -> Self {
        Self {
            bids: book.bids.iter().map(|level| level.size).sum(),
            asks: book.asks.iter().map(|level| level.size).sum(),
        }
    }
}

/// Signed order book imbalance in percent, within [-100, 100]
///
/// Positive values mean more resting bid size than ask size. A book whose
/// totals sum to zero has no imbalance. `None` means the book could not be
/// fetched, which is reported as `NoOrderBook`.
pub fn order_book_imbalance(book: Option<&OrderBookSnapshot>) -> Result<f64> {
    let book = book.ok_or_else(|| Error::NoOrderBook("snapshot unavailable".to_string()))?;
    let totals = BookTotals::of(book);

    let total = totals.bids + totals.asks;
    if total == 0.0 {
        return Ok(0.0);
    }

    let imbalance = 100.0 * (totals.bids - totals.asks) / total;
    if !imbalance.is_finite() {
        tracing::warn!(
            total_bids = totals.bids,
            total_asks = totals.asks,
            "Order book sizes are not finite, reporting no imbalance"
        );
        return Ok(0.0);
    }
    tracing::debug!(
        total_bids = totals.bids,
        total_asks = totals.asks,
        imbalance,
        "Order book imbalance"
    );

    Ok(imbalance.clamp(-100.0, 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_imbalance_example_book() {
        let book = OrderBookSnapshot::from_pairs(&[(100.0, 2.0), (99.0, 3.0)], &[(101.0, 1.0)]);

        let totals = BookTotals::of(&book);
        assert_eq!(totals, BookTotals { bids: 5.0, asks: 1.0 });

        let imbalance = order_book_imbalance(Some(&book)).unwrap();
        assert!((imbalance - 66.6667).abs() < 1e-3);
    }

    #[test]
    fn test_empty_book_is_zero() {
        let book = OrderBookSnapshot::default();
        assert_eq!(order_book_imbalance(Some(&book)).unwrap(), 0.0);
    }

    #[test]
    fn test_opposite_sign_sizes_do_not_divide_by_zero() {
        // totals of +3 and -3 sum to zero even though neither side is zero
        let book = OrderBookSnapshot::from_pairs(&[(100.0, 3.0)], &[(101.0, -3.0)]);
        let imbalance = order_book_imbalance(Some(&book)).unwrap();

        assert_eq!(imbalance, 0.0);
        assert!(imbalance.is_finite());
    }

    #[test]
    fn test_non_finite_sizes_report_no_imbalance() {
        let nan_bid = OrderBookSnapshot::from_pairs(&[(100.0, f64::NAN)], &[(101.0, 1.0)]);
        let infinite_bid = OrderBookSnapshot::from_pairs(&[(100.0, f64::INFINITY)], &[(101.0, 1.0)]);

        assert_eq!(order_book_imbalance(Some(&nan_bid)).unwrap(), 0.0);
        assert_eq!(order_book_imbalance(Some(&infinite_bid)).unwrap(), 0.0);
    }

    #[test]
    fn test_one_sided_books() {
        let bids_only = OrderBookSnapshot::from_pairs(&[(100.0, 4.0)], &[]);
        let asks_only = OrderBookSnapshot::from_pairs(&[], &[(101.0, 4.0)]);

        assert_eq!(order_book_imbalance(Some(&bids_only)).unwrap(), 100.0);
        assert_eq!(order_book_imbalance(Some(&asks_only)).unwrap(), -100.0);
    }

    #[test]
    fn test_missing_book() {
        let result = order_book_imbalance(None);
        assert!(matches!(result, Err(Error::NoOrderBook(_))));
    }
}

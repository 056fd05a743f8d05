// Technical indicators module
// Rolling statistics, Bollinger Bands, RSI and order book imbalance

pub mod bollinger;
pub mod frame;
pub mod moving_average;
pub mod order_book;
pub mod rsi;

pub use bollinger::{bollinger_bands, rolling_std_series, BollingerBands};
pub use frame::{compute_frame, support_resistance, IndicatorFrame, IndicatorParams, SupportResistance};
pub use moving_average::{calculate_sma, rolling_max_series, rolling_min_series, sma_series};
pub use order_book::{order_book_imbalance, BookTotals};
pub use rsi::{calculate_rsi, rsi_series};

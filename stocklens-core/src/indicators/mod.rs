//! Concrete indicator implementations.
//!
//! Every indicator implements [`Indicator`](crate::indicator::Indicator) and
//! produces one series. Multi-series indicators (MACD, Bollinger, stochastic)
//! are exposed as one named instance per line, keeping the single-series
//! trait unchanged.
//!
//! The `*_of_series` helpers work on plain `f64` slices so composed
//! indicators (MACD signal, RSI averages, ATR, %D) share the same arithmetic.
//! NaN anywhere inside a window makes that window's output NaN.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod obv;
pub mod returns;
pub mod rsi;
pub mod sma;
pub mod stochastic;

pub use atr::{true_range, Atr, TrueRange};
pub use bollinger::{rolling_std, Bollinger, BollingerBand};
pub use ema::{ema_of_series, Ema};
pub use macd::{macd_lines, Macd, MacdLine};
pub use obv::Obv;
pub use returns::DailyReturn;
pub use rsi::Rsi;
pub use sma::{sma_of_series, Sma};
pub use stochastic::{stochastic_k, Stochastic, StochasticLine};

pub(crate) fn closes(bars: &[crate::domain::PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Create synthetic bars from close prices for testing.
///
/// open = prev close (or close for the first bar),
/// high = max(open, close) + 1.0, low = min(open, close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::PriceBar> {
    use crate::domain::PriceBar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PriceBar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Bars from explicit (open, high, low, close, volume) tuples.
#[cfg(test)]
pub fn make_ohlcv_bars(data: &[(f64, f64, f64, f64, u64)]) -> Vec<crate::domain::PriceBar> {
    use crate::domain::PriceBar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close, volume))| PriceBar {
            date: base_date + chrono::Duration::days(i as i64),
            open,
            high,
            low,
            close,
            volume,
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

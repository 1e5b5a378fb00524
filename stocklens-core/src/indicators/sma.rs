//! Simple Moving Average (SMA).
//!
//! Mean of the trailing `period` closes.
//! Lookback: period - 1 (first valid value at index period-1).

use crate::domain::PriceBar;
use crate::indicator::{names, Indicator};

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: names::sma(period),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        sma_of_series(&super::closes(bars), self.period)
    }
}

/// Trailing mean over `period` values; NaN until the window is full.
///
/// Each window is summed directly rather than rolled, so the result at `i`
/// is exactly the mean of `values[i+1-period..=i]` and a NaN only taints
/// the windows that contain it.
pub fn sma_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    for (start, window) in values.windows(period).enumerate() {
        result[start + period - 1] = window.iter().sum::<f64>() / period as f64;
    }

    result
}

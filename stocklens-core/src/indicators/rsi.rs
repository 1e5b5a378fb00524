//! Relative Strength Index (RSI).
//!
//! gain[t] = max(close[t] - close[t-1], 0), loss[t] = max(close[t-1] - close[t], 0),
//! with gain[0] = loss[0] = 0 (no previous close, no change).
//! avg_gain / avg_loss are simple moving averages over `period`.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: period - 1.
//! Edge case: avg_loss == 0 → RSI = 100, including a flat window.

use super::sma::sma_of_series;
use crate::domain::PriceBar;
use crate::indicator::{names, Indicator};

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self { period }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        names::RSI
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let n = bars.len();
        let mut gains = vec![0.0; n];
        let mut losses = vec![0.0; n];
        for i in 1..n {
            let change = bars[i].close - bars[i - 1].close;
            if change > 0.0 {
                gains[i] = change;
            } else {
                losses[i] = -change;
            }
        }

        let avg_gain = sma_of_series(&gains, self.period);
        let avg_loss = sma_of_series(&losses, self.period);

        avg_gain
            .iter()
            .zip(&avg_loss)
            .map(|(&g, &l)| rsi_from_averages(g, l))
            .collect()
    }
}

/// RSI from average gain and loss. NaN inputs stay NaN.
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_gain.is_nan() || avg_loss.is_nan() {
        f64::NAN
    } else if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

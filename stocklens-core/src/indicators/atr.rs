//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|);
//! the first bar has no previous close, so TR[0] = high[0] - low[0].
//! ATR is the simple moving average of TR over `period`.
//! Lookback: period - 1.

use super::sma::sma_of_series;
use crate::domain::PriceBar;
use crate::indicator::{names, Indicator};

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self { period }
    }
}

/// True Range as its own series.
#[derive(Debug, Clone, Default)]
pub struct TrueRange;

/// TR[0] = high[0] - low[0];
/// TR[t] = max(high[t]-low[t], |high[t]-close[t-1]|, |low[t]-close[t-1]|).
pub fn true_range(bars: &[PriceBar]) -> Vec<f64> {
    let mut tr = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        if i == 0 {
            tr.push(bar.range());
            continue;
        }
        let pc = bars[i - 1].close;
        tr.push(
            bar.range()
                .max((bar.high - pc).abs())
                .max((bar.low - pc).abs()),
        );
    }

    tr
}

impl Indicator for TrueRange {
    fn name(&self) -> &str {
        names::TRUE_RANGE
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        true_range(bars)
    }
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        names::ATR
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        sma_of_series(&true_range(bars), self.period)
    }
}

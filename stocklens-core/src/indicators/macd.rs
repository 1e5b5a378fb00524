//! Moving Average Convergence Divergence (MACD).
//!
//! Three lines (separate Indicator instances):
//! - MACD: EMA(close, fast) - EMA(close, slow)
//! - Signal: EMA(MACD, signal)
//! - Histogram: MACD - Signal
//!
//! All EMAs are seeded with their first input value, so every line is
//! defined from bar 0. Lookback: 0.

use super::ema::ema_of_series;
use crate::domain::PriceBar;
use crate::indicator::{names, Indicator};

/// Which MACD line to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdLine {
    Macd,
    Signal,
    Histogram,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    line: MacdLine,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize, line: MacdLine) -> Self {
        assert!(
            fast >= 1 && slow >= 1 && signal >= 1,
            "MACD spans must be >= 1"
        );
        Self {
            fast,
            slow,
            signal,
            line,
        }
    }

    pub fn macd(fast: usize, slow: usize, signal: usize) -> Self {
        Self::new(fast, slow, signal, MacdLine::Macd)
    }

    pub fn signal(fast: usize, slow: usize, signal: usize) -> Self {
        Self::new(fast, slow, signal, MacdLine::Signal)
    }

    pub fn histogram(fast: usize, slow: usize, signal: usize) -> Self {
        Self::new(fast, slow, signal, MacdLine::Histogram)
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        match self.line {
            MacdLine::Macd => names::MACD,
            MacdLine::Signal => names::SIGNAL,
            MacdLine::Histogram => names::HISTOGRAM,
        }
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let (macd, signal, histogram) =
            macd_lines(&super::closes(bars), self.fast, self.slow, self.signal);
        match self.line {
            MacdLine::Macd => macd,
            MacdLine::Signal => signal,
            MacdLine::Histogram => histogram,
        }
    }
}

/// Compute `(macd, signal, histogram)` for a close series.
pub fn macd_lines(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let fast_ema = ema_of_series(closes, fast);
    let slow_ema = ema_of_series(closes, slow);
    let macd: Vec<f64> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema_of_series(&macd, signal);
    let histogram = macd
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| m - s)
        .collect();
    (macd, signal_line, histogram)
}

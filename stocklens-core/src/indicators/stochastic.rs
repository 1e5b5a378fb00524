//! Stochastic Oscillator (%K / %D).
//!
//! %K[t] = 100 * (close[t] - min(low)) / (max(high) - min(low)) over the
//! trailing `period` bars. A zero high-low range leaves %K undefined (NaN).
//! %D = SMA(%K, smoothing); a NaN %K inside the window makes %D NaN.
//!
//! Lookback: %K period - 1, %D period + smoothing - 2.

use super::sma::sma_of_series;
use crate::domain::PriceBar;
use crate::indicator::{names, Indicator};

/// Which stochastic line to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StochasticLine {
    K,
    D,
}

#[derive(Debug, Clone)]
pub struct Stochastic {
    period: usize,
    smoothing: usize,
    line: StochasticLine,
}

impl Stochastic {
    pub fn k(period: usize, smoothing: usize) -> Self {
        Self::new(period, smoothing, StochasticLine::K)
    }

    pub fn d(period: usize, smoothing: usize) -> Self {
        Self::new(period, smoothing, StochasticLine::D)
    }

    fn new(period: usize, smoothing: usize, line: StochasticLine) -> Self {
        assert!(period >= 1, "stochastic period must be >= 1");
        assert!(smoothing >= 1, "stochastic smoothing must be >= 1");
        Self {
            period,
            smoothing,
            line,
        }
    }
}

/// Raw %K series.
pub fn stochastic_k(bars: &[PriceBar], period: usize) -> Vec<f64> {
    let n = bars.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    for (start, window) in bars.windows(period).enumerate() {
        let highest = window
            .iter()
            .map(|b| b.high)
            .fold(f64::NEG_INFINITY, f64::max);
        let lowest = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let range = highest - lowest;
        if range > 0.0 {
            let close = window[period - 1].close;
            result[start + period - 1] = 100.0 * (close - lowest) / range;
        }
    }

    result
}

impl Indicator for Stochastic {
    fn name(&self) -> &str {
        match self.line {
            StochasticLine::K => names::STOCH_K,
            StochasticLine::D => names::STOCH_D,
        }
    }

    fn lookback(&self) -> usize {
        match self.line {
            StochasticLine::K => self.period - 1,
            StochasticLine::D => self.period + self.smoothing - 2,
        }
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let k = stochastic_k(bars, self.period);
        match self.line {
            StochasticLine::K => k,
            StochasticLine::D => sma_of_series(&k, self.smoothing),
        }
    }
}

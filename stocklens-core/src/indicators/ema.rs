//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1],
//! alpha = 2 / (span + 1).
//! Seed: EMA[0] = close[0], so there is no warmup.
//! Lookback: 0.

use crate::domain::PriceBar;
use crate::indicator::{names, Indicator};

#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    name: String,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        assert!(span >= 1, "EMA span must be >= 1");
        Self {
            span,
            name: names::ema(span),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        ema_of_series(&super::closes(bars), self.span)
    }
}

/// Smoothing factor for a span.
pub fn ema_alpha(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// EMA of an arbitrary series, seeded with its first defined value.
///
/// Leading NaNs stay NaN. A NaN after the seed taints every later value,
/// since the recursion has no way to skip it.
pub fn ema_of_series(values: &[f64], span: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if span == 0 {
        return result;
    }

    let Some(seed_index) = values.iter().position(|v| !v.is_nan()) else {
        return result;
    };

    let alpha = ema_alpha(span);
    let mut prev = values[seed_index];
    result[seed_index] = prev;

    for i in (seed_index + 1)..n {
        if values[i].is_nan() {
            return result;
        }
        let ema = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = ema;
        prev = ema;
    }

    result
}

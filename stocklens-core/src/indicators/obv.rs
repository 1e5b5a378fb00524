//! On-Balance Volume (OBV).
//!
//! OBV[0] = 0; each later bar adds +volume on an up close, -volume on a
//! down close, nothing on an unchanged close.
//! Lookback: 0.

use crate::domain::PriceBar;
use crate::indicator::{names, Indicator};
use std::cmp::Ordering;

#[derive(Debug, Clone, Default)]
pub struct Obv;

impl Indicator for Obv {
    fn name(&self) -> &str {
        names::OBV
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let mut result = Vec::with_capacity(bars.len());
        let mut running = 0.0;

        for (i, bar) in bars.iter().enumerate() {
            if i > 0 {
                let volume = bar.volume as f64;
                match bar.close.partial_cmp(&bars[i - 1].close) {
                    Some(Ordering::Greater) => running += volume,
                    Some(Ordering::Less) => running -= volume,
                    _ => {}
                }
            }
            result.push(running);
        }

        result
    }
}

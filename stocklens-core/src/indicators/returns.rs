//! Daily return: close-to-close percentage change as a fraction.
//!
//! DailyReturn[t] = (close[t] - close[t-1]) / close[t-1]
//! Lookback: 1.

use crate::domain::PriceBar;
use crate::indicator::{names, Indicator};

#[derive(Debug, Clone, Default)]
pub struct DailyReturn;

impl Indicator for DailyReturn {
    fn name(&self) -> &str {
        names::DAILY_RETURN
    }

    fn lookback(&self) -> usize {
        1
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let mut result = vec![f64::NAN; bars.len()];
        for (i, pair) in bars.windows(2).enumerate() {
            let prev = pair[0].close;
            result[i + 1] = (pair[1].close - prev) / prev;
        }
        result
    }
}

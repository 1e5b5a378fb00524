//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! Four series (separate Indicator instances):
//! - Middle: SMA(close, period)
//! - Std: rolling stddev(close, period)
//! - Upper: middle + k * std
//! - Lower: middle - k * std
//!
//! Uses population stddev (divide by N).
//! Lookback: period - 1.

use super::sma::sma_of_series;
use crate::domain::PriceBar;
use crate::indicator::{names, Indicator};

/// Which Bollinger series to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
    Std,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    k: f64,
    band: BollingerBand,
}

impl Bollinger {
    pub fn new(period: usize, k: f64, band: BollingerBand) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        Self { period, k, band }
    }

    pub fn upper(period: usize, k: f64) -> Self {
        Self::new(period, k, BollingerBand::Upper)
    }

    pub fn middle(period: usize, k: f64) -> Self {
        Self::new(period, k, BollingerBand::Middle)
    }

    pub fn lower(period: usize, k: f64) -> Self {
        Self::new(period, k, BollingerBand::Lower)
    }

    pub fn std(period: usize, k: f64) -> Self {
        Self::new(period, k, BollingerBand::Std)
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        match self.band {
            BollingerBand::Upper => names::UPPER_BAND,
            BollingerBand::Middle => names::MIDDLE_BAND,
            BollingerBand::Lower => names::LOWER_BAND,
            BollingerBand::Std => names::STD,
        }
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let closes = super::closes(bars);
        let middle = sma_of_series(&closes, self.period);
        match self.band {
            BollingerBand::Middle => middle,
            BollingerBand::Std => rolling_std(&closes, self.period),
            BollingerBand::Upper => {
                let std = rolling_std(&closes, self.period);
                middle
                    .iter()
                    .zip(&std)
                    .map(|(m, s)| m + self.k * s)
                    .collect()
            }
            BollingerBand::Lower => {
                let std = rolling_std(&closes, self.period);
                middle
                    .iter()
                    .zip(&std)
                    .map(|(m, s)| m - self.k * s)
                    .collect()
            }
        }
    }
}

/// Population standard deviation over each trailing window of `period`.
pub fn rolling_std(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    for (start, window) in values.windows(period).enumerate() {
        let mean = window.iter().sum::<f64>() / period as f64;
        let variance = window
            .iter()
            .map(|v| {
                let diff = v - mean;
                diff * diff
            })
            .sum::<f64>()
            / period as f64;
        result[start + period - 1] = variance.sqrt();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn bollinger_middle_is_sma() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let result = Bollinger::middle(3, 2.0).compute(&bars);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 11.0, DEFAULT_EPSILON);
        assert_approx(result[3], 12.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_std_is_population() {
        // window [10, 11, 12]: mean 11, deviations -1, 0, 1 → variance 2/3
        let bars = make_bars(&[10.0, 11.0, 12.0]);
        let result = Bollinger::std(3, 2.0).compute(&bars);
        assert_approx(result[2], (2.0f64 / 3.0).sqrt(), DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_width_is_two_k_std() {
        let bars = make_bars(&[10.0, 11.5, 12.0, 10.5, 14.0, 13.0]);
        let k = 2.5;
        let upper = Bollinger::upper(3, k).compute(&bars);
        let middle = Bollinger::middle(3, k).compute(&bars);
        let lower = Bollinger::lower(3, k).compute(&bars);
        let std = Bollinger::std(3, k).compute(&bars);

        for i in 2..bars.len() {
            assert_approx(upper[i] - lower[i], 2.0 * k * std[i], DEFAULT_EPSILON);
            assert_approx(upper[i] - middle[i], middle[i] - lower[i], DEFAULT_EPSILON);
        }
    }

    #[test]
    fn bollinger_constant_price_zero_width() {
        let bars = make_bars(&[100.0, 100.0, 100.0, 100.0]);
        let upper = Bollinger::upper(3, 2.0).compute(&bars);
        let lower = Bollinger::lower(3, 2.0).compute(&bars);
        let std = Bollinger::std(3, 2.0).compute(&bars);

        for i in 2..4 {
            assert_eq!(std[i], 0.0);
            assert_eq!(upper[i], 100.0);
            assert_eq!(lower[i], 100.0);
        }
    }

    #[test]
    fn bollinger_lookback() {
        assert_eq!(Bollinger::upper(20, 2.0).lookback(), 19);
    }
}

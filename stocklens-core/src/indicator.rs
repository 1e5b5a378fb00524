//! Indicator trait and the computed indicator series container.
//!
//! Indicators are pure functions: bar history in, numeric series out.
//! Every output is index-aligned with the input bars and uses `f64::NAN`
//! for positions without enough history.

use crate::domain::PriceBar;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::HashMap;

/// Canonical series names produced by the engine.
pub mod names {
    pub const DAILY_RETURN: &str = "DailyReturn";
    pub const MACD: &str = "MACD";
    pub const SIGNAL: &str = "Signal";
    pub const HISTOGRAM: &str = "Histogram";
    pub const RSI: &str = "RSI";
    pub const MIDDLE_BAND: &str = "MiddleBand";
    pub const STD: &str = "Std";
    pub const UPPER_BAND: &str = "UpperBand";
    pub const LOWER_BAND: &str = "LowerBand";
    pub const TRUE_RANGE: &str = "TrueRange";
    pub const ATR: &str = "ATR";
    pub const OBV: &str = "OBV";
    pub const STOCH_K: &str = "%K";
    pub const STOCH_D: &str = "%D";

    pub fn sma(window: usize) -> String {
        format!("SMA{window}")
    }

    pub fn ema(span: usize) -> String {
        format!("EMA{span}")
    }
}

/// Trait for indicators.
///
/// `compute` takes the full bar history and returns a `Vec<f64>` of the same
/// length. The first `lookback()` values are `f64::NAN`.
///
/// # Look-ahead guard
/// No value at bar t may depend on bar t+1 or later: computing over a
/// truncated prefix must reproduce the same prefix of the full result.
pub trait Indicator: Send + Sync {
    /// Series name (e.g., "SMA50", "RSI").
    fn name(&self) -> &str;

    /// Number of leading bars without a defined value.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[PriceBar]) -> Vec<f64>;
}

/// Named indicator series, all aligned with one price series.
///
/// Insertion order is preserved so exports have stable column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSeries {
    bar_count: usize,
    order: Vec<String>,
    series: HashMap<String, Vec<f64>>,
}

impl IndicatorSeries {
    pub fn new(bar_count: usize) -> Self {
        Self {
            bar_count,
            ..Self::default()
        }
    }

    /// Number of bars every series is aligned to.
    pub fn bar_count(&self) -> usize {
        self.bar_count
    }

    /// Insert a named series, replacing any existing series with that name.
    ///
    /// # Panics
    /// If `values` is not `bar_count()` long; a misaligned series is a bug in
    /// the producing indicator, not a data problem.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        let name = name.into();
        assert_eq!(
            values.len(),
            self.bar_count,
            "series '{name}' has {} values for {} bars",
            values.len(),
            self.bar_count
        );
        if self.series.insert(name.clone(), values).is_none() {
            self.order.push(name);
        }
    }

    /// Value at a bar index. `None` if the name is unknown or the index is out
    /// of range; `Some(NaN)` if the value is undefined.
    pub fn get(&self, name: &str, bar_index: usize) -> Option<f64> {
        self.series
            .get(name)
            .and_then(|v| v.get(bar_index).copied())
    }

    /// Latest value of a series.
    pub fn last(&self, name: &str) -> Option<f64> {
        self.bar_count
            .checked_sub(1)
            .and_then(|i| self.get(name, i))
    }

    pub fn get_series(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(|v| v.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.series.contains_key(name)
    }

    /// Series names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    /// `(name, values)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.order
            .iter()
            .map(|name| (name.as_str(), self.series[name].as_slice()))
    }

    /// Number of series stored.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

// Serialized as a map in insertion order; NaN becomes JSON null.
impl Serialize for IndicatorSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.order.len()))?;
        for (name, values) in self.iter() {
            let cells: Vec<Option<f64>> = values
                .iter()
                .map(|v| if v.is_nan() { None } else { Some(*v) })
                .collect();
            map.serialize_entry(name, &cells)?;
        }
        map.end()
    }
}

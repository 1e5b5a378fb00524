//! Whole-series statistics and data freshness.

use crate::domain::PriceSeries;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub symbol: String,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub first_close: f64,
    pub last_close: f64,
    /// Percentage change from first to last close.
    pub growth_pct: f64,
    /// Sample standard deviation of daily returns. NaN with fewer than two
    /// returns.
    pub volatility: f64,
    pub bar_count: usize,
}

impl SeriesSummary {
    pub fn from_series(series: &PriceSeries) -> Self {
        let first = series.first();
        let last = series.last();

        let returns: Vec<f64> = series
            .bars()
            .windows(2)
            .map(|w| w[1].close / w[0].close - 1.0)
            .filter(|r| r.is_finite())
            .collect();

        Self {
            symbol: series.symbol().to_string(),
            first_date: first.date,
            last_date: last.date,
            first_close: first.close,
            last_close: last.close,
            growth_pct: (last.close - first.close) / first.close * 100.0,
            volatility: sample_std(&returns),
            bar_count: series.len(),
        }
    }
}

fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    var.sqrt()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Freshness {
    pub last_date: NaiveDate,
    pub days_behind: i64,
    pub is_fresh: bool,
}

/// Compare the last bar's date with `today`. Data may lag three days on a
/// Monday (the weekend) and one day otherwise.
pub fn check_freshness(series: &PriceSeries, today: NaiveDate) -> Freshness {
    let last_date = series.last().date;
    let days_behind = (today - last_date).num_days();
    let acceptable = if today.weekday() == Weekday::Mon { 3 } else { 1 };
    Freshness {
        last_date,
        days_behind,
        is_fresh: days_behind <= acceptable,
    }
}

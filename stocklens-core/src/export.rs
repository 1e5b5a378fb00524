//! Snapshot export: price bars joined with their indicator columns.
//!
//! - **CSV**: one row per bar, indicator columns in insertion order, empty
//!   cell for an undefined value
//! - **JSON**: symbol, config fingerprint, dates, and one array per
//!   indicator with `null` for undefined values

use crate::config::IndicatorConfig;
use crate::domain::PriceSeries;
use crate::indicator::IndicatorSeries;
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV export: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON export: {0}")]
    Json(#[from] serde_json::Error),

    #[error("buffer: {0}")]
    Buffer(String),

    #[error("indicator series covers {indicators} bars, price series has {bars}")]
    Misaligned { bars: usize, indicators: usize },
}

fn check_aligned(series: &PriceSeries, indicators: &IndicatorSeries) -> Result<(), ExportError> {
    if series.len() != indicators.bar_count() {
        return Err(ExportError::Misaligned {
            bars: series.len(),
            indicators: indicators.bar_count(),
        });
    }
    Ok(())
}

fn cell(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

pub fn snapshot_csv(
    series: &PriceSeries,
    indicators: &IndicatorSeries,
) -> Result<String, ExportError> {
    check_aligned(series, indicators)?;
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec!["date", "open", "high", "low", "close", "volume"];
    header.extend(indicators.names());
    wtr.write_record(&header)?;

    let columns: Vec<&[f64]> = indicators.iter().map(|(_, values)| values).collect();
    for (i, bar) in series.bars().iter().enumerate() {
        let mut row = vec![
            bar.date.to_string(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
        ];
        row.extend(columns.iter().map(|col| cell(col[i])));
        wtr.write_record(&row)?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Buffer(e.to_string()))
}

#[derive(Serialize)]
struct Snapshot<'a> {
    symbol: &'a str,
    config_fingerprint: String,
    dates: Vec<NaiveDate>,
    indicators: &'a IndicatorSeries,
}

pub fn snapshot_json(
    series: &PriceSeries,
    indicators: &IndicatorSeries,
    config: &IndicatorConfig,
) -> Result<String, ExportError> {
    check_aligned(series, indicators)?;
    let snapshot = Snapshot {
        symbol: series.symbol(),
        config_fingerprint: config.fingerprint(),
        dates: series.dates(),
        indicators,
    };
    Ok(serde_json::to_string_pretty(&snapshot)?)
}

//! OHLCV CSV reading and writing.
//!
//! Written format: `date,open,high,low,close,volume`.
//! Read format also accepts Yahoo-style headers (`Date,Open,High,Low,Close,
//! Adj Close,Volume`), extra columns, and dates with a time/offset suffix
//! such as `2024-01-02 00:00:00-05:00` (only the date part is kept).

use super::provider::DataError;
use crate::domain::{PriceBar, PriceSeries};
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::{Read, Write};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Date", alias = "timestamp", alias = "Datetime")]
    date: String,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close")]
    close: f64,
    // Some exports write volume as a float ("1234.0").
    #[serde(alias = "Volume")]
    volume: f64,
}

fn parse_date(raw: &str) -> Result<NaiveDate, DataError> {
    let day = raw
        .trim()
        .get(..10)
        .ok_or_else(|| DataError::Parse(format!("date too short: '{raw}'")))?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| DataError::Parse(format!("bad date '{raw}': {e}")))
}

fn row_to_bar(row: CsvRow) -> Result<PriceBar, DataError> {
    if !row.volume.is_finite() || row.volume < 0.0 {
        return Err(DataError::Parse(format!(
            "bad volume {} on {}",
            row.volume, row.date
        )));
    }
    Ok(PriceBar {
        date: parse_date(&row.date)?,
        open: row.open,
        high: row.high,
        low: row.low,
        close: row.close,
        volume: row.volume.round() as u64,
    })
}

/// Parse bars from CSV, sort by date, drop duplicate dates (first row wins),
/// then validate into a `PriceSeries`.
pub fn read_series<R: Read>(symbol: &str, reader: R) -> Result<PriceSeries, DataError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut bars = Vec::new();
    for row in rdr.deserialize::<CsvRow>() {
        bars.push(row_to_bar(row?)?);
    }

    bars.sort_by_key(|b| b.date);
    bars.dedup_by_key(|b| b.date);

    Ok(PriceSeries::new(symbol, bars)?)
}

/// Write a series in the canonical column layout.
pub fn write_series<W: Write>(series: &PriceSeries, writer: W) -> Result<(), DataError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for bar in series.bars() {
        wtr.serialize(bar)?;
    }
    wtr.flush()
        .map_err(|e| DataError::CacheError(format!("flush CSV: {e}")))?;
    Ok(())
}

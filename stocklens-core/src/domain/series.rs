//! PriceSeries: validated, immutable, date-ordered bar history.

use super::bar::PriceBar;
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Reasons a bar sequence cannot become a `PriceSeries`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("price series for '{symbol}' is empty")]
    Empty { symbol: String },

    #[error("dates not strictly increasing at bar {index}: {previous} then {current}")]
    NonIncreasingDate {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error(
        "bar {index} ({date}) violates OHLC ordering: open={open}, high={high}, low={low}, close={close}"
    )]
    InvalidOhlc {
        index: usize,
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    },
}

/// Ordered daily bars for one symbol.
///
/// Invariants, checked once in [`PriceSeries::new`]:
/// - at least one bar
/// - dates strictly ascending (no duplicates)
/// - every bar passes [`PriceBar::is_sane`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, SeriesError> {
        let symbol = symbol.into();
        if bars.is_empty() {
            return Err(SeriesError::Empty { symbol });
        }

        for (i, bar) in bars.iter().enumerate() {
            if !bar.is_sane() {
                return Err(SeriesError::InvalidOhlc {
                    index: i,
                    date: bar.date,
                    open: bar.open,
                    high: bar.high,
                    low: bar.low,
                    close: bar.close,
                });
            }
            if i > 0 && bars[i - 1].date >= bar.date {
                return Err(SeriesError::NonIncreasingDate {
                    index: i,
                    previous: bars[i - 1].date,
                    current: bar.date,
                });
            }
        }

        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false for a constructed series; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> &PriceBar {
        &self.bars[0]
    }

    pub fn last(&self) -> &PriceBar {
        &self.bars[self.bars.len() - 1]
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Bars dated `start..=end`, re-validated as a new series.
    pub fn slice_dates(&self, start: NaiveDate, end: NaiveDate) -> Result<Self, SeriesError> {
        let bars = self
            .bars
            .iter()
            .filter(|b| b.date >= start && b.date <= end)
            .copied()
            .collect();
        Self::new(self.symbol.clone(), bars)
    }
}

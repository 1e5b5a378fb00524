//! Price provider trait and structured error types.
//!
//! `PriceProvider` abstracts over where bars come from so the engine never
//! fetches anything itself. The cache sits above this trait; providers don't
//! know about it.

use super::csv_format::read_series;
use crate::domain::{PriceSeries, SeriesError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid price series: {0}")]
    InvalidSeries(#[from] SeriesError),

    #[error("cache error: {0}")]
    CacheError(String),

    #[error("all {attempts} attempts to fetch '{symbol}' failed: {last_error}")]
    RetriesExhausted {
        symbol: String,
        attempts: u32,
        last_error: String,
    },
}

impl DataError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    /// Whether retrying the same request could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::CacheError(_))
    }
}

/// Where a loaded series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    Provider,
    Cache,
    /// Expired cache entry used because every provider attempt failed.
    StaleCache,
}

/// Trait for market-data providers.
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the full daily history for a symbol.
    fn fetch(&self, symbol: &str) -> Result<PriceSeries, DataError>;
}

/// Reads `{dir}/{SYMBOL}.csv` files, e.g. exports saved from a broker or
/// a finance site.
#[derive(Debug, Clone)]
pub struct CsvFileProvider {
    dir: PathBuf,
}

impl CsvFileProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", symbol.to_uppercase()))
    }
}

impl PriceProvider for CsvFileProvider {
    fn name(&self) -> &str {
        "csv-file"
    }

    fn fetch(&self, symbol: &str) -> Result<PriceSeries, DataError> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_uppercase(),
            });
        }
        let file = File::open(&path).map_err(|e| DataError::io(&path, e))?;
        read_series(&symbol.to_uppercase(), file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn csv_provider_reads_symbol_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("SPY.csv"),
            "date,open,high,low,close,volume\n\
             2024-01-02,100,102,99,101,1000\n\
             2024-01-03,101,103,100,102,1100\n",
        )
        .unwrap();

        let provider = CsvFileProvider::new(dir.path());
        let series = provider.fetch("spy").unwrap();
        assert_eq!(series.symbol(), "SPY");
        assert_eq!(series.len(), 2);
        assert_eq!(series.last().close, 102.0);
    }

    #[test]
    fn csv_provider_missing_symbol() {
        let dir = tempfile::tempdir().unwrap();
        let provider = CsvFileProvider::new(dir.path());
        assert!(matches!(
            provider.fetch("QQQ"),
            Err(DataError::SymbolNotFound { .. })
        ));
    }

    #[test]
    fn transient_classification() {
        assert!(!DataError::SymbolNotFound {
            symbol: "X".into()
        }
        .is_transient());
        assert!(DataError::CacheError("disk full".into()).is_transient());
    }
}

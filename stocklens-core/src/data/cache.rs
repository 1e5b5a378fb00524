//! CSV price cache with file-age staleness.
//!
//! Layout: `{cache_dir}/{SYMBOL}.csv` plus a `{SYMBOL}.meta.json` sidecar.
//!
//! Features:
//! - Atomic writes (write to .tmp, rename into place)
//! - Staleness from the data file's modification time vs `max_age`
//! - Quarantine for corrupt files ({filename}.quarantined)
//! - Metadata sidecar per symbol (hash, date range, bar count)

use super::csv_format::{read_series, write_series};
use super::provider::DataError;
use crate::domain::PriceSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Default cache lifetime.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(12 * 60 * 60);

/// A cache hit, fresh or not.
#[derive(Debug, Clone)]
pub struct CachedSeries {
    pub series: PriceSeries,
    pub fresh: bool,
}

/// Storage the caller injects between providers and the engine.
pub trait PriceStore: Send + Sync {
    /// Load a cached series. `Ok(None)` is a miss.
    fn load(&self, symbol: &str) -> Result<Option<CachedSeries>, DataError>;

    /// Store (replace) a series under its symbol.
    fn store(&self, series: &PriceSeries) -> Result<(), DataError>;
}

/// Metadata sidecar for a cached symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheMeta {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub bar_count: usize,
    pub data_hash: String,
    pub cached_at: chrono::NaiveDateTime,
}

/// Cache status for a single symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStatus {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub bar_count: usize,
    pub fresh: bool,
}

pub struct CsvCache {
    cache_dir: PathBuf,
    max_age: Duration,
}

impl CsvCache {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self::with_max_age(cache_dir, DEFAULT_MAX_AGE)
    }

    pub fn with_max_age(cache_dir: impl Into<PathBuf>, max_age: Duration) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            max_age,
        }
    }

    /// Root directory of the cache.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn data_path(&self, symbol: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.csv", symbol.to_uppercase()))
    }

    fn meta_path(&self, symbol: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{}.meta.json", symbol.to_uppercase()))
    }

    /// True if the data file exists and is younger than `max_age`.
    pub fn is_fresh(&self, symbol: &str) -> bool {
        let Ok(modified) = fs::metadata(self.data_path(symbol)).and_then(|m| m.modified()) else {
            return false;
        };
        // A modification time in the future counts as age zero.
        modified.elapsed().unwrap_or_default() < self.max_age
    }

    pub fn get_meta(&self, symbol: &str) -> Option<CacheMeta> {
        let content = fs::read_to_string(self.meta_path(symbol)).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Every cached symbol with a readable sidecar, sorted by symbol.
    pub fn status(&self) -> Result<Vec<CacheStatus>, DataError> {
        if !self.cache_dir.exists() {
            return Ok(Vec::new());
        }
        let entries =
            fs::read_dir(&self.cache_dir).map_err(|e| DataError::io(&self.cache_dir, e))?;

        let mut statuses = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| DataError::io(&self.cache_dir, e))?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(symbol) = name.strip_suffix(".meta.json") else {
                continue;
            };
            if let Some(meta) = self.get_meta(symbol) {
                statuses.push(CacheStatus {
                    fresh: self.is_fresh(symbol),
                    symbol: meta.symbol,
                    start_date: meta.start_date,
                    end_date: meta.end_date,
                    bar_count: meta.bar_count,
                });
            }
        }
        statuses.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Ok(statuses)
    }

    /// Remove a symbol's data and sidecar. Missing files are not an error.
    /// Returns whether anything was deleted.
    pub fn remove(&self, symbol: &str) -> Result<bool, DataError> {
        let mut removed = false;
        for path in [self.data_path(symbol), self.meta_path(symbol)] {
            match fs::remove_file(&path) {
                Ok(()) => removed = true,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(DataError::io(&path, e)),
            }
        }
        Ok(removed)
    }

    fn quarantine(&self, path: &Path, reason: &DataError) {
        let quarantined = path.with_extension("csv.quarantined");
        warn!(
            path = %path.display(),
            error = %reason,
            "quarantining corrupt cache file"
        );
        if let Err(e) = fs::rename(path, &quarantined) {
            warn!(path = %path.display(), error = %e, "quarantine rename failed");
        }
    }
}

impl PriceStore for CsvCache {
    fn load(&self, symbol: &str) -> Result<Option<CachedSeries>, DataError> {
        let path = self.data_path(symbol);
        if !path.exists() {
            debug!(symbol, "cache miss");
            return Ok(None);
        }

        let fresh = self.is_fresh(symbol);
        let file = fs::File::open(&path).map_err(|e| DataError::io(&path, e))?;
        match read_series(&symbol.to_uppercase(), file) {
            Ok(series) => {
                debug!(symbol, fresh, bars = series.len(), "cache hit");
                Ok(Some(CachedSeries { series, fresh }))
            }
            Err(e) => {
                self.quarantine(&path, &e);
                Ok(None)
            }
        }
    }

    fn store(&self, series: &PriceSeries) -> Result<(), DataError> {
        fs::create_dir_all(&self.cache_dir).map_err(|e| DataError::io(&self.cache_dir, e))?;

        let path = self.data_path(series.symbol());
        let tmp_path = path.with_extension("csv.tmp");

        let mut buf = Vec::new();
        write_series(series, &mut buf)?;
        fs::write(&tmp_path, &buf).map_err(|e| DataError::io(&tmp_path, e))?;
        fs::rename(&tmp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            DataError::CacheError(format!("atomic rename failed: {e}"))
        })?;

        let meta = CacheMeta {
            symbol: series.symbol().to_string(),
            start_date: series.first().date,
            end_date: series.last().date,
            bar_count: series.len(),
            data_hash: blake3::hash(&buf).to_hex().to_string(),
            cached_at: chrono::Local::now().naive_local(),
        };
        let meta_json = serde_json::to_string_pretty(&meta)
            .map_err(|e| DataError::CacheError(format!("meta serialization: {e}")))?;
        let meta_path = self.meta_path(series.symbol());
        fs::write(&meta_path, meta_json).map_err(|e| DataError::io(&meta_path, e))?;

        debug!(symbol = series.symbol(), bars = series.len(), "cached series");
        Ok(())
    }
}

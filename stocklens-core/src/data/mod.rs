//! Data layer: providers, the on-disk cache, and cache-first loading.

pub mod cache;
pub mod csv_format;
pub mod provider;
pub mod source;

pub use cache::{CacheMeta, CacheStatus, CachedSeries, CsvCache, PriceStore, DEFAULT_MAX_AGE};
pub use provider::{CsvFileProvider, DataError, DataSource, PriceProvider};
pub use source::{CachedSource, LoadedSeries, RetryPolicy};

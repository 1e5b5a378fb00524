//! Cache-first series loading.
//!
//! Resolution order for `load(symbol, refresh)`:
//! 1. Fresh cache entry (skipped when `refresh` is set)
//! 2. Provider fetch, written back to the cache; transient errors are
//!    retried with exponential backoff
//! 3. Stale cache entry if the fetch failed
//! 4. Otherwise the fetch error

use super::cache::PriceStore;
use super::provider::{DataError, DataSource, PriceProvider};
use crate::domain::PriceSeries;
use std::time::Duration;
use tracing::{info, warn};

/// How many times to ask the provider, and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total fetch attempts, including the first.
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Pause after failed attempt `attempt` (0-based): `base_delay * 2^attempt`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// A series plus where it came from.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub series: PriceSeries,
    pub source: DataSource,
}

pub struct CachedSource {
    provider: Box<dyn PriceProvider>,
    store: Box<dyn PriceStore>,
    retry: RetryPolicy,
}

impl CachedSource {
    pub fn new(provider: Box<dyn PriceProvider>, store: Box<dyn PriceStore>) -> Self {
        Self {
            provider,
            store,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn load(&self, symbol: &str, refresh: bool) -> Result<LoadedSeries, DataError> {
        let cached = self.store.load(symbol)?;

        if let Some(hit) = &cached {
            if hit.fresh && !refresh {
                info!(symbol, bars = hit.series.len(), "loaded from cache");
                return Ok(LoadedSeries {
                    series: hit.series.clone(),
                    source: DataSource::Cache,
                });
            }
        }

        match self.fetch_with_retry(symbol) {
            Ok(series) => {
                if let Err(e) = self.store.store(&series) {
                    warn!(symbol, error = %e, "failed to write cache");
                }
                info!(
                    symbol,
                    provider = self.provider.name(),
                    bars = series.len(),
                    "fetched from provider"
                );
                Ok(LoadedSeries {
                    series,
                    source: DataSource::Provider,
                })
            }
            Err(e) => match cached {
                Some(stale) => {
                    warn!(symbol, error = %e, "fetch failed, using stale cache");
                    Ok(LoadedSeries {
                        series: stale.series,
                        source: DataSource::StaleCache,
                    })
                }
                None => Err(e),
            },
        }
    }

    fn fetch_with_retry(&self, symbol: &str) -> Result<PriceSeries, DataError> {
        let attempts = self.retry.max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 0..attempts {
            match self.provider.fetch(symbol) {
                Ok(series) => return Ok(series),
                // Only I/O and cache failures can clear up on a second try.
                Err(e) if !e.is_transient() => return Err(e),
                Err(e) => {
                    warn!(symbol, attempt = attempt + 1, error = %e, "fetch attempt failed");
                    last_error = e.to_string();
                }
            }
            if attempt + 1 < attempts {
                std::thread::sleep(self.retry.delay_after(attempt));
            }
        }

        Err(DataError::RetriesExhausted {
            symbol: symbol.to_string(),
            attempts,
            last_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::cache::CachedSeries;
    use crate::domain::PriceBar;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    fn series(symbol: &str, close: f64) -> PriceSeries {
        let bar = PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 100,
        };
        PriceSeries::new(symbol, vec![bar]).unwrap()
    }

    /// Fails `failures` times with a transient error, then succeeds.
    struct FlakyProvider {
        failures: u32,
        calls: Arc<AtomicU32>,
    }

    impl PriceProvider for FlakyProvider {
        fn name(&self) -> &str {
            "flaky"
        }

        fn fetch(&self, symbol: &str) -> Result<PriceSeries, DataError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(DataError::CacheError("connection reset".into()))
            } else {
                Ok(series(symbol, 50.0))
            }
        }
    }

    struct MissingProvider {
        calls: Arc<AtomicU32>,
    }

    impl PriceProvider for MissingProvider {
        fn name(&self) -> &str {
            "missing"
        }

        fn fetch(&self, symbol: &str) -> Result<PriceSeries, DataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            })
        }
    }

    /// Always returns a malformed-file error.
    struct BrokenProvider {
        calls: Arc<AtomicU32>,
    }

    impl PriceProvider for BrokenProvider {
        fn name(&self) -> &str {
            "broken"
        }

        fn fetch(&self, _symbol: &str) -> Result<PriceSeries, DataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(DataError::Parse("bad date: 2024-13-45".into()))
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        entry: Mutex<Option<CachedSeries>>,
    }

    impl MemoryStore {
        fn holding(series: PriceSeries, fresh: bool) -> Self {
            Self {
                entry: Mutex::new(Some(CachedSeries { series, fresh })),
            }
        }
    }

    impl PriceStore for MemoryStore {
        fn load(&self, _symbol: &str) -> Result<Option<CachedSeries>, DataError> {
            Ok(self.entry.lock().unwrap().clone())
        }

        fn store(&self, series: &PriceSeries) -> Result<(), DataError> {
            *self.entry.lock().unwrap() = Some(CachedSeries {
                series: series.clone(),
                fresh: true,
            });
            Ok(())
        }
    }

    fn no_wait() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::ZERO,
        }
    }

    fn flaky(failures: u32) -> (Box<FlakyProvider>, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let provider = Box::new(FlakyProvider {
            failures,
            calls: Arc::clone(&calls),
        });
        (provider, calls)
    }

    #[test]
    fn fresh_cache_skips_provider() {
        let (provider, calls) = flaky(0);
        let store = MemoryStore::holding(series("SPY", 10.0), true);
        let source = CachedSource::new(provider, Box::new(store)).with_retry(no_wait());

        let loaded = source.load("SPY", false).unwrap();
        assert_eq!(loaded.source, DataSource::Cache);
        assert_eq!(loaded.series.last().close, 10.0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn refresh_bypasses_fresh_cache() {
        let (provider, calls) = flaky(0);
        let store = MemoryStore::holding(series("SPY", 10.0), true);
        let source = CachedSource::new(provider, Box::new(store)).with_retry(no_wait());

        let loaded = source.load("SPY", true).unwrap();
        assert_eq!(loaded.source, DataSource::Provider);
        assert_eq!(loaded.series.last().close, 50.0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn transient_failures_are_retried() {
        let (provider, calls) = flaky(2);
        let source =
            CachedSource::new(provider, Box::new(MemoryStore::default())).with_retry(no_wait());

        let loaded = source.load("SPY", false).unwrap();
        assert_eq!(loaded.source, DataSource::Provider);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn fetched_series_is_written_back() {
        let (provider, _) = flaky(0);
        let source =
            CachedSource::new(provider, Box::new(MemoryStore::default())).with_retry(no_wait());

        source.load("SPY", false).unwrap();
        let again = source.load("SPY", false).unwrap();
        assert_eq!(again.source, DataSource::Cache);
    }

    #[test]
    fn exhausted_retries_fall_back_to_stale_cache() {
        let (provider, calls) = flaky(10);
        let store = MemoryStore::holding(series("SPY", 10.0), false);
        let source = CachedSource::new(provider, Box::new(store)).with_retry(no_wait());

        let loaded = source.load("SPY", false).unwrap();
        assert_eq!(loaded.source, DataSource::StaleCache);
        assert_eq!(loaded.series.last().close, 10.0);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn exhausted_retries_without_cache_is_error() {
        let (provider, _) = flaky(10);
        let source =
            CachedSource::new(provider, Box::new(MemoryStore::default())).with_retry(no_wait());

        match source.load("SPY", false) {
            Err(DataError::RetriesExhausted {
                symbol, attempts, ..
            }) => {
                assert_eq!(symbol, "SPY");
                assert_eq!(attempts, 3);
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
    }

    #[test]
    fn unknown_symbol_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let provider = Box::new(MissingProvider {
            calls: Arc::clone(&calls),
        });
        let source =
            CachedSource::new(provider, Box::new(MemoryStore::default())).with_retry(no_wait());

        assert!(matches!(
            source.load("NOPE", false),
            Err(DataError::SymbolNotFound { .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn malformed_data_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let provider = Box::new(BrokenProvider {
            calls: Arc::clone(&calls),
        });
        let source = CachedSource::new(provider, Box::new(MemoryStore::default())).with_retry(
            RetryPolicy {
                max_attempts: 3,
                base_delay: Duration::from_secs(60),
            },
        );

        match source.load("SPY", false) {
            Err(DataError::Parse(msg)) => assert_eq!(msg, "bad date: 2024-13-45"),
            other => panic!("expected Parse, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn malformed_data_falls_back_to_stale_cache() {
        let calls = Arc::new(AtomicU32::new(0));
        let provider = Box::new(BrokenProvider {
            calls: Arc::clone(&calls),
        });
        let store = MemoryStore::holding(series("SPY", 10.0), false);
        let source = CachedSource::new(provider, Box::new(store)).with_retry(no_wait());

        let loaded = source.load("SPY", false).unwrap();
        assert_eq!(loaded.source, DataSource::StaleCache);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn backoff_doubles() {
        let policy = RetryPolicy {
            max_attempts: 4,
            base_delay: Duration::from_millis(100),
        };
        assert_eq!(policy.delay_after(0), Duration::from_millis(100));
        assert_eq!(policy.delay_after(1), Duration::from_millis(200));
        assert_eq!(policy.delay_after(2), Duration::from_millis(400));
    }
}

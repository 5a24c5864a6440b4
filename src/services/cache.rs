//! Time-expiring result cache keyed by input checksums.
//!
//! Repeated invocations with identical inputs (same table snapshot, same
//! parameters) are memoized with a time-based expiry to avoid re-running
//! expensive model fits on every dashboard interaction. This is an
//! optimization, never a correctness requirement: recomputation is always
//! safe and always yields the same result for the same input. The cache is
//! an explicit value passed around by the caller — there is no
//! process-global memoization tied to any framework lifecycle.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::config::CacheSettings;
use crate::core::domain::CountSeries;

/// Cache key for a count series plus operation parameters.
///
/// The key hashes the series' cadence, date range, and values together
/// with the serialized parameters, so any change to the input data or the
/// request produces a distinct entry.
pub fn series_key<P: Serialize>(series: &CountSeries, operation: &str, params: &P) -> String {
    let mut hasher = Sha256::new();
    hasher.update(operation.as_bytes());
    hasher.update(series.cadence.tag().as_bytes());
    if let (Some(first), Some(last)) = (series.first_date(), series.last_date()) {
        hasher.update(first.to_string().as_bytes());
        hasher.update(last.to_string().as_bytes());
    }
    for point in &series.points {
        hasher.update(point.count.to_bits().to_le_bytes());
    }
    let params_json =
        serde_json::to_string(params).unwrap_or_else(|_| "unserializable".to_string());
    hasher.update(params_json.as_bytes());

    hex::encode(hasher.finalize())
}

struct CacheEntry<T> {
    value: T,
    expires_at: Instant,
}

/// A TTL cache over analysis results.
///
/// Entries own immutable result values; the interior mutex only guards the
/// map itself. A zero TTL disables storage entirely.
pub struct AnalysisCache<T: Clone> {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
}

impl<T: Clone> AnalysisCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Builds a cache sized by the configured TTL.
    pub fn from_settings(settings: &CacheSettings) -> Self {
        Self::new(Duration::from_secs(settings.ttl_seconds))
    }

    /// Returns the cached value for `key` if present and not expired.
    pub fn get(&self, key: &str) -> Option<T> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Returns the cached value or computes, stores, and returns it.
    pub fn get_or_compute(&self, key: String, compute: impl FnOnce() -> T) -> T {
        if let Some(hit) = self.get(&key) {
            return hit;
        }

        let value = compute();
        if !self.ttl.is_zero() {
            let mut entries = self.entries.lock().expect("cache lock poisoned");
            entries.insert(
                key,
                CacheEntry {
                    value: value.clone(),
                    expires_at: Instant::now() + self.ttl,
                },
            );
        }
        value
    }

    /// Drops every expired entry.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.retain(|_, entry| entry.expires_at > now);
    }

    /// Number of live entries, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::{Cadence, CountPoint};
    use chrono::NaiveDate;

    fn series(values: &[f64]) -> CountSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        CountSeries::new(
            Cadence::Daily,
            values
                .iter()
                .enumerate()
                .map(|(i, &count)| CountPoint {
                    date: start + chrono::Duration::days(i as i64),
                    count,
                })
                .collect(),
        )
    }

    #[test]
    fn test_key_is_stable_for_identical_inputs() {
        let a = series_key(&series(&[1.0, 2.0]), "order", &());
        let b = series_key(&series(&[1.0, 2.0]), "order", &());
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_changes_with_values_and_params() {
        let base = series_key(&series(&[1.0, 2.0]), "order", &());
        assert_ne!(base, series_key(&series(&[1.0, 3.0]), "order", &()));
        assert_ne!(base, series_key(&series(&[1.0, 2.0]), "forecast", &()));
        assert_ne!(base, series_key(&series(&[1.0, 2.0]), "order", &90u32));
    }

    #[test]
    fn test_get_or_compute_memoizes() {
        let cache: AnalysisCache<u32> = AnalysisCache::new(Duration::from_secs(60));
        let mut calls = 0;
        let first = cache.get_or_compute("k".to_string(), || {
            calls += 1;
            7
        });
        let second = cache.get_or_compute("k".to_string(), || {
            calls += 1;
            8
        });
        assert_eq!(first, 7);
        assert_eq!(second, 7);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_zero_ttl_disables_storage() {
        let cache: AnalysisCache<u32> = AnalysisCache::new(Duration::ZERO);
        cache.get_or_compute("k".to_string(), || 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_purge_drops_expired_entries() {
        let cache: AnalysisCache<u32> = AnalysisCache::new(Duration::from_nanos(1));
        cache.get_or_compute("k".to_string(), || 1);
        std::thread::sleep(Duration::from_millis(2));
        cache.purge_expired();
        assert!(cache.is_empty());
    }
}

//! In-memory response cache keyed by request URL
//!
//! Provides a `ResponseCache` that stores raw JSON payloads together with the
//! time they were cached. Entries older than the freshness window are reported
//! as expired and treated as misses by the gateway; they stay in the map until
//! the next successful fetch of the same URL overwrites them.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// How long a cached response is served without going back to the network
pub const FRESHNESS_WINDOW: Duration = Duration::from_secs(5 * 60);

/// A stored response payload
#[derive(Debug, Clone)]
struct CacheEntry {
    /// The response body as parsed JSON
    data: Value,
    /// When the response was stored
    cached_at: DateTime<Utc>,
}

/// Result of reading from cache, including metadata about cache freshness
#[derive(Debug, Clone)]
pub struct CachedData<T> {
    /// The cached data
    pub data: T,
    /// When the data was originally cached
    pub cached_at: DateTime<Utc>,
    /// Whether the entry is older than the freshness window
    pub is_expired: bool,
}

/// Shared map of request URL to response payload
///
/// Cloning is cheap and every clone sees the same entries, so one cache can be
/// handed to the gateway and to background tasks alike. Concurrent writes to
/// the same key are last-writer-wins.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    entries: Arc<Mutex<HashMap<String, CacheEntry>>>,
    ttl: Duration,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseCache {
    /// Creates an empty cache using the standard five minute freshness window
    pub fn new() -> Self {
        Self::with_ttl(FRESHNESS_WINDOW)
    }

    /// Creates an empty cache with a custom freshness window
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Returns the freshness window used by this cache
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_fresh(&self, cached_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let age = now
            .signed_duration_since(cached_at)
            .to_std()
            .unwrap_or(Duration::MAX);

        age < self.ttl
    }

    /// Reads an entry regardless of age
    ///
    /// Returns `None` if nothing was ever stored under `key`. Expired entries
    /// are still returned, flagged with `is_expired = true`.
    pub fn get(&self, key: &str) -> Option<CachedData<Value>> {
        let entries = self.entries();
        let entry = entries.get(key)?;

        Some(CachedData {
            data: entry.data.clone(),
            cached_at: entry.cached_at,
            is_expired: !self.is_fresh(entry.cached_at, Utc::now()),
        })
    }

    /// Reads an entry only if it is still within the freshness window
    pub fn get_fresh(&self, key: &str) -> Option<Value> {
        self.get(key)
            .filter(|cached| !cached.is_expired)
            .map(|cached| cached.data)
    }

    /// Returns true if `key` has an entry younger than the freshness window
    pub fn has_fresh(&self, key: &str) -> bool {
        self.get(key).is_some_and(|cached| !cached.is_expired)
    }

    /// Stores a payload under `key`, stamped with the current time
    pub fn set(&self, key: &str, data: Value) {
        self.set_at(key, data, Utc::now());
    }

    /// Stores a payload with an explicit timestamp, overwriting any previous entry
    pub fn set_at(&self, key: &str, data: Value, cached_at: DateTime<Utc>) {
        self.entries()
            .insert(key.to_string(), CacheEntry { data, cached_at });
    }

    /// Number of stored entries, fresh or expired
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Returns true if nothing has been stored yet
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

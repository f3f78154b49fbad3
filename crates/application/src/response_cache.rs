//! Time-bounded response cache
//!
//! Stores rendered forecast payloads by [`CacheKey`]. Freshness is checked at
//! read time against an injectable [`Clock`]; expired entries are treated as
//! misses and stay in place until the next `put` for the same key replaces
//! them. There is no size bound and no background eviction.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use domain::{CacheKey, TablePayload};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default time-to-live for cached responses (10 minutes)
pub const DEFAULT_RESPONSE_TTL: Duration = Duration::from_secs(600);

/// Source of the current time
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for simulated time
#[derive(Debug)]
pub struct ManualClock {
    now: RwLock<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(start),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: TimeDelta) {
        let mut now = self.now.write();
        *now += by;
    }

    /// Jump to an absolute instant
    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.write() = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read()
    }
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of fresh lookups
    pub hits: u64,
    /// Number of lookups that found nothing or an expired entry
    pub misses: u64,
    /// Entries currently stored, including expired ones
    pub entries: u64,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: TablePayload,
    inserted_at: DateTime<Utc>,
}

/// In-memory TTL cache of forecast payloads
pub struct ResponseCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    in_flight: Mutex<HashMap<CacheKey, Arc<tokio::sync::Mutex<()>>>>,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseCache")
            .field("ttl", &self.ttl)
            .field("clock", &self.clock)
            .field("entries", &self.entries.read().len())
            .finish_non_exhaustive()
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_RESPONSE_TTL)
    }
}

impl ResponseCache {
    /// Create a cache on the system clock
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Create a cache on a custom clock
    #[must_use]
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            clock,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Configured time-to-live
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl.to_std().unwrap_or(Duration::MAX)
    }

    /// Look up a fresh entry
    ///
    /// An entry is fresh while `now - inserted_at < ttl`.
    pub fn get(&self, key: &CacheKey) -> Option<TablePayload> {
        let found = self.lookup(key);
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "Response cache hit");
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "Response cache miss");
        }
        found
    }

    /// Store a payload, replacing any previous entry for the key
    pub fn put(&self, key: CacheKey, payload: TablePayload) {
        let entry = CacheEntry {
            payload,
            inserted_at: self.clock.now(),
        };
        self.entries.write().insert(key, entry);
    }

    /// Return the fresh entry for `key`, or run `fetch` and store its result
    ///
    /// Concurrent callers missing on the same key are serialized, so at most
    /// one `fetch` per key runs at a time; waiters re-check the cache once the
    /// running fetch completes. Errors are returned without being stored.
    pub async fn get_or_try_insert_with<F, Fut, E>(
        &self,
        key: CacheKey,
        fetch: F,
    ) -> Result<TablePayload, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<TablePayload, E>>,
    {
        if let Some(payload) = self.get(&key) {
            return Ok(payload);
        }

        let gate = Arc::clone(self.in_flight.lock().entry(key.clone()).or_default());
        let guard = gate.lock().await;

        let result = match self.lookup(&key) {
            Some(payload) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "Response filled by concurrent request");
                Ok(payload)
            },
            None => {
                let result = fetch().await;
                if let Ok(payload) = &result {
                    self.put(key.clone(), payload.clone());
                }
                result
            },
        };

        drop(guard);
        self.release(&key, gate);
        result
    }

    /// Snapshot of hit/miss counters and entry count
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.read().len() as u64,
        }
    }

    fn release(&self, key: &CacheKey, gate: Arc<tokio::sync::Mutex<()>>) {
        let mut in_flight = self.in_flight.lock();
        drop(gate);
        // the map holds the last reference once no caller is waiting
        if in_flight.get(key).is_some_and(|g| Arc::strong_count(g) == 1) {
            in_flight.remove(key);
        }
    }

    fn lookup(&self, key: &CacheKey) -> Option<TablePayload> {
        let now = self.clock.now();
        self.entries
            .read()
            .get(key)
            .filter(|entry| now - entry.inserted_at < self.ttl)
            .map(|entry| entry.payload.clone())
    }
}

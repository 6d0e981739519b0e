//! Time-limited cache for parsed command results
//!
//! Every PanCLI read costs a round trip through the single serialized shell,
//! so domain services keep one cache per entity type. Entries expire lazily:
//! an expired entry is dropped by the `get` that finds it, there is no
//! background sweeper.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Default TTL for performance summaries (30 seconds)
pub const PERFORMANCE_TTL: Duration = Duration::from_secs(30);
/// Default TTL for volume lists (2 minutes)
pub const VOLUMES_TTL: Duration = Duration::from_secs(120);
/// Default TTL for pool lists (2 minutes)
pub const POOLS_TTL: Duration = Duration::from_secs(120);
/// Default TTL for system info (5 minutes)
pub const SYSTEM_TTL: Duration = Duration::from_secs(300);
/// Default TTL for the event log (1 minute)
pub const ALERTS_TTL: Duration = Duration::from_secs(60);

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Keyed store with per-entry expiry
///
/// Values are replaced whole on `set`, never patched in place, so a reader
/// sees either the old value or the new one.
///
/// # Example
///
/// ```
/// use panbridge_core::cache::TtlCache;
/// use std::time::Duration;
///
/// let cache = TtlCache::new(Duration::from_secs(60));
/// cache.set("pools", vec![1, 2, 3], None);
/// assert_eq!(cache.get("pools"), Some(vec![1, 2, 3]));
///
/// cache.invalidate("pools");
/// assert_eq!(cache.get("pools"), None);
/// ```
pub struct TtlCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    default_ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    /// Creates an empty cache whose entries live for `default_ttl` unless told otherwise
    #[must_use]
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            default_ttl,
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a clone of the value if it has not expired
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    /// Like [`get`](Self::get), evaluated at `now`
    pub fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        let mut entries = self.entries();
        match entries.get(key) {
            Some(entry) if now < entry.expires_at => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                tracing::trace!(key, "Cache entry expired");
                None
            }
            None => None,
        }
    }

    /// Stores a value, replacing any previous one
    ///
    /// `ttl` of `None` uses the cache default.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        self.set_at(key, value, ttl, Instant::now());
    }

    /// Like [`set`](Self::set), as if stored at `now`
    pub fn set_at(&self, key: impl Into<String>, value: V, ttl: Option<Duration>, now: Instant) {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let expires_at = now.checked_add(ttl).unwrap_or(now);
        self.entries()
            .insert(key.into(), CacheEntry { value, expires_at });
    }

    /// Removes one entry
    pub fn invalidate(&self, key: &str) {
        self.entries().remove(key);
    }

    /// Removes every entry
    pub fn invalidate_all(&self) {
        self.entries().clear();
    }

    /// Number of stored entries, expired ones included until read
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Returns `true` if nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Default time-to-live
    #[must_use]
    pub const fn default_ttl(&self) -> Duration {
        self.default_ttl
    }
}

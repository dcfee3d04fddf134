//! In-memory cache for cookies fetched from CookieCloud.
//!
//! Entries are keyed by `(server, uuid)` and remember the identity of the
//! credential that produced them. Expiry is checked lazily on read; there is
//! no background eviction.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use tracing::debug;

/// How long a fetched cookie stays usable.
pub const COOKIE_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Millisecond wall clock.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}

#[derive(Debug, Clone)]
struct CachedSession {
    cookie: String,
    fetched_at: u64,
    identity: String,
}

/// Snapshot returned by [`CookieCache::stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub size: usize,
    pub ttl: Duration,
}

pub struct CookieCache {
    entries: Mutex<HashMap<String, CachedSession>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl Default for CookieCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CookieCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieCache")
            .field("size", &self.entries.lock().len())
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl CookieCache {
    /// Cache on the system clock with the default TTL.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
            ttl: COOKIE_TTL,
        }
    }

    fn key(server: &str, uuid: &str) -> String {
        format!("{server}:{uuid}")
    }

    /// Cached cookie for `(server, uuid)`, or `None` when absent, expired, or
    /// stored under a different credential identity. Stale entries are dropped.
    pub fn get(&self, server: &str, uuid: &str, identity: &str) -> Option<String> {
        let key = Self::key(server, uuid);
        let mut entries = self.entries.lock();
        let entry = entries.get(&key)?;

        if entry.identity != identity {
            debug!(%key, "cached cookie belongs to another credential");
            entries.remove(&key);
            return None;
        }

        let age = self.clock.now_millis().saturating_sub(entry.fetched_at);
        if u128::from(age) > self.ttl.as_millis() {
            debug!(%key, age_ms = age, "cached cookie expired");
            entries.remove(&key);
            return None;
        }

        Some(entry.cookie.clone())
    }

    /// Store `cookie` for `(server, uuid)`, stamped with the current time.
    pub fn set(&self, server: &str, uuid: &str, cookie: &str, identity: &str) {
        let entry = CachedSession {
            cookie: cookie.to_owned(),
            fetched_at: self.clock.now_millis(),
            identity: identity.to_owned(),
        };
        self.entries.lock().insert(Self::key(server, uuid), entry);
    }

    /// Drop the entry for `(server, uuid)`, if any.
    pub fn invalidate(&self, server: &str, uuid: &str) {
        if self.entries.lock().remove(&Self::key(server, uuid)).is_some() {
            debug!(server, "invalidated cached cookie");
        }
    }

    /// Drop every entry.
    pub fn invalidate_all(&self) {
        self.entries.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.lock().len(),
            ttl: self.ttl,
        }
    }
}

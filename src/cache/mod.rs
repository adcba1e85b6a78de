use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use parking_lot::RwLock;
use serde::Serialize;

use crate::news::Article;

/// Namespace tag prefixed to every derived key.
pub const KEY_NAMESPACE: &str = "news";
/// Delimiter between sorted preference terms inside a key.
pub const KEY_DELIMITER: &str = "|";
/// Fixed key for an empty preference set.
pub const EMPTY_KEY: &str = "news:all";

/// Derive the cache key for a preference set.
///
/// Pure function: an empty set maps to the fixed sentinel, a non-empty set
/// is sorted lexicographically and joined, so any two sets holding the same
/// multiset of terms address the same entry regardless of order. Duplicate
/// terms are kept as-is.
pub fn derive_key(preferences: &[String]) -> String {
    if preferences.is_empty() {
        return EMPTY_KEY.to_string();
    }

    let mut sorted: Vec<&str> = preferences.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    format!("{}:{}", KEY_NAMESPACE, sorted.join(KEY_DELIMITER))
}

/// Cache entry with absolute expiry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub data: Vec<Article>,
    pub stored_at: SystemTime,
    pub expires_at: SystemTime,
}

impl CacheEntry {
    pub fn new(data: Vec<Article>, ttl: Duration) -> Self {
        let now = SystemTime::now();
        Self {
            data,
            stored_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        SystemTime::now() > self.expires_at
    }

    pub fn age(&self) -> Duration {
        SystemTime::now()
            .duration_since(self.stored_at)
            .unwrap_or_default()
    }
}

/// Snapshot of cache occupancy, partitioned by expiry at observation time.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    pub total: usize,
    pub valid: usize,
    pub expired: usize,
}

/// Process-wide article cache keyed by normalized preference sets.
///
/// Expired entries are evicted lazily by the `get` that observes them; there
/// is no background sweeper, so entries for keys that are never re-read can
/// linger past expiry. Writes always fully overwrite, so same-key races
/// resolve as last-write-wins.
#[derive(Clone)]
pub struct NewsCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    default_ttl: Duration,
}

impl NewsCache {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Get the stored collection for a key, if present and unexpired.
    ///
    /// Observing an expired entry deletes it before returning `None`; no
    /// expired data is ever handed out.
    pub fn get(&self, key: &str) -> Option<Vec<Article>> {
        let mut entries = self.entries.write();

        match entries.get(key) {
            Some(entry) if entry.is_expired() => {
                entries.remove(key);
                None
            }
            Some(entry) => Some(entry.data.clone()),
            None => None,
        }
    }

    /// Store a collection under a key with the default TTL, overwriting any
    /// existing entry.
    pub fn set(&self, key: &str, data: Vec<Article>) {
        self.set_with_ttl(key, data, self.default_ttl);
    }

    /// Store with an explicit TTL override.
    pub fn set_with_ttl(&self, key: &str, data: Vec<Article>, ttl: Duration) {
        let entry = CacheEntry::new(data, ttl);
        self.entries.write().insert(key.to_string(), entry);
    }

    /// Explicit invalidation of one key. Returns whether an entry existed.
    pub fn delete(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Scan all entries and partition by current expiry.
    ///
    /// Observability only: unlike `get`, the scan never evicts, so repeated
    /// calls see the same expired entries until something reads them.
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.read();
        let total = entries.len();
        let expired = entries.values().filter(|e| e.is_expired()).count();

        CacheStats {
            total,
            valid: total - expired,
            expired,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// All current keys (for debugging/testing).
    pub fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }
}

impl Default for NewsCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(300))
    }
}

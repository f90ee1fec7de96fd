// src/cache.rs

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// A cached CSV body and the moment it was fetched.
#[derive(Debug, Clone)]
pub struct Entry {
    pub value: String,
    pub fetched_at: DateTime<Utc>,
}

impl Entry {
    /// Freshness is judged by the caller against its own TTL; the cache
    /// itself never evicts.
    pub fn is_fresh(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now - self.fetched_at < ttl
    }
}

/// Process-local cache of raw dataset bodies, keyed by dataset name.
///
/// Lookup and population are not coordinated beyond the map lock: two
/// concurrent misses both refetch and the last write wins. Tolerated, not
/// prevented, since the values are re-derivable.
#[derive(Debug, Default)]
pub struct SheetCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl SheetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Entry> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn put(&self, key: &str, value: String, fetched_at: DateTime<Utc>) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), Entry { value, fetched_at });
    }
}

// Client-side session persistence
// Keyed string store with per-entry expiry, standing in for browser storage.
// Entries are lazily dropped on read once past their deadline; purge_expired
// sweeps the rest.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

// Absolute deadline `ttl` from now, saturating instead of overflowing on
// absurdly large durations
pub(crate) fn deadline_after(ttl: Duration) -> DateTime<Utc> {
    let delta = chrono::Duration::from_std(ttl)
        .unwrap_or_else(|_| chrono::Duration::days(365 * 100));
    Utc::now()
        .checked_add_signed(delta)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

pub trait SessionStore: Send + Sync + 'static {
    fn put(&self, key: &str, value: String, ttl: Duration);
    fn get(&self, key: &str) -> Option<String>;
    fn remove(&self, key: &str);
}

#[derive(Debug, Clone)]
struct StoredValue {
    value: String,
    expires_at: DateTime<Utc>,
}

impl StoredValue {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Default)]
struct StoreStats {
    hits: AtomicUsize,
    misses: AtomicUsize,
    expired: AtomicUsize,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionStoreStats {
    pub hits: usize,
    pub misses: usize,
    pub expired: usize,
}

#[derive(Default)]
pub struct InMemorySessionStore {
    entries: DashMap<String, StoredValue>,
    stats: StoreStats,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> SessionStoreStats {
        SessionStoreStats {
            hits: self.stats.hits.load(Ordering::SeqCst),
            misses: self.stats.misses.load(Ordering::SeqCst),
            expired: self.stats.expired.load(Ordering::SeqCst),
        }
    }

    // Drop every entry past its deadline, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.entries.len();
        self.entries.retain(|_, stored| !stored.is_expired(now));
        let removed = before - self.entries.len();
        if removed > 0 {
            self.stats.expired.fetch_add(removed, Ordering::SeqCst);
            debug!(removed, "purged expired sessions");
        }
        removed
    }
}

impl SessionStore for InMemorySessionStore {
    fn put(&self, key: &str, value: String, ttl: Duration) {
        let stored = StoredValue {
            value,
            expires_at: deadline_after(ttl),
        };
        self.entries.insert(key.to_string(), stored);
    }

    fn get(&self, key: &str) -> Option<String> {
        let now = Utc::now();
        // Decide inside the guard, remove after it drops
        let outcome = match self.entries.get(key) {
            Some(stored) if !stored.is_expired(now) => {
                self.stats.hits.fetch_add(1, Ordering::SeqCst);
                return Some(stored.value.clone());
            }
            Some(_) => true,
            None => false,
        };
        if outcome {
            self.entries.remove(key);
            self.stats.expired.fetch_add(1, Ordering::SeqCst);
        }
        self.stats.misses.fetch_add(1, Ordering::SeqCst);
        None
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEEK: Duration = Duration::from_secs(7 * 24 * 60 * 60);

    #[test]
    fn put_then_get_round_trips() {
        let store = InMemorySessionStore::new();
        store.put("talek_user_session", "{\"user\":\"demo\"}".to_string(), WEEK);

        assert_eq!(
            store.get("talek_user_session").as_deref(),
            Some("{\"user\":\"demo\"}")
        );
        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 0);
    }

    #[test]
    fn missing_key_counts_a_miss() {
        let store = InMemorySessionStore::new();
        assert_eq!(store.get("absent"), None);
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn expired_entry_is_dropped_on_read() {
        let store = InMemorySessionStore::new();
        store.put("stale", "old".to_string(), Duration::ZERO);

        assert_eq!(store.get("stale"), None);
        assert!(store.is_empty());
        let stats = store.stats();
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn put_overwrites_existing_value() {
        let store = InMemorySessionStore::new();
        store.put("key", "first".to_string(), WEEK);
        store.put("key", "second".to_string(), WEEK);

        assert_eq!(store.get("key").as_deref(), Some("second"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_clears_the_entry() {
        let store = InMemorySessionStore::new();
        store.put("key", "value".to_string(), WEEK);
        store.remove("key");

        assert_eq!(store.get("key"), None);
    }

    #[test]
    fn purge_sweeps_only_expired_entries() {
        let store = InMemorySessionStore::new();
        store.put("live", "a".to_string(), WEEK);
        store.put("dead1", "b".to_string(), Duration::ZERO);
        store.put("dead2", "c".to_string(), Duration::ZERO);

        assert_eq!(store.purge_expired(), 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("live").as_deref(), Some("a"));
        assert_eq!(store.stats().expired, 2);
    }

    #[test]
    fn deadline_saturates_on_huge_ttl() {
        let deadline = deadline_after(Duration::from_secs(u64::MAX));
        assert!(deadline > Utc::now());
    }
}

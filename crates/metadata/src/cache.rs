//! In-memory TTL cache for catalog lists.
//!
//! Entries live in insertion order. A write replaces any entry with the same
//! key and evicts the oldest entry once the capacity is exceeded; expired
//! entries are only dropped by those two paths.

use std::collections::VecDeque;
use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use cinestream_core::MediaRecord;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            capacity: 20,
        }
    }
}

struct CacheEntry {
    key: String,
    payload: Vec<MediaRecord>,
    inserted: Instant,
    inserted_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_valid(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.inserted) < ttl
    }
}

/// Snapshot of the cache contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub valid: usize,
    pub total: usize,
    pub oldest_inserted_at: Option<DateTime<Utc>>,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cache: {}/{} entries valid, oldest: ", self.valid, self.total)?;
        match self.oldest_inserted_at {
            Some(ts) => write!(f, "{}", ts.to_rfc3339()),
            None => f.write_str("none"),
        }
    }
}

pub struct MetadataCache {
    config: CacheConfig,
    entries: Mutex<VecDeque<CacheEntry>>,
}

impl MetadataCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            entries: Mutex::new(VecDeque::new()),
        }
    }

    /// A copy of the payload stored under `key`, if still valid.
    pub fn lookup(&self, key: &str) -> Option<Vec<MediaRecord>> {
        let now = Instant::now();
        let entries = self.entries.lock();
        entries
            .iter()
            .find(|e| e.key == key && e.is_valid(now, self.config.ttl))
            .map(|e| e.payload.clone())
    }

    pub fn insert(&self, key: impl Into<String>, payload: Vec<MediaRecord>) {
        let key = key.into();
        let mut entries = self.entries.lock();

        entries.retain(|e| e.key != key);
        entries.push_back(CacheEntry {
            key,
            payload,
            inserted: Instant::now(),
            inserted_at: Utc::now(),
        });

        while entries.len() > self.config.capacity {
            if let Some(evicted) = entries.pop_front() {
                debug!(key = %evicted.key, "evicted oldest cache entry");
            }
        }
    }

    /// Serve `key` from the cache, or run `loader` and store its result.
    ///
    /// The lock is not held while the loader runs, so two concurrent misses on
    /// the same key both load and the later write wins.
    pub async fn get_or_load<F, Fut>(&self, key: &str, loader: F) -> Vec<MediaRecord>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Vec<MediaRecord>>,
    {
        if let Some(hit) = self.lookup(key) {
            debug!(key, "cache hit");
            return hit;
        }

        debug!(key, "cache miss");
        let loaded = loader().await;
        self.insert(key, loaded.clone());
        loaded
    }

    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let entries = self.entries.lock();
        CacheStats {
            valid: entries
                .iter()
                .filter(|e| e.is_valid(now, self.config.ttl))
                .count(),
            total: entries.len(),
            oldest_inserted_at: entries.iter().map(|e| e.inserted_at).min(),
        }
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for MetadataCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinestream_core::MediaKind;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn records(ids: &[&str]) -> Vec<MediaRecord> {
        ids.iter()
            .map(|id| MediaRecord::new(*id, MediaKind::Movie))
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn hit_within_ttl_skips_loader() {
        let cache = MetadataCache::default();
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        let first = cache
            .get_or_load("popular_movies_1", || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                records(&["1", "2"])
            })
            .await;

        tokio::time::advance(Duration::from_secs(59 * 60)).await;

        let second = cache
            .get_or_load("popular_movies_1", || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                records(&["other"])
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entry_reloads() {
        let cache = MetadataCache::default();
        cache.insert("k", records(&["old"]));

        tokio::time::advance(Duration::from_secs(60 * 60)).await;
        assert!(cache.lookup("k").is_none());
        assert_eq!(cache.stats().valid, 0);
        assert_eq!(cache.stats().total, 1);

        let fresh = cache.get_or_load("k", || async { records(&["new"]) }).await;
        assert_eq!(fresh[0].id, "new");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn twenty_first_key_evicts_oldest() {
        let cache = MetadataCache::default();
        for i in 0..21 {
            cache.insert(format!("key_{i}"), records(&[&i.to_string()]));
        }

        assert_eq!(cache.len(), 20);
        assert!(cache.lookup("key_0").is_none());
        for i in 1..21 {
            assert!(cache.lookup(&format!("key_{i}")).is_some(), "key_{i} kept");
        }
    }

    #[test]
    fn same_key_keeps_last_write() {
        let cache = MetadataCache::default();
        cache.insert("trending_all_week", records(&["a"]));
        cache.insert("trending_all_week", records(&["b", "c"]));

        assert_eq!(cache.len(), 1);
        let hit = cache.lookup("trending_all_week").unwrap();
        assert_eq!(hit.len(), 2);
        assert_eq!(hit[0].id, "b");
    }

    #[test]
    fn reinserting_refreshes_eviction_order() {
        let cache = MetadataCache::new(CacheConfig {
            ttl: Duration::from_secs(60),
            capacity: 2,
        });
        cache.insert("a", records(&["a"]));
        cache.insert("b", records(&["b"]));
        cache.insert("a", records(&["a2"]));
        cache.insert("c", records(&["c"]));

        assert!(cache.lookup("b").is_none());
        assert!(cache.lookup("a").is_some());
        assert!(cache.lookup("c").is_some());
    }

    #[test]
    fn lookup_returns_a_copy() {
        let cache = MetadataCache::default();
        cache.insert("k", records(&["1"]));

        let mut copy = cache.lookup("k").unwrap();
        copy[0].title = "mutated".into();
        copy.clear();

        let again = cache.lookup("k").unwrap();
        assert_eq!(again.len(), 1);
        assert_eq!(again[0].title, "");
    }

    #[test]
    fn empty_payload_is_cached() {
        let cache = MetadataCache::default();
        cache.insert("k", Vec::new());
        assert_eq!(cache.lookup("k"), Some(Vec::new()));
    }

    #[test]
    fn stats_and_clear() {
        let cache = MetadataCache::default();
        let empty = cache.stats();
        assert_eq!(empty.total, 0);
        assert!(empty.oldest_inserted_at.is_none());
        assert_eq!(empty.to_string(), "Cache: 0/0 entries valid, oldest: none");

        cache.insert("a", records(&["1"]));
        cache.insert("b", records(&["2"]));
        let stats = cache.stats();
        assert_eq!(stats.valid, 2);
        assert_eq!(stats.total, 2);
        assert!(stats.oldest_inserted_at.is_some());
        assert!(stats.to_string().starts_with("Cache: 2/2 entries valid"));

        cache.clear();
        assert!(cache.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writers_respect_capacity() {
        let cache = Arc::new(MetadataCache::default());
        let mut tasks = Vec::new();
        for t in 0..8 {
            let cache = cache.clone();
            tasks.push(tokio::spawn(async move {
                for i in 0..50 {
                    let key = format!("k_{}", (t * 50 + i) % 30);
                    cache
                        .get_or_load(&key, || async { records(&["x"]) })
                        .await;
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(cache.len(), 20);
        let stats = cache.stats();
        assert_eq!(stats.valid, 20);
    }
}

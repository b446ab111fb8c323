//! Bounded response cache shared across step instances.

use std::sync::{Arc, Mutex};

use indexmap::IndexMap;

/// Thread-safe URL → response-body cache with LRU eviction.
///
/// The handle is cheap to clone; every clone shares the same underlying
/// store, which is how one cache built at host startup serves every step
/// instance. Entries never expire by time; the only bound is the entry
/// count. A capacity of 0 disables storage entirely, so every lookup
/// misses.
///
/// Concurrent misses for the same URL are tolerated: two threads may both
/// fetch and both `put`, and the second insert simply overwrites the first.
/// The cache deliberately does not de-duplicate in-flight fetches.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    // Map order is the recency queue: front is least recently used.
    entries: Arc<Mutex<IndexMap<String, String>>>,
    max_entries: usize,
}

impl ResponseCache {
    /// Create a cache holding at most `max_entries` response bodies.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(IndexMap::new())),
            max_entries,
        }
    }

    /// Look up a response body without triggering a fetch.
    ///
    /// A hit marks the entry most recently used.
    pub fn get(&self, url: &str) -> Option<String> {
        let mut entries = self.entries.lock().expect("cache lock");
        let body = entries.shift_remove(url)?;
        entries.insert(url.to_string(), body.clone());
        Some(body)
    }

    /// Insert or overwrite a response body, evicting beyond capacity.
    pub fn put(&self, url: &str, body: &str) {
        if self.max_entries == 0 {
            return;
        }
        let mut entries = self.entries.lock().expect("cache lock");
        entries.shift_remove(url);
        entries.insert(url.to_string(), body.to_string());
        while entries.len() > self.max_entries {
            entries.shift_remove_index(0);
        }
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache lock").len()
    }

    /// Returns true when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured maximum entry count.
    pub fn capacity(&self) -> usize {
        self.max_entries
    }
}

#[cfg(test)]
mod tests {
    use super::ResponseCache;

    #[test]
    fn stores_and_returns_bodies() {
        let cache = ResponseCache::new(10);
        assert_eq!(cache.get("http://a"), None);

        cache.put("http://a", "body-a");
        assert_eq!(cache.get("http://a").as_deref(), Some("body-a"));
    }

    #[test]
    fn clones_share_the_same_store() {
        let cache = ResponseCache::new(10);
        let other = cache.clone();
        cache.put("http://a", "body-a");
        assert_eq!(other.get("http://a").as_deref(), Some("body-a"));
    }

    #[test]
    fn put_overwrites_existing_entries() {
        let cache = ResponseCache::new(10);
        cache.put("http://a", "old");
        cache.put("http://a", "new");
        assert_eq!(cache.get("http://a").as_deref(), Some("new"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn eviction_keeps_entry_count_at_capacity() {
        let cache = ResponseCache::new(2);
        cache.put("http://a", "a");
        cache.put("http://b", "b");
        cache.put("http://c", "c");

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("http://a"), None, "oldest entry is evicted");
        assert_eq!(cache.get("http://b").as_deref(), Some("b"));
        assert_eq!(cache.get("http://c").as_deref(), Some("c"));
    }

    #[test]
    fn get_refreshes_recency() {
        let cache = ResponseCache::new(2);
        cache.put("http://a", "a");
        cache.put("http://b", "b");

        // Touch `a` so `b` becomes the eviction candidate.
        assert!(cache.get("http://a").is_some());
        cache.put("http://c", "c");

        assert_eq!(cache.get("http://a").as_deref(), Some("a"));
        assert_eq!(cache.get("http://b"), None);
    }

    #[test]
    fn zero_capacity_disables_storage() {
        let cache = ResponseCache::new(0);
        cache.put("http://a", "a");
        assert!(cache.is_empty());
        assert_eq!(cache.get("http://a"), None);
    }

    #[test]
    fn concurrent_readers_and_writers_do_not_panic() {
        use std::thread;

        let cache = ResponseCache::new(8);
        let mut handles = Vec::new();
        for worker in 0..4 {
            let cache = cache.clone();
            handles.push(thread::spawn(move || {
                for round in 0..100 {
                    let url = format!("http://host/{}", (worker + round) % 16);
                    cache.put(&url, "body");
                    let _ = cache.get(&url);
                }
            }));
        }
        for handle in handles {
            handle.join().expect("worker thread");
        }
        assert!(cache.len() <= 8);
    }
}

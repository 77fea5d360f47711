use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use parking_lot::Mutex;
use serde::Serialize;
use crate::api::handler::Operation;

/// Cache of rendered responses. The store never changes after load, so an
/// entry stays valid for the life of the process.
pub struct ResponseCache {
    cache: Option<Mutex<LruCache<CacheKey, serde_json::Value>>>,
    size_limit: usize,
    hit_count: AtomicUsize,
    miss_count: AtomicUsize,
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct CacheKey {
    pub operation: Operation,
    pub params: Vec<(String, String)>,
}

impl CacheKey {
    /// Parameter order does not change the response, except between
    /// repeated keys, so the sort is stable.
    pub fn new(operation: Operation, params: &[(String, String)]) -> Self {
        let mut params = params.to_vec();
        params.sort_by(|a, b| a.0.cmp(&b.0));
        CacheKey { operation, params }
    }
}

impl ResponseCache {
    /// A zero `size_limit` disables caching.
    pub fn new(size_limit: usize) -> Self {
        ResponseCache {
            cache: NonZeroUsize::new(size_limit).map(|cap| Mutex::new(LruCache::new(cap))),
            size_limit,
            hit_count: AtomicUsize::new(0),
            miss_count: AtomicUsize::new(0),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<serde_json::Value> {
        let cache = self.cache.as_ref()?;
        if let Some(response) = cache.lock().get(key) {
            self.hit_count.fetch_add(1, Ordering::Relaxed);
            Some(response.clone())
        } else {
            self.miss_count.fetch_add(1, Ordering::Relaxed);
            None
        }
    }

    pub fn put(&self, key: CacheKey, response: serde_json::Value) {
        if let Some(cache) = &self.cache {
            cache.lock().put(key, response);
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
            size: self.cache.as_ref().map_or(0, |c| c.lock().len()),
            capacity: self.size_limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub hit_count: usize,
    pub miss_count: usize,
    pub size: usize,
    pub capacity: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hit_count + self.miss_count;
        if total == 0 {
            0.0
        } else {
            self.hit_count as f64 / total as f64
        }
    }
}

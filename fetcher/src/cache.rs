//! Memoization of API payloads keyed by endpoint and query parameters.
//!
//! Entries live for a fixed TTL and are refetched once expired. Only successful
//! payloads are stored, so a failed call is retried on the next request.

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Default time-to-live for cached payloads (10 minutes).
pub const DEFAULT_TTL_SECS: u64 = 600;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    endpoint: String,
    /// Sorted so that parameter order does not produce distinct keys.
    params: Vec<(String, String)>,
}

impl CacheKey {
    pub fn new(endpoint: &str, params: &[(&str, String)]) -> Self {
        let mut params: Vec<(String, String)> = params.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        params.sort();
        Self { endpoint: endpoint.to_string(), params }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    stored_at: Instant,
    payload: Value,
}

#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    entries: RwLock<HashMap<CacheKey, Entry>>,
}

impl Default for ResponseCache {
    fn default() -> Self { Self::new(Duration::from_secs(DEFAULT_TTL_SECS)) }
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entries: RwLock::new(HashMap::new()) }
    }

    pub fn ttl(&self) -> Duration { self.ttl }

    /// Fresh payload for `key`, dropping it if the TTL has passed.
    pub fn get(&self, key: &CacheKey) -> Option<Value> {
        let hit = { self.entries.read().get(key).cloned() };
        match hit {
            Some(e) if e.stored_at.elapsed() < self.ttl => Some(e.payload),
            Some(_) => {
                self.entries.write().remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: CacheKey, payload: Value) {
        self.entries.write().insert(key, Entry { stored_at: Instant::now(), payload });
    }

    pub fn clear(&self) { self.entries.write().clear(); }

    pub fn len(&self) -> usize { self.entries.read().len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn param_order_is_irrelevant() {
        let a = CacheKey::new("deputados", &[("nome", "ana".into()), ("ordem", "ASC".into())]);
        let b = CacheKey::new("deputados", &[("ordem", "ASC".into()), ("nome", "ana".into())]);
        assert_eq!(a, b);
        let c = CacheKey::new("proposicoes", &[("nome", "ana".into()), ("ordem", "ASC".into())]);
        assert_ne!(a, c);
    }

    #[test]
    fn returns_fresh_entries() {
        let cache = ResponseCache::default();
        let key = CacheKey::new("deputados/1", &[]);
        assert!(cache.get(&key).is_none());
        cache.insert(key.clone(), json!({"id": 1}));
        assert_eq!(cache.get(&key), Some(json!({"id": 1})));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn expires_after_ttl() {
        let cache = ResponseCache::new(Duration::from_millis(10));
        let key = CacheKey::new("deputados/1", &[]);
        cache.insert(key.clone(), json!(1));
        std::thread::sleep(Duration::from_millis(30));
        assert!(cache.get(&key).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_empties() {
        let cache = ResponseCache::default();
        cache.insert(CacheKey::new("a", &[]), json!(null));
        cache.clear();
        assert!(cache.is_empty());
    }
}

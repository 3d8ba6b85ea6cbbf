use serde_json::Value;
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;
use tracing::debug;

/// Advisory response cache keyed by the full request URL. Each entry carries
/// the time-to-live chosen by the call site that stored it.
///
/// Two concurrent misses on the same key both go upstream; the later insert
/// simply replaces the earlier one.
#[derive(Clone)]
pub struct ResponseCache {
    entries: Arc<RwLock<HashMap<String, CachedResponse>>>,
    max_entries: usize,
}

#[derive(Debug, Clone)]
struct CachedResponse {
    value: Value,
    stored_at: Instant,
    ttl: Duration,
}

impl CachedResponse {
    fn is_fresh_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) < self.ttl
    }
}

impl ResponseCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            max_entries,
        }
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        if entry.is_fresh_at(Instant::now()) {
            debug!("Cache hit: {}", key);
            Some(entry.value.clone())
        } else {
            None
        }
    }

    pub async fn insert(&self, key: String, value: Value, ttl: Duration) {
        if ttl.is_zero() || self.max_entries == 0 {
            return;
        }

        let now = Instant::now();
        let mut entries = self.entries.write().await;

        if entries.len() >= self.max_entries && !entries.contains_key(&key) {
            entries.retain(|_, entry| entry.is_fresh_at(now));

            // Still full of live entries: evict the one closest to expiry.
            if entries.len() >= self.max_entries
                && let Some(oldest) = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.stored_at + entry.ttl)
                    .map(|(k, _)| k.clone())
            {
                entries.remove(&oldest);
            }
        }

        entries.insert(
            key,
            CachedResponse {
                value,
                stored_at: now,
                ttl,
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

//! Response cache for router views.
//!
//! Anonymous router responses depend only on the request path and the
//! content, so they are stored under the path with a fixed expiry. Reads
//! happen before any work is done; writes happen after the body has been
//! rendered. Concurrent writers for the same key race harmlessly: the last
//! write wins and every writer stores the same body.

use std::collections::HashMap;

use spa_router_core::types::Timestamp;
use tokio::sync::RwLock;

/// A rendered response body and the moment it stops being served.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub body: String,
    pub expires_at: Timestamp,
}

/// Path-keyed cache of rendered router responses.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application.
pub struct ResponseCache {
    entries: RwLock<HashMap<String, CachedResponse>>,
    ttl: chrono::Duration,
}

impl ResponseCache {
    /// Create a cache whose entries live `timeout_secs` seconds.
    /// A zero timeout disables caching.
    pub fn new(timeout_secs: u64) -> Self {
        let secs = i64::try_from(timeout_secs).unwrap_or(i64::MAX);
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: chrono::Duration::try_seconds(secs).unwrap_or(chrono::Duration::MAX),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.ttl > chrono::Duration::zero()
    }

    /// Cached body for `key`, if present and not expired.
    pub async fn get(&self, key: &str) -> Option<String> {
        self.get_at(key, chrono::Utc::now()).await
    }

    pub async fn get_at(&self, key: &str, now: Timestamp) -> Option<String> {
        self.entries
            .read()
            .await
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.body.clone())
    }

    /// Store `body` under `key`, replacing any previous entry.
    pub async fn insert(&self, key: &str, body: String) {
        self.insert_at(key, body, chrono::Utc::now()).await;
    }

    /// Store `body` as of `now`. Expired entries are evicted on the way.
    pub async fn insert_at(&self, key: &str, body: String, now: Timestamp) {
        if !self.is_enabled() {
            return;
        }
        let expires_at = now
            .checked_add_signed(self.ttl)
            .unwrap_or(chrono::DateTime::<chrono::Utc>::MAX_UTC);

        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(key.to_string(), CachedResponse { body, expires_at });
        tracing::debug!(key, %expires_at, "Cached router response");
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop every entry (e.g. after content changed).
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> Timestamp {
        chrono::DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    #[tokio::test]
    async fn hit_before_expiry_miss_after() {
        let cache = ResponseCache::new(60);
        cache.insert_at("/en/", "body".into(), at(0)).await;

        assert_eq!(cache.get_at("/en/", at(59)).await.as_deref(), Some("body"));
        assert!(cache.get_at("/en/", at(60)).await.is_none());
        assert!(cache.get_at("/en/other/", at(1)).await.is_none());
    }

    #[tokio::test]
    async fn last_write_wins() {
        let cache = ResponseCache::new(60);
        cache.insert_at("/en/", "first".into(), at(0)).await;
        cache.insert_at("/en/", "second".into(), at(1)).await;

        assert_eq!(cache.get_at("/en/", at(2)).await.as_deref(), Some("second"));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn writes_evict_expired_entries() {
        let cache = ResponseCache::new(10);
        cache.insert_at("/a/", "a".into(), at(0)).await;
        cache.insert_at("/b/", "b".into(), at(20)).await;

        assert_eq!(cache.len().await, 1);
        assert!(cache.get_at("/a/", at(20)).await.is_none());
    }

    #[tokio::test]
    async fn zero_timeout_disables_cache() {
        let cache = ResponseCache::new(0);
        assert!(!cache.is_enabled());
        cache.insert("/en/", "body".into()).await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn clear_drops_everything() {
        let cache = ResponseCache::new(60);
        cache.insert("/en/", "body".into()).await;
        cache.clear().await;
        assert!(cache.get("/en/").await.is_none());
    }
}

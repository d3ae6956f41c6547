use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tokio::sync::RwLock;

pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

/// Process-local key/value cache with a fixed per-entry TTL.
///
/// Expiry is passive: `get` simply refuses to return an entry older than the
/// TTL, and `set` replaces an entry wholesale and restarts its clock. There
/// is no eviction beyond TTL. Cloning yields another handle onto the same
/// map, so one instance can be shared across concurrent requests.
#[derive(Debug, Clone)]
pub struct TtlCache<V> {
    inner: Arc<RwLock<HashMap<String, Entry<V>>>>,
    ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn with_default_ttl() -> Self {
        Self::new(DEFAULT_TTL)
    }

    pub async fn get(&self, key: &str) -> Option<V> {
        let inner = self.inner.read().await;
        inner
            .get(key)
            .filter(|entry| entry.inserted_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }

    pub async fn set(&self, key: impl Into<String>, value: V) {
        let mut inner = self.inner.write().await;
        inner.insert(
            key.into(),
            Entry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Deleting an absent key is a no-op.
    pub async fn delete(&self, key: &str) {
        let mut inner = self.inner.write().await;
        inner.remove(key);
    }
}

/// Cache key for a user's daily feed. Preferences are sorted so that the
/// same set always yields the same key regardless of stored order.
pub fn feed_key(user_id: &str, preferences: &[String], day: NaiveDate) -> String {
    let mut prefs = preferences.to_vec();
    prefs.sort();
    format!("news:{}:{}:{}", user_id, prefs.join(","), day)
}

/// Key for a user's read list. Intentionally varies by user only, never by
/// day or preference; it is cleared explicitly on every successful mark.
pub fn read_list_key(user_id: &str) -> String {
    format!("news:read:{user_id}")
}

pub fn favourite_list_key(user_id: &str) -> String {
    format!("news:favourite:{user_id}")
}

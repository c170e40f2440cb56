// src/cache.rs
//! TTL memory cache behind an explicitly passed handle.
//!
//! The handle lives in `AppState` and is threaded into whatever needs it —
//! there is no process-global cache singleton. Eviction is expire-on-read
//! only; that TTL contract is the whole externally visible policy.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

struct Entry<T> {
    value: T,
    expires_at: Instant,
}

/// Cloneable cache handle; clones share the same store.
pub struct TtlCache<T> {
    inner: Arc<RwLock<HashMap<String, Entry<T>>>>,
    ttl: Duration,
    enabled: bool,
}

impl<T> Clone for TtlCache<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            ttl: self.ttl,
            enabled: self.enabled,
        }
    }
}

impl<T: Clone> TtlCache<T> {
    pub fn new(enabled: bool, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            enabled,
        }
    }

    pub async fn get(&self, key: &str) -> Option<T> {
        if !self.enabled {
            return None;
        }
        {
            let guard = self.inner.read().await;
            match guard.get(key) {
                Some(entry) if entry.expires_at > Instant::now() => {
                    return Some(entry.value.clone())
                }
                Some(_) => {}
                None => return None,
            }
        }
        // expired: drop it so the map doesn't accumulate dead entries
        self.inner.write().await.remove(key);
        None
    }

    pub async fn put(&self, key: &str, value: T) {
        if !self.enabled {
            return;
        }
        let entry = Entry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        self.inner.write().await.insert(key.to_string(), entry);
    }

    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }
}

/// Deterministic composite key: `prefix:k1:v1:k2:v2` with pairs sorted by
/// key, so call sites cannot disagree on argument order.
pub fn cache_key(prefix: &str, parts: &[(&str, &str)]) -> String {
    let mut sorted: Vec<&(&str, &str)> = parts.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);
    let mut key = String::from(prefix);
    for (k, v) in sorted {
        key.push(':');
        key.push_str(k);
        key.push(':');
        key.push_str(v);
    }
    key
}

/// Short hex digest of a key for log lines — keys embed user queries and
/// should not appear verbatim in logs.
pub fn key_digest(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{b:02x}");
    }
    out
}

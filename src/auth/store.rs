//! Session store for Files Manager.
//!
//! A TTL-keyed string store. Expiry is enforced by the store itself: an entry
//! past its deadline is never returned, and expired entries are swept on
//! every write so the map only holds live sessions plus those that expired
//! since the last write.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::Result;

/// Keyed string store with per-entry time-to-live.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Get the value at `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Set `key` to `value`, expiring after `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Delete `key`. Deleting an absent key is not an error.
    async fn del(&self, key: &str) -> Result<()>;

    /// Whether the store is reachable.
    async fn is_alive(&self) -> bool;
}

#[derive(Debug)]
struct Entry {
    value: String,
    deadline: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.deadline
    }
}

/// In-process session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every expired entry and return how many were removed.
    pub async fn cleanup(&self) -> usize {
        purge_expired(&mut *self.entries.lock().await, Instant::now())
    }

    /// Number of live entries. Expired entries are purged first.
    pub async fn len(&self) -> usize {
        let mut entries = self.entries.lock().await;
        purge_expired(&mut entries, Instant::now());
        entries.len()
    }

    /// Whether there are no live entries.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn purge_expired(entries: &mut HashMap<String, Entry>, now: Instant) -> usize {
    let before = entries.len();
    entries.retain(|_, entry| !entry.is_expired(now));

    let removed = before - entries.len();
    if removed > 0 {
        debug!(removed, "Cleaned up expired sessions");
    }
    removed
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;

        match entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                entries.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let now = Instant::now();
        let entry = Entry {
            value: value.to_string(),
            deadline: now + ttl,
        };

        let mut entries = self.entries.lock().await;
        purge_expired(&mut entries, now);
        entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }

    async fn is_alive(&self) -> bool {
        true
    }
}

//! Process-wide bearer-token cache.

use dashmap::DashMap;
use std::sync::Arc;
use updraft_core::{AuthToken, CacheKey};

/// Thread-safe token cache shared by every session in a process.
///
/// Keyed per login identity per authentication endpoint. Entries expire
/// lazily: a read past the token's expiry is a miss, and the stale
/// entry stays in place until the next successful authentication
/// overwrites it. Concurrent refreshes of the same key are
/// last-writer-wins; both writers hold valid tokens, so readers are
/// correct either way.
///
/// Clones share the same underlying map.
#[derive(Clone, Debug, Default)]
pub struct TokenCache {
    entries: Arc<DashMap<CacheKey, AuthToken>>,
}

impl TokenCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Look up a live token. Expired entries are misses.
    pub fn get(&self, key: &CacheKey) -> Option<AuthToken> {
        let entry = self.entries.get(key)?;
        if entry.is_expired() {
            return None;
        }
        Some(entry.clone())
    }

    /// Insert or replace the token for a key.
    pub fn set(&self, key: CacheKey, token: AuthToken) {
        self.entries.insert(key, token);
    }

    /// Number of entries, live or stale.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop entries whose tokens have expired, returning how many were
    /// removed.
    ///
    /// Reads never need this; long-lived processes can call it to
    /// reclaim memory. The re-check inside `remove_if` keeps a
    /// concurrent refresh from being dropped.
    pub fn evict_expired(&self) -> usize {
        let stale: Vec<CacheKey> = self
            .entries
            .iter()
            .filter(|entry| entry.value().is_expired())
            .map(|entry| entry.key().clone())
            .collect();

        let mut evicted = 0;
        for key in stale {
            if self
                .entries
                .remove_if(&key, |_, token| token.is_expired())
                .is_some()
            {
                evicted += 1;
            }
        }

        if evicted > 0 {
            tracing::debug!(evicted = evicted, "evicted expired tokens");
        }
        evicted
    }
}

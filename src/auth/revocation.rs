// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Process-local token revocation store.
//!
//! Tokens revoked before their natural expiry (logout) are recorded here with
//! the instant of revocation and rejected by the gate until pruned. Entries
//! are dropped once older than the retention window; by then the token has
//! expired on its own, so a late prune only costs memory.
//!
//! ## Concurrency
//!
//! Backed by a sharded [`DashMap`]: readers of different shards never
//! contend, readers of the same shard share a read lock, and every operation
//! on a key is linearizable. Pruning evaluates each entry under its shard's
//! write lock, so a `revoke` racing with a prune of the same key is either
//! seen by the sweep (and kept, being fresh) or lands after it.

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;

/// Default retention window for revocation entries (24 hours).
pub const DEFAULT_RETENTION_HOURS: i64 = 24;

/// Concurrent map from revoked token to its revocation instant.
#[derive(Debug)]
pub struct RevocationStore {
    entries: DashMap<String, DateTime<Utc>>,
    retention: TimeDelta,
}

impl RevocationStore {
    /// Create an empty store with the default 24 hour retention.
    pub fn new() -> Self {
        Self::with_retention(TimeDelta::hours(DEFAULT_RETENTION_HOURS))
    }

    /// Create an empty store with a custom retention window.
    pub fn with_retention(retention: TimeDelta) -> Self {
        Self {
            entries: DashMap::new(),
            retention,
        }
    }

    pub fn retention(&self) -> TimeDelta {
        self.retention
    }

    /// Record `token` as revoked now. Idempotent.
    pub fn revoke(&self, token: &str) {
        self.revoke_at(token, Utc::now());
    }

    /// Record `token` as revoked at `revoked_at`, overwriting any earlier entry.
    pub fn revoke_at(&self, token: &str, revoked_at: DateTime<Utc>) {
        self.entries.insert(token.to_owned(), revoked_at);
    }

    /// Whether `token` has been revoked and not yet pruned.
    pub fn is_revoked(&self, token: &str) -> bool {
        self.entries.contains_key(token)
    }

    #[cfg(test)]
    fn revoked_at(&self, token: &str) -> Option<DateTime<Utc>> {
        self.entries.get(token).map(|entry| *entry.value())
    }

    /// Drop entries older than the retention window. Returns how many went.
    pub fn prune(&self) -> usize {
        self.prune_at(Utc::now())
    }

    /// Drop entries whose age at `now` exceeds the retention window.
    ///
    /// An entry exactly at the window boundary is kept.
    pub fn prune_at(&self, now: DateTime<Utc>) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, revoked_at| {
            let keep = now.signed_duration_since(*revoked_at) <= self.retention;
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RevocationStore {
    fn default() -> Self {
        Self::new()
    }
}

// SPDX-License-Identifier: MIT

//! In-memory dedup cache: a test double for `RedisCache` with the same TTL
//! semantics, used throughout the runtime/orchestrator test suites so they
//! don't require a live Redis instance.

use crate::error::CacheError;
use crate::DedupCache;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<Uuid, Instant>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn prune_expired(&self, entries: &mut HashMap<Uuid, Instant>) {
        let now = Instant::now();
        entries.retain(|_, expires_at| *expires_at > now);
    }
}

#[async_trait]
impl DedupCache for InMemoryCache {
    async fn contains(&self, uuid: Uuid) -> Result<bool, CacheError> {
        let mut entries = self.entries.lock();
        self.prune_expired(&mut entries);
        Ok(entries.contains_key(&uuid))
    }

    async fn put(&self, uuid: Uuid, ttl: Duration) -> Result<(), CacheError> {
        self.entries.lock().insert(uuid, Instant::now() + ttl);
        Ok(())
    }

    async fn len(&self) -> Result<u64, CacheError> {
        let mut entries = self.entries.lock();
        self.prune_expired(&mut entries);
        Ok(entries.len() as u64)
    }

    async fn flush(&self) -> Result<(), CacheError> {
        self.entries.lock().clear();
        Ok(())
    }
}

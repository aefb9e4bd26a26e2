// SPDX-License-Identifier: MIT

//! Content-addressed dedup cache with TTL, backed by Redis.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

mod config;
mod error;
mod memory;
mod redis_cache;

pub use config::RedisConfig;
pub use error::CacheError;
pub use memory::InMemoryCache;
pub use redis_cache::RedisCache;

use async_trait::async_trait;
use std::time::Duration;
use tw_core::Envelope;
use uuid::Uuid;

pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 3600);
pub const CACHE_METADATA_KEY: &str = "cache_metadata";

/// A TTL-bounded set of seen `meta.uuid` values.
#[async_trait]
pub trait DedupCache: Send + Sync {
    async fn contains(&self, uuid: Uuid) -> Result<bool, CacheError>;
    async fn put(&self, uuid: Uuid, ttl: Duration) -> Result<(), CacheError>;
    async fn len(&self) -> Result<u64, CacheError>;
    async fn flush(&self) -> Result<(), CacheError>;

    /// Reject previously seen messages by `meta.uuid`: if `uuid` was already
    /// cached, return `None` (drop) and leave the cache untouched; otherwise
    /// record it and return the message unchanged.
    async fn dedup(&self, envelope: Envelope, ttl: Duration) -> Result<Option<Envelope>, CacheError> {
        if self.contains(envelope.uuid()).await? {
            return Ok(None);
        }
        self.put(envelope.uuid(), ttl).await?;
        Ok(Some(envelope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn dedup_drops_second_occurrence_of_same_uuid() {
        let cache = InMemoryCache::new();
        let env = Envelope::new("raw", 1, "raw", json!({}));
        let dup = env.clone();

        let first = cache.dedup(env, DEFAULT_TTL).await.unwrap();
        assert!(first.is_some());
        assert_eq!(cache.len().await.unwrap(), 1);

        let second = cache.dedup(dup, DEFAULT_TTL).await.unwrap();
        assert!(second.is_none());
        assert_eq!(cache.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn distinct_uuids_both_pass_through() {
        let cache = InMemoryCache::new();
        let a = Envelope::new("raw", 1, "raw", json!({}));
        let b = Envelope::new("raw", 1, "raw", json!({}));
        assert!(cache.dedup(a, DEFAULT_TTL).await.unwrap().is_some());
        assert!(cache.dedup(b, DEFAULT_TTL).await.unwrap().is_some());
        assert_eq!(cache.len().await.unwrap(), 2);
    }
}

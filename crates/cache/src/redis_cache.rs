// SPDX-License-Identifier: MIT

use crate::config::RedisConfig;
use crate::error::CacheError;
use crate::{DedupCache, CACHE_METADATA_KEY};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

/// Redis-backed dedup cache. Database index, host, and credentials come
/// from `config.redis`.
pub struct RedisCache {
    conn: ConnectionManager,
    db: i64,
}

impl RedisCache {
    pub async fn connect(config: &RedisConfig) -> Result<Self, CacheError> {
        let client = redis::Client::open(config.connection_url()).map_err(CacheError::Connect)?;
        let mut conn = client.get_connection_manager().await.map_err(CacheError::Connect)?;

        // On first construction, write an opaque metadata record if absent.
        let exists: bool = conn.exists(CACHE_METADATA_KEY).await?;
        if !exists {
            let now = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs();
            conn.hset::<_, _, _, ()>(CACHE_METADATA_KEY, "created_at", now).await?;
            info!("initialised cache_metadata record");
        }

        Ok(Self { conn, db: config.db })
    }
}

#[async_trait]
impl DedupCache for RedisCache {
    async fn contains(&self, uuid: Uuid) -> Result<bool, CacheError> {
        let mut conn = self.conn.clone();
        Ok(conn.exists(uuid.to_string()).await?)
    }

    async fn put(&self, uuid: Uuid, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(uuid.to_string(), 1).await?;
        if !ttl.is_zero() {
            conn.expire::<_, ()>(uuid.to_string(), ttl.as_secs() as i64).await?;
        }
        Ok(())
    }

    async fn len(&self) -> Result<u64, CacheError> {
        let mut conn = self.conn.clone();
        let info: String = redis::cmd("INFO").arg("keyspace").query_async(&mut conn).await?;
        let marker = format!("db{}:keys=", self.db);
        let count = info
            .lines()
            .find(|line| line.starts_with(&marker))
            .and_then(|line| line[marker.len()..].split(',').next())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(0);
        Ok(count)
    }

    async fn flush(&self) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        redis::cmd("FLUSHDB").query_async::<()>(&mut conn).await?;
        Ok(())
    }
}

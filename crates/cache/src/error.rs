// SPDX-License-Identifier: MIT

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("could not connect to redis: {0}")]
    Connect(#[source] redis::RedisError),

    #[error("redis operation failed: {0}")]
    Op(#[from] redis::RedisError),
}

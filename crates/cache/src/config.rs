// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_port() -> u16 {
    6379
}

fn default_db() -> i64 {
    2
}

/// `config.redis` section of the global config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_db")]
    pub db: i64,
    #[serde(default)]
    pub cache_ttl: Option<u64>,
}

fn default_host() -> String {
    "localhost".to_string()
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), password: None, db: default_db(), cache_ttl: None }
    }
}

impl RedisConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl.unwrap_or(crate::DEFAULT_TTL.as_secs()))
    }

    pub fn connection_url(&self) -> String {
        match &self.password {
            Some(password) => format!("redis://:{}@{}:{}/{}", password, self.host, self.port, self.db),
            None => format!("redis://{}:{}/{}", self.host, self.port, self.db),
        }
    }
}

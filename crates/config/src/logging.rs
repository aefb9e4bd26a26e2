// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_facility() -> String {
    "yellowsub".to_string()
}

fn default_loglevel() -> String {
    "info".to_string()
}

/// Logging configuration read from the `logging` section of the merged
/// global config. Mirrors the source system's `{facility, loglevel,
/// handlers}` shape, simplified to the one handler kind it actually
/// supports in this stack: a daily-rotating file under `log_dir`,
/// alongside the always-on stderr handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_facility")]
    pub facility: String,
    #[serde(default = "default_loglevel")]
    pub loglevel: String,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { facility: default_facility(), loglevel: default_loglevel(), log_dir: None }
    }
}

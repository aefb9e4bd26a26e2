// SPDX-License-Identifier: MIT

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not load config file {path}: {source}")]
    Load { path: PathBuf, #[source] source: std::io::Error },

    #[error("could not parse YAML in {path}: {source}")]
    Parse { path: PathBuf, #[source] source: serde_yaml::Error },

    #[error("config for processor '{name}' is invalid: {reason}")]
    Invalid { name: String, reason: &'static str },

    #[error("could not determine home directory to resolve ROOT_DIR")]
    NoHomeDir,
}

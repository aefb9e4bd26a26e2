// SPDX-License-Identifier: MIT

//! Environment-driven path resolution.
//!
//! `ROOT_DIR` from environment (default `$HOME/threadworks`),
//! `CONFIG_DIR = ROOT_DIR/etc`, `GLOBAL_CONFIG_PATH = CONFIG_DIR/config.yml`,
//! `PROCESSOR_CONFIG_DIR = CONFIG_DIR/processors`. `YELLOWSUB_TEST`
//! substitutes `config_test.yml` for the global config file name.

use crate::error::ConfigError;
use std::path::PathBuf;

const PROJECT_DIR_NAME: &str = "threadworks";

/// Resolved filesystem locations for this process's configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub root_dir: PathBuf,
    pub config_dir: PathBuf,
    pub global_config_path: PathBuf,
    pub processor_config_dir: PathBuf,
    pub workflow_path: PathBuf,
}

impl Paths {
    /// Resolve from `YELLOWSUB_ROOT_DIR` / `YELLOWSUB_CONFIG_DIR` /
    /// `YELLOWSUB_TEST`, falling back to spec defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(
            std::env::var("YELLOWSUB_ROOT_DIR").ok(),
            std::env::var("YELLOWSUB_CONFIG_DIR").ok(),
            std::env::var("YELLOWSUB_TEST").is_ok(),
        )
    }

    pub fn resolve(root_dir: Option<String>, config_dir: Option<String>, test_mode: bool) -> Result<Self, ConfigError> {
        let root_dir = match root_dir {
            Some(dir) => PathBuf::from(dir),
            None => {
                let home = std::env::var("HOME").map_err(|_| ConfigError::NoHomeDir)?;
                PathBuf::from(home).join(PROJECT_DIR_NAME)
            }
        };
        let config_dir = match config_dir {
            Some(dir) => PathBuf::from(dir),
            None => root_dir.join("etc"),
        };
        let global_config_name = if test_mode { "config_test.yml" } else { "config.yml" };
        Ok(Self {
            global_config_path: config_dir.join(global_config_name),
            processor_config_dir: config_dir.join("processors"),
            workflow_path: config_dir.join("workflow.yml"),
            root_dir,
            config_dir,
        })
    }

    pub fn processor_config_path(&self, processor_name: &str) -> PathBuf {
        self.processor_config_dir.join(format!("{processor_name}.yml"))
    }
}

// SPDX-License-Identifier: MIT

use crate::error::ConfigError;
use crate::merge::deep_merge;
use crate::paths::Paths;
use std::path::Path;
use tracing::debug;

/// An in-memory configuration document. Uses `serde_json::Value` as the
/// canonical representation after YAML parsing so the rest of the workspace
/// (envelope payloads, wire messages) only deals with one JSON value type.
pub type ConfigMap = serde_json::Value;

/// Read and parse a single YAML config file.
pub fn load(path: &Path) -> Result<ConfigMap, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Load { path: path.to_path_buf(), source })?;
    serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
}

fn validate_processor_config(name: &str, config: &ConfigMap) -> Result<(), ConfigError> {
    let object = config.as_object().ok_or(ConfigError::Invalid { name: name.to_string(), reason: "not a mapping" })?;

    let declared_name = object
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or(ConfigError::Invalid { name: name.to_string(), reason: "missing 'name' key" })?;
    if declared_name != name {
        return Err(ConfigError::Invalid { name: name.to_string(), reason: "'name' does not match processor id" });
    }
    if !object.get("parameters").is_some_and(|v| v.is_object()) {
        return Err(ConfigError::Invalid { name: name.to_string(), reason: "missing 'parameters' mapping" });
    }
    Ok(())
}

/// Produces merged configuration views for processor instances.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    paths: Paths,
}

impl ConfigStore {
    pub fn new(paths: Paths) -> Self {
        Self { paths }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(Paths::from_env()?))
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    pub fn load_global(&self) -> Result<ConfigMap, ConfigError> {
        load(&self.paths.global_config_path)
    }

    /// Merge the global config with `<processor_config_dir>/<name>.yml`, if
    /// present. A missing per-processor file is not an error: the processor
    /// simply runs with the global config only.
    pub fn merged_for(&self, processor_name: &str) -> Result<ConfigMap, ConfigError> {
        let global = self.load_global()?;
        let specific_path = self.paths.processor_config_path(processor_name);
        if !specific_path.exists() {
            debug!(processor = processor_name, "no specific config found, using global only");
            return Ok(global);
        }
        let specific = load(&specific_path)?;
        validate_processor_config(processor_name, &specific)?;
        debug!(processor = processor_name, "merged specific config over global");
        Ok(deep_merge(&global, &specific))
    }
}

// SPDX-License-Identifier: MIT

//! Typed access to the global and per-processor YAML configuration files.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

mod error;
mod logging;
mod merge;
mod paths;
mod store;

pub use error::ConfigError;
pub use logging::LoggingConfig;
pub use merge::deep_merge;
pub use paths::Paths;
pub use store::{ConfigMap, ConfigStore};

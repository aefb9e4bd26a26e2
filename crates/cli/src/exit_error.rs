// SPDX-License-Identifier: MIT

//! Carries a process exit code alongside an error message so `main()` can
//! pick the right exit status instead of every command calling
//! `std::process::exit()` itself.

use std::fmt;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

impl From<tw_orchestrator::OrchestratorError> for ExitError {
    fn from(err: tw_orchestrator::OrchestratorError) -> Self {
        Self::new(err.exit_code(), err.to_string())
    }
}

impl From<tw_config::ConfigError> for ExitError {
    fn from(err: tw_config::ConfigError) -> Self {
        Self::new(1, err.to_string())
    }
}

impl From<tw_workflow::WorkflowError> for ExitError {
    fn from(err: tw_workflow::WorkflowError) -> Self {
        Self::new(1, err.to_string())
    }
}

impl From<tw_runtime::RuntimeError> for ExitError {
    fn from(err: tw_runtime::RuntimeError) -> Self {
        Self::new(1, err.to_string())
    }
}

impl From<tw_registry::RegistryError> for ExitError {
    fn from(err: tw_registry::RegistryError) -> Self {
        Self::new(1, err.to_string())
    }
}

impl From<tw_broker::BrokerError> for ExitError {
    fn from(err: tw_broker::BrokerError) -> Self {
        Self::new(1, err.to_string())
    }
}

impl From<tw_cache::CacheError> for ExitError {
    fn from(err: tw_cache::CacheError) -> Self {
        Self::new(1, err.to_string())
    }
}

impl From<tw_wire::WireError> for ExitError {
    fn from(err: tw_wire::WireError) -> Self {
        Self::new(1, err.to_string())
    }
}

impl From<serde_json::Error> for ExitError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(1, format!("could not parse processor configuration: {err}"))
    }
}

impl From<std::io::Error> for ExitError {
    fn from(err: std::io::Error) -> Self {
        Self::new(1, err.to_string())
    }
}

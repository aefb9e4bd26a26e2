// SPDX-License-Identifier: MIT

use std::path::PathBuf;

/// Process exit code used for an unrecognized `--workflow-id`.
pub const UNKNOWN_WORKFLOW_EXIT_CODE: i32 = 254;

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("unknown workflow '{0}'")]
    UnknownWorkflow(String),

    #[error("{failed} of {attempted} worker(s) failed to spawn ({} spawned successfully)", spawned.len())]
    PartialSpawn { attempted: usize, failed: usize, spawned: Vec<PathBuf> },

    #[error("could not acquire exclusive lock on pid file {path}: {source}")]
    Lock { path: PathBuf, #[source] source: std::io::Error },

    #[error("could not signal pid {pid}: {source}")]
    Signal { pid: i32, #[source] source: nix::errno::Errno },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Workflow(#[from] tw_workflow::WorkflowError),
}

impl OrchestratorError {
    /// Process exit code a CLI entry point should use for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            OrchestratorError::UnknownWorkflow(_) => UNKNOWN_WORKFLOW_EXIT_CODE,
            _ => 1,
        }
    }
}

// SPDX-License-Identifier: MIT

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("could not read workflow file {path}: {source}")]
    Read { path: PathBuf, #[source] source: std::io::Error },

    #[error("could not parse workflow file {path}: {source}")]
    Parse { path: PathBuf, #[source] source: serde_yaml::Error },

    #[error("queue '{queue}' is bound as to_q by both exchange '{first_ex}' and '{second_ex}'")]
    ConflictingQueueBinding { queue: String, first_ex: String, second_ex: String },

    #[error("workflow '{0}' has an empty flow")]
    EmptyFlow(String),

    #[error("unknown workflow '{0}'")]
    UnknownWorkflow(String),
}

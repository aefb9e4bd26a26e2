// SPDX-License-Identifier: MIT

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DemoProcessorError {
    #[error("missing required parameter '{0}'")]
    MissingParameter(&'static str),

    #[error("parameter '{name}' has the wrong type, expected {expected}")]
    WrongParameterType { name: &'static str, expected: &'static str },

    #[error("path {path} does not exist or is not a directory")]
    NotADirectory { path: PathBuf },

    #[error("could not create directory {path}: {source}")]
    CreateDir { path: PathBuf, source: std::io::Error },
}

// SPDX-License-Identifier: MIT

//! Resolves the filesystem locations a command needs from global flags,
//! and the directory the orchestrator keeps pid files under.

use crate::cli::GlobalArgs;
use crate::exit_error::ExitError;
use std::path::PathBuf;
use tw_config::Paths;

pub fn resolve_paths(global: &GlobalArgs) -> Result<Paths, ExitError> {
    let mut paths = Paths::resolve(global.rootdir.clone(), global.config_dir.clone(), false)?;
    if let Some(workflow_config) = &global.workflow_config {
        paths.workflow_path = PathBuf::from(workflow_config);
    }
    Ok(paths)
}

/// Pid files live under `<rootdir>/run`, parallel to `etc/`.
pub fn pid_dir(paths: &Paths) -> PathBuf {
    paths.root_dir.join("run")
}

/// Path to the currently running binary, used as the program orchestrator
/// spawns worker instances of.
pub fn current_exe() -> Result<PathBuf, ExitError> {
    std::env::current_exe().map_err(ExitError::from)
}

// SPDX-License-Identifier: MIT

use crate::error::OrchestratorError;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// A held, exclusive lock on one `<workflow>.<processor>.<pid>.pid` file.
/// Dropping this releases the lock; callers keep it alive for the life of
/// the child process it describes.
pub struct PidFile {
    path: PathBuf,
    file: File,
}

impl PidFile {
    /// Create (or reopen) the pid file for `stem` under `dir`, lock it
    /// exclusively, and write `pid` into it. A lock that is already held —
    /// by a still-running previous instance — surfaces as
    /// [`OrchestratorError::Lock`].
    pub fn create(dir: &Path, stem: &str, pid: u32) -> Result<Self, OrchestratorError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(stem);
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|source| OrchestratorError::Lock { path: path.clone(), source })?;
        file.try_lock_exclusive().map_err(|source| OrchestratorError::Lock { path: path.clone(), source })?;
        file.set_len(0)?;
        use std::io::Write;
        (&file).write_all(pid.to_string().as_bytes())?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn remove(self) -> Result<(), OrchestratorError> {
        FileExt::unlock(&self.file)?;
        std::fs::remove_file(&self.path)?;
        Ok(())
    }
}

/// One running-or-orphaned processor instance discovered from its pid file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedProcess {
    pub workflow_name: String,
    pub processor_name: String,
    pub pid: i32,
    pub path: PathBuf,
}

/// Parse `<workflow>.<processor>.<pid>.pid` and the pid written inside it.
/// Returns `None` for filenames that don't fit the convention (stray files
/// an operator may have dropped into the directory).
pub fn parse_pid_file(path: &Path) -> Option<TrackedProcess> {
    let stem = path.file_name()?.to_str()?;
    let stem = stem.strip_suffix(".pid")?;
    let mut parts = stem.rsplitn(3, '.');
    let pid_field = parts.next()?;
    let processor_name = parts.next()?;
    let workflow_name = parts.next()?;

    let contents = std::fs::read_to_string(path).ok()?;
    let pid: i32 = contents.trim().parse().ok().or_else(|| pid_field.parse().ok())?;

    Some(TrackedProcess { workflow_name: workflow_name.to_string(), processor_name: processor_name.to_string(), pid, path: path.to_path_buf() })
}

pub fn list_tracked(dir: &Path) -> std::io::Result<Vec<TrackedProcess>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if let Some(tracked) = parse_pid_file(&entry.path()) {
            out.push(tracked);
        }
    }
    Ok(out)
}

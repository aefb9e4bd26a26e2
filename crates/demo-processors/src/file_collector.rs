// SPDX-License-Identifier: MIT

//! Watches a directory for files and turns each one into a raw envelope,
//! following the Maildir convention: a file is renamed to `<name>.processing`
//! while it is being read, then either deleted or moved into `processed/`.

use crate::error::DemoProcessorError;
use crate::params::{bool_or, require_str};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::path::PathBuf;
use tracing::{error, warn};
use tw_core::{Envelope, ProcessorDescriptor};
use tw_registry::Processor;

const PROCESSED_DIR: &str = "processed";
const PROCESSING_EXT: &str = ".processing";

pub struct FileCollector {
    path: PathBuf,
    delete_files: bool,
}

impl FileCollector {
    pub fn new(descriptor: &ProcessorDescriptor) -> Result<Self, DemoProcessorError> {
        let path = PathBuf::from(require_str(&descriptor.parameters, "path")?);
        let delete_files = bool_or(&descriptor.parameters, "delete_files", false)?;

        if !path.is_dir() {
            return Err(DemoProcessorError::NotADirectory { path });
        }
        if !delete_files {
            let processed = path.join(PROCESSED_DIR);
            if !processed.is_dir() {
                std::fs::create_dir_all(&processed).map_err(|source| DemoProcessorError::CreateDir { path: processed, source })?;
            }
        }
        Ok(Self { path, delete_files })
    }

    async fn collect_one(&self, file_name: &std::ffi::OsStr) -> Option<Envelope> {
        let original = self.path.join(file_name);
        let processing = self.path.join(format!("{}{PROCESSING_EXT}", file_name.to_string_lossy()));

        if let Err(err) = tokio::fs::rename(&original, &processing).await {
            warn!(path = %original.display(), %err, "could not claim file for processing");
            return None;
        }

        let bytes = match tokio::fs::read(&processing).await {
            Ok(bytes) => bytes,
            Err(err) => {
                error!(path = %processing.display(), %err, "could not read claimed file");
                return None;
            }
        };
        let encoded = BASE64.encode(bytes);

        if self.delete_files {
            if let Err(err) = tokio::fs::remove_file(&processing).await {
                error!(path = %processing.display(), %err, "could not delete processed file");
            }
        } else {
            let destination = self.path.join(PROCESSED_DIR).join(file_name);
            if let Err(err) = tokio::fs::rename(&processing, &destination).await {
                error!(path = %processing.display(), %err, "could not archive processed file");
            }
        }

        Some(Envelope::new("raw", 1, "raw", serde_json::json!({ "raw": encoded })))
    }
}

#[async_trait]
impl Processor for FileCollector {
    async fn collect(&self) -> Vec<Envelope> {
        let mut entries = match tokio::fs::read_dir(&self.path).await {
            Ok(entries) => entries,
            Err(err) => {
                error!(path = %self.path.display(), %err, "could not list collector directory");
                return Vec::new();
            }
        };

        let mut names = Vec::new();
        loop {
            let next = match entries.next_entry().await {
                Ok(next) => next,
                Err(err) => {
                    error!(path = %self.path.display(), %err, "error walking collector directory");
                    break;
                }
            };
            let Some(entry) = next else { break };
            let file_name = entry.file_name();
            let name_lossy = file_name.to_string_lossy();
            if name_lossy == PROCESSED_DIR || name_lossy.ends_with(PROCESSING_EXT) {
                continue;
            }
            match entry.file_type().await {
                Ok(ft) if ft.is_file() => names.push(file_name),
                _ => {}
            }
        }

        let mut envelopes = Vec::with_capacity(names.len());
        for name in names {
            if let Some(envelope) = self.collect_one(&name).await {
                envelopes.push(envelope);
            }
        }
        envelopes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tw_core::ProcessorGroup;

    fn descriptor(dir: &std::path::Path, delete_files: bool) -> ProcessorDescriptor {
        let mut parameters = HashMap::new();
        parameters.insert("path".to_string(), serde_json::json!(dir.to_string_lossy()));
        parameters.insert("delete_files".to_string(), serde_json::json!(delete_files));
        ProcessorDescriptor {
            name: "collector".into(),
            module: "filecollector".into(),
            group: ProcessorGroup::Collector,
            parameters,
            validate_msg: false,
        }
    }

    #[test]
    fn rejects_a_path_that_does_not_exist() {
        let descriptor = descriptor(std::path::Path::new("/no/such/directory"), true);
        assert!(matches!(FileCollector::new(&descriptor), Err(DemoProcessorError::NotADirectory { .. })));
    }

    #[test]
    fn creates_processed_subdir_when_keeping_files() {
        let dir = tempfile::tempdir().unwrap();
        let descriptor = descriptor(dir.path(), false);
        FileCollector::new(&descriptor).unwrap();
        assert!(dir.path().join(PROCESSED_DIR).is_dir());
    }

    #[tokio::test]
    async fn collect_base64_encodes_and_deletes_a_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hashes.txt"), b"hello").unwrap();
        let collector = FileCollector::new(&descriptor(dir.path(), true)).unwrap();

        let envelopes = collector.collect().await;
        assert_eq!(envelopes.len(), 1);
        assert_eq!(envelopes[0].payload["raw"], serde_json::json!(BASE64.encode(b"hello")));
        assert!(!dir.path().join("hashes.txt").exists());
    }

    #[tokio::test]
    async fn collect_archives_file_into_processed_when_not_deleting() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hashes.txt"), b"hello").unwrap();
        let collector = FileCollector::new(&descriptor(dir.path(), false)).unwrap();

        collector.collect().await;
        assert!(dir.path().join(PROCESSED_DIR).join("hashes.txt").exists());
    }

    #[tokio::test]
    async fn collect_ignores_the_processed_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        let collector = FileCollector::new(&descriptor(dir.path(), false)).unwrap();
        std::fs::write(dir.path().join(PROCESSED_DIR).join("old.txt"), b"stale").unwrap();

        let envelopes = collector.collect().await;
        assert!(envelopes.is_empty());
    }
}

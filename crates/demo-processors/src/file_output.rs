// SPDX-License-Identifier: MIT

//! Writes each message's payload to its own `<timestamp>_<uuid>.json` file
//! under a configured directory.

use crate::error::DemoProcessorError;
use crate::params::require_str;
use async_trait::async_trait;
use chrono::Utc;
use std::path::PathBuf;
use tracing::{error, info};
use tw_core::{Envelope, ProcessorDescriptor};
use tw_registry::Processor;

pub struct FileOutput {
    path: PathBuf,
}

impl FileOutput {
    pub fn new(descriptor: &ProcessorDescriptor) -> Result<Self, DemoProcessorError> {
        let path = PathBuf::from(require_str(&descriptor.parameters, "path")?);
        if !path.exists() {
            std::fs::create_dir_all(&path).map_err(|source| DemoProcessorError::CreateDir { path: path.clone(), source })?;
        } else if !path.is_dir() {
            return Err(DemoProcessorError::NotADirectory { path });
        }
        Ok(Self { path })
    }
}

#[async_trait]
impl Processor for FileOutput {
    async fn on_message(&self, envelope: Envelope) -> Option<Envelope> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%S");
        let filename = format!("{timestamp}_{}.json", envelope.uuid());
        let filepath = self.path.join(&filename);

        match serde_json::to_vec(&envelope.payload) {
            Ok(bytes) => match tokio::fs::write(&filepath, bytes).await {
                Ok(()) => info!(path = %filepath.display(), "wrote message to file"),
                Err(err) => error!(path = %filepath.display(), %err, "could not write file"),
            },
            Err(err) => error!(%err, "could not serialize payload"),
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tw_core::ProcessorGroup;

    fn descriptor(dir: &std::path::Path) -> ProcessorDescriptor {
        let mut parameters = HashMap::new();
        parameters.insert("path".to_string(), serde_json::json!(dir.to_string_lossy()));
        ProcessorDescriptor {
            name: "output".into(),
            module: "fileoutput".into(),
            group: ProcessorGroup::Output,
            parameters,
            validate_msg: false,
        }
    }

    #[test]
    fn creates_missing_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        let descriptor = descriptor(&nested);
        FileOutput::new(&descriptor).unwrap();
        assert!(nested.is_dir());
    }

    #[tokio::test]
    async fn writes_payload_to_a_timestamped_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = FileOutput::new(&descriptor(dir.path())).unwrap();
        let envelope = Envelope::new("indicators", 1, "indicators", serde_json::json!([{"hash": "x"}]));

        assert!(output.on_message(envelope.clone()).await.is_none());

        let mut entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().map(|e| e.unwrap().path()).collect();
        assert_eq!(entries.len(), 1);
        let written = std::fs::read_to_string(entries.remove(0)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, envelope.payload);
    }
}

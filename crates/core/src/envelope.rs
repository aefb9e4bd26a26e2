// SPDX-License-Identifier: MIT

//! The canonical message envelope that flows across every exchange/queue in
//! a workflow graph.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A typed edge from this message's `meta.uuid` to another message's uuid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    #[serde(rename = "type")]
    pub kind: String,
    pub right_side: Uuid,
}

/// Metadata block of an envelope. `uuid` is the dedup key and must be
/// present and unique across a single workflow run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub uuid: Uuid,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relations: Vec<Relation>,
}

impl Meta {
    pub fn new() -> Self {
        Self { uuid: Uuid::new_v4(), relations: Vec::new() }
    }
}

impl Default for Meta {
    fn default() -> Self {
        Self::new()
    }
}

/// The canonical, self-describing message object. Serialised as UTF-8 JSON
/// on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub format: String,
    pub version: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub meta: Meta,
    pub payload: serde_json::Value,
}

impl Envelope {
    /// Build a fresh envelope with a freshly generated `meta.uuid`.
    pub fn new(format: impl Into<String>, version: u32, kind: impl Into<String>, payload: serde_json::Value) -> Self {
        Self { format: format.into(), version, kind: kind.into(), meta: Meta::new(), payload }
    }

    pub fn uuid(&self) -> Uuid {
        self.meta.uuid
    }
}

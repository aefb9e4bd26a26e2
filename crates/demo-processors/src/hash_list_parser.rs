// SPDX-License-Identifier: MIT

//! Parses a newline-delimited list of hashes out of a raw envelope's
//! base64 payload and classifies each line by hash family.
//!
//! No STIX-building crate is available, so the output payload is a flat
//! JSON array of `{"hash", "hash_type"}` objects rather than a STIX
//! `Indicator` bundle.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;
use tw_core::Envelope;
use tw_registry::Processor;

static MD5: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^[a-f0-9]{32}(:.+)?$").unwrap());
static SHA1: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^[a-f0-9]{40}(:.+)?$").unwrap());
static SHA256: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^[a-f0-9]{64}(:.+)?$").unwrap());

fn classify(line: &str) -> Option<&'static str> {
    if MD5.is_match(line) {
        Some("md5")
    } else if SHA1.is_match(line) {
        Some("sha1")
    } else if SHA256.is_match(line) {
        Some("sha256")
    } else {
        None
    }
}

#[derive(Default)]
pub struct HashListParser;

impl HashListParser {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Processor for HashListParser {
    async fn on_message(&self, envelope: Envelope) -> Option<Envelope> {
        let raw = envelope.payload.get("raw")?.as_str()?;
        let decoded = BASE64.decode(raw).ok()?;
        let text = String::from_utf8(decoded).ok()?;

        let mut indicators = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match classify(line) {
                Some(hash_type) => indicators.push(serde_json::json!({ "hash": line, "hash_type": hash_type })),
                None => warn!(%line, "could not identify hash family for value, skipping"),
            }
        }

        Some(Envelope::new("indicators", 1, "indicators", serde_json::Value::Array(indicators)))
    }
}

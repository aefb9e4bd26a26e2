// SPDX-License-Identifier: MIT

//! Passes every message through unchanged. Useful as a wiring placeholder
//! and in tests that need a step which neither drops nor mutates.

use async_trait::async_trait;
use tw_core::Envelope;
use tw_registry::Processor;

#[derive(Default)]
pub struct NullEnricher;

impl NullEnricher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Processor for NullEnricher {
    async fn on_message(&self, envelope: Envelope) -> Option<Envelope> {
        Some(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn forwards_the_envelope_unchanged() {
        let enricher = NullEnricher::new();
        let envelope = Envelope::new("raw", 1, "raw", serde_json::json!({"k": "v"}));
        let out = enricher.on_message(envelope.clone()).await.unwrap();
        assert_eq!(out, envelope);
    }
}

// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use tw_core::Envelope;

/// A unit of work a workflow step wires between a consumer and a producer.
///
/// Implementors do their own thing with a decoded envelope; the surrounding
/// runtime owns decode, schema validation, dedup and publish/ack.
#[async_trait]
pub trait Processor: Send + Sync {
    /// Structural check on the raw message body, run before the generic
    /// envelope decode. Most processors accept everything and rely on the
    /// shared envelope/schema validation instead; override only when a
    /// module needs to reject payloads the common decoder would accept.
    async fn validate(&self, _raw: &[u8]) -> bool {
        true
    }

    /// Handle one message. `None` means "drop silently, do not forward";
    /// `Some(envelope)` is published downstream as-is (enrichers typically
    /// mutate `payload` and return the same envelope; filters return `None`
    /// to drop). Processors with no input queue (collectors) never have
    /// this called and may leave it at the default, which drops.
    async fn on_message(&self, _envelope: Envelope) -> Option<Envelope> {
        None
    }

    /// Produce zero or more fresh envelopes from whatever external source
    /// this processor watches. Called on a timer by the runtime instead of
    /// `on_message` for processors with no input queue (collectors);
    /// message-driven processors never have this called and may leave it
    /// at the default, which produces nothing.
    async fn collect(&self) -> Vec<Envelope> {
        Vec::new()
    }
}

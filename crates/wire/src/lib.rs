// SPDX-License-Identifier: MIT

//! Maps wire bytes to the internal `Envelope` and optionally verifies it
//! against a JSON Schema.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

mod error;
mod schema;

pub use error::WireError;
pub use schema::Schema;

use tw_core::Envelope;

/// Decode UTF-8 JSON bytes into an `Envelope`.
pub fn parse(bytes: &[u8]) -> Result<Envelope, WireError> {
    serde_json::from_slice(bytes).map_err(WireError::Decode)
}

/// Serialise an envelope to UTF-8 JSON for publishing.
pub fn serialize(envelope: &Envelope) -> Result<Vec<u8>, WireError> {
    serde_json::to_vec(envelope).map_err(WireError::Decode)
}

/// Reserved hook for domain-level semantic rules beyond structural schema
/// validation. Defaults to always-valid until a concrete rule is needed.
pub fn validate_semantic(_envelope: &Envelope) -> bool {
    true
}

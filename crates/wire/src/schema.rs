// SPDX-License-Identifier: MIT

use crate::error::WireError;
use tw_core::Envelope;

/// A compiled JSON Schema used to structurally validate envelopes before
/// they reach a processor's `on_message` hook, gated by the processor's
/// `validate_msg` config flag.
pub struct Schema {
    validator: jsonschema::Validator,
}

impl Schema {
    pub fn compile(schema_doc: &serde_json::Value) -> Result<Self, WireError> {
        let validator = jsonschema::validator_for(schema_doc).map_err(|e| WireError::SchemaCompile(e.to_string()))?;
        Ok(Self { validator })
    }

    /// Structural check; returns `false` on any deviation rather than
    /// surfacing the individual validation errors (callers that want detail
    /// should call `jsonschema` directly).
    pub fn validate(&self, envelope: &Envelope) -> bool {
        let instance = match serde_json::to_value(envelope) {
            Ok(v) => v,
            Err(_) => return false,
        };
        self.validator.is_valid(&instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope_schema() -> serde_json::Value {
        json!({
            "type": "object",
            "required": ["format", "version", "type", "meta", "payload"],
            "properties": {
                "meta": {
                    "type": "object",
                    "required": ["uuid"],
                }
            }
        })
    }

    #[test]
    fn accepts_valid_envelope() {
        let schema = Schema::compile(&envelope_schema()).unwrap();
        let env = Envelope::new("raw", 1, "raw", json!({}));
        assert!(schema.validate(&env));
    }

    #[test]
    fn rejects_envelope_with_empty_payload_object_but_missing_required_meta_field() {
        // Envelope type always carries meta.uuid, so build a schema that
        // requires a field our generated envelopes never populate.
        let schema_doc = json!({
            "type": "object",
            "required": ["format", "version", "type", "meta", "payload", "routing_key"],
        });
        let schema = Schema::compile(&schema_doc).unwrap();
        let env = Envelope::new("raw", 1, "raw", json!({}));
        assert!(!schema.validate(&env));
    }
}

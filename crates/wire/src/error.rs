// SPDX-License-Identifier: MIT

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("could not decode message: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("could not compile JSON Schema: {0}")]
    SchemaCompile(String),
}

// SPDX-License-Identifier: MIT

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("no processor module registered under '{0}'")]
    Unknown(String),

    #[error("module '{0}' was registered more than once")]
    DuplicateModule(String),

    #[error("could not build processor '{name}' from module '{module}': {reason}")]
    Build { name: String, module: String, reason: String },
}

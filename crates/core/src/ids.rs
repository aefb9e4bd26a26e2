// SPDX-License-Identifier: MIT

//! Thin newtype wrappers around operator-supplied names.
//!
//! Workflow and processor names are arbitrary-length strings the operator
//! writes into `workflow.yml` / `config.yml`, so these wrap `String` rather
//! than a fixed-capacity buffer.

use std::fmt;

macro_rules! define_name {
    ($(#[$meta:meta])* pub struct $name:ident;) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_name! {
    /// Name of a workflow as declared in the top-level `workflow.yml` mapping.
    pub struct WorkflowName;
}

define_name! {
    /// Instance id of a processor, e.g. `"MyFileCollector"`. Matches the
    /// per-processor config filename (`<name>.yml`) and the `name` used to
    /// register the processor in the registry (case-insensitively).
    pub struct ProcessorName;
}

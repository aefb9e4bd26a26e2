// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_parallelism() -> u32 {
    1
}

/// One step as written in `workflow.yml`, before name-scoping.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawStep {
    pub processor: String,
    #[serde(default)]
    pub from_q: Option<String>,
    #[serde(default)]
    pub to_ex: Option<String>,
    #[serde(default)]
    pub to_q: Option<String>,
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawWorkflow {
    #[serde(default)]
    pub flow: Vec<RawStep>,
}

/// Top-level shape of `workflow.yml`: a mapping of workflow name to its
/// flow definition.
pub type RawDocument = HashMap<String, RawWorkflow>;

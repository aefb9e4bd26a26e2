// SPDX-License-Identifier: MIT

//! The canonical wiring record emitted by the workflow loader and consumed
//! by the orchestrator and the processor lifecycle.

use crate::ids::{ProcessorName, WorkflowName};
use serde::{Deserialize, Serialize};

/// One `(processor, from_q, to_ex, to_q, parallelism)` tuple, scoped to a
/// workflow. `from_q` is `None` for collectors (or external ingress);
/// `to_ex`/`to_q` are `None` for output sinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WiringStep {
    pub workflow_name: WorkflowName,
    pub processor: ProcessorName,
    #[serde(default)]
    pub from_q: Option<String>,
    #[serde(default)]
    pub to_ex: Option<String>,
    #[serde(default)]
    pub to_q: Option<String>,
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

fn default_parallelism() -> u32 {
    1
}

impl WiringStep {
    pub fn pid_file_stem(&self, pid: u32) -> String {
        format!("{}.{}.{}.pid", self.workflow_name, self.processor, pid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pid_file_stem_joins_workflow_processor_and_pid() {
        let step = WiringStep {
            workflow_name: "demo".into(),
            processor: "collector".into(),
            from_q: None,
            to_ex: Some("ex1".into()),
            to_q: None,
            parallelism: 1,
        };
        assert_eq!(step.pid_file_stem(42), "demo.collector.42.pid");
    }
}

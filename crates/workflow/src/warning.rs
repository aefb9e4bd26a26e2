// SPDX-License-Identifier: MIT

/// A non-fatal issue noticed while loading a workflow graph.
#[derive(Debug, Clone)]
pub enum WorkflowWarning {
    /// A step declares `from_q` but no earlier step in the same workflow
    /// publishes to a queue of that name — the queue must be filled by
    /// something outside this workflow (external ingress, another
    /// workflow, or a manual publish) or the step will starve.
    DanglingFromQueue { workflow: String, processor: String, queue: String },
}

impl std::fmt::Display for WorkflowWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowWarning::DanglingFromQueue { workflow, processor, queue } => write!(
                f,
                "workflow '{workflow}' processor '{processor}' reads from_q '{queue}', which no earlier step in this workflow produces"
            ),
        }
    }
}

// SPDX-License-Identifier: MIT

use crate::error::WorkflowError;
use crate::raw::{RawDocument, RawStep};
use crate::warning::WorkflowWarning;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tw_core::WiringStep;

/// A parsed, validated set of workflows, keyed by workflow name.
#[derive(Debug, Clone, Default)]
pub struct WorkflowGraph {
    workflows: HashMap<String, Vec<WiringStep>>,
}

impl WorkflowGraph {
    pub fn steps_for(&self, workflow_name: &str) -> Result<&[WiringStep], WorkflowError> {
        self.workflows
            .get(workflow_name)
            .map(Vec::as_slice)
            .ok_or_else(|| WorkflowError::UnknownWorkflow(workflow_name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.workflows.keys().map(String::as_str)
    }

    pub fn contains(&self, workflow_name: &str) -> bool {
        self.workflows.contains_key(workflow_name)
    }
}

pub fn load(path: &Path) -> Result<(WorkflowGraph, Vec<WorkflowWarning>), WorkflowError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| WorkflowError::Read { path: path.to_path_buf(), source })?;
    parse(&text, path)
}

pub fn parse(text: &str, path: &Path) -> Result<(WorkflowGraph, Vec<WorkflowWarning>), WorkflowError> {
    let document: RawDocument =
        serde_yaml::from_str(text).map_err(|source| WorkflowError::Parse { path: path.to_path_buf(), source })?;

    check_queue_bindings(&document)?;

    let mut workflows = HashMap::new();
    let mut warnings = Vec::new();

    for (workflow_name, raw) in document {
        if raw.flow.is_empty() {
            return Err(WorkflowError::EmptyFlow(workflow_name));
        }

        let mut produced_queues: HashSet<&str> = HashSet::new();
        let mut steps = Vec::with_capacity(raw.flow.len());

        for step in &raw.flow {
            if let Some(from_q) = step.from_q.as_deref() {
                if !produced_queues.contains(from_q) {
                    warnings.push(WorkflowWarning::DanglingFromQueue {
                        workflow: workflow_name.clone(),
                        processor: step.processor.clone(),
                        queue: from_q.to_string(),
                    });
                }
            }
            if let Some(to_q) = step.to_q.as_deref() {
                produced_queues.insert(to_q);
            }
            steps.push(to_wiring_step(&workflow_name, step));
        }

        workflows.insert(workflow_name, steps);
    }

    Ok((WorkflowGraph { workflows }, warnings))
}

fn to_wiring_step(workflow_name: &str, step: &RawStep) -> WiringStep {
    WiringStep {
        workflow_name: workflow_name.into(),
        processor: step.processor.as_str().into(),
        from_q: step.from_q.clone(),
        to_ex: step.to_ex.clone(),
        to_q: step.to_q.clone(),
        parallelism: step.parallelism,
    }
}

/// A queue name must mean the same exchange everywhere it is declared as a
/// `to_q`, across every workflow in the document — two producers disagreeing
/// about which exchange feeds a queue is a configuration error, not
/// something a single workflow's flow order can catch.
fn check_queue_bindings(document: &RawDocument) -> Result<(), WorkflowError> {
    let mut bindings: HashMap<&str, &str> = HashMap::new();
    for raw in document.values() {
        for step in &raw.flow {
            let (Some(to_q), Some(to_ex)) = (step.to_q.as_deref(), step.to_ex.as_deref()) else {
                continue;
            };
            match bindings.get(to_q) {
                Some(existing) if *existing != to_ex => {
                    return Err(WorkflowError::ConflictingQueueBinding {
                        queue: to_q.to_string(),
                        first_ex: (*existing).to_string(),
                        second_ex: to_ex.to_string(),
                    });
                }
                _ => {
                    bindings.insert(to_q, to_ex);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fake_path() -> PathBuf {
        PathBuf::from("workflow.yml")
    }

    #[test]
    fn parses_a_single_step_flow() {
        let yaml = r#"
ingest:
  flow:
    - processor: collector
      to_ex: raw
"#;
        let (graph, warnings) = parse(yaml, &fake_path()).unwrap();
        let steps = graph.steps_for("ingest").unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].parallelism, 1);
        assert!(warnings.is_empty());
    }

    #[test]
    fn warns_on_from_q_not_produced_by_an_earlier_step() {
        let yaml = r#"
ingest:
  flow:
    - processor: parser
      from_q: raw_q
      to_ex: parsed
"#;
        let (_, warnings) = parse(yaml, &fake_path()).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(matches!(&warnings[0], WorkflowWarning::DanglingFromQueue { queue, .. } if queue == "raw_q"));
    }

    #[test]
    fn from_q_produced_by_an_earlier_to_q_does_not_warn() {
        let yaml = r#"
ingest:
  flow:
    - processor: collector
      to_ex: raw
      to_q: raw_q
    - processor: parser
      from_q: raw_q
      to_ex: parsed
"#;
        let (_, warnings) = parse(yaml, &fake_path()).unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn rejects_same_queue_bound_to_two_different_exchanges() {
        let yaml = r#"
a:
  flow:
    - processor: collector
      to_ex: ex_one
      to_q: shared_q
b:
  flow:
    - processor: other_collector
      to_ex: ex_two
      to_q: shared_q
"#;
        let err = parse(yaml, &fake_path()).unwrap_err();
        assert!(matches!(err, WorkflowError::ConflictingQueueBinding { .. }));
    }

    #[test]
    fn rejects_an_empty_flow() {
        let yaml = "ingest:\n  flow: []\n";
        let err = parse(yaml, &fake_path()).unwrap_err();
        assert!(matches!(err, WorkflowError::EmptyFlow(name) if name == "ingest"));
    }

    #[test]
    fn steps_for_unknown_workflow_is_an_error() {
        let (graph, _) = parse("a:\n  flow:\n    - processor: p\n", &fake_path()).unwrap();
        assert!(matches!(graph.steps_for("missing"), Err(WorkflowError::UnknownWorkflow(_))));
    }
}

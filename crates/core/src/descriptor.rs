// SPDX-License-Identifier: MIT

//! Processor descriptor: the static shape of one processor's configuration.

use crate::ids::ProcessorName;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which role a processor plays in a workflow graph. Collector has no input
/// queue, output has no output exchange — those are policies of the wiring
/// step, not of a type hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessorGroup {
    Collector,
    Parser,
    Enricher,
    Filter,
    Output,
}

impl ProcessorGroup {
    pub fn is_collector(self) -> bool {
        matches!(self, ProcessorGroup::Collector)
    }

    pub fn is_output(self) -> bool {
        matches!(self, ProcessorGroup::Output)
    }
}

/// Static descriptor of a processor as declared in its per-processor config
/// (`etc/processors/<name>.yml`) merged with the workflow's reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessorDescriptor {
    pub name: ProcessorName,
    pub module: String,
    pub group: ProcessorGroup,
    #[serde(default)]
    pub parameters: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub validate_msg: bool,
}

impl ProcessorDescriptor {
    /// `group == collector ⇒ no from_q`, `group == output ⇒ no to_ex`.
    /// Checked against a wiring step at workflow-load time.
    pub fn check_wiring(&self, from_q: Option<&str>, to_ex: Option<&str>) -> Result<(), String> {
        if self.group.is_collector() && from_q.is_some() {
            return Err(format!("processor '{}' is a collector but declares from_q", self.name));
        }
        if self.group.is_output() && to_ex.is_some() {
            return Err(format!("processor '{}' is an output but declares to_ex", self.name));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(group: ProcessorGroup) -> ProcessorDescriptor {
        ProcessorDescriptor {
            name: "p".into(),
            module: "mod".into(),
            group,
            parameters: HashMap::new(),
            validate_msg: false,
        }
    }

    #[test]
    fn collector_rejects_from_q() {
        let d = descriptor(ProcessorGroup::Collector);
        assert!(d.check_wiring(Some("q"), None).is_err());
        assert!(d.check_wiring(None, Some("ex")).is_ok());
    }

    #[test]
    fn output_rejects_to_ex() {
        let d = descriptor(ProcessorGroup::Output);
        assert!(d.check_wiring(None, Some("ex")).is_err());
        assert!(d.check_wiring(Some("q"), None).is_ok());
    }

    #[test]
    fn parser_has_no_restriction() {
        let d = descriptor(ProcessorGroup::Parser);
        assert!(d.check_wiring(Some("q"), Some("ex")).is_ok());
    }
}

// SPDX-License-Identifier: MIT

use crate::cli::{GlobalArgs, WorkflowsArgs, WorkflowsCommand};
use crate::context::{current_exe, pid_dir, resolve_paths};
use crate::exit_error::ExitError;
use std::path::Path;
use tracing::warn;

/// Wiring for the `start-demo` workflow: filecollector -> parser -> enricher
/// -> fileOutput over `ex1`/`ex2`/`ex3`, the same chain the source system's
/// `start_demo` command wires by hand in Python. This never touches
/// `workflow.yml` — the flow is embedded here and parsed the same way a
/// real workflow document would be.
const DEMO_WORKFLOW_ID: &str = "demo";
const DEMO_WORKFLOW_YAML: &str = r#"
demo:
  flow:
    - processor: collector
      to_ex: ex1
      to_q: ex1_q
    - processor: parser
      from_q: ex1_q
      to_ex: ex2
      to_q: ex2_q
    - processor: enricher
      from_q: ex2_q
      to_ex: ex3
      to_q: ex3_q
    - processor: output
      from_q: ex3_q
"#;

pub async fn run(args: WorkflowsArgs, global: &GlobalArgs) -> Result<(), ExitError> {
    match args.command {
        WorkflowsCommand::Start { workflow_id } => start(&workflow_id, global).await,
        WorkflowsCommand::Stop { workflow_id } => stop(&workflow_id, global),
        WorkflowsCommand::List => super::print_tracked_processes(global),
        WorkflowsCommand::StartDemo => start_demo(global).await,
    }
}

async fn start(workflow_id: &str, global: &GlobalArgs) -> Result<(), ExitError> {
    let paths = resolve_paths(global)?;
    let (graph, warnings) = tw_workflow::load(&paths.workflow_path)?;
    for warning in &warnings {
        warn!(target: "yellowsub.cli", %warning, "workflow wiring warning");
    }

    let program = current_exe()?;
    let dir = pid_dir(&paths);
    let global = global.clone();
    let workflow_id_owned = workflow_id.to_string();
    let spawned = tw_orchestrator::start(&graph, workflow_id, &dir, &program, |step, instance| {
        super::worker_args(&global, &workflow_id_owned, step, instance)
    })?;

    println!("started {} worker process(es) for workflow '{workflow_id}'", spawned.len());
    Ok(())
}

/// Wire and start `collector -> parser -> enricher -> output` for local
/// smoke-testing, reading `etc/processors/{collector,parser,enricher,output}.yml`
/// for each processor's module but never `workflow.yml`. `etc/config.yml`
/// still governs the broker/cache/logging settings each spawned worker uses.
async fn start_demo(global: &GlobalArgs) -> Result<(), ExitError> {
    let paths = resolve_paths(global)?;
    let (graph, _warnings) = tw_workflow::parse(DEMO_WORKFLOW_YAML, Path::new("<start-demo>"))?;

    let program = current_exe()?;
    let dir = pid_dir(&paths);
    let global = global.clone();
    let spawned = tw_orchestrator::start(&graph, DEMO_WORKFLOW_ID, &dir, &program, |step, instance| {
        super::worker_args(&global, DEMO_WORKFLOW_ID, step, instance)
    })?;

    println!("started {} demo worker process(es): collector -> parser -> enricher -> output", spawned.len());
    Ok(())
}

fn stop(workflow_id: &str, global: &GlobalArgs) -> Result<(), ExitError> {
    let paths = resolve_paths(global)?;
    let stopped = tw_orchestrator::stop(workflow_id, &pid_dir(&paths))?;
    println!("stopped {stopped} worker process(es) for workflow '{workflow_id}'");
    Ok(())
}

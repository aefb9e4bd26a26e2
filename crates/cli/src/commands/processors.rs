// SPDX-License-Identifier: MIT

use crate::cli::{GlobalArgs, ProcessorsArgs, ProcessorsCommand};
use crate::context::{current_exe, pid_dir, resolve_paths};
use crate::exit_error::ExitError;
use tracing::warn;

pub async fn run(args: ProcessorsArgs, global: &GlobalArgs) -> Result<(), ExitError> {
    match args.command {
        ProcessorsCommand::Start { workflow_id, processor } => start(&workflow_id, &processor, global).await,
        ProcessorsCommand::Stop { processor } => stop(&processor, global),
        ProcessorsCommand::List => super::print_tracked_processes(global),
    }
}

async fn start(workflow_id: &str, processor: &str, global: &GlobalArgs) -> Result<(), ExitError> {
    let paths = resolve_paths(global)?;
    let (graph, warnings) = tw_workflow::load(&paths.workflow_path)?;
    for warning in &warnings {
        warn!(target: "yellowsub.cli", %warning, "workflow wiring warning");
    }

    let program = current_exe()?;
    let dir = pid_dir(&paths);
    let global = global.clone();
    let workflow_id_owned = workflow_id.to_string();
    let spawned = tw_orchestrator::start_processor(&graph, workflow_id, processor, &dir, &program, |step, instance| {
        super::worker_args(&global, &workflow_id_owned, step, instance)
    })?;

    println!("started {} worker process(es) for processor '{processor}' in workflow '{workflow_id}'", spawned.len());
    Ok(())
}

fn stop(processor: &str, global: &GlobalArgs) -> Result<(), ExitError> {
    let paths = resolve_paths(global)?;
    let stopped = tw_orchestrator::stop_processor(processor, &pid_dir(&paths))?;
    println!("stopped {stopped} worker process(es) for processor '{processor}'");
    Ok(())
}

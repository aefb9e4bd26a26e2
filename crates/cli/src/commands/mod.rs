// SPDX-License-Identifier: MIT

pub mod processors;
pub mod worker;
pub mod workflows;

use crate::cli::GlobalArgs;
use crate::context::pid_dir;
use crate::exit_error::ExitError;
use crate::output::handle_list;
use serde::Serialize;
use tw_core::WiringStep;

/// One instance's `--rootdir`/`--config`/`--workflow-config`/`--verbose`
/// args, passed through unchanged from the command that spawned it.
pub fn worker_args(global: &GlobalArgs, workflow_id: &str, step: &WiringStep, instance: u32) -> Vec<String> {
    let mut args = vec![
        "worker".to_string(),
        "--workflow-id".to_string(),
        workflow_id.to_string(),
        "--processor".to_string(),
        step.processor.to_string(),
        "--instance".to_string(),
        instance.to_string(),
    ];
    if let Some(rootdir) = &global.rootdir {
        args.push("--rootdir".to_string());
        args.push(rootdir.clone());
    }
    if let Some(config_dir) = &global.config_dir {
        args.push("--config".to_string());
        args.push(config_dir.clone());
    }
    if let Some(workflow_config) = &global.workflow_config {
        args.push("--workflow-config".to_string());
        args.push(workflow_config.clone());
    }
    if global.verbose {
        args.push("--verbose".to_string());
    }
    args
}

#[derive(Serialize)]
struct ProcessRow {
    workflow: String,
    processor: String,
    pid: i32,
    alive: bool,
}

pub fn print_tracked_processes(global: &GlobalArgs) -> Result<(), ExitError> {
    let paths = crate::context::resolve_paths(global)?;
    let tracked = tw_orchestrator::list(&pid_dir(&paths))?;
    let rows: Vec<ProcessRow> =
        tracked.into_iter().map(|(t, alive)| ProcessRow { workflow: t.workflow_name, processor: t.processor_name, pid: t.pid, alive }).collect();

    handle_list(global.output, &rows, "no tracked worker processes", |rows| {
        for row in rows {
            let status = if row.alive { "running" } else { "dead" };
            println!("{:<20} {:<20} {:<8} {}", row.workflow, row.processor, row.pid, status);
        }
    })
    .map_err(|err| ExitError::new(1, err.to_string()))
}

// SPDX-License-Identifier: MIT

use crate::error::OrchestratorError;
use crate::pidfile::{list_tracked, PidFile, TrackedProcess};
use fs2::FileExt;
use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{info, warn};
use tw_workflow::WorkflowGraph;

/// Spawn every wiring step of `workflow_name`, `parallelism` instances each,
/// as child processes of `program`. `args_for` builds one process's
/// argument list from its wiring step; the orchestrator does not know how
/// to invoke a worker on its own, only how to supervise it once spawned.
///
/// A short-lived exclusive lock on `<pid_dir>/<workflow_name>.start.lock`
/// serialises concurrent `start` calls for the same workflow so two
/// operators racing `start` don't double-spawn every step.
pub fn start(
    graph: &WorkflowGraph,
    workflow_name: &str,
    pid_dir: &Path,
    program: &Path,
    args_for: impl Fn(&tw_core::WiringStep, u32) -> Vec<String>,
) -> Result<Vec<PathBuf>, OrchestratorError> {
    let steps = resolve_steps(graph, workflow_name)?;
    spawn_steps(workflow_name, &steps, pid_dir, program, args_for)
}

/// Like [`start`], but spawns only the wiring steps for `processor_name`
/// within `workflow_name` rather than the whole flow.
pub fn start_processor(
    graph: &WorkflowGraph,
    workflow_name: &str,
    processor_name: &str,
    pid_dir: &Path,
    program: &Path,
    args_for: impl Fn(&tw_core::WiringStep, u32) -> Vec<String>,
) -> Result<Vec<PathBuf>, OrchestratorError> {
    let steps: Vec<_> = resolve_steps(graph, workflow_name)?.into_iter().filter(|s| s.processor.as_str() == processor_name).collect();
    spawn_steps(workflow_name, &steps, pid_dir, program, args_for)
}

fn resolve_steps(graph: &WorkflowGraph, workflow_name: &str) -> Result<Vec<tw_core::WiringStep>, OrchestratorError> {
    graph
        .steps_for(workflow_name)
        .map(|steps| steps.to_vec())
        .map_err(|err| match err {
            tw_workflow::WorkflowError::UnknownWorkflow(name) => OrchestratorError::UnknownWorkflow(name),
            other => OrchestratorError::Workflow(other),
        })
}

/// A short-lived exclusive lock on `<pid_dir>/<workflow_name>.start.lock`
/// serialises concurrent start calls for the same workflow so two
/// operators racing `start` don't double-spawn every step.
fn spawn_steps(
    workflow_name: &str,
    steps: &[tw_core::WiringStep],
    pid_dir: &Path,
    program: &Path,
    args_for: impl Fn(&tw_core::WiringStep, u32) -> Vec<String>,
) -> Result<Vec<PathBuf>, OrchestratorError> {
    std::fs::create_dir_all(pid_dir)?;
    let lock_path = pid_dir.join(format!("{workflow_name}.start.lock"));
    let lock_file = std::fs::OpenOptions::new().create(true).write(true).open(&lock_path)?;
    lock_file.try_lock_exclusive().map_err(|source| OrchestratorError::Lock { path: lock_path.clone(), source })?;

    let mut spawned = Vec::new();
    let mut attempted = 0;
    let mut failed = 0;
    for step in steps {
        for instance in 0..step.parallelism {
            attempted += 1;
            // A step that fails to spawn is recoverable: log it and move on
            // to the remaining steps/instances rather than aborting the
            // whole operation, then report the partial failure once every
            // step has been attempted.
            match Command::new(program).args(args_for(step, instance)).spawn() {
                Ok(child) => {
                    let pid = child.id();
                    let stem = step.pid_file_stem(pid);
                    let pidfile = PidFile::create(pid_dir, &stem, pid)?;
                    info!(target: "yellowsub.orchestrator", workflow = workflow_name, processor = %step.processor, pid, "spawned worker");
                    spawned.push(pidfile.path().to_path_buf());
                    // The lock only needs to hold long enough to record the
                    // pid file; the running worker is tracked by the file's
                    // contents and liveness checks from here on, not by
                    // holding this lock.
                    drop(pidfile);
                }
                Err(source) => {
                    failed += 1;
                    warn!(target: "yellowsub.orchestrator", workflow = workflow_name, processor = %step.processor, %source, "failed to spawn worker, continuing with remaining steps");
                }
            }
        }
    }

    FileExt::unlock(&lock_file)?;
    let _ = std::fs::remove_file(&lock_path);

    if failed > 0 {
        return Err(OrchestratorError::PartialSpawn { attempted, failed, spawned });
    }
    Ok(spawned)
}

/// Send `SIGTERM` to every tracked pid belonging to `workflow_name` and
/// remove its pid file. Pids that no longer correspond to a live process
/// are treated as already stopped, not errors.
pub fn stop(workflow_name: &str, pid_dir: &Path) -> Result<usize, OrchestratorError> {
    stop_matching(pid_dir, |t| t.workflow_name == workflow_name)
}

/// Send `SIGTERM` to every tracked pid running `processor_name`, across all
/// workflows, and remove its pid file.
pub fn stop_processor(processor_name: &str, pid_dir: &Path) -> Result<usize, OrchestratorError> {
    stop_matching(pid_dir, |t| t.processor_name == processor_name)
}

fn stop_matching(pid_dir: &Path, matches: impl Fn(&TrackedProcess) -> bool) -> Result<usize, OrchestratorError> {
    let mut stopped = 0;
    for tracked in list_tracked(pid_dir)? {
        if !matches(&tracked) {
            continue;
        }
        match kill(Pid::from_raw(tracked.pid), Signal::SIGTERM) {
            Ok(()) => stopped += 1,
            Err(Errno::ESRCH) => {
                warn!(target: "yellowsub.orchestrator", pid = tracked.pid, "pid file referenced a process that is no longer running");
            }
            Err(source) => return Err(OrchestratorError::Signal { pid: tracked.pid, source }),
        }
        let _ = std::fs::remove_file(&tracked.path);
    }
    Ok(stopped)
}

/// List every tracked processor instance, across all workflows, along with
/// whether its pid still answers to a signal-0 liveness probe.
pub fn list(pid_dir: &Path) -> Result<Vec<(TrackedProcess, bool)>, OrchestratorError> {
    let tracked = list_tracked(pid_dir)?;
    Ok(tracked
        .into_iter()
        .map(|t| {
            let alive = kill(Pid::from_raw(t.pid), None::<Signal>).is_ok();
            (t, alive)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tw_workflow::parse;

    fn graph_with_two_instances() -> WorkflowGraph {
        let yaml = r#"
ingest:
  flow:
    - processor: collector
      to_ex: raw
      parallelism: 2
"#;
        parse(yaml, Path::new("workflow.yml")).unwrap().0
    }

    #[test]
    fn start_of_unknown_workflow_is_mapped_to_the_dedicated_error() {
        let graph = graph_with_two_instances();
        let dir = tempfile::tempdir().unwrap();
        let err = start(&graph, "missing", dir.path(), Path::new("true"), |_, _| Vec::new()).unwrap_err();
        assert!(matches!(&err, OrchestratorError::UnknownWorkflow(name) if name == "missing"));
        assert_eq!(err.exit_code(), crate::error::UNKNOWN_WORKFLOW_EXIT_CODE);
    }

    #[test]
    fn start_spawns_parallelism_instances_and_writes_pid_files() {
        let graph = graph_with_two_instances();
        let dir = tempfile::tempdir().unwrap();
        let program = if cfg!(windows) { "cmd" } else { "true" };
        let paths = start(&graph, "ingest", dir.path(), Path::new(program), |_, _| {
            if cfg!(windows) { vec!["/C".into(), "exit".into(), "0".into()] } else { Vec::new() }
        })
        .unwrap();
        assert_eq!(paths.len(), 2);
        for path in &paths {
            assert!(path.exists());
        }
    }

    #[test]
    fn start_processor_only_spawns_matching_steps() {
        let yaml = r#"
ingest:
  flow:
    - processor: collector
      to_ex: raw
      parallelism: 2
    - processor: parser
      from_q: raw
      parallelism: 1
"#;
        let (graph, _) = parse(yaml, Path::new("workflow.yml")).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let paths = start_processor(&graph, "ingest", "parser", dir.path(), Path::new("true"), |_, _| Vec::new()).unwrap();
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn spawn_failures_are_collected_per_step_and_other_steps_still_proceed() {
        let yaml = r#"
ingest:
  flow:
    - processor: collector
      to_ex: raw
      parallelism: 2
    - processor: parser
      from_q: raw
      parallelism: 1
"#;
        let (graph, _) = parse(yaml, Path::new("workflow.yml")).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let missing_program = dir.path().join("does-not-exist-binary");

        let err = start(&graph, "ingest", dir.path(), &missing_program, |_, _| Vec::new()).unwrap_err();
        assert_eq!(err.exit_code(), 1);

        match err {
            OrchestratorError::PartialSpawn { attempted, failed, spawned } => {
                // Both steps' instances (2 + 1) were attempted despite the
                // first one failing, instead of aborting after the first.
                assert_eq!(attempted, 3);
                assert_eq!(failed, 3);
                assert!(spawned.is_empty());
            }
            other => panic!("expected PartialSpawn, got {other:?}"),
        }
    }

    #[test]
    fn stop_processor_only_stops_matching_processor_name() {
        let dir = tempfile::tempdir().unwrap();
        let collector = PidFile::create(dir.path(), "ingest.collector.999999.pid", 999_999).unwrap();
        drop(collector);
        let parser = PidFile::create(dir.path(), "ingest.parser.999998.pid", 999_998).unwrap();
        drop(parser);

        let stopped = stop_processor("collector", dir.path()).unwrap();
        assert_eq!(stopped, 0);
        assert!(!dir.path().join("ingest.collector.999999.pid").exists());
        assert!(dir.path().join("ingest.parser.999998.pid").exists());
    }

    #[test]
    fn stop_removes_pid_files_for_dead_processes() {
        let dir = tempfile::tempdir().unwrap();
        let pidfile = PidFile::create(dir.path(), "ingest.collector.999999.pid", 999_999).unwrap();
        let path = pidfile.path().to_path_buf();
        drop(pidfile);
        let stopped = stop("ingest", dir.path()).unwrap();
        assert_eq!(stopped, 0);
        assert!(!path.exists());
    }
}

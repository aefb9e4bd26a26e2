// SPDX-License-Identifier: MIT

use std::sync::OnceLock;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use tw_config::LoggingConfig;

/// Name of the root tracing target every worker process logs under. Child
/// components use [`child_target`] to get a dotted path under it, mirroring
/// a conventional logger hierarchy even though `tracing` itself has no
/// notion of parent/child loggers.
pub const ROOT_TARGET: &str = "yellowsub";

/// Set the first time [`setup`] successfully installs the global
/// subscriber; [`get`] uses it to tell "not yet initialised" apart from
/// "initialised, querying a target that happens to have no handler".
static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Build `"yellowsub.<class>"`, or `"yellowsub.<class>.<id>"` when an
/// instance id is given.
pub fn child_target(class: &str, id: Option<&str>) -> String {
    match id {
        Some(id) => format!("{ROOT_TARGET}.{class}.{id}"),
        None => format!("{ROOT_TARGET}.{class}"),
    }
}

/// Build the global subscriber from a merged config's `logging` section:
/// pretty-printed to stderr always, and — if `config.log_dir` is set —
/// newline-delimited JSON to a daily-rotating file under it.
///
/// Safe to call more than once (e.g. from [`crate::Worker::reload`] while a
/// worker is already running, or paused): the first call installs the
/// global subscriber; later calls rebuild the filter/layers but the
/// process-wide subscriber can only ever be installed once, so a later
/// attempt to install it again is treated as already-done rather than an
/// error.
///
/// Returns the [`tracing_appender::non_blocking::WorkerGuard`] for the file
/// writer, if one was created on *this* call; the caller must keep it alive
/// for the life of the process, or buffered log lines are lost on drop.
pub fn setup(config: &LoggingConfig) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>, crate::error::RuntimeError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", config.facility, config.loglevel)));

    let stderr_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);

    let guard = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| crate::error::RuntimeError::Logging(e.to_string()))?;
            let file_appender = tracing_appender::rolling::daily(dir, format!("{}.log", config.facility));
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let file_layer = fmt::layer().json().with_writer(non_blocking);
            // A second call finds the global subscriber already installed;
            // that is the idempotent case a reload() relies on, not a
            // failure this function should surface.
            let _ = tracing_subscriber::registry().with(filter).with(stderr_layer).with(file_layer).try_init();
            Some(guard)
        }
        None => {
            let _ = tracing_subscriber::registry().with(filter).with(stderr_layer).try_init();
            None
        }
    };

    let _ = INITIALIZED.set(());
    Ok(guard)
}

/// Return the dotted tracing target a component should log under —
/// `"yellowsub.<component>"` — once the root logger has been initialised.
///
/// Mirrors `YellowsubLogger.get_logger`'s contract: the caller gets back
/// the closest configured logger for the named component, falling back to
/// the root `yellowsub` target's own handlers via `tracing`'s normal target
/// hierarchy; calling this before [`setup`] has ever run is an error.
pub fn get(component: &str) -> Result<String, crate::error::RuntimeError> {
    if INITIALIZED.get().is_none() {
        return Err(crate::error::RuntimeError::Logging(
            "root logger not initialized: call logging::setup() before worker start".to_string(),
        ));
    }
    Ok(child_target(component, None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_target_without_id_is_dotted_class() {
        assert_eq!(child_target("worker", None), "yellowsub.worker");
    }

    #[test]
    fn child_target_with_id_appends_it() {
        assert_eq!(child_target("worker", Some("FileCollector")), "yellowsub.worker.FileCollector");
    }

    #[test]
    fn setup_is_idempotent_across_repeated_calls() {
        let config = LoggingConfig::default();
        assert!(setup(&config).is_ok());
        assert!(setup(&config).is_ok());
    }

    #[test]
    fn get_succeeds_once_setup_has_run() {
        assert!(setup(&LoggingConfig::default()).is_ok());
        assert_eq!(get("worker").unwrap(), "yellowsub.worker");
    }
}

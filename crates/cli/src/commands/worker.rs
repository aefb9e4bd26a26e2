// SPDX-License-Identifier: MIT

//! The `tw worker` entry point: wires up one processor instance from config
//! and runs it until stopped. Orchestrator spawns one of these per wiring
//! step instance; an operator does not normally invoke it directly.

use crate::cli::{GlobalArgs, WorkerArgs};
use crate::context::resolve_paths;
use crate::exit_error::ExitError;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tw_broker::{BrokerConnection, ConnectOptions};
use tw_cache::{DedupCache, InMemoryCache, RedisCache, RedisConfig};
use tw_config::{ConfigStore, LoggingConfig};
use tw_core::ProcessorDescriptor;
use tw_wire::Schema;

pub async fn run(args: WorkerArgs, global: &GlobalArgs) -> Result<(), ExitError> {
    let paths = resolve_paths(global)?;
    let store = ConfigStore::new(paths.clone());
    let global_config = store.load_global()?;

    let mut logging_config: LoggingConfig =
        serde_json::from_value(global_config.get("logging").cloned().unwrap_or_else(|| serde_json::json!({})))?;
    if global.verbose {
        logging_config.loglevel = "debug".to_string();
    }
    let _log_guard = tw_runtime::logging::setup(&logging_config)?;

    let (graph, warnings) = tw_workflow::load(&paths.workflow_path)?;
    for warning in &warnings {
        warn!(target: "yellowsub.worker", %warning, "workflow wiring warning");
    }

    let step = graph
        .steps_for(&args.workflow_id)?
        .iter()
        .find(|step| step.processor.as_str() == args.processor)
        .cloned()
        .ok_or_else(|| ExitError::new(1, format!("processor '{}' is not wired into workflow '{}'", args.processor, args.workflow_id)))?;

    let descriptor: ProcessorDescriptor = serde_json::from_value(store.merged_for(&args.processor)?)?;

    let rabbitmq: ConnectOptions = serde_json::from_value(global_config.get("rabbitmq").cloned().unwrap_or_else(|| serde_json::json!({})))?;
    let redis_config: RedisConfig = serde_json::from_value(global_config.get("redis").cloned().unwrap_or_else(|| serde_json::json!({})))?;

    let registry = tw_registry::Registry::new();
    tw_demo_processors::register_all(&registry)?;
    let processor = registry.build(&descriptor)?;

    let cache = connect_cache(&redis_config).await;
    let schema = load_schema(&paths, &descriptor)?;

    let conn = BrokerConnection::connect(&rabbitmq).await?;
    let worker = Arc::new(tw_runtime::Worker::new(step, descriptor.clone(), processor, cache, redis_config.ttl(), schema, store));
    worker.mark_config_loaded()?;

    let consumer_tag = format!("{}.{}.{}", args.workflow_id, args.processor, args.instance);
    if let Err(err) = worker.wire(&conn, &consumer_tag).await {
        warn!(target: "yellowsub.worker", processor = %args.processor, %err, "failed to wire processor, stopping");
        worker.begin_stop()?;
        worker.finish_stop(&conn).await?;
        return Err(err.into());
    }
    info!(target: "yellowsub.worker", workflow = %args.workflow_id, processor = %args.processor, instance = args.instance, "worker wired, running");

    let run_handle = {
        let worker = worker.clone();
        if descriptor.group.is_collector() {
            let poll_interval = poll_interval(&descriptor);
            tokio::spawn(async move { worker.run_collector(poll_interval).await })
        } else {
            tokio::spawn(async move { worker.run().await })
        }
    };

    wait_for_shutdown_signal().await;
    info!(target: "yellowsub.worker", "shutdown signal received, draining");
    worker.begin_stop()?;
    match run_handle.await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => warn!(target: "yellowsub.worker", %err, "worker loop exited with an error"),
        Err(err) => warn!(target: "yellowsub.worker", %err, "worker task panicked while stopping"),
    }
    worker.finish_stop(&conn).await?;
    Ok(())
}

async fn connect_cache(config: &RedisConfig) -> Arc<dyn DedupCache> {
    match RedisCache::connect(config).await {
        Ok(cache) => Arc::new(cache),
        Err(err) => {
            warn!(target: "yellowsub.worker", %err, "could not reach redis, falling back to an in-memory dedup cache");
            Arc::new(InMemoryCache::new())
        }
    }
}

fn poll_interval(descriptor: &ProcessorDescriptor) -> Duration {
    let secs = descriptor.parameters.get("poll_interval_secs").and_then(|v| v.as_u64()).unwrap_or(5);
    Duration::from_secs(secs)
}

/// Compile `<processor_config_dir>/<module>.schema.json` if `validate_msg`
/// is set and the file exists. A missing schema with `validate_msg` set
/// just means envelope-shape validation is skipped, not an error — the
/// processor-level `validate()` hook still runs.
fn load_schema(paths: &tw_config::Paths, descriptor: &ProcessorDescriptor) -> Result<Option<Arc<Schema>>, ExitError> {
    if !descriptor.validate_msg {
        return Ok(None);
    }
    let schema_path = paths.processor_config_dir.join(format!("{}.schema.json", descriptor.module));
    if !Path::new(&schema_path).exists() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(&schema_path)?;
    let doc: serde_json::Value = serde_json::from_str(&text)?;
    let schema = Schema::compile(&doc).map_err(|err| ExitError::new(1, err.to_string()))?;
    Ok(Some(Arc::new(schema)))
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = tokio::signal::ctrl_c() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}


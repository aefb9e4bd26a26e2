// SPDX-License-Identifier: MIT

//! Workspace-level scenarios exercising whole flows across crate
//! boundaries: collector-to-output data movement, dedup under redelivery,
//! parallel sibling fan-out, and the exit-code contract for an unrecognized
//! workflow. These run against the in-process pieces only (in-memory cache,
//! demo processors, the orchestrator's pid-file bookkeeping) since none of
//! them require a live broker or Redis instance to demonstrate the
//! behavior under test.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use tw_cache::{DedupCache, InMemoryCache};
use tw_core::{Envelope, ProcessorDescriptor, ProcessorGroup};
use tw_demo_processors::{FileCollector, FileOutput, HashListParser, NullEnricher};
use tw_orchestrator::{start, start_processor, OrchestratorError};
use tw_registry::Processor;
use tw_workflow::parse;

fn descriptor(name: &str, module: &str, group: ProcessorGroup, parameters: HashMap<String, serde_json::Value>) -> ProcessorDescriptor {
    ProcessorDescriptor { name: name.into(), module: module.to_string(), group, parameters, validate_msg: false }
}

/// Hash-list seed scenario: a collector picks up a dropped file, the parser
/// classifies each line, the enricher passes the result through unchanged,
/// and the output processor lands one JSON file per indicator batch.
#[tokio::test]
async fn hash_list_collector_to_output_round_trip() {
    let inbox = tempfile::tempdir().unwrap();
    let outbox = tempfile::tempdir().unwrap();

    let hashes = format!("{}\n{}\nnot-a-hash\n", "a".repeat(32), "b".repeat(64));
    std::fs::write(inbox.path().join("drop.txt"), hashes).unwrap();

    let mut collector_params = HashMap::new();
    collector_params.insert("path".to_string(), serde_json::json!(inbox.path().to_string_lossy()));
    collector_params.insert("delete_files".to_string(), serde_json::json!(true));
    let collector = FileCollector::new(&descriptor("collector", "filecollector", ProcessorGroup::Collector, collector_params)).unwrap();

    let mut output_params = HashMap::new();
    output_params.insert("path".to_string(), serde_json::json!(outbox.path().to_string_lossy()));
    let output = FileOutput::new(&descriptor("output", "fileoutput", ProcessorGroup::Output, output_params)).unwrap();

    let parser = HashListParser::new();
    let enricher = NullEnricher::new();
    let cache = InMemoryCache::new();

    let collected = collector.collect().await;
    assert_eq!(collected.len(), 1, "the dropped file should produce exactly one raw envelope");

    for envelope in collected {
        let Some(envelope) = cache.dedup(envelope, Duration::from_secs(60)).await.unwrap() else {
            continue;
        };
        let Some(envelope) = parser.on_message(envelope).await else { continue };
        let Some(envelope) = enricher.on_message(envelope).await else { continue };
        output.on_message(envelope).await;
    }

    assert!(!inbox.path().join("drop.txt").exists(), "collected file should have been deleted");

    let written: Vec<_> = std::fs::read_dir(outbox.path()).unwrap().map(|e| e.unwrap().path()).collect();
    assert_eq!(written.len(), 1);
    let payload: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&written[0]).unwrap()).unwrap();
    let indicators = payload.as_array().unwrap();
    assert_eq!(indicators.len(), 2, "the unrecognized line should have been skipped");
    let hash_types: Vec<_> = indicators.iter().map(|i| i["hash_type"].as_str().unwrap()).collect();
    assert_eq!(hash_types, vec!["md5", "sha256"]);
}

/// Dedup by `meta.uuid`: the same envelope delivered twice only reaches the
/// processor once.
#[tokio::test]
async fn dedup_cache_drops_the_second_delivery_of_the_same_uuid() {
    let cache = InMemoryCache::new();
    let enricher = NullEnricher::new();

    let envelope = Envelope::new("raw", 1, "raw", serde_json::json!({"k": "v"}));
    let redelivered = envelope.clone();

    let mut handled = 0;
    for candidate in [envelope, redelivered] {
        if let Some(deduped) = cache.dedup(candidate, Duration::from_secs(60)).await.unwrap() {
            enricher.on_message(deduped).await;
            handled += 1;
        }
    }

    assert_eq!(handled, 1, "the redelivered duplicate must not reach the processor a second time");
}

/// Simulates a worker crashing after handling a message but before its ack
/// reaches the broker: the broker's at-least-once guarantee means the same
/// delivery comes back, and the dedup cache (which survives the crash,
/// unlike in-flight broker state) must still recognize it.
#[tokio::test]
async fn at_least_once_redelivery_after_a_simulated_crash_is_deduped() {
    let cache = InMemoryCache::new();
    let output_dir = tempfile::tempdir().unwrap();
    let mut output_params = HashMap::new();
    output_params.insert("path".to_string(), serde_json::json!(output_dir.path().to_string_lossy()));
    let output = FileOutput::new(&descriptor("output", "fileoutput", ProcessorGroup::Output, output_params)).unwrap();

    let envelope = Envelope::new("indicators", 1, "indicators", serde_json::json!([{"hash": "x"}]));

    let first_pass = cache.dedup(envelope.clone(), Duration::from_secs(60)).await.unwrap();
    assert!(first_pass.is_some());
    output.on_message(first_pass.unwrap()).await;

    // Worker "crashes" here, before the ack lands; the broker redelivers.
    let redelivery = cache.dedup(envelope, Duration::from_secs(60)).await.unwrap();
    assert!(redelivery.is_none(), "the dedup cache must reject the redelivered message rather than writing it again");

    let written: Vec<_> = std::fs::read_dir(output_dir.path()).unwrap().collect();
    assert_eq!(written.len(), 1, "only one output file should exist despite the redelivery");
}

/// A workflow step's `parallelism` fans out into that many sibling worker
/// processes, each tracked by its own pid file, so deliveries round-robin
/// across them at the broker's consumer level.
#[test]
fn parallel_siblings_are_spawned_one_pid_file_each() {
    let yaml = r#"
ingest:
  flow:
    - processor: collector
      to_ex: raw
      parallelism: 3
"#;
    let (graph, _warnings) = parse(yaml, Path::new("workflow.yml")).unwrap();
    let pid_dir = tempfile::tempdir().unwrap();
    let program = if cfg!(windows) { "cmd" } else { "true" };
    let paths = start(&graph, "ingest", pid_dir.path(), Path::new(program), |_, _| {
        if cfg!(windows) { vec!["/C".into(), "exit".into(), "0".into()] } else { Vec::new() }
    })
    .unwrap();

    assert_eq!(paths.len(), 3, "parallelism: 3 should spawn three sibling instances");
    for path in &paths {
        assert!(path.exists());
    }
}

/// Starting just one processor within a multi-step workflow only spawns
/// that processor's instances, leaving the rest of the flow untouched.
#[test]
fn starting_a_single_processor_does_not_spawn_its_workflow_siblings() {
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
    let (graph, _warnings) = parse(yaml, Path::new("workflow.yml")).unwrap();
    let pid_dir = tempfile::tempdir().unwrap();
    let program = if cfg!(windows) { "cmd" } else { "true" };
    let args_for = |_: &tw_core::WiringStep, _: u32| if cfg!(windows) { vec!["/C".into(), "exit".into(), "0".into()] } else { Vec::new() };

    let paths = start_processor(&graph, "ingest", "parser", pid_dir.path(), Path::new(program), args_for).unwrap();
    assert_eq!(paths.len(), 1);
}

/// An unrecognized `--workflow-id` must surface as the dedicated exit code
/// an operator's process supervisor can key off of, not a generic failure.
#[test]
fn starting_an_unknown_workflow_id_maps_to_the_reserved_exit_code() {
    let yaml = "ingest:\n  flow:\n    - processor: collector\n      to_ex: raw\n";
    let (graph, _warnings) = parse(yaml, Path::new("workflow.yml")).unwrap();
    let pid_dir = tempfile::tempdir().unwrap();

    let err = start(&graph, "no-such-workflow", pid_dir.path(), Path::new("true"), |_, _| Vec::new()).unwrap_err();

    assert!(matches!(err, OrchestratorError::UnknownWorkflow(ref name) if name == "no-such-workflow"));
    assert_eq!(err.exit_code(), 254);
}

/// A message that fails structural schema validation is rejected before it
/// ever reaches a processor's `on_message` hook.
#[test]
fn structurally_invalid_envelope_is_rejected_by_schema() {
    let schema_doc = serde_json::json!({
        "type": "object",
        "required": ["format", "version", "type", "meta", "payload"],
        "properties": {
            "payload": {
                "type": "object",
                "required": ["raw"],
            }
        }
    });
    let schema = tw_wire::Schema::compile(&schema_doc).unwrap();

    let missing_raw = Envelope::new("raw", 1, "raw", serde_json::json!({}));
    assert!(!schema.validate(&missing_raw), "an envelope without the required payload field must fail validation");

    let valid = Envelope::new("raw", 1, "raw", serde_json::json!({"raw": "aGVsbG8="}));
    assert!(schema.validate(&valid));
}

/// Bytes that are not even well-formed envelope JSON are rejected at decode
/// time, before schema or processor validation is ever consulted.
#[test]
fn malformed_wire_bytes_never_reach_envelope_decoding() {
    let err = tw_wire::parse(b"{not json at all").unwrap_err();
    assert!(matches!(err, tw_wire::WireError::Decode(_)));
}

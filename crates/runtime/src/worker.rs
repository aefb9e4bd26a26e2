// SPDX-License-Identifier: MIT

use crate::error::RuntimeError;
use crate::state::ProcessorState;
use parking_lot::Mutex as SyncMutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex as AsyncMutex, Notify};
use tracing::{debug, info, warn};
use tw_broker::{BrokerConnection, Consumer, Producer, PublishOutcome};
use tw_cache::DedupCache;
use tw_core::{Envelope, ProcessorDescriptor, WiringStep};
use tw_registry::Processor;
use tw_wire::Schema;

fn logging_config_from(merged: &tw_config::ConfigMap) -> Result<tw_config::LoggingConfig, RuntimeError> {
    let section = merged.get("logging").cloned().unwrap_or_else(|| serde_json::json!({}));
    serde_json::from_value(section).map_err(|err| RuntimeError::Reload(err.to_string()))
}

/// What happened to one delivery after it ran through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Decoded, deduped, handled, and (if there was a sink) published and acked.
    Forwarded,
    /// The processor's `on_message` dropped the message; acked without publish.
    Dropped,
    /// `meta.uuid` had already been seen; acked without calling the processor.
    Deduped,
    /// Malformed body, schema mismatch, or processor-level rejection;
    /// rejected without requeue.
    Rejected,
    /// Published but the broker reported it unroutable; rejected with
    /// requeue so it is retried.
    Unroutable,
}

/// One running instance of a processor, wired to at most one input queue
/// and at most one output exchange per its [`WiringStep`].
pub struct Worker {
    step: WiringStep,
    descriptor: ProcessorDescriptor,
    processor: Arc<dyn Processor>,
    cache: Arc<dyn DedupCache>,
    ttl: Duration,
    schema: Option<Arc<Schema>>,
    config_store: tw_config::ConfigStore,
    state: SyncMutex<ProcessorState>,
    consumer: AsyncMutex<Option<Consumer>>,
    producer: AsyncMutex<Option<Producer>>,
    paused: AtomicBool,
    resume: Notify,
}

impl Worker {
    pub fn new(
        step: WiringStep,
        descriptor: ProcessorDescriptor,
        processor: Arc<dyn Processor>,
        cache: Arc<dyn DedupCache>,
        ttl: Duration,
        schema: Option<Arc<Schema>>,
        config_store: tw_config::ConfigStore,
    ) -> Self {
        Self {
            step,
            descriptor,
            processor,
            cache,
            ttl,
            schema,
            config_store,
            state: SyncMutex::new(ProcessorState::Created),
            consumer: AsyncMutex::new(None),
            producer: AsyncMutex::new(None),
            paused: AtomicBool::new(false),
            resume: Notify::new(),
        }
    }

    pub fn state(&self) -> ProcessorState {
        *self.state.lock()
    }

    fn transition(&self, next: ProcessorState) -> Result<(), RuntimeError> {
        let mut state = self.state.lock();
        if !state.can_transition_to(next) {
            return Err(RuntimeError::IllegalTransition { from: *state, to: next });
        }
        *state = next;
        Ok(())
    }

    /// Mark configuration as loaded for this worker. The descriptor and
    /// parameters are already final by the time a `Worker` is built, so
    /// this only advances the lifecycle marker callers observe.
    pub fn mark_config_loaded(&self) -> Result<(), RuntimeError> {
        self.transition(ProcessorState::ConfigLoaded)
    }

    /// Declare the output exchange/queue and the input queue named by this
    /// worker's wiring step, enforcing the collector/output policy first.
    pub async fn wire(&self, conn: &BrokerConnection, consumer_tag: &str) -> Result<(), RuntimeError> {
        self.descriptor
            .check_wiring(self.step.from_q.as_deref(), self.step.to_ex.as_deref())
            .map_err(|reason| RuntimeError::InvalidWiring { processor: self.descriptor.name.to_string(), reason })?;

        if let Some(to_ex) = self.step.to_ex.as_deref() {
            let producer = Producer::start(conn, to_ex, self.step.to_q.as_deref()).await?;
            *self.producer.lock().await = Some(producer);
        }
        if let Some(from_q) = self.step.from_q.as_deref() {
            let consumer = Consumer::start(conn, from_q, consumer_tag).await?;
            *self.consumer.lock().await = Some(consumer);
        }

        self.transition(ProcessorState::Wired)
    }

    pub fn pause(&self) -> Result<(), RuntimeError> {
        self.transition(ProcessorState::Paused)?;
        self.paused.store(true, Ordering::SeqCst);
        Ok(())
    }

    pub fn resume(&self) -> Result<(), RuntimeError> {
        self.transition(ProcessorState::Running)?;
        self.paused.store(false, Ordering::SeqCst);
        self.resume.notify_waiters();
        Ok(())
    }

    /// Re-read this processor's merged config and re-derive the logger from
    /// its `logging` section. Safe to call while `Running` or `Paused`;
    /// anything else is rejected since there is no config-driven wiring to
    /// refresh yet (or there is nothing left to refresh once stopping).
    pub fn reload(&self) -> Result<(), RuntimeError> {
        let state = self.state();
        if !matches!(state, ProcessorState::Running | ProcessorState::Paused) {
            return Err(RuntimeError::NotReloadable { state });
        }
        let merged = self.config_store.merged_for(self.descriptor.name.as_str())?;
        let logging_config = logging_config_from(&merged)?;
        crate::logging::setup(&logging_config)?;
        info!(target: "yellowsub.worker", processor = %self.descriptor.name, "reloaded config and re-derived logger");
        Ok(())
    }

    pub fn begin_stop(&self) -> Result<(), RuntimeError> {
        self.transition(ProcessorState::Stopping)?;
        self.paused.store(false, Ordering::SeqCst);
        self.resume.notify_waiters();
        Ok(())
    }

    /// Close the broker connection's consumer/producer resources and mark
    /// this worker terminated. Idempotent with respect to lifecycle state:
    /// callers should have called [`Worker::begin_stop`] first.
    pub async fn finish_stop(&self, conn: &BrokerConnection) -> Result<(), RuntimeError> {
        conn.stop().await;
        self.transition(ProcessorState::Terminated)
    }

    /// Run the consume loop until the consumer closes or `begin_stop` is
    /// called. Each delivery goes through [`Worker::run_once`]; processing
    /// errors are logged and do not stop the loop — only the stream ending
    /// or an explicit stop does.
    pub async fn run(&self) -> Result<(), RuntimeError> {
        self.transition(ProcessorState::Running)?;
        loop {
            if self.paused.load(Ordering::SeqCst) {
                self.resume.notified().await;
            }
            if matches!(self.state(), ProcessorState::Stopping | ProcessorState::Terminated) {
                return Ok(());
            }
            match self.run_once().await {
                Ok(None) => return Ok(()),
                Ok(Some(outcome)) => {
                    debug!(target: "yellowsub.worker", processor = %self.descriptor.name, ?outcome, "processed delivery");
                }
                Err(err) => {
                    warn!(target: "yellowsub.worker", processor = %self.descriptor.name, %err, "error processing delivery");
                }
            }
        }
    }

    /// Pull and process exactly one delivery. `Ok(None)` means the
    /// consumer's stream ended (the queue is gone or the channel closed).
    pub async fn run_once(&self) -> Result<Option<PipelineOutcome>, RuntimeError> {
        let mut consumer_guard = self.consumer.lock().await;
        let Some(consumer) = consumer_guard.as_mut() else {
            return Ok(None);
        };
        let Some(delivery) = consumer.next().await else {
            return Ok(None);
        };
        let delivery = delivery?;
        drop(consumer_guard);

        let envelope = match tw_wire::parse(&delivery.data) {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(target: "yellowsub.worker", processor = %self.descriptor.name, %err, "dropping malformed message");
                delivery.reject(false).await?;
                return Ok(Some(PipelineOutcome::Rejected));
            }
        };

        if self.descriptor.validate_msg {
            let structurally_valid = self.schema.as_ref().map(|s| s.validate(&envelope)).unwrap_or(true);
            if !structurally_valid || !tw_wire::validate_semantic(&envelope) {
                warn!(target: "yellowsub.worker", processor = %self.descriptor.name, uuid = %envelope.uuid(), "schema validation failed");
                delivery.reject(false).await?;
                return Ok(Some(PipelineOutcome::Rejected));
            }
        }

        if !self.processor.validate(&delivery.data).await {
            delivery.reject(false).await?;
            return Ok(Some(PipelineOutcome::Rejected));
        }

        let Some(envelope) = self.cache.dedup(envelope, self.ttl).await? else {
            delivery.ack().await?;
            return Ok(Some(PipelineOutcome::Deduped));
        };

        let Some(out_envelope) = self.processor.on_message(envelope).await else {
            delivery.ack().await?;
            return Ok(Some(PipelineOutcome::Dropped));
        };

        let producer_guard = self.producer.lock().await;
        match producer_guard.as_ref() {
            Some(producer) => match producer.publish(&out_envelope, "").await? {
                PublishOutcome::Confirmed => {
                    delivery.ack().await?;
                    info!(target: "yellowsub.worker", processor = %self.descriptor.name, uuid = %out_envelope.uuid(), "forwarded");
                    Ok(Some(PipelineOutcome::Forwarded))
                }
                PublishOutcome::Unroutable => {
                    delivery.reject(true).await?;
                    Ok(Some(PipelineOutcome::Unroutable))
                }
            },
            None => {
                delivery.ack().await?;
                Ok(Some(PipelineOutcome::Forwarded))
            }
        }
    }

    /// Poll `processor.collect()` on a fixed interval and publish whatever
    /// it returns. Used instead of [`Worker::run`] for collector-group
    /// processors, which have no input queue to consume from.
    pub async fn run_collector(&self, poll_interval: Duration) -> Result<(), RuntimeError> {
        self.transition(ProcessorState::Running)?;
        loop {
            if self.paused.load(Ordering::SeqCst) {
                self.resume.notified().await;
            }
            if matches!(self.state(), ProcessorState::Stopping | ProcessorState::Terminated) {
                return Ok(());
            }
            for envelope in self.processor.collect().await {
                if let Err(err) = self.publish_collected(envelope).await {
                    warn!(target: "yellowsub.worker", processor = %self.descriptor.name, %err, "failed to publish collected message");
                }
            }
            tokio::time::sleep(poll_interval).await;
        }
    }

    async fn publish_collected(&self, envelope: Envelope) -> Result<(), RuntimeError> {
        let Some(envelope) = self.cache.dedup(envelope, self.ttl).await? else {
            return Ok(());
        };
        let producer_guard = self.producer.lock().await;
        if let Some(producer) = producer_guard.as_ref() {
            match producer.publish(&envelope, "").await? {
                PublishOutcome::Confirmed => {
                    info!(target: "yellowsub.worker", processor = %self.descriptor.name, uuid = %envelope.uuid(), "collected and published");
                }
                PublishOutcome::Unroutable => {
                    warn!(target: "yellowsub.worker", processor = %self.descriptor.name, uuid = %envelope.uuid(), "collected message was unroutable");
                }
            }
        }
        Ok(())
    }
}

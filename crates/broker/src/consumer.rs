// SPDX-License-Identifier: MIT

use crate::connection::BrokerConnection;
use crate::error::BrokerError;
use futures_util::StreamExt;
use lapin::acker::Acker;
use lapin::options::{BasicAckOptions, BasicConsumeOptions, BasicRejectOptions};
use lapin::types::FieldTable;

/// One delivered message, not yet acked or rejected.
pub struct Delivery {
    pub tag: u64,
    pub data: Vec<u8>,
    acker: Acker,
}

impl Delivery {
    pub async fn ack(&self) -> Result<(), BrokerError> {
        self.acker.ack(BasicAckOptions::default()).await.map_err(BrokerError::Ack)
    }

    /// Reject without requeue (poison-pill policy) or with requeue
    /// (transient downstream publish failure).
    pub async fn reject(&self, requeue: bool) -> Result<(), BrokerError> {
        self.acker.reject(BasicRejectOptions { requeue }).await.map_err(BrokerError::Ack)
    }
}

/// A consumer bound to one input queue, `auto_ack=false`.
pub struct Consumer {
    inner: lapin::Consumer,
}

impl Consumer {
    /// Declare `queue` (durable, prefetch 1) and begin consuming.
    pub async fn start(conn: &BrokerConnection, queue: &str, consumer_tag: &str) -> Result<Self, BrokerError> {
        conn.create_queue(queue).await?;
        let inner = conn
            .channel()
            .basic_consume(queue, consumer_tag, BasicConsumeOptions::default(), FieldTable::default())
            .await
            .map_err(BrokerError::Consume)?;
        Ok(Self { inner })
    }

    /// Await the next delivery. Returns `None` once the consumer is
    /// cancelled (e.g. by `stop()`).
    pub async fn next(&mut self) -> Option<Result<Delivery, BrokerError>> {
        let item = self.inner.next().await?;
        match item {
            Ok(delivery) => Some(Ok(Delivery {
                tag: delivery.delivery_tag,
                data: delivery.data.clone(),
                acker: delivery.acker,
            })),
            Err(err) => Some(Err(BrokerError::Consume(err))),
        }
    }
}

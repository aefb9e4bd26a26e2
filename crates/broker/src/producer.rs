// SPDX-License-Identifier: MIT

use crate::connection::BrokerConnection;
use crate::error::BrokerError;
use lapin::options::BasicPublishOptions;
use lapin::publisher_confirm::Confirmation;
use lapin::{BasicProperties, Channel};
use tracing::{info, warn};
use tw_core::Envelope;

/// Outcome of a single publish attempt, distinguishing a broker-confirmed
/// delivery from a `mandatory` publish the broker could not route anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Confirmed,
    Unroutable,
}

/// A producer bound to one output exchange.
pub struct Producer {
    channel: Channel,
    exchange: String,
}

impl Producer {
    /// Declare the output exchange (and the named downstream queue, if the
    /// workflow supplied one) and bind it, in that order.
    pub async fn start(conn: &BrokerConnection, to_ex: &str, to_q: Option<&str>) -> Result<Self, BrokerError> {
        conn.create_exchange(to_ex).await?;
        if let Some(queue) = to_q {
            conn.create_queue(queue).await?;
            conn.bind(queue, to_ex).await?;
        }
        Ok(Self { channel: conn.channel().clone(), exchange: to_ex.to_string() })
    }

    /// Serialise and publish with `delivery_mode=persistent`,
    /// `mandatory=true`. On an unroutable return, the caller must not ack
    /// the upstream delivery.
    pub async fn publish(&self, envelope: &Envelope, routing_key: &str) -> Result<PublishOutcome, BrokerError> {
        let body = tw_wire::serialize(envelope)?;
        let confirm = self
            .channel
            .basic_publish(
                &self.exchange,
                routing_key,
                BasicPublishOptions { mandatory: true, immediate: false },
                &body,
                BasicProperties::default().with_delivery_mode(2),
            )
            .await
            .map_err(BrokerError::Publish)?;

        match confirm.await.map_err(BrokerError::Publish)? {
            Confirmation::Ack(None) => {
                info!(uuid = %envelope.uuid(), "published and confirmed");
                Ok(PublishOutcome::Confirmed)
            }
            Confirmation::Ack(Some(_)) => {
                // A `Some` reply on ack carries the broker's `basic.return` for an
                // unroutable-but-acked mandatory publish.
                warn!(uuid = %envelope.uuid(), "publish unroutable");
                Ok(PublishOutcome::Unroutable)
            }
            Confirmation::Nack(_) => {
                warn!(uuid = %envelope.uuid(), "publish nacked by broker");
                Ok(PublishOutcome::Unroutable)
            }
            Confirmation::NotRequested => Ok(PublishOutcome::Confirmed),
        }
    }

    pub fn exchange(&self) -> &str {
        &self.exchange
    }
}

#[cfg(test)]
mod tests {
    // Exercising `Producer::publish` end to end requires a live broker and
    // is out of reach for a unit test; the lifecycle and dedup logic built
    // on top of it are tested without a broker in tw-runtime and tw-cache.
}

// SPDX-License-Identifier: MIT

//! Durable connect, exchange/queue declare, publish-with-confirm and
//! consume-with-ack over AMQP-0.9.1.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

mod connection;
mod consumer;
mod error;
mod producer;

pub use connection::{BrokerConnection, ConnectOptions};
pub use consumer::{Consumer, Delivery};
pub use error::BrokerError;
pub use producer::{Producer, PublishOutcome};

/// Fixed prefetch per consumer: keeps a slow consumer from starving peers
/// and preserves round-robin fairness within a queue.
pub const PREFETCH_COUNT: u16 = 1;

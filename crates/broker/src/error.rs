// SPDX-License-Identifier: MIT

#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    #[error("could not connect to the broker at {host}:{port}: {source}")]
    Connect { host: String, port: u16, #[source] source: lapin::Error },

    #[error("could not declare exchange '{name}': {source}")]
    DeclareExchange { name: String, #[source] source: lapin::Error },

    #[error("could not declare queue '{name}': {source}")]
    DeclareQueue { name: String, #[source] source: lapin::Error },

    #[error("could not bind queue '{queue}' to exchange '{exchange}': {source}")]
    Bind { queue: String, exchange: String, #[source] source: lapin::Error },

    #[error("could not unbind queue '{queue}' from exchange '{exchange}': {source}")]
    Unbind { queue: String, exchange: String, #[source] source: lapin::Error },

    #[error("publish failed: {0}")]
    Publish(#[source] lapin::Error),

    #[error("could not serialise envelope for publish: {0}")]
    Serialize(#[from] tw_wire::WireError),

    #[error("consume setup failed: {0}")]
    Consume(#[source] lapin::Error),

    #[error("ack/reject failed: {0}")]
    Ack(#[source] lapin::Error),

    #[error("message was published but the broker reported it as unroutable")]
    Unroutable,
}

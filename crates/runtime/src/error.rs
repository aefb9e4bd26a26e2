// SPDX-License-Identifier: MIT

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("invalid wiring for processor '{processor}': {reason}")]
    InvalidWiring { processor: String, reason: String },

    #[error("illegal lifecycle transition from {from:?} to {to:?}")]
    IllegalTransition { from: crate::state::ProcessorState, to: crate::state::ProcessorState },

    #[error(transparent)]
    Broker(#[from] tw_broker::BrokerError),

    #[error(transparent)]
    Cache(#[from] tw_cache::CacheError),

    #[error(transparent)]
    Config(#[from] tw_config::ConfigError),

    #[error("could not reload processor config: {0}")]
    Reload(String),

    #[error("cannot reload processor in state {state:?}; reload is only legal while Running or Paused")]
    NotReloadable { state: crate::state::ProcessorState },

    #[error("could not initialise logging: {0}")]
    Logging(String),
}

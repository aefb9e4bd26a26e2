// SPDX-License-Identifier: MIT

//! Processor lifecycle, the decode/validate/dedup/handle/publish/ack
//! pipeline, and the logging façade shared by every worker process.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

mod error;
pub mod logging;
mod state;
mod worker;

pub use error::RuntimeError;
pub use state::ProcessorState;
pub use worker::{PipelineOutcome, Worker};

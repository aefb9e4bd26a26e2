// SPDX-License-Identifier: MIT

//! tw-core: shared domain types for the threadworks processing pipeline.
//!
//! Every other crate in the workspace depends on this one for the message
//! envelope, processor/workflow identifiers, and the `Clock` abstraction used
//! to keep time-dependent code (TTLs, PID file timestamps) testable.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod clock;
pub mod descriptor;
pub mod envelope;
pub mod ids;
pub mod step;

pub use clock::{Clock, FakeClock, SystemClock};
pub use descriptor::{ProcessorDescriptor, ProcessorGroup};
pub use envelope::{Envelope, Meta, Relation};
pub use ids::{ProcessorName, WorkflowName};
pub use step::WiringStep;

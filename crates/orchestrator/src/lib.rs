// SPDX-License-Identifier: MIT

//! Spawns, tracks, and stops the worker processes that implement each
//! workflow's wiring steps, via pid files under a shared directory.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

mod error;
mod pidfile;
mod supervisor;

pub use error::{OrchestratorError, UNKNOWN_WORKFLOW_EXIT_CODE};
pub use pidfile::{list_tracked, parse_pid_file, PidFile, TrackedProcess};
pub use supervisor::{list, start, start_processor, stop, stop_processor};

// SPDX-License-Identifier: MIT

//! Reference processor implementations: a file collector, a hash-list
//! parser, a pass-through enricher, and a file output. Wired together these
//! cover the hash-list-to-files demonstration flow end to end.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

mod error;
mod file_collector;
mod file_output;
mod hash_list_parser;
mod null_enricher;
mod params;

pub use error::DemoProcessorError;
pub use file_collector::FileCollector;
pub use file_output::FileOutput;
pub use hash_list_parser::HashListParser;
pub use null_enricher::NullEnricher;

use std::sync::Arc;
use tw_registry::{Processor, Registry, RegistryError};

/// Register all four reference processors under the module names a
/// `workflow.yml` / processor config would name them by.
pub fn register_all(registry: &Registry) -> Result<(), RegistryError> {
    registry.register("filecollector", |descriptor| {
        FileCollector::new(descriptor)
            .map(|p| Arc::new(p) as Arc<dyn Processor>)
            .map_err(|err| RegistryError::Build { name: descriptor.name.to_string(), module: descriptor.module.clone(), reason: err.to_string() })
    })?;
    registry.register("hashlistparser", |_| Ok(Arc::new(HashListParser::new()) as Arc<dyn Processor>))?;
    registry.register("nullenricher", |_| Ok(Arc::new(NullEnricher::new()) as Arc<dyn Processor>))?;
    registry.register("fileoutput", |descriptor| {
        FileOutput::new(descriptor)
            .map(|p| Arc::new(p) as Arc<dyn Processor>)
            .map_err(|err| RegistryError::Build { name: descriptor.name.to_string(), module: descriptor.module.clone(), reason: err.to_string() })
    })?;
    Ok(())
}

// SPDX-License-Identifier: MIT

use crate::error::RegistryError;
use crate::processor::Processor;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use tw_core::ProcessorDescriptor;

type Factory = Arc<dyn Fn(&ProcessorDescriptor) -> Result<Arc<dyn Processor>, RegistryError> + Send + Sync>;

/// Maps a processor's `module` identifier to the factory that builds it.
///
/// Lookup is case-insensitive: a module registered as `HashParser` resolves
/// a descriptor naming `hashparser` or `HASHPARSER` equally. Registration
/// order does not matter and each module may be registered only once.
#[derive(Clone, Default)]
pub struct Registry {
    factories: Arc<Mutex<HashMap<String, Factory>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self { factories: Arc::new(Mutex::new(HashMap::new())) }
    }

    /// Register a constructor under `module`. `module` is stored
    /// case-folded; registering the same name twice (in any casing) is an
    /// error rather than a silent overwrite.
    pub fn register<F>(&self, module: &str, factory: F) -> Result<(), RegistryError>
    where
        F: Fn(&ProcessorDescriptor) -> Result<Arc<dyn Processor>, RegistryError> + Send + Sync + 'static,
    {
        let key = module.to_ascii_lowercase();
        let mut factories = self.factories.lock();
        if factories.contains_key(&key) {
            return Err(RegistryError::DuplicateModule(module.to_string()));
        }
        factories.insert(key, Arc::new(factory));
        Ok(())
    }

    /// Instantiate the processor named by `descriptor.module`, passing the
    /// descriptor through so the factory can read `parameters`.
    pub fn build(&self, descriptor: &ProcessorDescriptor) -> Result<Arc<dyn Processor>, RegistryError> {
        let key = descriptor.module.to_ascii_lowercase();
        let factory = {
            let factories = self.factories.lock();
            factories.get(&key).cloned().ok_or_else(|| RegistryError::Unknown(descriptor.module.clone()))?
        };
        debug!(module = %descriptor.module, name = %descriptor.name, "instantiating processor");
        factory(descriptor)
    }

    pub fn is_registered(&self, module: &str) -> bool {
        self.factories.lock().contains_key(&module.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.factories.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

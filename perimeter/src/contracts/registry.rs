//! In-memory registry mapping contract names to declarations.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use super::Contract;
use crate::config::{DuplicatePolicy, ValidationConfig};
use crate::errors::RegistryError;

/// Registry of contracts, keyed by name.
///
/// Registration is expected to finish before concurrent validation starts;
/// reads take a shared lock and hand out `Arc`s, so validation never holds it.
#[derive(Debug, Default)]
pub struct ContractRegistry {
    entries: RwLock<HashMap<String, Arc<Contract>>>,
    config: ValidationConfig,
}

impl ContractRegistry {
    /// Creates a new empty registry with the default config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty registry with the given config.
    #[must_use]
    pub fn with_config(config: ValidationConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Registry configuration.
    #[must_use]
    pub const fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Registers a contract under its name.
    ///
    /// With [`DuplicatePolicy::Reject`], registering an identical contract again
    /// returns the existing entry and a different one is an error. With
    /// [`DuplicatePolicy::Replace`], the new contract wins.
    pub fn register(&self, contract: Contract) -> Result<Arc<Contract>, RegistryError> {
        let name = contract.name().to_string();
        let mut entries = self.entries.write();

        if let Some(existing) = entries.get(&name) {
            match self.config.duplicates {
                DuplicatePolicy::Reject => {
                    if **existing == contract {
                        return Ok(Arc::clone(existing));
                    }
                    return Err(RegistryError::DuplicateContract { name });
                }
                DuplicatePolicy::Replace => {
                    warn!(contract = %name, "Replacing previously registered contract");
                }
            }
        }

        let contract = Arc::new(contract);
        entries.insert(name, Arc::clone(&contract));
        Ok(contract)
    }

    /// Registers several contracts, stopping at the first rejection.
    pub fn register_all(
        &self,
        contracts: impl IntoIterator<Item = Contract>,
    ) -> Result<(), RegistryError> {
        for contract in contracts {
            self.register(contract)?;
        }
        Ok(())
    }

    /// Fetch a contract by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<Contract>> {
        self.entries.read().get(name).cloned()
    }

    /// True if a contract with this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.entries.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Remove all registered entries (primarily for tests).
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Returns the number of registered contracts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

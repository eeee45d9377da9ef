//! The persona registry
//!
//! [`PersonaRegistry`] is the owned object handed to the syscall layer. It
//! wraps the record store; lookups and enumeration live in `lookup.rs`.

use persona_api::{PersonaId, RegistryConfig, Result};

use crate::handle::CreationRef;
use crate::record::PersonaTemplate;
use crate::store::RecordStore;

/// Reference-counted registry of persona records
pub struct PersonaRegistry {
    pub(crate) store: RecordStore,
}

impl PersonaRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            store: RecordStore::new(config),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        self.store.config()
    }

    /// Create a persona; see [`RecordStore::allocate`]
    pub fn allocate(
        &self,
        requested: Option<PersonaId>,
        template: PersonaTemplate,
    ) -> Result<CreationRef<'_>> {
        self.store.allocate(requested, template)
    }

    /// Records in the store, including invalidated ones still draining
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Whether a record for `id` still occupies the store
    pub fn contains(&self, id: PersonaId) -> bool {
        self.store.contains(id)
    }
}

impl Default for PersonaRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

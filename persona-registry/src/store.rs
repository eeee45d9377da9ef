//! Persona record store
//!
//! The store owns the id → record map. One reader/writer lock guards the map
//! and the id cursor: lookups take it shared and acquire their count while
//! holding it, while publication, invalidation and removal take it exclusive.

use alloc::sync::Arc;

use hashbrown::HashMap;

use persona_api::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use persona_api::{
    pna_debug, pna_warn, PersonaError, PersonaId, RegistryConfig, Result, PERSONA_ID_NONE,
    PERSONA_ID_RESERVED,
};

use crate::handle::{CreationRef, PersonaRef};
use crate::record::{Persona, PersonaTemplate};

/// State guarded by the store lock
pub(crate) struct StoreState {
    pub(crate) personas: HashMap<PersonaId, Arc<Persona>>,
    next_id: PersonaId,
}

/// Authoritative mapping from persona id to record
pub struct RecordStore {
    state: RwLock<StoreState>,
    config: RegistryConfig,
}

impl RecordStore {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            state: RwLock::new(StoreState {
                personas: HashMap::new(),
                next_id: config.first_id,
            }),
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Publish a new persona and return its creation reference
    ///
    /// `requested` of `None` or `PERSONA_ID_NONE` assigns the next free id.
    pub fn allocate(
        &self,
        requested: Option<PersonaId>,
        template: PersonaTemplate,
    ) -> Result<CreationRef<'_>> {
        let mut state = self.state.write();

        if state.personas.len() >= self.config.max_personas {
            return Err(PersonaError::NoSpace);
        }

        if let Some(login) = template.login.as_deref() {
            let taken = state
                .personas
                .values()
                .any(|persona| persona.is_valid() && persona.matches_login(login));
            if taken {
                return Err(PersonaError::AlreadyExists);
            }
        }

        let id = match requested {
            None | Some(PERSONA_ID_NONE) => self.assign_id(&mut state)?,
            Some(PERSONA_ID_RESERVED) => return Err(PersonaError::AlreadyExists),
            Some(id) if state.personas.contains_key(&id) => {
                return Err(PersonaError::AlreadyExists);
            }
            Some(id) => id,
        };

        let record = Arc::new(Persona::from_template(id, template));
        state.personas.insert(id, Arc::clone(&record));
        drop(state);

        pna_debug!(
            "persona {}: allocated (login {:?}, kind {})",
            id,
            record.login(),
            record.kind()
        );
        Ok(CreationRef::new(PersonaRef::adopt(self, record)))
    }

    /// Pick the next free id, sweeping at most once around the id space
    fn assign_id(&self, state: &mut StoreState) -> Result<PersonaId> {
        let attempts = self
            .config
            .id_space()
            .min(state.personas.len() as u64 + 1);
        let mut candidate = state.next_id;

        for _ in 0..attempts {
            if candidate < self.config.first_id || candidate > self.config.last_id {
                candidate = self.config.first_id;
            }
            let next = self.advance(candidate);
            if candidate != PERSONA_ID_RESERVED && !state.personas.contains_key(&candidate) {
                state.next_id = next;
                return Ok(candidate);
            }
            candidate = next;
        }

        Err(PersonaError::NoSpace)
    }

    fn advance(&self, id: PersonaId) -> PersonaId {
        id.checked_add(self.config.id_step)
            .filter(|next| *next <= self.config.last_id)
            .unwrap_or(self.config.first_id)
    }

    /// Drop one count; the last count of an invalidated record removes it
    pub(crate) fn release(&self, record: &Arc<Persona>) {
        if record.release() != 0 {
            return;
        }

        let mut state = self.state.write();
        // A lookup may have taken a new count before the lock was ours.
        if record.refcount() != 0 {
            return;
        }
        if record.invalidate() {
            pna_warn!("persona {}: last reference dropped while still valid", record.id());
        }
        if Self::remove_locked(&mut state, record) {
            pna_debug!("persona {}: freed", record.id());
        }
    }

    /// Remove `record` from the map if it is still the entry for its id
    ///
    /// Idempotent: a record that is already gone, or whose id now belongs to
    /// a newer record, is left alone.
    fn remove_locked(state: &mut StoreState, record: &Arc<Persona>) -> bool {
        match state.personas.get(&record.id()) {
            Some(entry) if Arc::ptr_eq(entry, record) => {
                state.personas.remove(&record.id());
                true
            }
            _ => false,
        }
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read()
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write()
    }

    /// Number of records in the map, draining ones included
    pub fn len(&self) -> usize {
        self.state.read().personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a record for `id` is still in the map, valid or not
    pub fn contains(&self, id: PersonaId) -> bool {
        self.state.read().personas.contains_key(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use persona_api::{login_from_str, PersonaType};

    fn template(login: &str) -> PersonaTemplate {
        PersonaTemplate::new(Some(login_from_str(login).unwrap()), PersonaType::Managed)
    }

    #[test]
    fn test_auto_assign_starts_at_first_id() {
        let store = RecordStore::new(RegistryConfig::default());
        let a = store.allocate(None, template("a")).unwrap();
        let b = store.allocate(Some(PERSONA_ID_NONE), template("b")).unwrap();
        assert_eq!(a.id(), 501);
        assert_eq!(b.id(), 502);
        a.persist();
        b.persist();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_auto_assign_skips_taken_ids() {
        let store = RecordStore::new(RegistryConfig::default().with_id_step(10));
        store.allocate(Some(511), template("explicit")).unwrap().persist();
        let a = store.allocate(None, template("a")).unwrap().persist();
        let b = store.allocate(None, template("b")).unwrap().persist();
        assert_eq!(a, 501);
        assert_eq!(b, 521);
    }

    #[test]
    fn test_auto_assign_wraps() {
        let config = RegistryConfig::default().with_first_id(10).with_last_id(12);
        let store = RecordStore::new(config);
        let ids: alloc::vec::Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|login| store.allocate(None, template(login)).unwrap().persist())
            .collect();
        assert_eq!(ids, [10, 11, 12]);
        assert_eq!(store.allocate(None, template("d")).unwrap_err(), PersonaError::NoSpace);
    }

    #[test]
    fn test_reserved_and_duplicate_ids() {
        let store = RecordStore::new(RegistryConfig::default());
        assert_eq!(
            store.allocate(Some(PERSONA_ID_RESERVED), template("zero")).unwrap_err(),
            PersonaError::AlreadyExists
        );
        store.allocate(Some(42), template("first")).unwrap().persist();
        assert_eq!(
            store.allocate(Some(42), template("second")).unwrap_err(),
            PersonaError::AlreadyExists
        );
    }

    #[test]
    fn test_duplicate_login() {
        let store = RecordStore::new(RegistryConfig::default());
        store.allocate(None, template("svc1")).unwrap().persist();
        assert_eq!(
            store.allocate(None, template("svc1")).unwrap_err(),
            PersonaError::AlreadyExists
        );
        store
            .allocate(None, PersonaTemplate::new(None, PersonaType::Guest))
            .unwrap()
            .persist();
    }

    #[test]
    fn test_capacity() {
        let store = RecordStore::new(RegistryConfig::default().with_max_personas(1));
        store.allocate(None, template("a")).unwrap().persist();
        assert_eq!(store.allocate(None, template("b")).unwrap_err(), PersonaError::NoSpace);
    }

    #[test]
    fn test_dropped_creation_reference_frees_record() {
        let store = RecordStore::new(RegistryConfig::default());
        let handle = store.allocate(Some(42), template("a")).unwrap();
        let record = Arc::clone(handle.record());
        drop(handle);
        assert!(!store.contains(42));
        assert!(!record.is_valid());
        assert!(!RecordStore::remove_locked(&mut store.write(), &record));
    }
}

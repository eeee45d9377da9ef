//! Lookup and enumeration
//!
//! All lookups go through the store lock and only ever hand out valid
//! records. Invalidation takes the lock exclusively, so once it returns no
//! later lookup can observe the record.

use alloc::sync::Arc;
use alloc::vec::Vec;

use persona_api::{
    pna_debug, Caller, PersonaError, PersonaId, Pid, ProcessTable, Result, PERSONA_ID_NONE,
    PERSONA_ID_RESERVED,
};

use crate::handle::PersonaRef;
use crate::record::Persona;
use crate::registry::PersonaRegistry;

/// Outcome of [`PersonaRegistry::find`]
#[derive(Debug)]
pub struct FindResult<'s> {
    /// Matches in ascending id order, at most the requested capacity
    pub personas: Vec<PersonaRef<'s>>,
    /// Total number of matches, which may exceed `personas.len()`
    pub matches: usize,
}

impl FindResult<'_> {
    pub fn ids(&self) -> Vec<PersonaId> {
        self.personas.iter().map(|persona| persona.id()).collect()
    }

    pub fn is_truncated(&self) -> bool {
        self.matches > self.personas.len()
    }
}

impl PersonaRegistry {
    /// Acquire a valid persona by id
    pub fn lookup(&self, id: PersonaId) -> Result<PersonaRef<'_>> {
        let state = self.store.read();
        let record = state.personas.get(&id).ok_or(PersonaError::NotFound)?;
        if !record.is_valid() {
            return Err(PersonaError::NotFound);
        }
        record.acquire();
        Ok(PersonaRef::adopt(&self.store, Arc::clone(record)))
    }

    /// Acquire a persona and invalidate it in one step
    ///
    /// Only the caller that performs the valid → invalid transition gets the
    /// record; everyone else sees `NotFound`.
    pub fn lookup_and_invalidate(&self, id: PersonaId) -> Result<PersonaRef<'_>> {
        let state = self.store.write();
        let record = state.personas.get(&id).ok_or(PersonaError::NotFound)?;
        if !record.invalidate() {
            return Err(PersonaError::NotFound);
        }
        record.acquire();
        Ok(PersonaRef::adopt(&self.store, Arc::clone(record)))
    }

    /// Invalidate a persona without taking a reference on it
    ///
    /// Invalidating an already invalid persona is a no-op. The returned
    /// record is not counted; it stays readable but is not a handle.
    pub fn invalidate(&self, id: PersonaId) -> Result<Arc<Persona>> {
        let state = self.store.write();
        let record = state.personas.get(&id).ok_or(PersonaError::NotFound)?;
        if record.invalidate() {
            pna_debug!("persona {}: invalidated", id);
        }
        Ok(Arc::clone(record))
    }

    /// Invalidate a persona and release its creation reference
    ///
    /// Only the caller that wins the invalidation succeeds; a persona that is
    /// missing or already invalid is `NotFound`. The record is freed as soon
    /// as every other holder lets go.
    pub fn deallocate(&self, id: PersonaId) -> Result<()> {
        let lookup = self.lookup_and_invalidate(id)?;
        if lookup.record().unpark() {
            drop(PersonaRef::adopt(&self.store, Arc::clone(lookup.record())));
        }
        drop(lookup);
        pna_debug!("persona {}: deallocated", id);
        Ok(())
    }

    /// Release the parked creation reference of a persona soft-deleted with
    /// [`Self::invalidate`]
    ///
    /// `NotFound` if the persona is gone, still valid, or its creation
    /// reference was already taken back.
    pub fn reclaim_invalidated(&self, id: PersonaId) -> Result<()> {
        let record = {
            let state = self.store.read();
            let record = state.personas.get(&id).ok_or(PersonaError::NotFound)?;
            if record.is_valid() || !record.unpark() {
                return Err(PersonaError::NotFound);
            }
            Arc::clone(record)
        };
        drop(PersonaRef::adopt(&self.store, record));
        pna_debug!("persona {}: reclaimed after invalidation", id);
        Ok(())
    }

    /// Enumerate valid personas matching a login and/or id filter
    ///
    /// A `None` login matches every login; a `None`, `PERSONA_ID_NONE` or `0`
    /// id matches every id. At most `cap` matches are acquired and returned,
    /// but `matches` always reports the full count.
    pub fn find(&self, login: Option<&str>, id: Option<PersonaId>, cap: usize) -> FindResult<'_> {
        let id = id.filter(|id| *id != PERSONA_ID_NONE && *id != PERSONA_ID_RESERVED);

        let state = self.store.read();
        let mut found: Vec<&Arc<Persona>> = state
            .personas
            .values()
            .filter(|persona| persona.is_valid())
            .filter(|persona| login.is_none_or(|login| persona.matches_login(login)))
            .filter(|persona| id.is_none_or(|id| persona.id() == id))
            .collect();
        found.sort_unstable_by_key(|persona| persona.id());

        let personas = found
            .iter()
            .take(cap)
            .map(|record| {
                record.acquire();
                PersonaRef::adopt(&self.store, Arc::clone(*record))
            })
            .collect();

        FindResult {
            personas,
            matches: found.len(),
        }
    }

    /// Acquire the persona a process runs under
    pub fn owner_of(&self, processes: &dyn ProcessTable, pid: Pid) -> Result<PersonaRef<'_>> {
        let id = processes.persona_of(pid).ok_or(PersonaError::NotFound)?;
        self.lookup(id)
    }

    /// Acquire the persona of the calling context
    pub fn current(&self, processes: &dyn ProcessTable, caller: &dyn Caller) -> Result<PersonaRef<'_>> {
        self.owner_of(processes, caller.pid())
    }
}

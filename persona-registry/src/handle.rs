//! Counted persona references
//!
//! Every operation that acquires a persona hands back a [`PersonaRef`].
//! Dropping the handle releases its count, so a reference cannot leak out of
//! an error path. Allocation returns a [`CreationRef`] instead: the one
//! handle that [`CreationRef::persist`] may park in the record so the persona
//! outlives the caller. Deallocation later takes that count back.

use alloc::sync::Arc;
use core::fmt;
use core::ops::Deref;

use persona_api::PersonaId;

use crate::record::Persona;
use crate::store::RecordStore;

/// One counted reference to a persona
pub struct PersonaRef<'s> {
    store: &'s RecordStore,
    record: Arc<Persona>,
    counted: bool,
}

impl<'s> PersonaRef<'s> {
    /// Wrap a count that has already been taken on `record`
    pub(crate) fn adopt(store: &'s RecordStore, record: Arc<Persona>) -> Self {
        Self {
            store,
            record,
            counted: true,
        }
    }

    pub fn id(&self) -> PersonaId {
        self.record.id()
    }

    pub(crate) fn record(&self) -> &Arc<Persona> {
        &self.record
    }
}

impl Deref for PersonaRef<'_> {
    type Target = Persona;

    fn deref(&self) -> &Persona {
        &self.record
    }
}

impl Clone for PersonaRef<'_> {
    fn clone(&self) -> Self {
        self.record.acquire();
        Self::adopt(self.store, Arc::clone(&self.record))
    }
}

impl Drop for PersonaRef<'_> {
    fn drop(&mut self) {
        if self.counted {
            self.store.release(&self.record);
        }
    }
}

impl fmt::Debug for PersonaRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PersonaRef").field(&*self.record).finish()
    }
}

/// The reference taken by allocation
///
/// There is exactly one per persona. Only this handle can be parked in the
/// record; dropping it without [`Self::persist`] releases it like any other.
pub struct CreationRef<'s> {
    handle: PersonaRef<'s>,
}

impl<'s> CreationRef<'s> {
    pub(crate) fn new(handle: PersonaRef<'s>) -> Self {
        Self { handle }
    }

    pub fn id(&self) -> PersonaId {
        self.handle.id()
    }

    pub(crate) fn record(&self) -> &Arc<Persona> {
        self.handle.record()
    }

    /// Keep the persona registered after this handle goes away
    ///
    /// The count moves into the record and is released by
    /// [`crate::PersonaRegistry::deallocate`]. If the persona was deallocated
    /// while this handle was still held, the count is released here instead.
    pub fn persist(self) -> PersonaId {
        let mut handle = self.handle;
        let id = handle.id();
        handle.record.park();
        if !handle.record.is_valid() && handle.record.unpark() {
            return id;
        }
        handle.counted = false;
        id
    }

    /// Invalidate the persona and release this reference
    ///
    /// Used to unwind a creation that failed after the record was published.
    pub fn discard(self) {
        if self.handle.record.invalidate() {
            persona_api::pna_debug!("persona {}: discarded", self.id());
        }
    }
}

impl Deref for CreationRef<'_> {
    type Target = Persona;

    fn deref(&self) -> &Persona {
        &self.handle
    }
}

impl fmt::Debug for CreationRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CreationRef").field(&*self.handle.record).finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::record::PersonaTemplate;
    use crate::PersonaRegistry;
    use persona_api::{login_from_str, PersonaType};

    fn template(login: &str) -> PersonaTemplate {
        PersonaTemplate::new(Some(login_from_str(login).unwrap()), PersonaType::Managed)
    }

    #[test]
    fn test_persist_parks_creation_count() {
        let registry = PersonaRegistry::default();
        let creation = registry.allocate(None, template("svc1")).unwrap();
        assert_eq!(creation.refcount(), 1);
        let id = creation.persist();

        let lookup = registry.lookup(id).unwrap();
        let copy = lookup.clone();
        assert_eq!(copy.refcount(), 3);
        drop(copy);
        drop(lookup);
        assert_eq!(registry.lookup(id).unwrap().refcount(), 2);

        registry.deallocate(id).unwrap();
        assert!(!registry.contains(id));
    }

    #[test]
    fn test_persist_after_deallocate_releases() {
        let registry = PersonaRegistry::default();
        let creation = registry.allocate(None, template("svc1")).unwrap();
        let id = creation.id();

        registry.deallocate(id).unwrap();
        assert!(registry.contains(id));
        assert_eq!(creation.persist(), id);
        assert!(!registry.contains(id));
    }

    #[test]
    fn test_discard_unwinds_creation() {
        let registry = PersonaRegistry::default();
        let creation = registry.allocate(None, template("svc1")).unwrap();
        let id = creation.id();

        creation.discard();
        assert!(!registry.contains(id));
        assert!(registry.lookup(id).is_err());
    }
}

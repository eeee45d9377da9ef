//! Persona records
//!
//! A record is built completely from a [`PersonaTemplate`] before the store
//! publishes it. After that only the reference count, the validity latch and
//! the parked creation reference change, all of them atomically.

use core::fmt;

use persona_api::sync::{AtomicBool, AtomicU32, Ordering};
use persona_api::{Gid, GroupList, Login, PersonaId, PersonaType, Uid};

/// Everything a persona is created with, apart from its id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaTemplate {
    pub login: Option<Login>,
    pub kind: PersonaType,
    pub gid: Option<Gid>,
    pub gmuid: Option<Uid>,
    pub groups: GroupList,
}

impl PersonaTemplate {
    pub fn new(login: Option<Login>, kind: PersonaType) -> Self {
        Self {
            login,
            kind,
            gid: None,
            gmuid: None,
            groups: GroupList::new(),
        }
    }

    pub fn with_gid(mut self, gid: Gid) -> Self {
        self.gid = Some(gid);
        self
    }

    /// Secondary groups and the membership uid they were resolved from
    pub fn with_groups(mut self, groups: GroupList, gmuid: Option<Uid>) -> Self {
        self.groups = groups;
        self.gmuid = gmuid;
        self
    }
}

/// A persona identity record
pub struct Persona {
    id: PersonaId,
    login: Option<Login>,
    kind: PersonaType,
    gid: Option<Gid>,
    gmuid: Option<Uid>,
    groups: GroupList,
    refcount: AtomicU32,
    valid: AtomicBool,
    /// The creation reference is held by the record itself
    parked: AtomicBool,
}

impl Persona {
    pub(crate) fn from_template(id: PersonaId, template: PersonaTemplate) -> Self {
        Self {
            id,
            login: template.login,
            kind: template.kind,
            gid: template.gid,
            gmuid: template.gmuid,
            groups: template.groups,
            refcount: AtomicU32::new(1),
            valid: AtomicBool::new(true),
            parked: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> PersonaId {
        self.id
    }

    pub fn login(&self) -> Option<&str> {
        self.login.as_deref()
    }

    pub fn kind(&self) -> PersonaType {
        self.kind
    }

    pub fn gid(&self) -> Option<Gid> {
        self.gid
    }

    pub fn gmuid(&self) -> Option<Uid> {
        self.gmuid
    }

    pub fn groups(&self) -> &[Gid] {
        &self.groups
    }

    pub fn is_valid(&self) -> bool {
        self.valid.load(Ordering::SeqCst)
    }

    /// Current number of counted references
    pub fn refcount(&self) -> u32 {
        self.refcount.load(Ordering::SeqCst)
    }

    /// Latch the record invalid; true if this call performed the transition
    pub(crate) fn invalidate(&self) -> bool {
        self.valid
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub(crate) fn acquire(&self) {
        self.refcount.fetch_add(1, Ordering::AcqRel);
    }

    /// Drop one count and return the new value
    pub(crate) fn release(&self) -> u32 {
        let prev = self.refcount.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(prev > 0, "persona {}: release with refcount 0", self.id);
        prev.wrapping_sub(1)
    }

    pub(crate) fn park(&self) {
        let was_parked = self.parked.swap(true, Ordering::SeqCst);
        debug_assert!(!was_parked, "persona {}: creation reference parked twice", self.id);
    }

    /// Take the parked creation reference; true if it was still parked
    pub(crate) fn unpark(&self) -> bool {
        self.parked.swap(false, Ordering::SeqCst)
    }

    pub(crate) fn matches_login(&self, login: &str) -> bool {
        self.login() == Some(login)
    }
}

impl fmt::Debug for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Persona")
            .field("id", &self.id)
            .field("login", &self.login())
            .field("kind", &self.kind)
            .field("gid", &self.gid)
            .field("gmuid", &self.gmuid)
            .field("groups", &self.groups())
            .field("refcount", &self.refcount())
            .field("valid", &self.is_valid())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use persona_api::{groups_from_slice, login_from_str};

    #[test]
    fn test_record_from_template() {
        let template = PersonaTemplate::new(Some(login_from_str("svc1").unwrap()), PersonaType::Managed)
            .with_gid(20)
            .with_groups(groups_from_slice(&[100, 101]), None);
        let persona = Persona::from_template(501, template);

        assert_eq!(persona.id(), 501);
        assert_eq!(persona.login(), Some("svc1"));
        assert_eq!(persona.gid(), Some(20));
        assert_eq!(persona.groups(), &[100, 101]);
        assert_eq!(persona.refcount(), 1);
        assert!(persona.is_valid());
    }

    #[test]
    fn test_invalidate_is_one_way() {
        let persona = Persona::from_template(7, PersonaTemplate::new(None, PersonaType::Guest));
        assert!(persona.invalidate());
        assert!(!persona.invalidate());
        assert!(!persona.is_valid());
    }

    #[test]
    fn test_park_once() {
        let persona = Persona::from_template(7, PersonaTemplate::new(None, PersonaType::Guest));
        assert!(!persona.unpark());
        persona.park();
        assert!(persona.unpark());
        assert!(!persona.unpark());
    }
}

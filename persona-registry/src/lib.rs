//! Persona Registry
//!
//! This crate provides the reference-counted registry of persona identity
//! records that backs the persona syscall.
//!
//! # Architecture
//!
//! - **Store**: id → record map, id assignment and publication
//! - **Record**: the persona itself, with its refcount and validity latch
//! - **Handle**: `PersonaRef`, one counted reference released on drop, and
//!   `CreationRef`, the allocation reference that can be parked in the record
//! - **Lookup**: lookup by id, by process, by caller, and filtered enumeration
//! - **Groups**: group-membership expansion through the directory service
//!
//! # Usage
//!
//! ```rust
//! use persona_api::{login_from_str, PersonaType};
//! use persona_registry::{PersonaRegistry, PersonaTemplate};
//!
//! let registry = PersonaRegistry::default();
//! let login = login_from_str("svc1").unwrap();
//! let id = registry
//!     .allocate(None, PersonaTemplate::new(Some(login), PersonaType::Managed))
//!     .unwrap()
//!     .persist();
//!
//! let persona = registry.lookup(id).unwrap();
//! assert_eq!(persona.login(), Some("svc1"));
//! drop(persona);
//!
//! registry.deallocate(id).unwrap();
//! assert!(!registry.contains(id));
//! ```

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod groups;
pub mod handle;
pub mod lookup;
pub mod record;
pub mod registry;
pub mod store;

pub use groups::{merge_groups, resolve_groups};
pub use handle::{CreationRef, PersonaRef};
pub use lookup::FindResult;
pub use record::{Persona, PersonaTemplate};
pub use registry::PersonaRegistry;
pub use store::RecordStore;

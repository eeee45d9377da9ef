//! Persona System Calls
//!
//! This crate provides the persona syscall: the versioned boundary structure
//! exchanged with user space and the demultiplexer that routes each
//! operation to the persona registry.
//!
//! # Architecture
//!
//! - **Types**: Operation codes and the syscall argument block
//! - **Marshal**: `KPersonaInfo` layout and the user copy helpers
//! - **Core**: Dispatcher, calling context and statistics
//! - **Handlers**: One handler per operation
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use persona_api::testing::{FakeCaller, FakeDirectory, FakeProcessTable, FakeUserMemory};
//! use persona_api::{PersonaType, SyscallConfig};
//! use persona_registry::PersonaRegistry;
//! use persona_syscalls::{KPersonaInfo, PersonaArgs, PersonaOp, PersonaSyscalls, SyscallContext};
//!
//! let sys = PersonaSyscalls::new(
//!     Arc::new(PersonaRegistry::default()),
//!     Arc::new(FakeProcessTable::new()),
//!     Arc::new(FakeDirectory::new()),
//!     SyscallConfig::default(),
//! );
//!
//! let memory = FakeUserMemory::new(4096);
//! let info = memory.alloc(persona_syscalls::KPERSONA_INFO_SIZE);
//! let id = memory.alloc(4);
//! let request = KPersonaInfo::new().with_kind(PersonaType::Managed.as_raw()).with_login("svc1");
//! memory.write(info, &request.to_bytes());
//!
//! let caller = FakeCaller::root(1);
//! let ctx = SyscallContext::new(&caller, &memory);
//! let args = PersonaArgs::new(PersonaOp::Alloc).with_info(info).with_id(id);
//! assert_eq!(sys.persona_syscall(&ctx, &args), 0);
//! assert!(sys.registry().contains(memory.read_u32(id)));
//! ```

#![no_std]

extern crate alloc;

pub mod core;
pub mod handlers;
pub mod marshal;
pub mod types;

// Re-export commonly used items
pub use crate::core::{DispatchStats, PersonaSyscalls, SyscallContext};
pub use crate::marshal::{KPersonaInfo, KPERSONA_INFO_SIZE, PERSONA_INFO_V1};
pub use crate::types::*;

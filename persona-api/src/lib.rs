//! Persona API - Core types and interfaces for the persona registry
//!
//! This crate provides the types, constants and abstractions shared by the
//! persona registry and its syscall layer. It is the only crate that knows
//! about the external collaborators (credentials, user memory, process table,
//! group directory); everything above it talks to those through the traits
//! defined here.
//!
//! # Architecture
//!
//! - **Types**: Identifiers, limits, persona kinds and bounded containers
//! - **Error**: The persona error taxonomy and its errno mapping
//! - **Interfaces**: Collaborator traits consumed by the registry and syscalls
//! - **Config**: Registry and syscall configuration
//! - **Logging**: Feature-gated logging macros
//!
//! # Usage
//!
//! ```rust
//! use persona_api::{PersonaError, PersonaType};
//!
//! let kind = PersonaType::try_from(2).unwrap();
//! assert_eq!(kind, PersonaType::Managed);
//! assert_eq!(PersonaError::NotFound.errno(), persona_api::errno::ESRCH);
//! ```

#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// Core modules
pub mod types;
pub mod error;
pub mod interfaces;
pub mod config;
pub mod logging;
pub mod sync;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export commonly used types
pub use crate::types::*;
pub use crate::error::{errno, result_to_errno, PersonaError, Result};
pub use crate::interfaces::{Caller, GroupDirectory, ProcessTable, UserMemory};
pub use crate::config::{InfoAccess, RegistryConfig, SyscallConfig};

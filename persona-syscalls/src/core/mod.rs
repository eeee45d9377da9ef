//! Core persona syscall functionality
//!
//! This module provides the dispatcher that demultiplexes the persona
//! syscall onto its handlers.

pub mod dispatcher;

// Re-export commonly used items
pub use dispatcher::{DispatchStats, PersonaSyscalls, SyscallContext};

//! Collaborator interfaces
//!
//! The persona registry does not own credentials, user memory, the process
//! table or the group directory. It reaches them through these traits so the
//! surrounding kernel (or a test) can plug in its own implementation.

use alloc::vec::Vec;

use crate::error::Result;
use crate::types::{Gid, PersonaId, Pid, Uid, UserAddr};

/// The execution context that issued the current syscall
pub trait Caller {
    /// Process id of the caller
    fn pid(&self) -> Pid;

    /// Whether the caller holds superuser credentials
    fn is_superuser(&self) -> bool;
}

/// Copy primitives across the user/kernel boundary
///
/// Both directions fail with `PersonaError::CopyFault` when the user range is
/// not accessible.
pub trait UserMemory {
    /// Copy `dst.len()` bytes from user address `src`
    fn copy_in(&self, src: UserAddr, dst: &mut [u8]) -> Result<()>;

    /// Copy `src` to user address `dst`
    fn copy_out(&self, src: &[u8], dst: UserAddr) -> Result<()>;
}

/// Process table lookups
pub trait ProcessTable: Send + Sync {
    /// Persona id the process currently runs under, if any
    fn persona_of(&self, pid: Pid) -> Option<PersonaId>;
}

/// Directory service used to expand a group-membership uid
///
/// Implementations may block on I/O.
pub trait GroupDirectory: Send + Sync {
    /// Groups the membership uid belongs to, in directory order
    fn expand_membership(&self, gmuid: Uid) -> Result<Vec<Gid>>;
}

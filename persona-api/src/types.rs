//! Core types used throughout the persona subsystem

use core::fmt;

use crate::error::{PersonaError, Result};

/// Persona identifier type
pub type PersonaId = u32;

/// Process identifier type
pub type Pid = u32;

/// User identifier type
pub type Uid = u32;

/// Group identifier type
pub type Gid = u32;

/// User-space address type
pub type UserAddr = u64;

/// Maximum login length, not counting the terminator
pub const MAXLOGNAME: usize = 255;

/// Maximum number of secondary groups carried by a persona
pub const NGROUPS: usize = 16;

/// "No persona id": asks the store to assign one
pub const PERSONA_ID_NONE: PersonaId = u32::MAX;

/// Reserved persona id, never handed out
pub const PERSONA_ID_RESERVED: PersonaId = 0;

/// "No uid" marker used to opt a persona out of directory resolution
pub const KAUTH_UID_NONE: Uid = u32::MAX - 100;

/// Login name with bounded capacity
pub type Login = heapless::String<MAXLOGNAME>;

/// Bounded, ordered list of secondary groups
pub type GroupList = heapless::Vec<Gid, NGROUPS>;

/// Persona category, supplied at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PersonaType {
    /// Guest persona
    Guest = 1,
    /// Managed persona
    Managed = 2,
    /// Privileged persona
    Priv = 3,
    /// System persona
    System = 4,
}

impl PersonaType {
    /// Raw value as carried on the boundary
    pub fn as_raw(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for PersonaType {
    type Error = PersonaError;

    fn try_from(raw: u32) -> Result<Self> {
        match raw {
            1 => Ok(PersonaType::Guest),
            2 => Ok(PersonaType::Managed),
            3 => Ok(PersonaType::Priv),
            4 => Ok(PersonaType::System),
            _ => Err(PersonaError::InvalidArgument),
        }
    }
}

impl fmt::Display for PersonaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonaType::Guest => write!(f, "guest"),
            PersonaType::Managed => write!(f, "managed"),
            PersonaType::Priv => write!(f, "priv"),
            PersonaType::System => write!(f, "system"),
        }
    }
}

/// Builds a login from a string, rejecting names that do not fit
pub fn login_from_str(name: &str) -> Result<Login> {
    let mut login = Login::new();
    login
        .push_str(name)
        .map_err(|_| PersonaError::InvalidArgument)?;
    Ok(login)
}

/// Builds a group list from a slice, silently dropping entries past `NGROUPS`
pub fn groups_from_slice(gids: &[Gid]) -> GroupList {
    gids.iter().copied().take(NGROUPS).collect()
}

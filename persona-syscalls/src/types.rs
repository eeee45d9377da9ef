//! Persona syscall types
//!
//! Operation codes and the argument block of the persona syscall.

use core::fmt;

use persona_api::{PersonaError, UserAddr};

/// Create a persona
pub const PERSONA_OP_ALLOC: u32 = 1;
/// Invalidate a persona and drop its creation reference
pub const PERSONA_OP_DEALLOC: u32 = 2;
/// Id of the caller's persona
pub const PERSONA_OP_GET: u32 = 3;
/// Info of a persona by id
pub const PERSONA_OP_INFO: u32 = 4;
/// Info of the persona a process runs under
pub const PERSONA_OP_PIDINFO: u32 = 5;
/// Enumerate personas by login and/or id
pub const PERSONA_OP_FIND: u32 = 6;

/// Persona syscall operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PersonaOp {
    Alloc = PERSONA_OP_ALLOC,
    Dealloc = PERSONA_OP_DEALLOC,
    Get = PERSONA_OP_GET,
    Info = PERSONA_OP_INFO,
    PidInfo = PERSONA_OP_PIDINFO,
    Find = PERSONA_OP_FIND,
}

impl PersonaOp {
    pub fn as_raw(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            PersonaOp::Alloc => "alloc",
            PersonaOp::Dealloc => "dealloc",
            PersonaOp::Get => "get",
            PersonaOp::Info => "info",
            PersonaOp::PidInfo => "pidinfo",
            PersonaOp::Find => "find",
        }
    }
}

impl TryFrom<u32> for PersonaOp {
    type Error = PersonaError;

    fn try_from(raw: u32) -> Result<Self, PersonaError> {
        match raw {
            PERSONA_OP_ALLOC => Ok(PersonaOp::Alloc),
            PERSONA_OP_DEALLOC => Ok(PersonaOp::Dealloc),
            PERSONA_OP_GET => Ok(PersonaOp::Get),
            PERSONA_OP_INFO => Ok(PersonaOp::Info),
            PERSONA_OP_PIDINFO => Ok(PersonaOp::PidInfo),
            PERSONA_OP_FIND => Ok(PersonaOp::Find),
            _ => Err(PersonaError::NotSupported),
        }
    }
}

impl fmt::Display for PersonaOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw arguments of one persona syscall
///
/// Which user addresses are read depends on the operation:
///
/// | Operation | `info` | `id` | `idlen` |
/// |---|---|---|---|
/// | Alloc | in/out | out | - |
/// | Dealloc | - | in | - |
/// | Get | - | out | - |
/// | Info | out | in | - |
/// | PidInfo | out | in (pid) | - |
/// | Find | in | out (array) | in/out |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersonaArgs {
    pub operation: u32,
    /// Reserved, ignored
    pub flags: u32,
    pub info: UserAddr,
    pub id: UserAddr,
    pub idlen: UserAddr,
}

impl PersonaArgs {
    pub fn new(op: PersonaOp) -> Self {
        Self {
            operation: op.as_raw(),
            ..Self::default()
        }
    }

    pub fn with_info(mut self, info: UserAddr) -> Self {
        self.info = info;
        self
    }

    pub fn with_id(mut self, id: UserAddr) -> Self {
        self.id = id;
        self
    }

    pub fn with_idlen(mut self, idlen: UserAddr) -> Self {
        self.idlen = idlen;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_codes() {
        for raw in 1..=6u32 {
            assert_eq!(PersonaOp::try_from(raw).unwrap().as_raw(), raw);
        }
        assert_eq!(PersonaOp::try_from(0), Err(PersonaError::NotSupported));
        assert_eq!(PersonaOp::try_from(7), Err(PersonaError::NotSupported));
    }

    #[test]
    fn test_args_builder() {
        let args = PersonaArgs::new(PersonaOp::Find)
            .with_info(0x10)
            .with_id(0x20)
            .with_idlen(0x30);
        assert_eq!(args.operation, PERSONA_OP_FIND);
        assert_eq!(args.flags, 0);
        assert_eq!((args.info, args.id, args.idlen), (0x10, 0x20, 0x30));
    }
}

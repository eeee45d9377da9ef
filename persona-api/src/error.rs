//! Error handling module for the persona subsystem

use core::fmt;

/// POSIX errno values reported by the persona syscall
pub mod errno {
    pub const EPERM: i32 = 1;
    pub const ESRCH: i32 = 3;
    pub const EIO: i32 = 5;
    pub const ENOMEM: i32 = 12;
    pub const EFAULT: i32 = 14;
    pub const EEXIST: i32 = 17;
    pub const EINVAL: i32 = 22;
    pub const ENOSYS: i32 = 38;
}

/// Persona error taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PersonaError {
    PermissionDenied,
    NotFound,
    AlreadyExists,
    NoSpace,
    VersionMismatch,
    InvalidArgument,
    CopyFault,
    DirectoryUnavailable,
    NotSupported,
}

impl PersonaError {
    /// Convert to POSIX errno
    pub fn errno(self) -> i32 {
        use errno::*;
        match self {
            PersonaError::PermissionDenied => EPERM,
            PersonaError::NotFound => ESRCH,
            PersonaError::AlreadyExists => EEXIST,
            PersonaError::NoSpace => ENOMEM,
            PersonaError::VersionMismatch => EINVAL,
            PersonaError::InvalidArgument => EINVAL,
            PersonaError::CopyFault => EFAULT,
            PersonaError::DirectoryUnavailable => EIO,
            PersonaError::NotSupported => ENOSYS,
        }
    }
}

impl fmt::Display for PersonaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonaError::PermissionDenied => write!(f, "Operation not permitted"),
            PersonaError::NotFound => write!(f, "No such persona"),
            PersonaError::AlreadyExists => write!(f, "Persona already exists"),
            PersonaError::NoSpace => write!(f, "Persona id space exhausted"),
            PersonaError::VersionMismatch => write!(f, "Unsupported persona info version"),
            PersonaError::InvalidArgument => write!(f, "Invalid argument"),
            PersonaError::CopyFault => write!(f, "Bad address"),
            PersonaError::DirectoryUnavailable => write!(f, "Group directory unavailable"),
            PersonaError::NotSupported => write!(f, "Operation not supported"),
        }
    }
}

/// Result type for persona operations
pub type Result<T> = core::result::Result<T, PersonaError>;

/// Convert a persona result to the raw syscall return convention
pub fn result_to_errno(result: Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => err.errno(),
    }
}

//! Boundary marshaling
//!
//! Converts between persona records and the fixed-layout, versioned
//! `KPersonaInfo` structure exchanged with user space, and wraps the copy
//! primitives for the scalar arguments of the syscall. All multi-byte fields
//! are native endian.

use core::mem::size_of;

use static_assertions::const_assert_eq;

use persona_api::{
    Gid, Login, PersonaError, PersonaId, Result, Uid, UserAddr, UserMemory, KAUTH_UID_NONE,
    MAXLOGNAME, NGROUPS, login_from_str,
};
use persona_registry::Persona;

/// The only supported version of the boundary structure
pub const PERSONA_INFO_V1: u32 = 1;

/// Size of `KPersonaInfo` on the boundary
pub const KPERSONA_INFO_SIZE: usize = 344;

const NAME_LEN: usize = MAXLOGNAME + 1;

const OFF_VERSION: usize = 0;
const OFF_ID: usize = 4;
const OFF_KIND: usize = 8;
const OFF_GID: usize = 12;
const OFF_NGROUPS: usize = 16;
const OFF_GROUPS: usize = 20;
const OFF_GMUID: usize = OFF_GROUPS + NGROUPS * 4;
const OFF_NAME: usize = OFF_GMUID + 4;

/// Persona info as laid out on the user/kernel boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct KPersonaInfo {
    pub version: u32,
    pub id: PersonaId,
    pub kind: u32,
    pub gid: Gid,
    pub ngroups: u32,
    pub groups: [Gid; NGROUPS],
    pub gmuid: Uid,
    /// NUL-terminated login, empty for none
    pub name: [u8; NAME_LEN],
}

const_assert_eq!(size_of::<KPersonaInfo>(), KPERSONA_INFO_SIZE);
const_assert_eq!(OFF_NAME + NAME_LEN, KPERSONA_INFO_SIZE);

impl KPersonaInfo {
    /// A zeroed V1 structure
    pub const fn new() -> Self {
        Self {
            version: PERSONA_INFO_V1,
            id: 0,
            kind: 0,
            gid: 0,
            ngroups: 0,
            groups: [0; NGROUPS],
            gmuid: 0,
            name: [0; NAME_LEN],
        }
    }

    /// Snapshot of a record
    pub fn from_persona(persona: &Persona) -> Self {
        let mut info = Self::new();
        info.id = persona.id();
        info.kind = persona.kind().as_raw();
        info.gid = persona.gid().unwrap_or(0);
        info.gmuid = persona.gmuid().unwrap_or(KAUTH_UID_NONE);

        let groups = persona.groups();
        info.groups[..groups.len()].copy_from_slice(groups);
        info.ngroups = groups.len() as u32;

        if let Some(login) = persona.login() {
            let len = login.len().min(MAXLOGNAME);
            info.name[..len].copy_from_slice(&login.as_bytes()[..len]);
        }
        info
    }

    pub fn with_id(mut self, id: PersonaId) -> Self {
        self.id = id;
        self
    }

    pub fn with_kind(mut self, kind: u32) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_gid(mut self, gid: Gid) -> Self {
        self.gid = gid;
        self
    }

    /// Set the login, truncated to `MAXLOGNAME` bytes
    pub fn with_login(mut self, login: &str) -> Self {
        self.name = [0; NAME_LEN];
        let len = login.len().min(MAXLOGNAME);
        self.name[..len].copy_from_slice(&login.as_bytes()[..len]);
        self
    }

    /// Set the explicit group list, at most `NGROUPS` entries, and gmuid
    pub fn with_groups(mut self, groups: &[Gid], gmuid: Uid) -> Self {
        let len = groups.len().min(NGROUPS);
        self.groups = [0; NGROUPS];
        self.groups[..len].copy_from_slice(&groups[..len]);
        self.ngroups = len as u32;
        self.gmuid = gmuid;
        self
    }

    /// Decode a raw structure, rejecting unknown versions
    pub fn from_bytes(raw: &[u8; KPERSONA_INFO_SIZE]) -> Result<Self> {
        let version = read_u32(raw, OFF_VERSION);
        if version != PERSONA_INFO_V1 {
            return Err(PersonaError::VersionMismatch);
        }

        let mut groups = [0; NGROUPS];
        for (i, gid) in groups.iter_mut().enumerate() {
            *gid = read_u32(raw, OFF_GROUPS + i * 4);
        }

        let mut name = [0; NAME_LEN];
        name.copy_from_slice(&raw[OFF_NAME..OFF_NAME + NAME_LEN]);
        name[MAXLOGNAME] = 0;

        Ok(Self {
            version,
            id: read_u32(raw, OFF_ID),
            kind: read_u32(raw, OFF_KIND),
            gid: read_u32(raw, OFF_GID),
            ngroups: read_u32(raw, OFF_NGROUPS),
            groups,
            gmuid: read_u32(raw, OFF_GMUID),
            name,
        })
    }

    pub fn to_bytes(&self) -> [u8; KPERSONA_INFO_SIZE] {
        let mut raw = [0; KPERSONA_INFO_SIZE];
        write_u32(&mut raw, OFF_VERSION, self.version);
        write_u32(&mut raw, OFF_ID, self.id);
        write_u32(&mut raw, OFF_KIND, self.kind);
        write_u32(&mut raw, OFF_GID, self.gid);
        write_u32(&mut raw, OFF_NGROUPS, self.ngroups);
        for (i, gid) in self.groups.iter().enumerate() {
            write_u32(&mut raw, OFF_GROUPS + i * 4, *gid);
        }
        write_u32(&mut raw, OFF_GMUID, self.gmuid);
        raw[OFF_NAME..].copy_from_slice(&self.name);
        raw
    }

    /// Raw name bytes up to the first NUL
    pub fn login_bytes(&self) -> &[u8] {
        let len = self.name.iter().position(|b| *b == 0).unwrap_or(MAXLOGNAME);
        &self.name[..len]
    }

    /// Login up to the first NUL, `None` when empty
    ///
    /// Names that are not UTF-8 are rejected.
    pub fn login(&self) -> Result<Option<Login>> {
        let bytes = self.login_bytes();
        if bytes.is_empty() {
            return Ok(None);
        }
        let name = core::str::from_utf8(bytes).map_err(|_| PersonaError::InvalidArgument)?;
        login_from_str(name).map(Some)
    }

    /// The explicit group list
    pub fn groups(&self) -> Result<&[Gid]> {
        let len = self.ngroups as usize;
        if len > NGROUPS {
            return Err(PersonaError::InvalidArgument);
        }
        Ok(&self.groups[..len])
    }
}

impl Default for KPersonaInfo {
    fn default() -> Self {
        Self::new()
    }
}

fn read_u32(raw: &[u8], offset: usize) -> u32 {
    let mut word = [0; 4];
    word.copy_from_slice(&raw[offset..offset + 4]);
    u32::from_ne_bytes(word)
}

fn write_u32(raw: &mut [u8], offset: usize, value: u32) {
    raw[offset..offset + 4].copy_from_slice(&value.to_ne_bytes());
}

/// Copy in a `KPersonaInfo`
///
/// Only the version tag is read until it is known to be supported.
pub fn copyin_info(memory: &dyn UserMemory, addr: UserAddr) -> Result<KPersonaInfo> {
    if copyin_u32(memory, addr)? != PERSONA_INFO_V1 {
        return Err(PersonaError::VersionMismatch);
    }
    let mut raw = [0; KPERSONA_INFO_SIZE];
    memory.copy_in(addr, &mut raw)?;
    KPersonaInfo::from_bytes(&raw)
}

/// Copy out a `KPersonaInfo` over a caller-provided V1 structure
pub fn copyout_info(info: &KPersonaInfo, memory: &dyn UserMemory, addr: UserAddr) -> Result<()> {
    if copyin_u32(memory, addr)? != PERSONA_INFO_V1 {
        return Err(PersonaError::VersionMismatch);
    }
    memory.copy_out(&info.to_bytes(), addr)
}

pub fn copyin_u32(memory: &dyn UserMemory, addr: UserAddr) -> Result<u32> {
    let mut raw = [0; 4];
    memory.copy_in(addr, &mut raw)?;
    Ok(u32::from_ne_bytes(raw))
}

pub fn copyout_u32(memory: &dyn UserMemory, value: u32, addr: UserAddr) -> Result<()> {
    memory.copy_out(&value.to_ne_bytes(), addr)
}

pub fn copyin_u64(memory: &dyn UserMemory, addr: UserAddr) -> Result<u64> {
    let mut raw = [0; 8];
    memory.copy_in(addr, &mut raw)?;
    Ok(u64::from_ne_bytes(raw))
}

pub fn copyout_u64(memory: &dyn UserMemory, value: u64, addr: UserAddr) -> Result<()> {
    memory.copy_out(&value.to_ne_bytes(), addr)
}

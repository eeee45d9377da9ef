//! In-memory fakes of the collaborator interfaces
//!
//! Used by the unit and integration tests of the persona crates.

use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;

use crate::error::{PersonaError, Result};
use crate::interfaces::{Caller, GroupDirectory, ProcessTable, UserMemory};
use crate::sync::{AtomicUsize, Mutex, Ordering};
use crate::types::{Gid, PersonaId, Pid, Uid, UserAddr};

/// First valid address of every fake address space
pub const USER_BASE: UserAddr = 0x1000;

/// A flat user address space `[USER_BASE, USER_BASE + size)`
///
/// Any access outside the range faults. Addresses are handed out by a bump
/// allocator so tests can lay out buffers back to back.
pub struct FakeUserMemory {
    bytes: Mutex<Vec<u8>>,
    next: Mutex<UserAddr>,
    copy_ins: Mutex<Vec<(UserAddr, usize)>>,
}

impl FakeUserMemory {
    pub fn new(size: usize) -> Self {
        Self {
            bytes: Mutex::new(vec![0; size]),
            next: Mutex::new(USER_BASE),
            copy_ins: Mutex::new(Vec::new()),
        }
    }

    /// Reserve `len` bytes and return their address
    pub fn alloc(&self, len: usize) -> UserAddr {
        let mut next = self.next.lock();
        let addr = *next;
        *next += len as UserAddr;
        addr
    }

    /// One past the last accessible address
    pub fn end(&self) -> UserAddr {
        USER_BASE + self.bytes.lock().len() as UserAddr
    }

    pub fn write(&self, addr: UserAddr, data: &[u8]) {
        self.copy_out(data, addr).expect("fake write out of range");
    }

    pub fn read(&self, addr: UserAddr, len: usize) -> Vec<u8> {
        let mut out = vec![0; len];
        self.access(addr, len, |mem| out.copy_from_slice(mem))
            .expect("fake read out of range");
        out
    }

    pub fn write_u32(&self, addr: UserAddr, value: u32) {
        self.write(addr, &value.to_ne_bytes());
    }

    pub fn read_u32(&self, addr: UserAddr) -> u32 {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&self.read(addr, 4));
        u32::from_ne_bytes(raw)
    }

    pub fn write_u64(&self, addr: UserAddr, value: u64) {
        self.write(addr, &value.to_ne_bytes());
    }

    pub fn read_u64(&self, addr: UserAddr) -> u64 {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&self.read(addr, 8));
        u64::from_ne_bytes(raw)
    }

    /// Every `copy_in` performed so far, as `(address, length)`
    pub fn copy_in_log(&self) -> Vec<(UserAddr, usize)> {
        self.copy_ins.lock().clone()
    }

    fn access<F>(&self, addr: UserAddr, len: usize, f: F) -> Result<()>
    where
        F: FnOnce(&mut [u8]),
    {
        let mut bytes = self.bytes.lock();
        let start = addr
            .checked_sub(USER_BASE)
            .ok_or(PersonaError::CopyFault)? as usize;
        let end = start.checked_add(len).ok_or(PersonaError::CopyFault)?;
        if end > bytes.len() {
            return Err(PersonaError::CopyFault);
        }
        f(&mut bytes[start..end]);
        Ok(())
    }
}

impl UserMemory for FakeUserMemory {
    fn copy_in(&self, src: UserAddr, dst: &mut [u8]) -> Result<()> {
        self.copy_ins.lock().push((src, dst.len()));
        self.access(src, dst.len(), |mem| dst.copy_from_slice(mem))
    }

    fn copy_out(&self, src: &[u8], dst: UserAddr) -> Result<()> {
        self.access(dst, src.len(), |mem| mem.copy_from_slice(src))
    }
}

/// A caller with a fixed pid and privilege
#[derive(Debug, Clone, Copy)]
pub struct FakeCaller {
    pub pid: Pid,
    pub superuser: bool,
}

impl FakeCaller {
    pub fn root(pid: Pid) -> Self {
        Self { pid, superuser: true }
    }

    pub fn user(pid: Pid) -> Self {
        Self { pid, superuser: false }
    }
}

impl Caller for FakeCaller {
    fn pid(&self) -> Pid {
        self.pid
    }

    fn is_superuser(&self) -> bool {
        self.superuser
    }
}

/// Process table backed by a map
#[derive(Default)]
pub struct FakeProcessTable {
    processes: Mutex<BTreeMap<Pid, PersonaId>>,
}

impl FakeProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, pid: Pid, persona: PersonaId) {
        self.processes.lock().insert(pid, persona);
    }

    pub fn detach(&self, pid: Pid) {
        self.processes.lock().remove(&pid);
    }
}

impl ProcessTable for FakeProcessTable {
    fn persona_of(&self, pid: Pid) -> Option<PersonaId> {
        self.processes.lock().get(&pid).copied()
    }
}

/// Group directory backed by a map
///
/// Unknown membership uids expand to an empty list.
#[derive(Default)]
pub struct FakeDirectory {
    memberships: Mutex<BTreeMap<Uid, Vec<Gid>>>,
    calls: AtomicUsize,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, gmuid: Uid, groups: &[Gid]) {
        self.memberships.lock().insert(gmuid, groups.to_vec());
    }

    /// Number of expansions requested so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl GroupDirectory for FakeDirectory {
    fn expand_membership(&self, gmuid: Uid) -> Result<Vec<Gid>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.memberships.lock().get(&gmuid).cloned().unwrap_or_default())
    }
}

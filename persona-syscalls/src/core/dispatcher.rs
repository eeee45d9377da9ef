//! Persona syscall dispatcher
//!
//! This module provides the single entry point of the persona syscall: it
//! decodes the operation code, runs the matching handler and keeps per-op
//! statistics.

use alloc::collections::BTreeMap;
use alloc::sync::Arc;

use persona_api::sync::Mutex;
use persona_api::{
    pna_debug, result_to_errno, Caller, GroupDirectory, ProcessTable, Result, SyscallConfig,
    UserMemory,
};
use persona_registry::PersonaRegistry;

use crate::handlers;
use crate::types::{PersonaArgs, PersonaOp};

/// Per-call view of the calling context
#[derive(Clone, Copy)]
pub struct SyscallContext<'a> {
    pub caller: &'a dyn Caller,
    pub memory: &'a dyn UserMemory,
}

impl<'a> SyscallContext<'a> {
    pub fn new(caller: &'a dyn Caller, memory: &'a dyn UserMemory) -> Self {
        Self { caller, memory }
    }
}

/// The persona syscall and the collaborators it needs
pub struct PersonaSyscalls {
    pub(crate) registry: Arc<PersonaRegistry>,
    pub(crate) processes: Arc<dyn ProcessTable>,
    pub(crate) directory: Arc<dyn GroupDirectory>,
    pub(crate) config: SyscallConfig,
    stats: Mutex<DispatchStats>,
}

impl PersonaSyscalls {
    pub fn new(
        registry: Arc<PersonaRegistry>,
        processes: Arc<dyn ProcessTable>,
        directory: Arc<dyn GroupDirectory>,
        config: SyscallConfig,
    ) -> Self {
        Self {
            registry,
            processes,
            directory,
            config,
            stats: Mutex::new(DispatchStats::default()),
        }
    }

    pub fn registry(&self) -> &Arc<PersonaRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &SyscallConfig {
        &self.config
    }

    /// Dispatch one persona syscall
    pub fn dispatch(&self, ctx: &SyscallContext<'_>, args: &PersonaArgs) -> Result<()> {
        let result = match PersonaOp::try_from(args.operation) {
            Ok(op) => self.run(op, ctx, args),
            Err(err) => {
                pna_debug!("persona: unknown operation {}", args.operation);
                Err(err)
            }
        };

        let mut stats = self.stats.lock();
        stats.total_calls += 1;
        *stats.calls_by_op.entry(args.operation).or_insert(0) += 1;
        if result.is_err() {
            stats.error_count += 1;
        }

        result
    }

    fn run(&self, op: PersonaOp, ctx: &SyscallContext<'_>, args: &PersonaArgs) -> Result<()> {
        match op {
            PersonaOp::Alloc => handlers::alloc(self, ctx, args.info, args.id),
            PersonaOp::Dealloc => handlers::dealloc(self, ctx, args.id),
            PersonaOp::Get => handlers::get(self, ctx, args.id),
            PersonaOp::Info => handlers::info::info(self, ctx, args.id, args.info),
            PersonaOp::PidInfo => handlers::info::pidinfo(self, ctx, args.id, args.info),
            PersonaOp::Find => handlers::find::find(self, ctx, args.info, args.id, args.idlen),
        }
    }

    /// Raw syscall convention: 0 on success, otherwise a positive errno
    pub fn persona_syscall(&self, ctx: &SyscallContext<'_>, args: &PersonaArgs) -> i32 {
        result_to_errno(self.dispatch(ctx, args))
    }

    /// Get dispatch statistics
    pub fn stats(&self) -> DispatchStats {
        self.stats.lock().clone()
    }
}

/// Dispatch statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Total number of persona syscalls
    pub total_calls: u64,
    /// Calls by raw operation code, unknown codes included
    pub calls_by_op: BTreeMap<u32, u64>,
    /// Number of calls that returned an error
    pub error_count: u64,
}

impl DispatchStats {
    pub fn calls(&self, op: PersonaOp) -> u64 {
        self.calls_by_op.get(&op.as_raw()).copied().unwrap_or(0)
    }
}

//! Persona subsystem configuration

use crate::types::{PersonaId, PERSONA_ID_NONE};

/// Record store limits and id assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Maximum number of live personas, draining ones included
    pub max_personas: usize,
    /// First id handed out by automatic assignment
    pub first_id: PersonaId,
    /// Distance between consecutive automatically assigned ids
    pub id_step: u32,
    /// Last id automatic assignment may use before wrapping
    pub last_id: PersonaId,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_personas: 512,
            first_id: 501,
            id_step: 1,
            last_id: PERSONA_ID_NONE - 1,
        }
    }
}

impl RegistryConfig {
    pub fn with_max_personas(mut self, max_personas: usize) -> Self {
        self.max_personas = max_personas;
        self
    }

    pub fn with_first_id(mut self, first_id: PersonaId) -> Self {
        self.first_id = first_id;
        self
    }

    pub fn with_id_step(mut self, id_step: u32) -> Self {
        self.id_step = id_step.max(1);
        self
    }

    pub fn with_last_id(mut self, last_id: PersonaId) -> Self {
        self.last_id = last_id;
        self
    }

    /// Number of ids automatic assignment can choose from
    pub fn id_space(&self) -> u64 {
        if self.last_id < self.first_id {
            return 0;
        }
        (u64::from(self.last_id - self.first_id) / u64::from(self.id_step)) + 1
    }
}

/// Who may read a persona's info by id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InfoAccess {
    /// Anyone who knows the id
    #[default]
    Public,
    /// Superusers, or callers running under that persona
    OwnerOrSuperuser,
}

/// Syscall layer policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyscallConfig {
    pub info_access: InfoAccess,
}

impl SyscallConfig {
    pub fn with_info_access(mut self, info_access: InfoAccess) -> Self {
        self.info_access = info_access;
        self
    }
}

//! Persona operation handlers
//!
//! Creation, deletion and the caller's own persona live here; the info
//! queries and enumeration have their own modules.

pub mod find;
pub mod info;

use persona_api::{
    pna_error, pna_info, GroupDirectory, PersonaError, PersonaType, Result, UserAddr,
    KAUTH_UID_NONE, PERSONA_ID_NONE, PERSONA_ID_RESERVED,
};
use persona_registry::{merge_groups, resolve_groups, PersonaTemplate};

use crate::core::{PersonaSyscalls, SyscallContext};
use crate::marshal::{copyin_info, copyin_u32, copyout_info, copyout_u32, KPersonaInfo};

/// Build a creation template from a decoded info structure
///
/// Group membership is resolved here, before the registry lock is taken.
pub fn template_from_info(directory: &dyn GroupDirectory, info: &KPersonaInfo) -> Result<PersonaTemplate> {
    let kind = PersonaType::try_from(info.kind)?;
    let mut template = PersonaTemplate::new(info.login()?, kind);

    if info.gid != 0 {
        template = template.with_gid(info.gid);
    }

    let explicit = info.groups()?;
    if !explicit.is_empty() {
        // gmuid 0 opts out of directory resolution
        let gmuid = match info.gmuid {
            0 | KAUTH_UID_NONE => None,
            gmuid => Some(gmuid),
        };
        let resolved = resolve_groups(directory, gmuid)?;
        template = template.with_groups(merge_groups(explicit, &resolved), gmuid);
    }

    Ok(template)
}

pub(crate) fn alloc(
    sys: &PersonaSyscalls,
    ctx: &SyscallContext<'_>,
    info_addr: UserAddr,
    id_addr: UserAddr,
) -> Result<()> {
    if !ctx.caller.is_superuser() {
        return Err(PersonaError::PermissionDenied);
    }

    let info = copyin_info(ctx.memory, info_addr)?;
    let template = template_from_info(sys.directory.as_ref(), &info)?;
    let requested = match info.id {
        PERSONA_ID_RESERVED | PERSONA_ID_NONE => None,
        id => Some(id),
    };

    let persona = sys.registry.allocate(requested, template)?;
    let written = KPersonaInfo::from_persona(&persona);
    let result = copyout_u32(ctx.memory, persona.id(), id_addr)
        .and_then(|()| copyout_info(&written, ctx.memory, info_addr));

    match result {
        Ok(()) => {
            let id = persona.persist();
            pna_info!("persona {}: created by pid {}", id, ctx.caller.pid());
            Ok(())
        }
        Err(err) => {
            pna_error!("persona alloc: {} (unwinding persona {})", err, persona.id());
            persona.discard();
            Err(err)
        }
    }
}

pub(crate) fn dealloc(sys: &PersonaSyscalls, ctx: &SyscallContext<'_>, id_addr: UserAddr) -> Result<()> {
    if !ctx.caller.is_superuser() {
        return Err(PersonaError::PermissionDenied);
    }

    let id = copyin_u32(ctx.memory, id_addr)?;
    sys.registry.deallocate(id)
}

pub(crate) fn get(sys: &PersonaSyscalls, ctx: &SyscallContext<'_>, id_addr: UserAddr) -> Result<()> {
    let persona = sys.registry.current(sys.processes.as_ref(), ctx.caller)?;
    copyout_u32(ctx.memory, persona.id(), id_addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use persona_api::testing::FakeDirectory;

    #[test]
    fn test_template_defaults() {
        let directory = FakeDirectory::new();
        let info = KPersonaInfo::new().with_kind(PersonaType::Guest.as_raw());
        let template = template_from_info(&directory, &info).unwrap();

        assert_eq!(template.login, None);
        assert_eq!(template.kind, PersonaType::Guest);
        assert_eq!(template.gid, None);
        assert_eq!(template.gmuid, None);
        assert!(template.groups.is_empty());
        assert_eq!(directory.calls(), 0);
    }

    #[test]
    fn test_template_resolves_and_merges() {
        let directory = FakeDirectory::new();
        directory.insert(700, &[101, 300]);
        let info = KPersonaInfo::new()
            .with_kind(PersonaType::Managed.as_raw())
            .with_gid(20)
            .with_login("svc1")
            .with_groups(&[100, 101], 700);

        let template = template_from_info(&directory, &info).unwrap();
        assert_eq!(template.login.as_deref(), Some("svc1"));
        assert_eq!(template.gid, Some(20));
        assert_eq!(template.gmuid, Some(700));
        assert_eq!(&template.groups[..], &[100, 101, 300]);
        assert_eq!(directory.calls(), 1);
    }

    #[test]
    fn test_template_gmuid_zero_opts_out() {
        let directory = FakeDirectory::new();
        directory.insert(0, &[999]);
        let info = KPersonaInfo::new()
            .with_kind(PersonaType::Managed.as_raw())
            .with_groups(&[100], 0);

        let template = template_from_info(&directory, &info).unwrap();
        assert_eq!(template.gmuid, None);
        assert_eq!(&template.groups[..], &[100]);
        assert_eq!(directory.calls(), 0);
    }

    #[test]
    fn test_template_rejects_bad_input() {
        let directory = FakeDirectory::new();
        let bad_kind = KPersonaInfo::new().with_kind(5);
        assert_eq!(
            template_from_info(&directory, &bad_kind).unwrap_err(),
            PersonaError::InvalidArgument
        );

        let mut too_many = KPersonaInfo::new().with_kind(1);
        too_many.ngroups = 17;
        assert_eq!(
            template_from_info(&directory, &too_many).unwrap_err(),
            PersonaError::InvalidArgument
        );
    }
}

//! Info queries: by persona id and by process id

use persona_api::{InfoAccess, PersonaError, PersonaId, Result, UserAddr};

use crate::core::{PersonaSyscalls, SyscallContext};
use crate::marshal::{copyin_u32, copyout_info, KPersonaInfo};

/// Whether the caller may read the info of persona `id`
fn may_read(sys: &PersonaSyscalls, ctx: &SyscallContext<'_>, id: PersonaId) -> bool {
    match sys.config.info_access {
        InfoAccess::Public => true,
        InfoAccess::OwnerOrSuperuser => {
            ctx.caller.is_superuser() || sys.processes.persona_of(ctx.caller.pid()) == Some(id)
        }
    }
}

pub(crate) fn info(
    sys: &PersonaSyscalls,
    ctx: &SyscallContext<'_>,
    id_addr: UserAddr,
    info_addr: UserAddr,
) -> Result<()> {
    let id = copyin_u32(ctx.memory, id_addr)?;
    if !may_read(sys, ctx, id) {
        return Err(PersonaError::PermissionDenied);
    }

    let info = {
        let persona = sys.registry.lookup(id)?;
        KPersonaInfo::from_persona(&persona)
    };
    copyout_info(&info, ctx.memory, info_addr)
}

pub(crate) fn pidinfo(
    sys: &PersonaSyscalls,
    ctx: &SyscallContext<'_>,
    pid_addr: UserAddr,
    info_addr: UserAddr,
) -> Result<()> {
    let pid = copyin_u32(ctx.memory, pid_addr)?;
    if !ctx.caller.is_superuser() && pid != ctx.caller.pid() {
        return Err(PersonaError::PermissionDenied);
    }

    let info = {
        let persona = sys.registry.owner_of(sys.processes.as_ref(), pid)?;
        KPersonaInfo::from_persona(&persona)
    };
    copyout_info(&info, ctx.memory, info_addr)
}

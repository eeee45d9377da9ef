//! Persona enumeration
//!
//! The caller passes its buffer capacity through `idlen` and always gets the
//! total number of matches back there, even when fewer ids fit or a later
//! step fails.

use persona_api::{pna_debug, PersonaError, Result, UserAddr};

use crate::core::{PersonaSyscalls, SyscallContext};
use crate::marshal::{copyin_info, copyin_u64, copyout_u32, copyout_u64};

const ID_SIZE: UserAddr = 4;

pub(crate) fn find(
    sys: &PersonaSyscalls,
    ctx: &SyscallContext<'_>,
    info_addr: UserAddr,
    ids_addr: UserAddr,
    idlen_addr: UserAddr,
) -> Result<()> {
    let requested = copyin_u64(ctx.memory, idlen_addr)?;
    let capacity = requested.min(sys.registry.config().max_personas as u64) as usize;

    let mut matches = 0;
    let result = find_and_copyout(sys, ctx, info_addr, ids_addr, capacity, &mut matches);

    if let Err(err) = copyout_u64(ctx.memory, matches as u64, idlen_addr) {
        pna_debug!("persona find: count not written back: {}", err);
    }
    result
}

fn find_and_copyout(
    sys: &PersonaSyscalls,
    ctx: &SyscallContext<'_>,
    info_addr: UserAddr,
    ids_addr: UserAddr,
    capacity: usize,
    matches: &mut usize,
) -> Result<()> {
    let filter = copyin_info(ctx.memory, info_addr)?;

    // No stored login can equal a name that is not UTF-8
    let login = match core::str::from_utf8(filter.login_bytes()) {
        Ok("") => None,
        Ok(name) => Some(name),
        Err(_) => {
            pna_debug!("persona find: login filter is not UTF-8, nothing matches");
            return Ok(());
        }
    };

    let found = sys.registry.find(login, Some(filter.id), capacity);
    *matches = found.matches;

    for (i, persona) in found.personas.iter().enumerate() {
        let addr = (i as UserAddr)
            .checked_mul(ID_SIZE)
            .and_then(|offset| ids_addr.checked_add(offset))
            .ok_or(PersonaError::CopyFault)?;
        copyout_u32(ctx.memory, persona.id(), addr)?;
    }
    Ok(())
}

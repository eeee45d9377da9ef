//! Group membership resolution
//!
//! The directory may block, so these helpers are called while building a
//! [`crate::PersonaTemplate`], before the store lock is ever taken.

use persona_api::{pna_trace, Gid, GroupDirectory, GroupList, Result, Uid};

/// Expand a membership uid into at most `NGROUPS` group ids
///
/// `None` means the persona opted out of directory resolution.
pub fn resolve_groups(directory: &dyn GroupDirectory, gmuid: Option<Uid>) -> Result<GroupList> {
    let Some(gmuid) = gmuid else {
        return Ok(GroupList::new());
    };

    let expanded = directory.expand_membership(gmuid)?;
    let mut groups = GroupList::new();
    for gid in expanded {
        if groups.push(gid).is_err() {
            pna_trace!("gmuid {}: group list truncated", gmuid);
            break;
        }
    }
    Ok(groups)
}

/// Explicit groups first, then resolved ones not already listed
pub fn merge_groups(explicit: &[Gid], resolved: &[Gid]) -> GroupList {
    let mut groups = GroupList::new();
    for &gid in explicit.iter().chain(resolved) {
        if groups.contains(&gid) {
            continue;
        }
        if groups.push(gid).is_err() {
            break;
        }
    }
    groups
}

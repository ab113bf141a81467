/// Slot-by-slot union of two descriptor sets

use crate::descriptor::{bindings_equal, BindingSource, MergedSet};
use crate::error::{BindingConflict, Error, Result};
use crate::metagen_trace;

/// Merge two descriptor sets with the same set index into a new merged set
///
/// For every slot up to the highest slot used by either side:
/// - both occupied: the bindings must be structurally equal, `a`'s is kept
/// - one occupied: that binding is kept
/// - none occupied: the slot stays empty
///
/// Neither input is modified. The result owns a new slot array; its bindings
/// stay borrowed from the modules behind `a` and `b`.
///
/// # Errors
///
/// Errors are returned unlogged; the caller that adds context logs them.
///
/// - `Error::SetIndexMismatch` if the set indices differ. This is a sequencing
///   bug in the caller, never a data problem.
/// - `Error::BindingConflict` naming the set index, the slot and both
///   bindings if any shared slot disagrees. No partial set is returned.
pub fn union<'m>(a: &impl BindingSource<'m>, b: &impl BindingSource<'m>) -> Result<MergedSet<'m>> {
    let set_index = a.set_index();
    if set_index != b.set_index() {
        return Err(Error::SetIndexMismatch {
            left: set_index,
            right: b.set_index(),
        });
    }

    let binding_count = a.binding_count().max(b.binding_count());
    let mut slots = Vec::with_capacity(binding_count as usize);

    for slot in 0..binding_count {
        let merged = match (a.binding_at(slot), b.binding_at(slot)) {
            (Some(left), Some(right)) => {
                if !bindings_equal(left, right) {
                    return Err(Error::BindingConflict(Box::new(BindingConflict {
                        set_index,
                        slot,
                        existing: left.clone(),
                        incoming: right.clone(),
                    })));
                }
                Some(left)
            }
            (Some(left), None) => Some(left),
            (None, Some(right)) => Some(right),
            (None, None) => None,
        };
        slots.push(merged);
    }

    metagen_trace!("shader_metagen::Union",
        "Unioned set {} into {} slots", set_index, binding_count);

    Ok(MergedSet::from_slots(set_index, slots))
}

/// Whether `union(a, b)` would succeed (diagnostics only)
pub fn could_be_unioned<'m>(a: &impl BindingSource<'m>, b: &impl BindingSource<'m>) -> bool {
    union(a, b).is_ok()
}

#[cfg(test)]
#[path = "union_tests.rs"]
mod tests;

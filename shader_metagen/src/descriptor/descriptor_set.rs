/// Descriptor sets: module-owned reflections and merge-owned results
///
/// Two flavors exist and they are distinct types:
/// - `ReflectedSet` is owned by a ShaderModule and owns its bindings.
/// - `MergedSet<'m>` owns only its slot array. Every slot borrows a binding
///   from a module that outlives `'m`, so a merged set can never outlive the
///   modules it was built from, and releasing it (dropping) never touches them.

use crate::descriptor::{bindings_equal, DescriptorBinding};
use crate::error::{BindingConflict, Error, Result};

/// Number of descriptor set indices modeled (0..=3)
pub const MAX_DESCRIPTOR_SETS: usize = 4;

/// Highest binding slot a descriptor set may use
///
/// Merged sets are dense slot arrays, so the slot number bounds their size.
pub const MAX_BINDING_SLOT: u32 = 4095;

/// Set index reserved for the cross-pipeline global set
pub const GLOBAL_SET_INDEX: u32 = 0;

/// Read access shared by both descriptor set flavors
pub trait BindingSource<'m> {
    /// Descriptor set index (0..=3)
    fn set_index(&self) -> u32;

    /// Binding occupying `slot`, if any
    fn binding_at(&self, slot: u32) -> Option<&'m DescriptorBinding>;

    /// Highest occupied slot, or None when the set has no bindings
    fn highest_slot(&self) -> Option<u32>;

    /// Number of slots: highest occupied slot + 1, or 0 when empty
    ///
    /// Saturates at `u32::MAX`. Sets built by this crate never exceed
    /// `MAX_BINDING_SLOT + 1`.
    fn binding_count(&self) -> u32 {
        self.highest_slot().map_or(0, |slot| slot.saturating_add(1))
    }
}

// ============================================================================
// Module-owned set
// ============================================================================

/// Descriptor set as reflected from one shader module
///
/// Bindings are kept sorted by slot. There is at most one binding per slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectedSet {
    set_index: u32,
    bindings: Vec<DescriptorBinding>,
}

impl ReflectedSet {
    /// Create a set from its bindings
    ///
    /// Bindings are sorted by slot. A slot declared more than once with equal
    /// bindings is kept once.
    ///
    /// # Errors
    ///
    /// - `Error::SlotOutOfRange` if a slot is above `MAX_BINDING_SLOT`
    /// - `Error::BindingConflict` if one slot is declared twice with bindings
    ///   that are not structurally equal
    pub fn new(set_index: u32, mut bindings: Vec<DescriptorBinding>) -> Result<Self> {
        if let Some(binding) = bindings.iter().find(|b| b.slot > MAX_BINDING_SLOT) {
            return Err(Error::SlotOutOfRange {
                set_index,
                slot: binding.slot,
            });
        }

        bindings.sort_by_key(|b| b.slot);
        for pair in bindings.windows(2) {
            if pair[0].slot == pair[1].slot && !bindings_equal(&pair[0], &pair[1]) {
                return Err(Error::BindingConflict(Box::new(BindingConflict {
                    set_index,
                    slot: pair[0].slot,
                    existing: pair[0].clone(),
                    incoming: pair[1].clone(),
                })));
            }
        }
        bindings.dedup_by_key(|b| b.slot);

        Ok(Self { set_index, bindings })
    }

    /// Descriptor set index
    pub fn set_index(&self) -> u32 {
        self.set_index
    }

    /// Bindings in slot order
    pub fn bindings(&self) -> &[DescriptorBinding] {
        &self.bindings
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<'m> BindingSource<'m> for &'m ReflectedSet {
    fn set_index(&self) -> u32 {
        self.set_index
    }

    fn binding_at(&self, slot: u32) -> Option<&'m DescriptorBinding> {
        let set: &'m ReflectedSet = *self;
        set.bindings
            .binary_search_by_key(&slot, |b| b.slot)
            .ok()
            .map(|index| &set.bindings[index])
    }

    fn highest_slot(&self) -> Option<u32> {
        self.bindings.last().map(|b| b.slot)
    }
}

// ============================================================================
// Merge-owned set
// ============================================================================

/// Descriptor set produced by merging
///
/// Dense slot array of length `binding_count`; unused intermediate slots are
/// explicitly `None`. Dropping a MergedSet releases the slot array only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedSet<'m> {
    set_index: u32,
    slots: Vec<Option<&'m DescriptorBinding>>,
}

impl<'m> MergedSet<'m> {
    /// Empty 0-binding set (the seed of a global set fold)
    pub fn empty(set_index: u32) -> Self {
        Self {
            set_index,
            slots: Vec::new(),
        }
    }

    /// Merge-owned shallow copy of a module-owned set
    ///
    /// The new slot array does not alias the module's storage; the bindings
    /// themselves are borrowed.
    pub fn seeded_from(set: &'m ReflectedSet) -> Self {
        let mut slots = vec![None; BindingSource::binding_count(&set) as usize];
        for binding in set.bindings() {
            slots[binding.slot as usize] = Some(binding);
        }
        Self {
            set_index: set.set_index,
            slots,
        }
    }

    /// Build a set from an already dense slot array
    pub(crate) fn from_slots(set_index: u32, slots: Vec<Option<&'m DescriptorBinding>>) -> Self {
        Self { set_index, slots }
    }

    /// Dense slot view (length == binding_count)
    pub fn slots(&self) -> &[Option<&'m DescriptorBinding>] {
        &self.slots
    }

    /// Occupied bindings in slot order
    pub fn bindings(&self) -> impl Iterator<Item = &'m DescriptorBinding> + '_ {
        self.slots.iter().filter_map(|slot| *slot)
    }

    /// Whether no slot is occupied
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

impl<'m> BindingSource<'m> for MergedSet<'m> {
    fn set_index(&self) -> u32 {
        self.set_index
    }

    fn binding_at(&self, slot: u32) -> Option<&'m DescriptorBinding> {
        self.slots.get(slot as usize).copied().flatten()
    }

    fn highest_slot(&self) -> Option<u32> {
        self.slots.iter().rposition(Option::is_some).map(|slot| slot as u32)
    }
}

#[cfg(test)]
#[path = "descriptor_set_tests.rs"]
mod tests;

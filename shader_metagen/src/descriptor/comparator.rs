/// Structural equality of bindings that occupy the same slot

use crate::descriptor::{BindingSource, DescriptorBinding, DescriptorKind};

/// Structural equality test for two bindings occupying the same slot
///
/// Always compares `count`, `slot` and `kind`. Uniform buffers then compare
/// their struct shape by `(type_flags, type_name, member_count)`; every other
/// kind compares image traits `(format, sampled, multisampled)`.
///
/// The uniform-buffer check is name based: two different structs that share
/// a name and member count compare equal. Existing shader sets may rely on
/// this, so it stays an accepted approximation rather than a member-by-member
/// comparison.
pub fn bindings_equal(a: &DescriptorBinding, b: &DescriptorBinding) -> bool {
    if a.count != b.count || a.slot != b.slot || a.kind != b.kind {
        return false;
    }

    if a.kind == DescriptorKind::UniformBuffer {
        match (a.shape.as_struct(), b.shape.as_struct()) {
            (Some(sa), Some(sb)) => {
                sa.type_flags == sb.type_flags
                    && sa.type_name == sb.type_name
                    && sa.member_count == sb.member_count
            }
            (None, None) => a.shape.as_image() == b.shape.as_image(),
            _ => false,
        }
    } else {
        match (a.shape.as_image(), b.shape.as_image()) {
            (Some(ia), Some(ib)) => {
                ia.format == ib.format
                    && ia.sampled == ib.sampled
                    && ia.multisampled == ib.multisampled
            }
            // Buffers other than uniform buffers carry no image traits
            (None, None) => true,
            _ => false,
        }
    }
}

/// Whole-set equality: same binding count and structurally equal slots
pub fn sets_equal<'m>(a: &impl BindingSource<'m>, b: &impl BindingSource<'m>) -> bool {
    if a.binding_count() != b.binding_count() {
        return false;
    }
    (0..a.binding_count()).all(|slot| match (a.binding_at(slot), b.binding_at(slot)) {
        (Some(x), Some(y)) => bindings_equal(x, y),
        (None, None) => true,
        _ => false,
    })
}

#[cfg(test)]
#[path = "comparator_tests.rs"]
mod tests;

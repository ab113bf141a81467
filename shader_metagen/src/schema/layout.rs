/// Flattened layout rows for the generator
///
/// The generator never walks merged slot arrays directly. It reads dense
/// `LayoutEntry` rows and the deduplicated uniform struct list built here.

use crate::descriptor::{BindingShape, DescriptorKind, MergedSet, StructShape};

/// One occupied slot of a descriptor set, as the generator consumes it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutEntry {
    pub slot: u32,
    pub name: String,
    pub kind: DescriptorKind,
    pub count: u32,
    /// Byte size of the uniform struct, 0 for everything else
    pub byte_size: u32,
}

/// Dense layout rows of a merged set, in slot order (empty slots skipped)
pub fn layout_entries(set: &MergedSet<'_>) -> Vec<LayoutEntry> {
    set.bindings()
        .map(|binding| LayoutEntry {
            slot: binding.slot,
            name: binding.name.clone(),
            kind: binding.kind,
            count: binding.count,
            byte_size: match &binding.shape {
                BindingShape::Struct(shape) => shape.size.unwrap_or(0),
                BindingShape::Image(_) => 0,
            },
        })
        .collect()
}

/// Uniform-buffer structs referenced by `sets`, deduplicated by type name
///
/// The first struct seen under a name wins. Structs that differ but share a
/// name collapse into one entry, like they do in binding equality.
pub fn unique_uniform_structs<'a, 'm: 'a>(
    sets: impl IntoIterator<Item = &'a MergedSet<'m>>,
) -> Vec<&'m StructShape> {
    let mut structs: Vec<&'m StructShape> = Vec::new();
    for set in sets {
        for binding in set.bindings() {
            if binding.kind != DescriptorKind::UniformBuffer {
                continue;
            }
            let Some(shape) = binding.shape.as_struct() else {
                continue;
            };
            if !structs.iter().any(|s| s.type_name == shape.type_name) {
                structs.push(shape);
            }
        }
    }
    structs
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;

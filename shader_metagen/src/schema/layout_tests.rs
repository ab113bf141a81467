//! Unit tests for layout.rs

use super::*;
use crate::descriptor::ReflectedSet;
use crate::module::mock_loader::{sampler, texture, uniform};

#[test]
fn test_layout_entries_skip_empty_slots() {
    let set = ReflectedSet::new(1, vec![uniform(0, "material", "Material", 3), texture(3, "albedo")]).unwrap();
    let merged = MergedSet::seeded_from(&set);

    let entries = layout_entries(&merged);

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0], LayoutEntry {
        slot: 0,
        name: "material".to_string(),
        kind: DescriptorKind::UniformBuffer,
        count: 1,
        byte_size: 48,
    });
    assert_eq!(entries[1].slot, 3);
    assert_eq!(entries[1].kind, DescriptorKind::CombinedImageSampler);
    assert_eq!(entries[1].byte_size, 0);
}

#[test]
fn test_layout_entries_keep_descriptor_count() {
    let set = ReflectedSet::new(0, vec![sampler(0, "cascades").with_count(4)]).unwrap();
    let entries = layout_entries(&MergedSet::seeded_from(&set));
    assert_eq!(entries[0].count, 4);
}

#[test]
fn test_layout_entries_of_empty_set() {
    assert!(layout_entries(&MergedSet::empty(0)).is_empty());
}

#[test]
fn test_unique_uniform_structs_first_wins() {
    let a = ReflectedSet::new(0, vec![uniform(0, "camera", "Camera", 4), sampler(1, "s")]).unwrap();
    let b = ReflectedSet::new(1, vec![uniform(0, "cam2", "Camera", 2), uniform(1, "light", "Light", 1)]).unwrap();
    let (a, b) = (MergedSet::seeded_from(&a), MergedSet::seeded_from(&b));

    let structs = unique_uniform_structs([&a, &b]);

    let names: Vec<&str> = structs.iter().map(|s| s.type_name.as_str()).collect();
    assert_eq!(names, vec!["Camera", "Light"]);
    assert_eq!(structs[0].member_count, 4);
}

#[test]
fn test_unique_uniform_structs_ignores_images() {
    let a = ReflectedSet::new(0, vec![sampler(0, "s"), texture(1, "t")]).unwrap();
    let a = MergedSet::seeded_from(&a);
    assert!(unique_uniform_structs([&a]).is_empty());
}

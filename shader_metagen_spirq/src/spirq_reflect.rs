/// SPIR-V reflection with spirq, converted to the shader_metagen data model

use rustc_hash::FxHashMap;
use shader_metagen::metagen::{
    bindings_equal, AttributeFormat, DescriptorBinding, DescriptorKind, Error, ImageFormat,
    ImageShape, InterfaceVariable, MemberType, ReflectedSet, Result, SampledUsage, ScalarKind,
    ShaderModule, StructMember, StructShape, MAX_DESCRIPTOR_SETS,
};
use shader_metagen::{metagen_debug, metagen_trace};

/// Reflect SPIR-V words into a ShaderModule
///
/// Descriptors of every entry point are collected and deduplicated by
/// `(set, binding)`. Stage inputs are deduplicated by location.
///
/// # Errors
///
/// Returns `Error::LoadFailed` if spirq rejects the binary, if the same
/// `(set, binding)` is declared twice with different shapes, if a set index
/// is 4 or more, if a binding slot is above `MAX_BINDING_SLOT`, or if a
/// descriptor type is not supported. The error is not logged here; the
/// module cache logs load failures.
pub fn reflect_words(filename: &str, words: &[u32]) -> Result<ShaderModule> {
    let entry_points = spirq::ReflectConfig::new()
        .spv(words)
        .ref_all_rscs(true)
        .reflect()
        .map_err(|e| load_failed(filename, format!("SPIR-V reflection failed: {:?}", e)))?;

    let mut bindings: FxHashMap<(u32, u32), DescriptorBinding> = FxHashMap::default();
    let mut inputs: FxHashMap<u32, InterfaceVariable> = FxHashMap::default();

    for entry_point in &entry_points {
        for var in entry_point.vars.iter() {
            match var {
                spirq::var::Variable::Descriptor {
                    name, desc_bind, desc_ty, ty, nbind, ..
                } => {
                    let set = desc_bind.set();
                    let slot = desc_bind.bind();
                    if set as usize >= MAX_DESCRIPTOR_SETS {
                        return Err(load_failed(filename, format!(
                            "'{}' uses descriptor set {} (only sets 0..{} are supported)",
                            name.clone().unwrap_or_default(), set, MAX_DESCRIPTOR_SETS - 1
                        )));
                    }

                    let binding = convert_descriptor(
                        slot,
                        name.clone().unwrap_or_default(),
                        desc_ty,
                        ty,
                        (*nbind).max(1),
                    )
                    .map_err(|reason| load_failed(filename, reason))?;

                    match bindings.get(&(set, slot)) {
                        Some(existing) if !bindings_equal(existing, &binding) => {
                            return Err(load_failed(filename, format!(
                                "set {} binding {} is declared as both {} and {}",
                                set, slot, existing.describe(), binding.describe()
                            )));
                        }
                        Some(_) => {}
                        None => {
                            metagen_trace!("shader_metagen::spirq",
                                "'{}': set {} binding {} = {}", filename, set, slot, binding.describe());
                            bindings.insert((set, slot), binding);
                        }
                    }
                }
                spirq::var::Variable::Input { name, location, ty, .. } => {
                    let location = location.loc();
                    inputs.entry(location).or_insert_with(|| InterfaceVariable {
                        name: name.clone().unwrap_or_default(),
                        location,
                        format: attribute_format(ty),
                    });
                }
                _ => {}
            }
        }
    }

    // Group by set index
    let mut per_set: FxHashMap<u32, Vec<DescriptorBinding>> = FxHashMap::default();
    for ((set, _), binding) in bindings {
        per_set.entry(set).or_default().push(binding);
    }
    let sets = per_set
        .into_iter()
        .map(|(set, bindings)| ReflectedSet::new(set, bindings))
        .collect::<Result<Vec<_>>>()
        .map_err(|e| load_failed(filename, e.to_string()))?;

    metagen_debug!("shader_metagen::spirq",
        "'{}': {} entry points, {} descriptor sets, {} inputs",
        filename, entry_points.len(), sets.len(), inputs.len());

    ShaderModule::new(filename, sets, inputs.into_values().collect())
}

fn load_failed(filename: &str, reason: String) -> Error {
    Error::LoadFailed {
        filename: filename.to_string(),
        reason,
    }
}

// ============================================================================
// Descriptor conversion
// ============================================================================

/// Convert one spirq descriptor into a DescriptorBinding
fn convert_descriptor(
    slot: u32,
    name: String,
    desc_ty: &spirq::ty::DescriptorType,
    ty: &spirq::ty::Type,
    count: u32,
) -> std::result::Result<DescriptorBinding, String> {
    let kind = descriptor_kind(desc_ty)?;

    let binding = if kind == DescriptorKind::UniformBuffer {
        DescriptorBinding::uniform_buffer(slot, &name, struct_shape(ty))
    } else {
        DescriptorBinding::image(slot, &name, kind, image_shape(ty))
    };
    Ok(binding.with_count(count))
}

/// Map a spirq descriptor type to a DescriptorKind
fn descriptor_kind(desc_ty: &spirq::ty::DescriptorType) -> std::result::Result<DescriptorKind, String> {
    use spirq::ty::DescriptorType;
    match desc_ty {
        DescriptorType::Sampler(..) => Ok(DescriptorKind::Sampler),
        DescriptorType::CombinedImageSampler(..) => Ok(DescriptorKind::CombinedImageSampler),
        DescriptorType::SampledImage(..) => Ok(DescriptorKind::SampledImage),
        DescriptorType::StorageImage(..) => Ok(DescriptorKind::StorageImage),
        DescriptorType::UniformTexelBuffer(..) => Ok(DescriptorKind::UniformTexelBuffer),
        DescriptorType::StorageTexelBuffer(..) => Ok(DescriptorKind::StorageTexelBuffer),
        DescriptorType::UniformBuffer(..) => Ok(DescriptorKind::UniformBuffer),
        DescriptorType::StorageBuffer(..) => Ok(DescriptorKind::StorageBuffer),
        DescriptorType::InputAttachment(..) => Ok(DescriptorKind::InputAttachment),
        DescriptorType::AccelStruct(..) => Ok(DescriptorKind::AccelerationStructure),
        #[allow(unreachable_patterns)]
        other => Err(format!("unsupported descriptor type {:?}", other)),
    }
}

/// Block shape of a uniform buffer
fn struct_shape(ty: &spirq::ty::Type) -> StructShape {
    match ty {
        spirq::ty::Type::Struct(st) => {
            let members = st
                .members
                .iter()
                .map(|m| StructMember {
                    name: m.name.clone().unwrap_or_default(),
                    offset: m.offset.unwrap_or(0) as u32,
                    member_type: member_type(&m.ty),
                })
                .collect();
            StructShape::block(
                &st.name.clone().unwrap_or_default(),
                members,
                ty.nbyte().map(|size| size as u32),
            )
        }
        _ => StructShape::block("", Vec::new(), ty.nbyte().map(|size| size as u32)),
    }
}

/// Image traits of an image-like descriptor (default for everything else)
fn image_shape(ty: &spirq::ty::Type) -> ImageShape {
    use spirq::ty::Type;
    match ty {
        Type::SampledImage(img) => ImageShape {
            format: ImageFormat::Unknown,
            sampled: SampledUsage::Sampled,
            multisampled: img.is_multisampled,
        },
        Type::CombinedImageSampler(img) => ImageShape {
            format: ImageFormat::Unknown,
            sampled: SampledUsage::Sampled,
            multisampled: img.sampled_image_ty.is_multisampled,
        },
        Type::StorageImage(img) => ImageShape {
            format: ImageFormat::from_spirv_name(&format!("{:?}", img.fmt)),
            sampled: SampledUsage::Storage,
            multisampled: img.is_multisampled,
        },
        Type::SubpassData(img) => ImageShape {
            format: ImageFormat::Unknown,
            sampled: SampledUsage::Storage,
            multisampled: img.is_multisampled,
        },
        _ => ImageShape::default(),
    }
}

// ============================================================================
// Type conversion
// ============================================================================

fn scalar_kind(scalar_ty: &spirq::ty::ScalarType) -> ScalarKind {
    use spirq::ty::ScalarType;
    match scalar_ty {
        ScalarType::Float { bits: 64 } => ScalarKind::Float64,
        ScalarType::Float { .. } => ScalarKind::Float32,
        ScalarType::Integer { is_signed: true, .. } => ScalarKind::Int32,
        ScalarType::Integer { is_signed: false, .. } => ScalarKind::UInt32,
        ScalarType::Boolean => ScalarKind::Bool,
        ScalarType::Void => ScalarKind::Float32,
    }
}

/// Convert a struct member type (recursively for arrays)
fn member_type(ty: &spirq::ty::Type) -> MemberType {
    use spirq::ty::Type;
    match ty {
        Type::Scalar(s) => MemberType::Scalar(scalar_kind(s)),
        Type::Vector(v) => MemberType::Vector(scalar_kind(&v.scalar_ty), v.nscalar),
        Type::Matrix(m) => MemberType::Matrix(
            scalar_kind(&m.vector_ty.scalar_ty),
            m.nvector,
            m.vector_ty.nscalar,
        ),
        Type::Array(a) => MemberType::Array {
            element: Box::new(member_type(&a.element_ty)),
            count: a.nelement,
        },
        Type::Struct(st) => MemberType::Struct(st.name.clone().unwrap_or_default()),
        // Opaque types never appear inside uniform blocks
        _ => MemberType::Scalar(ScalarKind::Float32),
    }
}

/// Vertex attribute format of a stage input
fn attribute_format(ty: &spirq::ty::Type) -> AttributeFormat {
    use spirq::ty::Type;
    let (kind, components) = match ty {
        Type::Scalar(s) => (scalar_kind(s), 1),
        Type::Vector(v) => (scalar_kind(&v.scalar_ty), v.nscalar),
        _ => return AttributeFormat::Undefined,
    };
    match (kind, components) {
        (ScalarKind::Float32, 1) => AttributeFormat::R32_SFLOAT,
        (ScalarKind::Float32, 2) => AttributeFormat::R32G32_SFLOAT,
        (ScalarKind::Float32, 3) => AttributeFormat::R32G32B32_SFLOAT,
        (ScalarKind::Float32, 4) => AttributeFormat::R32G32B32A32_SFLOAT,
        (ScalarKind::Int32, 1) => AttributeFormat::R32_SINT,
        (ScalarKind::Int32, 2) => AttributeFormat::R32G32_SINT,
        (ScalarKind::Int32, 3) => AttributeFormat::R32G32B32_SINT,
        (ScalarKind::Int32, 4) => AttributeFormat::R32G32B32A32_SINT,
        (ScalarKind::UInt32, 1) => AttributeFormat::R32_UINT,
        (ScalarKind::UInt32, 2) => AttributeFormat::R32G32_UINT,
        (ScalarKind::UInt32, 3) => AttributeFormat::R32G32B32_UINT,
        (ScalarKind::UInt32, 4) => AttributeFormat::R32G32B32A32_UINT,
        _ => AttributeFormat::Undefined,
    }
}

#[cfg(test)]
#[path = "spirq_reflect_tests.rs"]
mod tests;

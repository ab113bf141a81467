/// Mock shader loader for unit tests (no shader files required)
///
/// Modules are registered up front from hand-written bindings. Every call to
/// `load` is counted so tests can check the cache's load-once behavior.

#[cfg(test)]
use std::sync::{Arc, Mutex};
#[cfg(test)]
use rustc_hash::FxHashMap;

#[cfg(test)]
use crate::descriptor::{
    DescriptorBinding, DescriptorKind, ImageShape, ReflectedSet, StructMember, StructShape,
    MemberType, ScalarKind,
};
#[cfg(test)]
use crate::error::{Error, Result};
#[cfg(test)]
use crate::module::{InterfaceVariable, ShaderLoader, ShaderModule};

#[cfg(test)]
#[derive(Clone, Default)]
pub struct MockLoader {
    modules: FxHashMap<String, (Vec<ReflectedSet>, Vec<InterfaceVariable>)>,
    loads: Arc<Mutex<Vec<String>>>,
}

#[cfg(test)]
impl MockLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file whose module declares `sets`
    pub fn with_module(mut self, filename: &str, sets: Vec<ReflectedSet>) -> Self {
        self.modules.insert(filename.to_string(), (sets, Vec::new()));
        self
    }

    /// Register a file with stage inputs as well
    pub fn with_inputs(
        mut self,
        filename: &str,
        sets: Vec<ReflectedSet>,
        inputs: Vec<InterfaceVariable>,
    ) -> Self {
        self.modules.insert(filename.to_string(), (sets, inputs));
        self
    }

    /// Shared log of every file name passed to `load`
    pub fn load_log(&self) -> Arc<Mutex<Vec<String>>> {
        self.loads.clone()
    }
}

#[cfg(test)]
impl ShaderLoader for MockLoader {
    fn load(&mut self, filename: &str) -> Result<ShaderModule> {
        if let Ok(mut loads) = self.loads.lock() {
            loads.push(filename.to_string());
        }
        match self.modules.get(filename) {
            Some((sets, inputs)) => ShaderModule::new(filename, sets.clone(), inputs.clone()),
            None => Err(Error::LoadFailed {
                filename: filename.to_string(),
                reason: "no such file".to_string(),
            }),
        }
    }
}

// ============================================================================
// Binding builders shared by unit tests
// ============================================================================

#[cfg(test)]
pub fn sampler(slot: u32, name: &str) -> DescriptorBinding {
    DescriptorBinding::image(slot, name, DescriptorKind::Sampler, ImageShape::default())
}

#[cfg(test)]
pub fn texture(slot: u32, name: &str) -> DescriptorBinding {
    DescriptorBinding::image(
        slot,
        name,
        DescriptorKind::CombinedImageSampler,
        ImageShape {
            sampled: crate::descriptor::SampledUsage::Sampled,
            ..ImageShape::default()
        },
    )
}

/// Uniform buffer whose struct has `member_count` vec4 members
#[cfg(test)]
pub fn uniform(slot: u32, name: &str, type_name: &str, member_count: u32) -> DescriptorBinding {
    let members = (0..member_count)
        .map(|i| StructMember {
            name: format!("m{}", i),
            offset: i * 16,
            member_type: MemberType::Vector(ScalarKind::Float32, 4),
        })
        .collect();
    DescriptorBinding::uniform_buffer(
        slot,
        name,
        StructShape::block(type_name, members, Some(member_count * 16)),
    )
}

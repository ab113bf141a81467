/// Reflection result of one compiled shader file

use crate::descriptor::{ReflectedSet, MAX_DESCRIPTOR_SETS};
use crate::error::{Error, Result};

/// Pipeline stage a shader module is compiled for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Fragment shader
    Fragment,
    /// Compute shader
    Compute,
}

/// Vertex attribute format of a stage input variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum AttributeFormat {
    R32_SFLOAT,
    R32G32_SFLOAT,
    R32G32B32_SFLOAT,
    R32G32B32A32_SFLOAT,
    R32_SINT,
    R32G32_SINT,
    R32G32B32_SINT,
    R32G32B32A32_SINT,
    R32_UINT,
    R32G32_UINT,
    R32G32B32_UINT,
    R32G32B32A32_UINT,
    Undefined,
}

impl AttributeFormat {
    /// Vulkan enumerant name, as emitted by the generator
    pub fn vk_name(&self) -> &'static str {
        match self {
            AttributeFormat::R32_SFLOAT => "VK_FORMAT_R32_SFLOAT",
            AttributeFormat::R32G32_SFLOAT => "VK_FORMAT_R32G32_SFLOAT",
            AttributeFormat::R32G32B32_SFLOAT => "VK_FORMAT_R32G32B32_SFLOAT",
            AttributeFormat::R32G32B32A32_SFLOAT => "VK_FORMAT_R32G32B32A32_SFLOAT",
            AttributeFormat::R32_SINT => "VK_FORMAT_R32_SINT",
            AttributeFormat::R32G32_SINT => "VK_FORMAT_R32G32_SINT",
            AttributeFormat::R32G32B32_SINT => "VK_FORMAT_R32G32B32_SINT",
            AttributeFormat::R32G32B32A32_SINT => "VK_FORMAT_R32G32B32A32_SINT",
            AttributeFormat::R32_UINT => "VK_FORMAT_R32_UINT",
            AttributeFormat::R32G32_UINT => "VK_FORMAT_R32G32_UINT",
            AttributeFormat::R32G32B32_UINT => "VK_FORMAT_R32G32B32_UINT",
            AttributeFormat::R32G32B32A32_UINT => "VK_FORMAT_R32G32B32A32_UINT",
            AttributeFormat::Undefined => "VK_FORMAT_UNDEFINED",
        }
    }
}

/// Stage input variable (vertex attribute)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceVariable {
    pub name: String,
    pub location: u32,
    pub format: AttributeFormat,
}

impl InterfaceVariable {
    /// Per-instance inputs are named with an `_i` suffix
    pub fn is_per_instance(&self) -> bool {
        self.name.ends_with("_i")
    }
}

/// Opaque reflection result for one shader file
///
/// Owns every DescriptorBinding it exposes. Modules live in the ModuleCache
/// for the whole reconciliation run.
#[derive(Debug, Clone)]
pub struct ShaderModule {
    filename: String,
    sets: Vec<ReflectedSet>,
    inputs: Vec<InterfaceVariable>,
}

impl ShaderModule {
    /// Build a module from reflected sets and inputs
    ///
    /// # Errors
    ///
    /// Returns `Error::LoadFailed` if a set index is outside 0..=3 or the same
    /// set index is reflected twice.
    pub fn new(
        filename: &str,
        mut sets: Vec<ReflectedSet>,
        mut inputs: Vec<InterfaceVariable>,
    ) -> Result<Self> {
        sets.sort_by_key(|set| set.set_index());
        for pair in sets.windows(2) {
            if pair[0].set_index() == pair[1].set_index() {
                return Err(Error::LoadFailed {
                    filename: filename.to_string(),
                    reason: format!("descriptor set {} reflected twice", pair[0].set_index()),
                });
            }
        }
        if let Some(set) = sets.iter().find(|set| set.set_index() as usize >= MAX_DESCRIPTOR_SETS) {
            return Err(Error::LoadFailed {
                filename: filename.to_string(),
                reason: format!(
                    "descriptor set index {} exceeds the {} supported sets",
                    set.set_index(),
                    MAX_DESCRIPTOR_SETS
                ),
            });
        }
        inputs.sort_by_key(|input| input.location);

        Ok(Self {
            filename: filename.to_string(),
            sets,
            inputs,
        })
    }

    /// File this module was reflected from
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Descriptor set declared at `set_index`, if any
    pub fn descriptor_set(&self, set_index: u32) -> Option<&ReflectedSet> {
        self.sets.iter().find(|set| set.set_index() == set_index)
    }

    /// All declared descriptor sets, in set index order
    pub fn descriptor_sets(&self) -> &[ReflectedSet] {
        &self.sets
    }

    /// Stage input variables, in location order
    pub fn input_variables(&self) -> &[InterfaceVariable] {
        &self.inputs
    }
}

#[cfg(test)]
#[path = "shader_module_tests.rs"]
mod tests;

/// Reflected descriptor binding and its shape information
///
/// A DescriptorBinding is immutable once reflected. It is owned by the
/// ShaderModule that produced it and only ever borrowed by merged sets.

use bitflags::bitflags;

/// Resource kind bound at a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorKind {
    Sampler,
    CombinedImageSampler,
    SampledImage,
    StorageImage,
    UniformTexelBuffer,
    StorageTexelBuffer,
    UniformBuffer,
    StorageBuffer,
    UniformBufferDynamic,
    StorageBufferDynamic,
    InputAttachment,
    AccelerationStructure,
}

impl DescriptorKind {
    /// Vulkan enumerant name, as emitted by the generator
    pub fn vk_name(&self) -> &'static str {
        match self {
            DescriptorKind::Sampler => "VK_DESCRIPTOR_TYPE_SAMPLER",
            DescriptorKind::CombinedImageSampler => "VK_DESCRIPTOR_TYPE_COMBINED_IMAGE_SAMPLER",
            DescriptorKind::SampledImage => "VK_DESCRIPTOR_TYPE_SAMPLED_IMAGE",
            DescriptorKind::StorageImage => "VK_DESCRIPTOR_TYPE_STORAGE_IMAGE",
            DescriptorKind::UniformTexelBuffer => "VK_DESCRIPTOR_TYPE_UNIFORM_TEXEL_BUFFER",
            DescriptorKind::StorageTexelBuffer => "VK_DESCRIPTOR_TYPE_STORAGE_TEXEL_BUFFER",
            DescriptorKind::UniformBuffer => "VK_DESCRIPTOR_TYPE_UNIFORM_BUFFER",
            DescriptorKind::StorageBuffer => "VK_DESCRIPTOR_TYPE_STORAGE_BUFFER",
            DescriptorKind::UniformBufferDynamic => "VK_DESCRIPTOR_TYPE_UNIFORM_BUFFER_DYNAMIC",
            DescriptorKind::StorageBufferDynamic => "VK_DESCRIPTOR_TYPE_STORAGE_BUFFER_DYNAMIC",
            DescriptorKind::InputAttachment => "VK_DESCRIPTOR_TYPE_INPUT_ATTACHMENT",
            DescriptorKind::AccelerationStructure => "VK_DESCRIPTOR_TYPE_ACCELERATION_STRUCTURE_KHR",
        }
    }
}

bitflags! {
    /// Type classification flags of a reflected type description
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TypeFlags: u32 {
        const VOID = 0x0000_0001;
        const BOOL = 0x0000_0002;
        const INT = 0x0000_0004;
        const FLOAT = 0x0000_0008;
        const VECTOR = 0x0000_0100;
        const MATRIX = 0x0000_0200;
        const EXTERNAL_IMAGE = 0x0001_0000;
        const EXTERNAL_SAMPLER = 0x0002_0000;
        const EXTERNAL_SAMPLED_IMAGE = 0x0004_0000;
        const EXTERNAL_BLOCK = 0x0008_0000;
        const EXTERNAL_ACCELERATION_STRUCTURE = 0x0010_0000;
        const STRUCT = 0x1000_0000;
        const ARRAY = 0x2000_0000;
    }
}

/// Scalar component kind of a struct member or input variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Float32,
    Float64,
    Int32,
    UInt32,
    Bool,
}

/// Shape of one struct member, as far as the generator needs it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberType {
    Scalar(ScalarKind),
    /// Scalar kind, component count
    Vector(ScalarKind, u32),
    /// Scalar kind, column count, row count
    Matrix(ScalarKind, u32, u32),
    Array {
        element: Box<MemberType>,
        count: Option<u32>,
    },
    /// Nested struct (by type name)
    Struct(String),
}

impl MemberType {
    /// GLSL-style spelling used in generated struct definitions
    pub fn glsl_name(&self) -> String {
        fn prefix(kind: ScalarKind) -> &'static str {
            match kind {
                ScalarKind::Float32 => "",
                ScalarKind::Float64 => "d",
                ScalarKind::Int32 => "i",
                ScalarKind::UInt32 => "u",
                ScalarKind::Bool => "b",
            }
        }
        match self {
            MemberType::Scalar(ScalarKind::Float32) => "float".to_string(),
            MemberType::Scalar(ScalarKind::Float64) => "double".to_string(),
            MemberType::Scalar(ScalarKind::Int32) => "int".to_string(),
            MemberType::Scalar(ScalarKind::UInt32) => "unsigned int".to_string(),
            MemberType::Scalar(ScalarKind::Bool) => "bool".to_string(),
            MemberType::Vector(kind, n) => format!("{}vec{}", prefix(*kind), n),
            MemberType::Matrix(kind, cols, rows) => format!("{}mat{}x{}", prefix(*kind), cols, rows),
            MemberType::Array { element, .. } => element.glsl_name(),
            MemberType::Struct(name) => name.clone(),
        }
    }
}

/// One member of a uniform block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructMember {
    pub name: String,
    pub offset: u32,
    pub member_type: MemberType,
}

/// Struct shape of a buffer binding
///
/// Only `(type_flags, type_name, member_count)` take part in binding
/// equality. `members` and `size` are carried for the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructShape {
    pub type_name: String,
    pub member_count: u32,
    pub type_flags: TypeFlags,
    pub members: Vec<StructMember>,
    /// Byte size of the block, when known
    pub size: Option<u32>,
}

impl StructShape {
    /// Build a block shape from its members (member_count follows members)
    pub fn block(type_name: &str, members: Vec<StructMember>, size: Option<u32>) -> Self {
        Self {
            type_name: type_name.to_string(),
            member_count: members.len() as u32,
            type_flags: TypeFlags::STRUCT | TypeFlags::EXTERNAL_BLOCK,
            members,
            size,
        }
    }
}

/// Image format of an image binding
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ImageFormat {
    #[default]
    Unknown,
    Rgba32f,
    Rgba16f,
    R32f,
    Rgba8,
    Rgba8Snorm,
    Rg32f,
    Rg16f,
    R16f,
    Rgba32i,
    Rgba32ui,
    R32i,
    R32ui,
    /// Any other format, by its SPIR-V name
    Other(String),
}

impl ImageFormat {
    /// Parse a SPIR-V `ImageFormat` enumerant name
    pub fn from_spirv_name(name: &str) -> Self {
        match name {
            "Unknown" => ImageFormat::Unknown,
            "Rgba32f" => ImageFormat::Rgba32f,
            "Rgba16f" => ImageFormat::Rgba16f,
            "R32f" => ImageFormat::R32f,
            "Rgba8" => ImageFormat::Rgba8,
            "Rgba8Snorm" => ImageFormat::Rgba8Snorm,
            "Rg32f" => ImageFormat::Rg32f,
            "Rg16f" => ImageFormat::Rg16f,
            "R16f" => ImageFormat::R16f,
            "Rgba32i" => ImageFormat::Rgba32i,
            "Rgba32ui" => ImageFormat::Rgba32ui,
            "R32i" => ImageFormat::R32i,
            "R32ui" => ImageFormat::R32ui,
            other => ImageFormat::Other(other.to_string()),
        }
    }
}

/// Whether an image is accessed through a sampler or as storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SampledUsage {
    /// Not known at compile time (or not an image)
    #[default]
    Unknown,
    Sampled,
    Storage,
}

/// Image traits of an image-like binding
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ImageShape {
    pub format: ImageFormat,
    pub sampled: SampledUsage,
    pub multisampled: bool,
}

/// Shape information attached to a binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingShape {
    Struct(StructShape),
    Image(ImageShape),
}

impl BindingShape {
    pub fn as_struct(&self) -> Option<&StructShape> {
        match self {
            BindingShape::Struct(shape) => Some(shape),
            BindingShape::Image(_) => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageShape> {
        match self {
            BindingShape::Image(shape) => Some(shape),
            BindingShape::Struct(_) => None,
        }
    }
}

impl Default for BindingShape {
    fn default() -> Self {
        BindingShape::Image(ImageShape::default())
    }
}

/// One reflected binding slot of a descriptor set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorBinding {
    /// Binding number (`layout(binding = N)`)
    pub slot: u32,
    /// Variable name in the shader
    pub name: String,
    /// Resource kind
    pub kind: DescriptorKind,
    /// Number of descriptors (>1 for arrays)
    pub count: u32,
    /// Struct or image traits
    pub shape: BindingShape,
}

impl DescriptorBinding {
    /// Uniform buffer binding with a block shape
    pub fn uniform_buffer(slot: u32, name: &str, shape: StructShape) -> Self {
        Self {
            slot,
            name: name.to_string(),
            kind: DescriptorKind::UniformBuffer,
            count: 1,
            shape: BindingShape::Struct(shape),
        }
    }

    /// Any non-buffer binding with image traits
    pub fn image(slot: u32, name: &str, kind: DescriptorKind, shape: ImageShape) -> Self {
        Self {
            slot,
            name: name.to_string(),
            kind,
            count: 1,
            shape: BindingShape::Image(shape),
        }
    }

    /// Same binding with a different descriptor count
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Short human-readable description of kind and shape (for diagnostics)
    pub fn describe(&self) -> String {
        let shape = match &self.shape {
            BindingShape::Struct(s) => {
                format!("struct {} with {} members", s.type_name, s.member_count)
            }
            BindingShape::Image(i) => format!(
                "image {:?}, {:?}{}",
                i.format,
                i.sampled,
                if i.multisampled { ", multisampled" } else { "" }
            ),
        };
        format!("{:?} x{}, {}", self.kind, self.count, shape)
    }
}

/*!
# Shader Metagen - spirq Backend

SPIR-V reflection backend for shader_metagen.

This crate implements the `ShaderLoader` trait with the spirq reflection
library: `.spv` files are read from a shader directory, reflected once, and
converted into `ShaderModule`s with their descriptor sets and stage inputs.
*/

mod spirq_loader;
mod spirq_reflect;

pub use spirq_loader::{decode_words, SpirqLoader, SPIRV_MAGIC};
pub use spirq_reflect::reflect_words;

#[cfg(test)]
mod spirv_asm;

/// File-backed ShaderLoader reflecting `.spv` binaries with spirq

use std::path::{Path, PathBuf};
use shader_metagen::metagen::{Error, Result, ShaderLoader, ShaderModule};
use shader_metagen::metagen_info;
use crate::spirq_reflect::reflect_words;

/// SPIR-V magic number, in the file's own byte order
pub const SPIRV_MAGIC: u32 = 0x0723_0203;

/// Shader loader reading SPIR-V files from one directory
///
/// # Example
///
/// ```no_run
/// use shader_metagen::metagen::{GlobalSetDecl, PipelineConfig, Reconciler, ShaderStage};
/// use shader_metagen_spirq::SpirqLoader;
///
/// let pipelines = vec![
///     PipelineConfig::new("basic", 0)
///         .with_stage("basic.vert.spv", ShaderStage::Vertex)
///         .with_stage("basic.frag.spv", ShaderStage::Fragment),
/// ];
///
/// let mut reconciler = Reconciler::new(SpirqLoader::new("assets/shaders"));
/// let output = reconciler.run(&pipelines, &[GlobalSetDecl::new(0, "scene_globals")]);
/// ```
#[derive(Debug, Clone)]
pub struct SpirqLoader {
    shader_dir: PathBuf,
}

impl SpirqLoader {
    /// Create a loader resolving file names relative to `shader_dir`
    pub fn new(shader_dir: impl AsRef<Path>) -> Self {
        Self {
            shader_dir: shader_dir.as_ref().to_path_buf(),
        }
    }

    /// Directory file names are resolved against
    pub fn shader_dir(&self) -> &Path {
        &self.shader_dir
    }
}

impl ShaderLoader for SpirqLoader {
    fn load(&mut self, filename: &str) -> Result<ShaderModule> {
        let path = self.shader_dir.join(filename);
        let bytes = std::fs::read(&path).map_err(|e| Error::LoadFailed {
            filename: filename.to_string(),
            reason: format!("cannot read '{}': {}", path.display(), e),
        })?;

        let words = decode_words(&bytes).map_err(|reason| Error::LoadFailed {
            filename: filename.to_string(),
            reason,
        })?;

        metagen_info!("shader_metagen::spirq",
            "Reflecting '{}' ({} words)", path.display(), words.len());

        reflect_words(filename, &words)
    }
}

/// Decode a SPIR-V file into words
///
/// Words are little-endian unless the magic number reads reversed, in which
/// case every word is byte-swapped.
///
/// # Errors
///
/// Returns a reason string if the file is empty, not a multiple of 4 bytes,
/// or does not start with the SPIR-V magic number.
pub fn decode_words(bytes: &[u8]) -> std::result::Result<Vec<u32>, String> {
    if bytes.is_empty() {
        return Err("file is empty".to_string());
    }
    if bytes.len() % 4 != 0 {
        return Err(format!("file size {} is not a multiple of 4 bytes", bytes.len()));
    }

    let mut words: Vec<u32> = bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    match words[0] {
        SPIRV_MAGIC => {}
        magic if magic == SPIRV_MAGIC.swap_bytes() => {
            for word in &mut words {
                *word = word.swap_bytes();
            }
        }
        other => return Err(format!("bad SPIR-V magic number {:#010x}", other)),
    }

    Ok(words)
}

#[cfg(test)]
#[path = "spirq_loader_tests.rs"]
mod tests;

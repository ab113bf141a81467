/// Declared pipeline and global set input
///
/// These types declare intent only. Nothing here is reflected; the reconciler
/// resolves stage file names through the ModuleCache.

use crate::module::ShaderStage;

/// Identifies which shader file backs one pipeline stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageDescriptor {
    /// Shader file name, resolved by the loader
    pub filename: String,
    /// Stage the file is compiled for
    pub stage: ShaderStage,
}

impl StageDescriptor {
    pub fn new(filename: &str, stage: ShaderStage) -> Self {
        Self {
            filename: filename.to_string(),
            stage,
        }
    }
}

/// One pipeline: a name, the global set it shares, and its stages in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub name: String,
    /// Identifier of the global descriptor set used at set index 0
    pub global_set_id: u32,
    /// Stages in declaration order (order only affects conflict messages)
    pub stages: Vec<StageDescriptor>,
}

impl PipelineConfig {
    pub fn new(name: &str, global_set_id: u32) -> Self {
        Self {
            name: name.to_string(),
            global_set_id,
            stages: Vec::new(),
        }
    }

    /// Append a stage
    pub fn with_stage(mut self, filename: &str, stage: ShaderStage) -> Self {
        self.stages.push(StageDescriptor::new(filename, stage));
        self
    }

    /// First stage of the given kind, if any
    pub fn stage(&self, stage: ShaderStage) -> Option<&StageDescriptor> {
        self.stages.iter().find(|s| s.stage == stage)
    }
}

/// Declared global descriptor set: a shared identifier with a readable name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalSetDecl {
    pub id: u32,
    pub name: String,
}

impl GlobalSetDecl {
    pub fn new(id: u32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

/// Reconciler settings
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Treat a pipeline that references an undeclared global id as an error
    /// (when false, its global partial set is dropped with a warning)
    pub strict_global_ids: bool,
    /// Warn when a declared global id has no contributing pipeline
    pub warn_unused_globals: bool,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            strict_global_ids: true,
            warn_unused_globals: true,
        }
    }
}

/// Shader module cache
///
/// Loads each distinct shader file at most once and keeps every module alive
/// for the rest of the run. Merged descriptor sets borrow their bindings from
/// the modules stored here, so the borrow checker forbids `release_all` while
/// any merged set is still alive.

use std::collections::hash_map::Entry;
use rustc_hash::FxHashMap;
use crate::error::{Error, Result};
use crate::module::ShaderModule;
use crate::pipeline::PipelineConfig;
use crate::{metagen_err, metagen_info, metagen_trace};

/// Reflection backend: turns a shader file name into a ShaderModule
///
/// Implemented by backend crates (e.g. the spirq loader). The cache calls
/// `load` at most once per distinct file name.
pub trait ShaderLoader {
    /// Read and reflect one shader file
    ///
    /// # Errors
    ///
    /// Returns `Error::LoadFailed` if the file cannot be read or reflected.
    /// The error is returned unlogged; the cache logs it.
    fn load(&mut self, filename: &str) -> Result<ShaderModule>;
}

/// Cache of reflected shader modules keyed by file name
pub struct ModuleCache {
    loader: Box<dyn ShaderLoader>,
    modules: FxHashMap<String, ShaderModule>,
    load_count: usize,
}

impl ModuleCache {
    /// Create an empty cache backed by `loader`
    pub fn new<L: ShaderLoader + 'static>(loader: L) -> Self {
        Self {
            loader: Box::new(loader),
            modules: FxHashMap::default(),
            load_count: 0,
        }
    }

    /// Get a module, reflecting the file on first request
    ///
    /// # Errors
    ///
    /// Returns `Error::LoadFailed` (logged) if the loader fails. Failed files
    /// are not cached, so a later request retries the load.
    pub fn get_or_load(&mut self, filename: &str) -> Result<&ShaderModule> {
        match self.modules.entry(filename.to_string()) {
            Entry::Occupied(entry) => {
                metagen_trace!("shader_metagen::ModuleCache", "Cache hit for '{}'", filename);
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                self.load_count += 1;
                let module = self
                    .loader
                    .load(filename)
                    .map_err(|e| metagen_err!("shader_metagen::ModuleCache", e))?;
                metagen_info!("shader_metagen::ModuleCache",
                    "Loaded '{}' ({} descriptor sets, {} inputs)",
                    filename, module.descriptor_sets().len(), module.input_variables().len());
                Ok(entry.insert(module))
            }
        }
    }

    /// Load every file referenced by the stages of `pipelines`
    ///
    /// Each distinct file is reflected once. Returns the load errors; files
    /// that loaded successfully stay cached even when others fail.
    pub fn load_pipelines<'p>(
        &mut self,
        pipelines: impl IntoIterator<Item = &'p PipelineConfig>,
    ) -> Vec<Error> {
        let mut errors = Vec::new();
        for pipeline in pipelines {
            for stage in &pipeline.stages {
                if self.modules.contains_key(&stage.filename) {
                    continue;
                }
                if let Err(e) = self.get_or_load(&stage.filename) {
                    errors.push(e.in_pipeline(&pipeline.name));
                }
            }
        }
        errors
    }

    /// Get an already loaded module
    pub fn get(&self, filename: &str) -> Option<&ShaderModule> {
        self.modules.get(filename)
    }

    /// Get an already loaded module, or `Error::ModuleNotLoaded`
    pub fn module(&self, filename: &str) -> Result<&ShaderModule> {
        self.modules.get(filename).ok_or_else(|| Error::ModuleNotLoaded {
            filename: filename.to_string(),
        })
    }

    /// Number of cached modules
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether no module is cached
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Number of times the loader has been invoked
    pub fn load_count(&self) -> usize {
        self.load_count
    }

    /// Cached file names (unordered)
    pub fn filenames(&self) -> Vec<&str> {
        self.modules.keys().map(|k| k.as_str()).collect()
    }

    /// Free every cached module
    pub fn release_all(&mut self) {
        let count = self.modules.len();
        self.modules.clear();
        metagen_info!("shader_metagen::ModuleCache", "Released {} shader modules", count);
    }
}

#[cfg(test)]
#[path = "module_cache_tests.rs"]
mod tests;

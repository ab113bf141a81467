/// Reconciliation driver
///
/// Runs the whole batch in order: validate the declared input, load every
/// referenced module once, aggregate each pipeline, then populate the global
/// sets. Errors never stop the run; they are collected and returned next to
/// whatever schema could be built.

use rustc_hash::FxHashSet;
use crate::descriptor::GLOBAL_SET_INDEX;
use crate::error::Error;
use crate::module::{ModuleCache, ShaderLoader, ShaderStage};
use crate::pipeline::{
    aggregate_pipeline, populate_globals, GlobalSetDecl, PipelineConfig, ReconcilerConfig,
};
use crate::schema::{set_name, split_inputs, PipelineSchema, ReconciledSchema};
use crate::{metagen_err, metagen_info, metagen_warn};

/// Schema plus every error met while building it
#[derive(Debug)]
pub struct ReconcileOutput<'m> {
    pub schema: ReconciledSchema<'m>,
    /// Errors in the order they were found
    pub errors: Vec<Error>,
}

impl<'m> ReconcileOutput<'m> {
    /// Whether the run finished without any error
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Owns the module cache and drives reconciliation runs
///
/// # Example
///
/// ```no_run
/// use shader_metagen::metagen::{GlobalSetDecl, PipelineConfig, Reconciler, ShaderStage};
/// # use shader_metagen::metagen::{ShaderLoader, ShaderModule, Result};
/// # struct Loader;
/// # impl ShaderLoader for Loader {
/// #     fn load(&mut self, f: &str) -> Result<ShaderModule> { ShaderModule::new(f, vec![], vec![]) }
/// # }
///
/// let pipelines = vec![
///     PipelineConfig::new("basic", 0)
///         .with_stage("basic.vert.spv", ShaderStage::Vertex)
///         .with_stage("basic.frag.spv", ShaderStage::Fragment),
/// ];
/// let globals = vec![GlobalSetDecl::new(0, "scene_globals")];
///
/// let mut reconciler = Reconciler::new(Loader);
/// let output = reconciler.run(&pipelines, &globals);
/// for error in &output.errors {
///     eprintln!("{}", error);
/// }
/// ```
pub struct Reconciler {
    cache: ModuleCache,
    config: ReconcilerConfig,
}

impl Reconciler {
    /// Create a reconciler with the default configuration
    pub fn new<L: ShaderLoader + 'static>(loader: L) -> Self {
        Self {
            cache: ModuleCache::new(loader),
            config: ReconcilerConfig::default(),
        }
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: ReconcilerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Module cache (modules stay loaded between runs)
    pub fn cache(&self) -> &ModuleCache {
        &self.cache
    }

    /// Free every cached module
    ///
    /// The returned schema of a run borrows from the cache, so this can only
    /// be called once that schema has been dropped.
    pub fn release_modules(&mut self) {
        self.cache.release_all();
    }

    /// Reconcile `pipelines` against the declared `globals`
    ///
    /// Invalid pipelines, pipelines whose modules fail to load and pipelines
    /// with a binding conflict are left out of the schema. A global set with
    /// a conflict is left out too; the other globals are unaffected.
    pub fn run<'a>(
        &'a mut self,
        pipelines: &[PipelineConfig],
        globals: &[GlobalSetDecl],
    ) -> ReconcileOutput<'a> {
        metagen_info!("shader_metagen::Reconciler",
            "Reconciling {} pipelines against {} global sets", pipelines.len(), globals.len());

        let mut errors = Vec::new();
        let (pipelines, globals) = validate_input(pipelines, globals, &self.config, &mut errors);

        // Load phase: every distinct file once
        let load_errors = self.cache.load_pipelines(pipelines.iter().copied());
        let failed: FxHashSet<String> = load_errors
            .iter()
            .filter_map(|e| match e {
                Error::InPipeline { pipeline, .. } => Some(pipeline.clone()),
                _ => None,
            })
            .collect();
        errors.extend(load_errors);

        let this: &'a Reconciler = self;
        let schema = this.build_schema(&pipelines, &globals, &failed, &mut errors);

        metagen_info!("shader_metagen::Reconciler",
            "Reconciled {} pipelines and {} global sets ({} errors)",
            schema.pipelines.len(), schema.globals.len(), errors.len());

        ReconcileOutput { schema, errors }
    }

    fn build_schema<'a>(
        &'a self,
        pipelines: &[&PipelineConfig],
        globals: &[GlobalSetDecl],
        failed: &FxHashSet<String>,
        errors: &mut Vec<Error>,
    ) -> ReconciledSchema<'a> {
        let mut schema = ReconciledSchema::default();

        // Aggregate phase
        for &pipeline in pipelines {
            if failed.contains(&pipeline.name) {
                continue;
            }
            match aggregate_pipeline(pipeline, &self.cache) {
                Ok(sets) => schema.pipelines.push(self.pipeline_schema(pipeline, sets, globals)),
                Err(e) => errors.push(e),
            }
        }

        // Populate phase: only partials of declared ids take part
        let partials: Vec<_> = schema
            .pipelines
            .iter()
            .filter(|p| globals.iter().any(|g| g.id == p.global_set_id))
            .map(|p| (p.global_set_id, p.sets[GLOBAL_SET_INDEX as usize].as_ref()))
            .collect();

        if self.config.warn_unused_globals {
            for decl in globals {
                if !pipelines.iter().any(|p| p.global_set_id == decl.id) {
                    metagen_warn!("shader_metagen::Reconciler",
                        "Global set '{}' (ID={}) is not used by any pipeline", decl.name, decl.id);
                }
            }
        }

        let population = populate_globals(&partials, globals);
        for (id, result) in population {
            match result {
                Ok(global) => {
                    schema.globals.insert(id, global);
                }
                Err(e) => errors.push(e),
            }
        }

        schema
    }

    fn pipeline_schema<'a>(
        &'a self,
        pipeline: &PipelineConfig,
        sets: crate::pipeline::PipelineSets<'a>,
        globals: &[GlobalSetDecl],
    ) -> PipelineSchema<'a> {
        let inputs = pipeline
            .stage(ShaderStage::Vertex)
            .and_then(|stage| self.cache.get(&stage.filename))
            .map(|module| module.input_variables())
            .unwrap_or_default();
        let (vertex_inputs, instance_inputs) = split_inputs(inputs);

        let global_set_name = globals
            .iter()
            .find(|g| g.id == pipeline.global_set_id)
            .map(|g| g.name.clone())
            .unwrap_or_else(|| set_name(&pipeline.name, GLOBAL_SET_INDEX));

        PipelineSchema {
            name: pipeline.name.clone(),
            global_set_id: pipeline.global_set_id,
            global_set_name,
            sets,
            vertex_inputs,
            instance_inputs,
        }
    }
}

/// Check the declared input, returning the usable pipelines and globals
///
/// For duplicates the first declaration is kept. Every problem found is
/// logged and pushed to `errors` as `Error::InvalidConfig`.
fn validate_input<'p>(
    pipelines: &'p [PipelineConfig],
    globals: &[GlobalSetDecl],
    config: &ReconcilerConfig,
    errors: &mut Vec<Error>,
) -> (Vec<&'p PipelineConfig>, Vec<GlobalSetDecl>) {
    let mut valid_globals: Vec<GlobalSetDecl> = Vec::with_capacity(globals.len());
    for decl in globals {
        if valid_globals.iter().any(|g| g.id == decl.id) {
            errors.push(metagen_err!("shader_metagen::Reconciler", Error::InvalidConfig(format!(
                "global set ID {} is declared more than once ('{}')", decl.id, decl.name
            ))));
            continue;
        }
        valid_globals.push(decl.clone());
    }

    let mut names: FxHashSet<&str> = FxHashSet::default();
    let mut valid_pipelines = Vec::with_capacity(pipelines.len());
    for pipeline in pipelines {
        if !names.insert(pipeline.name.as_str()) {
            errors.push(metagen_err!("shader_metagen::Reconciler", Error::InvalidConfig(format!(
                "pipeline name '{}' is declared more than once", pipeline.name
            ))));
            continue;
        }
        if pipeline.stages.is_empty() {
            errors.push(metagen_err!("shader_metagen::Reconciler", Error::InvalidConfig(format!(
                "pipeline '{}' has no stages", pipeline.name
            ))));
            continue;
        }
        if !valid_globals.iter().any(|g| g.id == pipeline.global_set_id) {
            if config.strict_global_ids {
                errors.push(metagen_err!("shader_metagen::Reconciler", Error::InvalidConfig(format!(
                    "pipeline '{}' uses undeclared global set ID {}",
                    pipeline.name, pipeline.global_set_id
                ))));
                continue;
            }
            metagen_warn!("shader_metagen::Reconciler",
                "Pipeline '{}' uses undeclared global set ID {}, its global bindings are dropped",
                pipeline.name, pipeline.global_set_id);
        }
        valid_pipelines.push(pipeline);
    }

    (valid_pipelines, valid_globals)
}

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;

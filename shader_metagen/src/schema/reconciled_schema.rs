/// Reconciled schema handed to the code generator
///
/// Everything in here is already consistent: every pipeline aggregated
/// without conflict and every global set folded without conflict.

use std::collections::BTreeMap;
use crate::descriptor::{MergedSet, StructShape, GLOBAL_SET_INDEX};
use crate::module::InterfaceVariable;
use crate::pipeline::{GlobalDescriptorSet, PipelineSets};
use crate::schema::unique_uniform_structs;

/// Set name postfix per set index
pub const SET_POSTFIXES: [&str; 4] = ["GLOBAL", "MAT", "LOCAL", "UNKNOWN"];

/// Name of a pipeline's own set at `set_index` (e.g. `basic_MAT`)
pub fn set_name(pipeline: &str, set_index: u32) -> String {
    let postfix = SET_POSTFIXES
        .get(set_index as usize)
        .copied()
        .unwrap_or("UNKNOWN");
    format!("{}_{}", pipeline, postfix)
}

/// Name of the manager type generated for a set
pub fn manager_name(set_name: &str) -> String {
    format!("{}_IMPL", set_name)
}

/// Split stage inputs into (per-vertex, per-instance), each in location order
pub fn split_inputs(inputs: &[InterfaceVariable]) -> (Vec<InterfaceVariable>, Vec<InterfaceVariable>) {
    let (mut instance, mut vertex): (Vec<_>, Vec<_>) =
        inputs.iter().cloned().partition(InterfaceVariable::is_per_instance);
    vertex.sort_by_key(|input| input.location);
    instance.sort_by_key(|input| input.location);
    (vertex, instance)
}

// ============================================================================
// Pipeline schema
// ============================================================================

/// Generator view of one successfully aggregated pipeline
#[derive(Debug, Clone)]
pub struct PipelineSchema<'m> {
    pub name: String,
    pub global_set_id: u32,
    /// Name of the global set this pipeline binds at set index 0
    pub global_set_name: String,
    /// Merged set per set index (set index 0 holds this pipeline's partial
    /// view of its global set)
    pub sets: PipelineSets<'m>,
    pub vertex_inputs: Vec<InterfaceVariable>,
    pub instance_inputs: Vec<InterfaceVariable>,
}

impl<'m> PipelineSchema<'m> {
    /// Name of the set bound at `set_index`
    pub fn set_name(&self, set_index: u32) -> String {
        if set_index == GLOBAL_SET_INDEX {
            self.global_set_name.clone()
        } else {
            set_name(&self.name, set_index)
        }
    }

    /// The pipeline's own sets (set index 1..=3) that exist
    pub fn local_sets(&self) -> impl Iterator<Item = (u32, &MergedSet<'m>)> + '_ {
        self.sets
            .iter()
            .enumerate()
            .skip(1)
            .filter_map(|(index, set)| set.as_ref().map(|set| (index as u32, set)))
    }
}

// ============================================================================
// Full schema
// ============================================================================

/// Output of a reconciliation run
#[derive(Debug, Clone, Default)]
pub struct ReconciledSchema<'m> {
    /// Pipelines in declaration order
    pub pipelines: Vec<PipelineSchema<'m>>,
    /// Canonical global sets by id
    pub globals: BTreeMap<u32, GlobalDescriptorSet<'m>>,
}

impl<'m> ReconciledSchema<'m> {
    /// Pipeline by name
    pub fn pipeline(&self, name: &str) -> Option<&PipelineSchema<'m>> {
        self.pipelines.iter().find(|p| p.name == name)
    }

    /// Global set by id
    pub fn global(&self, id: u32) -> Option<&GlobalDescriptorSet<'m>> {
        self.globals.get(&id)
    }

    /// Uniform structs used by the global sets and every pipeline's own sets
    pub fn unique_uniform_structs(&self) -> Vec<&'m StructShape> {
        let globals = self.globals.values().map(|global| &global.merged_set);
        let locals = self
            .pipelines
            .iter()
            .flat_map(|pipeline| pipeline.local_sets().map(|(_, set)| set));
        unique_uniform_structs(globals.chain(locals))
    }
}

#[cfg(test)]
#[path = "reconciled_schema_tests.rs"]
mod tests;

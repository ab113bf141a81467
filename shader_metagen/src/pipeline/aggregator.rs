/// Stage aggregator: folds every stage of one pipeline into one set per index

use crate::descriptor::{union, MergedSet, MAX_DESCRIPTOR_SETS};
use crate::error::Result;
use crate::module::ModuleCache;
use crate::pipeline::PipelineConfig;
use crate::{metagen_debug, metagen_err};

/// Per-pipeline result: one merged set or nothing for each set index 0..=3
pub type PipelineSets<'m> = [Option<MergedSet<'m>>; MAX_DESCRIPTOR_SETS];

/// Merge the descriptor sets of every stage of `pipeline`
///
/// Each set index is folded independently, in stage declaration order:
/// - the first stage that declares the index seeds a merge-owned copy
/// - every later declaration is unioned into it, the previous accumulator
///   being dropped
/// - an index no stage declares stays `None` (not a 0-binding set)
///
/// # Errors
///
/// Returns the first error, wrapped in `Error::InPipeline`:
/// - `Error::ModuleNotLoaded` if a stage's file is not in the cache
/// - `Error::BindingConflict` if two stages disagree on a slot
pub fn aggregate_pipeline<'m>(
    pipeline: &PipelineConfig,
    cache: &'m ModuleCache,
) -> Result<PipelineSets<'m>> {
    let modules = pipeline
        .stages
        .iter()
        .map(|stage| cache.module(&stage.filename))
        .collect::<Result<Vec<_>>>()
        .map_err(|e| metagen_err!("shader_metagen::Aggregator", e.in_pipeline(&pipeline.name)))?;

    let mut sets: PipelineSets<'m> = Default::default();

    for (set_index, slot) in sets.iter_mut().enumerate() {
        let mut accumulator: Option<MergedSet<'m>> = None;

        for &module in &modules {
            let Some(candidate) = module.descriptor_set(set_index as u32) else {
                continue;
            };
            accumulator = Some(match accumulator.take() {
                None => MergedSet::seeded_from(candidate),
                Some(previous) => union(&previous, &candidate).map_err(|e| {
                    metagen_err!("shader_metagen::Aggregator", e.in_pipeline(&pipeline.name))
                })?,
            });
        }

        *slot = accumulator;
    }

    metagen_debug!("shader_metagen::Aggregator",
        "Pipeline '{}': {} stages merged into sets [{}]",
        pipeline.name,
        pipeline.stages.len(),
        describe_sets(&sets));

    Ok(sets)
}

/// Compact summary like `0:2, 1:-, 2:1, 3:-` (slot counts per set index)
pub fn describe_sets(sets: &PipelineSets<'_>) -> String {
    use crate::descriptor::BindingSource;
    sets.iter()
        .enumerate()
        .map(|(index, set)| match set {
            Some(set) => format!("{}:{}", index, set.binding_count()),
            None => format!("{}:-", index),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[path = "aggregator_tests.rs"]
mod tests;

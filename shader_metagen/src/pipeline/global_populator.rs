/// Global set populator
///
/// Groups the set-index-0 partial set of every pipeline by the global set id
/// it declares and folds each group into one canonical set.

use std::collections::BTreeMap;
use crate::descriptor::{union, BindingSource, MergedSet, GLOBAL_SET_INDEX};
use crate::error::Result;
use crate::pipeline::GlobalSetDecl;
use crate::{metagen_err, metagen_info, metagen_trace};

/// Canonical cross-pipeline schema for one global set id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalDescriptorSet<'m> {
    pub name: String,
    pub id: u32,
    pub merged_set: MergedSet<'m>,
}

/// Per-id outcome of a population pass (ordered by id)
pub type GlobalPopulation<'m> = BTreeMap<u32, Result<GlobalDescriptorSet<'m>>>;

/// Fold the global partial set of every pipeline into one set per declared id
///
/// `partials` holds `(global_set_id, slot 0 set)` per pipeline. Pipelines that
/// declare nothing at set index 0 contribute `None`, which folds as a no-op.
/// Each declared id starts from an empty 0-binding set, so an id nobody
/// contributes to yields an empty set rather than an error.
///
/// A conflict fails only its own id (as `Error::InGlobalSet`); every other id
/// is still populated. Partials whose id is not declared are ignored here;
/// the reconciler reports them.
pub fn populate_globals<'m>(
    partials: &[(u32, Option<&MergedSet<'m>>)],
    declared: &[GlobalSetDecl],
) -> GlobalPopulation<'m> {
    // Stable sort by id, then a linear scan per id
    let mut grouped: Vec<(u32, &MergedSet<'m>)> = partials
        .iter()
        .filter_map(|(id, set)| set.map(|set| (*id, set)))
        .collect();
    grouped.sort_by_key(|(id, _)| *id);

    let mut population = GlobalPopulation::new();

    for decl in declared {
        let start = grouped.partition_point(|(id, _)| *id < decl.id);
        let group = grouped[start..].iter().take_while(|(id, _)| *id == decl.id);

        let result = fold_group(decl, group.map(|(_, set)| *set));
        if let Ok(global) = &result {
            metagen_info!("shader_metagen::GlobalPopulator",
                "Global set '{}' (ID={}) has {} bindings",
                global.name, global.id, global.merged_set.binding_count());
        }
        population.insert(decl.id, result);
    }

    population
}

fn fold_group<'a, 'm: 'a>(
    decl: &GlobalSetDecl,
    group: impl Iterator<Item = &'a MergedSet<'m>>,
) -> Result<GlobalDescriptorSet<'m>> {
    let mut merged = MergedSet::empty(GLOBAL_SET_INDEX);
    for partial in group {
        merged = union(&merged, partial).map_err(|e| {
            metagen_err!("shader_metagen::GlobalPopulator", e.in_global_set(decl.id, &decl.name))
        })?;
        metagen_trace!("shader_metagen::GlobalPopulator",
            "Folded partial into '{}': {} slots", decl.name, merged.binding_count());
    }
    Ok(GlobalDescriptorSet {
        name: decl.name.clone(),
        id: decl.id,
        merged_set: merged,
    })
}

#[cfg(test)]
#[path = "global_populator_tests.rs"]
mod tests;

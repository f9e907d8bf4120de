use crate::engine::error::EngineError;
use crate::engine::fragment::FragmentGroup;
use crate::engine::graph::OligoGraph;
use tracing::{debug, info, instrument};

/// Expands every tiling position into the cartesian product of the levels
/// of the design groups covering it, in group registration order.
#[instrument(skip_all, name = "replicate_task")]
pub fn run(graph: &mut OligoGraph, groups: &[FragmentGroup]) -> Result<(), EngineError> {
    for position in 0..graph.positions() {
        for group in groups.iter().filter(|g| g.region().contains(position)) {
            graph.expand_variants(position, group.index(), &group.deltas())?;
        }
        debug!(
            position,
            variants = graph.variants(position).len(),
            "Replicated tiling position."
        );
    }
    info!(oligos = graph.oligo_count(), "Replication complete.");
    Ok(())
}

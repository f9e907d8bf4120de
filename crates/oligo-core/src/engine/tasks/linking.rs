use crate::engine::error::EngineError;
use crate::engine::graph::OligoGraph;
use crate::engine::ids::OligoId;
use tracing::{debug, info, instrument};

/// Links every compatible pair of variants across every boundary, creating
/// one overlap per distinct shared window.
#[instrument(skip_all, name = "linking_task")]
pub fn run(graph: &mut OligoGraph) -> Result<(), EngineError> {
    for boundary in 0..graph.boundaries() {
        let left: Vec<OligoId> = graph.variants(boundary).to_vec();
        let right: Vec<OligoId> = graph.variants(boundary + 1).to_vec();
        let mut links = 0usize;

        for &l in &left {
            for &r in &right {
                let compatible = match (graph.oligo(l), graph.oligo(r)) {
                    (Some(a), Some(b)) => a.is_compatible_with(b),
                    _ => {
                        return Err(EngineError::Internal(format!(
                            "dangling oligo at boundary {boundary}"
                        )));
                    }
                };
                if compatible {
                    graph.link(boundary, l, r)?;
                    links += 1;
                }
            }
        }

        debug!(
            boundary,
            links,
            overlaps = graph.overlaps_at(boundary).len(),
            "Linked boundary."
        );
    }
    info!(overlaps = graph.overlap_count(), "Overlaps created.");
    Ok(())
}

use crate::core::sequence::codons::Sequence;
use crate::core::sequence::sites::ForbiddenSites;
use crate::engine::error::EngineError;
use crate::engine::graph::OligoGraph;
use crate::engine::ids::OligoId;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument};

/// Every full-length gene the graph can assemble, in path order.
///
/// A path starts at any variant of the first position and continues only
/// into following oligos of its trailing overlap whose leading window
/// matches exactly.
pub fn permutations(graph: &OligoGraph) -> Result<Vec<Sequence>, EngineError> {
    let mut realizations = Vec::new();
    let mut path = Vec::with_capacity(graph.positions());
    for &start in graph.variants(0) {
        walk(graph, start, &mut path, &mut realizations)?;
    }
    Ok(realizations)
}

fn walk(
    graph: &OligoGraph,
    id: OligoId,
    path: &mut Vec<OligoId>,
    realizations: &mut Vec<Sequence>,
) -> Result<(), EngineError> {
    let stride = graph.tiling().stride();
    let overlap_length = graph.tiling().overlap_length;
    let oligo = graph
        .oligo(id)
        .ok_or_else(|| EngineError::Internal(format!("dangling oligo id {id:?}")))?;
    path.push(id);

    if oligo.position() + 1 == graph.positions() {
        realizations.push(assemble(graph, path)?);
    } else if let Some(overlap) = oligo.trailing().and_then(|o| graph.overlap(o)) {
        let window = &oligo.sequence().codons()[stride..];
        for &next in overlap.following() {
            let matches = graph
                .oligo(next)
                .is_some_and(|n| &n.sequence().codons()[..overlap_length] == window);
            if matches {
                walk(graph, next, path, realizations)?;
            }
        }
    }

    path.pop();
    Ok(())
}

fn assemble(graph: &OligoGraph, path: &[OligoId]) -> Result<Sequence, EngineError> {
    let overlap_length = graph.tiling().overlap_length;
    let mut codons = Vec::new();
    for (i, &id) in path.iter().enumerate() {
        let oligo = graph
            .oligo(id)
            .ok_or_else(|| EngineError::Internal(format!("dangling oligo id {id:?}")))?;
        let skip = if i == 0 { 0 } else { overlap_length };
        codons.extend_from_slice(&oligo.sequence().codons()[skip..]);
    }
    Ok(Sequence::new(codons))
}

/// Tests every realization against the forbidden sites, failing on the
/// first hit. Returns the number of realizations checked.
#[instrument(skip_all, name = "verification_task")]
pub fn run(
    graph: &OligoGraph,
    sites: &ForbiddenSites,
    reporter: &ProgressReporter,
) -> Result<usize, EngineError> {
    let realizations = permutations(graph)?;
    reporter.report(Progress::TaskStart {
        total_steps: realizations.len() as u64,
    });
    for (index, realization) in realizations.iter().enumerate() {
        if let Some(hit) = sites.first_hit(&realization.to_bases()) {
            reporter.report(Progress::TaskFinish);
            return Err(EngineError::RestrictionSite {
                realization: index,
                pattern: hit.pattern,
                offset: hit.offset,
                strand: hit.strand,
            });
        }
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);
    info!(
        realizations = realizations.len(),
        "Every gene realization is free of forbidden sites."
    );
    Ok(realizations.len())
}

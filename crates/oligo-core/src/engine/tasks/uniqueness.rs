use crate::core::catalog::codon::Codon;
use crate::core::protein::Protein;
use crate::core::sequence::codons::Sequence;
use crate::core::sequence::sites::ForbiddenSites;
use crate::engine::error::{EngineError, RegionFailure, UniquenessError};
use crate::engine::graph::OligoGraph;
use crate::engine::ids::{OligoId, OverlapId};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::swap::SwapIterator;
use std::collections::HashSet;
use tracing::{debug, info, instrument, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UniquenessSummary {
    pub overlaps: usize,
    pub combinations_tried: u64,
}

enum Undo {
    Oligo {
        id: OligoId,
        offset: usize,
        codon: Codon,
    },
    Overlap {
        id: OverlapId,
        offset: usize,
        codon: Codon,
    },
}

/// Makes every overlap in the graph distinct from every other and free of
/// forbidden sites by swapping synonymous codons between each overlap and
/// the interior of its preceding oligos.
///
/// A boundary whose instance exhausts its combinations is recorded and the
/// rest of that boundary is skipped; every failure is reported together.
#[instrument(skip_all, name = "uniqueness_task")]
pub fn run(
    graph: &mut OligoGraph,
    protein: &Protein,
    controlled: &[Codon],
    sites: &ForbiddenSites,
    reporter: &ProgressReporter,
) -> Result<UniquenessSummary, EngineError> {
    let mut accepted: HashSet<Vec<Codon>> = HashSet::new();
    let mut failures = Vec::new();
    let mut summary = UniquenessSummary::default();

    reporter.report(Progress::TaskStart {
        total_steps: graph.overlap_count() as u64,
    });

    'boundaries: for boundary in 0..graph.boundaries() {
        let pools = candidate_pools(graph, protein, controlled, boundary);
        let mut iterator = SwapIterator::new(pools.iter().map(Vec::len).collect());
        debug!(
            boundary,
            pools = ?pools,
            combinations = iterator.total_combinations(),
            "Searching boundary."
        );

        let instances = graph.overlaps_at(boundary).to_vec();
        for (instance, overlap_id) in instances.into_iter().enumerate() {
            iterator.reset();
            let mut tried = 0u64;
            loop {
                tried += 1;
                let undo = apply(graph, overlap_id, &pools, &iterator)?;
                let codons = overlap_codons(graph, overlap_id)?;
                let clean = sites.is_clean(&Sequence::new(codons.clone()).to_bases());
                if clean && !accepted.contains(&codons) {
                    trace!(boundary, instance, tried, "Accepted overlap.");
                    accepted.insert(codons);
                    break;
                }
                revert(graph, undo)?;
                if !iterator.advance() {
                    warn!(boundary, instance, tried, "Overlap search exhausted.");
                    failures.push(RegionFailure {
                        boundary,
                        instance,
                        combinations: tried,
                    });
                    summary.combinations_tried += tried;
                    continue 'boundaries;
                }
            }
            summary.combinations_tried += tried;
            summary.overlaps += 1;
            reporter.report(Progress::TaskIncrement);
        }
    }

    reporter.report(Progress::TaskFinish);
    if !failures.is_empty() {
        return Err(UniquenessError { failures }.into());
    }
    info!(
        overlaps = summary.overlaps,
        combinations = summary.combinations_tried,
        "All overlaps are unique."
    );
    Ok(summary)
}

/// Candidate interior offsets (in the left oligo) for each position of the
/// window at `boundary`.
pub(crate) fn candidate_pools(
    graph: &OligoGraph,
    protein: &Protein,
    controlled: &[Codon],
    boundary: usize,
) -> Vec<Vec<usize>> {
    let stride = graph.tiling().stride();
    let base = boundary * stride;
    let left = graph.variants(boundary);
    let holds_controlled = |offset: usize| {
        left.iter().any(|&id| {
            graph
                .oligo(id)
                .and_then(|o| o.sequence().get(offset))
                .is_some_and(|c| controlled.contains(&c))
        })
    };

    graph
        .shared_window(boundary)
        .enumerate()
        .map(|(o, absolute)| {
            let Some(amino_acid) = protein.amino_acid(absolute) else {
                return Vec::new();
            };
            if holds_controlled(stride + o) {
                return Vec::new();
            }
            graph
                .interior(boundary)
                .filter(|&q| {
                    protein.amino_acid(base + q) == Some(amino_acid) && !holds_controlled(q)
                })
                .collect()
        })
        .collect()
}

fn overlap_codons(graph: &OligoGraph, id: OverlapId) -> Result<Vec<Codon>, EngineError> {
    graph
        .overlap(id)
        .map(|o| o.sequence().codons().to_vec())
        .ok_or_else(|| EngineError::Internal(format!("dangling overlap id {id:?}")))
}

fn apply(
    graph: &mut OligoGraph,
    overlap_id: OverlapId,
    pools: &[Vec<usize>],
    iterator: &SwapIterator,
) -> Result<Vec<Undo>, EngineError> {
    let mut undo = Vec::new();
    let preceding = graph
        .overlap(overlap_id)
        .map(|o| o.preceding().to_vec())
        .ok_or_else(|| EngineError::Internal(format!("dangling overlap id {overlap_id:?}")))?;
    let Some(&first) = preceding.first() else {
        return Ok(undo);
    };

    for (offset, selection) in iterator.selections() {
        let Some(index) = selection else { continue };
        let interior = pools[offset][index];
        let overlap_codon = overlap_codons(graph, overlap_id)?[offset];
        let interior_codon = graph
            .oligo(first)
            .and_then(|o| o.sequence().get(interior))
            .ok_or_else(|| EngineError::Internal(format!("missing interior codon {interior}")))?;

        for &id in &preceding {
            let previous = graph.write_unlinked(id, interior, overlap_codon)?;
            undo.push(Undo::Oligo {
                id,
                offset: interior,
                codon: previous,
            });
        }
        let previous = graph.write_overlap(overlap_id, offset, interior_codon)?;
        undo.push(Undo::Overlap {
            id: overlap_id,
            offset,
            codon: previous,
        });
    }
    Ok(undo)
}

fn revert(graph: &mut OligoGraph, undo: Vec<Undo>) -> Result<(), EngineError> {
    for entry in undo.into_iter().rev() {
        match entry {
            Undo::Oligo { id, offset, codon } => {
                graph.write_unlinked(id, offset, codon)?;
            }
            Undo::Overlap { id, offset, codon } => {
                graph.write_overlap(id, offset, codon)?;
            }
        }
    }
    Ok(())
}

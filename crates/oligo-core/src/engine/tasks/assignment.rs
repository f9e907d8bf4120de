use crate::core::catalog::codon::Codon;
use crate::core::protein::Protein;
use crate::engine::config::ConfigError;
use crate::engine::error::EngineError;
use crate::engine::fragment::FragmentGroup;
use crate::engine::graph::OligoGraph;
use crate::engine::ids::OligoId;
use rand::Rng;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument};

/// Fills every fragment of every group, in registration order.
///
/// The levels of a group share one selection order, so the group claims
/// only the positions of its largest target. Claimed positions are
/// reserved: later groups never match them.
#[instrument(skip_all, name = "assignment_task")]
pub fn run<R: Rng + ?Sized>(
    graph: &mut OligoGraph,
    protein: &Protein,
    groups: &[FragmentGroup],
    rng: &mut R,
) -> Result<(), EngineError> {
    let mut reserved = BTreeSet::new();
    for group in groups {
        let claimed = group.fill(graph, protein, &reserved, rng)?;
        debug!(
            codon = %group.codon(),
            region = %group.region(),
            claimed = claimed.len(),
            "Assigned design group."
        );
        reserved.extend(claimed);
    }
    info!(groups = groups.len(), "Controlled codons assigned.");
    Ok(())
}

/// Replaces every remaining wildcard with a concrete codon outside the
/// controlled set, then records each oligo's realized counts.
///
/// The input gene's own codon is kept when it is not controlled; otherwise
/// the first uncontrolled synonym in catalog order is used.
#[instrument(skip_all, name = "wildcard_realization_task")]
pub fn realize_wildcards(
    graph: &mut OligoGraph,
    protein: &Protein,
    controlled: &[Codon],
) -> Result<(), EngineError> {
    let stride = graph.tiling().stride();
    let mut realized = 0usize;
    let ids: Vec<OligoId> = (0..graph.positions())
        .flat_map(|p| graph.variants(p).to_vec())
        .collect();

    for id in ids {
        let (position, wildcards) = {
            let oligo = graph
                .oligo(id)
                .ok_or_else(|| EngineError::Internal(format!("dangling oligo id {id:?}")))?;
            let wildcards: Vec<(usize, Codon)> = oligo
                .sequence()
                .iter()
                .enumerate()
                .filter(|(_, c)| c.is_wildcard())
                .map(|(offset, c)| (offset, *c))
                .collect();
            (oligo.position(), wildcards)
        };
        for (offset, wildcard) in wildcards {
            let absolute = position * stride + offset;
            let codon = concrete_codon(protein, controlled, absolute, wildcard)?;
            graph.write_unlinked(id, offset, codon)?;
            realized += 1;
        }
    }

    for oligo in graph.oligos_mut() {
        oligo.refresh_counts(controlled);
    }
    info!(realized, "Wildcards realized.");
    Ok(())
}

fn concrete_codon(
    protein: &Protein,
    controlled: &[Codon],
    absolute: usize,
    wildcard: Codon,
) -> Result<Codon, EngineError> {
    if let Some(original) = protein.sequence().get(absolute) {
        if !original.is_wildcard() && !controlled.contains(&original) {
            return Ok(original);
        }
    }
    let amino_acid = wildcard.amino_acid();
    amino_acid
        .synonyms()
        .iter()
        .find(|synonym| !controlled.contains(synonym))
        .copied()
        .ok_or_else(|| {
            ConfigError::UnrealizableWildcard {
                amino_acid,
                position: absolute,
            }
            .into()
        })
}

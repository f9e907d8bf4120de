use super::config::ConfigError;
use super::error::EngineError;
use super::graph::{Delta, OligoGraph};
use crate::core::catalog::codon::Codon;
use crate::core::design::Region;
use crate::core::protein::Protein;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::BTreeSet;
use std::ops::Range;
use tracing::debug;

/// One (controlled codon, region) row of a design, expanded into one
/// [`Fragment`] per level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentGroup {
    index: usize,
    codon: Codon,
    region: Region,
    levels: Vec<usize>,
}

impl FragmentGroup {
    pub fn new(index: usize, codon: Codon, region: Region, levels: Vec<usize>) -> Self {
        Self {
            index,
            codon,
            region,
            levels,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn codon(&self) -> Codon {
        self.codon
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn deltas(&self) -> Vec<Delta> {
        self.levels
            .iter()
            .enumerate()
            .map(|(level, &target)| Delta {
                codon: self.codon,
                level,
                target,
            })
            .collect()
    }

    /// Fills every level of the group from one shuffled order of the
    /// matching positions, each level taking a prefix of it. Returns the
    /// positions claimed by any level, which are exactly those of the
    /// largest target.
    ///
    /// # Errors
    ///
    /// As [`Fragment::fill`].
    pub fn fill<R: Rng + ?Sized>(
        &self,
        graph: &mut OligoGraph,
        protein: &Protein,
        reserved: &BTreeSet<usize>,
        rng: &mut R,
    ) -> Result<BTreeSet<usize>, EngineError> {
        let mut claimed = BTreeSet::new();
        let Some(first) = self.fragments().next() else {
            return Ok(claimed);
        };
        let mut order = first.matching_positions(graph, protein, reserved);
        order.shuffle(rng);
        for fragment in self.fragments() {
            claimed.extend(fragment.place(graph, &order)?);
        }
        Ok(claimed)
    }

    pub fn fragments(&self) -> impl Iterator<Item = Fragment> + '_ {
        self.levels
            .iter()
            .enumerate()
            .map(|(level, &target)| Fragment {
                group: self.index,
                codon: self.codon,
                region: self.region,
                level,
                target,
            })
    }
}

/// A region of tiling positions assigned one target count of a controlled
/// codon at one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub group: usize,
    pub codon: Codon,
    pub region: Region,
    pub level: usize,
    pub target: usize,
}

impl Fragment {
    /// Absolute codon range owned by this fragment: every codon of its first
    /// through last tiling position, minus the windows shared with positions
    /// outside the region.
    pub fn span(&self, graph: &OligoGraph) -> Range<usize> {
        let overlap = graph.tiling().overlap_length;
        let mut start = graph.span(self.region.first).start;
        let mut end = graph.span(self.region.last).end;
        if self.region.first > 0 {
            start += overlap;
        }
        if self.region.last + 1 < graph.positions() {
            end -= overlap;
        }
        start..end
    }

    /// Positions in the span encoding this fragment's amino acid that no
    /// earlier design group has claimed.
    pub fn matching_positions(
        &self,
        graph: &OligoGraph,
        protein: &Protein,
        reserved: &BTreeSet<usize>,
    ) -> Vec<usize> {
        let amino_acid = self.codon.amino_acid();
        self.span(graph)
            .filter(|&i| protein.amino_acid(i) == Some(amino_acid) && !reserved.contains(&i))
            .collect()
    }

    /// Places `target` occurrences of the codon among the matching positions
    /// and the amino acid's wildcard at every other matching position, in
    /// every variant carrying this fragment's level. Returns the chosen
    /// absolute positions in ascending order.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InsufficientPositions`] when fewer than `target`
    /// positions match, and [`EngineError::Internal`] when a write would
    /// replace a different concrete codon.
    pub fn fill<R: Rng + ?Sized>(
        &self,
        graph: &mut OligoGraph,
        protein: &Protein,
        reserved: &BTreeSet<usize>,
        rng: &mut R,
    ) -> Result<Vec<usize>, EngineError> {
        let mut order = self.matching_positions(graph, protein, reserved);
        order.shuffle(rng);
        self.place(graph, &order)
    }

    /// Writes the codon at the first `target` entries of `order` and the
    /// wildcard at the rest.
    fn place(&self, graph: &mut OligoGraph, order: &[usize]) -> Result<Vec<usize>, EngineError> {
        if order.len() < self.target {
            return Err(ConfigError::InsufficientPositions {
                codon: self.codon,
                region: self.region,
                level: self.level,
                requested: self.target,
                available: order.len(),
            }
            .into());
        }

        let mut chosen = order[..self.target].to_vec();
        chosen.sort_unstable();
        debug!(
            codon = %self.codon,
            region = %self.region,
            level = self.level,
            matching = order.len(),
            chosen = ?chosen,
            "Filling fragment"
        );

        let wildcard = self.codon.amino_acid().wildcard();
        for &absolute in order {
            let codon = if chosen.binary_search(&absolute).is_ok() {
                self.codon
            } else {
                wildcard
            };
            self.write(graph, absolute, codon)?;
        }
        Ok(chosen)
    }

    fn write(&self, graph: &mut OligoGraph, absolute: usize, codon: Codon) -> Result<(), EngineError> {
        for (position, offset) in graph.owners(absolute) {
            if !self.region.contains(position) {
                continue;
            }
            let targets: Vec<_> = graph
                .variants(position)
                .iter()
                .copied()
                .filter(|&id| {
                    graph
                        .oligo(id)
                        .and_then(|o| o.delta(self.group))
                        .is_some_and(|d| d.level == self.level)
                })
                .collect();
            for id in targets {
                let current = graph
                    .oligo(id)
                    .and_then(|o| o.sequence().get(offset))
                    .ok_or_else(|| EngineError::Internal(format!("missing codon at {absolute}")))?;
                if !current.is_wildcard() && current != codon {
                    return Err(EngineError::Internal(format!(
                        "fragment for {} would overwrite {current} at codon {absolute}",
                        self.codon
                    )));
                }
                graph.write_unlinked(id, offset, codon)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::TilingConfig;
    use crate::engine::graph::Oligo;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn codon(s: &str) -> Codon {
        Codon::parse(s).unwrap()
    }

    // 14 codons tiled as 0..6, 4..10 and 8..14; leucines at 0, 2, 4, 5, 7, 8 and 10.
    const GENE: &str = "CTGGCTCTTAAACTCCTGGGTCTACTTGCATTGAAAGATTAA";

    fn setup(region: Region, levels: Vec<usize>) -> (OligoGraph, Protein, FragmentGroup) {
        let protein = Protein::from_bases(GENE, None).unwrap();
        let tiling = TilingConfig {
            oligo_length: 6,
            overlap_length: 2,
        };
        let positions = tiling.positions_for(protein.len()).unwrap();
        let group = FragmentGroup::new(0, codon("CTA"), region, levels);
        let template = protein.wildcard_filled(&[group.codon()]);
        let mut graph = OligoGraph::new(tiling, positions);
        for p in 0..positions {
            let span = graph.span(p);
            graph
                .add_oligo(Oligo::new(p, template.window(span).unwrap()))
                .unwrap();
            graph.expand_variants(p, 0, &group.deltas()).unwrap();
        }
        (graph, protein, group)
    }

    fn leucines(graph: &OligoGraph, position: usize, variant: usize) -> Vec<Codon> {
        let id = graph.variants(position)[variant];
        graph
            .oligo(id)
            .unwrap()
            .sequence()
            .iter()
            .copied()
            .filter(|c| c.amino_acid() == codon("CTA").amino_acid())
            .collect()
    }

    #[test]
    fn span_excludes_windows_shared_with_outside_positions() {
        let (graph, _, group) = setup(Region::new(1, 1).unwrap(), vec![1]);
        let fragment = group.fragments().next().unwrap();
        assert_eq!(fragment.span(&graph), 6..8);

        let (graph, _, group) = setup(Region::new(0, 2).unwrap(), vec![1]);
        assert_eq!(group.fragments().next().unwrap().span(&graph), 0..14);
    }

    #[test]
    fn fill_places_exactly_the_target_count() {
        let (mut graph, protein, group) = setup(Region::new(0, 2).unwrap(), vec![2, 4]);
        let mut rng = StdRng::seed_from_u64(11);
        let reserved = BTreeSet::new();
        for fragment in group.fragments().collect::<Vec<_>>() {
            let chosen = fragment.fill(&mut graph, &protein, &reserved, &mut rng).unwrap();
            assert_eq!(chosen.len(), fragment.target);
        }

        let wildcard = codon("CTA").amino_acid().wildcard();
        for (variant, target) in [(0, 2), (1, 4)] {
            let total: usize = (0..3)
                .map(|p| {
                    let id = graph.variants(p)[variant];
                    let sequence = graph.oligo(id).unwrap().sequence();
                    let interior = graph.interior(p);
                    sequence.codons()[interior.clone()]
                        .iter()
                        .filter(|c| **c == codon("CTA"))
                        .count()
                        + if p > 0 {
                            sequence.codons()[..2].iter().filter(|c| **c == codon("CTA")).count()
                        } else {
                            0
                        }
                })
                .sum();
            assert_eq!(total, target);
            for p in 0..3 {
                assert!(
                    leucines(&graph, p, variant)
                        .iter()
                        .all(|c| *c == codon("CTA") || *c == wildcard)
                );
            }
        }
    }

    fn positions_holding(graph: &OligoGraph, variant: usize, target: Codon) -> BTreeSet<usize> {
        (0..graph.positions())
            .flat_map(|p| {
                let start = graph.span(p).start;
                let id = graph.variants(p)[variant];
                graph
                    .oligo(id)
                    .unwrap()
                    .sequence()
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| **c == target)
                    .map(|(offset, _)| start + offset)
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    #[test]
    fn group_levels_share_one_selection_order() {
        for seed in 0..20 {
            let (mut graph, protein, group) = setup(Region::new(0, 2).unwrap(), vec![4, 2]);
            let claimed = group
                .fill(&mut graph, &protein, &BTreeSet::new(), &mut StdRng::seed_from_u64(seed))
                .unwrap();
            assert_eq!(claimed.len(), 4);

            let high = positions_holding(&graph, 0, codon("CTA"));
            let low = positions_holding(&graph, 1, codon("CTA"));
            assert_eq!(high, claimed);
            assert_eq!(low.len(), 2);
            assert!(low.is_subset(&high));
        }
    }

    #[test]
    fn fill_mirrors_shared_window_writes_to_both_owners() {
        let (mut graph, protein, group) = setup(Region::new(0, 1).unwrap(), vec![5]);
        let fragment = group.fragments().next().unwrap();
        let chosen = fragment
            .fill(&mut graph, &protein, &BTreeSet::new(), &mut StdRng::seed_from_u64(3))
            .unwrap();
        assert_eq!(chosen, vec![0, 2, 4, 5, 7]);
        let left = graph.oligo(graph.variants(0)[0]).unwrap().sequence();
        let right = graph.oligo(graph.variants(1)[0]).unwrap().sequence();
        assert_eq!(left.codons()[4..], right.codons()[..2]);
        assert_eq!(right.get(0), Some(codon("CTA")));
    }

    #[test]
    fn fill_rejects_over_requests() {
        let (mut graph, protein, group) = setup(Region::new(1, 1).unwrap(), vec![3]);
        let fragment = group.fragments().next().unwrap();
        let result = fragment.fill(&mut graph, &protein, &BTreeSet::new(), &mut StdRng::seed_from_u64(1));
        assert!(matches!(
            result,
            Err(EngineError::Configuration(ConfigError::InsufficientPositions {
                requested: 3,
                available: 1,
                ..
            }))
        ));
    }

    #[test]
    fn reserved_positions_are_not_matched() {
        let (graph, protein, group) = setup(Region::new(0, 2).unwrap(), vec![1]);
        let fragment = group.fragments().next().unwrap();
        let reserved: BTreeSet<usize> = [0, 4].into_iter().collect();
        assert_eq!(
            fragment.matching_positions(&graph, &protein, &reserved),
            vec![2, 5, 7, 8, 10]
        );
    }
}

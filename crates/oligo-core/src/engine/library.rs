use super::config::{ConfigError, LibraryConfig};
use super::error::EngineError;
use super::fragment::FragmentGroup;
use super::graph::{Oligo, OligoGraph};
use super::progress::ProgressReporter;
use super::tasks;
use super::tasks::uniqueness::UniquenessSummary;
use crate::core::io::order::OrderRecord;
use crate::core::protein::Protein;
use crate::core::sequence::codons::Sequence;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::ops::Range;
use tracing::{info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum BuildStage {
    Created,
    OligosCreated,
    Replicated,
    Filled,
    WildcardsRealized,
    Linked,
    Unique,
    Verified,
}

impl BuildStage {
    fn name(self) -> &'static str {
        match self {
            BuildStage::Created => "create",
            BuildStage::OligosCreated => "create_oligos",
            BuildStage::Replicated => "replicate",
            BuildStage::Filled => "fill_fragments",
            BuildStage::WildcardsRealized => "realize_wildcards",
            BuildStage::Linked => "create_overlaps",
            BuildStage::Unique => "make_overlaps_unique",
            BuildStage::Verified => "verify",
        }
    }
}

/// The tiling of one position as planned before any variant is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionPlan {
    pub position: usize,
    /// Absolute codon range covered by the position's oligos.
    pub span: Range<usize>,
    /// Indices of the design groups covering the position.
    pub groups: Vec<usize>,
    pub variants: usize,
}

/// An oligo library under construction.
///
/// Phases run once each, in order: [`create_oligos`](Library::create_oligos),
/// [`replicate`](Library::replicate), [`fill_fragments`](Library::fill_fragments),
/// [`realize_wildcards`](Library::realize_wildcards),
/// [`create_overlaps`](Library::create_overlaps),
/// [`make_overlaps_unique`](Library::make_overlaps_unique) and
/// [`verify`](Library::verify). Any other order fails with
/// [`EngineError::PhaseOrder`].
#[derive(Debug)]
pub struct Library {
    protein: Protein,
    config: LibraryConfig,
    groups: Vec<FragmentGroup>,
    graph: OligoGraph,
    stage: BuildStage,
    rng: StdRng,
}

impl Library {
    /// Validates the tiling and every design region against `protein`.
    ///
    /// Design groups are registered in controlled-codon order, then by region.
    pub fn new(protein: Protein, config: LibraryConfig) -> Result<Self, EngineError> {
        let positions = config.tiling.positions_for(protein.len())?;

        let mut groups = Vec::new();
        for codon in &config.controlled_codons {
            let design = config
                .designs
                .get(codon)
                .ok_or(ConfigError::MissingDesign(*codon))?;
            for (region, levels) in design.entries() {
                if region.last >= positions {
                    return Err(ConfigError::RegionOutOfRange {
                        codon: *codon,
                        region: *region,
                        positions,
                    }
                    .into());
                }
                groups.push(FragmentGroup::new(
                    groups.len(),
                    *codon,
                    *region,
                    levels.clone(),
                ));
            }
        }

        let rng = match config.selection_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        info!(
            codons = protein.len(),
            positions,
            groups = groups.len(),
            "Library configured."
        );

        Ok(Self {
            graph: OligoGraph::new(config.tiling, positions),
            protein,
            config,
            groups,
            stage: BuildStage::Created,
            rng,
        })
    }

    pub fn protein(&self) -> &Protein {
        &self.protein
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    pub fn groups(&self) -> &[FragmentGroup] {
        &self.groups
    }

    pub fn graph(&self) -> &OligoGraph {
        &self.graph
    }

    pub fn positions(&self) -> usize {
        self.graph.positions()
    }

    /// Oligo variants at `position` in creation order.
    pub fn oligos(&self, position: usize) -> Vec<&Oligo> {
        self.graph
            .variants(position)
            .iter()
            .filter_map(|&id| self.graph.oligo(id))
            .collect()
    }

    /// Spans, covering groups and expected variant counts per position.
    pub fn plan(&self) -> Vec<PositionPlan> {
        (0..self.positions())
            .map(|position| {
                let covering: Vec<&FragmentGroup> = self
                    .groups
                    .iter()
                    .filter(|g| g.region().contains(position))
                    .collect();
                PositionPlan {
                    position,
                    span: self.graph.span(position),
                    groups: covering.iter().map(|g| g.index()).collect(),
                    variants: covering.iter().map(|g| g.level_count()).product(),
                }
            })
            .collect()
    }

    fn enter(&self, phase: BuildStage) -> Result<(), EngineError> {
        let expected = match phase {
            BuildStage::Created => None,
            BuildStage::OligosCreated => Some(BuildStage::Created),
            BuildStage::Replicated => Some(BuildStage::OligosCreated),
            BuildStage::Filled => Some(BuildStage::Replicated),
            BuildStage::WildcardsRealized => Some(BuildStage::Filled),
            BuildStage::Linked => Some(BuildStage::WildcardsRealized),
            BuildStage::Unique => Some(BuildStage::Linked),
            BuildStage::Verified => Some(BuildStage::Unique),
        };
        match expected {
            Some(expected) if expected == self.stage => Ok(()),
            Some(expected) => Err(EngineError::PhaseOrder {
                phase: phase.name(),
                expected: expected.name(),
            }),
            None => Err(EngineError::Internal("a library is created only once".to_string())),
        }
    }

    /// Tiles the protein: one wildcard-filled oligo per position.
    #[instrument(skip_all, name = "create_oligos")]
    pub fn create_oligos(&mut self) -> Result<(), EngineError> {
        self.enter(BuildStage::OligosCreated)?;
        let template = self.protein.wildcard_filled(&self.config.controlled_codons);
        for position in 0..self.positions() {
            let window = template.window(self.graph.span(position))?;
            self.graph.add_oligo(Oligo::new(position, window))?;
        }
        info!(positions = self.positions(), "Oligos created.");
        self.stage = BuildStage::OligosCreated;
        Ok(())
    }

    pub fn replicate(&mut self) -> Result<(), EngineError> {
        self.enter(BuildStage::Replicated)?;
        tasks::replicate::run(&mut self.graph, &self.groups)?;
        self.stage = BuildStage::Replicated;
        Ok(())
    }

    pub fn fill_fragments(&mut self) -> Result<(), EngineError> {
        self.enter(BuildStage::Filled)?;
        tasks::assignment::run(&mut self.graph, &self.protein, &self.groups, &mut self.rng)?;
        self.stage = BuildStage::Filled;
        Ok(())
    }

    pub fn realize_wildcards(&mut self) -> Result<(), EngineError> {
        self.enter(BuildStage::WildcardsRealized)?;
        tasks::assignment::realize_wildcards(
            &mut self.graph,
            &self.protein,
            &self.config.controlled_codons,
        )?;
        self.stage = BuildStage::WildcardsRealized;
        Ok(())
    }

    pub fn create_overlaps(&mut self) -> Result<(), EngineError> {
        self.enter(BuildStage::Linked)?;
        tasks::linking::run(&mut self.graph)?;
        self.stage = BuildStage::Linked;
        Ok(())
    }

    pub fn make_overlaps_unique(
        &mut self,
        reporter: &ProgressReporter,
    ) -> Result<UniquenessSummary, EngineError> {
        self.enter(BuildStage::Unique)?;
        let summary = tasks::uniqueness::run(
            &mut self.graph,
            &self.protein,
            &self.config.controlled_codons,
            &self.config.search.forbidden_sites,
            reporter,
        )?;
        self.stage = BuildStage::Unique;
        Ok(summary)
    }

    /// Checks every whole-gene realization for forbidden sites. Returns the
    /// number of realizations.
    pub fn verify(&mut self, reporter: &ProgressReporter) -> Result<usize, EngineError> {
        self.enter(BuildStage::Verified)?;
        let count = tasks::verification::run(
            &self.graph,
            &self.config.search.forbidden_sites,
            reporter,
        )?;
        self.stage = BuildStage::Verified;
        Ok(count)
    }

    /// Every full-length gene the library can assemble.
    pub fn permutations(&self) -> Result<Vec<Sequence>, EngineError> {
        tasks::verification::permutations(&self.graph)
    }

    pub fn check_consistency(&self) -> Result<(), EngineError> {
        self.graph.check_consistency()
    }

    /// One synthesis-order record per oligo variant, position-major.
    pub fn order_records(&self) -> Vec<OrderRecord> {
        (0..self.positions())
            .flat_map(|position| {
                self.oligos(position)
                    .into_iter()
                    .enumerate()
                    .map(move |(variant, oligo)| OrderRecord {
                        position,
                        variant,
                        bases: oligo.sequence().to_bases().to_string(),
                        counts: render_counts(oligo),
                    })
            })
            .collect()
    }
}

fn render_counts(oligo: &Oligo) -> String {
    oligo
        .counts()
        .iter()
        .map(|(codon, count)| format!("{codon}:{count}"))
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::codon::Codon;
    use crate::core::design::{Design, DesignSet, Region};
    use crate::core::sequence::sites::{ForbiddenSites, Strand};
    use crate::engine::config::LibraryConfigBuilder;
    use std::collections::HashSet;

    // 30 codons, oligo 9, overlap 2, stride 7: four positions. Shared windows
    // at codons 7..9, 14..16 and 21..23 carry no leucine.
    const GENE: &str = concat!(
        "ATGGCCCTGGGACTTGCAAAA",
        "GCTGGT",
        "CTCACCCCATTAACG",
        "ACTCCT",
        "CTGGTCTCACTTGTG",
        "GTTTCT",
        "CTCGCCGGATTGGATCTATAA",
    );

    fn codon(s: &str) -> Codon {
        Codon::parse(s).unwrap()
    }

    fn designs(rows: &[(&str, (usize, usize), &[usize])]) -> DesignSet {
        let mut set = DesignSet::new();
        for (bases, (first, last), counts) in rows {
            let design = Design::new(codon(bases))
                .with_region(Region::new(*first, *last).unwrap(), counts.to_vec())
                .unwrap();
            set.add(design).unwrap();
        }
        set
    }

    fn library(designs: DesignSet, forbidden: &[&str]) -> Library {
        let config = LibraryConfigBuilder::new()
            .oligo_length(9)
            .overlap_length(2)
            .designs(designs)
            .forbidden_sites(ForbiddenSites::parse(forbidden, false).unwrap())
            .selection_seed(Some(42))
            .build()
            .unwrap();
        Library::new(Protein::from_bases(GENE, None).unwrap(), config).unwrap()
    }

    fn build_until_linked(library: &mut Library) {
        library.create_oligos().unwrap();
        library.replicate().unwrap();
        library.fill_fragments().unwrap();
        library.realize_wildcards().unwrap();
        library.create_overlaps().unwrap();
    }

    fn scenario_a(forbidden: &[&str]) -> Library {
        let mut library = library(designs(&[("CTA", (0, 3), &[2, 5])]), forbidden);
        build_until_linked(&mut library);
        library
    }

    fn realized_count(sequence: &Sequence, bases: &str) -> usize {
        sequence.count(&codon(bases))
    }

    #[test]
    fn scenario_a_builds_two_variants_and_two_overlaps_everywhere() {
        let mut library = scenario_a(&[]);
        for position in 0..4 {
            assert_eq!(library.oligos(position).len(), 2);
        }
        for boundary in 0..3 {
            assert_eq!(library.graph().overlaps_at(boundary).len(), 2);
        }
        library.check_consistency().unwrap();

        let summary = library.make_overlaps_unique(&ProgressReporter::new()).unwrap();
        assert_eq!(summary.overlaps, 6);
        library.check_consistency().unwrap();

        let graph = library.graph();
        let distinct: HashSet<Vec<Codon>> = (0..3)
            .flat_map(|b| graph.overlaps_at(b).to_vec())
            .map(|id| graph.overlap(id).unwrap().sequence().codons().to_vec())
            .collect();
        assert_eq!(distinct.len(), 6);

        assert_eq!(library.verify(&ProgressReporter::new()).unwrap(), 2);
    }

    #[test]
    fn realizations_preserve_the_protein_and_hit_each_level_target() {
        let mut library = scenario_a(&[]);
        library.make_overlaps_unique(&ProgressReporter::new()).unwrap();

        let protein = library.protein().sequence().clone();
        let realizations = library.permutations().unwrap();
        assert_eq!(realizations.len(), 2);
        for realization in &realizations {
            assert_eq!(realization.len(), protein.len());
            assert!(realization.amino_acids().eq(protein.amino_acids()));
            assert!(realization.iter().all(|c| !c.is_wildcard()));
        }
        let mut counts: Vec<usize> = realizations
            .iter()
            .map(|r| realized_count(r, "CTA"))
            .collect();
        counts.sort_unstable();
        assert_eq!(counts, vec![2, 5]);
    }

    #[test]
    fn realized_counts_are_recorded_per_oligo() {
        let library = scenario_a(&[]);
        for position in 0..4 {
            for oligo in library.oligos(position) {
                assert_eq!(
                    oligo.counts().get(&codon("CTA")).copied(),
                    Some(realized_count(oligo.sequence(), "CTA"))
                );
            }
        }
        let records = library.order_records();
        assert_eq!(records.len(), 8);
        assert_eq!(records[0].bases.len(), 27);
        assert!(records[0].counts.starts_with("CTA:"));
    }

    #[test]
    fn scenario_b_reports_exhaustion_at_the_blocked_boundary_only() {
        let mut library = scenario_a(&["GCNGGN"]);
        let error = library
            .make_overlaps_unique(&ProgressReporter::new())
            .unwrap_err();
        let failures = match error {
            EngineError::Uniqueness(error) => error.failures,
            other => panic!("expected a uniqueness failure, got {other:?}"),
        };
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].boundary, 0);
        assert_eq!(failures[0].instance, 0);
        assert_eq!(failures[0].combinations, 6);
    }

    #[test]
    fn verification_reports_sites_outside_the_overlaps() {
        let mut library = scenario_a(&["GCAAAA"]);
        library.make_overlaps_unique(&ProgressReporter::new()).unwrap();
        let error = library.verify(&ProgressReporter::new()).unwrap_err();
        assert!(matches!(
            error,
            EngineError::RestrictionSite {
                realization: 0,
                offset: 15,
                strand: Strand::Forward,
                ..
            }
        ));
    }

    #[test]
    fn overlapping_design_groups_expand_to_the_cartesian_product() {
        let mut library = library(
            designs(&[("CTA", (0, 3), &[1, 3, 5]), ("ACC", (1, 2), &[0, 2])]),
            &[],
        );
        let expected: Vec<usize> = library.plan().iter().map(|p| p.variants).collect();
        assert_eq!(expected, vec![3, 6, 6, 3]);

        build_until_linked(&mut library);
        let variants: Vec<usize> = (0..4).map(|p| library.oligos(p).len()).collect();
        assert_eq!(variants, vec![3, 6, 6, 3]);
        let overlaps: Vec<usize> = (0..3)
            .map(|b| library.graph().overlaps_at(b).len())
            .collect();
        assert_eq!(overlaps, vec![3, 6, 3]);
        library.check_consistency().unwrap();
    }

    #[test]
    fn synonymous_design_groups_fit_together_under_any_seed() {
        // Six leucines: CTA takes two in every variant, CTG three.
        let gene = concat!("ATG", "CTTCTTCTTCTTCTTCTT", "TAA");
        for seed in 0..40 {
            let config = LibraryConfigBuilder::new()
                .oligo_length(8)
                .overlap_length(1)
                .designs(designs(&[("CTA", (0, 0), &[2, 2]), ("CTG", (0, 0), &[3])]))
                .selection_seed(Some(seed))
                .build()
                .unwrap();
            let mut library =
                Library::new(Protein::from_bases(gene, None).unwrap(), config).unwrap();
            library.create_oligos().unwrap();
            library.replicate().unwrap();
            library
                .fill_fragments()
                .unwrap_or_else(|e| panic!("seed {seed}: {e}"));
            library.realize_wildcards().unwrap();

            let oligos = library.oligos(0);
            assert_eq!(oligos.len(), 2);
            for oligo in oligos {
                assert_eq!(realized_count(oligo.sequence(), "CTA"), 2);
                assert_eq!(realized_count(oligo.sequence(), "CTG"), 3);
                assert_eq!(realized_count(oligo.sequence(), "CTT"), 1);
            }
        }
    }

    #[test]
    fn phases_must_run_in_order() {
        let mut library = scenario_a(&[]);
        assert!(matches!(
            library.create_oligos(),
            Err(EngineError::PhaseOrder {
                phase: "create_oligos",
                ..
            })
        ));

        let mut fresh = library_with_default_design();
        assert!(matches!(
            fresh.create_overlaps(),
            Err(EngineError::PhaseOrder {
                phase: "create_overlaps",
                expected: "realize_wildcards",
            })
        ));
    }

    fn library_with_default_design() -> Library {
        library(designs(&[("CTA", (0, 3), &[2, 5])]), &[])
    }

    #[test]
    fn untileable_lengths_and_out_of_range_regions_are_rejected() {
        let config = LibraryConfigBuilder::new()
            .oligo_length(8)
            .overlap_length(2)
            .build()
            .unwrap();
        let protein = Protein::from_bases(GENE, None).unwrap();
        assert!(matches!(
            Library::new(protein.clone(), config),
            Err(EngineError::Configuration(ConfigError::UntileableLength { .. }))
        ));

        let config = LibraryConfigBuilder::new()
            .oligo_length(9)
            .overlap_length(2)
            .designs(designs(&[("CTA", (2, 4), &[1])]))
            .build()
            .unwrap();
        assert!(matches!(
            Library::new(protein, config),
            Err(EngineError::Configuration(ConfigError::RegionOutOfRange { positions: 4, .. }))
        ));
    }

    #[test]
    fn padding_keeps_its_literal_codons() {
        let config = LibraryConfigBuilder::new()
            .oligo_length(9)
            .overlap_length(2)
            .designs(designs(&[("CTA", (0, 3), &[1])]))
            .selection_seed(Some(7))
            .build()
            .unwrap();
        let protein = Protein::from_bases(GENE, Some(1..28)).unwrap();
        let mut library = Library::new(protein, config).unwrap();
        build_until_linked(&mut library);
        library.make_overlaps_unique(&ProgressReporter::new()).unwrap();

        for realization in library.permutations().unwrap() {
            assert_eq!(realization.get(0), Some(codon("ATG")));
            assert_eq!(realization.get(28), Some(codon("CTA")));
            assert_eq!(realization.get(29), Some(codon("TAA")));
            assert_eq!(realized_count(&realization, "CTA"), 2);
        }
    }
}

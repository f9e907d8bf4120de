use crate::core::protein::Protein;
use crate::engine::config::LibraryConfig;
use crate::engine::error::EngineError;
use crate::engine::library::Library;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tasks::uniqueness::UniquenessSummary;
use tracing::{info, instrument};

#[derive(Debug)]
pub struct DesignResult {
    pub library: Library,
    pub uniqueness: UniquenessSummary,
    /// Number of verified gene realizations, `None` when verification was skipped.
    pub realizations: Option<usize>,
}

/// Builds a complete library for `protein`: tiling, replication, codon
/// assignment, overlap linking, the uniqueness search and (unless disabled)
/// whole-gene verification.
#[instrument(skip_all, name = "design_workflow")]
pub fn run(
    protein: Protein,
    config: LibraryConfig,
    reporter: &ProgressReporter,
) -> Result<DesignResult, EngineError> {
    let verify = config.search.verify_realizations;
    let mut library = Library::new(protein, config)?;

    reporter.phase("Tiling", || {
        library.create_oligos()?;
        library.replicate()
    })?;
    reporter.phase("Assigning Codons", || {
        library.fill_fragments()?;
        library.realize_wildcards()
    })?;
    reporter.phase("Linking Overlaps", || library.create_overlaps())?;
    reporter.report(Progress::Message(format!(
        "{} oligos, {} overlaps",
        library.graph().oligo_count(),
        library.graph().overlap_count()
    )));

    let uniqueness =
        reporter.phase("Overlap Uniqueness Search", || library.make_overlaps_unique(reporter))?;
    library.check_consistency()?;

    let realizations = if verify {
        Some(reporter.phase("Verifying Realizations", || library.verify(reporter))?)
    } else {
        info!("Skipping whole-gene verification.");
        None
    };

    info!(
        oligos = library.graph().oligo_count(),
        overlaps = library.graph().overlap_count(),
        "Design workflow complete."
    );
    Ok(DesignResult {
        library,
        uniqueness,
        realizations,
    })
}

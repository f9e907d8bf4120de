use super::config::ConfigError;
use crate::core::sequence::codons::SequenceError;
use crate::core::sequence::sites::Strand;
use std::fmt;
use thiserror::Error;

/// One boundary region whose overlap instance could not be made unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionFailure {
    pub boundary: usize,
    pub instance: usize,
    pub combinations: u64,
}

impl fmt::Display for RegionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "boundary {} (overlap instance {}, {} combinations tried)",
            self.boundary, self.instance, self.combinations
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error(
    "No unique, site-free overlap found for {} region(s): {}",
    failures.len(),
    failures.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
)]
pub struct UniquenessError {
    pub failures: Vec<RegionFailure>,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Sequence error: {0}")]
    Sequence(#[from] SequenceError),

    #[error(transparent)]
    Uniqueness(#[from] UniquenessError),

    #[error(
        "Gene realization {realization} contains forbidden site '{pattern}' at base {offset} ({strand:?} strand)"
    )]
    RestrictionSite {
        realization: usize,
        pattern: String,
        offset: usize,
        strand: Strand,
    },

    #[error("Compatible oligos at boundary {boundary} disagree on their shared window")]
    SharedWindow { boundary: usize },

    #[error("Build phase '{phase}' requires the '{expected}' phase to have completed first")]
    PhaseOrder {
        phase: &'static str,
        expected: &'static str,
    },

    #[error("Internal logic error: {0}")]
    Internal(String),
}

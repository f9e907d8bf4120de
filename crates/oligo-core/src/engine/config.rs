use crate::core::catalog::amino_acid::AminoAcid;
use crate::core::catalog::codon::Codon;
use crate::core::design::{DesignSet, Region};
use crate::core::sequence::sites::ForbiddenSites;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid tiling (oligo length {oligo_length}, overlap length {overlap_length}): {reason}")]
    InvalidTiling {
        oligo_length: usize,
        overlap_length: usize,
        reason: &'static str,
    },

    #[error("Controlled codon {0} has no design")]
    MissingDesign(Codon),

    #[error(
        "Protein of {length} codons cannot be tiled by oligos of {oligo_length} codons overlapping by {overlap_length}"
    )]
    UntileableLength {
        length: usize,
        oligo_length: usize,
        overlap_length: usize,
    },

    #[error("Design region {region} for {codon} exceeds the {positions} tiling positions")]
    RegionOutOfRange {
        codon: Codon,
        region: Region,
        positions: usize,
    },

    #[error(
        "Design for {codon} over {region} requests {requested} occurrences at level {level}, but only {available} positions are available"
    )]
    InsufficientPositions {
        codon: Codon,
        region: Region,
        level: usize,
        requested: usize,
        available: usize,
    },

    #[error("Position {position} ({amino_acid}) has no synonym outside the controlled codons")]
    UnrealizableWildcard {
        amino_acid: AminoAcid,
        position: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilingConfig {
    /// Oligo length in codons.
    pub oligo_length: usize,
    /// Overlap length in codons.
    pub overlap_length: usize,
}

impl TilingConfig {
    pub fn stride(&self) -> usize {
        self.oligo_length - self.overlap_length
    }

    /// Number of tiling positions for a protein of `length` codons.
    pub fn positions_for(&self, length: usize) -> Result<usize, ConfigError> {
        let untileable = ConfigError::UntileableLength {
            length,
            oligo_length: self.oligo_length,
            overlap_length: self.overlap_length,
        };
        if length < self.oligo_length || (length - self.overlap_length) % self.stride() != 0 {
            return Err(untileable);
        }
        Ok((length - self.overlap_length) / self.stride())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub forbidden_sites: ForbiddenSites,
    pub verify_realizations: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryConfig {
    pub tiling: TilingConfig,
    pub designs: DesignSet,
    pub controlled_codons: Vec<Codon>,
    pub search: SearchConfig,
    pub selection_seed: Option<u64>,
}

#[derive(Default)]
pub struct LibraryConfigBuilder {
    oligo_length: Option<usize>,
    overlap_length: Option<usize>,
    designs: Option<DesignSet>,
    controlled_codons: Option<Vec<Codon>>,
    forbidden_sites: Option<ForbiddenSites>,
    verify_realizations: Option<bool>,
    selection_seed: Option<u64>,
}

impl LibraryConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn oligo_length(mut self, codons: usize) -> Self {
        self.oligo_length = Some(codons);
        self
    }
    pub fn overlap_length(mut self, codons: usize) -> Self {
        self.overlap_length = Some(codons);
        self
    }
    pub fn designs(mut self, designs: DesignSet) -> Self {
        self.designs = Some(designs);
        self
    }
    pub fn controlled_codons(mut self, codons: Vec<Codon>) -> Self {
        self.controlled_codons = Some(codons);
        self
    }
    pub fn forbidden_sites(mut self, sites: ForbiddenSites) -> Self {
        self.forbidden_sites = Some(sites);
        self
    }
    pub fn verify_realizations(mut self, verify: bool) -> Self {
        self.verify_realizations = Some(verify);
        self
    }
    pub fn selection_seed(mut self, seed: Option<u64>) -> Self {
        self.selection_seed = seed;
        self
    }

    pub fn build(self) -> Result<LibraryConfig, ConfigError> {
        let oligo_length = self
            .oligo_length
            .ok_or(ConfigError::MissingParameter("oligo_length"))?;
        let overlap_length = self
            .overlap_length
            .ok_or(ConfigError::MissingParameter("overlap_length"))?;

        let invalid = |reason| ConfigError::InvalidTiling {
            oligo_length,
            overlap_length,
            reason,
        };
        if overlap_length == 0 {
            return Err(invalid("overlap length must be at least one codon"));
        }
        if 2 * overlap_length > oligo_length {
            return Err(invalid(
                "an oligo must hold its leading and trailing overlaps without sharing codons",
            ));
        }

        let designs = self.designs.unwrap_or_default();
        let controlled_codons = self.controlled_codons.unwrap_or_else(|| designs.codons());
        if let Some(missing) = controlled_codons
            .iter()
            .find(|codon| designs.get(codon).is_none())
        {
            return Err(ConfigError::MissingDesign(*missing));
        }

        Ok(LibraryConfig {
            tiling: TilingConfig {
                oligo_length,
                overlap_length,
            },
            designs,
            controlled_codons,
            search: SearchConfig {
                forbidden_sites: self.forbidden_sites.unwrap_or_default(),
                verify_realizations: self.verify_realizations.unwrap_or(true),
            },
            selection_seed: self.selection_seed,
        })
    }
}

use super::catalog::codon::{CatalogError, Codon};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// An inclusive range of tiling positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Region {
    pub first: usize,
    pub last: usize,
}

impl Region {
    pub fn new(first: usize, last: usize) -> Result<Self, DesignError> {
        if first > last {
            return Err(DesignError::InvalidRegion { first, last });
        }
        Ok(Self { first, last })
    }

    pub fn contains(&self, position: usize) -> bool {
        (self.first..=self.last).contains(&position)
    }

    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }

    pub fn intersects(&self, other: &Region) -> bool {
        self.first <= other.last && other.first <= self.last
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.first, self.last)
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum DesignError {
    #[error("Invalid region: first position {first} is after last position {last}")]
    InvalidRegion { first: usize, last: usize },

    #[error("Design for {codon} over region {region} has no levels")]
    EmptyLevels { codon: Codon, region: Region },

    #[error("Design for {codon} has overlapping regions {a} and {b}")]
    OverlappingRegions { codon: Codon, a: Region, b: Region },

    #[error("Codon {0} appears in more than one design")]
    DuplicateCodon(Codon),

    #[error(transparent)]
    Codon(#[from] CatalogError),
}

/// The per-level target counts of one controlled codon, keyed by region.
///
/// Produced by an external frequency optimization; this crate consumes it as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Design {
    codon: Codon,
    entries: BTreeMap<Region, Vec<usize>>,
}

impl Design {
    pub fn new(codon: Codon) -> Self {
        Self {
            codon,
            entries: BTreeMap::new(),
        }
    }

    /// Adds the ordered per-level target counts for `region`.
    pub fn with_region(mut self, region: Region, counts: Vec<usize>) -> Result<Self, DesignError> {
        self.insert(region, counts)?;
        Ok(self)
    }

    pub fn insert(&mut self, region: Region, counts: Vec<usize>) -> Result<(), DesignError> {
        if counts.is_empty() {
            return Err(DesignError::EmptyLevels {
                codon: self.codon,
                region,
            });
        }
        if let Some(existing) = self.entries.keys().find(|r| r.intersects(&region)) {
            return Err(DesignError::OverlappingRegions {
                codon: self.codon,
                a: *existing,
                b: region,
            });
        }
        self.entries.insert(region, counts);
        Ok(())
    }

    pub fn codon(&self) -> Codon {
        self.codon
    }

    pub fn entries(&self) -> impl Iterator<Item = (&Region, &Vec<usize>)> {
        self.entries.iter()
    }

    pub fn levels(&self, region: &Region) -> Option<&[usize]> {
        self.entries.get(region).map(Vec::as_slice)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRegion {
    first: usize,
    last: usize,
    counts: Vec<usize>,
}

/// The full set of designs, one per controlled codon, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesignSet {
    designs: Vec<Design>,
}

impl DesignSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, design: Design) -> Result<(), DesignError> {
        if self.get(&design.codon).is_some() {
            return Err(DesignError::DuplicateCodon(design.codon));
        }
        self.designs.push(design);
        Ok(())
    }

    pub fn get(&self, codon: &Codon) -> Option<&Design> {
        self.designs.iter().find(|d| d.codon == *codon)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Design> {
        self.designs.iter()
    }

    pub fn codons(&self) -> Vec<Codon> {
        self.designs.iter().map(Design::codon).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.designs.is_empty()
    }

    /// Parses a TOML design table of the form
    /// `CTA = [{ first = 0, last = 3, counts = [1, 4] }]`.
    ///
    /// Designs register in the order the table lists them.
    pub fn from_toml_str(content: &str) -> Result<Self, DesignLoadError> {
        let raw: toml::Table = toml::from_str(content)?;
        let mut set = DesignSet::new();
        for (codon_name, value) in raw {
            let codon = Codon::parse(&codon_name).map_err(DesignError::from)?;
            let regions: Vec<RawRegion> = value.try_into()?;
            let mut design = Design::new(codon);
            for region in regions {
                design.insert(Region::new(region.first, region.last)?, region.counts)?;
            }
            set.add(design)?;
        }
        Ok(set)
    }

    pub fn load(path: &Path) -> Result<Self, DesignLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| DesignLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            DesignLoadError::Parse(source) => DesignLoadError::Toml {
                path: path.to_string_lossy().to_string(),
                source,
            },
            other => other,
        })
    }
}

#[derive(Debug, Error)]
pub enum DesignLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("TOML parsing error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid design table: {0}")]
    Invalid(#[from] DesignError),
}

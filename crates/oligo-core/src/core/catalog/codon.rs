use super::amino_acid::AminoAcid;
use phf::{Map, phf_map};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Standard genetic code (NCBI translation table 1).
static CODON_TABLE: Map<&'static str, AminoAcid> = phf_map! {
    "TTT" => AminoAcid::Phenylalanine, "TTC" => AminoAcid::Phenylalanine, "TTA" => AminoAcid::Leucine, "TTG" => AminoAcid::Leucine,
    "TCT" => AminoAcid::Serine, "TCC" => AminoAcid::Serine, "TCA" => AminoAcid::Serine, "TCG" => AminoAcid::Serine,
    "TAT" => AminoAcid::Tyrosine, "TAC" => AminoAcid::Tyrosine, "TAA" => AminoAcid::Stop, "TAG" => AminoAcid::Stop,
    "TGT" => AminoAcid::Cysteine, "TGC" => AminoAcid::Cysteine, "TGA" => AminoAcid::Stop, "TGG" => AminoAcid::Tryptophan,
    "CTT" => AminoAcid::Leucine, "CTC" => AminoAcid::Leucine, "CTA" => AminoAcid::Leucine, "CTG" => AminoAcid::Leucine,
    "CCT" => AminoAcid::Proline, "CCC" => AminoAcid::Proline, "CCA" => AminoAcid::Proline, "CCG" => AminoAcid::Proline,
    "CAT" => AminoAcid::Histidine, "CAC" => AminoAcid::Histidine, "CAA" => AminoAcid::Glutamine, "CAG" => AminoAcid::Glutamine,
    "CGT" => AminoAcid::Arginine, "CGC" => AminoAcid::Arginine, "CGA" => AminoAcid::Arginine, "CGG" => AminoAcid::Arginine,
    "ATT" => AminoAcid::Isoleucine, "ATC" => AminoAcid::Isoleucine, "ATA" => AminoAcid::Isoleucine, "ATG" => AminoAcid::Methionine,
    "ACT" => AminoAcid::Threonine, "ACC" => AminoAcid::Threonine, "ACA" => AminoAcid::Threonine, "ACG" => AminoAcid::Threonine,
    "AAT" => AminoAcid::Asparagine, "AAC" => AminoAcid::Asparagine, "AAA" => AminoAcid::Lysine, "AAG" => AminoAcid::Lysine,
    "AGT" => AminoAcid::Serine, "AGC" => AminoAcid::Serine, "AGA" => AminoAcid::Arginine, "AGG" => AminoAcid::Arginine,
    "GTT" => AminoAcid::Valine, "GTC" => AminoAcid::Valine, "GTA" => AminoAcid::Valine, "GTG" => AminoAcid::Valine,
    "GCT" => AminoAcid::Alanine, "GCC" => AminoAcid::Alanine, "GCA" => AminoAcid::Alanine, "GCG" => AminoAcid::Alanine,
    "GAT" => AminoAcid::AsparticAcid, "GAC" => AminoAcid::AsparticAcid, "GAA" => AminoAcid::GlutamicAcid, "GAG" => AminoAcid::GlutamicAcid,
    "GGT" => AminoAcid::Glycine, "GGC" => AminoAcid::Glycine, "GGA" => AminoAcid::Glycine, "GGG" => AminoAcid::Glycine,
};

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CatalogError {
    #[error("Codon '{0}' must be exactly three nucleotides")]
    InvalidLength(String),
    #[error("Unknown codon '{0}'")]
    UnknownCodon(String),
}

/// An immutable nucleotide triplet together with the amino acid it encodes.
///
/// Wildcard codons carry IUPAC ambiguity bases and are never equal to a
/// literal codon, even when the bases coincide (e.g. `ATG` for methionine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Codon {
    bases: &'static str,
    amino_acid: AminoAcid,
    wildcard: bool,
}

impl Codon {
    pub(crate) const fn literal(bases: &'static str, amino_acid: AminoAcid) -> Self {
        Self {
            bases,
            amino_acid,
            wildcard: false,
        }
    }

    pub(crate) const fn wildcard(bases: &'static str, amino_acid: AminoAcid) -> Self {
        Self {
            bases,
            amino_acid,
            wildcard: true,
        }
    }

    /// Parses a literal codon. Case-insensitive; `U` is read as `T`.
    pub fn parse(s: &str) -> Result<Self, CatalogError> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c.to_ascii_uppercase() {
                'U' => 'T',
                other => other,
            })
            .collect();
        if normalized.len() != 3 {
            return Err(CatalogError::InvalidLength(s.to_string()));
        }
        CODON_TABLE
            .get_entry(normalized.as_str())
            .map(|(bases, aa)| Self::literal(*bases, *aa))
            .ok_or_else(|| CatalogError::UnknownCodon(s.to_string()))
    }

    pub fn bases(&self) -> &'static str {
        self.bases
    }

    pub fn amino_acid(&self) -> AminoAcid {
        self.amino_acid
    }

    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    pub fn is_synonym_of(&self, other: &Codon) -> bool {
        self.amino_acid == other.amino_acid
    }
}

impl fmt::Display for Codon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.bases)
    }
}

impl FromStr for Codon {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive_and_accepts_rna() {
        let codon = Codon::parse("cug").unwrap();
        assert_eq!(codon.bases(), "CTG");
        assert_eq!(codon.amino_acid(), AminoAcid::Leucine);
        assert!(!codon.is_wildcard());
    }

    #[test]
    fn parse_rejects_bad_lengths_and_ambiguous_bases() {
        assert_eq!(
            Codon::parse("AT"),
            Err(CatalogError::InvalidLength("AT".to_string()))
        );
        assert_eq!(
            Codon::parse("GCN"),
            Err(CatalogError::UnknownCodon("GCN".to_string()))
        );
    }

    #[test]
    fn parsed_codon_equals_catalog_synonym() {
        let parsed = Codon::parse("GCA").unwrap();
        assert!(AminoAcid::Alanine.synonyms().contains(&parsed));
    }

    #[test]
    fn table_agrees_with_synonym_sets() {
        for aa in AminoAcid::ALL {
            for codon in aa.synonyms() {
                assert_eq!(Codon::parse(codon.bases()).unwrap(), *codon);
            }
        }
    }

    #[test]
    fn synonym_check_compares_amino_acids() {
        let a = Codon::parse("TCT").unwrap();
        let b = Codon::parse("AGC").unwrap();
        let c = Codon::parse("ACT").unwrap();
        assert!(a.is_synonym_of(&b));
        assert!(!a.is_synonym_of(&c));
        assert!(a.is_synonym_of(&AminoAcid::Serine.wildcard()));
    }
}

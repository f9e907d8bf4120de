use super::bases::BaseSequence;
use crate::core::catalog::amino_acid::AminoAcid;
use crate::core::catalog::codon::{CatalogError, Codon};
use std::ops::Range;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SequenceError {
    #[error("Sequence length {length} is not a multiple of three")]
    NonTripletLength { length: usize },

    #[error("Invalid codon at position {position}: {source}")]
    InvalidCodon {
        position: usize,
        #[source]
        source: CatalogError,
    },

    #[error("Codon index {index} is out of bounds for a sequence of {length} codons")]
    IndexOutOfBounds { index: usize, length: usize },

    #[error(
        "Substitution at position {index} would change {current} ({current_aa}) into {replacement} ({replacement_aa})",
        current_aa = current.amino_acid(),
        replacement_aa = replacement.amino_acid()
    )]
    AminoAcidMismatch {
        index: usize,
        current: Codon,
        replacement: Codon,
    },

    #[error("Invalid nucleotide pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// An ordered, index-addressable list of codons.
///
/// All mutation goes through [`Sequence::set`], which refuses any replacement
/// that would change the encoded amino acid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Sequence {
    codons: Vec<Codon>,
}

impl Sequence {
    pub fn new(codons: Vec<Codon>) -> Self {
        Self { codons }
    }

    /// Reads a literal nucleotide string, three bases per codon.
    ///
    /// Whitespace is ignored. Ambiguity codes are rejected because every
    /// position of an input gene must name a concrete codon.
    pub fn from_bases(bases: &str) -> Result<Self, SequenceError> {
        let cleaned: Vec<char> = bases.chars().filter(|c| !c.is_whitespace()).collect();
        if cleaned.len() % 3 != 0 {
            return Err(SequenceError::NonTripletLength {
                length: cleaned.len(),
            });
        }
        let codons = cleaned
            .chunks(3)
            .enumerate()
            .map(|(position, triplet)| {
                let triplet: String = triplet.iter().collect();
                Codon::parse(&triplet)
                    .map_err(|source| SequenceError::InvalidCodon { position, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { codons })
    }

    pub fn len(&self) -> usize {
        self.codons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codons.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Codon> {
        self.codons.get(index).copied()
    }

    pub fn codons(&self) -> &[Codon] {
        &self.codons
    }

    pub fn iter(&self) -> impl Iterator<Item = &Codon> {
        self.codons.iter()
    }

    pub fn amino_acids(&self) -> impl Iterator<Item = AminoAcid> + '_ {
        self.codons.iter().map(Codon::amino_acid)
    }

    /// Replaces the codon at `index`, returning the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::AminoAcidMismatch`] if `codon` encodes a different
    /// amino acid than the current occupant, and [`SequenceError::IndexOutOfBounds`]
    /// for an invalid index.
    pub fn set(&mut self, index: usize, codon: Codon) -> Result<Codon, SequenceError> {
        let length = self.codons.len();
        let slot = self
            .codons
            .get_mut(index)
            .ok_or(SequenceError::IndexOutOfBounds { index, length })?;
        if !slot.is_synonym_of(&codon) {
            return Err(SequenceError::AminoAcidMismatch {
                index,
                current: *slot,
                replacement: codon,
            });
        }
        Ok(std::mem::replace(slot, codon))
    }

    /// Copies the codons in `range` into a new sequence.
    pub fn window(&self, range: Range<usize>) -> Result<Sequence, SequenceError> {
        if range.end > self.codons.len() || range.start > range.end {
            return Err(SequenceError::IndexOutOfBounds {
                index: range.end,
                length: self.codons.len(),
            });
        }
        Ok(Sequence::new(self.codons[range].to_vec()))
    }

    pub fn count(&self, codon: &Codon) -> usize {
        self.codons.iter().filter(|c| *c == codon).count()
    }

    pub fn to_bases(&self) -> BaseSequence {
        BaseSequence::from(self)
    }
}

impl FromIterator<Codon> for Sequence {
    fn from_iter<I: IntoIterator<Item = Codon>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codon(s: &str) -> Codon {
        Codon::parse(s).unwrap()
    }

    #[test]
    fn from_bases_reads_codons_in_order() {
        let seq = Sequence::from_bases("ATG gct\nTAA").unwrap();
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.get(1), Some(codon("GCT")));
        assert_eq!(
            seq.amino_acids().collect::<Vec<_>>(),
            vec![AminoAcid::Methionine, AminoAcid::Alanine, AminoAcid::Stop]
        );
    }

    #[test]
    fn from_bases_rejects_non_triplet_length() {
        assert_eq!(
            Sequence::from_bases("ATGG"),
            Err(SequenceError::NonTripletLength { length: 4 })
        );
    }

    #[test]
    fn from_bases_reports_position_of_bad_codon() {
        let err = Sequence::from_bases("ATGNNN").unwrap_err();
        assert!(matches!(err, SequenceError::InvalidCodon { position: 1, .. }));
    }

    #[test]
    fn set_accepts_synonym_and_returns_previous_codon() {
        let mut seq = Sequence::from_bases("CTAGCT").unwrap();
        let previous = seq.set(0, codon("TTG")).unwrap();
        assert_eq!(previous, codon("CTA"));
        assert_eq!(seq.get(0), Some(codon("TTG")));
    }

    #[test]
    fn set_rejects_amino_acid_change() {
        let mut seq = Sequence::from_bases("CTAGCT").unwrap();
        let err = seq.set(1, codon("TTG")).unwrap_err();
        assert!(matches!(err, SequenceError::AminoAcidMismatch { index: 1, .. }));
        assert_eq!(seq.get(1), Some(codon("GCT")));
    }

    #[test]
    fn set_accepts_wildcard_of_same_amino_acid() {
        let mut seq = Sequence::from_bases("CTA").unwrap();
        seq.set(0, AminoAcid::Leucine.wildcard()).unwrap();
        assert!(seq.get(0).unwrap().is_wildcard());
    }

    #[test]
    fn set_out_of_bounds_is_an_error() {
        let mut seq = Sequence::from_bases("CTA").unwrap();
        assert_eq!(
            seq.set(3, codon("CTA")),
            Err(SequenceError::IndexOutOfBounds {
                index: 3,
                length: 1
            })
        );
    }

    #[test]
    fn window_copies_sub_range() {
        let seq = Sequence::from_bases("ATGGCTCTATAA").unwrap();
        let window = seq.window(1..3).unwrap();
        assert_eq!(window.codons(), &[codon("GCT"), codon("CTA")]);
        assert!(seq.window(2..5).is_err());
    }

    #[test]
    fn count_matches_exact_codon_only() {
        let seq = Sequence::from_bases("CTACTGCTA").unwrap();
        assert_eq!(seq.count(&codon("CTA")), 2);
        assert_eq!(seq.count(&codon("CTG")), 1);
    }
}

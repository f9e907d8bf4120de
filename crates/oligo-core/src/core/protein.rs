use super::catalog::amino_acid::AminoAcid;
use super::catalog::codon::Codon;
use super::sequence::codons::{Sequence, SequenceError};
use std::ops::Range;

/// A translated gene: the literal codon sequence plus a parallel amino-acid
/// list in which positions outside the design window are padding (`None`).
///
/// Padding keeps its literal codons in every realization but is never touched
/// by codon assignment or the synonymous-swap search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Protein {
    sequence: Sequence,
    residues: Vec<Option<AminoAcid>>,
    window: Range<usize>,
}

impl Protein {
    pub fn new(sequence: Sequence, window: Range<usize>) -> Result<Self, SequenceError> {
        if window.start > window.end || window.end > sequence.len() {
            return Err(SequenceError::IndexOutOfBounds {
                index: window.end,
                length: sequence.len(),
            });
        }
        let residues = sequence
            .amino_acids()
            .enumerate()
            .map(|(i, aa)| window.contains(&i).then_some(aa))
            .collect();
        Ok(Self {
            sequence,
            residues,
            window,
        })
    }

    /// Translates `bases`; the whole sequence is the design window when `window` is `None`.
    pub fn from_bases(bases: &str, window: Option<Range<usize>>) -> Result<Self, SequenceError> {
        let sequence = Sequence::from_bases(bases)?;
        let window = window.unwrap_or(0..sequence.len());
        Self::new(sequence, window)
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn window(&self) -> Range<usize> {
        self.window.clone()
    }

    /// The amino acid at `index`, or `None` for padding and out-of-range indices.
    pub fn amino_acid(&self, index: usize) -> Option<AminoAcid> {
        self.residues.get(index).copied().flatten()
    }

    pub fn is_padding(&self, index: usize) -> bool {
        self.amino_acid(index).is_none()
    }

    /// One-letter rendering, padding shown as `-`.
    pub fn to_symbols(&self) -> String {
        self.residues
            .iter()
            .map(|r| r.map_or('-', |aa| aa.symbol()))
            .collect()
    }

    /// The template the tiling starts from: every in-window position whose amino
    /// acid is encoded by one of `controlled` holds that amino acid's wildcard.
    pub fn wildcard_filled(&self, controlled: &[Codon]) -> Sequence {
        self.sequence
            .iter()
            .enumerate()
            .map(|(i, codon)| match self.amino_acid(i) {
                Some(aa) if controlled.iter().any(|c| c.amino_acid() == aa) => aa.wildcard(),
                _ => *codon,
            })
            .collect()
    }
}

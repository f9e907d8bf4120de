use super::codons::{Sequence, SequenceError};
use std::fmt;

const A: u8 = 0b0001;
const C: u8 = 0b0010;
const G: u8 = 0b0100;
const T: u8 = 0b1000;

/// Maps an IUPAC nucleotide code to the set of literal bases it stands for.
pub(crate) fn base_mask(base: u8) -> Option<u8> {
    let mask = match base.to_ascii_uppercase() {
        b'A' => A,
        b'C' => C,
        b'G' => G,
        b'T' | b'U' => T,
        b'R' => A | G,
        b'Y' => C | T,
        b'S' => C | G,
        b'W' => A | T,
        b'K' => G | T,
        b'M' => A | C,
        b'B' => C | G | T,
        b'D' => A | G | T,
        b'H' => A | C | T,
        b'V' => A | C | G,
        b'N' => A | C | G | T,
        _ => return None,
    };
    Some(mask)
}

fn complement_mask(mask: u8) -> u8 {
    ((mask & A) << 3) | ((mask & T) >> 3) | ((mask & C) << 1) | ((mask & G) >> 1)
}

/// A nucleotide pattern in IUPAC notation, e.g. `GGTCTC` or `GCNNNNNNNGC`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasePattern {
    raw: String,
    masks: Vec<u8>,
}

impl BasePattern {
    pub fn parse(pattern: &str) -> Result<Self, SequenceError> {
        let raw = pattern.trim().to_ascii_uppercase();
        if raw.is_empty() {
            return Err(SequenceError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "pattern is empty".to_string(),
            });
        }
        let masks = raw
            .bytes()
            .map(|b| {
                base_mask(b).ok_or_else(|| SequenceError::InvalidPattern {
                    pattern: pattern.to_string(),
                    reason: format!("'{}' is not an IUPAC nucleotide code", b as char),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { raw, masks })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    pub fn reverse_complement(&self) -> Self {
        let masks: Vec<u8> = self.masks.iter().rev().map(|&m| complement_mask(m)).collect();
        let raw = self
            .raw
            .bytes()
            .rev()
            .map(|b| complement_base(b) as char)
            .collect();
        Self { raw, masks }
    }

    pub fn is_palindromic(&self) -> bool {
        self.reverse_complement().masks == self.masks
    }

    fn matches_at(&self, subject: &[u8], offset: usize) -> bool {
        self.masks
            .iter()
            .zip(&subject[offset..offset + self.masks.len()])
            .all(|(&p, &s)| p & s != 0)
    }
}

impl fmt::Display for BasePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn complement_base(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'T' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        b'R' => b'Y',
        b'Y' => b'R',
        b'K' => b'M',
        b'M' => b'K',
        b'B' => b'V',
        b'V' => b'B',
        b'D' => b'H',
        b'H' => b'D',
        other => other,
    }
}

/// The nucleotide-level view of a [`Sequence`].
///
/// Bases may themselves be ambiguous (wildcard codons). A pattern base matches a
/// subject base when their base sets intersect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BaseSequence {
    bases: String,
    masks: Vec<u8>,
}

impl BaseSequence {
    pub fn as_str(&self) -> &str {
        &self.bases
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    pub fn push_sequence(&mut self, sequence: &Sequence) {
        for codon in sequence.iter() {
            self.push_bases(codon.bases());
        }
    }

    fn push_bases(&mut self, bases: &str) {
        self.bases.push_str(bases);
        self.masks
            .extend(bases.bytes().map(|b| base_mask(b).unwrap_or(0)));
    }

    /// Offset of the first occurrence of `pattern`, if any.
    pub fn find(&self, pattern: &BasePattern) -> Option<usize> {
        if pattern.len() > self.masks.len() {
            return None;
        }
        (0..=self.masks.len() - pattern.len()).find(|&offset| pattern.matches_at(&self.masks, offset))
    }

    pub fn contains(&self, pattern: &BasePattern) -> bool {
        self.find(pattern).is_some()
    }
}

impl From<&Sequence> for BaseSequence {
    fn from(sequence: &Sequence) -> Self {
        let mut bases = BaseSequence::default();
        bases.push_sequence(sequence);
        bases
    }
}

impl fmt::Display for BaseSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.bases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::amino_acid::AminoAcid;
    use crate::core::catalog::codon::Codon;

    fn bases(s: &str) -> BaseSequence {
        Sequence::from_bases(s).unwrap().to_bases()
    }

    #[test]
    fn finds_exact_pattern() {
        let seq = bases("ATGGGTCTCTAA");
        let pattern = BasePattern::parse("GGTCTC").unwrap();
        assert_eq!(seq.find(&pattern), Some(3));
    }

    #[test]
    fn ambiguous_pattern_base_matches_any_member() {
        let seq = bases("GCATTTGCA");
        assert!(seq.contains(&BasePattern::parse("GCNTTT").unwrap()));
        assert!(seq.contains(&BasePattern::parse("TTYG").unwrap()));
        assert!(!seq.contains(&BasePattern::parse("GCY").unwrap()));
    }

    #[test]
    fn wildcard_subject_bases_intersect_pattern() {
        let seq = Sequence::new(vec![AminoAcid::Alanine.wildcard()]).to_bases();
        assert_eq!(seq.as_str(), "GCN");
        assert!(seq.contains(&BasePattern::parse("GCA").unwrap()));
        assert!(!seq.contains(&BasePattern::parse("GGA").unwrap()));
    }

    #[test]
    fn pattern_longer_than_subject_never_matches() {
        let seq = bases("ATG");
        assert_eq!(seq.find(&BasePattern::parse("ATGA").unwrap()), None);
    }

    #[test]
    fn parse_rejects_empty_and_unknown_codes() {
        assert!(BasePattern::parse("").is_err());
        assert!(BasePattern::parse("GAXTC").is_err());
    }

    #[test]
    fn reverse_complement_of_ambiguous_pattern() {
        let pattern = BasePattern::parse("GAAGAC").unwrap();
        assert_eq!(pattern.reverse_complement().as_str(), "GTCTTC");
        let ambiguous = BasePattern::parse("RGN").unwrap();
        assert_eq!(ambiguous.reverse_complement().as_str(), "NCY");
    }

    #[test]
    fn palindromic_sites_are_detected() {
        assert!(BasePattern::parse("GAATTC").unwrap().is_palindromic());
        assert!(!BasePattern::parse("GGTCTC").unwrap().is_palindromic());
    }

    #[test]
    fn push_sequence_appends_codon_bases() {
        let mut seq = BaseSequence::default();
        seq.push_sequence(&Sequence::new(vec![Codon::parse("ATG").unwrap()]));
        seq.push_sequence(&Sequence::new(vec![Codon::parse("TAA").unwrap()]));
        assert_eq!(seq.to_string(), "ATGTAA");
        assert_eq!(seq.len(), 6);
    }
}

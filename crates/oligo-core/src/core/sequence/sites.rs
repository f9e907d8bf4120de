use super::bases::{BasePattern, BaseSequence};
use super::codons::SequenceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Forward,
    Reverse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteHit {
    pub pattern: String,
    pub offset: usize,
    pub strand: Strand,
}

/// The set of nucleotide subsequences (typically restriction sites) that no
/// overlap or assembled gene may contain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForbiddenSites {
    patterns: Vec<BasePattern>,
    check_reverse_complement: bool,
}

impl ForbiddenSites {
    pub fn new(patterns: Vec<BasePattern>, check_reverse_complement: bool) -> Self {
        Self {
            patterns,
            check_reverse_complement,
        }
    }

    pub fn parse<S: AsRef<str>>(
        patterns: &[S],
        check_reverse_complement: bool,
    ) -> Result<Self, SequenceError> {
        let patterns = patterns
            .iter()
            .map(|p| BasePattern::parse(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(patterns, check_reverse_complement))
    }

    pub fn patterns(&self) -> &[BasePattern] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn checks_reverse_complement(&self) -> bool {
        self.check_reverse_complement
    }

    /// Returns the first forbidden site found in `sequence`.
    pub fn first_hit(&self, sequence: &BaseSequence) -> Option<SiteHit> {
        for pattern in &self.patterns {
            if let Some(offset) = sequence.find(pattern) {
                return Some(SiteHit {
                    pattern: pattern.to_string(),
                    offset,
                    strand: Strand::Forward,
                });
            }
            if self.check_reverse_complement && !pattern.is_palindromic() {
                if let Some(offset) = sequence.find(&pattern.reverse_complement()) {
                    return Some(SiteHit {
                        pattern: pattern.to_string(),
                        offset,
                        strand: Strand::Reverse,
                    });
                }
            }
        }
        None
    }

    pub fn is_clean(&self, sequence: &BaseSequence) -> bool {
        self.first_hit(sequence).is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sequence::codons::Sequence;

    fn bases(s: &str) -> BaseSequence {
        Sequence::from_bases(s).unwrap().to_bases()
    }

    #[test]
    fn empty_set_accepts_everything() {
        let sites = ForbiddenSites::default();
        assert!(sites.is_clean(&bases("GGTCTCAAA")));
    }

    #[test]
    fn reports_first_forward_hit() {
        let sites = ForbiddenSites::parse(&["GAATTC", "GGTCTC"], false).unwrap();
        let hit = sites.first_hit(&bases("AAAGGTCTCAAA")).unwrap();
        assert_eq!(hit.pattern, "GGTCTC");
        assert_eq!(hit.offset, 3);
        assert_eq!(hit.strand, Strand::Forward);
    }

    #[test]
    fn reverse_strand_is_checked_only_when_enabled() {
        let forward_only = ForbiddenSites::parse(&["GGTCTC"], false).unwrap();
        let both = ForbiddenSites::parse(&["GGTCTC"], true).unwrap();
        let seq = bases("AAAGAGACCAAA");
        assert!(forward_only.is_clean(&seq));
        let hit = both.first_hit(&seq).unwrap();
        assert_eq!(hit.strand, Strand::Reverse);
        assert_eq!(hit.offset, 3);
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        assert!(ForbiddenSites::parse(&["GGZ"], false).is_err());
    }
}

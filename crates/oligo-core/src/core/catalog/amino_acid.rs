use super::codon::Codon;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AminoAcid {
    // --- Aliphatic, Nonpolar ---
    Alanine,
    Glycine,
    Isoleucine,
    Leucine,
    Proline,
    Valine,

    // --- Aromatic ---
    Phenylalanine,
    Tryptophan,
    Tyrosine,

    // --- Polar, Uncharged ---
    Asparagine,
    Cysteine,
    Glutamine,
    Serine,
    Threonine,
    Methionine,

    // --- Charged ---
    Arginine,
    Lysine,
    AsparticAcid,
    GlutamicAcid,
    Histidine,

    // --- Translation terminator ---
    Stop,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid amino acid symbol: '{0}'")]
pub struct ParseAminoAcidError(pub String);

const ALANINE: &[Codon] = &[
    Codon::literal("GCT", AminoAcid::Alanine),
    Codon::literal("GCC", AminoAcid::Alanine),
    Codon::literal("GCA", AminoAcid::Alanine),
    Codon::literal("GCG", AminoAcid::Alanine),
];
const GLYCINE: &[Codon] = &[
    Codon::literal("GGT", AminoAcid::Glycine),
    Codon::literal("GGC", AminoAcid::Glycine),
    Codon::literal("GGA", AminoAcid::Glycine),
    Codon::literal("GGG", AminoAcid::Glycine),
];
const ISOLEUCINE: &[Codon] = &[
    Codon::literal("ATT", AminoAcid::Isoleucine),
    Codon::literal("ATC", AminoAcid::Isoleucine),
    Codon::literal("ATA", AminoAcid::Isoleucine),
];
const LEUCINE: &[Codon] = &[
    Codon::literal("TTA", AminoAcid::Leucine),
    Codon::literal("TTG", AminoAcid::Leucine),
    Codon::literal("CTT", AminoAcid::Leucine),
    Codon::literal("CTC", AminoAcid::Leucine),
    Codon::literal("CTA", AminoAcid::Leucine),
    Codon::literal("CTG", AminoAcid::Leucine),
];
const PROLINE: &[Codon] = &[
    Codon::literal("CCT", AminoAcid::Proline),
    Codon::literal("CCC", AminoAcid::Proline),
    Codon::literal("CCA", AminoAcid::Proline),
    Codon::literal("CCG", AminoAcid::Proline),
];
const VALINE: &[Codon] = &[
    Codon::literal("GTT", AminoAcid::Valine),
    Codon::literal("GTC", AminoAcid::Valine),
    Codon::literal("GTA", AminoAcid::Valine),
    Codon::literal("GTG", AminoAcid::Valine),
];
const PHENYLALANINE: &[Codon] = &[
    Codon::literal("TTT", AminoAcid::Phenylalanine),
    Codon::literal("TTC", AminoAcid::Phenylalanine),
];
const TRYPTOPHAN: &[Codon] = &[Codon::literal("TGG", AminoAcid::Tryptophan)];
const TYROSINE: &[Codon] = &[
    Codon::literal("TAT", AminoAcid::Tyrosine),
    Codon::literal("TAC", AminoAcid::Tyrosine),
];
const ASPARAGINE: &[Codon] = &[
    Codon::literal("AAT", AminoAcid::Asparagine),
    Codon::literal("AAC", AminoAcid::Asparagine),
];
const CYSTEINE: &[Codon] = &[
    Codon::literal("TGT", AminoAcid::Cysteine),
    Codon::literal("TGC", AminoAcid::Cysteine),
];
const GLUTAMINE: &[Codon] = &[
    Codon::literal("CAA", AminoAcid::Glutamine),
    Codon::literal("CAG", AminoAcid::Glutamine),
];
const SERINE: &[Codon] = &[
    Codon::literal("TCT", AminoAcid::Serine),
    Codon::literal("TCC", AminoAcid::Serine),
    Codon::literal("TCA", AminoAcid::Serine),
    Codon::literal("TCG", AminoAcid::Serine),
    Codon::literal("AGT", AminoAcid::Serine),
    Codon::literal("AGC", AminoAcid::Serine),
];
const THREONINE: &[Codon] = &[
    Codon::literal("ACT", AminoAcid::Threonine),
    Codon::literal("ACC", AminoAcid::Threonine),
    Codon::literal("ACA", AminoAcid::Threonine),
    Codon::literal("ACG", AminoAcid::Threonine),
];
const METHIONINE: &[Codon] = &[Codon::literal("ATG", AminoAcid::Methionine)];
const ARGININE: &[Codon] = &[
    Codon::literal("CGT", AminoAcid::Arginine),
    Codon::literal("CGC", AminoAcid::Arginine),
    Codon::literal("CGA", AminoAcid::Arginine),
    Codon::literal("CGG", AminoAcid::Arginine),
    Codon::literal("AGA", AminoAcid::Arginine),
    Codon::literal("AGG", AminoAcid::Arginine),
];
const LYSINE: &[Codon] = &[
    Codon::literal("AAA", AminoAcid::Lysine),
    Codon::literal("AAG", AminoAcid::Lysine),
];
const ASPARTIC_ACID: &[Codon] = &[
    Codon::literal("GAT", AminoAcid::AsparticAcid),
    Codon::literal("GAC", AminoAcid::AsparticAcid),
];
const GLUTAMIC_ACID: &[Codon] = &[
    Codon::literal("GAA", AminoAcid::GlutamicAcid),
    Codon::literal("GAG", AminoAcid::GlutamicAcid),
];
const HISTIDINE: &[Codon] = &[
    Codon::literal("CAT", AminoAcid::Histidine),
    Codon::literal("CAC", AminoAcid::Histidine),
];
const STOP: &[Codon] = &[
    Codon::literal("TAA", AminoAcid::Stop),
    Codon::literal("TAG", AminoAcid::Stop),
    Codon::literal("TGA", AminoAcid::Stop),
];

impl AminoAcid {
    pub const ALL: [AminoAcid; 21] = [
        AminoAcid::Alanine,
        AminoAcid::Glycine,
        AminoAcid::Isoleucine,
        AminoAcid::Leucine,
        AminoAcid::Proline,
        AminoAcid::Valine,
        AminoAcid::Phenylalanine,
        AminoAcid::Tryptophan,
        AminoAcid::Tyrosine,
        AminoAcid::Asparagine,
        AminoAcid::Cysteine,
        AminoAcid::Glutamine,
        AminoAcid::Serine,
        AminoAcid::Threonine,
        AminoAcid::Methionine,
        AminoAcid::Arginine,
        AminoAcid::Lysine,
        AminoAcid::AsparticAcid,
        AminoAcid::GlutamicAcid,
        AminoAcid::Histidine,
        AminoAcid::Stop,
    ];

    /// One-letter IUPAC symbol, `*` for stop.
    pub fn symbol(&self) -> char {
        match self {
            AminoAcid::Alanine => 'A',
            AminoAcid::Glycine => 'G',
            AminoAcid::Isoleucine => 'I',
            AminoAcid::Leucine => 'L',
            AminoAcid::Proline => 'P',
            AminoAcid::Valine => 'V',
            AminoAcid::Phenylalanine => 'F',
            AminoAcid::Tryptophan => 'W',
            AminoAcid::Tyrosine => 'Y',
            AminoAcid::Asparagine => 'N',
            AminoAcid::Cysteine => 'C',
            AminoAcid::Glutamine => 'Q',
            AminoAcid::Serine => 'S',
            AminoAcid::Threonine => 'T',
            AminoAcid::Methionine => 'M',
            AminoAcid::Arginine => 'R',
            AminoAcid::Lysine => 'K',
            AminoAcid::AsparticAcid => 'D',
            AminoAcid::GlutamicAcid => 'E',
            AminoAcid::Histidine => 'H',
            AminoAcid::Stop => '*',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        let upper = symbol.to_ascii_uppercase();
        Self::ALL.iter().copied().find(|aa| aa.symbol() == upper)
    }

    pub fn to_three_letter(&self) -> &'static str {
        match self {
            AminoAcid::Alanine => "ALA",
            AminoAcid::Glycine => "GLY",
            AminoAcid::Isoleucine => "ILE",
            AminoAcid::Leucine => "LEU",
            AminoAcid::Proline => "PRO",
            AminoAcid::Valine => "VAL",
            AminoAcid::Phenylalanine => "PHE",
            AminoAcid::Tryptophan => "TRP",
            AminoAcid::Tyrosine => "TYR",
            AminoAcid::Asparagine => "ASN",
            AminoAcid::Cysteine => "CYS",
            AminoAcid::Glutamine => "GLN",
            AminoAcid::Serine => "SER",
            AminoAcid::Threonine => "THR",
            AminoAcid::Methionine => "MET",
            AminoAcid::Arginine => "ARG",
            AminoAcid::Lysine => "LYS",
            AminoAcid::AsparticAcid => "ASP",
            AminoAcid::GlutamicAcid => "GLU",
            AminoAcid::Histidine => "HIS",
            AminoAcid::Stop => "TER",
        }
    }

    /// Every codon encoding this amino acid, in catalog order.
    pub fn synonyms(&self) -> &'static [Codon] {
        match self {
            AminoAcid::Alanine => ALANINE,
            AminoAcid::Glycine => GLYCINE,
            AminoAcid::Isoleucine => ISOLEUCINE,
            AminoAcid::Leucine => LEUCINE,
            AminoAcid::Proline => PROLINE,
            AminoAcid::Valine => VALINE,
            AminoAcid::Phenylalanine => PHENYLALANINE,
            AminoAcid::Tryptophan => TRYPTOPHAN,
            AminoAcid::Tyrosine => TYROSINE,
            AminoAcid::Asparagine => ASPARAGINE,
            AminoAcid::Cysteine => CYSTEINE,
            AminoAcid::Glutamine => GLUTAMINE,
            AminoAcid::Serine => SERINE,
            AminoAcid::Threonine => THREONINE,
            AminoAcid::Methionine => METHIONINE,
            AminoAcid::Arginine => ARGININE,
            AminoAcid::Lysine => LYSINE,
            AminoAcid::AsparticAcid => ASPARTIC_ACID,
            AminoAcid::GlutamicAcid => GLUTAMIC_ACID,
            AminoAcid::Histidine => HISTIDINE,
            AminoAcid::Stop => STOP,
        }
    }

    /// The sentinel codon marking a position of this amino acid as unconstrained.
    ///
    /// Its bases use IUPAC ambiguity codes covering every synonym (for six-fold
    /// degenerate residues the code is a superset), so a wildcard can still be
    /// matched against forbidden-site patterns.
    pub fn wildcard(&self) -> Codon {
        let bases = match self {
            AminoAcid::Alanine => "GCN",
            AminoAcid::Glycine => "GGN",
            AminoAcid::Isoleucine => "ATH",
            AminoAcid::Leucine => "YTN",
            AminoAcid::Proline => "CCN",
            AminoAcid::Valine => "GTN",
            AminoAcid::Phenylalanine => "TTY",
            AminoAcid::Tryptophan => "TGG",
            AminoAcid::Tyrosine => "TAY",
            AminoAcid::Asparagine => "AAY",
            AminoAcid::Cysteine => "TGY",
            AminoAcid::Glutamine => "CAR",
            AminoAcid::Serine => "WSN",
            AminoAcid::Threonine => "ACN",
            AminoAcid::Methionine => "ATG",
            AminoAcid::Arginine => "MGN",
            AminoAcid::Lysine => "AAR",
            AminoAcid::AsparticAcid => "GAY",
            AminoAcid::GlutamicAcid => "GAR",
            AminoAcid::Histidine => "CAY",
            AminoAcid::Stop => "TRR",
        };
        Codon::wildcard(bases, *self)
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_three_letter())
    }
}

impl FromStr for AminoAcid {
    type Err = ParseAminoAcidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Self::from_symbol(c).ok_or_else(|| ParseAminoAcidError(s.to_string()));
        }
        let upper = trimmed.to_ascii_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|aa| aa.to_three_letter() == upper)
            .ok_or_else(|| ParseAminoAcidError(s.to_string()))
    }
}

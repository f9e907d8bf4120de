//! # Catalog Module
//!
//! Immutable lookup tables for the standard genetic code.
//!
//! - [`codon`] - The [`Codon`](codon::Codon) value type and the codon → amino acid table
//! - [`amino_acid`] - The [`AminoAcid`](amino_acid::AminoAcid) enum with synonym sets and
//!   wildcard (unconstrained) codons
//!
//! Tables are built at compile time with `phf`, so every lookup is allocation-free.
//!
//! ```ignore
//! use oligoforge::core::catalog::{amino_acid::AminoAcid, codon::Codon};
//!
//! let codon = Codon::parse("CTA")?;
//! assert_eq!(codon.amino_acid(), AminoAcid::Leucine);
//! assert_eq!(AminoAcid::Leucine.synonyms().len(), 6);
//! ```

pub mod amino_acid;
pub mod codon;

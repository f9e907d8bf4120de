//! # Sequence Module
//!
//! Codon- and nucleotide-level sequence containers.
//!
//! - [`codons`] - [`Sequence`](codons::Sequence), an ordered codon list whose only
//!   mutation path preserves the encoded amino acid
//! - [`bases`] - [`BaseSequence`](bases::BaseSequence) and IUPAC
//!   [`BasePattern`](bases::BasePattern) matching
//! - [`sites`] - [`ForbiddenSites`](sites::ForbiddenSites), the restriction-site screen
//!   applied to overlaps and assembled genes

pub mod bases;
pub mod codons;
pub mod sites;

//! # Core Module
//!
//! The stateless foundation of OligoForge: the genetic-code catalog, codon and
//! nucleotide sequences, translated proteins, codon-frequency designs and
//! synthesis-order output.
//!
//! ## Architecture
//!
//! - **Genetic Code** ([`catalog`]) - Codon ↔ amino acid tables, synonym sets, wildcard codons
//! - **Sequences** ([`sequence`]) - Codon sequences with amino-acid-preserving mutation,
//!   nucleotide views, IUPAC pattern matching and forbidden-site screening
//! - **Proteins** ([`protein`]) - Translated genes with an unconstrained padding region
//! - **Designs** ([`design`]) - Per-region, per-level target counts of controlled codons
//! - **File I/O** ([`io`]) - Synthesis-order output
//!
//! Nothing in this module holds build state; the stateful library construction
//! lives in [`crate::engine`].

pub mod catalog;
pub mod design;
pub mod io;
pub mod protein;
pub mod sequence;

//! # OligoForge Core Library
//!
//! Designs libraries of short, synthesizable oligonucleotides that assemble
//! into full-length variants of a gene, each variant carrying a controlled
//! number of chosen codons while every assembly overlap stays unique.
//!
//! ## Architectural Philosophy
//!
//! - **[`core`]: The Foundation.** Stateless models: the codon catalog, codon and
//!   nucleotide sequences, the translated protein, codon designs and order I/O.
//!
//! - **[`engine`]: The Logic Core.** The oligo/overlap graph, codon assignment,
//!   the overlap uniqueness search and whole-gene verification.
//!
//! - **[`workflows`]: The Public API.** [`workflows::design::run`] ties the layers
//!   together into one call with progress reporting.

pub mod core;
pub mod engine;
pub mod workflows;

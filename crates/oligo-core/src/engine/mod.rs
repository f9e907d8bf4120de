//! # Engine Module
//!
//! The stateful layer that turns a protein and its codon designs into a
//! library of assemblable oligos.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Tiling geometry, designs, forbidden sites and validation
//! - **Graph** ([`graph`], [`ids`]) - Arena of oligo variants and the overlaps linking them
//! - **Fragments** ([`fragment`]) - Controlled-codon assignment over a region of tiling positions
//! - **Search** ([`swap`]) - The combination counter driving the overlap uniqueness search
//! - **Build phases** ([`tasks`]) - Replication, assignment, linking, uniqueness and verification
//! - **Library** ([`library`]) - Phase sequencing and the public view of the result
//! - **Progress Monitoring** ([`progress`]) and **Error Handling** ([`error`])
//!
//! All mutation of a shared window goes through the overlap write path of
//! [`graph::OligoGraph`], which keeps every linked oligo consistent.

pub mod config;
pub mod error;
pub mod fragment;
pub mod graph;
pub mod ids;
pub mod library;
pub mod progress;
pub mod swap;
pub mod tasks;

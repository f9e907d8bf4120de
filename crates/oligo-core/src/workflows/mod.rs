//! # Workflows Module
//!
//! High-level entry points that run a complete library design.
//!
//! - **Design Workflow** ([`design`]) - Tiling, codon assignment, overlap linking, the
//!   uniqueness search and whole-gene verification, with progress reporting.

pub mod design;

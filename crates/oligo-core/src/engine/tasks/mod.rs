//! Build phases of a [`Library`](crate::engine::library::Library).
//!
//! Each submodule implements one phase as a free `run` function over the
//! oligo graph; the library sequences them and enforces their order.

pub mod assignment;
pub mod linking;
pub mod replicate;
pub mod uniqueness;
pub mod verification;

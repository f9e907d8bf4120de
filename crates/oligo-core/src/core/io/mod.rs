//! Provides output for synthesis orders.
//!
//! The order is a CSV file with one record per realized oligo, ready to be
//! submitted to an oligo synthesis provider.

pub mod order;

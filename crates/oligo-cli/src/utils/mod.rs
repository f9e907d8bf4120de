pub mod fasta;
pub mod progress;

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// One synthesizable oligo as it appears in a synthesis order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRecord {
    /// Tiling position of the oligo.
    pub position: usize,
    /// Index of the variant within its tiling position.
    pub variant: usize,
    /// Literal nucleotide sequence.
    pub bases: String,
    /// Realized controlled-codon counts, rendered as `CODON:count` pairs separated by `;`.
    pub counts: String,
}

#[derive(Debug, Error)]
pub enum OrderWriteError {
    #[error("I/O error while writing synthesis order: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error while writing synthesis order: {0}")]
    Csv(#[from] csv::Error),
}

pub fn write_order<W: Write>(records: &[OrderRecord], writer: W) -> Result<(), OrderWriteError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_order_to_path<P: AsRef<Path>>(
    records: &[OrderRecord],
    path: P,
) -> Result<(), OrderWriteError> {
    let file = File::create(path)?;
    write_order(records, BufWriter::new(file))
}

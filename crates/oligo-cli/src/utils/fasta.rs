use crate::error::{CliError, Result};
use std::path::Path;

/// Reads a gene from a FASTA file or a plain base listing.
///
/// Only the first record of a multi-record FASTA file is used. Header (`>`)
/// and comment (`;`) lines are skipped and all whitespace is dropped.
pub fn read_sequence(path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(path)?;
    let bases = parse_sequence(&content);
    if bases.is_empty() {
        return Err(CliError::FileParsing {
            path: path.to_path_buf(),
            source: anyhow::anyhow!("no sequence data found"),
        });
    }
    Ok(bases)
}

fn parse_sequence(content: &str) -> String {
    let mut bases = String::new();
    let mut headers = 0;
    for line in content.lines().map(str::trim) {
        if line.starts_with('>') {
            headers += 1;
            if headers > 1 {
                break;
            }
            continue;
        }
        if line.starts_with(';') {
            continue;
        }
        bases.extend(line.chars().filter(|c| !c.is_whitespace()));
    }
    bases
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fasta_headers_and_line_breaks_are_dropped() {
        let content = ">gene one\nATGGCT\nGGT TAA\n>gene two\nCCC\n";
        assert_eq!(parse_sequence(content), "ATGGCTGGTTAA");
    }

    #[test]
    fn plain_sequences_are_read_verbatim() {
        assert_eq!(parse_sequence("atg gct\n; note\ntaa\n"), "atggcttaa");
    }

    #[test]
    fn empty_files_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.fasta");
        std::fs::write(&path, ">header only\n").unwrap();
        assert!(matches!(
            read_sequence(&path),
            Err(CliError::FileParsing { .. })
        ));
    }
}

use crate::cli::DesignArgs;
use crate::config::PartialRunConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use oligoforge::core::io::order::write_order_to_path;
use oligoforge::engine::progress::ProgressReporter;
use oligoforge::workflows;
use tracing::info;

pub fn run(args: DesignArgs) -> Result<()> {
    let partial_config = PartialRunConfig::from_file(&args.config)?;
    info!("Merging configuration from run file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args.overrides)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Designing library for a {}-codon gene...",
        config.protein.len()
    );
    info!("Invoking the core design workflow...");
    let result = workflows::design::run(config.protein, config.library, &reporter)?;

    let records = result.library.order_records();
    info!(
        "Writing {} oligo(s) to {:?}",
        records.len(),
        &args.output
    );
    write_order_to_path(&records, &args.output).map_err(|e| CliError::OrderWrite {
        path: args.output.clone(),
        source: e,
    })?;

    println!(
        "✓ {} oligos across {} positions written to: {}",
        records.len(),
        result.library.positions(),
        args.output.display()
    );
    println!(
        "  {} unique overlaps ({} swap combinations tried)",
        result.uniqueness.overlaps, result.uniqueness.combinations_tried
    );
    match result.realizations {
        Some(count) => println!("  {count} gene realizations verified free of forbidden sites"),
        None => println!("  Whole-gene verification skipped"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;

    #[test]
    fn design_writes_an_order_for_every_oligo() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("designs.toml"),
            "CTA = [{ first = 0, last = 3, counts = [2, 5] }]\n",
        )
        .unwrap();
        let config_path = dir.path().join("run.toml");
        fs::write(
            &config_path,
            r#"
            [sequence]
            bases = "ATGGCCCTGGGACTTGCAAAAGCTGGTCTCACCCCATTAACGACTCCTCTGGTCTCACTTGTGGTTTCTCTCGCCGGATTGGATCTATAA"

            [tiling]
            oligo-length = 9
            overlap-length = 2

            [design]
            path = "designs.toml"

            [search]
            forbidden-sites = ["GAAGAC"]
            selection-seed = 4
            "#,
        )
        .unwrap();
        let output = dir.path().join("order.csv");

        let cli = Cli::parse_from([
            "oligoforge",
            "design",
            "-c",
            config_path.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ]);
        let Commands::Design(args) = cli.command else {
            panic!("Expected 'design' subcommand");
        };
        run(args).unwrap();

        let csv = fs::read_to_string(&output).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("position,variant,bases,counts"));
        assert_eq!(lines.count(), 8);
    }
}

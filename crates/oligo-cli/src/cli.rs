use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "OligoForge CLI - design assemblable oligo libraries with controlled codon frequencies and unique overlaps.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the oligo library described by a run file and write its synthesis order.
    Design(DesignArgs),
    /// Print the tiling plan of a run file without building any variant.
    Tile(TileArgs),
}

/// Arguments for the `design` subcommand.
#[derive(Args, Debug)]
pub struct DesignArgs {
    /// Path to the run file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Path for the synthesis order (CSV).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    #[command(flatten)]
    pub overrides: RunOverrides,
}

/// Arguments for the `tile` subcommand.
#[derive(Args, Debug)]
pub struct TileArgs {
    /// Path to the run file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    #[command(flatten)]
    pub overrides: RunOverrides,
}

/// Overrides applied on top of the run file.
#[derive(Args, Debug, Default, Clone)]
pub struct RunOverrides {
    /// Seed the codon selection RNG for a reproducible library.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Skip whole-gene verification, overriding the run file.
    #[arg(long)]
    pub no_verify: bool,

    /// Forbid an additional nucleotide site (IUPAC codes allowed). Can be used multiple times.
    #[arg(long = "forbid", value_name = "SITE")]
    pub forbidden_sites: Vec<String>,

    /// Set a specific configuration value, overriding the run file.
    /// Can be used multiple times. Example: -S tiling.oligo-length=30
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

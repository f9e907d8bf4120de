mod defaults;

use crate::cli::RunOverrides;
use crate::error::{CliError, Result};
use crate::utils::fasta;
use defaults::DefaultsConfig;
use oligoforge::core::design::DesignSet;
use oligoforge::core::protein::Protein;
use oligoforge::core::sequence::sites::ForbiddenSites;
use oligoforge::engine::config::{LibraryConfig, LibraryConfigBuilder};
use oligoforge::engine::error::EngineError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, Copy)]
#[serde(deny_unknown_fields)]
struct PartialWindow {
    start: usize,
    end: usize,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialSequenceConfig {
    path: Option<PathBuf>,
    bases: Option<String>,
    window: Option<PartialWindow>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialTilingConfig {
    oligo_length: Option<usize>,
    overlap_length: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialDesignConfig {
    path: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialSearchConfig {
    forbidden_sites: Option<Vec<String>>,
    check_reverse_complement: Option<bool>,
    selection_seed: Option<u64>,
    verify: Option<bool>,
}

/// A run file as written by the user; every field may be missing until the
/// command-line overrides are merged in.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialRunConfig {
    sequence: Option<PartialSequenceConfig>,
    tiling: Option<PartialTilingConfig>,
    design: Option<PartialDesignConfig>,
    search: Option<PartialSearchConfig>,
    #[serde(skip)]
    base_dir: PathBuf,
}

/// Everything a command needs: the translated gene and a validated library configuration.
#[derive(Debug)]
pub struct RunConfig {
    pub protein: Protein,
    pub library: LibraryConfig,
}

impl PartialRunConfig {
    /// Reads a run file. Relative paths inside it resolve against its directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading run configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(config)
    }

    pub fn merge_with_cli(mut self, overrides: &RunOverrides) -> Result<RunConfig> {
        self.apply_set_values(&overrides.set_values)?;
        let defaults = DefaultsConfig::default();

        let sequence = self.sequence.take().unwrap_or_default();
        let tiling = self.tiling.take().unwrap_or_default();
        let design = self.design.take().unwrap_or_default();
        let search = self.search.take().unwrap_or_default();

        let protein = self.load_protein(sequence)?;

        let designs = match design.path {
            Some(path) => {
                let path = self.resolve(&path);
                DesignSet::load(&path).map_err(|e| CliError::FileParsing {
                    path,
                    source: e.into(),
                })?
            }
            None => DesignSet::new(),
        };

        let mut sites = search.forbidden_sites.unwrap_or_default();
        sites.extend(overrides.forbidden_sites.iter().cloned());
        let check_reverse_complement = search
            .check_reverse_complement
            .unwrap_or(defaults.check_reverse_complement);
        let forbidden_sites = ForbiddenSites::parse(&sites, check_reverse_complement)
            .map_err(|e| CliError::Config(e.to_string()))?;

        let verify = !overrides.no_verify && search.verify.unwrap_or(defaults.verify);
        let seed = overrides.seed.or(search.selection_seed);

        let mut builder = LibraryConfigBuilder::new()
            .designs(designs)
            .forbidden_sites(forbidden_sites)
            .verify_realizations(verify)
            .selection_seed(seed);
        builder = builder.oligo_length(tiling.oligo_length.ok_or_else(|| {
            CliError::Config("A value for 'tiling.oligo-length' is required.".to_string())
        })?);
        builder = builder.overlap_length(tiling.overlap_length.ok_or_else(|| {
            CliError::Config("A value for 'tiling.overlap-length' is required.".to_string())
        })?);
        let library = builder.build().map_err(EngineError::from)?;

        Ok(RunConfig { protein, library })
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    fn load_protein(&self, sequence: PartialSequenceConfig) -> Result<Protein> {
        let (bases, origin) = match (sequence.bases, sequence.path) {
            (Some(_), Some(_)) => {
                return Err(CliError::Config(
                    "Specify either 'sequence.bases' or 'sequence.path', not both.".to_string(),
                ));
            }
            (Some(bases), None) => (bases, PathBuf::from("<sequence.bases>")),
            (None, Some(path)) => {
                let path = self.resolve(&path);
                (fasta::read_sequence(&path)?, path)
            }
            (None, None) => {
                return Err(CliError::Config(
                    "A gene is required: set 'sequence.path' or 'sequence.bases'.".to_string(),
                ));
            }
        };
        let window = sequence.window.map(|w| w.start..w.end);
        Protein::from_bases(&bases, window).map_err(|e| CliError::FileParsing {
            path: origin,
            source: e.into(),
        })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key {
                "sequence.path" => {
                    self.sequence.get_or_insert_with(Default::default).path =
                        Some(PathBuf::from(value));
                }
                "sequence.bases" => {
                    self.sequence.get_or_insert_with(Default::default).bases =
                        Some(value.to_string());
                }
                "tiling.oligo-length" => {
                    self.tiling.get_or_insert_with(Default::default).oligo_length =
                        Some(parse_value(key, value)?);
                }
                "tiling.overlap-length" => {
                    self.tiling.get_or_insert_with(Default::default).overlap_length =
                        Some(parse_value(key, value)?);
                }
                "design.path" => {
                    self.design.get_or_insert_with(Default::default).path =
                        Some(PathBuf::from(value));
                }
                "search.check-reverse-complement" => {
                    self.search
                        .get_or_insert_with(Default::default)
                        .check_reverse_complement = Some(parse_value(key, value)?);
                }
                "search.selection-seed" => {
                    self.search.get_or_insert_with(Default::default).selection_seed =
                        Some(parse_value(key, value)?);
                }
                "search.verify" => {
                    self.search.get_or_insert_with(Default::default).verify =
                        Some(parse_value(key, value)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!(
            "Invalid value for {}: '{}' ({} expected)",
            key,
            value,
            std::any::type_name::<T>()
        ))
    })
}

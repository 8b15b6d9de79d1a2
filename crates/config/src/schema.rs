//! Configuration schema definitions

use crate::variant::{self, DatasetConfig};
use crate::validation::ValidationReport;
use figment::{Figment, Provider};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use types::{Dataset, Result};

/// Configuration in effect for an analysis run
///
/// A closed set of shapes: the generic configuration carries only the
/// options every analysis shares, the dataset variants add their own.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "dataset", rename_all = "lowercase")]
pub enum Config {
    Generic(CommonConfig),
    Baseline(ConfigBaseline),
    Chlamydia(ConfigChlamydia),
}

/// Options shared by every configuration variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonConfig {
    /// Location of the input data
    pub dataset_root: PathBuf,
    /// Where analysis artifacts are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Maximum E-value for a profile hit to be kept
    #[serde(default = "default_evalue_threshold")]
    pub evalue_threshold: f64,
    /// Worker threads handed to the analysis
    #[serde(default = "default_threads")]
    pub threads: usize,
    /// Require `dataset_root` to exist when the configuration is built
    #[serde(default)]
    pub require_existing_paths: bool,
}

/// Baseline (reference/control) dataset configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigBaseline {
    #[serde(flatten)]
    pub common: CommonConfig,
    /// Profile HMM database, relative to `dataset_root` unless absolute
    #[serde(default = "default_hmm_db")]
    pub hmm_db: PathBuf,
    /// Optional Pfam clan membership table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clans_file: Option<PathBuf>,
    /// Minimum fraction of the profile a hit must cover
    #[serde(default = "default_min_coverage")]
    pub min_coverage: f64,
    /// Allow several hits of one profile per target
    #[serde(default = "default_true")]
    pub multihit: bool,
}

/// Chlamydia dataset configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigChlamydia {
    #[serde(flatten)]
    pub common: CommonConfig,
    /// Assembly accession of the reference genome
    #[serde(default = "default_reference_genome")]
    pub reference_genome: String,
    /// Profile HMM database, relative to `dataset_root` unless absolute
    #[serde(default = "default_hmm_db")]
    pub hmm_db: PathBuf,
    /// Minimum identity fraction against the reference
    #[serde(default = "default_min_identity")]
    pub min_identity: f64,
    /// Sample accessions restricting the analysis; empty means all
    #[serde(default)]
    pub accessions: Vec<String>,
}

// Default value functions
fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_evalue_threshold() -> f64 {
    1e-10
}

fn default_threads() -> usize {
    1
}

fn default_true() -> bool {
    true
}

fn default_hmm_db() -> PathBuf {
    PathBuf::from("Pfam-A.hmm")
}

fn default_min_coverage() -> f64 {
    0.5
}

fn default_reference_genome() -> String {
    "GCF_000008725.1".to_string() // C. trachomatis D/UW-3/CX
}

fn default_min_identity() -> f64 {
    0.8
}

impl CommonConfig {
    /// Option names understood by every variant
    pub const FIELDS: &'static [&'static str] = &[
        "dataset_root",
        "output_dir",
        "evalue_threshold",
        "threads",
        "require_existing_paths",
    ];

    /// Common options with defaults for everything but the dataset root
    pub fn new<P: Into<PathBuf>>(dataset_root: P) -> Self {
        Self {
            dataset_root: dataset_root.into(),
            output_dir: default_output_dir(),
            evalue_threshold: default_evalue_threshold(),
            threads: default_threads(),
            require_existing_paths: false,
        }
    }

    /// Resolve a dataset-relative path against `dataset_root`
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.dataset_root.join(path)
        }
    }
}

impl ConfigBaseline {
    /// Option names specific to the baseline dataset
    pub const FIELDS: &'static [&'static str] =
        &["hmm_db", "clans_file", "min_coverage", "multihit"];

    /// Baseline configuration with dataset defaults
    pub fn new(common: CommonConfig) -> Self {
        Self {
            common,
            hmm_db: default_hmm_db(),
            clans_file: None,
            min_coverage: default_min_coverage(),
            multihit: default_true(),
        }
    }
}

impl ConfigChlamydia {
    /// Option names specific to the chlamydia dataset
    pub const FIELDS: &'static [&'static str] =
        &["reference_genome", "hmm_db", "min_identity", "accessions"];

    /// Chlamydia configuration with dataset defaults
    pub fn new(common: CommonConfig) -> Self {
        Self {
            common,
            reference_genome: default_reference_genome(),
            hmm_db: default_hmm_db(),
            min_identity: default_min_identity(),
            accessions: Vec::new(),
        }
    }
}

impl Config {
    /// Build and validate the configuration selected by `dataset`
    ///
    /// With no explicit selector the `dataset` option, if present, picks
    /// the variant; otherwise the generic configuration is built.
    pub fn from_provider<P: Provider>(dataset: Option<Dataset>, options: P) -> Result<Self> {
        Self::from_figment(dataset, &Figment::from(options))
    }

    pub(crate) fn from_figment(dataset: Option<Dataset>, figment: &Figment) -> Result<Self> {
        let dataset = match dataset {
            Some(dataset) => Some(dataset),
            None => variant::dataset_tag(figment)?,
        };

        let config = match dataset {
            None => CommonConfig::from_figment(figment)?.into_config(),
            Some(Dataset::Baseline) => ConfigBaseline::from_figment(figment)?.into_config(),
            Some(Dataset::Chlamydia) => ConfigChlamydia::from_figment(figment)?.into_config(),
        };
        Ok(config)
    }

    /// Default configuration for a variant, rooted at `data/`
    pub fn example(dataset: Option<Dataset>) -> Self {
        match dataset {
            None => Config::Generic(CommonConfig::new("data")),
            Some(Dataset::Baseline) => {
                Config::Baseline(ConfigBaseline::new(CommonConfig::new("data/baseline")))
            }
            Some(Dataset::Chlamydia) => {
                Config::Chlamydia(ConfigChlamydia::new(CommonConfig::new("data/chlamydia")))
            }
        }
    }

    /// Dataset this configuration targets, `None` for the generic one
    pub fn dataset(&self) -> Option<Dataset> {
        match self {
            Config::Generic(_) => None,
            Config::Baseline(_) => Some(Dataset::Baseline),
            Config::Chlamydia(_) => Some(Dataset::Chlamydia),
        }
    }

    /// Human-readable variant name
    pub fn name(&self) -> &'static str {
        self.dataset().map(|d| d.as_str()).unwrap_or(variant::GENERIC_TAG)
    }

    /// Options shared by every variant
    pub fn common(&self) -> &CommonConfig {
        match self {
            Config::Generic(common) => common,
            Config::Baseline(baseline) => baseline.common(),
            Config::Chlamydia(chlamydia) => chlamydia.common(),
        }
    }

    pub fn dataset_root(&self) -> &Path {
        &self.common().dataset_root
    }

    pub fn output_dir(&self) -> &Path {
        &self.common().output_dir
    }

    pub fn as_baseline(&self) -> Option<&ConfigBaseline> {
        match self {
            Config::Baseline(baseline) => Some(baseline),
            _ => None,
        }
    }

    pub fn as_chlamydia(&self) -> Option<&ConfigChlamydia> {
        match self {
            Config::Chlamydia(chlamydia) => Some(chlamydia),
            _ => None,
        }
    }

    /// Re-run validation and return the full report
    pub fn report(&self) -> ValidationReport {
        match self {
            Config::Generic(common) => common.report(),
            Config::Baseline(baseline) => baseline.report(),
            Config::Chlamydia(chlamydia) => chlamydia.report(),
        }
    }
}

impl From<ConfigBaseline> for Config {
    fn from(config: ConfigBaseline) -> Self {
        Config::Baseline(config)
    }
}

impl From<ConfigChlamydia> for Config {
    fn from(config: ConfigChlamydia) -> Self {
        Config::Chlamydia(config)
    }
}

impl From<CommonConfig> for Config {
    fn from(config: CommonConfig) -> Self {
        Config::Generic(config)
    }
}

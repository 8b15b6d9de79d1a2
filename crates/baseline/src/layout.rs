//! Input and output artifact locations for a baseline run

use config::{Config, ConfigBaseline};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use types::{ConfigError, ProfAnalysisError, Result};

/// Directory under `output_dir` holding baseline artifacts
pub const BASELINE_DIR: &str = "baseline";

/// Where a baseline run reads its inputs and writes its artifacts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaselineLayout {
    /// Root of the input data
    pub dataset_root: PathBuf,
    /// Profile HMM database, resolved against the dataset root
    pub hmm_db: PathBuf,
    /// Clan membership table, resolved against the dataset root
    pub clans_file: Option<PathBuf>,
    /// Directory receiving every baseline artifact
    pub output_dir: PathBuf,
}

impl BaselineLayout {
    /// Layout described by a baseline configuration
    pub fn new(config: &ConfigBaseline) -> Self {
        let common = &config.common;
        Self {
            dataset_root: common.dataset_root.clone(),
            hmm_db: common.resolve(&config.hmm_db),
            clans_file: config.clans_file.as_deref().map(|p| common.resolve(p)),
            output_dir: common.output_dir.join(BASELINE_DIR),
        }
    }

    /// Layout for `config`, which must be a baseline configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        config.as_baseline().map(Self::new).ok_or_else(|| {
            ConfigError::InvalidValue {
                field: "dataset".to_string(),
                value: format!(
                    "{} (baseline layout needs a baseline configuration)",
                    config.name()
                ),
            }
            .into()
        })
    }

    /// Layout for the process-wide configuration
    pub fn from_shared() -> Result<Self> {
        let config: Arc<Config> = config::config().ok_or(ProfAnalysisError::NotLoaded)?;
        Self::from_config(&config)
    }

    /// Per-organism directory
    pub fn organism_dir(&self, organism: &str) -> PathBuf {
        self.output_dir.join(organism)
    }

    /// Domain hit table produced for an organism
    pub fn domtbl_file(&self, organism: &str) -> PathBuf {
        self.organism_dir(organism).join("domtblout.txt")
    }

    /// Filtered hits kept for an organism
    pub fn hits_file(&self, organism: &str) -> PathBuf {
        self.organism_dir(organism).join("hits.tsv")
    }

    /// Run-wide summary
    pub fn summary_file(&self) -> PathBuf {
        self.output_dir.join("summary.tsv")
    }

    /// Create the output directory tree
    pub fn prepare(&self) -> Result<()> {
        create_dir(&self.output_dir)?;
        debug!(output_dir = %self.output_dir.display(), "Baseline output directory ready");
        Ok(())
    }

    /// Create the directory of one organism
    pub fn prepare_organism(&self, organism: &str) -> Result<PathBuf> {
        let dir = self.organism_dir(organism);
        create_dir(&dir)?;
        Ok(dir)
    }
}

fn create_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|source| ProfAnalysisError::Io {
        context: format!("Failed to create {}", path.display()),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::CommonConfig;
    use tempfile::TempDir;

    fn baseline(root: &str) -> ConfigBaseline {
        let mut common = CommonConfig::new(root);
        common.output_dir = PathBuf::from("/results");
        ConfigBaseline::new(common)
    }

    #[test]
    fn test_layout_resolves_relative_inputs() {
        let mut config = baseline("/data/baseline");
        config.clans_file = Some(PathBuf::from("Pfam-A.clans.tsv"));

        let layout = BaselineLayout::new(&config);
        assert_eq!(layout.hmm_db, PathBuf::from("/data/baseline/Pfam-A.hmm"));
        assert_eq!(layout.clans_file, Some(PathBuf::from("/data/baseline/Pfam-A.clans.tsv")));
        assert_eq!(layout.output_dir, PathBuf::from("/results/baseline"));
        assert_eq!(layout.hits_file("GCF_1"), PathBuf::from("/results/baseline/GCF_1/hits.tsv"));
        assert_eq!(
            layout.domtbl_file("GCF_1"),
            PathBuf::from("/results/baseline/GCF_1/domtblout.txt")
        );
        assert_eq!(layout.summary_file(), PathBuf::from("/results/baseline/summary.tsv"));
    }

    #[test]
    fn test_absolute_hmm_db_kept() {
        let mut config = baseline("/data/baseline");
        config.hmm_db = PathBuf::from("/db/Pfam-A.hmm");
        assert_eq!(BaselineLayout::new(&config).hmm_db, PathBuf::from("/db/Pfam-A.hmm"));
    }

    #[test]
    fn test_from_config_rejects_other_variants() {
        let err = BaselineLayout::from_config(&Config::example(None)).unwrap_err();
        assert!(matches!(err, ProfAnalysisError::Config(ConfigError::InvalidValue { .. })));

        let config = Config::from(baseline("/data"));
        assert!(BaselineLayout::from_config(&config).is_ok());
    }

    #[test]
    fn test_prepare_creates_directories() {
        let dir = TempDir::new().unwrap();
        let mut config = baseline("/data");
        config.common.output_dir = dir.path().join("out");

        let layout = BaselineLayout::new(&config);
        layout.prepare().unwrap();
        assert!(layout.output_dir.is_dir());

        let organism = layout.prepare_organism("GCF_000008725.1").unwrap();
        assert!(organism.is_dir());
        assert_eq!(organism, layout.organism_dir("GCF_000008725.1"));
    }
}

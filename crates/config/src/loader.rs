//! Configuration loader implementation

use crate::schema::Config;
use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use std::path::Path;
use tracing::debug;
use types::{ConfigError, Dataset, ProfAnalysisError, Result};

/// Prefix of environment variables overriding file options
pub const ENV_PREFIX: &str = "ISEQ_CONFIG_";

/// Configuration loader that handles YAML files and environment variables
pub struct ConfigLoader;

impl ConfigLoader {
    /// Options from a YAML file overlaid with `ISEQ_CONFIG_*` variables
    ///
    /// `ISEQ_CONFIG_PATH` names the file itself and is not an option.
    pub fn figment<P: AsRef<Path>>(config_path: P) -> Result<Figment> {
        let config_path = config_path.as_ref();

        // Check if config file exists
        if !config_path.exists() {
            return Err(ConfigError::FileNotFound {
                path: config_path.display().to_string(),
            }
            .into());
        }

        Ok(Figment::new()
            .merge(Yaml::file(config_path))
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["path"])))
    }

    /// Load configuration from file and environment variables
    ///
    /// `dataset` overrides the `dataset` option of the file.
    pub fn load<P: AsRef<Path>>(config_path: P, dataset: Option<Dataset>) -> Result<Config> {
        let figment = Self::figment(&config_path)?;
        let config = Config::from_figment(dataset, &figment)?;
        debug!(
            path = %config_path.as_ref().display(),
            variant = config.name(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Load configuration from string (for testing)
    pub fn load_from_str(yaml_content: &str) -> Result<Config> {
        Config::from_figment(None, &Figment::from(Yaml::string(yaml_content)))
    }

    /// Serialize configuration to YAML, tagged with its dataset
    pub fn to_yaml(config: &Config) -> Result<String> {
        serde_yaml::to_string(config).map_err(|e| {
            ConfigError::ParseError(format!("Failed to serialize configuration: {}", e)).into()
        })
    }

    /// Create example configuration file
    pub fn create_example<P: AsRef<Path>>(dataset: Option<Dataset>, path: P) -> Result<()> {
        let yaml_content = Self::to_yaml(&Config::example(dataset))?;

        let path = path.as_ref();
        std::fs::write(path, yaml_content).map_err(|source| ProfAnalysisError::Io {
            context: format!("Failed to write example configuration file {}", path.display()),
            source,
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_from_string() {
        let yaml_content = r#"
dataset: baseline
dataset_root: /data/baseline
output_dir: /results/baseline
min_coverage: 0.6
"#;

        let config = ConfigLoader::load_from_str(yaml_content).unwrap();
        assert_eq!(config.dataset(), Some(Dataset::Baseline));
        assert_eq!(config.output_dir(), Path::new("/results/baseline"));
        assert_eq!(config.as_baseline().unwrap().min_coverage, 0.6);
    }

    #[test]
    fn test_validation_errors() {
        // Test empty dataset root
        let yaml_content = r#"
dataset_root: ""
"#;
        let result = ConfigLoader::load_from_str(yaml_content);
        assert!(result.is_err());

        // Test out-of-range identity
        let yaml_content = r#"
dataset: chlamydia
dataset_root: /data
min_identity: 80
"#;
        let result = ConfigLoader::load_from_str(yaml_content);
        assert!(matches!(
            result,
            Err(ProfAnalysisError::Config(ConfigError::ValidationError { ref field, .. }))
                if field == "min_identity"
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = ConfigLoader::load("/definitely/not/here.yaml", None);
        assert!(matches!(
            result,
            Err(ProfAnalysisError::Config(ConfigError::FileNotFound { .. }))
        ));
    }

    #[test]
    fn test_load_file_with_selector_override() {
        let temp_file = NamedTempFile::new().unwrap();
        let yaml = "dataset_root: /data/ct\naccessions: [SRR100, SRR101]\n";
        std::fs::write(temp_file.path(), yaml).unwrap();

        let config = ConfigLoader::load(temp_file.path(), Some(Dataset::Chlamydia)).unwrap();
        let chlamydia = config.as_chlamydia().unwrap();
        assert_eq!(chlamydia.common.dataset_root, PathBuf::from("/data/ct"));
        assert_eq!(chlamydia.accessions, vec!["SRR100", "SRR101"]);
    }

    #[test]
    fn test_create_example() {
        let temp_file = NamedTempFile::new().unwrap();
        let result = ConfigLoader::create_example(Some(Dataset::Chlamydia), temp_file.path());
        assert!(result.is_ok());

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("dataset: chlamydia"));
        assert!(content.contains("reference_genome:"));

        let config = ConfigLoader::load(temp_file.path(), None).unwrap();
        assert_eq!(config, Config::example(Some(Dataset::Chlamydia)));
    }

    #[test]
    fn test_generic_example_has_no_variant_fields() {
        let yaml = ConfigLoader::to_yaml(&Config::example(None)).unwrap();
        assert!(yaml.contains("dataset: generic"));
        assert!(!yaml.contains("hmm_db"));
        assert_eq!(ConfigLoader::load_from_str(&yaml).unwrap(), Config::example(None));
    }
}

//! Configuration validation utilities

use crate::schema::{CommonConfig, ConfigBaseline, ConfigChlamydia};
use std::collections::HashSet;
use std::path::Path;
use types::ConfigError;

/// Upper bound on worker threads
pub const MAX_THREADS: usize = 512;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the options every variant shares
    pub fn validate_common(config: &CommonConfig) -> ValidationReport {
        let mut report = ValidationReport::new();

        Self::validate_paths(config, &mut report);
        Self::validate_thresholds(config, &mut report);
        Self::validate_threads(config, &mut report);

        report
    }

    fn validate_paths(config: &CommonConfig, report: &mut ValidationReport) {
        if is_blank(&config.dataset_root) {
            report.add_error("dataset_root", "Dataset root cannot be empty");
        } else if config.require_existing_paths && !config.dataset_root.is_dir() {
            report.add_error(
                "dataset_root",
                &format!(
                    "Dataset root {} is not an existing directory",
                    config.dataset_root.display()
                ),
            );
        }

        if is_blank(&config.output_dir) {
            report.add_error("output_dir", "Output directory cannot be empty");
        } else if config.output_dir == config.dataset_root {
            report.add_error("output_dir", "Output directory cannot be the dataset root");
        }
    }

    fn validate_thresholds(config: &CommonConfig, report: &mut ValidationReport) {
        let evalue = config.evalue_threshold;
        if !evalue.is_finite() || evalue <= 0.0 {
            report.add_error(
                "evalue_threshold",
                &format!("E-value threshold must be a positive number, got {}", evalue),
            );
        } else if evalue > 1.0 {
            report.add_warning(
                "evalue_threshold",
                "E-value threshold above 1 keeps mostly spurious hits",
            );
        }
    }

    fn validate_threads(config: &CommonConfig, report: &mut ValidationReport) {
        if config.threads == 0 {
            report.add_error("threads", "Thread count cannot be 0");
        } else if config.threads > MAX_THREADS {
            report.add_error("threads", &format!("Thread count cannot exceed {}", MAX_THREADS));
        } else if config.threads > 64 {
            report.add_warning(
                "threads",
                &format!("Thread count is very high ({})", config.threads),
            );
        }
    }

    /// Baseline dataset constraints
    pub fn validate_baseline(config: &ConfigBaseline, report: &mut ValidationReport) {
        if is_blank(&config.hmm_db) {
            report.add_error("hmm_db", "HMM database path cannot be empty");
        }

        if let Some(ref clans_file) = config.clans_file {
            if is_blank(clans_file) {
                report.add_error("clans_file", "Clans file path cannot be empty when given");
            }
        }

        Self::validate_fraction("min_coverage", config.min_coverage, report);
        if config.min_coverage == 0.0 {
            report.add_warning("min_coverage", "Minimum coverage of 0 keeps every hit");
        }
    }

    /// Chlamydia dataset constraints
    pub fn validate_chlamydia(config: &ConfigChlamydia, report: &mut ValidationReport) {
        if config.reference_genome.is_empty() {
            report.add_error("reference_genome", "Reference genome cannot be empty");
        } else if !is_valid_assembly_accession(&config.reference_genome) {
            report.add_error(
                "reference_genome",
                &format!("Invalid assembly accession: {}", config.reference_genome),
            );
        }

        if is_blank(&config.hmm_db) {
            report.add_error("hmm_db", "HMM database path cannot be empty");
        }

        Self::validate_fraction("min_identity", config.min_identity, report);
        if config.min_identity < 0.3 {
            report.add_warning(
                "min_identity",
                "Minimum identity below 0.3 admits distant homologs",
            );
        }

        let mut seen = HashSet::new();
        for accession in &config.accessions {
            if accession.trim().is_empty() {
                report.add_error("accessions", "Accessions cannot be empty");
            } else if !seen.insert(accession) {
                report.add_error("accessions", &format!("Duplicate accession: {}", accession));
            }
        }
    }

    fn validate_fraction(field: &str, value: f64, report: &mut ValidationReport) {
        if !(0.0..=1.0).contains(&value) {
            report.add_error(field, &format!("Must be between 0 and 1, got {}", value));
        }
    }
}

fn is_blank(path: &Path) -> bool {
    path.as_os_str().to_string_lossy().trim().is_empty()
}

/// Validate an NCBI assembly accession such as `GCF_000008725.1`
pub fn is_valid_assembly_accession(accession: &str) -> bool {
    let Some(rest) = accession
        .strip_prefix("GCF_")
        .or_else(|| accession.strip_prefix("GCA_"))
    else {
        return false;
    };

    let Some((number, version)) = rest.split_once('.') else {
        return false;
    };

    number.len() == 9
        && number.chars().all(|c| c.is_ascii_digit())
        && !version.is_empty()
        && version.chars().all(|c| c.is_ascii_digit())
}

/// Validation report containing errors and warnings
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

/// A validation issue (error or warning)
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.errors.push(ValidationIssue {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn summary(&self) -> String {
        format!("Validation: {} errors, {} warnings", self.errors.len(), self.warnings.len())
    }

    /// First error as a [`ConfigError`], if any
    pub fn into_result(self) -> Result<(), ConfigError> {
        match self.errors.into_iter().next() {
            Some(issue) => Err(ConfigError::ValidationError {
                field: issue.field,
                message: issue.message,
            }),
            None => Ok(()),
        }
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn error_fields(report: &ValidationReport) -> Vec<&str> {
        report.errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn test_valid_common() {
        let report = ConfigValidator::validate_common(&CommonConfig::new("/data"));
        assert!(report.is_valid());
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_common_out_of_domain() {
        let mut config = CommonConfig::new("/data");
        config.evalue_threshold = -1.0;
        config.threads = 0;
        config.output_dir = "/data".into();

        let report = ConfigValidator::validate_common(&config);
        assert_eq!(error_fields(&report), vec!["output_dir", "evalue_threshold", "threads"]);
    }

    #[test]
    fn test_nan_threshold_rejected() {
        let mut config = CommonConfig::new("/data");
        config.evalue_threshold = f64::NAN;
        assert!(!ConfigValidator::validate_common(&config).is_valid());
    }

    #[test]
    fn test_existing_paths_required() {
        let dir = TempDir::new().unwrap();
        let mut config = CommonConfig::new(dir.path());
        config.require_existing_paths = true;
        assert!(ConfigValidator::validate_common(&config).is_valid());

        config.dataset_root = dir.path().join("missing");
        let report = ConfigValidator::validate_common(&config);
        assert_eq!(error_fields(&report), vec!["dataset_root"]);
    }

    #[test]
    fn test_nonexistent_path_allowed_when_not_required() {
        let config = CommonConfig::new("/definitely/not/here");
        assert!(ConfigValidator::validate_common(&config).is_valid());
    }

    #[test]
    fn test_baseline_constraints() {
        let mut config = ConfigBaseline::new(CommonConfig::new("/data"));
        config.min_coverage = 1.5;
        config.clans_file = Some("".into());

        let mut report = ValidationReport::new();
        ConfigValidator::validate_baseline(&config, &mut report);
        assert_eq!(error_fields(&report), vec!["clans_file", "min_coverage"]);

        config.min_coverage = 0.0;
        config.clans_file = None;
        let mut report = ValidationReport::new();
        ConfigValidator::validate_baseline(&config, &mut report);
        assert!(report.is_valid());
        assert!(report.has_warnings());
    }

    #[test]
    fn test_chlamydia_constraints() {
        let mut config = ConfigChlamydia::new(CommonConfig::new("/data"));
        config.reference_genome = "NC_000117".to_string();
        config.accessions = vec!["SRR001".to_string(), "SRR001".to_string()];

        let mut report = ValidationReport::new();
        ConfigValidator::validate_chlamydia(&config, &mut report);
        assert_eq!(error_fields(&report), vec!["reference_genome", "accessions"]);
    }

    #[test]
    fn test_assembly_accession() {
        assert!(is_valid_assembly_accession("GCF_000008725.1"));
        assert!(is_valid_assembly_accession("GCA_000008725.12"));
        assert!(!is_valid_assembly_accession("GCF_000008725"));
        assert!(!is_valid_assembly_accession("GCF_8725.1"));
        assert!(!is_valid_assembly_accession("NC_000117.1"));
        assert!(!is_valid_assembly_accession("GCF_00000872X.1"));
    }

    #[test]
    fn test_into_result_reports_first_error() {
        let mut report = ValidationReport::new();
        assert!(report.clone().into_result().is_ok());

        report.add_warning("threads", "high");
        report.add_error("threads", "zero");
        report.add_error("hmm_db", "empty");
        assert_eq!(
            report.into_result(),
            Err(ConfigError::ValidationError {
                field: "threads".to_string(),
                message: "zero".to_string(),
            })
        );
    }
}

//! Construction contract shared by the configuration variants

use crate::schema::{CommonConfig, Config, ConfigBaseline, ConfigChlamydia};
use crate::validation::{ConfigValidator, ValidationReport};
use figment::error::Kind;
use figment::value::{Dict, Value};
use figment::{Figment, Provider};
use serde::de::DeserializeOwned;
use tracing::warn;
use types::{ConfigError, Dataset, Result};

/// Option carrying the variant tag
pub const DATASET_KEY: &str = "dataset";

/// Tag of the generic configuration
pub const GENERIC_TAG: &str = "generic";

/// A configuration shape: its defaults come from serde, its
/// dataset-specific constraints from [`DatasetConfig::check`].
pub trait DatasetConfig: DeserializeOwned + Sized {
    /// Dataset this shape is built for, `None` for the generic one
    const DATASET: Option<Dataset>;

    /// Options accepted on top of [`CommonConfig::FIELDS`]
    const EXTRA_FIELDS: &'static [&'static str];

    /// Options shared with every other variant
    fn common(&self) -> &CommonConfig;

    /// Record violations of dataset-specific constraints
    fn check(&self, report: &mut ValidationReport);

    fn into_config(self) -> Config;

    /// Build from any figment provider, validating the result
    fn from_provider<P: Provider>(options: P) -> Result<Self> {
        Self::from_figment(&Figment::from(options))
    }

    /// Build from an assembled figment, validating the result
    fn from_figment(figment: &Figment) -> Result<Self> {
        let options: Dict = figment.extract().map_err(figment_error)?;
        check_keys::<Self>(&options)?;

        // Dataset variants flatten the common options, which hides the
        // option name from type errors; extract them on their own first.
        if Self::DATASET.is_some() {
            let _: CommonConfig = figment.extract().map_err(figment_error)?;
        }

        let config: Self = figment.extract().map_err(figment_error)?;
        config.validated()
    }

    /// Full validation report, common and dataset-specific
    fn report(&self) -> ValidationReport {
        let mut report = ConfigValidator::validate_common(self.common());
        self.check(&mut report);
        report
    }

    /// Consume `self` if it passes validation
    fn validated(self) -> Result<Self> {
        let report = self.report();
        let name = variant_name::<Self>();
        for warning in &report.warnings {
            warn!(variant = name, field = %warning.field, "{}", warning.message);
        }
        report.into_result()?;
        Ok(self)
    }
}

impl DatasetConfig for CommonConfig {
    const DATASET: Option<Dataset> = None;
    const EXTRA_FIELDS: &'static [&'static str] = &[];

    fn common(&self) -> &CommonConfig {
        self
    }

    fn check(&self, _report: &mut ValidationReport) {}

    fn into_config(self) -> Config {
        Config::Generic(self)
    }
}

impl DatasetConfig for ConfigBaseline {
    const DATASET: Option<Dataset> = Some(Dataset::Baseline);
    const EXTRA_FIELDS: &'static [&'static str] = ConfigBaseline::FIELDS;

    fn common(&self) -> &CommonConfig {
        &self.common
    }

    fn check(&self, report: &mut ValidationReport) {
        ConfigValidator::validate_baseline(self, report);
    }

    fn into_config(self) -> Config {
        Config::Baseline(self)
    }
}

impl DatasetConfig for ConfigChlamydia {
    const DATASET: Option<Dataset> = Some(Dataset::Chlamydia);
    const EXTRA_FIELDS: &'static [&'static str] = ConfigChlamydia::FIELDS;

    fn common(&self) -> &CommonConfig {
        &self.common
    }

    fn check(&self, report: &mut ValidationReport) {
        ConfigValidator::validate_chlamydia(self, report);
    }

    fn into_config(self) -> Config {
        Config::Chlamydia(self)
    }
}

/// Dataset named by the `dataset` option, if the option is present
pub(crate) fn dataset_tag(figment: &Figment) -> Result<Option<Dataset>> {
    match figment.find_value(DATASET_KEY) {
        Ok(value) => {
            let tag = tag_value(&value)?;
            if tag.trim().eq_ignore_ascii_case(GENERIC_TAG) {
                return Ok(None);
            }
            Ok(Some(tag.parse::<Dataset>()?))
        }
        Err(_) => Ok(None),
    }
}

fn tag_value(value: &Value) -> std::result::Result<&str, ConfigError> {
    value.as_str().ok_or_else(|| ConfigError::InvalidValue {
        field: DATASET_KEY.to_string(),
        value: format!("{:?}", value),
    })
}

fn variant_name<T: DatasetConfig>() -> &'static str {
    T::DATASET.map(|d| d.as_str()).unwrap_or(GENERIC_TAG)
}

/// Reject options the variant does not understand, and a `dataset`
/// tag that disagrees with the variant being built.
fn check_keys<T: DatasetConfig>(options: &Dict) -> Result<()> {
    let variant = variant_name::<T>();

    for (key, value) in options {
        if key == DATASET_KEY {
            let tag = tag_value(value)?;
            if !tag.trim().eq_ignore_ascii_case(variant) {
                return Err(ConfigError::InvalidValue {
                    field: DATASET_KEY.to_string(),
                    value: format!("{} (building {} configuration)", tag, variant),
                }
                .into());
            }
            continue;
        }

        let key_str = key.as_str();
        let known = CommonConfig::FIELDS.contains(&key_str) || T::EXTRA_FIELDS.contains(&key_str);
        if !known {
            return Err(ConfigError::UnknownField {
                variant: variant.to_string(),
                field: key.clone(),
            }
            .into());
        }
    }

    Ok(())
}

/// Map a figment extraction failure onto the configuration taxonomy
pub(crate) fn figment_error(err: figment::Error) -> ConfigError {
    let field = err.path.join(".");
    match &err.kind {
        Kind::MissingField(name) => ConfigError::MissingField {
            field: if field.is_empty() {
                name.to_string()
            } else {
                format!("{}.{}", field, name)
            },
        },
        Kind::InvalidType(actual, _) | Kind::InvalidValue(actual, _) if !field.is_empty() => {
            ConfigError::InvalidValue {
                field,
                value: actual.to_string(),
            }
        }
        _ => ConfigError::ParseError(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::providers::{Format, Serialized, Yaml};
    use std::collections::BTreeMap;
    use types::ProfAnalysisError;

    #[test]
    fn test_from_provider_per_variant() {
        let yaml = "dataset_root: /data\nhmm_db: custom.hmm\n";
        let baseline = ConfigBaseline::from_provider(Yaml::string(yaml)).unwrap();
        assert_eq!(baseline.hmm_db, std::path::PathBuf::from("custom.hmm"));

        let chlamydia = ConfigChlamydia::from_provider(Yaml::string(yaml)).unwrap();
        assert_eq!(chlamydia.reference_genome, "GCF_000008725.1");

        let err = CommonConfig::from_provider(Yaml::string(yaml)).unwrap_err();
        assert!(matches!(
            err,
            ProfAnalysisError::Config(ConfigError::UnknownField { ref variant, .. })
                if variant == "generic"
        ));
    }

    #[test]
    fn test_serialized_provider() {
        let mut options = BTreeMap::new();
        options.insert("dataset_root", "/data");
        options.insert("output_dir", "/out");
        let common = CommonConfig::from_provider(Serialized::defaults(options)).unwrap();
        assert_eq!(common.output_dir, std::path::PathBuf::from("/out"));
    }

    #[test]
    fn test_dataset_tag_absent() {
        let figment = Figment::from(Yaml::string("dataset_root: /data"));
        assert_eq!(dataset_tag(&figment).unwrap(), None);
    }

    #[test]
    fn test_generic_tag() {
        let figment = Figment::from(Yaml::string("dataset: generic\ndataset_root: /data"));
        assert_eq!(dataset_tag(&figment).unwrap(), None);
        assert!(CommonConfig::from_figment(&figment).is_ok());
        assert!(ConfigBaseline::from_figment(&figment).is_err());
    }

    #[test]
    fn test_dataset_tag_not_a_string() {
        let figment = Figment::from(Yaml::string("dataset: [1, 2]\ndataset_root: /data"));
        let err = dataset_tag(&figment).unwrap_err();
        assert!(matches!(
            err,
            ProfAnalysisError::Config(ConfigError::InvalidValue { ref field, .. })
                if field == "dataset"
        ));
    }

    #[test]
    fn test_matching_tag_accepted() {
        let yaml = "dataset: Baseline\ndataset_root: /data\n";
        assert!(ConfigBaseline::from_provider(Yaml::string(yaml)).is_ok());
    }

    #[test]
    fn test_fields_cover_serialized_keys() {
        let baseline = ConfigBaseline {
            clans_file: Some("clans.tsv".into()),
            ..ConfigBaseline::new(CommonConfig::new("/data"))
        };
        let chlamydia = ConfigChlamydia::new(CommonConfig::new("/data"));

        let keys = |value: serde_yaml::Value| -> Vec<String> {
            value
                .as_mapping()
                .unwrap()
                .keys()
                .map(|k| k.as_str().unwrap().to_string())
                .collect()
        };

        for key in keys(serde_yaml::to_value(&baseline).unwrap()) {
            assert!(
                CommonConfig::FIELDS.contains(&key.as_str())
                    || ConfigBaseline::FIELDS.contains(&key.as_str()),
                "baseline key {key} not declared"
            );
        }
        for key in keys(serde_yaml::to_value(&chlamydia).unwrap()) {
            assert!(
                CommonConfig::FIELDS.contains(&key.as_str())
                    || ConfigChlamydia::FIELDS.contains(&key.as_str()),
                "chlamydia key {key} not declared"
            );
        }
    }
}

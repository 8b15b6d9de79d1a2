//! Profile-analysis toolkit
//!
//! Entry point for the configuration variants, the process-wide
//! configuration, the baseline collaborator and the package version.
//!
//! ```no_run
//! use figment::providers::{Format, Yaml};
//!
//! let config = iseq_prof_analysis::load_config("baseline", Yaml::file("baseline.yaml"))?;
//! assert!(config.as_baseline().is_some());
//! println!("iseq-prof-analysis {}", iseq_prof_analysis::version());
//! # Ok::<(), iseq_prof_analysis::ProfAnalysisError>(())
//! ```

pub mod version;

pub use baseline;
pub use config::{
    config, load_config, CommonConfig, Config, ConfigBaseline, ConfigChlamydia, ConfigLoader,
    DatasetConfig, SharedConfig,
};
pub use types::{ConfigError, Dataset, ProfAnalysisError, Result, SelectorError};
pub use version::{version, SENTINEL_VERSION};

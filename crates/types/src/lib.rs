//! Shared types for the profile-analysis toolkit
//!
//! This crate contains the error taxonomy and the dataset selector used
//! across the configuration, baseline and CLI crates.

pub mod dataset;
pub mod error;

// Re-export commonly used types
pub use dataset::Dataset;
pub use error::{ConfigError, ProfAnalysisError, Result, SelectorError};

//! Configuration management for the profile-analysis toolkit
//!
//! This crate defines the configuration variants, validates them, loads
//! them from YAML files and environment variables, and holds the
//! configuration shared by the rest of the process.

pub mod loader;
pub mod schema;
pub mod shared;
pub mod validation;
pub mod variant;

pub use loader::ConfigLoader;
pub use schema::*;
pub use shared::{config, load_config, SharedConfig};
pub use validation::*;
pub use variant::DatasetConfig;

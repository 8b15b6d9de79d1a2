//! Error types for the profile-analysis toolkit

use thiserror::Error;

/// Main error type for the profile-analysis toolkit
#[derive(Error, Debug)]
pub enum ProfAnalysisError {
    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Dataset selector errors
    #[error(transparent)]
    Selector(#[from] SelectorError),

    /// A component asked for the shared configuration before one was loaded
    #[error("No configuration loaded")]
    NotLoaded,

    /// Filesystem errors outside of configuration parsing
    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for profile-analysis operations
pub type Result<T> = std::result::Result<T, ProfAnalysisError>;

/// Configuration specific errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// File not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// Parse error
    #[error("Configuration parse error: {0}")]
    ParseError(String),

    /// Validation error
    #[error("Configuration validation error: {field}: {message}")]
    ValidationError { field: String, message: String },

    /// Missing required field
    #[error("Missing required configuration field: {field}")]
    MissingField { field: String },

    /// Invalid value
    #[error("Invalid configuration value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Option not understood by the selected variant
    #[error("Unknown configuration field for {variant}: {field}")]
    UnknownField { variant: String, field: String },
}

impl ConfigError {
    /// Name of the offending option, when the error concerns a single one
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::ValidationError { field, .. }
            | ConfigError::MissingField { field }
            | ConfigError::InvalidValue { field, .. }
            | ConfigError::UnknownField { field, .. } => Some(field),
            ConfigError::FileNotFound { .. } | ConfigError::ParseError(_) => None,
        }
    }
}

/// Dataset selector errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// Selector does not name a known dataset variant
    #[error("Unknown dataset selector '{selector}' (expected one of: {expected})")]
    UnknownDataset { selector: String, expected: String },
}

impl ProfAnalysisError {
    /// Borrow the configuration error, if this is one
    pub fn as_config(&self) -> Option<&ConfigError> {
        match self {
            ProfAnalysisError::Config(err) => Some(err),
            _ => None,
        }
    }

    /// Whether this error came from an unrecognized selector
    pub fn is_selector(&self) -> bool {
        matches!(self, ProfAnalysisError::Selector(_))
    }
}

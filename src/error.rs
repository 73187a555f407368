//! Error types for the inheritance engine.
//!
//! Configuration problems are reported when an engine is built, validation
//! problems are scoped to the call that supplied bad data, and consistency
//! problems indicate an internal defect.

use thiserror::Error;

/// Main error type for engine operations
#[derive(Error, Debug)]
pub enum GeneticsError {
    /// Invalid gene / allele / rule configuration (fatal to engine creation)
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Caller-supplied data rejected (unknown ids, wrong allele counts, bad parents)
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Internal invariant broken (missing genotype or gamete entries)
    #[error("Consistency error: {message}")]
    Consistency { message: String },

    /// I/O errors while reading or writing configuration files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML (de)serialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Type alias for Results using GeneticsError
pub type Result<T> = std::result::Result<T, GeneticsError>;

impl GeneticsError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a consistency error
    pub fn consistency(message: impl Into<String>) -> Self {
        Self::Consistency {
            message: message.into(),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub fn is_consistency(&self) -> bool {
        matches!(self, Self::Consistency { .. })
    }
}

//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog could not be loaded
    #[error(transparent)]
    Store(#[from] narrative_store::StoreError),

    /// Holdings file could not be imported
    #[error(transparent)]
    Ingest(#[from] narrative_ingest::IngestError),

    /// Chat or explanation request failed
    #[error(transparent)]
    Llm(#[from] narrative_llm::LlmError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Nothing with this id in the catalog
    #[error("{kind} '{id}' not found")]
    NotFound {
        /// What was looked up
        kind: &'static str,
        /// The id asked for
        id: String,
    },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CliError {
    /// Lookup miss
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        CliError::NotFound { kind, id: id.into() }
    }
}

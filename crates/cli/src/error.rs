//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Metadata file not found
    #[error("Sensor metadata not found: {path}")]
    MetadataNotFound { path: String },

    /// A worker thread panicked
    #[error("{thread} thread panicked")]
    ThreadPanicked { thread: &'static str },

    /// Ingestion loop failure
    #[error(transparent)]
    Ingestion(#[from] ingestion::IngestionError),

    /// Render loop failure
    #[error(transparent)]
    Render(#[from] publisher::PublisherError),
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn metadata_not_found(path: impl Into<String>) -> Self {
        Self::MetadataNotFound { path: path.into() }
    }

    pub fn thread_panicked(thread: &'static str) -> Self {
        Self::ThreadPanicked { thread }
    }
}

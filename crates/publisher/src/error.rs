//! Publisher error types

use thiserror::Error;

/// Publisher-specific errors
#[derive(Debug, Error)]
pub enum PublisherError {
    /// Presenter creation error
    #[error("failed to create presenter '{name}': {message}")]
    PresenterCreation { name: String, message: String },

    /// Presenter error (from contract)
    #[error("presenter error: {0}")]
    Contract(#[from] contracts::ContractError),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PublisherError {
    /// Create a presenter creation error
    pub fn presenter_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PresenterCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}

//! Layered error definitions
//!
//! Categorized by source: config / metadata / transport / presenter

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Sensor Session Errors =====
    /// Socket or session failure reported by the sensor client
    #[error("sensor transport error: {message}")]
    Transport { message: String },

    // ===== Presenter Errors =====
    /// Presenter write error
    #[error("presenter '{presenter}' write error: {message}")]
    PresenterWrite { presenter: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create presenter write error
    pub fn presenter_write(presenter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PresenterWrite {
            presenter: presenter.into(),
            message: message.into(),
        }
    }
}

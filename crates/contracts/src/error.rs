//! Layered error definitions
//!
//! Categorized by source: config / host / observer

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

    // ===== Host Errors =====
    /// A host primitive refused a request
    #[error("host error: {0}")]
    Host(#[from] HostError),

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
}

/// Failure reported by a host scheduling primitive.
///
/// Only ever fatal to the interaction that made the request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// Frame callback could not be scheduled
    #[error("frame request rejected: {0}")]
    FrameRequest(String),

    /// Timer could not be armed
    #[error("timer request rejected: {0}")]
    TimerRequest(String),
}

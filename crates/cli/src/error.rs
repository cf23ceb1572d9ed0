//! Error types for CLI operations.

use std::path::Path;

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Input file not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// The file parsed, but as the wrong kind of document
    #[error("Expected a {expected} file, found {found}: {path}")]
    WrongDocument {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Command-line override rejected
    #[error("Invalid value for --{flag}: {message}")]
    InvalidOverride { flag: &'static str, message: String },
}

impl CliError {
    pub fn file_not_found(path: &Path) -> Self {
        Self::FileNotFound {
            path: path.display().to_string(),
        }
    }

    pub fn wrong_document(path: &Path, expected: &'static str, found: &'static str) -> Self {
        Self::WrongDocument {
            path: path.display().to_string(),
            expected,
            found,
        }
    }

    pub fn invalid_override(flag: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidOverride {
            flag,
            message: message.into(),
        }
    }
}

/// Fail early with a clear message when `path` does not exist
pub fn ensure_exists(path: &Path) -> Result<(), CliError> {
    if path.exists() {
        Ok(())
    } else {
        Err(CliError::file_not_found(path))
    }
}

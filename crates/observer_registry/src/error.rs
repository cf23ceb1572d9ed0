//! Observer registration errors

use thiserror::Error;

/// Failure raised by `observe`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObserveError {
    /// The mechanism does not know this entry type
    #[error("unsupported entry type '{0}'")]
    UnsupportedEntryType(String),

    /// The filter named no entry type at all
    #[error("observe filter names no entry types")]
    EmptyFilter,

    /// Any other failure reported by the native mechanism
    #[error("native observer error: {0}")]
    Native(String),
}

impl ObserveError {
    pub fn unsupported(entry_type: impl Into<String>) -> Self {
        Self::UnsupportedEntryType(entry_type.into())
    }

    pub fn native(message: impl Into<String>) -> Self {
        Self::Native(message.into())
    }

    /// Whether this is the native mechanism rejecting `entry_type` specifically.
    pub fn is_unsupported(&self, entry_type: &str) -> bool {
        matches!(self, Self::UnsupportedEntryType(ty) if ty == entry_type)
    }
}

//! Sim host error types

use thiserror::Error;

/// Errors raised while building a simulated session
#[derive(Debug, Error)]
pub enum SimError {
    /// Surface id used twice
    #[error("duplicate surface id '{0}'")]
    DuplicateSurface(String),

    /// Surface id that was never declared
    #[error("unknown surface '{0}'")]
    UnknownSurface(String),

    /// Parent not declared before its child
    #[error("surface '{surface}' references unknown parent '{parent}'")]
    UnknownParent { surface: String, parent: String },

    /// Contract error
    #[error("contract error: {0}")]
    Contract(#[from] contracts::ContractError),
}

pub type Result<T> = std::result::Result<T, SimError>;

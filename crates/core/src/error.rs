//! Engine error model.

use thiserror::Error;

/// Result type used across the planning engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine-level error.
///
/// Only caller-visible failures live here. Degraded outcomes (empty history,
/// zero consumption, empty supplier pools) are valid results, not errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A requested item or supplier does not exist in the external catalog.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Input failed validation (negative quantities, empty windows, malformed records).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An external collaborator failed to return data.
    #[error("data source error: {0}")]
    Source(String),
}

impl EngineError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_kind_and_id() {
        let err = EngineError::not_found("item", "SKU-1");
        assert_eq!(err.to_string(), "item not found: SKU-1");
        assert!(err.is_not_found());
    }

    #[test]
    fn invalid_input_is_not_a_not_found() {
        let err = EngineError::invalid_input("lookback_days must be > 0");
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "invalid input: lookback_days must be > 0");
    }
}

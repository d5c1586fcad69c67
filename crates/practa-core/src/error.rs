//! Error types for the unit contract

use thiserror::Error;

/// Errors reading a package descriptor document
#[derive(Debug, Error)]
pub enum ContractError {
    /// Top level is not a JSON object
    #[error("descriptor must be a JSON object")]
    NotAnObject,

    /// Both `id` and legacy `type` present with different values
    #[error("conflicting identifiers: id `{id}` vs legacy type `{legacy}`")]
    ConflictingIdentifiers {
        /// Value of `id`
        id: String,
        /// Value of `type`
        legacy: String,
    },

    /// Document does not match the descriptor shape
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflicting_identifiers_display() {
        let err = ContractError::ConflictingIdentifiers {
            id: "box-breath".into(),
            legacy: "box".into(),
        };
        assert_eq!(
            err.to_string(),
            "conflicting identifiers: id `box-breath` vs legacy type `box`"
        );
    }
}

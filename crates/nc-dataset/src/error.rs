//! Error types for dataset access.

use thiserror::Error;

/// Result type for dataset operations.
pub type NcResult<T> = Result<T, NcError>;

/// Error types for dataset access.
#[derive(Error, Debug)]
pub enum NcError {
    /// No variable with this name in the dataset
    #[error("Variable not found: {0}")]
    VariableNotFound(String),

    /// Attribute absent on its owner (a variable name, or "global")
    #[error("Attribute '{attribute}' not found on {owner}")]
    AttributeNotFound { owner: String, attribute: String },

    /// No dimension with this name in the dataset
    #[error("Dimension not found: {0}")]
    DimensionNotFound(String),

    /// Output container already holds a variable with this name
    #[error("Variable already exists: {0}")]
    VariableExists(String),

    /// Attribute present but its content has the wrong shape or type
    #[error("Attribute '{owner}:{attribute}' is malformed: expected {expected}")]
    TypeMismatch {
        owner: String,
        attribute: String,
        expected: String,
    },

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Dataset description could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NcError {
    /// Whether this error only says that something named was not there.
    ///
    /// Callers probing optional metadata treat these as absence; every other
    /// variant is a real failure.
    pub fn is_lookup_miss(&self) -> bool {
        matches!(
            self,
            NcError::VariableNotFound(_)
                | NcError::AttributeNotFound { .. }
                | NcError::DimensionNotFound(_)
        )
    }

    pub(crate) fn attribute_not_found(owner: &str, attribute: &str) -> Self {
        NcError::AttributeNotFound {
            owner: owner.to_string(),
            attribute: attribute.to_string(),
        }
    }

    pub(crate) fn type_mismatch(owner: &str, attribute: &str, expected: &str) -> Self {
        NcError::TypeMismatch {
            owner: owner.to_string(),
            attribute: attribute.to_string(),
            expected: expected.to_string(),
        }
    }
}

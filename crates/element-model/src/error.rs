//! Error types for element matching.

use nc_dataset::NcError;
use thiserror::Error;

/// Result type for element matching.
pub type ElementResult<T> = Result<T, ElementError>;

#[derive(Error, Debug)]
pub enum ElementError {
    /// Element definition cannot be matched against anything
    #[error("Invalid element definition: {0}")]
    InvalidDefinition(String),

    /// None of the aliases is present among the dataset's names
    #[error("Element model \"{element}\" found no matches for {aliases:?}")]
    NotFound {
        element: String,
        aliases: Vec<String>,
    },

    /// Dataset access failed after a name was matched
    #[error(transparent)]
    Dataset(#[from] NcError),
}

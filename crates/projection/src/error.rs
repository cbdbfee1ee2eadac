//! Error types for projection resolution.

use nc_dataset::NcError;
use thiserror::Error;

/// Result type for projection operations.
pub type ProjectionResult<T> = Result<T, ProjectionError>;

#[derive(Error, Debug)]
pub enum ProjectionError {
    /// More than one convention matched; the dataset's CRS metadata is ambiguous
    #[error("Multiple projections found: {}", .conventions.join(", "))]
    MultipleProjectionsFound { conventions: Vec<String> },

    #[error("EPSG:{0} is not in the crs-definitions database")]
    UnknownEpsg(u32),

    /// The CRS engine rejected a proj4 string
    #[error("Failed to build CRS from '{proj4}': {message}")]
    CrsBuild { proj4: String, message: String },

    #[error("Transform failed: {0}")]
    Transform(String),

    /// Descriptor writer found none of its grid-mapping variables
    #[error("No grid-mapping variable for {0} in source metadata")]
    MissingGridMapping(String),

    #[error(transparent)]
    Dataset(#[from] NcError),
}

/// A convention's required grid-mapping metadata is absent.
///
/// Only ever used to exclude a convention during resolution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{convention} does not apply: {missing}")]
pub struct NoProjectionFound {
    pub convention: String,
    pub missing: String,
}

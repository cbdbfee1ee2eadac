//! Dataset handle model for self-describing gridded datasets.
//!
//! A [`Dataset`] exposes variables (type, dimensions, attributes, payload),
//! dimensions and global attributes. [`MemoryDataset`] is the owned
//! implementation used everywhere in this workspace; with the `native`
//! feature NetCDF files are loaded into one through libnetcdf.
//!
//! [`DatasetMetadata`] is the header snapshot handed to writers that need to
//! re-emit declarations into an [`OutputContainer`].

pub mod dataset;
pub mod error;
pub mod metadata;
#[cfg(feature = "native")]
pub mod native;
pub mod value;

pub use dataset::{Dataset, Dimension, MemoryDataset, OutputContainer, Variable, GLOBAL};
pub use error::{NcError, NcResult};
pub use metadata::{DatasetMetadata, VariableMeta};
pub use value::{format_float, ArrayData, AttrValue, DataType, Number};

//! Inspection of gridded climate datasets.
//!
//! Prints an `ncdump -h` style header listing and, for a chosen variable,
//! summaries of its time axis, spatial reference and vertical levels.

pub mod config;
pub mod report;
pub mod time_units;

use std::path::Path;

use anyhow::{Context, Result};
use nc_dataset::MemoryDataset;
use tracing::debug;

pub use config::{InspectConfig, OutputFormat};
pub use report::Report;

/// Load a dataset from a JSON description, or a NetCDF file when built with
/// the `native` feature.
pub fn load_dataset(path: &Path) -> Result<MemoryDataset> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        debug!(path = %path.display(), "Loading JSON dataset description");
        return MemoryDataset::from_json_file(path)
            .with_context(|| format!("Failed to load {}", path.display()));
    }
    open_native(path)
}

#[cfg(feature = "native")]
fn open_native(path: &Path) -> Result<MemoryDataset> {
    debug!(path = %path.display(), "Opening NetCDF file");
    nc_dataset::native::silence_hdf5_errors();
    nc_dataset::native::open(path).with_context(|| format!("Failed to open {}", path.display()))
}

#[cfg(not(feature = "native"))]
fn open_native(path: &Path) -> Result<MemoryDataset> {
    anyhow::bail!(
        "{} is not a JSON description; rebuild with --features native to read NetCDF files",
        path.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_json_description() {
        let dir = test_utils::temp_test_dir();
        let path = dir.path().join("grid.JSON");
        let ds = test_utils::fixtures::climate_grid();
        std::fs::write(&path, ds.to_json_string().unwrap()).unwrap();

        let loaded = load_dataset(&path).unwrap();
        assert_eq!(loaded, ds);
    }

    #[cfg(not(feature = "native"))]
    #[test]
    fn test_netcdf_needs_native_feature() {
        let err = load_dataset(Path::new("tas.nc")).unwrap_err();
        assert!(err.to_string().contains("--features native"));
    }
}

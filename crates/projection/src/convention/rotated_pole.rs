//! Rotated pole (CORDEX-style `rotated_pole` variable).
//!
//! The oblique transform is derived and kept on the parameters, but the
//! reported proj4 string is the plain WGS84 one: downstream consumers
//! currently expect geographic coordinates for rotated grids.
// TODO: report transform_proj4() once consumers of rotated-pole references
// handle ob_tran coordinates. proj4rs cannot build ob_tran either.

use nc_dataset::{Dataset, NcResult, Number};

use super::{derive_with, ConventionParams, Derivation, GridMappingConvention, WGS84_PROJ4};
use crate::error::ProjectionResult;

#[derive(Debug, Clone, Copy, Default)]
pub struct RotatedPole;

#[derive(Debug, Clone, PartialEq)]
pub struct RotatedPoleParams {
    pub grid_north_pole_latitude: Number,
    pub grid_north_pole_longitude: Number,
}

impl RotatedPoleParams {
    pub fn read(ds: &dyn Dataset, var: &str) -> NcResult<Self> {
        Ok(Self {
            grid_north_pole_latitude: ds.variable_number(var, "grid_north_pole_latitude")?,
            grid_north_pole_longitude: ds.variable_number(var, "grid_north_pole_longitude")?,
        })
    }

    /// The oblique transformation describing the rotated grid.
    pub fn transform_proj4(&self) -> String {
        format!(
            "+proj=ob_tran +o_proj=latlon +o_lon_p={} +o_lat_p={} +lon_0=180",
            self.grid_north_pole_longitude, self.grid_north_pole_latitude,
        )
    }

    /// The reported reference: WGS84 geographic.
    pub fn to_proj4(&self) -> String {
        WGS84_PROJ4.to_string()
    }
}

impl GridMappingConvention for RotatedPole {
    fn name(&self) -> &'static str {
        "RotatedPole"
    }

    fn grid_mapping_names(&self) -> &'static [&'static str] {
        &["rotated_pole"]
    }

    fn derive(&self, ds: &dyn Dataset) -> ProjectionResult<Derivation> {
        derive_with(self, ds, |var| {
            RotatedPoleParams::read(ds, var).map(ConventionParams::RotatedPole)
        })
    }
}

//! Oblique Mercator as written by the NARCCAP RCM3 model.
//!
//! The variable is named `Transverse_Mercator`, but the grid is an oblique
//! Mercator with the rotation fixed at 360 degrees.
//!
//! proj4rs has no `omerc`, so the native handle of these references cannot
//! be built: [`SpatialReference::native`] and
//! [`SpatialReference::compute_area`] return `ProjectionError::CrsBuild`.
//!
//! [`SpatialReference::native`]: crate::SpatialReference::native
//! [`SpatialReference::compute_area`]: crate::SpatialReference::compute_area

use nc_dataset::{Dataset, NcResult, Number};

use super::{derive_with, ConventionParams, Derivation, GridMappingConvention};
use crate::error::ProjectionResult;

#[derive(Debug, Clone, Copy, Default)]
pub struct ObliqueMercator;

#[derive(Debug, Clone, PartialEq)]
pub struct ObliqueMercatorParams {
    pub latitude_of_projection_origin: Number,
    pub longitude_of_central_meridian: Number,
    pub scale_factor_at_central_meridian: Number,
    pub false_easting: Number,
    pub false_northing: Number,
}

impl ObliqueMercatorParams {
    pub fn read(ds: &dyn Dataset, var: &str) -> NcResult<Self> {
        Ok(Self {
            latitude_of_projection_origin: ds.variable_number(var, "latitude_of_projection_origin")?,
            longitude_of_central_meridian: ds.variable_number(var, "longitude_of_central_meridian")?,
            scale_factor_at_central_meridian: ds
                .variable_number(var, "scale_factor_at_central_meridian")?,
            false_easting: ds.variable_number(var, "false_easting")?,
            false_northing: ds.variable_number(var, "false_northing")?,
        })
    }

    pub fn to_proj4(&self) -> String {
        format!(
            "+proj=omerc +lat_0={} +lonc={} +k_0={} +x_0={} +y_0={} +alpha=360",
            self.latitude_of_projection_origin,
            self.longitude_of_central_meridian,
            self.scale_factor_at_central_meridian,
            self.false_easting,
            self.false_northing,
        )
    }
}

impl GridMappingConvention for ObliqueMercator {
    fn name(&self) -> &'static str {
        "ObliqueMercator"
    }

    fn grid_mapping_names(&self) -> &'static [&'static str] {
        &["Transverse_Mercator"]
    }

    fn derive(&self, ds: &dyn Dataset) -> ProjectionResult<Derivation> {
        derive_with(self, ds, |var| {
            ObliqueMercatorParams::read(ds, var).map(ConventionParams::ObliqueMercator)
        })
    }
}

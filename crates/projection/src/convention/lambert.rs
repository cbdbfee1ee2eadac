//! Lambert Conformal Conic.
//!
//! Written by CF-compliant producers as `lambert_conformal_conic` and by
//! several NARCCAP regional models as `Lambert_Conformal`. The attribute set
//! is the same: two standard parallels, the projection origin and false
//! easting/northing.

use nc_dataset::{Dataset, NcResult, Number};

use super::{derive_with, ConventionParams, Derivation, GridMappingConvention};
use crate::error::ProjectionResult;

#[derive(Debug, Clone, Copy, Default)]
pub struct LambertConformalConic;

/// Lambert Conformal Conic parameters, in source units (degrees, km).
#[derive(Debug, Clone, PartialEq)]
pub struct LambertParams {
    pub standard_parallel_1: Number,
    pub standard_parallel_2: Number,
    pub latitude_of_projection_origin: Number,
    pub longitude_of_central_meridian: Number,
    pub false_easting: Number,
    pub false_northing: Number,
}

impl LambertParams {
    pub fn read(ds: &dyn Dataset, var: &str) -> NcResult<Self> {
        Ok(Self {
            standard_parallel_1: ds.variable_number_at(var, "standard_parallel", 0)?,
            standard_parallel_2: ds.variable_number_at(var, "standard_parallel", 1)?,
            latitude_of_projection_origin: ds.variable_number(var, "latitude_of_projection_origin")?,
            longitude_of_central_meridian: ds.variable_number(var, "longitude_of_central_meridian")?,
            false_easting: ds.variable_number(var, "false_easting")?,
            false_northing: ds.variable_number(var, "false_northing")?,
        })
    }

    pub fn to_proj4(&self) -> String {
        format!(
            "+proj=lcc +lat_1={} +lat_2={} +lat_0={} +lon_0={} +x_0={} +y_0={} \
             +datum=WGS84 +units=km +no_defs ",
            self.standard_parallel_1,
            self.standard_parallel_2,
            self.latitude_of_projection_origin,
            self.longitude_of_central_meridian,
            self.false_easting,
            self.false_northing,
        )
    }
}

impl GridMappingConvention for LambertConformalConic {
    fn name(&self) -> &'static str {
        "LambertConformalConic"
    }

    fn grid_mapping_names(&self) -> &'static [&'static str] {
        &["lambert_conformal_conic", "Lambert_Conformal"]
    }

    fn derive(&self, ds: &dyn Dataset) -> ProjectionResult<Derivation> {
        derive_with(self, ds, |var| {
            LambertParams::read(ds, var).map(ConventionParams::LambertConformalConic)
        })
    }
}

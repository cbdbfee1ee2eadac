//! Polar Stereographic.

use nc_dataset::{Dataset, NcResult, Number};

use super::{derive_with, ConventionParams, Derivation, GridMappingConvention};
use crate::error::ProjectionResult;

#[derive(Debug, Clone, Copy, Default)]
pub struct PolarStereographic;

/// Polar Stereographic parameters. The scale factor is always 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct PolarStereographicParams {
    pub standard_parallel: Number,
    pub latitude_of_projection_origin: Number,
    pub straight_vertical_longitude_from_pole: Number,
    pub false_easting: Number,
    pub false_northing: Number,
}

impl PolarStereographicParams {
    pub const SCALE_FACTOR: f64 = 1.0;

    pub fn read(ds: &dyn Dataset, var: &str) -> NcResult<Self> {
        Ok(Self {
            false_easting: ds.variable_number(var, "false_easting")?,
            false_northing: ds.variable_number(var, "false_northing")?,
            standard_parallel: ds.variable_number(var, "standard_parallel")?,
            latitude_of_projection_origin: ds.variable_number(var, "latitude_of_projection_origin")?,
            straight_vertical_longitude_from_pole: ds
                .variable_number(var, "straight_vertical_longitude_from_pole")?,
        })
    }

    pub fn to_proj4(&self) -> String {
        format!(
            "+proj=stere +lat_ts={} +lat_0={} +lon_0={} +k_0={} +x_0={} +y_0={}",
            self.standard_parallel,
            self.latitude_of_projection_origin,
            self.straight_vertical_longitude_from_pole,
            Number::Float(Self::SCALE_FACTOR),
            self.false_easting,
            self.false_northing,
        )
    }
}

impl GridMappingConvention for PolarStereographic {
    fn name(&self) -> &'static str {
        "PolarStereographic"
    }

    fn grid_mapping_names(&self) -> &'static [&'static str] {
        &["polar_stereographic"]
    }

    fn derive(&self, ds: &dyn Dataset) -> ProjectionResult<Derivation> {
        derive_with(self, ds, |var| {
            PolarStereographicParams::read(ds, var).map(ConventionParams::PolarStereographic)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nc_dataset::{DataType, MemoryDataset, Variable};

    fn polar() -> Variable {
        Variable::new("polar_stereographic", DataType::Char)
            .with_attribute("standard_parallel", 60.0)
            .with_attribute("latitude_of_projection_origin", 90.0)
            .with_attribute("straight_vertical_longitude_from_pole", 263.0)
            .with_attribute("false_easting", 3475000.0)
            .with_attribute("false_northing", 7475000.0)
    }

    #[test]
    fn test_proj4_has_fixed_scale_factor() {
        let ds = MemoryDataset::new().with_variable(polar());
        let Derivation::Applies(derived) = PolarStereographic.derive(&ds).unwrap() else {
            panic!("polar_stereographic should apply");
        };
        assert_eq!(
            derived.params.to_proj4(),
            "+proj=stere +lat_ts=60.0 +lat_0=90.0 +lon_0=263.0 +k_0=1.0 +x_0=3475000.0 +y_0=7475000.0"
        );
    }

    #[test]
    fn test_scale_factor_attribute_is_ignored() {
        let ds = MemoryDataset::new()
            .with_variable(polar().with_attribute("scale_factor_at_projection_origin", 0.97));
        let Derivation::Applies(derived) = PolarStereographic.derive(&ds).unwrap() else {
            panic!("polar_stereographic should apply");
        };
        assert!(derived.params.to_proj4().contains("+k_0=1.0 "));
    }

    #[test]
    fn test_text_false_easting_is_an_error() {
        let ds = MemoryDataset::new().with_variable(polar().with_attribute("false_easting", "0"));
        assert!(PolarStereographic.derive(&ds).is_err());
    }
}

//! Grid-mapping conventions.
//!
//! Each convention recognises the grid-mapping variable(s) one cartographic
//! scheme is written with, turns their attributes into typed parameters and
//! a proj4 string, and can copy the variable into derived output.
//!
//! A convention answers [`Derivation::NotApplicable`] only when a dataset
//! lookup misses (variable or attribute absent). Malformed values are errors
//! and stop resolution.

mod lambert;
mod oblique_mercator;
mod polar;
mod rotated_pole;

pub use lambert::{LambertConformalConic, LambertParams};
pub use oblique_mercator::{ObliqueMercator, ObliqueMercatorParams};
pub use polar::{PolarStereographic, PolarStereographicParams};
pub use rotated_pole::{RotatedPole, RotatedPoleParams};

use std::fmt;

use nc_dataset::{Dataset, DatasetMetadata, NcResult, OutputContainer};
use tracing::debug;

use crate::error::{NoProjectionFound, ProjectionError, ProjectionResult};

/// proj4 string of the WGS84 geographic reference (EPSG:4326).
pub const WGS84_PROJ4: &str = "+proj=longlat +datum=WGS84 +no_defs ";

/// One cartographic convention for encoding CRS metadata in a dataset.
pub trait GridMappingConvention: fmt::Debug + Send + Sync {
    /// Short identifier used in logs and errors.
    fn name(&self) -> &'static str;

    /// Variable names this convention is written with, preferred first.
    fn grid_mapping_names(&self) -> &'static [&'static str];

    /// Try to derive parameters from the dataset.
    fn derive(&self, ds: &dyn Dataset) -> ProjectionResult<Derivation>;

    /// Re-create this convention's grid-mapping variable in `out`, copying
    /// every attribute from the source metadata verbatim.
    fn write_descriptor(
        &self,
        out: &mut dyn OutputContainer,
        metadata: &DatasetMetadata,
    ) -> ProjectionResult<()> {
        let source = self
            .grid_mapping_names()
            .iter()
            .find_map(|name| metadata.variable(name))
            .ok_or_else(|| ProjectionError::MissingGridMapping(self.name().to_string()))?;

        out.create_variable(&source.name, source.dtype, &[])?;
        for (key, value) in &source.attributes {
            out.put_variable_attribute(&source.name, key, value.clone())?;
        }

        debug!(
            convention = self.name(),
            variable = %source.name,
            attributes = source.attributes.len(),
            "Wrote grid-mapping descriptor"
        );
        Ok(())
    }
}

/// Outcome of trying one convention against a dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum Derivation {
    Applies(Derived),
    NotApplicable(NoProjectionFound),
}

/// Parameters derived from a matched grid-mapping variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Derived {
    /// Dataset name of the grid-mapping variable
    pub grid_mapping: String,
    pub params: ConventionParams,
}

/// Typed parameters, one variant per convention.
#[derive(Debug, Clone, PartialEq)]
pub enum ConventionParams {
    LambertConformalConic(LambertParams),
    ObliqueMercator(ObliqueMercatorParams),
    PolarStereographic(PolarStereographicParams),
    RotatedPole(RotatedPoleParams),
}

impl ConventionParams {
    /// The proj4 string reported for this convention.
    pub fn to_proj4(&self) -> String {
        match self {
            ConventionParams::LambertConformalConic(p) => p.to_proj4(),
            ConventionParams::ObliqueMercator(p) => p.to_proj4(),
            ConventionParams::PolarStereographic(p) => p.to_proj4(),
            ConventionParams::RotatedPole(p) => p.to_proj4(),
        }
    }
}

/// First of `names` that the dataset has as a variable.
pub(crate) fn find_grid_mapping(ds: &dyn Dataset, names: &[&str]) -> Option<String> {
    names
        .iter()
        .find(|name| ds.has_variable(name))
        .map(|name| name.to_string())
}

/// Run a convention's attribute reads against its grid-mapping variable,
/// turning lookup misses into exclusion and everything else into errors.
pub(crate) fn derive_with<F>(
    convention: &dyn GridMappingConvention,
    ds: &dyn Dataset,
    read: F,
) -> ProjectionResult<Derivation>
where
    F: FnOnce(&str) -> NcResult<ConventionParams>,
{
    let names = convention.grid_mapping_names();
    let Some(grid_mapping) = find_grid_mapping(ds, names) else {
        return Ok(Derivation::NotApplicable(NoProjectionFound {
            convention: convention.name().to_string(),
            missing: format!("no variable named {}", names.join(" or ")),
        }));
    };

    match read(&grid_mapping) {
        Ok(params) => Ok(Derivation::Applies(Derived {
            grid_mapping,
            params,
        })),
        Err(e) if e.is_lookup_miss() => Ok(Derivation::NotApplicable(NoProjectionFound {
            convention: convention.name().to_string(),
            missing: e.to_string(),
        })),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nc_dataset::{AttrValue, DataType, MemoryDataset, Variable};

    #[test]
    fn test_descriptor_copies_attributes_verbatim() {
        let source = MemoryDataset::new().with_variable(
            Variable::new("rotated_pole", DataType::Char)
                .with_attribute("grid_mapping_name", "rotated_latitude_longitude")
                .with_attribute("grid_north_pole_latitude", 39.25)
                .with_attribute("grid_north_pole_longitude", -162.0),
        );
        let metadata = DatasetMetadata::from_dataset(&source).unwrap();

        let mut out = MemoryDataset::new();
        RotatedPole.write_descriptor(&mut out, &metadata).unwrap();

        let written = out.variable("rotated_pole").unwrap();
        assert_eq!(written.dtype, DataType::Char);
        assert_eq!(written.attributes, metadata.variable("rotated_pole").unwrap().attributes);
        assert_eq!(
            written.attribute("grid_north_pole_latitude"),
            Some(&AttrValue::Float(39.25))
        );
    }

    #[test]
    fn test_descriptor_requires_source_variable() {
        let metadata = DatasetMetadata::default();
        let mut out = MemoryDataset::new();
        let err = PolarStereographic
            .write_descriptor(&mut out, &metadata)
            .unwrap_err();
        assert!(matches!(err, ProjectionError::MissingGridMapping(_)));
    }

    #[test]
    fn test_lambert_descriptor_prefers_cf_name() {
        let source = MemoryDataset::new()
            .with_variable(Variable::new("Lambert_Conformal", DataType::Int))
            .with_variable(Variable::new("lambert_conformal_conic", DataType::Char));
        let metadata = DatasetMetadata::from_dataset(&source).unwrap();

        let mut out = MemoryDataset::new();
        LambertConformalConic
            .write_descriptor(&mut out, &metadata)
            .unwrap();
        assert!(out.variable("lambert_conformal_conic").is_some());
        assert!(out.variable("Lambert_Conformal").is_none());
    }
}

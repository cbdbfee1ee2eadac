//! Resolved spatial references.
//!
//! A [`SpatialReference`] is either a fixed registry entry (an EPSG code) or
//! the result of a grid-mapping convention matching a dataset. The proj4
//! string is computed when the reference is built; the native proj4rs handle
//! is built on first use and cached for the life of the reference.

use std::fmt;
use std::sync::{Arc, OnceLock};

use nc_dataset::{DatasetMetadata, OutputContainer};
use proj4rs::proj::Proj;
use proj4rs::transform::transform;
use tracing::debug;

use crate::convention::{ConventionParams, Derived, GridMappingConvention, WGS84_PROJ4};
use crate::error::{ProjectionError, ProjectionResult};
use crate::geometry::{Coord, Geometry};

pub const WGS84_SRID: u32 = 4326;
pub const US_NATIONAL_EQUAL_AREA_SRID: u32 = 2163;

/// proj4 string of the US National Atlas Equal Area projection (EPSG:2163).
pub const US_NATIONAL_EQUAL_AREA_PROJ4: &str =
    "+proj=laea +lat_0=45 +lon_0=-100 +x_0=0 +y_0=0 +a=6370997 +b=6370997 +units=m +no_defs ";

/// Definition handed to proj4rs for EPSG:2163. The spherical oblique laea
/// forward in proj4rs 0.1 computes `y` with a misplaced parenthesis, so the
/// sphere is given a 1e-9 flattening to run the ellipsoidal formulas instead.
/// The axes differ from the true sphere by under a centimetre.
const US_NATIONAL_EQUAL_AREA_ENGINE_PROJ4: &str =
    "+proj=laea +lat_0=45 +lon_0=-100 +x_0=0 +y_0=0 +a=6370997 +rf=1000000000 +units=m +no_defs";

/// Where a reference came from.
#[derive(Debug, Clone)]
pub enum ReferenceKind {
    /// Fixed registry entry
    Epsg { srid: u32, name: String },
    /// Derived from a dataset's grid-mapping variable
    Derived {
        convention: Arc<dyn GridMappingConvention>,
        grid_mapping: String,
        params: ConventionParams,
    },
}

pub struct SpatialReference {
    kind: ReferenceKind,
    proj4: String,
    native: OnceLock<Result<Proj, String>>,
}

impl fmt::Debug for SpatialReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialReference")
            .field("kind", &self.kind)
            .field("proj4", &self.proj4)
            .field("native_built", &self.native.get().is_some())
            .finish()
    }
}

impl Clone for SpatialReference {
    fn clone(&self) -> Self {
        Self::new(self.kind.clone(), self.proj4.clone())
    }
}

impl SpatialReference {
    fn new(kind: ReferenceKind, proj4: String) -> Self {
        Self {
            kind,
            proj4,
            native: OnceLock::new(),
        }
    }

    /// WGS84 geographic (EPSG:4326).
    pub fn wgs84() -> Self {
        Self::new(
            ReferenceKind::Epsg {
                srid: WGS84_SRID,
                name: "WGS84".to_string(),
            },
            WGS84_PROJ4.to_string(),
        )
    }

    /// US National Atlas Equal Area (EPSG:2163).
    pub fn us_national_equal_area() -> Self {
        Self::new(
            ReferenceKind::Epsg {
                srid: US_NATIONAL_EQUAL_AREA_SRID,
                name: "UsNationalEqualArea".to_string(),
            },
            US_NATIONAL_EQUAL_AREA_PROJ4.to_string(),
        )
    }

    /// Any code from the crs-definitions database. The two fixed entries keep
    /// their own names and proj4 strings.
    pub fn from_epsg(code: u32) -> ProjectionResult<Self> {
        match code {
            WGS84_SRID => return Ok(Self::wgs84()),
            US_NATIONAL_EQUAL_AREA_SRID => return Ok(Self::us_national_equal_area()),
            _ => {}
        }
        let proj4 = u16::try_from(code)
            .ok()
            .and_then(crs_definitions::from_code)
            .map(|def| def.proj4)
            .ok_or(ProjectionError::UnknownEpsg(code))?;
        Ok(Self::new(
            ReferenceKind::Epsg {
                srid: code,
                name: format!("EPSG:{code}"),
            },
            proj4.to_string(),
        ))
    }

    /// Reference for a convention that matched a dataset.
    pub fn derived(convention: Arc<dyn GridMappingConvention>, derived: Derived) -> Self {
        let proj4 = derived.params.to_proj4();
        Self::new(
            ReferenceKind::Derived {
                convention,
                grid_mapping: derived.grid_mapping,
                params: derived.params,
            },
            proj4,
        )
    }

    pub fn kind(&self) -> &ReferenceKind {
        &self.kind
    }

    pub fn to_proj4(&self) -> &str {
        &self.proj4
    }

    /// Registry name or convention name.
    pub fn name(&self) -> &str {
        match &self.kind {
            ReferenceKind::Epsg { name, .. } => name,
            ReferenceKind::Derived { convention, .. } => convention.name(),
        }
    }

    /// EPSG code, for fixed registry references.
    pub fn srid(&self) -> Option<u32> {
        match &self.kind {
            ReferenceKind::Epsg { srid, .. } => Some(*srid),
            ReferenceKind::Derived { .. } => None,
        }
    }

    /// Whether coordinates in this reference are degrees.
    pub fn is_geographic(&self) -> bool {
        ["+proj=longlat", "+proj=latlong", "+proj=lonlat", "+proj=latlon"]
            .iter()
            .any(|token| self.proj4.contains(token))
    }

    /// The native CRS handle, built once on first access.
    pub fn native(&self) -> ProjectionResult<&Proj> {
        let built = self.native.get_or_init(|| {
            let definition = self.engine_definition();
            debug!(proj4 = %definition, "Building native CRS");
            Proj::from_proj_string(definition).map_err(|e| format!("{e:?}"))
        });
        built.as_ref().map_err(|message| ProjectionError::CrsBuild {
            proj4: self.proj4.clone(),
            message: message.clone(),
        })
    }

    fn engine_definition(&self) -> &str {
        if self.proj4 == US_NATIONAL_EQUAL_AREA_PROJ4 {
            US_NATIONAL_EQUAL_AREA_ENGINE_PROJ4
        } else {
            &self.proj4
        }
    }

    /// Area of `geometry` in km², measured in `target`.
    ///
    /// Points have no area and give `None`. Every vertex is reprojected into
    /// `target` unless both references share a proj4 string, then the planar
    /// area (in squared target units, assumed metres) is scaled by 1e-6.
    pub fn compute_area(
        &self,
        target: &SpatialReference,
        geometry: &Geometry,
    ) -> ProjectionResult<Option<f64>> {
        if geometry.is_point() {
            return Ok(None);
        }

        let area = if self.proj4 == target.proj4 {
            geometry.area()
        } else {
            let source = self.native()?;
            let dest = target.native()?;
            let source_geographic = self.is_geographic();
            let target_geographic = target.is_geographic();

            let projected = geometry.try_map_coords(&mut |(x, y): Coord| {
                let mut point = if source_geographic {
                    (x.to_radians(), y.to_radians(), 0.0)
                } else {
                    (x, y, 0.0)
                };
                transform(source, dest, &mut point)
                    .map_err(|e| ProjectionError::Transform(format!("{e:?}")))?;
                Ok::<Coord, ProjectionError>(if target_geographic {
                    (point.0.to_degrees(), point.1.to_degrees())
                } else {
                    (point.0, point.1)
                })
            })?;
            projected.area()
        };

        Ok(Some(area * 1e-6))
    }

    /// Write this reference's grid-mapping variable into `out`. Registry
    /// references have no variable and write nothing.
    pub fn write_descriptor(
        &self,
        out: &mut dyn OutputContainer,
        metadata: &DatasetMetadata,
    ) -> ProjectionResult<()> {
        match &self.kind {
            ReferenceKind::Epsg { .. } => Ok(()),
            ReferenceKind::Derived { convention, .. } => {
                convention.write_descriptor(out, metadata)
            }
        }
    }
}

impl fmt::Display for SpatialReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convention::{LambertConformalConic, LambertParams};
    use nc_dataset::{DataType, MemoryDataset, Number, Variable};

    #[test]
    fn test_fixed_registry() {
        let wgs84 = SpatialReference::wgs84();
        assert_eq!(wgs84.srid(), Some(4326));
        assert_eq!(wgs84.name(), "WGS84");
        assert_eq!(wgs84.to_proj4(), "+proj=longlat +datum=WGS84 +no_defs ");
        assert!(wgs84.is_geographic());

        let equal_area = SpatialReference::us_national_equal_area();
        assert_eq!(equal_area.srid(), Some(2163));
        assert!(!equal_area.is_geographic());
    }

    #[test]
    fn test_equal_area_engine_definition() {
        let equal_area = SpatialReference::us_national_equal_area();
        assert_eq!(equal_area.to_proj4(), US_NATIONAL_EQUAL_AREA_PROJ4);
        assert!(equal_area.engine_definition().contains("+rf=1000000000"));
        assert!(equal_area.native().is_ok());

        let wgs84 = SpatialReference::wgs84();
        assert_eq!(wgs84.engine_definition(), wgs84.to_proj4());
    }

    #[test]
    fn test_from_epsg_known_codes() {
        assert_eq!(SpatialReference::from_epsg(4326).unwrap().name(), "WGS84");

        let mercator = SpatialReference::from_epsg(3857).unwrap();
        assert_eq!(mercator.srid(), Some(3857));
        assert!(mercator.to_proj4().contains("+proj=merc"));
    }

    #[test]
    fn test_from_epsg_unknown_code() {
        assert!(matches!(
            SpatialReference::from_epsg(99999),
            Err(ProjectionError::UnknownEpsg(99999))
        ));
    }

    #[test]
    fn test_native_is_built_once() {
        let wgs84 = SpatialReference::wgs84();
        let first = wgs84.native().unwrap() as *const Proj;
        let second = wgs84.native().unwrap() as *const Proj;
        assert_eq!(first, second);
    }

    #[test]
    fn test_native_build_failure_is_cached() {
        let reference = SpatialReference::new(
            ReferenceKind::Epsg {
                srid: 0,
                name: "broken".to_string(),
            },
            "+proj=definitely_not_a_projection".to_string(),
        );
        assert!(matches!(reference.native(), Err(ProjectionError::CrsBuild { .. })));
        assert!(matches!(reference.native(), Err(ProjectionError::CrsBuild { .. })));
    }

    #[test]
    fn test_derived_reference_delegates_descriptor() {
        let params = LambertParams {
            standard_parallel_1: Number::Float(30.0),
            standard_parallel_2: Number::Float(60.0),
            latitude_of_projection_origin: Number::Float(40.0),
            longitude_of_central_meridian: Number::Float(-97.0),
            false_easting: Number::Int(0),
            false_northing: Number::Int(0),
        };
        let reference = SpatialReference::derived(
            Arc::new(LambertConformalConic),
            Derived {
                grid_mapping: "Lambert_Conformal".to_string(),
                params: ConventionParams::LambertConformalConic(params),
            },
        );
        assert_eq!(reference.name(), "LambertConformalConic");
        assert_eq!(reference.srid(), None);

        let source = MemoryDataset::new().with_variable(
            Variable::new("Lambert_Conformal", DataType::Char)
                .with_attribute("grid_mapping_name", "lambert_conformal_conic"),
        );
        let metadata = DatasetMetadata::from_dataset(&source).unwrap();
        let mut out = MemoryDataset::new();
        reference.write_descriptor(&mut out, &metadata).unwrap();
        assert!(out.variable("Lambert_Conformal").is_some());
    }

    #[test]
    fn test_registry_reference_writes_nothing() {
        let mut out = MemoryDataset::new();
        SpatialReference::wgs84()
            .write_descriptor(&mut out, &DatasetMetadata::default())
            .unwrap();
        assert!(out.variables().is_empty());
    }
}

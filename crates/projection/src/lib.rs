//! Spatial reference resolution for gridded climate datasets.
//!
//! A dataset declares its coordinate reference system through a
//! grid-mapping variable whose attributes hold the projection parameters.
//! Each supported [`GridMappingConvention`] recognises one such encoding;
//! the [`ProjectionResolver`] tries every registered convention and returns
//! the single [`SpatialReference`] the dataset describes:
//!
//! | Convention              | Grid-mapping variable                          |
//! |-------------------------|------------------------------------------------|
//! | `LambertConformalConic` | `lambert_conformal_conic`, `Lambert_Conformal` |
//! | `ObliqueMercator`       | `Transverse_Mercator`                          |
//! | `PolarStereographic`    | `polar_stereographic`                          |
//! | `RotatedPole`           | `rotated_pole`                                 |
//!
//! A dataset with no grid-mapping variable resolves to WGS84 with an
//! advisory; one matching more than one convention is an error.
//!
//! ```ignore
//! let reference = projection::resolve(&dataset)?;
//! println!("{} -> {}", reference.name(), reference.to_proj4());
//! ```

pub mod convention;
pub mod error;
pub mod geometry;
pub mod reference;
pub mod registry;
pub mod resolver;

pub use convention::{
    ConventionParams, Derivation, Derived, GridMappingConvention, LambertConformalConic,
    LambertParams, ObliqueMercator, ObliqueMercatorParams, PolarStereographic,
    PolarStereographicParams, RotatedPole, RotatedPoleParams, WGS84_PROJ4,
};
pub use error::{NoProjectionFound, ProjectionError, ProjectionResult};
pub use geometry::{Coord, Geometry};
pub use reference::{
    ReferenceKind, SpatialReference, US_NATIONAL_EQUAL_AREA_PROJ4, US_NATIONAL_EQUAL_AREA_SRID,
    WGS84_SRID,
};
pub use registry::ConventionRegistry;
pub use resolver::{resolve, ProjectionResolver, Resolution, WGS84_FALLBACK_ADVISORY};

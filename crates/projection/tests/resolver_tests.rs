//! Resolution of the builtin conventions against in-memory datasets.

use std::sync::Arc;

use nc_dataset::{DataType, DatasetMetadata, MemoryDataset, Variable};
use projection::{
    resolve, ConventionRegistry, Geometry, GridMappingConvention, ProjectionError,
    ProjectionResolver, ReferenceKind, SpatialReference, WGS84_FALLBACK_ADVISORY, WGS84_PROJ4,
};
use test_utils::{assert_approx_eq, fixtures, require_test_file};

#[test]
fn test_narccap_lambert_conformal() {
    let reference = resolve(&fixtures::lambert_dataset()).unwrap();

    assert_eq!(reference.name(), "LambertConformalConic");
    assert_eq!(
        reference.to_proj4(),
        "+proj=lcc +lat_1=30.0 +lat_2=60.0 +lat_0=40.0 +lon_0=-97.0 +x_0=0 +y_0=0 \
         +datum=WGS84 +units=km +no_defs "
    );
    let ReferenceKind::Derived { grid_mapping, .. } = reference.kind() else {
        panic!("expected a derived reference");
    };
    assert_eq!(grid_mapping, "Lambert_Conformal");
}

#[test]
fn test_cf_lambert_conformal_conic() {
    let reference = resolve(&fixtures::lambert_conformal_conic_dataset()).unwrap();
    assert_eq!(reference.name(), "LambertConformalConic");
    assert!(reference.to_proj4().starts_with("+proj=lcc "));
}

#[test]
fn test_oblique_mercator() {
    let reference = resolve(&fixtures::oblique_mercator_dataset()).unwrap();
    assert_eq!(reference.name(), "ObliqueMercator");
    assert!(reference.to_proj4().starts_with("+proj=omerc "));
    assert!(reference.to_proj4().ends_with("+alpha=360"));
}

#[test]
fn test_polar_stereographic() {
    let reference = resolve(&fixtures::polar_stereographic_dataset()).unwrap();
    assert_eq!(reference.name(), "PolarStereographic");
    assert!(reference.to_proj4().starts_with("+proj=stere "));
    assert!(reference.to_proj4().contains("+k_0=1.0"));
}

#[test]
fn test_rotated_pole_reports_wgs84_string() {
    let reference = resolve(&fixtures::rotated_pole_dataset()).unwrap();
    assert_eq!(reference.name(), "RotatedPole");
    assert_eq!(reference.to_proj4(), WGS84_PROJ4);
    assert_eq!(reference.srid(), None);
}

#[test]
fn test_no_grid_mapping_falls_back_with_one_advisory() {
    let resolution = ProjectionResolver::default()
        .resolve_detailed(&fixtures::climate_grid())
        .unwrap();

    assert_eq!(resolution.reference.srid(), Some(4326));
    assert_eq!(resolution.reference.to_proj4(), WGS84_PROJ4);
    assert_eq!(resolution.advisories.len(), 1);
    assert_eq!(resolution.advisories[0], WGS84_FALLBACK_ADVISORY);
}

#[test]
fn test_single_match_has_no_advisories() {
    let resolution = ProjectionResolver::default()
        .resolve_detailed(&fixtures::polar_stereographic_dataset())
        .unwrap();
    assert!(resolution.advisories.is_empty());
}

#[test]
fn test_two_conventions_are_ambiguous() {
    let err = resolve(&fixtures::ambiguous_dataset()).unwrap_err();
    let ProjectionError::MultipleProjectionsFound { conventions } = err else {
        panic!("expected MultipleProjectionsFound, got {err:?}");
    };
    assert_eq!(
        conventions,
        vec![
            "LambertConformalConic (lambert_conformal_conic)",
            "PolarStereographic (polar_stereographic)",
        ]
    );
}

#[test]
fn test_two_projections_file() {
    let path = require_test_file!("two_projections.json");
    let ds = MemoryDataset::from_json_file(path).unwrap();
    assert!(matches!(
        resolve(&ds),
        Err(ProjectionError::MultipleProjectionsFound { .. })
    ));
}

#[test]
fn test_narccap_file() {
    let path = require_test_file!("narccap_lambert.json");
    let ds = MemoryDataset::from_json_file(path).unwrap();
    let reference = resolve(&ds).unwrap();
    assert_eq!(reference.name(), "LambertConformalConic");
}

#[test]
fn test_incomplete_grid_mapping_is_ignored() {
    // polar_stereographic without false_northing no longer qualifies, so the
    // Lambert variable is the only match.
    let mut polar = fixtures::polar_stereographic_variable();
    polar.attributes.retain(|(key, _)| key != "false_northing");
    let ds = fixtures::lambert_conformal_conic_dataset().with_variable(polar);

    assert_eq!(resolve(&ds).unwrap().name(), "LambertConformalConic");
}

#[test]
fn test_malformed_parameter_propagates() {
    let ds = fixtures::with_grid_mapping(
        fixtures::climate_grid(),
        fixtures::polar_stereographic_variable().with_attribute("false_easting", "east"),
    );
    assert!(matches!(resolve(&ds), Err(ProjectionError::Dataset(_))));
}

#[test]
fn test_custom_registry_limits_conventions() {
    let mut registry = ConventionRegistry::empty();
    registry.register(projection::PolarStereographic);
    let resolver = ProjectionResolver::new(registry);

    // Only the polar convention is consulted, so the ambiguity disappears.
    let reference = resolver.resolve(&fixtures::ambiguous_dataset()).unwrap();
    assert_eq!(reference.name(), "PolarStereographic");
}

#[test]
fn test_native_handle_is_shared() {
    let reference = resolve(&fixtures::polar_stereographic_dataset()).unwrap();
    let first = reference.native().unwrap() as *const _;
    let second = reference.native().unwrap() as *const _;
    assert_eq!(first, second);
}

#[test]
fn test_native_handle_per_convention() {
    let cases = [
        ("lambert", fixtures::lambert_dataset(), true),
        ("lambert_cf", fixtures::lambert_conformal_conic_dataset(), true),
        ("polar", fixtures::polar_stereographic_dataset(), true),
        ("rotated_pole", fixtures::rotated_pole_dataset(), true),
        // proj4rs has no omerc
        ("oblique_mercator", fixtures::oblique_mercator_dataset(), false),
    ];

    for (label, ds, buildable) in cases {
        let reference = resolve(&ds).unwrap();
        let native = reference.native();
        if buildable {
            assert!(native.is_ok(), "{label}: {:?}", native.err());
        } else {
            assert!(
                matches!(native, Err(ProjectionError::CrsBuild { .. })),
                "{label}: expected CrsBuild"
            );
        }
    }
}

#[test]
fn test_oblique_mercator_area_reports_crs_build() {
    let reference = resolve(&fixtures::oblique_mercator_dataset()).unwrap();
    let square = Geometry::rect(0.0, 0.0, 1000.0, 1000.0);
    let err = reference
        .compute_area(&SpatialReference::us_national_equal_area(), &square)
        .unwrap_err();
    match err {
        ProjectionError::CrsBuild { proj4, .. } => assert!(proj4.starts_with("+proj=omerc ")),
        other => panic!("expected CrsBuild, got {other:?}"),
    }
}

#[test]
fn test_area_of_point_is_none() {
    let wgs84 = SpatialReference::wgs84();
    let area = wgs84
        .compute_area(
            &SpatialReference::us_national_equal_area(),
            &Geometry::Point((-100.0, 40.0)),
        )
        .unwrap();
    assert_eq!(area, None);
}

#[test]
fn test_area_in_equal_area_projection() {
    let wgs84 = SpatialReference::wgs84();
    let cell = Geometry::rect(-100.0, 0.0, -99.0, 1.0);
    let area = wgs84
        .compute_area(&SpatialReference::us_national_equal_area(), &cell)
        .unwrap()
        .unwrap();
    // Vertex polygon of a one degree cell at the equator on the 6370997 m sphere.
    assert_approx_eq!(area, 12363.47, 0.5);
}

#[test]
fn test_area_in_equal_area_projection_mid_latitude() {
    let wgs84 = SpatialReference::wgs84();
    let cell = Geometry::rect(-100.0, 40.0, -99.0, 41.0);
    let area = wgs84
        .compute_area(&SpatialReference::us_national_equal_area(), &cell)
        .unwrap()
        .unwrap();
    assert_approx_eq!(area, 9401.41, 0.5);
}

#[test]
fn test_area_from_lambert_kilometres() {
    let lambert = resolve(&fixtures::lambert_dataset()).unwrap();
    // 100 km square at the Lambert origin (40N, 97W), in the grid's km units.
    let square = Geometry::rect(0.0, 0.0, 100.0, 100.0);
    let area = lambert
        .compute_area(&SpatialReference::us_national_equal_area(), &square)
        .unwrap()
        .unwrap();
    // The secant cone shrinks scale at 40N, so the ground area exceeds 10000 km².
    assert_approx_eq!(area, 10622.43, 2.0);
}

#[test]
fn test_area_without_transform() {
    let equal_area = SpatialReference::us_national_equal_area();
    let square = Geometry::rect(0.0, 0.0, 2000.0, 3000.0);
    let area = equal_area
        .compute_area(&SpatialReference::us_national_equal_area(), &square)
        .unwrap()
        .unwrap();
    assert_approx_eq!(area, 6.0, 1e-12);
}

#[test]
fn test_descriptor_round_trip() {
    let source = fixtures::lambert_dataset();
    let reference = resolve(&source).unwrap();
    let metadata = DatasetMetadata::from_dataset(&source).unwrap();

    let mut out = MemoryDataset::new();
    reference.write_descriptor(&mut out, &metadata).unwrap();

    let written = out.variable("Lambert_Conformal").unwrap();
    let original = metadata.variable("Lambert_Conformal").unwrap();
    assert_eq!(written.dtype, original.dtype);
    assert_eq!(written.attributes, original.attributes);

    // The copy resolves to the same reference.
    assert_eq!(resolve(&out).unwrap().to_proj4(), reference.to_proj4());
}

#[derive(Debug)]
struct Sinusoidal;

impl GridMappingConvention for Sinusoidal {
    fn name(&self) -> &'static str {
        "Sinusoidal"
    }

    fn grid_mapping_names(&self) -> &'static [&'static str] {
        &["sinusoidal"]
    }

    fn derive(
        &self,
        _ds: &dyn nc_dataset::Dataset,
    ) -> projection::ProjectionResult<projection::Derivation> {
        Ok(projection::Derivation::NotApplicable(
            projection::NoProjectionFound {
                convention: self.name().to_string(),
                missing: "unsupported".to_string(),
            },
        ))
    }
}

#[test]
fn test_registered_convention_writes_descriptor() {
    let source = MemoryDataset::new().with_variable(
        Variable::new("sinusoidal", DataType::Int).with_attribute("longitude_of_central_meridian", 0.0),
    );
    let metadata = DatasetMetadata::from_dataset(&source).unwrap();
    let convention: Arc<dyn GridMappingConvention> = Arc::new(Sinusoidal);

    let mut out = MemoryDataset::new();
    convention.write_descriptor(&mut out, &metadata).unwrap();
    assert_eq!(out.variable("sinusoidal").unwrap().dtype, DataType::Int);
}

//! In-memory datasets exercising each grid-mapping convention.
//!
//! Every fixture starts from [`climate_grid`], a small `tas(time, y, x)`
//! dataset, and adds at most one grid-mapping variable, so fixtures can be
//! combined with [`with_grid_mapping`] to build ambiguous datasets.

use nc_dataset::{ArrayData, DataType, MemoryDataset, Variable};

/// A 3 x 2 x 2 daily temperature grid with no grid-mapping variable.
pub fn climate_grid() -> MemoryDataset {
    MemoryDataset::new()
        .with_dimension("time", 3)
        .with_dimension("y", 2)
        .with_dimension("x", 2)
        .with_variable(
            Variable::new("time", DataType::Double)
                .with_dimensions(&["time"])
                .with_attribute("units", "days since 1968-01-01 00:00:00")
                .with_attribute("calendar", "standard")
                .with_data(ArrayData::Float(vec![0.0, 1.0, 2.0])),
        )
        .with_variable(
            Variable::new("lat", DataType::Float)
                .with_dimensions(&["y", "x"])
                .with_attribute("units", "degrees_north")
                .with_data(ArrayData::Float(vec![40.0, 40.0, 41.0, 41.0])),
        )
        .with_variable(
            Variable::new("lon", DataType::Float)
                .with_dimensions(&["y", "x"])
                .with_attribute("units", "degrees_east")
                .with_data(ArrayData::Float(vec![-98.0, -97.0, -98.0, -97.0])),
        )
        .with_variable(
            Variable::new("tas", DataType::Float)
                .with_dimensions(&["time", "y", "x"])
                .with_attribute("units", "K")
                .with_attribute("long_name", "Surface Air Temperature")
                .with_data(ArrayData::Float(vec![280.0; 12])),
        )
        .with_global_attribute("title", "grid-crs fixture")
        .with_global_attribute("Conventions", "CF-1.4")
}

/// Add a grid-mapping variable and point `tas` at it.
pub fn with_grid_mapping(ds: MemoryDataset, grid_mapping: Variable) -> MemoryDataset {
    let mapping_name = grid_mapping.name.clone();
    let tas = ds
        .variable("tas")
        .cloned()
        .map(|tas| tas.with_attribute("grid_mapping", mapping_name.as_str()));

    let ds = ds.with_variable(grid_mapping);
    match tas {
        Some(tas) => ds.with_variable(tas),
        None => ds,
    }
}

/// NARCCAP-style `Lambert_Conformal` variable.
pub fn lambert_conformal_variable(name: &str) -> Variable {
    Variable::new(name, DataType::Char)
        .with_attribute("grid_mapping_name", "lambert_conformal_conic")
        .with_attribute("standard_parallel", [30.0, 60.0])
        .with_attribute("longitude_of_central_meridian", -97.0)
        .with_attribute("latitude_of_projection_origin", 40.0)
        .with_attribute("false_easting", 0)
        .with_attribute("false_northing", 0)
}

/// `Transverse_Mercator` variable as written by the RCM3 regional model.
pub fn oblique_mercator_variable() -> Variable {
    Variable::new("Transverse_Mercator", DataType::Char)
        .with_attribute("grid_mapping_name", "transverse_mercator")
        .with_attribute("latitude_of_projection_origin", 47.5)
        .with_attribute("longitude_of_central_meridian", -97.0)
        .with_attribute("scale_factor_at_central_meridian", 1.0)
        .with_attribute("false_easting", 3_175_000.0)
        .with_attribute("false_northing", 2_325_000.0)
}

pub fn polar_stereographic_variable() -> Variable {
    Variable::new("polar_stereographic", DataType::Char)
        .with_attribute("grid_mapping_name", "polar_stereographic")
        .with_attribute("standard_parallel", 60.0)
        .with_attribute("latitude_of_projection_origin", 90.0)
        .with_attribute("straight_vertical_longitude_from_pole", 263.0)
        .with_attribute("false_easting", 3_475_000.0)
        .with_attribute("false_northing", 7_475_000.0)
}

/// CORDEX EUR-44 rotated pole.
pub fn rotated_pole_variable() -> Variable {
    Variable::new("rotated_pole", DataType::Char)
        .with_attribute("grid_mapping_name", "rotated_latitude_longitude")
        .with_attribute("grid_north_pole_latitude", 39.25)
        .with_attribute("grid_north_pole_longitude", -162.0)
}

pub fn lambert_dataset() -> MemoryDataset {
    with_grid_mapping(climate_grid(), lambert_conformal_variable("Lambert_Conformal"))
}

pub fn lambert_conformal_conic_dataset() -> MemoryDataset {
    with_grid_mapping(
        climate_grid(),
        lambert_conformal_variable("lambert_conformal_conic"),
    )
}

pub fn oblique_mercator_dataset() -> MemoryDataset {
    with_grid_mapping(climate_grid(), oblique_mercator_variable())
}

pub fn polar_stereographic_dataset() -> MemoryDataset {
    with_grid_mapping(climate_grid(), polar_stereographic_variable())
}

pub fn rotated_pole_dataset() -> MemoryDataset {
    with_grid_mapping(climate_grid(), rotated_pole_variable())
}

/// Lambert conic and polar stereographic in the same file.
pub fn ambiguous_dataset() -> MemoryDataset {
    with_grid_mapping(
        lambert_conformal_conic_dataset(),
        polar_stereographic_variable(),
    )
}

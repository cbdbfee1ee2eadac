//! Definitions for the quantities every gridded climate dataset names
//! differently.

use crate::matcher::{ElementDef, VariableDef};

const TIME: &[&str] = &["time", "Time", "TIME", "t"];
const LEVEL: &[&str] = &["level", "lev", "plev", "z", "height", "depth"];
const LATITUDE: &[&str] = &["lat", "latitude", "Latitude", "LAT", "nav_lat"];
const LONGITUDE: &[&str] = &["lon", "longitude", "Longitude", "LON", "nav_lon"];

/// Time coordinate; requires `units`.
pub fn time() -> VariableDef {
    VariableDef::new(ElementDef::from_static("time", TIME)).with_attribute(units())
}

/// Vertical coordinate.
pub fn level() -> VariableDef {
    VariableDef::new(ElementDef::from_static("level", LEVEL))
}

pub fn latitude() -> VariableDef {
    VariableDef::new(ElementDef::from_static("latitude", LATITUDE))
}

pub fn longitude() -> VariableDef {
    VariableDef::new(ElementDef::from_static("longitude", LONGITUDE))
}

pub fn time_dimension() -> ElementDef {
    ElementDef::from_static("time", TIME)
}

pub fn level_dimension() -> ElementDef {
    ElementDef::from_static("level", LEVEL)
}

pub fn units() -> ElementDef {
    ElementDef::from_static("units", &["units", "Units", "UNITS"])
}

pub fn calendar() -> ElementDef {
    ElementDef::from_static("calendar", &["calendar", "Calendar"])
}

/// Cell boundary variable reference (`bounds` in CF, `edges` in older files).
pub fn bounds() -> ElementDef {
    ElementDef::from_static("bounds", &["bounds", "edges"])
}

/// Global `title`.
pub fn title() -> ElementDef {
    ElementDef::from_static("title", &["title", "Title", "TITLE"])
}

/// Global metadata convention declaration, e.g. `CF-1.4`.
pub fn conventions() -> ElementDef {
    ElementDef::from_static("conventions", &["Conventions", "conventions"])
}

//! ncdump-style inspection reports.
//!
//! Without a variable the report is the header dump. With one it adds the
//! temporal, spatial and level summaries of the dataset the variable lives
//! in.

use std::fmt;

use anyhow::{bail, Context, Result};
use element_model::{
    standard, AttributeElement, ElementError, ElementResult, VariableElement,
};
use nc_dataset::{format_float, Dataset, DatasetMetadata};
use projection::ProjectionResolver;
use serde::Serialize;
use tracing::{debug, info};

use crate::time_units::{resolution_days, Calendar, CfDateTime, TimeUnits};

const TEMPORAL_HEADER: &str = "=== Temporal =============";
const SPATIAL_HEADER: &str = "=== Spatial ==============";
const LEVEL_HEADER: &str = "=== Level ================";
const DUMP_HEADER: &str = "=== Dump =================";

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub uri: String,
    pub variable: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<VariableReport>,
    pub dump: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VariableReport {
    pub temporal: Option<TemporalReport>,
    pub spatial: SpatialReport,
    pub level: Option<LevelReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemporalReport {
    pub variable: String,
    pub start: Option<CfDateTime>,
    pub end: Option<CfDateTime>,
    pub calendar: String,
    pub units: String,
    pub resolution_days: Option<i64>,
    pub count: usize,
    pub has_bounds: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpatialReport {
    pub reference: String,
    pub proj4: String,
    /// `(min_lon, min_lat, max_lon, max_lat)`
    pub extent: Option<[f64; 4]>,
    pub resolution: Option<f64>,
    pub count: Option<usize>,
    pub advisories: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LevelReport {
    pub variable: String,
    pub count: usize,
    pub has_bounds: bool,
}

impl Report {
    pub fn build(uri: &str, ds: &dyn Dataset, variable: Option<&str>) -> Result<Self> {
        info!(uri = %uri, variable = ?variable, "Inspecting dataset");

        let dump = DatasetMetadata::from_dataset(ds)
            .context("Failed to read dataset header")?
            .dump_lines();

        let details = match variable {
            None => None,
            Some(name) => {
                if !ds.has_variable(name) {
                    bail!("Variable '{name}' not found in {uri}");
                }
                Some(VariableReport {
                    temporal: temporal_report(ds)?,
                    spatial: spatial_report(ds)?,
                    level: level_report(ds)?,
                })
            }
        };

        Ok(Self {
            uri: uri.to_string(),
            variable: variable.map(str::to_string),
            details,
            dump,
        })
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            String::new(),
            format!("URI = {}", self.uri),
            format!("VARIABLE = {}", self.variable.as_deref().unwrap_or("None")),
            String::new(),
        ];

        let Some(details) = &self.details else {
            lines.extend(self.dump.iter().cloned());
            return lines;
        };

        let sections = [
            (TEMPORAL_HEADER, details.temporal_lines()),
            (SPATIAL_HEADER, details.spatial.lines()),
            (LEVEL_HEADER, details.level_lines()),
            (DUMP_HEADER, self.dump.clone()),
        ];
        for (header, body) in sections {
            lines.push(header.to_string());
            lines.push(String::new());
            lines.extend(body);
            lines.push(String::new());
        }
        lines
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

impl VariableReport {
    fn temporal_lines(&self) -> Vec<String> {
        let Some(t) = &self.temporal else {
            return vec!["No time dimension found.".to_string()];
        };
        vec![
            format!("       Start Date = {}", or_none(t.start)),
            format!("         End Date = {}", or_none(t.end)),
            format!("         Calendar = {}", t.calendar),
            format!("            Units = {}", t.units),
            format!("Resolution (Days) = {}", or_none(t.resolution_days)),
            format!("            Count = {}", t.count),
            format!("       Has Bounds = {}", t.has_bounds),
        ]
    }

    fn level_lines(&self) -> Vec<String> {
        let Some(l) = &self.level else {
            return vec!["No level dimension found.".to_string()];
        };
        vec![
            format!("Level Variable = {}", l.variable),
            format!("         Count = {}", l.count),
            format!("    Has Bounds = {}", l.has_bounds),
        ]
    }
}

impl SpatialReport {
    fn lines(&self) -> Vec<String> {
        let extent = match self.extent {
            Some(e) => format!(
                "({}, {}, {}, {})",
                format_float(e[0]),
                format_float(e[1]),
                format_float(e[2]),
                format_float(e[3])
            ),
            None => "None".to_string(),
        };
        let mut lines = vec![
            format!("Spatial Reference = {}", self.reference),
            format!("     Proj4 String = {}", self.proj4),
            format!("           Extent = {extent}"),
            format!("       Resolution = {}", or_none(self.resolution.map(format_float))),
            format!("            Count = {}", or_none(self.count)),
        ];
        lines.extend(self.advisories.iter().map(|a| format!("         Advisory = {a}")));
        lines
    }
}

fn or_none<T: fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "None".to_string(), |v| v.to_string())
}

/// Absent elements are `None`; any other failure is an error.
fn optional<T>(result: ElementResult<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ElementError::NotFound { element, .. }) => {
            debug!(element = %element, "Element not present");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn has_bounds(ds: &dyn Dataset, owner: &VariableElement) -> Result<bool> {
    Ok(optional(AttributeElement::new(ds, owner, &standard::bounds()))?.is_some())
}

fn temporal_report(ds: &dyn Dataset) -> Result<Option<TemporalReport>> {
    let Some(time) = optional(VariableElement::new(ds, &standard::time()))? else {
        return Ok(None);
    };

    let units_text = time
        .attribute_value("units")
        .and_then(|v| v.as_text())
        .with_context(|| format!("'{}' units are not text", time.name()))?
        .to_string();
    let calendar_text = optional(AttributeElement::new(ds, &time, &standard::calendar()))?
        .and_then(|attr| attr.value().as_text().map(str::to_string))
        .unwrap_or_else(|| "standard".to_string());

    let units = TimeUnits::parse(&units_text)?;
    let calendar: Calendar = calendar_text.parse()?;
    let values = time
        .value()
        .as_f64()
        .with_context(|| format!("'{}' values are not numeric", time.name()))?;

    let start = time.value().min().map(|v| units.decode(v, calendar)).transpose()?;
    let end = time.value().max().map(|v| units.decode(v, calendar)).transpose()?;

    Ok(Some(TemporalReport {
        variable: time.name().to_string(),
        start,
        end,
        calendar: calendar_text,
        units: units_text,
        resolution_days: resolution_days(&values, units.unit).map(|d| d.trunc() as i64),
        count: values.len(),
        has_bounds: has_bounds(ds, &time)?,
    }))
}

fn spatial_report(ds: &dyn Dataset) -> Result<SpatialReport> {
    let resolution = ProjectionResolver::default().resolve_detailed(ds)?;

    let latitude = optional(VariableElement::new(ds, &standard::latitude()))?;
    let longitude = optional(VariableElement::new(ds, &standard::longitude()))?;

    let (extent, grid_resolution, count) = match (&latitude, &longitude) {
        (Some(lat), Some(lon)) => {
            let extent = match (lon.value().min(), lat.value().min(), lon.value().max(), lat.value().max()) {
                (Some(x0), Some(y0), Some(x1), Some(y1)) => Some([x0, y0, x1, y1]),
                _ => None,
            };
            let one_dimensional = ds.variable_dimensions(lat.name())?.len() == 1
                && ds.variable_dimensions(lon.name())?.len() == 1;
            if one_dimensional {
                let lat_step = mean_step(lat);
                let lon_step = mean_step(lon);
                let step = match (lat_step, lon_step) {
                    (Some(a), Some(b)) => Some((a + b) / 2.0),
                    _ => None,
                };
                (extent, step, Some(lat.value().len() * lon.value().len()))
            } else {
                (extent, None, Some(lat.value().len()))
            }
        }
        _ => (None, None, None),
    };

    Ok(SpatialReport {
        reference: resolution.reference.name().to_string(),
        proj4: resolution.reference.to_proj4().to_string(),
        extent,
        resolution: grid_resolution,
        count,
        advisories: resolution.advisories,
    })
}

/// Mean absolute spacing of a one-dimensional coordinate.
fn mean_step(coord: &VariableElement) -> Option<f64> {
    let values = coord.value().as_f64()?;
    if values.len() < 2 {
        return None;
    }
    let total: f64 = values.windows(2).map(|w| (w[1] - w[0]).abs()).sum();
    Some(total / (values.len() - 1) as f64)
}

fn level_report(ds: &dyn Dataset) -> Result<Option<LevelReport>> {
    let Some(level) = optional(VariableElement::new(ds, &standard::level()))? else {
        return Ok(None);
    };
    Ok(Some(LevelReport {
        variable: level.name().to_string(),
        count: level.value().len(),
        has_bounds: has_bounds(ds, &level)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::fixtures;

    #[test]
    fn test_no_variable_report_is_the_dump() {
        let ds = fixtures::climate_grid();
        let report = Report::build("memory://grid", &ds, None).unwrap();
        let lines = report.lines();

        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "URI = memory://grid");
        assert_eq!(lines[2], "VARIABLE = None");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "dimensions:");
        assert!(report.details.is_none());
    }

    #[test]
    fn test_unknown_variable_is_an_error() {
        let ds = fixtures::climate_grid();
        let err = Report::build("memory://grid", &ds, Some("pr")).unwrap_err();
        assert!(err.to_string().contains("'pr' not found"));
    }

    #[test]
    fn test_variable_report_sections() {
        let ds = fixtures::lambert_dataset();
        let report = Report::build("memory://lambert", &ds, Some("tas")).unwrap();
        let text = report.to_string();

        for header in [TEMPORAL_HEADER, SPATIAL_HEADER, LEVEL_HEADER, DUMP_HEADER] {
            assert!(text.contains(header), "missing {header}");
        }
        assert!(text.contains("Spatial Reference = LambertConformalConic"));
        assert!(text.contains("       Start Date = 1968-01-01 00:00:00"));
        assert!(text.contains("No level dimension found."));
    }

    #[test]
    fn test_missing_grid_mapping_reports_wgs84_advisory() {
        let ds = fixtures::climate_grid();
        let report = Report::build("memory://grid", &ds, Some("tas")).unwrap();
        let spatial = &report.details.as_ref().unwrap().spatial;
        assert_eq!(spatial.reference, "WGS84");
        assert_eq!(spatial.advisories.len(), 1);
    }

    #[test]
    fn test_json_output() {
        let ds = fixtures::polar_stereographic_dataset();
        let report = Report::build("memory://polar", &ds, Some("tas")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["variable"], "tas");
        assert_eq!(json["details"]["spatial"]["reference"], "PolarStereographic");
    }
}

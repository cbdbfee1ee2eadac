//! Snapshot of a dataset's header: dimensions, variable declarations and
//! attributes, without payloads.

use serde::Serialize;

use crate::dataset::{attr_map, Dataset, Dimension};
use crate::error::NcResult;
use crate::value::{AttrValue, DataType};

/// Declaration of one variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableMeta {
    pub name: String,
    pub dtype: DataType,
    pub dimensions: Vec<String>,
    #[serde(with = "attr_map")]
    pub attributes: Vec<(String, AttrValue)>,
}

/// Header metadata of a dataset, read once and held independently of it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatasetMetadata {
    pub dimensions: Vec<Dimension>,
    pub variables: Vec<VariableMeta>,
    #[serde(with = "attr_map")]
    pub attributes: Vec<(String, AttrValue)>,
}

impl DatasetMetadata {
    pub fn from_dataset(ds: &dyn Dataset) -> NcResult<Self> {
        let dimensions = ds
            .dimension_names()
            .into_iter()
            .map(|name| {
                let len = ds.dimension_len(&name)?;
                Ok(Dimension { name, len })
            })
            .collect::<NcResult<Vec<_>>>()?;

        let variables = ds
            .variable_names()
            .into_iter()
            .map(|name| {
                let attributes = ds
                    .variable_attribute_names(&name)?
                    .into_iter()
                    .map(|attr| {
                        let value = ds.variable_attribute(&name, &attr)?;
                        Ok((attr, value))
                    })
                    .collect::<NcResult<Vec<_>>>()?;
                Ok(VariableMeta {
                    dtype: ds.variable_dtype(&name)?,
                    dimensions: ds.variable_dimensions(&name)?,
                    attributes,
                    name,
                })
            })
            .collect::<NcResult<Vec<_>>>()?;

        let attributes = ds
            .global_attribute_names()
            .into_iter()
            .map(|name| {
                let value = ds.global_attribute(&name)?;
                Ok((name, value))
            })
            .collect::<NcResult<Vec<_>>>()?;

        Ok(Self {
            dimensions,
            variables,
            attributes,
        })
    }

    pub fn variable(&self, name: &str) -> Option<&VariableMeta> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Header listing in the layout of `ncdump -h`.
    pub fn dump_lines(&self) -> Vec<String> {
        let mut lines = vec!["dimensions:".to_string()];
        for dim in &self.dimensions {
            lines.push(format!("\t{} = {} ;", dim.name, dim.len));
        }

        lines.push("variables:".to_string());
        for var in &self.variables {
            if var.dimensions.is_empty() {
                lines.push(format!("\t{} {} ;", var.dtype, var.name));
            } else {
                lines.push(format!(
                    "\t{} {}({}) ;",
                    var.dtype,
                    var.name,
                    var.dimensions.join(", ")
                ));
            }
            for (key, value) in &var.attributes {
                lines.push(format!("\t\t{}:{} = {} ;", var.name, key, value.to_cdl()));
            }
        }

        if !self.attributes.is_empty() {
            lines.push(String::new());
            lines.push("// global attributes:".to_string());
            for (key, value) in &self.attributes {
                lines.push(format!("\t\t:{} = {} ;", key, value.to_cdl()));
            }
        }

        lines
    }
}

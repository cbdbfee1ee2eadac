//! The dataset handle consumed by element matching and projection resolution.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{NcError, NcResult};
use crate::value::{ArrayData, AttrValue, DataType, Number};

/// Owner label used in errors for dataset-level attributes.
pub const GLOBAL: &str = "global";

/// Read access to an opened, self-describing gridded dataset.
///
/// Absent variables, dimensions and attributes are reported with the
/// lookup-miss variants of [`NcError`] so callers can tell "not there" apart
/// from malformed content.
pub trait Dataset {
    fn dimension_names(&self) -> Vec<String>;

    fn dimension_len(&self, name: &str) -> NcResult<usize>;

    fn variable_names(&self) -> Vec<String>;

    fn global_attribute_names(&self) -> Vec<String>;

    fn global_attribute(&self, name: &str) -> NcResult<AttrValue>;

    fn variable_dtype(&self, var: &str) -> NcResult<DataType>;

    fn variable_dimensions(&self, var: &str) -> NcResult<Vec<String>>;

    fn variable_attribute_names(&self, var: &str) -> NcResult<Vec<String>>;

    fn variable_attribute(&self, var: &str, name: &str) -> NcResult<AttrValue>;

    fn variable_values(&self, var: &str) -> NcResult<ArrayData>;

    fn has_variable(&self, var: &str) -> bool {
        self.variable_names().iter().any(|name| name == var)
    }

    /// A variable attribute that must hold a single number.
    fn variable_number(&self, var: &str, name: &str) -> NcResult<Number> {
        self.variable_attribute(var, name)?
            .as_number()
            .ok_or_else(|| NcError::type_mismatch(var, name, "a single number"))
    }

    /// Element `index` of a numeric variable attribute.
    fn variable_number_at(&self, var: &str, name: &str, index: usize) -> NcResult<Number> {
        self.variable_attribute(var, name)?
            .number_at(index)
            .ok_or_else(|| {
                NcError::type_mismatch(var, name, &format!("a numeric value at index {}", index))
            })
    }
}

/// Writable side of a dataset, used to re-emit metadata into derived output.
pub trait OutputContainer {
    fn create_variable(&mut self, name: &str, dtype: DataType, dimensions: &[String])
        -> NcResult<()>;

    fn put_variable_attribute(&mut self, var: &str, name: &str, value: AttrValue)
        -> NcResult<()>;
}

/// A named dimension and its length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub len: usize,
}

/// A variable: type, shape, attributes in declaration order, and payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub dtype: DataType,
    #[serde(default)]
    pub dimensions: Vec<String>,
    #[serde(default, with = "attr_map")]
    pub attributes: Vec<(String, AttrValue)>,
    #[serde(default, skip_serializing_if = "ArrayData::is_empty")]
    pub data: ArrayData,
}

impl Variable {
    pub fn new(name: impl Into<String>, dtype: DataType) -> Self {
        Self {
            name: name.into(),
            dtype,
            dimensions: Vec::new(),
            attributes: Vec::new(),
            data: ArrayData::default(),
        }
    }

    pub fn with_dimensions(mut self, dimensions: &[&str]) -> Self {
        self.dimensions = dimensions.iter().map(|d| d.to_string()).collect();
        self
    }

    /// Set an attribute, replacing an existing one of the same name in place.
    pub fn with_attribute(mut self, name: &str, value: impl Into<AttrValue>) -> Self {
        self.set_attribute(name, value.into());
        self
    }

    pub fn with_data(mut self, data: ArrayData) -> Self {
        self.data = data;
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    fn set_attribute(&mut self, name: &str, value: AttrValue) {
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }
}

/// A dataset held entirely in memory.
///
/// Declaration order of dimensions, variables and attributes is preserved,
/// both in the accessors and through JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryDataset {
    #[serde(default)]
    dimensions: Vec<Dimension>,
    #[serde(default)]
    variables: Vec<Variable>,
    #[serde(default, with = "attr_map")]
    attributes: Vec<(String, AttrValue)>,
}

impl MemoryDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dimension(mut self, name: &str, len: usize) -> Self {
        match self.dimensions.iter_mut().find(|d| d.name == name) {
            Some(dim) => dim.len = len,
            None => self.dimensions.push(Dimension {
                name: name.to_string(),
                len,
            }),
        }
        self
    }

    /// Add a variable, replacing any existing variable of the same name.
    pub fn with_variable(mut self, variable: Variable) -> Self {
        match self.variables.iter_mut().find(|v| v.name == variable.name) {
            Some(slot) => *slot = variable,
            None => self.variables.push(variable),
        }
        self
    }

    pub fn with_global_attribute(mut self, name: &str, value: impl Into<AttrValue>) -> Self {
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name.to_string(), value)),
        }
        self
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn global_attributes(&self) -> &[(String, AttrValue)] {
        &self.attributes
    }

    pub fn from_json_str(json: &str) -> NcResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> NcResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> NcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn require_variable(&self, name: &str) -> NcResult<&Variable> {
        self.variable(name)
            .ok_or_else(|| NcError::VariableNotFound(name.to_string()))
    }
}

impl Dataset for MemoryDataset {
    fn dimension_names(&self) -> Vec<String> {
        self.dimensions.iter().map(|d| d.name.clone()).collect()
    }

    fn dimension_len(&self, name: &str) -> NcResult<usize> {
        self.dimensions
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.len)
            .ok_or_else(|| NcError::DimensionNotFound(name.to_string()))
    }

    fn variable_names(&self) -> Vec<String> {
        self.variables.iter().map(|v| v.name.clone()).collect()
    }

    fn global_attribute_names(&self) -> Vec<String> {
        self.attributes.iter().map(|(key, _)| key.clone()).collect()
    }

    fn global_attribute(&self, name: &str) -> NcResult<AttrValue> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
            .ok_or_else(|| NcError::attribute_not_found(GLOBAL, name))
    }

    fn variable_dtype(&self, var: &str) -> NcResult<DataType> {
        Ok(self.require_variable(var)?.dtype)
    }

    fn variable_dimensions(&self, var: &str) -> NcResult<Vec<String>> {
        Ok(self.require_variable(var)?.dimensions.clone())
    }

    fn variable_attribute_names(&self, var: &str) -> NcResult<Vec<String>> {
        Ok(self
            .require_variable(var)?
            .attributes
            .iter()
            .map(|(key, _)| key.clone())
            .collect())
    }

    fn variable_attribute(&self, var: &str, name: &str) -> NcResult<AttrValue> {
        self.require_variable(var)?
            .attribute(name)
            .cloned()
            .ok_or_else(|| NcError::attribute_not_found(var, name))
    }

    fn variable_values(&self, var: &str) -> NcResult<ArrayData> {
        Ok(self.require_variable(var)?.data.clone())
    }

    fn has_variable(&self, var: &str) -> bool {
        self.variable(var).is_some()
    }
}

impl OutputContainer for MemoryDataset {
    fn create_variable(
        &mut self,
        name: &str,
        dtype: DataType,
        dimensions: &[String],
    ) -> NcResult<()> {
        if self.variable(name).is_some() {
            return Err(NcError::VariableExists(name.to_string()));
        }
        let mut variable = Variable::new(name, dtype);
        variable.dimensions = dimensions.to_vec();
        self.variables.push(variable);
        Ok(())
    }

    fn put_variable_attribute(&mut self, var: &str, name: &str, value: AttrValue) -> NcResult<()> {
        let variable = self
            .variables
            .iter_mut()
            .find(|v| v.name == var)
            .ok_or_else(|| NcError::VariableNotFound(var.to_string()))?;
        variable.set_attribute(name, value);
        Ok(())
    }
}

/// Serde adapter: ordered `(name, value)` pairs as a JSON object, keeping
/// the order they appear in.
pub(crate) mod attr_map {
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    use crate::value::AttrValue;

    pub fn serialize<S: Serializer>(
        attrs: &[(String, AttrValue)],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(attrs.len()))?;
        for (key, value) in attrs {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<(String, AttrValue)>, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = Vec<(String, AttrValue)>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of attribute names to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut attrs = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, AttrValue>()? {
                    attrs.push((key, value));
                }
                Ok(attrs)
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MemoryDataset {
        MemoryDataset::new()
            .with_dimension("time", 2)
            .with_variable(
                Variable::new("tas", DataType::Float)
                    .with_dimensions(&["time"])
                    .with_attribute("units", "K")
                    .with_attribute("_FillValue", 1e20)
                    .with_data(ArrayData::Float(vec![280.5, 281.0])),
            )
            .with_global_attribute("title", "sample")
    }

    #[test]
    fn test_lookup_misses_use_dedicated_variants() {
        let ds = sample();
        assert!(matches!(
            ds.variable_attribute("tas", "missing"),
            Err(NcError::AttributeNotFound { .. })
        ));
        assert!(matches!(
            ds.variable_attribute("nope", "units"),
            Err(NcError::VariableNotFound(_))
        ));
        assert!(matches!(
            ds.global_attribute("units"),
            Err(NcError::AttributeNotFound { .. })
        ));
        assert!(matches!(
            ds.dimension_len("lat"),
            Err(NcError::DimensionNotFound(_))
        ));
    }

    #[test]
    fn test_variable_number_rejects_text() {
        let ds = sample();
        let err = ds.variable_number("tas", "units").unwrap_err();
        assert!(matches!(err, NcError::TypeMismatch { .. }));
        assert!(!err.is_lookup_miss());
        assert_eq!(ds.variable_number("tas", "_FillValue").unwrap(), Number::Float(1e20));
    }

    #[test]
    fn test_attribute_replacement_keeps_position() {
        let var = Variable::new("v", DataType::Int)
            .with_attribute("a", 1)
            .with_attribute("b", 2)
            .with_attribute("a", 3);
        let names: Vec<_> = var.attributes.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(var.attribute("a"), Some(&AttrValue::Int(3)));
    }

    #[test]
    fn test_output_container_rejects_duplicates() {
        let mut ds = sample();
        let err = ds.create_variable("tas", DataType::Int, &[]).unwrap_err();
        assert!(matches!(err, NcError::VariableExists(_)));

        ds.create_variable("crs", DataType::Char, &[]).unwrap();
        ds.put_variable_attribute("crs", "grid_mapping_name", "rotated_latitude_longitude".into())
            .unwrap();
        assert_eq!(
            ds.variable_attribute("crs", "grid_mapping_name").unwrap(),
            AttrValue::Text("rotated_latitude_longitude".into())
        );
        assert!(ds
            .put_variable_attribute("absent", "x", AttrValue::Int(1))
            .is_err());
    }
}

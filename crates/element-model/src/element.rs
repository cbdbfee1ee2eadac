//! Matched dataset elements.
//!
//! Each kind differs only in where its candidate names come from and what
//! it reads once a name is matched. An element is either fully built or its
//! constructor fails; there is no half-matched state.

use std::collections::BTreeMap;

use nc_dataset::{ArrayData, AttrValue, DataType, Dataset};
use tracing::trace;

use crate::error::ElementResult;
use crate::matcher::{ElementDef, VariableDef};

/// A dataset variable playing a known role (time, level, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct VariableElement {
    canonical_name: String,
    name: String,
    dtype: DataType,
    value: ArrayData,
    attributes: BTreeMap<String, AttributeElement>,
}

impl VariableElement {
    /// Match against the dataset's variable names, then read the type, the
    /// owned attributes and the formatted payload.
    pub fn new(ds: &dyn Dataset, def: &VariableDef) -> ElementResult<Self> {
        let name = def.element.resolve(ds.variable_names())?;
        trace!(element = def.element.canonical_name(), matched = %name, "Matched variable");

        let dtype = ds.variable_dtype(&name)?;

        let mut attributes = BTreeMap::new();
        for attr_def in &def.attributes {
            let attr = AttributeElement::from_owner_name(ds, &name, attr_def)?;
            attributes.insert(attr_def.canonical_name().to_string(), attr);
        }

        let value = (def.format)(ds.variable_values(&name)?);

        Ok(Self {
            canonical_name: def.element.canonical_name().to_string(),
            name,
            dtype,
            value,
            attributes,
        })
    }

    /// The variable's name as spelled in the dataset.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    pub fn value(&self) -> &ArrayData {
        &self.value
    }

    /// Owned attribute element by its canonical name.
    pub fn attribute(&self, canonical_name: &str) -> Option<&AttributeElement> {
        self.attributes.get(canonical_name)
    }

    pub fn attribute_value(&self, canonical_name: &str) -> Option<&AttrValue> {
        self.attribute(canonical_name).map(AttributeElement::value)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &AttributeElement> {
        self.attributes.values()
    }
}

/// A dataset dimension playing a known role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionElement {
    canonical_name: String,
    name: String,
    len: usize,
}

impl DimensionElement {
    pub fn new(ds: &dyn Dataset, def: &ElementDef) -> ElementResult<Self> {
        let name = def.resolve(ds.dimension_names())?;
        let len = ds.dimension_len(&name)?;
        Ok(Self {
            canonical_name: def.canonical_name().to_string(),
            name,
            len,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// An attribute of a matched variable.
///
/// Candidates are the owning variable's attributes only; a global attribute
/// with the same name never satisfies the match.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeElement {
    canonical_name: String,
    name: String,
    owner: String,
    value: AttrValue,
}

impl AttributeElement {
    pub fn new(ds: &dyn Dataset, owner: &VariableElement, def: &ElementDef) -> ElementResult<Self> {
        Self::from_owner_name(ds, owner.name(), def)
    }

    fn from_owner_name(ds: &dyn Dataset, owner: &str, def: &ElementDef) -> ElementResult<Self> {
        let name = def.resolve(ds.variable_attribute_names(owner)?)?;
        let value = ds.variable_attribute(owner, &name)?;
        Ok(Self {
            canonical_name: def.canonical_name().to_string(),
            name,
            owner: owner.to_string(),
            value,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    /// Dataset name of the variable carrying this attribute.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn value(&self) -> &AttrValue {
        &self.value
    }
}

/// A global (dataset-level) attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetAttributeElement {
    canonical_name: String,
    name: String,
    value: AttrValue,
}

impl DatasetAttributeElement {
    pub fn new(ds: &dyn Dataset, def: &ElementDef) -> ElementResult<Self> {
        let name = def.resolve(ds.global_attribute_names())?;
        let value = ds.global_attribute(&name)?;
        Ok(Self {
            canonical_name: def.canonical_name().to_string(),
            name,
            value,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    pub fn value(&self) -> &AttrValue {
        &self.value
    }
}

//! Alias-based name matching shared by every element kind.

use nc_dataset::ArrayData;

use crate::error::{ElementError, ElementResult};

/// Find the first alias, in alias order, that appears among `candidates`.
///
/// Alias priority wins over dataset order. The returned string is the
/// dataset's own spelling, which is what later lookups must use.
pub fn match_name<I, S>(aliases: &[String], candidates: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let candidates: Vec<String> = candidates.into_iter().map(Into::into).collect();
    aliases
        .iter()
        .find_map(|alias| candidates.iter().find(|c| *c == alias).cloned())
}

/// A named concept and the spellings a dataset may use for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementDef {
    canonical_name: String,
    aliases: Vec<String>,
}

impl ElementDef {
    /// Both the canonical name and the alias list must be non-empty.
    pub fn new<S: Into<String>>(
        canonical_name: impl Into<String>,
        aliases: impl IntoIterator<Item = S>,
    ) -> ElementResult<Self> {
        let canonical_name = canonical_name.into();
        let aliases: Vec<String> = aliases.into_iter().map(Into::into).collect();

        if canonical_name.is_empty() {
            return Err(ElementError::InvalidDefinition(
                "canonical name is empty".to_string(),
            ));
        }
        if aliases.is_empty() {
            return Err(ElementError::InvalidDefinition(format!(
                "no aliases for \"{}\"",
                canonical_name
            )));
        }

        Ok(Self {
            canonical_name,
            aliases,
        })
    }

    /// Definition built from fixed tables compiled into this crate.
    pub(crate) fn from_static(canonical_name: &'static str, aliases: &'static [&'static str]) -> Self {
        debug_assert!(!canonical_name.is_empty() && !aliases.is_empty());
        Self {
            canonical_name: canonical_name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Match against candidate names, failing with the full alias list.
    pub fn resolve<I, S>(&self, candidates: I) -> ElementResult<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match_name(&self.aliases, candidates).ok_or_else(|| ElementError::NotFound {
            element: self.canonical_name.clone(),
            aliases: self.aliases.clone(),
        })
    }
}

/// Post-processing applied to a variable's payload after it is read.
pub type FormatHook = fn(ArrayData) -> ArrayData;

fn identity(value: ArrayData) -> ArrayData {
    value
}

/// A variable element definition plus the attributes it owns.
#[derive(Debug, Clone)]
pub struct VariableDef {
    pub(crate) element: ElementDef,
    pub(crate) attributes: Vec<ElementDef>,
    pub(crate) format: FormatHook,
}

impl VariableDef {
    pub fn new(element: ElementDef) -> Self {
        Self {
            element,
            attributes: Vec::new(),
            format: identity,
        }
    }

    pub fn with_attribute(mut self, attribute: ElementDef) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_format(mut self, format: FormatHook) -> Self {
        self.format = format;
        self
    }

    pub fn element(&self) -> &ElementDef {
        &self.element
    }

    pub fn attributes(&self) -> &[ElementDef] {
        &self.attributes
    }
}

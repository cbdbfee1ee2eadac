//! Explicit registry of grid-mapping conventions.

use std::sync::Arc;

use crate::convention::{
    GridMappingConvention, LambertConformalConic, ObliqueMercator, PolarStereographic,
    RotatedPole,
};

/// Ordered set of conventions tried during resolution.
#[derive(Debug, Clone)]
pub struct ConventionRegistry {
    conventions: Vec<Arc<dyn GridMappingConvention>>,
}

impl ConventionRegistry {
    pub fn empty() -> Self {
        Self {
            conventions: Vec::new(),
        }
    }

    /// The four dataset-derived conventions.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry
            .register(LambertConformalConic)
            .register(ObliqueMercator)
            .register(PolarStereographic)
            .register(RotatedPole);
        registry
    }

    pub fn register<C>(&mut self, convention: C) -> &mut Self
    where
        C: GridMappingConvention + 'static,
    {
        self.conventions.push(Arc::new(convention));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn GridMappingConvention>> {
        self.conventions.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.conventions.iter().map(|c| c.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.conventions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conventions.is_empty()
    }
}

impl Default for ConventionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

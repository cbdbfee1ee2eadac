//! Resolve the single spatial reference a dataset declares.

use nc_dataset::Dataset;
use tracing::{debug, info, warn};

use crate::convention::Derivation;
use crate::error::{ProjectionError, ProjectionResult};
use crate::reference::SpatialReference;
use crate::registry::ConventionRegistry;

/// Advisory attached when a dataset carries no grid-mapping metadata.
pub const WGS84_FALLBACK_ADVISORY: &str = "no projection information found, assuming WGS84";

/// A resolved reference plus any advisories raised on the way.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub reference: SpatialReference,
    pub advisories: Vec<String>,
}

/// Tries every registered convention against a dataset.
#[derive(Debug, Clone, Default)]
pub struct ProjectionResolver {
    registry: ConventionRegistry,
}

impl ProjectionResolver {
    pub fn new(registry: ConventionRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ConventionRegistry {
        &self.registry
    }

    pub fn resolve(&self, ds: &dyn Dataset) -> ProjectionResult<SpatialReference> {
        self.resolve_detailed(ds).map(|resolution| resolution.reference)
    }

    /// Exactly one matching convention gives its reference; none falls back
    /// to WGS84 with an advisory; more than one is an error.
    pub fn resolve_detailed(&self, ds: &dyn Dataset) -> ProjectionResult<Resolution> {
        let mut matches = Vec::new();
        for convention in self.registry.iter() {
            match convention.derive(ds)? {
                Derivation::Applies(derived) => {
                    debug!(
                        convention = convention.name(),
                        grid_mapping = %derived.grid_mapping,
                        "Convention applies"
                    );
                    matches.push((convention.clone(), derived));
                }
                Derivation::NotApplicable(reason) => {
                    debug!(convention = convention.name(), reason = %reason.missing, "Convention skipped");
                }
            }
        }

        if matches.len() > 1 {
            let conventions: Vec<String> = matches
                .iter()
                .map(|(convention, derived)| {
                    format!("{} ({})", convention.name(), derived.grid_mapping)
                })
                .collect();
            return Err(ProjectionError::MultipleProjectionsFound { conventions });
        }

        match matches.pop() {
            Some((convention, derived)) => {
                let reference = SpatialReference::derived(convention, derived);
                info!(
                    reference = reference.name(),
                    proj4 = reference.to_proj4(),
                    "Resolved spatial reference"
                );
                Ok(Resolution {
                    reference,
                    advisories: Vec::new(),
                })
            }
            None => {
                warn!("{}", WGS84_FALLBACK_ADVISORY);
                Ok(Resolution {
                    reference: SpatialReference::wgs84(),
                    advisories: vec![WGS84_FALLBACK_ADVISORY.to_string()],
                })
            }
        }
    }
}

/// Resolve with the builtin conventions.
pub fn resolve(ds: &dyn Dataset) -> ProjectionResult<SpatialReference> {
    ProjectionResolver::default().resolve(ds)
}

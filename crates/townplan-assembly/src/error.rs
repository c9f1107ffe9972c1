//! Assembly errors.
//!
//! Every failure during construction is fatal for the run. Errors carry
//! the name of the entity being built and its category so the top-level
//! caller can report exactly what went wrong.

use crate::policy::PolicyError;
use thiserror::Error;
use townplan_core::{Category, GeoError, ParamsError, RegistryError};
use townplan_engine::EngineError;

/// Errors raised while building entities or regions.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum AssemblyError {
    /// Index bookkeeping failed: a duplicate index was recorded, or a
    /// category ran out of indices.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A connector endpoint does not refer to a usable building.
    #[error("connector '{connector}': {side} endpoint {reason}")]
    InvalidEndpoint {
        /// Name the connector would have been registered under.
        connector: String,
        /// `"from"` or `"to"`.
        side: &'static str,
        /// What is wrong with the endpoint.
        reason: String,
    },

    /// The engine rejected (or would reject) a registration.
    #[error("engine rejected {category} '{entity}': {source}")]
    EngineRegistration {
        /// Name of the entity being registered.
        entity: String,
        /// Its category.
        category: Category,
        /// The engine's reason.
        #[source]
        source: EngineError,
    },

    /// A region's generation policy cannot produce a valid layout.
    #[error("invalid policy for region '{region}': {source}")]
    InvalidPolicy {
        /// Name of the region.
        region: String,
        /// What is wrong with the policy.
        #[source]
        source: PolicyError,
    },

    /// A building position cannot be handed to the engine.
    #[error("invalid position for '{entity}': {source}")]
    InvalidPosition {
        /// Building (or planned building) the position belongs to.
        entity: String,
        /// What is wrong with the position.
        #[source]
        source: GeoError,
    },

    /// Simulation parameters failed validation.
    #[error("invalid simulation parameters: {0}")]
    InvalidParams(#[from] ParamsError),

    /// Two children of one region share a name.
    #[error("region '{parent}' already has a child named '{child}'")]
    DuplicateChild {
        /// Name of the parent region.
        parent: String,
        /// The repeated child name.
        child: String,
    },

    /// Houses or roads were added to a neighborhood modelled as one
    /// component.
    #[error("neighborhood '{region}' is coarse and holds no individual houses")]
    CoarseNeighborhood {
        /// Name of the neighborhood.
        region: String,
    },

    /// A cross-region road refers to a site that does not exist.
    #[error("region '{region}' has no site {site}")]
    UnknownSite {
        /// Region the reference was resolved in.
        region: String,
        /// The unresolved reference, rendered.
        site: String,
    },
}

impl AssemblyError {
    pub(crate) fn engine(entity: &str, category: &Category, source: EngineError) -> Self {
        Self::EngineRegistration {
            entity: entity.to_string(),
            category: category.clone(),
            source,
        }
    }

    /// Whether this is a duplicate-index registry failure.
    pub fn is_duplicate_index(&self) -> bool {
        matches!(self, Self::Registry(RegistryError::DuplicateIndex { .. }))
    }
}

//! Townplan: buildings, roads and regions assembled for a discrete-event
//! simulation engine.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the townplan sub-crates. Most users only need `townplan` as a single
//! dependency.
//!
//! # Quick start
//!
//! ```rust
//! use townplan::prelude::*;
//!
//! let mut registry = IndexRegistry::new();
//! let mut engine = RecordingEngine::new();
//! let params = SimParams::default();
//! let mut ctx = BuildContext::new(&mut registry, &mut engine, &params).unwrap();
//!
//! // Two ring neighborhoods joined first-to-first and last-to-last.
//! let city = CitySpec::twin(
//!     "baltimore",
//!     "balt_",
//!     Bounds::new(GeoPoint::new(100.0, 200.0), Extent::new(5000.0, 5000.0)),
//!     NeighborhoodSpec::new("catonsville", "ncat_").with_policy(NeighborhoodPolicy::ring(4)),
//!     NeighborhoodSpec::new("fells_point", "nfp_").with_policy(NeighborhoodPolicy::ring(4)),
//! );
//! let region = Region::build(&mut ctx, &RegionSpec::City(city)).unwrap();
//!
//! let summary = region.summary();
//! assert_eq!(summary.building_count(), 8);
//! assert_eq!(summary.connectors, 10);
//! assert_eq!(engine.link_count(), 20);
//! assert!(engine.has_component("balt_ncat_house_0"));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `townplan-core` | Index registry, categories, ports, geography, parameters |
//! | [`engine`] | `townplan-engine` | Engine trait, recording engine, graph export |
//! | [`assembly`] | `townplan-assembly` | Buildings, roads, policies and regions |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types (`townplan-core`).
///
/// The [`types::IndexRegistry`] hands out collision-free indices per
/// [`types::Category`]; [`types::SimParams`] carries the parameters every
/// component receives.
pub use townplan_core as types;

/// Simulation engine seam (`townplan-engine`).
///
/// [`engine::SimEngine`] is what assemblies register against;
/// [`engine::RecordingEngine`] is the in-memory implementation with
/// JSON and DOT export.
pub use townplan_engine as engine;

/// Buildings, roads and regions (`townplan-assembly`).
pub use townplan_assembly as assembly;

/// Common imports for typical townplan usage.
///
/// ```rust
/// use townplan::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use townplan_core::{
        Bounds, Category, ComponentHandle, Delay, Extent, GeoPoint, IndexRegistry, LinkHandle,
        Port, SimParams,
    };

    // Engine
    pub use townplan_engine::{PortRef, RecordingEngine, SimEngine};

    // Assembly
    pub use townplan_assembly::{
        AssemblySummary, BuildContext, Building, BuildingKind, City, Connectivity, Connector,
        Country, Neighborhood, NeighborhoodPolicy, Placement, Region, RoadKind, RoadSpec, State,
    };

    // Specs
    pub use townplan_assembly::{
        CitySite, CitySpec, CountrySpec, CrossRoadSpec, Fidelity, HighwaySpec, HouseRef,
        NeighborhoodSpec, RegionSpec, SiteRef, StateSpec,
    };

    // Errors
    pub use townplan_assembly::{AssemblyError, PolicyError};
    pub use townplan_engine::EngineError;
}

//! Regional-planning assemblies for discrete-event simulation.
//!
//! This crate composes point components (buildings) and edge components
//! (roads) into a recursive tree of regions, registering everything with
//! a [`SimEngine`](townplan_engine::SimEngine) while drawing
//! collision-free names from a shared
//! [`IndexRegistry`](townplan_core::IndexRegistry).
//!
//! # Entities
//!
//! - [`Building`]: house, grocery store, capitol or a coarse
//!   neighborhood; one component.
//! - [`Connector`]: gravel or paved road; one component and two links.
//! - [`Region`]: [`Neighborhood`], [`City`], [`State`] or [`Country`].
//!
//! # Two phases
//!
//! A [`NeighborhoodPolicy`] yields a [`NeighborhoodLayout`] without
//! touching any registry or engine. Constructors then materialize
//! layouts and [`RegionSpec`]s through a [`BuildContext`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod building;
pub mod city;
pub mod connector;
pub mod context;
pub mod country;
pub mod error;
pub mod neighborhood;
pub mod policy;
pub mod region;
pub mod spec;
pub mod state;

pub use building::{Building, BuildingKind};
pub use city::City;
pub use connector::{Connector, Endpoint, RoadKind, RoadLink, RoadSpec, ROAD_TYPE_TAG};
pub use context::BuildContext;
pub use country::Country;
pub use error::AssemblyError;
pub use neighborhood::Neighborhood;
pub use policy::{
    Connectivity, NeighborhoodLayout, NeighborhoodPolicy, Placement, PolicyError, RoadEdge,
};
pub use region::{AssemblySummary, Region};
pub use spec::{
    CitySite, CitySpec, CountrySpec, CrossRoadSpec, Fidelity, HighwaySpec, HouseRef,
    NeighborhoodSpec, RegionSpec, SiteRef, StateSpec,
};
pub use state::State;

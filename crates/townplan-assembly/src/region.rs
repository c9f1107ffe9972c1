//! The closed set of region kinds and whole-tree queries.

use crate::building::Building;
use crate::city::City;
use crate::connector::Connector;
use crate::context::BuildContext;
use crate::country::Country;
use crate::error::AssemblyError;
use crate::neighborhood::Neighborhood;
use crate::spec::RegionSpec;
use crate::state::State;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use townplan_core::{Bounds, Category};

/// A built region of any kind.
///
/// A region owns its children exclusively. Roads between sub-regions
/// only reference the buildings they connect.
///
/// # Examples
///
/// ```
/// use townplan_assembly::{BuildContext, NeighborhoodPolicy, NeighborhoodSpec, Region, RegionSpec};
/// use townplan_core::{IndexRegistry, SimParams};
/// use townplan_engine::RecordingEngine;
///
/// let mut registry = IndexRegistry::new();
/// let mut engine = RecordingEngine::new();
/// let params = SimParams::default();
/// let mut ctx = BuildContext::new(&mut registry, &mut engine, &params).unwrap();
///
/// let spec = RegionSpec::Neighborhood(
///     NeighborhoodSpec::new("ncat", "ncat_").with_policy(NeighborhoodPolicy::ring(5)),
/// );
/// let region = Region::build(&mut ctx, &spec).unwrap();
/// let summary = region.summary();
/// assert_eq!(summary.building_count(), 5);
/// assert_eq!(summary.connectors, 5);
/// assert_eq!(summary.links, 10);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Region {
    /// A neighborhood.
    Neighborhood(Neighborhood),
    /// A city.
    City(City),
    /// A state.
    State(State),
    /// A country.
    Country(Country),
}

impl Region {
    /// Build the region a spec describes, with no outer prefix.
    pub fn build(ctx: &mut BuildContext<'_>, spec: &RegionSpec) -> Result<Self, AssemblyError> {
        Ok(match spec {
            RegionSpec::Neighborhood(s) => Self::Neighborhood(Neighborhood::build(ctx, s, "")?),
            RegionSpec::City(s) => Self::City(City::build(ctx, s, "")?),
            RegionSpec::State(s) => Self::State(State::build(ctx, s, "")?),
            RegionSpec::Country(s) => Self::Country(Country::build(ctx, s, "")?),
        })
    }

    /// `"neighborhood"`, `"city"`, `"state"` or `"country"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Neighborhood(_) => "neighborhood",
            Self::City(_) => "city",
            Self::State(_) => "state",
            Self::Country(_) => "country",
        }
    }

    /// Name.
    pub fn name(&self) -> &str {
        match self {
            Self::Neighborhood(r) => r.name(),
            Self::City(r) => r.name(),
            Self::State(r) => r.name(),
            Self::Country(r) => r.name(),
        }
    }

    /// Position and extent.
    pub fn bounds(&self) -> Bounds {
        match self {
            Self::Neighborhood(r) => r.bounds(),
            Self::City(r) => r.bounds(),
            Self::State(r) => r.bounds(),
            Self::Country(r) => r.bounds(),
        }
    }

    /// Every building in the tree, in construction order.
    pub fn buildings(&self) -> Vec<&Building> {
        let mut out = Vec::new();
        match self {
            Self::Neighborhood(r) => neighborhood_buildings(r, &mut out),
            Self::City(r) => city_buildings(r, &mut out),
            Self::State(r) => state_buildings(r, &mut out),
            Self::Country(r) => r.states().for_each(|s| state_buildings(s, &mut out)),
        }
        out
    }

    /// Every road in the tree, in construction order.
    pub fn connectors(&self) -> Vec<&Connector> {
        let mut out = Vec::new();
        match self {
            Self::Neighborhood(r) => out.extend(r.roads()),
            Self::City(r) => city_connectors(r, &mut out),
            Self::State(r) => state_connectors(r, &mut out),
            Self::Country(r) => r.states().for_each(|s| state_connectors(s, &mut out)),
        }
        out
    }

    /// Counts of what the tree registered.
    pub fn summary(&self) -> AssemblySummary {
        let mut buildings: IndexMap<Category, usize> = IndexMap::new();
        for b in self.buildings() {
            *buildings.entry(b.kind().category()).or_default() += 1;
        }
        let mut roads: IndexMap<Category, usize> = IndexMap::new();
        let connectors = self.connectors();
        for c in &connectors {
            *roads.entry(c.kind().category()).or_default() += 1;
        }
        AssemblySummary {
            kind: self.kind(),
            name: self.name().to_string(),
            buildings,
            roads,
            connectors: connectors.len(),
            links: 2 * connectors.len(),
        }
    }
}

fn neighborhood_buildings<'a>(n: &'a Neighborhood, out: &mut Vec<&'a Building>) {
    out.extend(n.buildings());
}

fn city_buildings<'a>(c: &'a City, out: &mut Vec<&'a Building>) {
    c.neighborhoods().for_each(|n| neighborhood_buildings(n, out));
}

fn state_buildings<'a>(s: &'a State, out: &mut Vec<&'a Building>) {
    out.extend(s.capitol());
    s.cities().for_each(|c| city_buildings(c, out));
}

fn city_connectors<'a>(c: &'a City, out: &mut Vec<&'a Connector>) {
    c.neighborhoods().for_each(|n| out.extend(n.roads()));
    out.extend(c.cross_roads());
}

fn state_connectors<'a>(s: &'a State, out: &mut Vec<&'a Connector>) {
    s.cities().for_each(|c| city_connectors(c, out));
    out.extend(s.highways());
}

/// What a built region registered, by category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AssemblySummary {
    /// Region kind.
    pub kind: &'static str,
    /// Region name.
    pub name: String,
    /// Buildings per category, in first-seen order.
    pub buildings: IndexMap<Category, usize>,
    /// Roads per category, in first-seen order.
    pub roads: IndexMap<Category, usize>,
    /// Total roads.
    pub connectors: usize,
    /// Total links: two per road.
    pub links: usize,
}

impl AssemblySummary {
    /// Total buildings across categories.
    pub fn building_count(&self) -> usize {
        self.buildings.values().sum()
    }
}

impl fmt::Display for AssemblySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} '{}'", self.kind, self.name)?;
        for (category, count) in self.buildings.iter().chain(&self.roads) {
            writeln!(f, "  {category:<18} {count}")?;
        }
        writeln!(f, "  {:<18} {}", "connectors", self.connectors)?;
        write!(f, "  {:<18} {}", "links", self.links)
    }
}

//! Declarative descriptions of regions.
//!
//! Specs are plain data (serde-friendly, usually loaded from TOML) and
//! carry no engine state. [`Region::build`](crate::Region::build) turns a
//! spec into registered entities.

use crate::connector::RoadSpec;
use crate::policy::NeighborhoodPolicy;
use serde::{Deserialize, Serialize};
use std::fmt;
use townplan_core::{Bounds, GeoPoint};

/// Any region spec, tagged by `kind`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegionSpec {
    /// A neighborhood of houses.
    Neighborhood(NeighborhoodSpec),
    /// A city of neighborhoods.
    City(CitySpec),
    /// A state of cities.
    State(StateSpec),
    /// A country of states.
    Country(CountrySpec),
}

impl RegionSpec {
    /// Name of the described region.
    pub fn name(&self) -> &str {
        match self {
            Self::Neighborhood(s) => &s.name,
            Self::City(s) => &s.name,
            Self::State(s) => &s.name,
            Self::Country(s) => &s.name,
        }
    }
}

/// How much of a neighborhood is modelled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fidelity {
    /// Individual houses joined by roads, generated from the policy.
    #[default]
    Detailed,
    /// One `neighborhood.NeighborhoodComponent` standing in for the
    /// whole neighborhood. The policy is ignored.
    Coarse,
}

/// A neighborhood generated from a policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NeighborhoodSpec {
    /// Name, unique among the parent's children.
    pub name: String,
    /// Naming prefix appended to the parent's.
    #[serde(default)]
    pub prefix: String,
    /// Position and extent.
    #[serde(default)]
    pub bounds: Bounds,
    /// How houses and roads are generated.
    #[serde(default)]
    pub policy: NeighborhoodPolicy,
    /// Whether houses are modelled individually.
    #[serde(default)]
    pub fidelity: Fidelity,
}

impl NeighborhoodSpec {
    /// A spec with default bounds and policy.
    pub fn new(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            bounds: Bounds::default(),
            policy: NeighborhoodPolicy::default(),
            fidelity: Fidelity::Detailed,
        }
    }

    /// A neighborhood modelled as a single component.
    pub fn coarse(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::new(name, prefix).with_fidelity(Fidelity::Coarse)
    }

    /// Set the bounds.
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set the policy.
    pub fn with_policy(mut self, policy: NeighborhoodPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the fidelity.
    pub fn with_fidelity(mut self, fidelity: Fidelity) -> Self {
        self.fidelity = fidelity;
        self
    }

    /// Whether a neighborhood built from this spec would have `house`.
    ///
    /// A coarse neighborhood answers to its first, last and zeroth house
    /// with its single component.
    pub fn has_house(&self, house: HouseRef) -> bool {
        let count = match self.fidelity {
            Fidelity::Detailed => self.policy.houses,
            Fidelity::Coarse => 1,
        };
        match house {
            HouseRef::First | HouseRef::Last => count > 0,
            HouseRef::Index(i) => i < count,
        }
    }
}

/// Which house of a neighborhood.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseRef {
    /// Local index 0.
    First,
    /// The highest local index.
    Last,
    /// A specific local index.
    Index(u32),
}

impl fmt::Display for HouseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("first"),
            Self::Last => f.write_str("last"),
            Self::Index(i) => write!(f, "#{i}"),
        }
    }
}

/// A house inside a named neighborhood of a city.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteRef {
    /// Neighborhood name.
    pub neighborhood: String,
    /// House within it.
    pub house: HouseRef,
}

impl SiteRef {
    /// Reference `house` in `neighborhood`.
    pub fn new(neighborhood: impl Into<String>, house: HouseRef) -> Self {
        Self {
            neighborhood: neighborhood.into(),
            house,
        }
    }
}

impl fmt::Display for SiteRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} house of '{}'", self.house, self.neighborhood)
    }
}

/// A road between houses of two neighborhoods in one city.
///
/// Binds `port_c` on the `from` house and `port_d` on the `to` house.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrossRoadSpec {
    /// Start of the road.
    pub from: SiteRef,
    /// End of the road.
    pub to: SiteRef,
    /// Road properties. Defaults to a paved road.
    #[serde(default = "RoadSpec::paved")]
    pub road: RoadSpec,
}

/// A city of neighborhoods plus explicit cross roads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CitySpec {
    /// Name, unique among the parent's children.
    pub name: String,
    /// Naming prefix appended to the parent's.
    #[serde(default)]
    pub prefix: String,
    /// Position and extent.
    #[serde(default)]
    pub bounds: Bounds,
    /// Neighborhoods, built in order.
    #[serde(default)]
    pub neighborhoods: Vec<NeighborhoodSpec>,
    /// Cross roads, built in order after every neighborhood.
    #[serde(default)]
    pub cross_roads: Vec<CrossRoadSpec>,
}

impl CitySpec {
    /// Two neighborhoods joined first-to-first and last-to-last by paved
    /// roads.
    pub fn twin(
        name: impl Into<String>,
        prefix: impl Into<String>,
        bounds: Bounds,
        a: NeighborhoodSpec,
        b: NeighborhoodSpec,
    ) -> Self {
        let cross_roads = [HouseRef::First, HouseRef::Last]
            .into_iter()
            .map(|house| CrossRoadSpec {
                from: SiteRef::new(a.name.clone(), house),
                to: SiteRef::new(b.name.clone(), house),
                road: RoadSpec::paved().with_delay(a.policy.road.delay),
            })
            .collect();
        Self {
            name: name.into(),
            prefix: prefix.into(),
            bounds,
            neighborhoods: vec![a, b],
            cross_roads,
        }
    }
}

/// A house inside a named city.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CitySite {
    /// City name.
    pub city: String,
    /// House within the city.
    pub site: SiteRef,
}

impl fmt::Display for CitySite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in city '{}'", self.site, self.city)
    }
}

/// A road between houses of two cities in one state.
///
/// Binds `port_c` on the `from` house and `port_d` on the `to` house.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HighwaySpec {
    /// Start of the highway.
    pub from: CitySite,
    /// End of the highway.
    pub to: CitySite,
    /// Road properties. Defaults to a paved road.
    #[serde(default = "RoadSpec::paved")]
    pub road: RoadSpec,
}

/// A state: an optional capitol, cities and highways between them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateSpec {
    /// Name, unique among the parent's children.
    pub name: String,
    /// Naming prefix appended to the parent's.
    #[serde(default)]
    pub prefix: String,
    /// Position and extent.
    #[serde(default)]
    pub bounds: Bounds,
    /// Explicit position of the capitol building, if any.
    #[serde(default)]
    pub capitol: Option<GeoPoint>,
    /// Cities, built in order after the capitol.
    #[serde(default)]
    pub cities: Vec<CitySpec>,
    /// Highways, built in order after every city.
    #[serde(default)]
    pub highways: Vec<HighwaySpec>,
}

/// A country: a container of states.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CountrySpec {
    /// Name.
    pub name: String,
    /// Naming prefix for everything inside.
    #[serde(default)]
    pub prefix: String,
    /// Position and extent.
    #[serde(default)]
    pub bounds: Bounds,
    /// States, built in order.
    #[serde(default)]
    pub states: Vec<StateSpec>,
}

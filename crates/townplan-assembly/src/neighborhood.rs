//! Neighborhoods: houses joined by roads according to a policy, or a
//! single stand-in component when modelled coarsely.

use crate::building::{Building, BuildingKind};
use crate::connector::{Connector, RoadSpec};
use crate::context::BuildContext;
use crate::error::AssemblyError;
use crate::policy::RoadEdge;
use crate::spec::{Fidelity, HouseRef, NeighborhoodSpec};
use townplan_core::{Bounds, GeoPoint};
use tracing::info;

/// A neighborhood and everything registered inside it.
#[derive(Clone, Debug, PartialEq)]
pub struct Neighborhood {
    name: String,
    prefix: String,
    bounds: Bounds,
    stand_in: Option<Building>,
    houses: Vec<Building>,
    roads: Vec<Connector>,
}

impl Neighborhood {
    /// Build a neighborhood from its spec.
    ///
    /// Houses are registered first, by ascending local index, then
    /// roads in layout order. A coarse spec registers only its stand-in
    /// component. `parent_prefix` is prepended to the spec's own prefix.
    pub fn build(
        ctx: &mut BuildContext<'_>,
        spec: &NeighborhoodSpec,
        parent_prefix: &str,
    ) -> Result<Self, AssemblyError> {
        let prefix = format!("{parent_prefix}{}", spec.prefix);
        if spec.fidelity == Fidelity::Coarse {
            return Self::coarse(ctx, spec.name.clone(), prefix, spec.bounds);
        }

        let layout = spec
            .policy
            .layout(&spec.bounds)
            .map_err(|source| AssemblyError::InvalidPolicy {
                region: spec.name.clone(),
                source,
            })?;

        let mut neighborhood = Self::empty(spec.name.clone(), prefix, spec.bounds);
        for position in layout.houses {
            neighborhood.add_house(ctx, position)?;
        }
        for edge in layout.roads {
            neighborhood.add_road(ctx, edge, &spec.policy.road)?;
        }

        info!(
            kind = "neighborhood",
            name = %neighborhood.name,
            houses = neighborhood.houses.len(),
            roads = neighborhood.roads.len(),
            "region built"
        );
        Ok(neighborhood)
    }

    /// A neighborhood with no houses yet. `prefix` is used as is.
    ///
    /// Populate it with [`add_house`](Self::add_house) and
    /// [`add_road`](Self::add_road).
    pub fn empty(name: impl Into<String>, prefix: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            bounds,
            stand_in: None,
            houses: Vec::new(),
            roads: Vec::new(),
        }
    }

    /// A neighborhood modelled as one `neighborhood.NeighborhoodComponent`
    /// at the origin of `bounds`. `prefix` is used as is.
    ///
    /// Every house reference that a one-house neighborhood would answer
    /// resolves to the stand-in, so cross roads attach to it directly.
    pub fn coarse(
        ctx: &mut BuildContext<'_>,
        name: impl Into<String>,
        prefix: impl Into<String>,
        bounds: Bounds,
    ) -> Result<Self, AssemblyError> {
        let mut neighborhood = Self::empty(name, prefix, bounds);
        bounds
            .validate()
            .map_err(|source| AssemblyError::InvalidPosition {
                entity: format!("bounds of '{}'", neighborhood.name),
                source,
            })?;
        let stand_in = Building::build(
            ctx,
            BuildingKind::Neighborhood,
            &neighborhood.prefix,
            bounds.position,
        )?;
        info!(
            kind = "neighborhood",
            name = %neighborhood.name,
            component = %stand_in.name(),
            "coarse region built"
        );
        neighborhood.stand_in = Some(stand_in);
        Ok(neighborhood)
    }

    /// Register one more house at `position`.
    pub fn add_house(
        &mut self,
        ctx: &mut BuildContext<'_>,
        position: GeoPoint,
    ) -> Result<&Building, AssemblyError> {
        self.ensure_detailed()?;
        let house = Building::build(ctx, BuildingKind::House, &self.prefix, position)?;
        self.houses.push(house);
        Ok(&self.houses[self.houses.len() - 1])
    }

    /// Register a road between two of this neighborhood's houses, by
    /// local index.
    pub fn add_road(
        &mut self,
        ctx: &mut BuildContext<'_>,
        edge: RoadEdge,
        road: &RoadSpec,
    ) -> Result<&Connector, AssemblyError> {
        self.ensure_detailed()?;
        let from = self.local(edge.from)?.endpoint(edge.from_port);
        let to = self.local(edge.to)?.endpoint(edge.to_port);
        let connector = Connector::build(ctx, road, &self.prefix, from, to)?;
        self.roads.push(connector);
        Ok(&self.roads[self.roads.len() - 1])
    }

    fn ensure_detailed(&self) -> Result<(), AssemblyError> {
        match self.stand_in {
            Some(_) => Err(AssemblyError::CoarseNeighborhood {
                region: self.name.clone(),
            }),
            None => Ok(()),
        }
    }

    fn local(&self, index: usize) -> Result<&Building, AssemblyError> {
        self.houses
            .get(index)
            .ok_or_else(|| AssemblyError::UnknownSite {
                region: self.name.clone(),
                site: format!("house #{index}"),
            })
    }

    /// Look up a house. A coarse neighborhood answers with its stand-in.
    pub fn house(&self, house: HouseRef) -> Option<&Building> {
        if let Some(stand_in) = &self.stand_in {
            return match house {
                HouseRef::First | HouseRef::Last | HouseRef::Index(0) => Some(stand_in),
                HouseRef::Index(_) => None,
            };
        }
        match house {
            HouseRef::First => self.houses.first(),
            HouseRef::Last => self.houses.last(),
            HouseRef::Index(i) => self.houses.get(i as usize),
        }
    }

    /// Name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Effective naming prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Position and extent.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// How much of the neighborhood is modelled.
    pub fn fidelity(&self) -> Fidelity {
        match self.stand_in {
            Some(_) => Fidelity::Coarse,
            None => Fidelity::Detailed,
        }
    }

    /// The single component of a coarse neighborhood.
    pub fn stand_in(&self) -> Option<&Building> {
        self.stand_in.as_ref()
    }

    /// Houses by local index. Empty for a coarse neighborhood.
    pub fn houses(&self) -> &[Building] {
        &self.houses
    }

    /// Every registered point component: the stand-in, then houses.
    pub fn buildings(&self) -> impl Iterator<Item = &Building> {
        self.stand_in.iter().chain(&self.houses)
    }

    /// Roads in build order.
    pub fn roads(&self) -> &[Connector] {
        &self.roads
    }
}

//! Cities: neighborhoods plus explicit roads between them.

use crate::building::Building;
use crate::connector::Connector;
use crate::context::BuildContext;
use crate::error::AssemblyError;
use crate::neighborhood::Neighborhood;
use crate::spec::{CitySpec, CrossRoadSpec, NeighborhoodSpec, SiteRef};
use indexmap::IndexMap;
use std::collections::HashSet;
use townplan_core::{Bounds, Port};
use tracing::info;

/// A city and everything registered inside it.
#[derive(Clone, Debug, PartialEq)]
pub struct City {
    name: String,
    prefix: String,
    bounds: Bounds,
    neighborhoods: IndexMap<String, Neighborhood>,
    cross_roads: Vec<Connector>,
}

impl City {
    /// Build a city from its spec.
    ///
    /// Neighborhood names and cross-road sites are checked against the
    /// spec before anything is registered. Neighborhoods are then built
    /// in order, followed by the cross roads.
    pub fn build(
        ctx: &mut BuildContext<'_>,
        spec: &CitySpec,
        parent_prefix: &str,
    ) -> Result<Self, AssemblyError> {
        check_spec(spec)?;

        let mut city = Self::empty(
            spec.name.clone(),
            format!("{parent_prefix}{}", spec.prefix),
            spec.bounds,
        );
        city.neighborhoods.reserve(spec.neighborhoods.len());
        city.cross_roads.reserve(spec.cross_roads.len());
        for child in &spec.neighborhoods {
            city.add_neighborhood(ctx, child)?;
        }
        for road in &spec.cross_roads {
            city.add_cross_road(ctx, road)?;
        }

        info!(
            kind = "city",
            name = %city.name,
            neighborhoods = city.neighborhoods.len(),
            cross_roads = city.cross_roads.len(),
            "region built"
        );
        Ok(city)
    }

    /// A city with no neighborhoods yet. `prefix` is used as is.
    pub fn empty(name: impl Into<String>, prefix: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            bounds,
            neighborhoods: IndexMap::new(),
            cross_roads: Vec::new(),
        }
    }

    /// Build one more neighborhood under this city's prefix.
    ///
    /// A repeated name is rejected before anything is registered.
    pub fn add_neighborhood(
        &mut self,
        ctx: &mut BuildContext<'_>,
        spec: &NeighborhoodSpec,
    ) -> Result<&Neighborhood, AssemblyError> {
        if self.neighborhoods.contains_key(&spec.name) {
            return Err(AssemblyError::DuplicateChild {
                parent: self.name.clone(),
                child: spec.name.clone(),
            });
        }
        let neighborhood = Neighborhood::build(ctx, spec, &self.prefix)?;
        let (index, _) = self.neighborhoods.insert_full(spec.name.clone(), neighborhood);
        Ok(&self.neighborhoods[index])
    }

    /// Register a road from `port_c` of one site to `port_d` of another.
    pub fn add_cross_road(
        &mut self,
        ctx: &mut BuildContext<'_>,
        road: &CrossRoadSpec,
    ) -> Result<&Connector, AssemblyError> {
        let from = self.resolve(&road.from)?.endpoint(Port::C);
        let to = self.resolve(&road.to)?.endpoint(Port::D);
        let connector = Connector::build(ctx, &road.road, &self.prefix, from, to)?;
        self.cross_roads.push(connector);
        Ok(&self.cross_roads[self.cross_roads.len() - 1])
    }

    /// The building a site reference points at.
    pub fn resolve(&self, site: &SiteRef) -> Result<&Building, AssemblyError> {
        self.neighborhoods
            .get(&site.neighborhood)
            .and_then(|n| n.house(site.house))
            .ok_or_else(|| AssemblyError::UnknownSite {
                region: self.name.clone(),
                site: site.to_string(),
            })
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

    /// A neighborhood by name.
    pub fn neighborhood(&self, name: &str) -> Option<&Neighborhood> {
        self.neighborhoods.get(name)
    }

    /// Neighborhoods in build order.
    pub fn neighborhoods(&self) -> impl Iterator<Item = &Neighborhood> {
        self.neighborhoods.values()
    }

    /// Cross roads in build order.
    pub fn cross_roads(&self) -> &[Connector] {
        &self.cross_roads
    }
}

/// Whether a city built from `spec` would contain `site`.
pub(crate) fn spec_has_site(spec: &CitySpec, site: &SiteRef) -> bool {
    spec.neighborhoods
        .iter()
        .find(|n| n.name == site.neighborhood)
        .is_some_and(|n| n.has_house(site.house))
}

fn check_spec(spec: &CitySpec) -> Result<(), AssemblyError> {
    let mut seen = HashSet::new();
    for child in &spec.neighborhoods {
        if !seen.insert(child.name.as_str()) {
            return Err(AssemblyError::DuplicateChild {
                parent: spec.name.clone(),
                child: child.name.clone(),
            });
        }
    }
    for road in &spec.cross_roads {
        for site in [&road.from, &road.to] {
            if !spec_has_site(spec, site) {
                return Err(AssemblyError::UnknownSite {
                    region: spec.name.clone(),
                    site: site.to_string(),
                });
            }
        }
    }
    Ok(())
}

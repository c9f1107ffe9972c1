//! States: an optional capitol, cities and highways.

use crate::building::{Building, BuildingKind};
use crate::city::{spec_has_site, City};
use crate::connector::Connector;
use crate::context::BuildContext;
use crate::error::AssemblyError;
use crate::spec::{CitySite, CitySpec, HighwaySpec, StateSpec};
use indexmap::IndexMap;
use std::collections::HashSet;
use townplan_core::{Bounds, Category, GeoPoint, Port};
use tracing::info;

/// A state and everything registered inside it.
#[derive(Clone, Debug, PartialEq)]
pub struct State {
    name: String,
    prefix: String,
    bounds: Bounds,
    capitol: Option<Building>,
    cities: IndexMap<String, City>,
    highways: Vec<Connector>,
}

impl State {
    /// Build a state from its spec.
    ///
    /// The capitol (if the spec places one) is registered first, then
    /// the cities in order, then the highways. Capitol placement is
    /// never inferred.
    pub fn build(
        ctx: &mut BuildContext<'_>,
        spec: &StateSpec,
        parent_prefix: &str,
    ) -> Result<Self, AssemblyError> {
        check_spec(spec)?;

        let mut state = Self::empty(
            spec.name.clone(),
            format!("{parent_prefix}{}", spec.prefix),
            spec.bounds,
        );
        if let Some(position) = spec.capitol {
            state.add_capitol(ctx, position)?;
        }
        state.cities.reserve(spec.cities.len());
        state.highways.reserve(spec.highways.len());
        for child in &spec.cities {
            state.add_city(ctx, child)?;
        }
        for highway in &spec.highways {
            state.add_highway(ctx, highway)?;
        }

        info!(
            kind = "state",
            name = %state.name,
            capitol = state.capitol.is_some(),
            cities = state.cities.len(),
            highways = state.highways.len(),
            "region built"
        );
        Ok(state)
    }

    /// A state with no capitol or cities yet. `prefix` is used as is.
    pub fn empty(name: impl Into<String>, prefix: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            bounds,
            capitol: None,
            cities: IndexMap::new(),
            highways: Vec::new(),
        }
    }

    /// Place the capitol building. A state has at most one.
    pub fn add_capitol(
        &mut self,
        ctx: &mut BuildContext<'_>,
        position: GeoPoint,
    ) -> Result<&Building, AssemblyError> {
        if self.capitol.is_some() {
            return Err(AssemblyError::DuplicateChild {
                parent: self.name.clone(),
                child: Category::CAPITOL_BUILDING.to_string(),
            });
        }
        let capitol = Building::build(ctx, BuildingKind::CapitolBuilding, &self.prefix, position)?;
        Ok(&*self.capitol.insert(capitol))
    }

    /// Build one more city under this state's prefix.
    ///
    /// The city spec is checked in full, and a repeated name rejected,
    /// before anything is registered.
    pub fn add_city(
        &mut self,
        ctx: &mut BuildContext<'_>,
        spec: &CitySpec,
    ) -> Result<&City, AssemblyError> {
        if self.cities.contains_key(&spec.name) {
            return Err(AssemblyError::DuplicateChild {
                parent: self.name.clone(),
                child: spec.name.clone(),
            });
        }
        let city = City::build(ctx, spec, &self.prefix)?;
        let (index, _) = self.cities.insert_full(spec.name.clone(), city);
        Ok(&self.cities[index])
    }

    /// Register a highway from `port_c` of one city site to `port_d` of
    /// another.
    pub fn add_highway(
        &mut self,
        ctx: &mut BuildContext<'_>,
        highway: &HighwaySpec,
    ) -> Result<&Connector, AssemblyError> {
        let from = self.resolve(&highway.from)?.endpoint(Port::C);
        let to = self.resolve(&highway.to)?.endpoint(Port::D);
        let connector = Connector::build(ctx, &highway.road, &self.prefix, from, to)?;
        self.highways.push(connector);
        Ok(&self.highways[self.highways.len() - 1])
    }

    /// The building a city site points at.
    pub fn resolve(&self, site: &CitySite) -> Result<&Building, AssemblyError> {
        let city = self
            .cities
            .get(&site.city)
            .ok_or_else(|| AssemblyError::UnknownSite {
                region: self.name.clone(),
                site: site.to_string(),
            })?;
        city.resolve(&site.site)
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

    /// The capitol building, if one was placed.
    pub fn capitol(&self) -> Option<&Building> {
        self.capitol.as_ref()
    }

    /// A city by name.
    pub fn city(&self, name: &str) -> Option<&City> {
        self.cities.get(name)
    }

    /// Cities in build order.
    pub fn cities(&self) -> impl Iterator<Item = &City> {
        self.cities.values()
    }

    /// Highways in build order.
    pub fn highways(&self) -> &[Connector] {
        &self.highways
    }
}

fn check_spec(spec: &StateSpec) -> Result<(), AssemblyError> {
    if let Some(position) = spec.capitol {
        position
            .validate()
            .map_err(|source| AssemblyError::InvalidPosition {
                entity: format!("capitol of '{}'", spec.name),
                source,
            })?;
    }
    let mut seen = HashSet::new();
    for child in &spec.cities {
        if !seen.insert(child.name.as_str()) {
            return Err(AssemblyError::DuplicateChild {
                parent: spec.name.clone(),
                child: child.name.clone(),
            });
        }
    }
    for highway in &spec.highways {
        for site in [&highway.from, &highway.to] {
            let known = spec
                .cities
                .iter()
                .find(|c| c.name == site.city)
                .is_some_and(|c| spec_has_site(c, &site.site));
            if !known {
                return Err(AssemblyError::UnknownSite {
                    region: spec.name.clone(),
                    site: site.to_string(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::RoadSpec;
    use crate::spec::{HouseRef, NeighborhoodSpec, SiteRef};
    use townplan_core::{GeoError, IndexRegistry, SimParams};
    use townplan_engine::RecordingEngine;

    fn city(name: &str) -> CitySpec {
        CitySpec {
            name: name.into(),
            prefix: format!("{name}_"),
            bounds: Bounds::default(),
            neighborhoods: vec![NeighborhoodSpec::new("center", "c_")],
            cross_roads: Vec::new(),
        }
    }

    fn site(city: &str) -> CitySite {
        CitySite {
            city: city.into(),
            site: SiteRef::new("center", HouseRef::First),
        }
    }

    fn maryland() -> StateSpec {
        StateSpec {
            name: "maryland".into(),
            prefix: "md_".into(),
            bounds: Bounds::default(),
            capitol: Some(GeoPoint::new(38.97, -76.49)),
            cities: vec![city("balt"), city("annapolis")],
            highways: vec![HighwaySpec {
                from: site("balt"),
                to: site("annapolis"),
                road: RoadSpec::paved(),
            }],
        }
    }

    #[test]
    fn capitol_then_cities_then_highways() {
        let mut registry = IndexRegistry::new();
        let mut engine = RecordingEngine::new();
        let params = SimParams::default();
        let mut ctx = BuildContext::new(&mut registry, &mut engine, &params).unwrap();

        let state = State::build(&mut ctx, &maryland(), "").unwrap();
        let capitol = state.capitol().unwrap();
        assert_eq!(capitol.name(), "md_Capitol building_0");
        assert_eq!(capitol.position(), GeoPoint::new(38.97, -76.49));

        let highway = &state.highways()[0];
        assert_eq!(highway.name(), "md_paved road_0");
        assert_eq!(highway.from().name, "md_balt_c_house_0");
        assert_eq!(highway.to().name, "md_annapolis_c_house_4");

        let first = engine.component_names().next().unwrap();
        assert_eq!(first, "md_Capitol building_0");
        assert_eq!(registry.count(&Category::CAPITOL_BUILDING), 1);
        assert_eq!(engine.link_count(), 2 * (4 + 4 + 1));
    }

    #[test]
    fn state_without_capitol() {
        let mut spec = maryland();
        spec.capitol = None;
        let mut registry = IndexRegistry::new();
        let mut engine = RecordingEngine::new();
        let params = SimParams::default();
        let mut ctx = BuildContext::new(&mut registry, &mut engine, &params).unwrap();

        let state = State::build(&mut ctx, &spec, "").unwrap();
        assert!(state.capitol().is_none());
        assert_eq!(registry.count(&Category::CAPITOL_BUILDING), 0);
    }

    #[test]
    fn non_finite_capitol_rejected_up_front() {
        let mut spec = maryland();
        spec.capitol = Some(GeoPoint::new(38.97, f64::INFINITY));
        let mut registry = IndexRegistry::new();
        let mut engine = RecordingEngine::new();
        let params = SimParams::default();
        let mut ctx = BuildContext::new(&mut registry, &mut engine, &params).unwrap();

        match State::build(&mut ctx, &spec, "") {
            Err(AssemblyError::InvalidPosition { entity, source }) => {
                assert_eq!(entity, "capitol of 'maryland'");
                assert!(matches!(source, GeoError::NonFinite { what: "long", .. }));
            }
            other => panic!("expected InvalidPosition, got {other:?}"),
        }
        assert_eq!(engine.component_count(), 0);
        assert_eq!(registry.total(), 0);
    }

    #[test]
    fn highway_to_unknown_city_rejected_up_front() {
        let mut spec = maryland();
        spec.highways[0].to = site("frederick");
        let mut registry = IndexRegistry::new();
        let mut engine = RecordingEngine::new();
        let params = SimParams::default();
        let mut ctx = BuildContext::new(&mut registry, &mut engine, &params).unwrap();

        assert!(matches!(
            State::build(&mut ctx, &spec, ""),
            Err(AssemblyError::UnknownSite { .. })
        ));
        assert_eq!(engine.component_count(), 0);
    }

    #[test]
    fn duplicate_city_rejected() {
        let mut spec = maryland();
        spec.cities.push(city("balt"));
        let mut registry = IndexRegistry::new();
        let mut engine = RecordingEngine::new();
        let params = SimParams::default();
        let mut ctx = BuildContext::new(&mut registry, &mut engine, &params).unwrap();

        assert!(matches!(
            State::build(&mut ctx, &spec, ""),
            Err(AssemblyError::DuplicateChild { ref child, .. }) if child == "balt"
        ));
    }

    #[test]
    fn incremental_state() {
        let mut registry = IndexRegistry::new();
        let mut engine = RecordingEngine::new();
        let params = SimParams::default();
        let mut ctx = BuildContext::new(&mut registry, &mut engine, &params).unwrap();

        let mut state = State::empty("delaware", "de_", Bounds::default());
        state.add_city(&mut ctx, &city("dover")).unwrap();
        let capitol = state.add_capitol(&mut ctx, GeoPoint::new(39.16, -75.52)).unwrap();
        assert_eq!(capitol.name(), "de_Capitol building_0");
        assert!(matches!(
            state.add_capitol(&mut ctx, GeoPoint::default()),
            Err(AssemblyError::DuplicateChild { ref child, .. }) if child == "Capitol building"
        ));
        assert!(matches!(
            state.add_city(&mut ctx, &city("dover")),
            Err(AssemblyError::DuplicateChild { ref child, .. }) if child == "dover"
        ));
        state.add_city(&mut ctx, &city("wilmington")).unwrap();
        state
            .add_highway(
                &mut ctx,
                &HighwaySpec {
                    from: site("dover"),
                    to: site("wilmington"),
                    road: RoadSpec::paved(),
                },
            )
            .unwrap();

        assert_eq!(state.highways()[0].to().name, "de_wilmington_c_house_4");
        let cities: Vec<_> = state.cities().map(City::name).collect();
        assert_eq!(cities, ["dover", "wilmington"]);
        assert_eq!(registry.count(&Category::CAPITOL_BUILDING), 1);
    }
}

//! Canned region specs.
//!
//! - [`ring`] / [`line`]: a single neighborhood.
//! - [`twin_city`]: two neighborhoods joined first-to-first and
//!   last-to-last, at the coordinates of the Baltimore example.
//! - [`mixed_fidelity_city`]: two detailed and two coarse neighborhoods
//!   joined in a ring.
//! - [`state`] / [`country`]: the twin city nested further.

use townplan_assembly::{
    CitySite, CitySpec, CountrySpec, CrossRoadSpec, HighwaySpec, HouseRef, NeighborhoodPolicy,
    NeighborhoodSpec, RegionSpec, RoadSpec, SiteRef, StateSpec,
};
use townplan_core::{Bounds, Extent, GeoPoint};

/// A ring neighborhood of `houses` houses.
pub fn ring(name: &str, prefix: &str, houses: u32) -> RegionSpec {
    RegionSpec::Neighborhood(
        NeighborhoodSpec::new(name, prefix).with_policy(NeighborhoodPolicy::ring(houses)),
    )
}

/// A line neighborhood of `houses` houses.
pub fn line(name: &str, prefix: &str, houses: u32) -> RegionSpec {
    RegionSpec::Neighborhood(
        NeighborhoodSpec::new(name, prefix).with_policy(NeighborhoodPolicy::line(houses)),
    )
}

/// Two ring neighborhoods of `m` and `n` houses plus two paved cross
/// roads.
pub fn twin_city(m: u32, n: u32) -> CitySpec {
    CitySpec::twin(
        "baltimore",
        "balt_",
        Bounds::new(GeoPoint::new(100.0, 200.0), Extent::new(5000.0, 5000.0)),
        NeighborhoodSpec::new("catonsville", "ncat_")
            .with_bounds(Bounds::new(GeoPoint::new(111.0, 222.0), Extent::new(42.0, 2.0)))
            .with_policy(NeighborhoodPolicy::ring(m)),
        NeighborhoodSpec::new("fells_point", "nfp_")
            .with_bounds(Bounds::new(
                GeoPoint::new(333.0, 444.0),
                Extent::new(2412.0, 2311.0),
            ))
            .with_policy(NeighborhoodPolicy::ring(n)),
    )
}

/// Neighborhoods `n0` and `n1` with three houses each, `n2` and `n3`
/// as single components, and one road from each to the next, closing
/// back on `n0`.
pub fn mixed_fidelity_city() -> CitySpec {
    let bounds = Bounds::new(GeoPoint::new(252.0, 53522.0), Extent::new(242.0, 23.0));
    let neighborhoods = vec![
        NeighborhoodSpec::new("n0", "n0_")
            .with_bounds(bounds)
            .with_policy(NeighborhoodPolicy::ring(3)),
        NeighborhoodSpec::new("n1", "n1_")
            .with_bounds(bounds)
            .with_policy(NeighborhoodPolicy::ring(3)),
        NeighborhoodSpec::coarse("n2", ""),
        NeighborhoodSpec::coarse("n3", ""),
    ];
    let cross_roads = (0..neighborhoods.len())
        .map(|i| CrossRoadSpec {
            from: SiteRef::new(neighborhoods[i].name.clone(), HouseRef::First),
            to: SiteRef::new(
                neighborhoods[(i + 1) % neighborhoods.len()].name.clone(),
                HouseRef::First,
            ),
            road: RoadSpec::default(),
        })
        .collect();
    CitySpec {
        name: "mixed".into(),
        prefix: String::new(),
        bounds: Bounds::default(),
        neighborhoods,
        cross_roads,
    }
}

/// A state with a capitol and two twin cities joined by a highway.
pub fn state() -> StateSpec {
    let mut annapolis = twin_city(3, 3);
    annapolis.name = "annapolis".into();
    annapolis.prefix = "anna_".into();
    StateSpec {
        name: "maryland".into(),
        prefix: "md_".into(),
        bounds: Bounds::default(),
        capitol: Some(GeoPoint::new(38.97, -76.49)),
        cities: vec![twin_city(4, 4), annapolis],
        highways: vec![HighwaySpec {
            from: CitySite {
                city: "baltimore".into(),
                site: SiteRef::new("catonsville", HouseRef::Index(1)),
            },
            to: CitySite {
                city: "annapolis".into(),
                site: SiteRef::new("fells_point", HouseRef::Index(1)),
            },
            road: RoadSpec::paved(),
        }],
    }
}

/// A country of two copies of [`state`].
pub fn country() -> RegionSpec {
    let mut virginia = state();
    virginia.name = "virginia".into();
    virginia.prefix = "va_".into();
    RegionSpec::Country(CountrySpec {
        name: "usa".into(),
        prefix: String::new(),
        bounds: Bounds::default(),
        states: vec![state(), virginia],
    })
}

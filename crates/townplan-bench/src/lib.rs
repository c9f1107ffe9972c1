//! Benchmark profiles for townplan assembly.
//!
//! - [`neighborhood_profile`]: one ring neighborhood of `houses` houses
//! - [`state_profile`]: `cities` twin cities joined in a chain of highways
//! - [`build`]: assemble any spec against a fresh recording engine

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::num::NonZeroU32;
use townplan_assembly::{
    AssemblyError, BuildContext, CitySite, CitySpec, HighwaySpec, HouseRef, NeighborhoodPolicy,
    NeighborhoodSpec, Placement, Region, RegionSpec, RoadSpec, SiteRef, StateSpec,
};
use townplan_core::{Bounds, Extent, GeoPoint, IndexRegistry, SimParams};
use townplan_engine::RecordingEngine;

/// A ring neighborhood of `houses` houses, placed on a square-ish grid.
pub fn neighborhood_profile(houses: u32) -> RegionSpec {
    let columns =
        NonZeroU32::new(f64::from(houses).sqrt().ceil() as u32).unwrap_or(NonZeroU32::MIN);
    let policy = NeighborhoodPolicy::ring(houses).with_placement(Placement::Grid {
        columns,
        spacing: 0.01,
    });
    RegionSpec::Neighborhood(
        NeighborhoodSpec::new("bench", "bench_")
            .with_bounds(Bounds::new(GeoPoint::new(39.0, -76.0), Extent::new(1.0, 1.0)))
            .with_policy(policy),
    )
}

/// `cities` twin cities of `houses` houses per neighborhood, each joined
/// to the next by a highway between their first houses.
pub fn state_profile(cities: u32, houses: u32) -> RegionSpec {
    let cities: Vec<CitySpec> = (0..cities)
        .map(|i| {
            let origin = GeoPoint::new(38.0 + f64::from(i) * 0.1, -77.0);
            CitySpec::twin(
                format!("city{i}"),
                format!("c{i}_"),
                Bounds::new(origin, Extent::new(0.1, 0.1)),
                NeighborhoodSpec::new("west", "w_")
                    .with_bounds(Bounds::new(origin, Extent::new(0.05, 0.05)))
                    .with_policy(NeighborhoodPolicy::ring(houses)),
                NeighborhoodSpec::new("east", "e_")
                    .with_bounds(Bounds::new(origin.offset(0.0, 0.05), Extent::new(0.05, 0.05)))
                    .with_policy(NeighborhoodPolicy::ring(houses)),
            )
        })
        .collect();
    let highways = cities
        .windows(2)
        .map(|pair| HighwaySpec {
            from: CitySite {
                city: pair[0].name.clone(),
                site: SiteRef::new("east", HouseRef::Index(1)),
            },
            to: CitySite {
                city: pair[1].name.clone(),
                site: SiteRef::new("west", HouseRef::Index(1)),
            },
            road: RoadSpec::paved(),
        })
        .collect();
    RegionSpec::State(StateSpec {
        name: "bench".into(),
        prefix: "st_".into(),
        bounds: Bounds::default(),
        capitol: Some(GeoPoint::new(38.97, -76.49)),
        cities,
        highways,
    })
}

/// Build `spec` against a fresh registry and recording engine.
pub fn build(spec: &RegionSpec) -> Result<(Region, RecordingEngine), AssemblyError> {
    let mut registry = IndexRegistry::new();
    let mut engine = RecordingEngine::new();
    let params = SimParams::default();
    let region = {
        let mut ctx = BuildContext::new(&mut registry, &mut engine, &params)?;
        Region::build(&mut ctx, spec)?
    };
    Ok((region, engine))
}

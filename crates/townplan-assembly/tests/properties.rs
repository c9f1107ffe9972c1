//! End-to-end assembly properties against the recording engine.

use proptest::prelude::*;
use std::collections::HashSet;
use townplan_assembly::{
    AssemblyError, Building, BuildingKind, Connector, Endpoint, Region, RegionSpec, RoadSpec,
};
use townplan_core::{Category, ComponentHandle, GeoPoint, Port, RegistryError};
use townplan_engine::{EngineError, SimEngine};
use townplan_test_utils::{fixtures, FaultyEngine, Harness};

#[test]
fn ring_neighborhood_has_n_buildings_and_n_roads() {
    for n in [2, 3, 4, 9] {
        let mut h = Harness::new();
        let region = h.build(&fixtures::ring("n", "n_", n)).unwrap();

        let buildings = region.buildings();
        let roads = region.connectors();
        assert_eq!(buildings.len(), n as usize);
        assert_eq!(roads.len(), n as usize);

        let handles: HashSet<ComponentHandle> = buildings.iter().map(|b| b.handle()).collect();
        for road in roads {
            assert_ne!(road.from().building, road.to().building);
            assert!(handles.contains(&road.from().building));
            assert!(handles.contains(&road.to().building));
        }
    }
}

#[test]
fn same_inputs_same_names() {
    let spec = RegionSpec::City(fixtures::twin_city(4, 5));
    let mut first = Harness::new();
    let mut second = Harness::new();
    let a = first.build(&spec).unwrap();
    let b = second.build(&spec).unwrap();

    assert_eq!(first.component_names(), second.component_names());
    assert_eq!(first.link_names(), second.link_names());
    assert_eq!(a.summary(), b.summary());
    assert_eq!(first.engine.fingerprint(), second.engine.fingerprint());
    assert_eq!(first.registry, second.registry);
}

#[test]
fn different_inputs_different_fingerprint() {
    let mut a = Harness::new();
    let mut b = Harness::new();
    a.build(&fixtures::ring("n", "n_", 4)).unwrap();
    b.build(&fixtures::line("n", "n_", 4)).unwrap();
    assert_ne!(a.engine.fingerprint(), b.engine.fingerprint());
}

#[test]
fn unregistered_endpoint_fails_without_engine_calls() {
    let mut h = Harness::new();
    let mut ctx = h.ctx();
    let house =
        Building::build(&mut ctx, BuildingKind::House, "", GeoPoint::new(0.0, 0.0)).unwrap();
    let ghost = Endpoint {
        building: ComponentHandle(77),
        name: "house_77".into(),
        position: GeoPoint::new(1.0, 1.0),
        port: Port::A,
    };
    let before = ctx.registry().clone();

    let err = Connector::build(
        &mut ctx,
        &RoadSpec::default(),
        "",
        ghost,
        house.endpoint(Port::B),
    )
    .unwrap_err();
    assert!(matches!(err, AssemblyError::InvalidEndpoint { side: "from", .. }));
    assert_eq!(ctx.registry(), &before);
    assert_eq!(h.engine.component_count(), 1);
    assert_eq!(h.engine.link_count(), 0);
}

#[test]
fn twin_city_counts_match_formula() {
    for (m, n) in [(2, 2), (4, 4), (3, 7)] {
        let mut h = Harness::new();
        let region = h.build(&RegionSpec::City(fixtures::twin_city(m, n))).unwrap();
        let summary = region.summary();

        assert_eq!(summary.building_count(), (m + n) as usize);
        assert_eq!(summary.connectors, (m + n + 2) as usize);
        assert_eq!(summary.links, 2 * summary.connectors);
        assert_eq!(h.engine.link_count(), summary.links);
        assert_eq!(h.engine.dangling_link_count(), 0);
    }
}

#[test]
fn name_collision_leaves_category_unchanged() {
    let mut h = Harness::new();
    h.engine
        .register_component("n_house_0", "house.HouseComponent")
        .unwrap();

    let err = h.build(&fixtures::ring("n", "n_", 3)).unwrap_err();
    match err {
        AssemblyError::EngineRegistration {
            entity,
            category,
            source: EngineError::ComponentNameTaken { .. },
        } => {
            assert_eq!(entity, "n_house_0");
            assert_eq!(category, Category::HOUSE);
        }
        other => panic!("expected EngineRegistration, got {other:?}"),
    }
    assert_eq!(h.registry.count(&Category::HOUSE), 0);
    assert_eq!(h.registry.next_index(&Category::HOUSE).unwrap(), 0);
}

#[test]
fn engine_rejection_mid_build_propagates_and_keeps_index_unused() {
    // Call 0 registers house_0, call 1 sets its params, call 2 is house_1.
    let mut h = Harness::with_engine(FaultyEngine::new(2));
    let err = h.build(&fixtures::ring("n", "", 3)).unwrap_err();
    match err {
        AssemblyError::EngineRegistration { entity, .. } => assert_eq!(entity, "house_1"),
        other => panic!("expected EngineRegistration, got {other:?}"),
    }
    assert_eq!(h.registry.allocated(&Category::HOUSE).collect::<Vec<_>>(), vec![0]);
    assert_eq!(h.engine.inner().component_count(), 1);
}

#[test]
fn failure_on_second_link_keeps_first_link_recorded() {
    // Two houses take 4 calls; the road takes register + params, then
    // link0 register + connect, then link1 register (call 8).
    let mut h = Harness::with_engine(FaultyEngine::new(8));
    let err = h.build(&fixtures::line("n", "", 2)).unwrap_err();
    match err {
        AssemblyError::EngineRegistration {
            entity, category, ..
        } => {
            assert_eq!(entity, "link1");
            assert_eq!(category, Category::LINK);
        }
        other => panic!("expected EngineRegistration, got {other:?}"),
    }
    assert_eq!(h.registry.allocated(&Category::LINK).collect::<Vec<_>>(), vec![0]);
    assert_eq!(h.registry.count(&Category::GRAVEL_ROAD), 1);
}

#[test]
fn registry_duplicate_surfaces_as_registry_error() {
    let err: AssemblyError = RegistryError::DuplicateIndex {
        category: Category::GROCERY_STORE,
        index: 0,
    }
    .into();
    assert!(err.is_duplicate_index());
    assert!(err.to_string().contains("grocery store"));
}

#[test]
fn country_fixture_builds_every_level() {
    let mut h = Harness::new();
    let region = h.build(&fixtures::country()).unwrap();
    let Region::Country(country) = &region else {
        panic!("expected a country");
    };
    assert_eq!(country.states().count(), 2);
    let md = country.state("maryland").unwrap();
    assert_eq!(md.capitol().unwrap().name(), "md_Capitol building_0");
    assert_eq!(md.highways().len(), 1);

    let summary = region.summary();
    // Per state: 8 + 6 houses, 8 + 6 ring roads, 2 + 2 cross roads, 1 highway.
    assert_eq!(summary.buildings[&Category::HOUSE], 28);
    assert_eq!(summary.buildings[&Category::CAPITOL_BUILDING], 2);
    assert_eq!(summary.connectors, 2 * (14 + 4 + 1));
    assert_eq!(summary.links, h.engine.link_count());

    let names: HashSet<_> = h.component_names().into_iter().collect();
    assert_eq!(names.len(), h.engine.component_count());
}

#[test]
fn mixed_fidelity_ring_closes_through_coarse_neighborhoods() {
    let mut h = Harness::new();
    let region = h.build(&RegionSpec::City(fixtures::mixed_fidelity_city())).unwrap();
    let summary = region.summary();
    assert_eq!(summary.buildings[&Category::HOUSE], 6);
    assert_eq!(summary.buildings[&Category::NEIGHBORHOOD], 2);
    // 3 + 3 ring roads inside n0 and n1, 4 cross roads around the city.
    assert_eq!(summary.connectors, 10);
    assert_eq!(h.engine.component_count(), 8 + 10);
    assert_eq!(h.engine.link_count(), 20);
    assert_eq!(h.engine.dangling_link_count(), 0);

    let Region::City(city) = &region else {
        panic!("expected a city");
    };
    let hops: Vec<_> = city
        .cross_roads()
        .iter()
        .map(|r| (r.from().name.as_str(), r.to().name.as_str()))
        .collect();
    assert_eq!(
        hops,
        [
            ("n0_house_0", "n1_house_0"),
            ("n1_house_0", "neighborhood_0"),
            ("neighborhood_0", "neighborhood_1"),
            ("neighborhood_1", "n0_house_0"),
        ]
    );
    assert!(city
        .cross_roads()
        .iter()
        .all(|r| r.from().port == Port::C && r.to().port == Port::D));

    let stand_in = city.neighborhood("n2").unwrap().stand_in().unwrap();
    assert_eq!(stand_in.kind(), BuildingKind::Neighborhood);
    let (_, record) = h.engine.component(stand_in.handle()).unwrap();
    assert_eq!(record.type_tag, "neighborhood.NeighborhoodComponent");
}

#[test]
fn engine_stays_object_safe_behind_context() {
    let mut h = Harness::new();
    let ctx = h.ctx();
    let engine: &dyn SimEngine = ctx.engine();
    assert!(!engine.has_component("house_0"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn rebuilding_on_one_registry_never_collides(
        sizes in proptest::collection::vec(2u32..12, 1..6),
    ) {
        let mut h = Harness::new();
        for (i, &n) in sizes.iter().enumerate() {
            let spec = fixtures::ring(&format!("n{i}"), "", n);
            h.build(&spec).unwrap();
        }
        let total: u32 = sizes.iter().sum();
        prop_assert_eq!(h.registry.count(&Category::HOUSE) as u32, total);
        prop_assert_eq!(h.registry.count(&Category::GRAVEL_ROAD) as u32, total);
        prop_assert_eq!(h.registry.count(&Category::LINK) as u32, 2 * total);
        prop_assert_eq!(h.engine.component_count() as u32, 2 * total);
    }
}

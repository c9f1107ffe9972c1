//! Roads: an edge component wired between two buildings by two links.

use crate::context::BuildContext;
use crate::error::AssemblyError;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU8;
use townplan_core::{Category, ComponentHandle, Delay, GeoPoint, LinkHandle, Port};
use townplan_engine::{EngineError, PortRef, SimEngine};
use tracing::debug;

/// Engine type tag of every road component.
pub const ROAD_TYPE_TAG: &str = "road.RoadComponent";

/// Road surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadKind {
    /// Gravel road.
    #[default]
    Gravel,
    /// Paved road.
    Paved,
}

impl RoadKind {
    /// Category the road's index is allocated under.
    pub fn category(self) -> Category {
        match self {
            Self::Gravel => Category::GRAVEL_ROAD,
            Self::Paved => Category::PAVED_ROAD,
        }
    }

    /// Value of the `surface` parameter.
    pub fn surface(self) -> &'static str {
        match self {
            Self::Gravel => "gravel",
            Self::Paved => "paved",
        }
    }
}

/// Physical properties of a road, independent of what it connects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoadSpec {
    /// Surface, which also selects the category.
    pub kind: RoadKind,
    /// Number of lanes.
    pub lanes: NonZeroU8,
    /// Propagation delay of both links.
    pub delay: Delay,
}

impl Default for RoadSpec {
    fn default() -> Self {
        Self::gravel()
    }
}

impl RoadSpec {
    /// Single-lane gravel road with a 1ns delay.
    pub fn gravel() -> Self {
        Self {
            kind: RoadKind::Gravel,
            lanes: NonZeroU8::MIN,
            delay: Delay::one_ns(),
        }
    }

    /// Single-lane paved road with a 1ns delay.
    pub fn paved() -> Self {
        Self {
            kind: RoadKind::Paved,
            ..Self::gravel()
        }
    }

    /// Set the lane count.
    pub fn with_lanes(mut self, lanes: NonZeroU8) -> Self {
        self.lanes = lanes;
        self
    }

    /// Set the propagation delay.
    pub fn with_delay(mut self, delay: Delay) -> Self {
        self.delay = delay;
        self
    }
}

/// One end of a road: a registered building and the port to bind.
#[derive(Clone, Debug, PartialEq)]
pub struct Endpoint {
    /// Engine handle of the building.
    pub building: ComponentHandle,
    /// Registered name of the building.
    pub name: String,
    /// Position of the building.
    pub position: GeoPoint,
    /// Port on the building the road binds.
    pub port: Port,
}

impl Endpoint {
    fn port_ref(&self) -> PortRef {
        PortRef::new(self.building, self.port)
    }
}

/// One of the two links of a road.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoadLink {
    /// `link<index>`.
    pub name: String,
    /// Index in the `link` category.
    pub index: u32,
    /// Engine handle.
    pub handle: LinkHandle,
}

/// A registered road.
///
/// Always exactly one edge component plus two links: the `from`
/// building's port to the road's `port_a`, and the road's `port_b` to the
/// `to` building's port.
#[derive(Clone, Debug, PartialEq)]
pub struct Connector {
    spec: RoadSpec,
    name: String,
    index: u32,
    handle: ComponentHandle,
    from: Endpoint,
    to: Endpoint,
    links: [RoadLink; 2],
}

impl Connector {
    /// Register a road between `from` and `to`.
    ///
    /// Everything that could make the engine reject the road (an
    /// unregistered or mismatched endpoint, a port already bound, a
    /// taken component or link name) is checked before the first engine
    /// call, so those failures leave both engine and registry untouched.
    /// Each index is recorded right after the engine accepts it.
    pub fn build(
        ctx: &mut BuildContext<'_>,
        spec: &RoadSpec,
        prefix: &str,
        from: Endpoint,
        to: Endpoint,
    ) -> Result<Self, AssemblyError> {
        let planned = ctx.plan_component(&spec.kind.category(), prefix)?;
        let run = ctx.registry().next_run(&Category::LINK, 2)?;
        let (first_link, second_link) = (*run.start(), *run.end());
        let link_names = [
            Category::LINK.component_name("", first_link),
            Category::LINK.component_name("", second_link),
        ];

        validate_endpoint(ctx.engine(), &planned.name, "from", &from, &link_names[0])?;
        validate_endpoint(ctx.engine(), &planned.name, "to", &to, &link_names[1])?;
        if from.building == to.building {
            return Err(AssemblyError::InvalidEndpoint {
                connector: planned.name,
                side: "to",
                reason: format!("is the same building as the from endpoint ('{}')", from.name),
            });
        }
        for name in &link_names {
            if ctx.engine().has_link(name) {
                return Err(AssemblyError::engine(
                    name,
                    &Category::LINK,
                    EngineError::LinkNameTaken { name: name.clone() },
                ));
            }
        }

        let length_km = from.position.distance_km(to.position);
        let mut params = ctx.params().to_param_map();
        for (key, value) in [
            ("from", from.name.clone()),
            ("from_lat", from.position.lat.to_string()),
            ("from_long", from.position.long.to_string()),
            ("from_port", from.port.to_string()),
            ("to", to.name.clone()),
            ("to_lat", to.position.lat.to_string()),
            ("to_long", to.position.long.to_string()),
            ("to_port", to.port.to_string()),
            ("surface", spec.kind.surface().to_string()),
            ("lanes", spec.lanes.to_string()),
            ("length_km", format!("{length_km:.3}")),
        ] {
            params.insert(key.to_string(), value);
        }

        let handle = ctx.commit_component(&planned, ROAD_TYPE_TAG, &params)?;
        let [first, second] = link_names;
        let inbound = wire(
            ctx,
            first,
            first_link,
            spec.delay,
            from.port_ref(),
            PortRef::new(handle, Port::A),
        )?;
        let outbound = wire(
            ctx,
            second,
            second_link,
            spec.delay,
            PortRef::new(handle, Port::B),
            to.port_ref(),
        )?;

        Ok(Self {
            spec: *spec,
            name: planned.name,
            index: planned.index,
            handle,
            from,
            to,
            links: [inbound, outbound],
        })
    }

    /// Surface kind.
    pub fn kind(&self) -> RoadKind {
        self.spec.kind
    }

    /// Physical properties the road was built with.
    pub fn spec(&self) -> &RoadSpec {
        &self.spec
    }

    /// Registered component name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index within the road's category.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Engine handle of the edge component.
    pub fn handle(&self) -> ComponentHandle {
        self.handle
    }

    /// The `from` end.
    pub fn from(&self) -> &Endpoint {
        &self.from
    }

    /// The `to` end.
    pub fn to(&self) -> &Endpoint {
        &self.to
    }

    /// The inbound (`from` to road) and outbound (road to `to`) links.
    pub fn links(&self) -> &[RoadLink; 2] {
        &self.links
    }

    /// Great-circle length between the endpoints.
    pub fn length_km(&self) -> f64 {
        self.from.position.distance_km(self.to.position)
    }
}

fn validate_endpoint(
    engine: &dyn SimEngine,
    connector: &str,
    side: &'static str,
    endpoint: &Endpoint,
    link: &str,
) -> Result<(), AssemblyError> {
    let invalid = |reason: String| AssemblyError::InvalidEndpoint {
        connector: connector.to_string(),
        side,
        reason,
    };
    match engine.component_name(endpoint.building) {
        None => {
            return Err(invalid(format!(
                "refers to unregistered {} ('{}')",
                endpoint.building, endpoint.name
            )))
        }
        Some(actual) if actual != endpoint.name => {
            return Err(invalid(format!(
                "names '{}' but {} is registered as '{actual}'",
                endpoint.name, endpoint.building
            )))
        }
        Some(_) => {}
    }
    if let Some(bound_by) = engine.port_binding(endpoint.port_ref()) {
        return Err(AssemblyError::engine(
            link,
            &Category::LINK,
            EngineError::PortAlreadyBound {
                port: endpoint.port_ref(),
                bound_by: bound_by.to_string(),
            },
        ));
    }
    Ok(())
}

fn wire(
    ctx: &mut BuildContext<'_>,
    name: String,
    index: u32,
    delay: Delay,
    a: PortRef,
    b: PortRef,
) -> Result<RoadLink, AssemblyError> {
    let handle = ctx
        .engine_mut()
        .register_link(&name, delay)
        .map_err(|e| AssemblyError::engine(&name, &Category::LINK, e))?;
    ctx.registry_mut().record(Category::LINK, index)?;
    ctx.engine_mut()
        .connect(handle, a, b)
        .map_err(|e| AssemblyError::engine(&name, &Category::LINK, e))?;
    debug!(name = %name, index, %a, %b, %delay, "link registered");
    Ok(RoadLink {
        name,
        index,
        handle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::{Building, BuildingKind};
    use townplan_core::{IndexRegistry, RegistryError, SimParams};
    use townplan_engine::RecordingEngine;

    struct Fixture {
        registry: IndexRegistry,
        engine: RecordingEngine,
        params: SimParams,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                registry: IndexRegistry::new(),
                engine: RecordingEngine::new(),
                params: SimParams::default(),
            }
        }

        fn ctx(&mut self) -> BuildContext<'_> {
            BuildContext::new(&mut self.registry, &mut self.engine, &self.params).unwrap()
        }
    }

    fn two_houses(ctx: &mut BuildContext<'_>) -> (Building, Building) {
        let a = Building::build(ctx, BuildingKind::House, "", GeoPoint::new(0.0, 0.0)).unwrap();
        let b = Building::build(ctx, BuildingKind::House, "", GeoPoint::new(0.0, 1.0)).unwrap();
        (a, b)
    }

    #[test]
    fn road_registers_one_component_and_two_links() {
        let mut fx = Fixture::new();
        let mut ctx = fx.ctx();
        let (a, b) = two_houses(&mut ctx);
        let road = Connector::build(
            &mut ctx,
            &RoadSpec::default(),
            "",
            a.endpoint(Port::A),
            b.endpoint(Port::B),
        )
        .unwrap();

        assert_eq!(road.name(), "gravel road_0");
        assert_eq!(road.links()[0].name, "link0");
        assert_eq!(road.links()[1].name, "link1");
        assert_eq!(fx.engine.component_count(), 3);
        assert_eq!(fx.engine.link_count(), 2);
        assert_eq!(fx.registry.count(&Category::LINK), 2);
        assert_eq!(fx.registry.count(&Category::GRAVEL_ROAD), 1);

        let (_, inbound) = fx.engine.link(road.links()[0].handle).unwrap();
        let (src, dst) = inbound.ends.unwrap();
        assert_eq!(src, PortRef::new(a.handle(), Port::A));
        assert_eq!(dst, PortRef::new(road.handle(), Port::A));
        let (_, outbound) = fx.engine.link(road.links()[1].handle).unwrap();
        let (src, dst) = outbound.ends.unwrap();
        assert_eq!(src, PortRef::new(road.handle(), Port::B));
        assert_eq!(dst, PortRef::new(b.handle(), Port::B));
    }

    #[test]
    fn road_params_describe_both_ends() {
        let mut fx = Fixture::new();
        let mut ctx = fx.ctx();
        let (a, b) = two_houses(&mut ctx);
        let spec = RoadSpec::paved().with_lanes(NonZeroU8::new(4).unwrap());
        let road =
            Connector::build(&mut ctx, &spec, "c_", a.endpoint(Port::C), b.endpoint(Port::D))
                .unwrap();

        let (name, record) = fx.engine.component(road.handle()).unwrap();
        assert_eq!(name, "c_paved road_0");
        assert_eq!(record.type_tag, ROAD_TYPE_TAG);
        let p = &record.params;
        assert_eq!(p["from"], "house_0");
        assert_eq!(p["from_port"], "port_c");
        assert_eq!(p["to"], "house_1");
        assert_eq!(p["to_long"], "1");
        assert_eq!(p["to_port"], "port_d");
        assert_eq!(p["surface"], "paved");
        assert_eq!(p["lanes"], "4");
        assert_eq!(p["length_km"], "111.195");
        assert_eq!(p["debug"], "2");
        assert!((road.length_km() - 111.195).abs() < 1e-3);
    }

    #[test]
    fn unregistered_endpoint_registers_nothing() {
        let mut fx = Fixture::new();
        let mut ctx = fx.ctx();
        let (a, _) = two_houses(&mut ctx);
        let ghost = Endpoint {
            building: ComponentHandle(42),
            name: "house_42".into(),
            position: GeoPoint::default(),
            port: Port::B,
        };
        let err = Connector::build(&mut ctx, &RoadSpec::default(), "", a.endpoint(Port::A), ghost)
            .unwrap_err();
        match err {
            AssemblyError::InvalidEndpoint {
                connector, side, ..
            } => {
                assert_eq!(connector, "gravel road_0");
                assert_eq!(side, "to");
            }
            other => panic!("expected InvalidEndpoint, got {other:?}"),
        }
        assert_eq!(fx.engine.component_count(), 2);
        assert_eq!(fx.engine.link_count(), 0);
        assert_eq!(fx.registry.count(&Category::LINK), 0);
        assert_eq!(fx.registry.count(&Category::GRAVEL_ROAD), 0);
    }

    #[test]
    fn mismatched_endpoint_name_rejected() {
        let mut fx = Fixture::new();
        let mut ctx = fx.ctx();
        let (a, b) = two_houses(&mut ctx);
        let mut forged = b.endpoint(Port::B);
        forged.name = "house_9".into();
        assert!(matches!(
            Connector::build(&mut ctx, &RoadSpec::default(), "", a.endpoint(Port::A), forged),
            Err(AssemblyError::InvalidEndpoint { side: "to", .. })
        ));
    }

    #[test]
    fn same_building_both_ends_rejected() {
        let mut fx = Fixture::new();
        let mut ctx = fx.ctx();
        let (a, _) = two_houses(&mut ctx);
        assert!(matches!(
            Connector::build(
                &mut ctx,
                &RoadSpec::default(),
                "",
                a.endpoint(Port::A),
                a.endpoint(Port::B)
            ),
            Err(AssemblyError::InvalidEndpoint { .. })
        ));
        assert_eq!(fx.engine.component_count(), 2);
    }

    #[test]
    fn bound_port_rejected_before_registration() {
        let mut fx = Fixture::new();
        let mut ctx = fx.ctx();
        let (a, b) = two_houses(&mut ctx);
        Connector::build(
            &mut ctx,
            &RoadSpec::default(),
            "",
            a.endpoint(Port::A),
            b.endpoint(Port::B),
        )
        .unwrap();

        let err = Connector::build(
            &mut ctx,
            &RoadSpec::paved(),
            "",
            a.endpoint(Port::A),
            b.endpoint(Port::C),
        )
        .unwrap_err();
        match err {
            AssemblyError::EngineRegistration {
                entity,
                category,
                source: EngineError::PortAlreadyBound { bound_by, .. },
            } => {
                assert_eq!(entity, "link2");
                assert_eq!(category, Category::LINK);
                assert_eq!(bound_by, "link0");
            }
            other => panic!("expected PortAlreadyBound, got {other:?}"),
        }
        assert_eq!(fx.registry.count(&Category::PAVED_ROAD), 0);
        assert_eq!(fx.engine.component_count(), 3);
    }

    #[test]
    fn taken_link_name_rejected_before_registration() {
        let mut fx = Fixture::new();
        fx.engine.register_link("link1", Delay::one_ns()).unwrap();
        let mut ctx = fx.ctx();
        let (a, b) = two_houses(&mut ctx);
        let err = Connector::build(
            &mut ctx,
            &RoadSpec::default(),
            "",
            a.endpoint(Port::A),
            b.endpoint(Port::B),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AssemblyError::EngineRegistration {
                source: EngineError::LinkNameTaken { .. },
                ..
            }
        ));
        assert_eq!(fx.registry.count(&Category::GRAVEL_ROAD), 0);
        assert_eq!(fx.engine.component_count(), 2);
    }

    #[test]
    fn last_two_link_indices_are_usable() {
        let mut fx = Fixture::new();
        fx.registry.record(Category::LINK, u32::MAX - 2).unwrap();
        let mut ctx = fx.ctx();
        let (a, b) = two_houses(&mut ctx);
        let road = Connector::build(
            &mut ctx,
            &RoadSpec::default(),
            "",
            a.endpoint(Port::A),
            b.endpoint(Port::B),
        )
        .unwrap();
        assert_eq!(road.links()[0].index, u32::MAX - 1);
        assert_eq!(road.links()[1].index, u32::MAX);
        assert_eq!(road.links()[1].name, format!("link{}", u32::MAX));

        // No room for another pair.
        let err = Connector::build(
            &mut ctx,
            &RoadSpec::default(),
            "",
            a.endpoint(Port::C),
            b.endpoint(Port::D),
        )
        .unwrap_err();
        assert_eq!(
            err,
            AssemblyError::Registry(RegistryError::Exhausted {
                category: Category::LINK,
                max: u32::MAX,
            })
        );
        assert_eq!(fx.registry.count(&Category::GRAVEL_ROAD), 1);
    }

    #[test]
    fn road_spec_from_toml() {
        let spec: RoadSpec =
            toml::from_str("kind = \"paved\"\nlanes = 2\ndelay = \"5ps\"").unwrap();
        assert_eq!(spec.kind, RoadKind::Paved);
        assert_eq!(spec.lanes.get(), 2);
        assert_eq!(spec.delay.to_string(), "5ps");

        assert_eq!(toml::from_str::<RoadSpec>("").unwrap(), RoadSpec::gravel());
        assert!(toml::from_str::<RoadSpec>("lanes = 0").is_err());
    }
}

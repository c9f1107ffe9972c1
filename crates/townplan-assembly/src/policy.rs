//! Neighborhood generation policies and the layouts they produce.
//!
//! A [`NeighborhoodPolicy`] is turned into a [`NeighborhoodLayout`] by a
//! pure function of the policy and the region's [`Bounds`]. The layout
//! says where every house goes and which house pairs get a road through
//! which ports; materializing it against an engine happens elsewhere.

use crate::connector::RoadSpec;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use thiserror::Error;
use townplan_core::{Bounds, GeoError, GeoPoint, Port};

/// Errors from validating a [`NeighborhoodPolicy`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum PolicyError {
    /// The policy asks for zero houses.
    #[error("a neighborhood needs at least one house")]
    NoHouses,
    /// A ring needs two houses; one house would be joined to itself.
    #[error("ring connectivity needs at least 2 houses, got {houses}")]
    RingTooSmall {
        /// Requested house count.
        houses: u32,
    },
    /// More houses than a single layout supports.
    #[error("{houses} houses exceeds the maximum of {max}")]
    TooManyHouses {
        /// Requested house count.
        houses: u32,
        /// The supported maximum.
        max: u32,
    },
    /// A placement distance is NaN or infinite.
    #[error("placement {what} must be finite, got {value}")]
    NonFinite {
        /// Which parameter.
        what: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// The region's bounds are not finite, or its extent is negative.
    #[error("invalid region bounds: {0}")]
    InvalidBounds(#[from] GeoError),
}

/// How houses are joined by roads.
///
/// # Examples
///
/// ```
/// use townplan_assembly::Connectivity;
///
/// assert_eq!(Connectivity::Line.road_count(4), 3);
/// assert_eq!(Connectivity::Ring.road_count(4), 4);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// Each house to its predecessor. `n - 1` roads.
    Line,
    /// A line plus one road closing the loop. `n` roads.
    #[default]
    Ring,
}

impl Connectivity {
    /// Number of roads for `houses` houses.
    pub fn road_count(self, houses: u32) -> u32 {
        match self {
            Self::Line => houses.saturating_sub(1),
            Self::Ring => houses,
        }
    }

    /// Road edges for `houses` houses, in build order.
    ///
    /// House `i` (for `i = 1..n`) gets a road from its `port_a` to the
    /// `port_b` of house `i - 1`. A ring adds a closing road from the
    /// last house's `port_b` to the first house's `port_a`. No port is
    /// used twice.
    pub fn edges(self, houses: u32) -> impl Iterator<Item = RoadEdge> {
        let n = houses as usize;
        let chain = (1..n).map(|i| RoadEdge {
            from: i,
            to: i - 1,
            from_port: Port::A,
            to_port: Port::B,
        });
        let closing = (self == Self::Ring && n >= 2).then(|| RoadEdge {
            from: n - 1,
            to: 0,
            from_port: Port::B,
            to_port: Port::A,
        });
        chain.chain(closing)
    }
}

/// Where houses are placed inside the region.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Placement {
    /// House `i` at `origin + step * (i + 1)` on both axes.
    Diagonal {
        /// Offset between consecutive houses, per axis.
        step: f64,
    },
    /// Row-major grid anchored one `spacing` inside the origin.
    Grid {
        /// Houses per row.
        columns: NonZeroU32,
        /// Distance between neighbouring houses, per axis.
        spacing: f64,
    },
    /// Uniformly random inside the region's extent, reproducible per seed.
    Scattered {
        /// RNG seed.
        seed: u64,
    },
}

impl Default for Placement {
    fn default() -> Self {
        Self::Diagonal { step: 1.0 }
    }
}

impl Placement {
    fn validate(&self) -> Result<(), PolicyError> {
        let (what, value) = match *self {
            Self::Diagonal { step } => ("step", step),
            Self::Grid { spacing, .. } => ("spacing", spacing),
            Self::Scattered { .. } => return Ok(()),
        };
        if !value.is_finite() {
            return Err(PolicyError::NonFinite { what, value });
        }
        Ok(())
    }

    fn positions(&self, bounds: &Bounds, houses: u32) -> Vec<GeoPoint> {
        let origin = bounds.position;
        match *self {
            Self::Diagonal { step } => (0..houses)
                .map(|i| {
                    let d = step * f64::from(i + 1);
                    origin.offset(d, d)
                })
                .collect(),
            Self::Grid { columns, spacing } => (0..houses)
                .map(|i| {
                    let row = f64::from(i / columns.get() + 1);
                    let col = f64::from(i % columns.get() + 1);
                    origin.offset(row * spacing, col * spacing)
                })
                .collect(),
            Self::Scattered { seed } => {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                (0..houses)
                    .map(|_| {
                        let d_lat = rng.gen::<f64>() * bounds.extent.length;
                        let d_long = rng.gen::<f64>() * bounds.extent.width;
                        origin.offset(d_lat, d_long)
                    })
                    .collect()
            }
        }
    }
}

/// How a neighborhood generates its houses and roads.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NeighborhoodPolicy {
    /// Number of houses.
    pub houses: u32,
    /// Road pattern.
    pub connectivity: Connectivity,
    /// House placement.
    pub placement: Placement,
    /// Properties of every road inside the neighborhood.
    pub road: RoadSpec,
}

impl Default for NeighborhoodPolicy {
    fn default() -> Self {
        Self {
            houses: 4,
            connectivity: Connectivity::Ring,
            placement: Placement::default(),
            road: RoadSpec::default(),
        }
    }
}

impl NeighborhoodPolicy {
    /// Largest supported house count.
    pub const MAX_HOUSES: u32 = 1 << 20;

    /// A ring of `houses` houses on the default diagonal with gravel roads.
    pub fn ring(houses: u32) -> Self {
        Self {
            houses,
            ..Self::default()
        }
    }

    /// A line of `houses` houses on the default diagonal with gravel roads.
    pub fn line(houses: u32) -> Self {
        Self {
            houses,
            connectivity: Connectivity::Line,
            ..Self::default()
        }
    }

    /// Set the placement.
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Set the road properties.
    pub fn with_road(mut self, road: RoadSpec) -> Self {
        self.road = road;
        self
    }

    /// Check that the policy can produce a layout.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.houses == 0 {
            return Err(PolicyError::NoHouses);
        }
        if self.houses > Self::MAX_HOUSES {
            return Err(PolicyError::TooManyHouses {
                houses: self.houses,
                max: Self::MAX_HOUSES,
            });
        }
        if self.connectivity == Connectivity::Ring && self.houses < 2 {
            return Err(PolicyError::RingTooSmall {
                houses: self.houses,
            });
        }
        self.placement.validate()
    }

    /// Compute the layout for a region with `bounds`.
    ///
    /// Pure: the same policy and bounds always give the same layout.
    /// Bounds must be finite with a non-negative extent, so scattered
    /// houses land inside the region.
    pub fn layout(&self, bounds: &Bounds) -> Result<NeighborhoodLayout, PolicyError> {
        self.validate()?;
        bounds.validate()?;
        Ok(NeighborhoodLayout {
            houses: self.placement.positions(bounds, self.houses),
            roads: self.connectivity.edges(self.houses).collect(),
        })
    }
}

/// A road between two houses of a layout, by local house index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RoadEdge {
    /// Local index of the `from` house.
    pub from: usize,
    /// Local index of the `to` house.
    pub to: usize,
    /// Port bound on the `from` house.
    pub from_port: Port,
    /// Port bound on the `to` house.
    pub to_port: Port,
}

/// House positions and road edges of one neighborhood.
#[derive(Clone, Debug, PartialEq)]
pub struct NeighborhoodLayout {
    /// Position of house `i`, by local index.
    pub houses: Vec<GeoPoint>,
    /// Roads in build order.
    pub roads: Vec<RoadEdge>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;
    use townplan_core::Extent;

    fn bounds() -> Bounds {
        Bounds::new(GeoPoint::new(10.0, 20.0), Extent::new(4.0, 2.0))
    }

    #[test]
    fn diagonal_matches_step() {
        let layout = NeighborhoodPolicy::ring(3).layout(&bounds()).unwrap();
        assert_eq!(
            layout.houses,
            vec![
                GeoPoint::new(11.0, 21.0),
                GeoPoint::new(12.0, 22.0),
                GeoPoint::new(13.0, 23.0),
            ]
        );
    }

    fn edge(from: usize, to: usize, from_port: Port, to_port: Port) -> RoadEdge {
        RoadEdge {
            from,
            to,
            from_port,
            to_port,
        }
    }

    #[test]
    fn ring_edges_close_the_loop() {
        let edges: Vec<_> = Connectivity::Ring.edges(3).collect();
        assert_eq!(
            edges,
            vec![
                edge(1, 0, Port::A, Port::B),
                edge(2, 1, Port::A, Port::B),
                edge(2, 0, Port::B, Port::A),
            ]
        );
    }

    #[test]
    fn line_of_one_has_no_roads() {
        let layout = NeighborhoodPolicy::line(1).layout(&bounds()).unwrap();
        assert_eq!(layout.houses.len(), 1);
        assert!(layout.roads.is_empty());
    }

    #[test]
    fn invalid_policies() {
        assert_eq!(
            NeighborhoodPolicy::line(0).validate(),
            Err(PolicyError::NoHouses)
        );
        assert_eq!(
            NeighborhoodPolicy::ring(1).validate(),
            Err(PolicyError::RingTooSmall { houses: 1 })
        );
        assert!(matches!(
            NeighborhoodPolicy::ring(NeighborhoodPolicy::MAX_HOUSES + 1).validate(),
            Err(PolicyError::TooManyHouses { .. })
        ));
        let nan =
            NeighborhoodPolicy::ring(2).with_placement(Placement::Diagonal { step: f64::NAN });
        assert!(matches!(
            nan.validate(),
            Err(PolicyError::NonFinite { what: "step", .. })
        ));
    }

    #[test]
    fn unusable_bounds_rejected() {
        let policy = NeighborhoodPolicy::ring(3).with_placement(Placement::Scattered { seed: 1 });
        let nan = Bounds::new(GeoPoint::new(f64::NAN, 0.0), Extent::new(1.0, 1.0));
        assert!(matches!(
            policy.layout(&nan),
            Err(PolicyError::InvalidBounds(GeoError::NonFinite { what: "lat", .. }))
        ));

        let infinite = Bounds::new(GeoPoint::default(), Extent::new(f64::INFINITY, 1.0));
        assert!(matches!(
            policy.layout(&infinite),
            Err(PolicyError::InvalidBounds(GeoError::NonFinite { what: "width", .. }))
        ));

        let negative = Bounds::new(GeoPoint::default(), Extent::new(1.0, -5.0));
        assert_eq!(
            policy.layout(&negative),
            Err(PolicyError::InvalidBounds(GeoError::NegativeExtent {
                what: "length",
                value: -5.0,
            }))
        );
    }

    #[test]
    fn grid_is_row_major() {
        let policy = NeighborhoodPolicy::line(5).with_placement(Placement::Grid {
            columns: NonZeroU32::new(2).unwrap(),
            spacing: 0.5,
        });
        let layout = policy.layout(&bounds()).unwrap();
        assert_eq!(layout.houses[0], GeoPoint::new(10.5, 20.5));
        assert_eq!(layout.houses[1], GeoPoint::new(10.5, 21.0));
        assert_eq!(layout.houses[2], GeoPoint::new(11.0, 20.5));
        assert_eq!(layout.houses[4], GeoPoint::new(11.5, 20.5));
    }

    #[test]
    fn scattered_is_seeded() {
        let policy = NeighborhoodPolicy::ring(8).with_placement(Placement::Scattered { seed: 7 });
        let a = policy.layout(&bounds()).unwrap();
        let b = policy.layout(&bounds()).unwrap();
        assert_eq!(a, b);

        let other = NeighborhoodPolicy::ring(8)
            .with_placement(Placement::Scattered { seed: 8 })
            .layout(&bounds())
            .unwrap();
        assert_ne!(a.houses, other.houses);
    }

    #[test]
    fn policy_from_toml() {
        let policy: NeighborhoodPolicy = toml::from_str(
            r#"
            houses = 6
            connectivity = "line"
            placement = { kind = "grid", columns = 3, spacing = 0.25 }
            road = { kind = "paved", lanes = 2 }
            "#,
        )
        .unwrap();
        assert_eq!(policy.houses, 6);
        assert_eq!(policy.connectivity, Connectivity::Line);
        assert!(matches!(policy.placement, Placement::Grid { spacing, .. } if spacing == 0.25));
        assert_eq!(policy.road.lanes.get(), 2);

        assert_eq!(
            toml::from_str::<NeighborhoodPolicy>("").unwrap(),
            NeighborhoodPolicy::default()
        );
    }

    fn any_connectivity() -> impl Strategy<Value = Connectivity> {
        prop_oneof![Just(Connectivity::Line), Just(Connectivity::Ring)]
    }

    proptest! {
        #[test]
        fn layout_ports_are_never_reused(
            houses in 2u32..200,
            connectivity in any_connectivity(),
        ) {
            let policy = NeighborhoodPolicy { houses, connectivity, ..Default::default() };
            let layout = policy.layout(&bounds()).unwrap();

            prop_assert_eq!(layout.houses.len(), houses as usize);
            prop_assert_eq!(layout.roads.len() as u32, connectivity.road_count(houses));

            let mut used = HashSet::new();
            for edge in &layout.roads {
                prop_assert_ne!(edge.from, edge.to);
                prop_assert!(edge.from < layout.houses.len());
                prop_assert!(edge.to < layout.houses.len());
                prop_assert!(used.insert((edge.from, edge.from_port)));
                prop_assert!(used.insert((edge.to, edge.to_port)));
            }
        }

        #[test]
        fn scattered_houses_stay_inside(seed in any::<u64>(), houses in 1u32..64) {
            let b = bounds();
            let policy = NeighborhoodPolicy::line(houses)
                .with_placement(Placement::Scattered { seed });
            for p in policy.layout(&b).unwrap().houses {
                prop_assert!(p.lat >= b.position.lat);
                prop_assert!(p.lat <= b.position.lat + b.extent.length);
                prop_assert!(p.long >= b.position.long);
                prop_assert!(p.long <= b.position.long + b.extent.width);
            }
        }
    }
}

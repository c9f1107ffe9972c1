//! Point entities: houses, grocery stores, capitol buildings and coarse
//! neighborhoods.

use crate::connector::Endpoint;
use crate::context::BuildContext;
use crate::error::AssemblyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use townplan_core::{Category, ComponentHandle, GeoPoint, Port};

/// The kinds of building an assembly can place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    /// A house inside a neighborhood.
    House,
    /// A grocery store.
    GroceryStore,
    /// A state capitol.
    CapitolBuilding,
    /// A whole neighborhood modelled as one component.
    Neighborhood,
}

impl BuildingKind {
    /// Category the building's index is allocated under.
    pub fn category(self) -> Category {
        match self {
            Self::House => Category::HOUSE,
            Self::GroceryStore => Category::GROCERY_STORE,
            Self::CapitolBuilding => Category::CAPITOL_BUILDING,
            Self::Neighborhood => Category::NEIGHBORHOOD,
        }
    }

    /// Engine type tag of the point component.
    pub fn type_tag(self) -> &'static str {
        match self {
            Self::House => "house.HouseComponent",
            Self::GroceryStore | Self::CapitolBuilding => "building.BuildingComponent",
            Self::Neighborhood => "neighborhood.NeighborhoodComponent",
        }
    }
}

impl fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.category().as_str())
    }
}

/// A registered point component.
#[derive(Clone, Debug, PartialEq)]
pub struct Building {
    kind: BuildingKind,
    name: String,
    index: u32,
    handle: ComponentHandle,
    position: GeoPoint,
}

impl Building {
    /// Register a building of `kind` at `position`.
    ///
    /// Allocates one index under the kind's category and registers one
    /// component named `<prefix><category>_<index>`, carrying the
    /// simulation parameters plus `lat` and `long`. The index is only
    /// recorded once the engine has accepted the name. A NaN or infinite
    /// coordinate is rejected before anything is registered.
    pub fn build(
        ctx: &mut BuildContext<'_>,
        kind: BuildingKind,
        prefix: &str,
        position: GeoPoint,
    ) -> Result<Self, AssemblyError> {
        let planned = ctx.plan_component(&kind.category(), prefix)?;
        position
            .validate()
            .map_err(|source| AssemblyError::InvalidPosition {
                entity: planned.name.clone(),
                source,
            })?;

        let mut params = ctx.params().to_param_map();
        params.insert("lat".to_string(), position.lat.to_string());
        params.insert("long".to_string(), position.long.to_string());

        let handle = ctx.commit_component(&planned, kind.type_tag(), &params)?;
        Ok(Self {
            kind,
            name: planned.name,
            index: planned.index,
            handle,
            position,
        })
    }

    /// This building as a connector endpoint on `port`.
    pub fn endpoint(&self, port: Port) -> Endpoint {
        Endpoint {
            building: self.handle,
            name: self.name.clone(),
            position: self.position,
            port,
        }
    }

    /// What kind of building this is.
    pub fn kind(&self) -> BuildingKind {
        self.kind
    }

    /// Registered component name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index within the kind's category.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Engine handle.
    pub fn handle(&self) -> ComponentHandle {
        self.handle
    }

    /// Geographic position.
    pub fn position(&self) -> GeoPoint {
        self.position
    }
}

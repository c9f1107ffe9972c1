//! Core types for townplan assemblies.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the engine boundary and the entity
//! hierarchy: categories, handles and ports, geographic types,
//! simulation parameters, and the per-category [`IndexRegistry`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod geo;
pub mod id;
pub mod params;
pub mod registry;

pub use error::{GeoError, ParamsError, RegistryError};
pub use geo::{Bounds, Extent, GeoPoint};
pub use id::{Category, ComponentHandle, LinkHandle, Port};
pub use params::{ClockRate, DebugLevel, Delay, ParamMap, SimParams};
pub use registry::IndexRegistry;

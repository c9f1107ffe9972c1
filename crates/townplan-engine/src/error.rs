//! Error types for engine registration calls.

use crate::engine::PortRef;
use thiserror::Error;
use townplan_core::{ComponentHandle, LinkHandle};

/// Rejections reported by a [`SimEngine`](crate::SimEngine).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A component with this name is already registered.
    #[error("component name '{name}' is already registered")]
    ComponentNameTaken {
        /// The colliding name.
        name: String,
    },
    /// A link with this name is already registered.
    #[error("link name '{name}' is already registered")]
    LinkNameTaken {
        /// The colliding name.
        name: String,
    },
    /// The handle does not refer to a registered component.
    #[error("unknown {0}")]
    UnknownComponent(ComponentHandle),
    /// The handle does not refer to a registered link.
    #[error("unknown {0}")]
    UnknownLink(LinkHandle),
    /// The port is already bound by another link.
    #[error("port {port} is already bound by link '{bound_by}'")]
    PortAlreadyBound {
        /// The port that was requested again.
        port: PortRef,
        /// Name of the link holding it.
        bound_by: String,
    },
    /// The link was already connected.
    #[error("link '{name}' is already connected")]
    LinkAlreadyConnected {
        /// Name of the link.
        name: String,
    },
    /// The engine cannot hand out more handles of this kind.
    #[error("engine handle space exhausted registering '{name}'")]
    CapacityExceeded {
        /// The name that could not be registered.
        name: String,
    },
    /// Both ends of the link are on the same component.
    #[error("link '{name}' would connect {component} to itself")]
    SelfLoop {
        /// Name of the link.
        name: String,
        /// The component on both ends.
        component: ComponentHandle,
    },
}

//! The `SimEngine` registration contract.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use townplan_core::{ComponentHandle, Delay, LinkHandle, ParamMap, Port};

/// One end of a link: a component and one of its ports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortRef {
    /// The component owning the port.
    pub component: ComponentHandle,
    /// The port on that component.
    pub port: Port,
}

impl PortRef {
    /// Create a port reference.
    pub fn new(component: ComponentHandle, port: Port) -> Self {
        Self { component, port }
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.component, self.port)
    }
}

/// Registration interface of a discrete-event simulation engine.
///
/// Entity constructors hold a `&mut dyn SimEngine`, so the trait stays
/// object safe. All calls are synchronous; an assembly run drives one
/// engine from one thread.
///
/// # Contract
///
/// - Component names and link names each live in their own namespace
///   and must be unique within it.
/// - A port may be bound by at most one link.
/// - A link connects exactly once, to two ports of distinct components.
/// - Failed calls leave the engine unchanged.
pub trait SimEngine {
    /// Register a component named `name` of type `type_tag`
    /// (e.g. `"house.HouseComponent"`).
    fn register_component(
        &mut self,
        name: &str,
        type_tag: &str,
    ) -> Result<ComponentHandle, EngineError>;

    /// Attach configuration values to a registered component.
    ///
    /// Keys already present are overwritten; other keys are kept.
    fn set_parameters(
        &mut self,
        component: ComponentHandle,
        params: &ParamMap,
    ) -> Result<(), EngineError>;

    /// Register a link named `name` with propagation delay `delay`.
    fn register_link(&mut self, name: &str, delay: Delay) -> Result<LinkHandle, EngineError>;

    /// Bind `link` between ports `a` and `b`.
    fn connect(&mut self, link: LinkHandle, a: PortRef, b: PortRef) -> Result<(), EngineError>;

    /// Name of a registered component, or `None` for an unknown handle.
    fn component_name(&self, component: ComponentHandle) -> Option<&str>;

    /// Whether a component with this name is registered.
    fn has_component(&self, name: &str) -> bool;

    /// Whether a link with this name is registered.
    fn has_link(&self, name: &str) -> bool;

    /// Name of the link bound to `port`, or `None` if the port is free
    /// or its component is unknown.
    fn port_binding(&self, port: PortRef) -> Option<&str>;

    /// Whether `component` refers to a registered component.
    fn is_registered(&self, component: ComponentHandle) -> bool {
        self.component_name(component).is_some()
    }
}

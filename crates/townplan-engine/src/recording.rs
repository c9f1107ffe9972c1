//! In-memory engine that records the registered graph.

use crate::engine::{PortRef, SimEngine};
use crate::error::EngineError;
use crate::export::{ComponentExport, GraphExport, LinkEnd, LinkExport};
use indexmap::IndexMap;
use smallvec::SmallVec;
use townplan_core::{ComponentHandle, Delay, LinkHandle, ParamMap, Port};
use tracing::trace;

/// A registered component as seen by the [`RecordingEngine`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentRecord {
    /// Engine type tag, e.g. `"road.RoadComponent"`.
    pub type_tag: String,
    /// Parameters attached so far, in insertion order.
    pub params: ParamMap,
    bound: SmallVec<[(Port, LinkHandle); 4]>,
}

impl ComponentRecord {
    /// The link bound to `port`, if any.
    pub fn bound_link(&self, port: Port) -> Option<LinkHandle> {
        self.bound
            .iter()
            .find_map(|&(p, link)| (p == port).then_some(link))
    }

    /// Ports bound so far, in binding order.
    pub fn bound_ports(&self) -> impl Iterator<Item = Port> + '_ {
        self.bound.iter().map(|&(p, _)| p)
    }
}

/// A registered link as seen by the [`RecordingEngine`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkRecord {
    /// Propagation delay.
    pub delay: Delay,
    /// Bound ports, once connected.
    pub ends: Option<(PortRef, PortRef)>,
}

/// A [`SimEngine`] that enforces the registration contract in memory
/// and keeps everything it was given.
///
/// Handles are dense: the n-th registered component is
/// `ComponentHandle(n)`, likewise for links. Iteration is in
/// registration order, so two identical assembly runs produce
/// identical records.
///
/// # Examples
///
/// ```
/// use townplan_core::{Delay, Port};
/// use townplan_engine::{PortRef, RecordingEngine, SimEngine};
///
/// let mut engine = RecordingEngine::new();
/// let a = engine.register_component("house_0", "house.HouseComponent").unwrap();
/// let b = engine.register_component("house_1", "house.HouseComponent").unwrap();
/// let link = engine.register_link("link0", Delay::one_ns()).unwrap();
/// engine
///     .connect(link, PortRef::new(a, Port::A), PortRef::new(b, Port::B))
///     .unwrap();
///
/// assert_eq!(engine.component_count(), 2);
/// assert!(engine.register_component("house_0", "house.HouseComponent").is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct RecordingEngine {
    components: IndexMap<String, ComponentRecord>,
    links: IndexMap<String, LinkRecord>,
}

impl RecordingEngine {
    /// Create an empty engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered components.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Number of registered links.
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Number of registered links that were never connected.
    pub fn dangling_link_count(&self) -> usize {
        self.links.values().filter(|l| l.ends.is_none()).count()
    }

    /// Look up a component by handle.
    pub fn component(&self, handle: ComponentHandle) -> Option<(&str, &ComponentRecord)> {
        self.components
            .get_index(handle.0 as usize)
            .map(|(name, record)| (name.as_str(), record))
    }

    /// Look up a component by name.
    pub fn component_by_name(&self, name: &str) -> Option<(ComponentHandle, &ComponentRecord)> {
        self.components
            .get_full(name)
            .map(|(i, _, record)| (ComponentHandle(i as u32), record))
    }

    /// Look up a link by handle.
    pub fn link(&self, handle: LinkHandle) -> Option<(&str, &LinkRecord)> {
        self.links
            .get_index(handle.0 as usize)
            .map(|(name, record)| (name.as_str(), record))
    }

    /// Look up a link by name.
    pub fn link_by_name(&self, name: &str) -> Option<(LinkHandle, &LinkRecord)> {
        self.links
            .get_full(name)
            .map(|(i, _, record)| (LinkHandle(i as u32), record))
    }

    /// Components in registration order.
    pub fn components(&self) -> impl Iterator<Item = (ComponentHandle, &str, &ComponentRecord)> {
        self.components
            .iter()
            .enumerate()
            .map(|(i, (name, record))| (ComponentHandle(i as u32), name.as_str(), record))
    }

    /// Links in registration order.
    pub fn links(&self) -> impl Iterator<Item = (LinkHandle, &str, &LinkRecord)> {
        self.links
            .iter()
            .enumerate()
            .map(|(i, (name, record))| (LinkHandle(i as u32), name.as_str(), record))
    }

    /// Component names in registration order.
    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    /// Link names in registration order.
    pub fn link_names(&self) -> impl Iterator<Item = &str> {
        self.links.keys().map(String::as_str)
    }

    /// Stable hash of the recorded graph; see [`fingerprint`](crate::fingerprint).
    pub fn fingerprint(&self) -> u64 {
        crate::hash::fingerprint(self)
    }

    /// Serializable snapshot of the recorded graph.
    pub fn export(&self) -> GraphExport {
        let components = self
            .components
            .iter()
            .map(|(name, record)| ComponentExport {
                name: name.clone(),
                type_tag: record.type_tag.clone(),
                params: record.params.clone(),
            })
            .collect();
        let links = self
            .links
            .iter()
            .map(|(name, record)| LinkExport {
                name: name.clone(),
                delay: record.delay,
                ends: record.ends.map(|(a, b)| [self.end_of(a), self.end_of(b)]),
            })
            .collect();
        GraphExport { components, links }
    }

    fn end_of(&self, port: PortRef) -> LinkEnd {
        LinkEnd {
            component: self
                .component(port.component)
                .map(|(name, _)| name.to_string())
                .unwrap_or_default(),
            port: port.port,
        }
    }

    fn next_handle(len: usize, name: &str) -> Result<u32, EngineError> {
        u32::try_from(len).map_err(|_| EngineError::CapacityExceeded {
            name: name.to_string(),
        })
    }

    fn check_port_free(&self, port: PortRef) -> Result<(), EngineError> {
        let (_, record) = self
            .component(port.component)
            .ok_or(EngineError::UnknownComponent(port.component))?;
        if let Some(link) = record.bound_link(port.port) {
            let bound_by = self
                .link(link)
                .map(|(name, _)| name.to_string())
                .unwrap_or_default();
            return Err(EngineError::PortAlreadyBound { port, bound_by });
        }
        Ok(())
    }
}

impl SimEngine for RecordingEngine {
    fn register_component(
        &mut self,
        name: &str,
        type_tag: &str,
    ) -> Result<ComponentHandle, EngineError> {
        if self.components.contains_key(name) {
            return Err(EngineError::ComponentNameTaken {
                name: name.to_string(),
            });
        }
        let handle = ComponentHandle(Self::next_handle(self.components.len(), name)?);
        self.components.insert(
            name.to_string(),
            ComponentRecord {
                type_tag: type_tag.to_string(),
                params: ParamMap::new(),
                bound: SmallVec::new(),
            },
        );
        trace!(%handle, name, type_tag, "component registered");
        Ok(handle)
    }

    fn set_parameters(
        &mut self,
        component: ComponentHandle,
        params: &ParamMap,
    ) -> Result<(), EngineError> {
        let (_, record) = self
            .components
            .get_index_mut(component.0 as usize)
            .ok_or(EngineError::UnknownComponent(component))?;
        for (key, value) in params {
            record.params.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    fn register_link(&mut self, name: &str, delay: Delay) -> Result<LinkHandle, EngineError> {
        if self.links.contains_key(name) {
            return Err(EngineError::LinkNameTaken {
                name: name.to_string(),
            });
        }
        let handle = LinkHandle(Self::next_handle(self.links.len(), name)?);
        self.links
            .insert(name.to_string(), LinkRecord { delay, ends: None });
        trace!(%handle, name, %delay, "link registered");
        Ok(handle)
    }

    fn connect(&mut self, link: LinkHandle, a: PortRef, b: PortRef) -> Result<(), EngineError> {
        let (name, record) = self.link(link).ok_or(EngineError::UnknownLink(link))?;
        if record.ends.is_some() {
            return Err(EngineError::LinkAlreadyConnected {
                name: name.to_string(),
            });
        }
        if a.component == b.component {
            return Err(EngineError::SelfLoop {
                name: name.to_string(),
                component: a.component,
            });
        }
        self.check_port_free(a)?;
        self.check_port_free(b)?;

        for end in [a, b] {
            if let Some((_, record)) = self.components.get_index_mut(end.component.0 as usize) {
                record.bound.push((end.port, link));
            }
        }
        if let Some((_, record)) = self.links.get_index_mut(link.0 as usize) {
            record.ends = Some((a, b));
        }
        trace!(%link, %a, %b, "link connected");
        Ok(())
    }

    fn component_name(&self, component: ComponentHandle) -> Option<&str> {
        self.component(component).map(|(name, _)| name)
    }

    fn has_component(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    fn has_link(&self, name: &str) -> bool {
        self.links.contains_key(name)
    }

    fn port_binding(&self, port: PortRef) -> Option<&str> {
        let (_, record) = self.component(port.component)?;
        let link = record.bound_link(port.port)?;
        self.link(link).map(|(name, _)| name)
    }
}

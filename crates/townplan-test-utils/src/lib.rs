//! Test doubles and fixtures for townplan development.
//!
//! Provides [`FaultyEngine`], a [`SimEngine`] that fails on a chosen
//! call, and [`Harness`], which owns the registry, engine and parameters
//! an assembly run needs. Canned region specs live in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use townplan_assembly::{AssemblyError, BuildContext, Region, RegionSpec};
use townplan_core::{ComponentHandle, Delay, IndexRegistry, LinkHandle, ParamMap, SimParams};
use townplan_engine::{EngineError, PortRef, RecordingEngine, SimEngine};

/// A [`RecordingEngine`] that rejects its N-th mutating call.
///
/// Mutating calls are `register_component`, `set_parameters`,
/// `register_link` and `connect`, counted from 0. The failing call
/// reports an error of the kind that call can produce and leaves the
/// inner engine unchanged. Every other call is forwarded.
pub struct FaultyEngine {
    inner: RecordingEngine,
    fail_at: usize,
    calls: usize,
}

impl FaultyEngine {
    pub fn new(fail_at: usize) -> Self {
        Self {
            inner: RecordingEngine::new(),
            fail_at,
            calls: 0,
        }
    }

    /// Number of mutating calls seen so far, including the failed one.
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// The engine state behind the fault injection.
    pub fn inner(&self) -> &RecordingEngine {
        &self.inner
    }

    fn tick(&mut self) -> bool {
        let fail = self.calls == self.fail_at;
        self.calls += 1;
        fail
    }
}

impl SimEngine for FaultyEngine {
    fn register_component(
        &mut self,
        name: &str,
        type_tag: &str,
    ) -> Result<ComponentHandle, EngineError> {
        if self.tick() {
            return Err(EngineError::ComponentNameTaken {
                name: name.to_string(),
            });
        }
        self.inner.register_component(name, type_tag)
    }

    fn set_parameters(
        &mut self,
        component: ComponentHandle,
        params: &ParamMap,
    ) -> Result<(), EngineError> {
        if self.tick() {
            return Err(EngineError::UnknownComponent(component));
        }
        self.inner.set_parameters(component, params)
    }

    fn register_link(&mut self, name: &str, delay: Delay) -> Result<LinkHandle, EngineError> {
        if self.tick() {
            return Err(EngineError::LinkNameTaken {
                name: name.to_string(),
            });
        }
        self.inner.register_link(name, delay)
    }

    fn connect(&mut self, link: LinkHandle, a: PortRef, b: PortRef) -> Result<(), EngineError> {
        if self.tick() {
            return Err(EngineError::UnknownLink(link));
        }
        self.inner.connect(link, a, b)
    }

    fn component_name(&self, component: ComponentHandle) -> Option<&str> {
        self.inner.component_name(component)
    }

    fn has_component(&self, name: &str) -> bool {
        self.inner.has_component(name)
    }

    fn has_link(&self, name: &str) -> bool {
        self.inner.has_link(name)
    }

    fn port_binding(&self, port: PortRef) -> Option<&str> {
        self.inner.port_binding(port)
    }
}

/// Everything one assembly run needs, owned in one place.
pub struct Harness<E: SimEngine = RecordingEngine> {
    pub registry: IndexRegistry,
    pub engine: E,
    pub params: SimParams,
}

impl Harness {
    /// Fresh registry, empty [`RecordingEngine`], default parameters.
    pub fn new() -> Self {
        Self::with_engine(RecordingEngine::new())
    }

    /// Component names registered so far, in order.
    pub fn component_names(&self) -> Vec<String> {
        self.engine.component_names().map(str::to_string).collect()
    }

    /// Link names registered so far, in order.
    pub fn link_names(&self) -> Vec<String> {
        self.engine.link_names().map(str::to_string).collect()
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: SimEngine> Harness<E> {
    pub fn with_engine(engine: E) -> Self {
        Self {
            registry: IndexRegistry::new(),
            engine,
            params: SimParams::default(),
        }
    }

    pub fn with_params(mut self, params: SimParams) -> Self {
        self.params = params;
        self
    }

    /// A build context over the harness state.
    ///
    /// # Panics
    ///
    /// If the harness parameters do not validate.
    pub fn ctx(&mut self) -> BuildContext<'_> {
        BuildContext::new(&mut self.registry, &mut self.engine, &self.params)
            .expect("harness params must validate")
    }

    /// Build `spec` against the harness state.
    pub fn build(&mut self, spec: &RegionSpec) -> Result<Region, AssemblyError> {
        let mut ctx = BuildContext::new(&mut self.registry, &mut self.engine, &self.params)?;
        Region::build(&mut ctx, spec)
    }
}

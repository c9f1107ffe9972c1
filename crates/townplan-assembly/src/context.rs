//! Shared state threaded through every constructor.

use crate::error::AssemblyError;
use townplan_core::{Category, ComponentHandle, IndexRegistry, ParamMap, SimParams};
use townplan_engine::SimEngine;
use tracing::debug;

/// The registry, engine and simulation parameters of one assembly run.
///
/// Constructors take `&mut BuildContext` and return only after their
/// entity (and all of its children) is registered with both the engine
/// and the registry.
pub struct BuildContext<'a> {
    registry: &'a mut IndexRegistry,
    engine: &'a mut dyn SimEngine,
    params: &'a SimParams,
}

impl<'a> BuildContext<'a> {
    /// Bundle a registry, engine and parameters.
    ///
    /// Fails with [`AssemblyError::InvalidParams`] if `params` does not
    /// validate.
    pub fn new(
        registry: &'a mut IndexRegistry,
        engine: &'a mut dyn SimEngine,
        params: &'a SimParams,
    ) -> Result<Self, AssemblyError> {
        params.validate()?;
        Ok(Self {
            registry,
            engine,
            params,
        })
    }

    /// The shared index registry.
    pub fn registry(&self) -> &IndexRegistry {
        &*self.registry
    }

    /// The engine being populated.
    pub fn engine(&self) -> &(dyn SimEngine + 'a) {
        &*self.engine
    }

    /// Simulation-wide parameters.
    pub fn params(&self) -> &SimParams {
        self.params
    }

    pub(crate) fn registry_mut(&mut self) -> &mut IndexRegistry {
        &mut *self.registry
    }

    pub(crate) fn engine_mut(&mut self) -> &mut (dyn SimEngine + 'a) {
        &mut *self.engine
    }

    /// Reserve the next name in `category` without mutating anything.
    ///
    /// Fails if the engine already knows the name; nothing has been
    /// registered or recorded at that point.
    pub(crate) fn plan_component(
        &self,
        category: &Category,
        prefix: &str,
    ) -> Result<Planned, AssemblyError> {
        let index = self.registry.next_index(category)?;
        let name = category.component_name(prefix, index);
        if self.engine.has_component(&name) {
            return Err(AssemblyError::engine(
                &name,
                category,
                townplan_engine::EngineError::ComponentNameTaken { name: name.clone() },
            ));
        }
        Ok(Planned {
            category: category.clone(),
            index,
            name,
        })
    }

    /// Register a planned component, record its index, then attach
    /// `params`.
    pub(crate) fn commit_component(
        &mut self,
        planned: &Planned,
        type_tag: &str,
        params: &ParamMap,
    ) -> Result<ComponentHandle, AssemblyError> {
        let handle = self
            .engine
            .register_component(&planned.name, type_tag)
            .map_err(|e| AssemblyError::engine(&planned.name, &planned.category, e))?;
        self.registry.record(planned.category.clone(), planned.index)?;
        self.engine
            .set_parameters(handle, params)
            .map_err(|e| AssemblyError::engine(&planned.name, &planned.category, e))?;
        debug!(
            name = %planned.name,
            category = %planned.category,
            index = planned.index,
            %handle,
            "component registered"
        );
        Ok(handle)
    }
}

/// A name and index chosen for a component that is not yet registered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Planned {
    pub(crate) category: Category,
    pub(crate) index: u32,
    pub(crate) name: String,
}

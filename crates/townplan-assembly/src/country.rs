//! Countries: containers of states.

use crate::context::BuildContext;
use crate::error::AssemblyError;
use crate::spec::{CountrySpec, StateSpec};
use crate::state::State;
use indexmap::IndexMap;
use std::collections::HashSet;
use townplan_core::Bounds;
use tracing::info;

/// A country and the states registered inside it.
#[derive(Clone, Debug, PartialEq)]
pub struct Country {
    name: String,
    prefix: String,
    bounds: Bounds,
    states: IndexMap<String, State>,
}

impl Country {
    /// Build every state of `spec`, in order.
    pub fn build(
        ctx: &mut BuildContext<'_>,
        spec: &CountrySpec,
        parent_prefix: &str,
    ) -> Result<Self, AssemblyError> {
        let mut seen = HashSet::new();
        if let Some(dup) = spec.states.iter().find(|s| !seen.insert(s.name.as_str())) {
            return Err(AssemblyError::DuplicateChild {
                parent: spec.name.clone(),
                child: dup.name.clone(),
            });
        }

        let mut country = Self::empty(
            spec.name.clone(),
            format!("{parent_prefix}{}", spec.prefix),
            spec.bounds,
        );
        country.states.reserve(spec.states.len());
        for child in &spec.states {
            country.add_state(ctx, child)?;
        }

        info!(
            kind = "country",
            name = %country.name,
            states = country.states.len(),
            "region built"
        );
        Ok(country)
    }

    /// A country with no states yet. `prefix` is used as is.
    pub fn empty(name: impl Into<String>, prefix: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            bounds,
            states: IndexMap::new(),
        }
    }

    /// Build one more state under this country's prefix.
    pub fn add_state(
        &mut self,
        ctx: &mut BuildContext<'_>,
        spec: &StateSpec,
    ) -> Result<&State, AssemblyError> {
        if self.states.contains_key(&spec.name) {
            return Err(AssemblyError::DuplicateChild {
                parent: self.name.clone(),
                child: spec.name.clone(),
            });
        }
        let state = State::build(ctx, spec, &self.prefix)?;
        let (index, _) = self.states.insert_full(spec.name.clone(), state);
        Ok(&self.states[index])
    }

    /// Name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Effective naming prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Position and extent.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// A state by name.
    pub fn state(&self, name: &str) -> Option<&State> {
        self.states.get(name)
    }

    /// States in build order.
    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.states.values()
    }
}

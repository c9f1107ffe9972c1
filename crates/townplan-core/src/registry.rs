//! Per-category index allocation.
//!
//! The [`IndexRegistry`] is the single shared mutable resource of an
//! assembly run. Every entity constructor takes it by `&mut`, asks for
//! the next free index in its category, and records the index once the
//! engine has accepted the corresponding registration.

use crate::error::RegistryError;
use crate::id::Category;
use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

/// Tracks which indices are in use for each [`Category`].
///
/// Allocation is monotonic per category: the next index is always one
/// past the largest recorded index, so an index is never handed out
/// twice even if lower indices were skipped. Categories only grow;
/// there is no removal.
///
/// # Examples
///
/// ```
/// use townplan_core::{Category, IndexRegistry};
///
/// let mut registry = IndexRegistry::new();
/// assert_eq!(registry.next_index(&Category::HOUSE).unwrap(), 0);
///
/// registry.record(Category::HOUSE, 0).unwrap();
/// registry.record(Category::HOUSE, 5).unwrap();
/// assert_eq!(registry.next_index(&Category::HOUSE).unwrap(), 6);
///
/// // Re-recording an index is rejected.
/// assert!(registry.record(Category::HOUSE, 5).is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexRegistry {
    allocated: IndexMap<Category, BTreeSet<u32>>,
}

impl IndexRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with `categories` pre-declared (and empty).
    ///
    /// Pre-declaring only fixes the order reported by
    /// [`categories()`](Self::categories); allocation behaves the same.
    pub fn with_categories<I>(categories: I) -> Self
    where
        I: IntoIterator<Item = Category>,
    {
        Self {
            allocated: categories
                .into_iter()
                .map(|c| (c, BTreeSet::new()))
                .collect(),
        }
    }

    /// The index the next allocation in `category` would receive.
    ///
    /// Returns `max(allocated) + 1`, or `0` for an empty category.
    /// Does not mutate the registry.
    pub fn next_index(&self, category: &Category) -> Result<u32, RegistryError> {
        match self.max_index(category) {
            None => Ok(0),
            Some(max) => max.checked_add(1).ok_or_else(|| RegistryError::Exhausted {
                category: category.clone(),
                max,
            }),
        }
    }

    /// The `count` consecutive indices the next `count` allocations in
    /// `category` would receive, assuming nothing else is recorded in
    /// between.
    ///
    /// The run may end at `u32::MAX`. A `count` of zero yields an empty
    /// range.
    pub fn next_run(
        &self,
        category: &Category,
        count: u32,
    ) -> Result<RangeInclusive<u32>, RegistryError> {
        let start = self.next_index(category)?;
        let Some(span) = count.checked_sub(1) else {
            return Ok(RangeInclusive::new(1, 0));
        };
        let last = start
            .checked_add(span)
            .ok_or_else(|| RegistryError::Exhausted {
                category: category.clone(),
                max: self.max_index(category).unwrap_or(start),
            })?;
        Ok(start..=last)
    }

    /// Mark `index` as allocated in `category`.
    ///
    /// Fails with [`RegistryError::DuplicateIndex`] if the index is
    /// already present; the registry is left unchanged in that case.
    pub fn record(&mut self, category: Category, index: u32) -> Result<(), RegistryError> {
        if self.contains(&category, index) {
            return Err(RegistryError::DuplicateIndex { category, index });
        }
        self.allocated.entry(category).or_default().insert(index);
        Ok(())
    }

    /// Allocate and record the next index in `category`.
    pub fn allocate(&mut self, category: Category) -> Result<u32, RegistryError> {
        let index = self.next_index(&category)?;
        self.record(category, index)?;
        Ok(index)
    }

    /// Whether `index` is allocated in `category`.
    pub fn contains(&self, category: &Category, index: u32) -> bool {
        self.allocated
            .get(category)
            .is_some_and(|set| set.contains(&index))
    }

    /// Allocated indices of `category`, ascending.
    pub fn allocated(&self, category: &Category) -> impl Iterator<Item = u32> + '_ {
        self.allocated
            .get(category)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Largest allocated index in `category`, if any.
    pub fn max_index(&self, category: &Category) -> Option<u32> {
        self.allocated
            .get(category)
            .and_then(|set| set.last().copied())
    }

    /// Number of indices allocated in `category`.
    pub fn count(&self, category: &Category) -> usize {
        self.allocated.get(category).map_or(0, BTreeSet::len)
    }

    /// Known categories in first-use (or pre-declared) order.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.allocated.keys()
    }

    /// Total number of allocated indices across all categories.
    pub fn total(&self) -> usize {
        self.allocated.values().map(BTreeSet::len).sum()
    }
}

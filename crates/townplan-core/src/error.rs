//! Error types for the registry, geography and parameter parsing.

use crate::id::Category;
use thiserror::Error;

/// Errors from [`IndexRegistry`](crate::IndexRegistry) bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The index is already allocated in this category.
    #[error("index {index} is already allocated in category '{category}'")]
    DuplicateIndex {
        /// Category the index was recorded under.
        category: Category,
        /// The colliding index.
        index: u32,
    },
    /// The category has allocated `u32::MAX`; no larger index exists.
    #[error("category '{category}' has no free index above {max}")]
    Exhausted {
        /// The exhausted category.
        category: Category,
        /// The largest allocated index.
        max: u32,
    },
}

/// Errors from validating positions and bounds.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GeoError {
    /// A coordinate or extent is NaN or infinite.
    #[error("{what} must be finite, got {value}")]
    NonFinite {
        /// Which value.
        what: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// An extent is negative.
    #[error("{what} must not be negative, got {value}")]
    NegativeExtent {
        /// Which extent.
        what: &'static str,
        /// The rejected value.
        value: f64,
    },
}

/// Errors from parsing or validating simulation parameters.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParamsError {
    /// A quantity string such as `"1ns"` or `"1GHz"` could not be parsed.
    #[error("malformed {what} '{input}': {reason}")]
    Malformed {
        /// Which parameter was being parsed.
        what: &'static str,
        /// The rejected input.
        input: String,
        /// What was wrong with it.
        reason: String,
    },
    /// A propagation delay of zero; events on the link could not be ordered.
    #[error("propagation delay must be non-zero, got '{input}'")]
    ZeroDelay {
        /// The rejected input.
        input: String,
    },
    /// A clock rate of zero.
    #[error("clock rate must be non-zero, got '{input}'")]
    ZeroClock {
        /// The rejected input.
        input: String,
    },
    /// The tick budget is zero.
    #[error("clock_ticks must be at least 1")]
    ZeroTicks,
    /// A debug level outside `0..=5`.
    #[error("debug level must be in 0..=5, got {value}")]
    DebugLevelOutOfRange {
        /// The rejected level.
        value: u8,
    },
}

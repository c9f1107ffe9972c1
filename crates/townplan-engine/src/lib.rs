//! Simulation-engine boundary for townplan assemblies.
//!
//! The engine that instantiates components, binds ports and schedules
//! links is an external collaborator. This crate pins down the contract
//! the assembly code relies on and ships one implementation of it.
//!
//! # Contents
//!
//! - [`SimEngine`]: the object-safe registration contract
//!   (components, parameters, links, port binding).
//! - [`RecordingEngine`]: an in-memory engine that enforces the
//!   namespace and port rules and records the resulting graph.
//! - [`GraphExport`] / [`to_dot`]: serializable and Graphviz views of a
//!   recorded graph.
//! - [`fingerprint`]: a stable hash of a recorded graph for
//!   determinism checks.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod engine;
pub mod error;
pub mod export;
pub mod hash;
pub mod recording;

pub use engine::{PortRef, SimEngine};
pub use error::EngineError;
pub use export::{split_name, to_dot, ComponentExport, GraphExport, LinkEnd, LinkExport};
pub use hash::fingerprint;
pub use recording::{ComponentRecord, LinkRecord, RecordingEngine};

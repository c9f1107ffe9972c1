//! Loading, assembling and rendering townplan region files.
//!
//! The `townplan` binary is a thin layer over this library: an
//! [`AssemblyFile`] is read from TOML, [`assemble`]d against a fresh
//! [`RecordingEngine`], and the result [`render`](render::render)ed in one
//! of the [`Format`]s.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod render;

pub use config::{AssemblyFile, LoadError};
pub use render::Format;

use townplan_assembly::{AssemblyError, BuildContext, Region};
use townplan_core::IndexRegistry;
use townplan_engine::RecordingEngine;

/// The outcome of one assembly run.
#[derive(Debug)]
pub struct Assembled {
    /// The built region tree.
    pub region: Region,
    /// Everything the region registered.
    pub engine: RecordingEngine,
    /// Indices drawn while building.
    pub registry: IndexRegistry,
}

/// Build the file's region against a fresh registry and recording engine.
pub fn assemble(file: &AssemblyFile) -> Result<Assembled, AssemblyError> {
    let mut registry = IndexRegistry::new();
    let mut engine = RecordingEngine::new();
    let region = {
        let mut ctx = BuildContext::new(&mut registry, &mut engine, &file.sim)?;
        Region::build(&mut ctx, &file.region)?
    };
    Ok(Assembled {
        region,
        engine,
        registry,
    })
}

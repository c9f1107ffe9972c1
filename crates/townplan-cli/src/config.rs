//! Assembly files: simulation parameters plus one region spec, in TOML.
//!
//! ```toml
//! [sim]
//! clock = "1GHz"
//! clock_ticks = 2
//!
//! [region]
//! kind = "neighborhood"
//! name = "catonsville"
//! prefix = "ncat_"
//! policy = { houses = 4, connectivity = "ring" }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use townplan_assembly::RegionSpec;
use townplan_core::SimParams;

/// One assembly file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssemblyFile {
    /// Parameters every component receives. Defaults when omitted.
    #[serde(default)]
    pub sim: SimParams,
    /// The region to build.
    pub region: RegionSpec,
}

impl AssemblyFile {
    /// Read and parse `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.into(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| LoadError::Parse {
            path: path.into(),
            source,
        })
    }
}

/// Why an assembly file could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("error reading \"{}\"", path.display())]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not a valid assembly file.
    #[error("error parsing \"{}\"", path.display())]
    Parse {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: toml::de::Error,
    },
}

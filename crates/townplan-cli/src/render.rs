//! Output formats for an assembled region.

use crate::Assembled;
use clap::ValueEnum;
use serde::Serialize;
use townplan_assembly::AssemblySummary;
use townplan_engine::{to_dot, GraphExport};

/// What `townplan build` writes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Per-category counts and the graph fingerprint.
    #[default]
    Summary,
    /// Summary plus every registered component and link, as JSON.
    Json,
    /// Graphviz `digraph`, clustered by naming prefix and category.
    Dot,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: AssemblySummary,
    fingerprint: String,
    graph: &'a GraphExport,
}

/// Render `assembled` in `format`. The result ends with a newline.
pub fn render(assembled: &Assembled, format: Format) -> Result<String, serde_json::Error> {
    Ok(match format {
        Format::Summary => format!(
            "{}\n  {:<18} {:016x}\n",
            assembled.region.summary(),
            "fingerprint",
            assembled.engine.fingerprint()
        ),
        Format::Json => {
            let graph = assembled.engine.export();
            let report = JsonReport {
                summary: assembled.region.summary(),
                fingerprint: format!("{:016x}", assembled.engine.fingerprint()),
                graph: &graph,
            };
            let mut out = serde_json::to_string_pretty(&report)?;
            out.push('\n');
            out
        }
        Format::Dot => to_dot(&assembled.engine.export()),
    })
}

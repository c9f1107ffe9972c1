//! Serializable and Graphviz views of a recorded graph.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use townplan_core::{Category, Delay, ParamMap, Port};

/// Snapshot of everything a [`RecordingEngine`](crate::RecordingEngine)
/// has seen, in registration order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphExport {
    /// Registered components.
    pub components: Vec<ComponentExport>,
    /// Registered links.
    pub links: Vec<LinkExport>,
}

/// One exported component.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentExport {
    /// Engine name, `<prefix><category>_<index>`.
    pub name: String,
    /// Engine type tag.
    pub type_tag: String,
    /// Attached parameters.
    pub params: ParamMap,
}

/// One exported link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkExport {
    /// Engine name, `link<index>`.
    pub name: String,
    /// Propagation delay.
    pub delay: Delay,
    /// Both bound ends, or `None` if the link was never connected.
    pub ends: Option<[LinkEnd; 2]>,
}

/// A bound link end, by component name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEnd {
    /// Component name.
    pub component: String,
    /// Port on that component.
    pub port: Port,
}

/// Split a component name into `(prefix, category, index)`.
///
/// Built-in categories are recognised as suffixes of the stem, so
/// `"balt_ncat_house_3"` yields `("balt_ncat_", "house", 3)`. Names that
/// end in no known category get an empty prefix and the whole stem as
/// their category. Returns `None` if the name has no `_<index>` suffix.
pub fn split_name(name: &str) -> Option<(&str, &str, u32)> {
    let (stem, index) = name.rsplit_once('_')?;
    let index = index.parse().ok()?;
    for category in Category::BUILTIN.iter() {
        if let Some(prefix) = stem.strip_suffix(category.as_str()) {
            return Some((prefix, &stem[prefix.len()..], index));
        }
    }
    Some(("", stem, index))
}

fn quote(id: &str) -> String {
    format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Render `graph` as a Graphviz `digraph`.
///
/// Components are grouped into one cluster per naming prefix, with a
/// nested cluster per category. Each connected link becomes an edge
/// labelled with its name and delay; dangling links are omitted.
/// Output order follows registration order.
pub fn to_dot(graph: &GraphExport) -> String {
    let mut groups: IndexMap<&str, IndexMap<&str, Vec<&str>>> = IndexMap::new();
    let mut loose = Vec::new();
    for component in &graph.components {
        match split_name(&component.name) {
            Some((prefix, category, _)) => groups
                .entry(prefix)
                .or_default()
                .entry(category)
                .or_default()
                .push(component.name.as_str()),
            None => loose.push(component.name.as_str()),
        }
    }

    let mut out = String::from("digraph townplan {\n    node [shape=box];\n");
    let mut cluster = 0usize;
    for (prefix, categories) in &groups {
        let indent = if prefix.is_empty() {
            "    "
        } else {
            let _ = writeln!(out, "    subgraph cluster_{cluster} {{");
            let _ = writeln!(out, "        label={};", quote(prefix.trim_end_matches('_')));
            cluster += 1;
            "        "
        };
        for (category, names) in categories {
            let _ = writeln!(out, "{indent}subgraph cluster_{cluster} {{");
            let _ = writeln!(out, "{indent}    label={};", quote(category));
            cluster += 1;
            for name in names {
                let _ = writeln!(out, "{indent}    {};", quote(name));
            }
            let _ = writeln!(out, "{indent}}}");
        }
        if !prefix.is_empty() {
            out.push_str("    }\n");
        }
    }
    for name in loose {
        let _ = writeln!(out, "    {};", quote(name));
    }

    for link in &graph.links {
        if let Some([a, b]) = &link.ends {
            let _ = writeln!(
                out,
                "    {} -> {} [label={}, taillabel={}, headlabel={}];",
                quote(&a.component),
                quote(&b.component),
                quote(&format!("{} ({})", link.name, link.delay)),
                quote(a.port.as_str()),
                quote(b.port.as_str()),
            );
        }
    }
    out.push_str("}\n");
    out
}

//! Mermaid flowchart export.
//!
//! Every environment, datacenter and area opens a `subgraph` block; the
//! blocks nest by emission order. Connections between components of the same
//! datacenter are written inside that datacenter's block, all others after
//! the last block, so no edge refers to a node declared in a block that is
//! not yet open.

use std::{borrow::Cow, collections::HashSet, fmt::Write};

use indexmap::IndexMap;
use log::{debug, info, trace, warn};

use topofac_core::{
    identifier::ComponentId,
    topology::{Connection, Topology},
};

use super::{
    Artifact, EMPTY_PLACEHOLDER, Error, Format, RenderStats, Renderer, device_style, device_styles,
};
use crate::layout::Layout;

/// Renders Mermaid flowcharts.
///
/// The flowchart direction follows the layout's principal direction.
#[derive(Debug, Default, Clone, Copy)]
pub struct MermaidRenderer;

impl MermaidRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for MermaidRenderer {
    fn format(&self) -> Format {
        Format::Mermaid
    }

    fn render(&self, topology: &Topology, layout: &Layout) -> Result<Artifact, Error> {
        info!(
            components = topology.components().len(),
            connections = topology.connections().len();
            "Rendering Mermaid flowchart"
        );

        let mut out = String::new();
        writeln!(out, "flowchart {}", layout.direction().as_flowchart_str())?;
        for style in device_styles() {
            writeln!(
                out,
                "classDef {} stroke:{},stroke-width:{}px,color:{};",
                style.class, style.stroke, style.stroke_width, style.font
            )?;
        }

        if topology.is_empty() || layout.is_empty() {
            debug!("Empty topology, rendering placeholder");
            writeln!(out, "empty[\"{EMPTY_PLACEHOLDER}\"]:::unknown")?;
            return Ok(Artifact::new(Format::Mermaid, out, RenderStats::default()));
        }

        let (local, cross) = partition(topology);
        let mut flowchart = Flowchart {
            out,
            emitted: HashSet::new(),
            stats: RenderStats::default(),
        };

        for (e, env) in layout.environments().iter().enumerate() {
            flowchart.open(0, &subgraph_id(&[e]), env.name())?;
            for (d, dc) in env.datacenters().iter().enumerate() {
                flowchart.open(1, &subgraph_id(&[e, d]), dc.name())?;
                for (a, area) in dc.areas().iter().enumerate() {
                    let area_id = subgraph_id(&[e, d, a]);
                    flowchart.open(2, &area_id, area.name())?;
                    for component_box in area.components() {
                        flowchart.node(topology, component_box.id())?;
                    }
                    flowchart.close(2)?;
                }

                let edges = local.get(&(env.name(), dc.name()));
                for connection in edges.into_iter().flatten() {
                    flowchart.edge(2, connection)?;
                }
                flowchart.close(1)?;
            }
            flowchart.close(0)?;
        }

        for connection in cross {
            flowchart.edge(0, connection)?;
        }

        let stats = flowchart.stats;
        debug!(
            components = stats.components,
            connections = stats.connections,
            dropped = stats.dropped_connections;
            "Mermaid flowchart rendered"
        );
        Ok(Artifact::new(Format::Mermaid, flowchart.out, stats))
    }
}

type Scope<'a> = (&'a str, &'a str);

/// Splits connections into those inside one datacenter, keyed by that
/// datacenter, and all others.
fn partition(topology: &Topology) -> (IndexMap<Scope<'_>, Vec<&Connection>>, Vec<&Connection>) {
    let mut local: IndexMap<Scope<'_>, Vec<&Connection>> = IndexMap::new();
    let mut cross = Vec::new();

    for connection in topology.connections() {
        let source = topology.component(connection.source());
        let target = topology.component(connection.target());
        match (source, target) {
            (Some(source), Some(target))
                if source.environment() == target.environment()
                    && source.datacenter() == target.datacenter() =>
            {
                local
                    .entry((source.environment(), source.datacenter()))
                    .or_default()
                    .push(connection);
            }
            _ => cross.push(connection),
        }
    }

    (local, cross)
}

struct Flowchart<'a> {
    out: String,
    emitted: HashSet<&'a ComponentId>,
    stats: RenderStats,
}

impl<'a> Flowchart<'a> {
    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push_str("  ");
        }
    }

    fn open(&mut self, depth: usize, id: &str, label: &str) -> Result<(), Error> {
        self.indent(depth);
        writeln!(self.out, "subgraph {id}[\"{}\"]", escape_label(label))?;
        Ok(())
    }

    fn close(&mut self, depth: usize) -> Result<(), Error> {
        self.indent(depth);
        writeln!(self.out, "end")?;
        Ok(())
    }

    fn node(&mut self, topology: &'a Topology, id: &ComponentId) -> Result<(), Error> {
        let Some(component) = topology.component(id) else {
            warn!(id = id.as_str(); "Layout box has no component, skipping");
            return Ok(());
        };

        self.indent(3);
        writeln!(
            self.out,
            "{}[\"{}\"]:::{}",
            component.id(),
            escape_label(component.name()),
            device_style(component.device_type()).class
        )?;
        self.emitted.insert(component.id());
        self.stats.components += 1;
        Ok(())
    }

    fn edge(&mut self, depth: usize, connection: &Connection) -> Result<(), Error> {
        if !self.emitted.contains(connection.source()) || !self.emitted.contains(connection.target()) {
            warn!(
                connection = connection.id(),
                source = connection.source().as_str(),
                target = connection.target().as_str();
                "Connection endpoint was not rendered, dropping edge"
            );
            self.stats.dropped_connections += 1;
            return Ok(());
        }

        self.indent(depth);
        if connection.description().is_empty() {
            writeln!(self.out, "{} --> {}", connection.source(), connection.target())?;
        } else {
            writeln!(
                self.out,
                "{} -->|{}| {}",
                connection.source(),
                escape_label(connection.description()),
                connection.target()
            )?;
        }
        trace!(connection = connection.id(), depth; "Edge written");
        self.stats.connections += 1;
        Ok(())
    }
}

/// Returns the subgraph identifier for a block, from the position of each
/// level in its parent.
///
/// Every `_` in a component identity is followed by `_` or a hex digit, so
/// the `_n` steps here never clash with a node identifier.
///
/// # Examples
///
/// ```
/// # use topofac::export::mermaid::subgraph_id;
/// assert_eq!(subgraph_id(&[0]), "sg_n0");
/// assert_eq!(subgraph_id(&[1, 0, 2]), "sg_n1_n0_n2");
/// ```
pub fn subgraph_id(path: &[usize]) -> String {
    path.iter().fold(String::from("sg"), |mut id, index| {
        id.push_str(&format!("_n{index}"));
        id
    })
}

/// Escapes characters that end a Mermaid label, using Mermaid entity codes.
pub fn escape_label(text: &str) -> Cow<'_, str> {
    if !text.contains(['"', '|']) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace('"', "#quot;").replace('|', "#124;"))
}

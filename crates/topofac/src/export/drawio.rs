//! draw.io (mxGraph) export.
//!
//! Environments, datacenters and areas become nested swimlane cells and
//! components become leaf cells inside their area. mxGraph positions a child
//! relative to its parent cell, so layout boxes are written as they are.

use std::{borrow::Cow, collections::HashMap, fmt::Write};

use log::{debug, info, warn};

use topofac_core::{
    geometry::Bounds,
    identifier::ComponentId,
    topology::{Component, Connection, Topology},
};

use super::{Artifact, EMPTY_PLACEHOLDER, Error, Format, RenderStats, Renderer, device_style};
use crate::layout::Layout;

const ENVIRONMENT_FILL: &str = "#E3F2FD";
const DATACENTER_FILL: &str = "#F3E5F5";
const AREA_FILL: &str = "#E8F5E8";

const EDGE_STYLE: &str = "edgeStyle=orthogonalEdgeStyle;rounded=0;orthogonalLoop=1;jettySize=auto;html=1;\
strokeColor=#666666;strokeWidth=2;fontColor=#333333;fontSize=10;";

/// Smallest page, A4 portrait in draw.io units.
const MIN_PAGE: (f32, f32) = (827.0, 1169.0);

/// Renders draw.io documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct DrawIoRenderer;

impl DrawIoRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DrawIoRenderer {
    fn format(&self) -> Format {
        Format::DrawIo
    }

    fn render(&self, topology: &Topology, layout: &Layout) -> Result<Artifact, Error> {
        info!(
            components = topology.components().len(),
            connections = topology.connections().len();
            "Rendering draw.io document"
        );

        if topology.is_empty() || layout.is_empty() {
            debug!("Empty topology, rendering placeholder");
            let content = document(topology.name(), MIN_PAGE, &placeholder_cell()?)?;
            return Ok(Artifact::new(Format::DrawIo, content, RenderStats::default()));
        }

        let mut cells = Cells::default();
        for env in layout.environments() {
            let env_id = cells.container("env", env.name(), env.bounds(), ENVIRONMENT_FILL, "1")?;
            for dc in env.datacenters() {
                let dc_id = cells.container("dc", dc.name(), dc.bounds(), DATACENTER_FILL, &env_id)?;
                for area in dc.areas() {
                    let area_id = cells.container("area", area.name(), area.bounds(), AREA_FILL, &dc_id)?;
                    for component_box in area.components() {
                        match topology.component(component_box.id()) {
                            Some(component) => {
                                cells.component(component, component_box.bounds(), &area_id)?
                            }
                            None => warn!(
                                id = component_box.id().as_str();
                                "Layout box has no component, skipping"
                            ),
                        }
                    }
                }
            }
        }

        for connection in topology.connections() {
            cells.edge(connection)?;
        }

        let page = layout.bounds().map_or(MIN_PAGE, |bounds| {
            (
                (bounds.max_x() + bounds.min_x()).ceil().max(MIN_PAGE.0),
                (bounds.max_y() + bounds.min_y()).ceil().max(MIN_PAGE.1),
            )
        });

        let stats = cells.stats;
        let content = document(topology.name(), page, &cells.out)?;
        debug!(
            components = stats.components,
            connections = stats.connections,
            dropped = stats.dropped_connections;
            "draw.io document rendered"
        );
        Ok(Artifact::new(Format::DrawIo, content, stats))
    }
}

/// Accumulates `mxCell` elements.
///
/// Cell identifiers come from one counter starting after the two root cells,
/// with a prefix naming the kind of cell.
struct Cells<'a> {
    out: String,
    next_id: usize,
    nodes: HashMap<&'a ComponentId, String>,
    stats: RenderStats,
}

impl Default for Cells<'_> {
    fn default() -> Self {
        Self {
            out: String::new(),
            next_id: 2,
            nodes: HashMap::new(),
            stats: RenderStats::default(),
        }
    }
}

impl<'a> Cells<'a> {
    fn allocate(&mut self, prefix: &str) -> String {
        let id = format!("{prefix}_{}", self.next_id);
        self.next_id += 1;
        id
    }

    fn container(
        &mut self,
        prefix: &str,
        label: &str,
        bounds: Bounds,
        fill: &str,
        parent: &str,
    ) -> Result<String, Error> {
        let id = self.allocate(prefix);
        writeln!(
            self.out,
            r#"        <mxCell id="{id}" value="{}" style="swimlane;whiteSpace=wrap;html=1;fillColor={fill};strokeColor=#CCCCCC;fontStyle=1;" vertex="1" parent="{parent}">"#,
            escape_xml(label),
        )?;
        self.geometry(bounds)?;
        Ok(id)
    }

    fn component(&mut self, component: &'a Component, bounds: Bounds, parent: &str) -> Result<(), Error> {
        let id = self.allocate("comp");
        let style = device_style(component.device_type());
        writeln!(
            self.out,
            r#"        <mxCell id="{id}" value="{}" style="shape=rect;fillColor=none;strokeColor={};strokeWidth={};fontColor={};fontSize=12;fontStyle={};whiteSpace=wrap;html=1;" vertex="1" parent="{parent}">"#,
            escape_xml(component.name()),
            style.stroke,
            style.stroke_width,
            style.font,
            u8::from(style.bold),
        )?;
        self.geometry(bounds)?;

        self.nodes.insert(component.id(), id);
        self.stats.components += 1;
        Ok(())
    }

    fn edge(&mut self, connection: &Connection) -> Result<(), Error> {
        let (Some(source), Some(target)) = (
            self.nodes.get(connection.source()),
            self.nodes.get(connection.target()),
        ) else {
            warn!(
                connection = connection.id(),
                source = connection.source().as_str(),
                target = connection.target().as_str();
                "Connection endpoint was not rendered, dropping edge"
            );
            self.stats.dropped_connections += 1;
            return Ok(());
        };
        let (source, target) = (source.clone(), target.clone());

        let id = self.allocate("edge");
        writeln!(
            self.out,
            r#"        <mxCell id="{id}" value="{}" style="{EDGE_STYLE}" edge="1" parent="1" source="{source}" target="{target}">"#,
            escape_xml(connection.description()),
        )?;
        writeln!(self.out, r#"          <mxGeometry relative="1" as="geometry"/>"#)?;
        writeln!(self.out, "        </mxCell>")?;

        self.stats.connections += 1;
        Ok(())
    }

    /// Writes the geometry of a vertex and closes its cell.
    fn geometry(&mut self, bounds: Bounds) -> Result<(), Error> {
        writeln!(
            self.out,
            r#"          <mxGeometry x="{}" y="{}" width="{}" height="{}" as="geometry"/>"#,
            bounds.min_x(),
            bounds.min_y(),
            bounds.width(),
            bounds.height(),
        )?;
        writeln!(self.out, "        </mxCell>")?;
        Ok(())
    }
}

fn placeholder_cell() -> Result<String, Error> {
    let mut out = String::new();
    writeln!(
        out,
        r#"        <mxCell id="2" value="{EMPTY_PLACEHOLDER}" style="text;html=1;strokeColor=none;fillColor=none;align=center;verticalAlign=middle;whiteSpace=wrap;rounded=0;fontSize=16;fontColor=#999999;" vertex="1" parent="1">"#
    )?;
    writeln!(out, r#"          <mxGeometry x="300" y="200" width="200" height="30" as="geometry"/>"#)?;
    writeln!(out, "        </mxCell>")?;
    Ok(out)
}

fn document(name: &str, page: (f32, f32), cells: &str) -> Result<String, Error> {
    let mut out = String::new();
    writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        out,
        r#"<mxfile host="topofac" agent="topofac {}" version="24.0.0">"#,
        env!("CARGO_PKG_VERSION"),
    )?;
    writeln!(out, r#"  <diagram name="{}" id="topology">"#, escape_xml(name))?;
    writeln!(
        out,
        r#"    <mxGraphModel dx="2000" dy="1200" grid="1" gridSize="10" guides="1" tooltips="1" connect="1" arrows="1" fold="1" page="1" pageScale="1" pageWidth="{}" pageHeight="{}" math="0" shadow="0">"#,
        page.0, page.1,
    )?;
    writeln!(out, "      <root>")?;
    writeln!(out, r#"        <mxCell id="0"/>"#)?;
    writeln!(out, r#"        <mxCell id="1" parent="0"/>"#)?;
    out.push_str(cells);
    writeln!(out, "      </root>")?;
    writeln!(out, "    </mxGraphModel>")?;
    writeln!(out, "  </diagram>")?;
    writeln!(out, "</mxfile>")?;
    Ok(out)
}

/// Escapes the five XML metacharacters.
///
/// # Examples
///
/// ```
/// # use topofac::export::drawio::escape_xml;
/// assert_eq!(escape_xml("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
/// assert_eq!(escape_xml("路由器"), "路由器");
/// ```
pub fn escape_xml(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::fixtures;

    fn render(topology: &Topology, layout: &Layout) -> Artifact {
        DrawIoRenderer::new().render(topology, layout).unwrap()
    }

    #[test]
    fn test_round_trip_document() {
        let (topology, layout) = fixtures::laid_out(fixtures::ROUND_TRIP);
        let artifact = render(&topology, &layout);
        let xml = artifact.content();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"<mxCell id="0"/>"#));
        assert!(xml.contains(r#"<mxCell id="1" parent="0"/>"#));
        assert!(xml.contains(r#"<mxCell id="env_2" value="生产网""#));
        assert!(xml.contains(r#"<mxCell id="dc_3" value="亦庄""#));
        assert!(xml.contains(r#"parent="env_2""#));
        assert!(xml.contains(r#"<mxCell id="area_4" value="核心区""#));
        assert!(xml.contains(r#"<mxCell id="comp_5" value="路由器1""#));
        assert!(xml.contains(r#"<mxCell id="comp_6" value="交换机1""#));
        assert!(xml.contains(r#"source="comp_5" target="comp_6""#));
        assert!(xml.contains(r#"value="路由器1 连接 交换机1""#));
        assert!(xml.trim_end().ends_with("</mxfile>"));

        assert_eq!(
            artifact.stats(),
            RenderStats {
                components: 2,
                connections: 1,
                dropped_connections: 0,
            }
        );
        assert_eq!(artifact.len(), xml.chars().count());
    }

    #[test]
    fn test_component_style_follows_device_type() {
        let (topology, layout) = fixtures::laid_out(fixtures::MIXED);
        let xml = render(&topology, &layout).into_content();

        assert!(xml.contains("strokeColor=#2196F3"), "router");
        assert!(xml.contains("strokeColor=#F44336"), "firewall");
        assert!(xml.contains("strokeColor=#9C27B0"), "load balancer");
        assert!(xml.contains("strokeColor=#FF9800"), "server");
        assert!(xml.contains("strokeColor=#9E9E9E;strokeWidth=1"), "unknown");
    }

    #[test]
    fn test_labels_are_escaped() {
        let (topology, layout) = fixtures::laid_out(fixtures::MIXED);
        let xml = render(&topology, &layout).into_content();

        assert!(xml.contains("Web服务器&quot;A&quot;"));
        assert!(xml.contains("打印机&lt;1&gt;"));
        assert!(!xml.contains("打印机<1>"));
    }

    #[test]
    fn test_children_use_parent_relative_geometry() {
        let (topology, layout) = fixtures::laid_out(fixtures::ROUND_TRIP);
        let xml = render(&topology, &layout).into_content();

        let area = &layout.environments()[0].datacenters()[0].areas()[0];
        let first = area.components()[0].bounds();
        let expected = format!(
            r#"<mxGeometry x="{}" y="{}" width="{}" height="{}" as="geometry"/>"#,
            first.min_x(),
            first.min_y(),
            first.width(),
            first.height()
        );
        assert!(xml.contains(&expected), "{expected}");
    }

    #[test]
    fn test_dangling_connection_is_dropped() {
        let (topology, layout) = fixtures::dangling();
        let artifact = render(&topology, &layout);

        assert_eq!(artifact.stats().connections, 1);
        assert_eq!(artifact.stats().dropped_connections, 1);
        assert_eq!(artifact.content().matches(r#"edge="1""#).count(), 1);
    }

    #[test]
    fn test_empty_topology_renders_placeholder() {
        let (topology, layout) = fixtures::empty();
        let artifact = render(&topology, &layout);

        assert!(artifact.content().contains(EMPTY_PLACEHOLDER));
        assert!(artifact.content().contains(r#"<mxCell id="1" parent="0"/>"#));
        assert_eq!(artifact.stats(), RenderStats::default());
    }

    #[test]
    fn test_escape_xml_all_metacharacters() {
        assert_eq!(escape_xml(r#"&<>"'"#), "&amp;&lt;&gt;&quot;&#39;");
    }
}

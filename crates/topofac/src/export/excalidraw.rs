//! Excalidraw scene export.
//!
//! Excalidraw has no nesting, so every rectangle gets absolute coordinates,
//! summed from the layout's parent-relative boxes in one top-down walk.
//! Labels are bound to their rectangle and arrows to the two component
//! rectangles they join; both sides of every binding are recorded so the
//! editor keeps labels and arrows attached when a box is moved.
//!
//! Elements live in an arena and refer to each other by index while the
//! scene is built. Identifiers and seeds derive from the arena index, so the
//! output is a pure function of the topology.

use std::collections::HashMap;

use log::{debug, info, trace, warn};
use serde::Serialize;

use topofac_core::{
    color::Color,
    geometry::{Bounds, Point, Size},
    identifier::ComponentId,
    topology::{Connection, Topology},
};

use super::{Artifact, EMPTY_PLACEHOLDER, Error, Format, RenderStats, Renderer, device_style};
use crate::layout::{Layout, offset};

const ENVIRONMENT_STROKE: &str = "#90CAF9";
const DATACENTER_STROKE: &str = "#E1BEE7";
const AREA_STROKE: &str = "#A5D6A7";
const INK: &str = "#1e1e1e";
const TRANSPARENT: &str = "transparent";

const LABEL_HEIGHT: f32 = 24.0;
const LABEL_TOP: f32 = 8.0;

/// Renders Excalidraw scenes.
#[derive(Debug, Clone)]
pub struct ExcalidrawRenderer {
    background: String,
}

impl Default for ExcalidrawRenderer {
    fn default() -> Self {
        Self {
            background: "#ffffff".to_string(),
        }
    }
}

impl ExcalidrawRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the view background color of the scene.
    pub fn with_background(mut self, color: &Color) -> Self {
        self.background = color.as_str().to_string();
        self
    }
}

impl Renderer for ExcalidrawRenderer {
    fn format(&self) -> Format {
        Format::Excalidraw
    }

    fn render(&self, topology: &Topology, layout: &Layout) -> Result<Artifact, Error> {
        info!(
            components = topology.components().len(),
            connections = topology.connections().len();
            "Rendering Excalidraw scene"
        );

        let mut scene = Scene::default();
        let mut stats = RenderStats::default();

        if topology.is_empty() || layout.is_empty() {
            debug!("Empty topology, rendering placeholder");
            let bounds = Bounds::new_from_top_left(Point::new(300.0, 200.0), Size::new(200.0, 30.0));
            scene.text(EMPTY_PLACEHOLDER, bounds);
        } else {
            let rectangles = scene.containers(topology, layout);
            stats.components = rectangles.len();

            for connection in topology.connections() {
                if scene.connect(&rectangles, connection).is_some() {
                    stats.connections += 1;
                } else {
                    warn!(
                        connection = connection.id(),
                        source = connection.source().as_str(),
                        target = connection.target().as_str();
                        "Connection endpoint was not rendered, dropping arrow"
                    );
                    stats.dropped_connections += 1;
                }
            }
        }

        let document = Document {
            kind: "excalidraw",
            version: 2,
            source: "topofac",
            elements: &scene.elements,
            app_state: AppState {
                grid_size: 10,
                view_background_color: &self.background,
                current_item_stroke_color: INK,
                current_item_background_color: TRANSPARENT,
                current_item_end_arrowhead: "arrow",
                scroll_x: 0.0,
                scroll_y: 0.0,
                zoom: Zoom { value: 1.0 },
                view_mode_enabled: false,
                theme: "light",
            },
            files: serde_json::Map::new(),
        };
        let content = serde_json::to_string_pretty(&document)?;

        debug!(
            elements = scene.elements.len(),
            components = stats.components,
            connections = stats.connections,
            dropped = stats.dropped_connections;
            "Excalidraw scene rendered"
        );
        Ok(Artifact::new(Format::Excalidraw, content, stats))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Document<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    version: u32,
    source: &'static str,
    elements: &'a [Element],
    app_state: AppState<'a>,
    files: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AppState<'a> {
    grid_size: u32,
    view_background_color: &'a str,
    current_item_stroke_color: &'static str,
    current_item_background_color: &'static str,
    current_item_end_arrowhead: &'static str,
    scroll_x: f32,
    scroll_y: f32,
    zoom: Zoom,
    view_mode_enabled: bool,
    theme: &'static str,
}

#[derive(Debug, Serialize)]
struct Zoom {
    value: f32,
}

/// Position of an element in the scene arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ElementIndex(usize);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Element {
    id: String,
    #[serde(flatten)]
    kind: ElementKind,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    angle: f32,
    stroke_color: String,
    background_color: &'static str,
    fill_style: &'static str,
    stroke_width: u32,
    stroke_style: &'static str,
    roughness: u32,
    opacity: u32,
    group_ids: Vec<String>,
    seed: u32,
    version: u32,
    version_nonce: u32,
    is_deleted: bool,
    bound_elements: Vec<BoundElement>,
    updated: u64,
    link: Option<String>,
    locked: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
enum ElementKind {
    Rectangle {
        roundness: Roundness,
    },
    Text {
        text: String,
        font_size: u32,
        font_family: u32,
        text_align: &'static str,
        vertical_align: &'static str,
        baseline: u32,
        container_id: Option<String>,
        original_text: String,
        line_height: f32,
    },
    Arrow {
        roundness: Roundness,
        start_binding: Option<Binding>,
        end_binding: Option<Binding>,
        start_arrowhead: Option<&'static str>,
        end_arrowhead: Option<&'static str>,
        points: Vec<[f32; 2]>,
    },
}

impl ElementKind {
    fn prefix(&self) -> &'static str {
        match self {
            ElementKind::Rectangle { .. } => "rect",
            ElementKind::Text { .. } => "text",
            ElementKind::Arrow { .. } => "arrow",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
struct Roundness {
    #[serde(rename = "type")]
    kind: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Binding {
    element_id: String,
    focus: f32,
    gap: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct BoundElement {
    id: String,
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Derives a 31-bit pseudo-random value from an arena index.
fn seed(index: usize, salt: u64) -> u32 {
    let mixed = (index as u64 + 1).wrapping_mul(2_654_435_761) ^ salt;
    (mixed & 0x7fff_ffff) as u32
}

#[derive(Debug, Default)]
struct Scene {
    elements: Vec<Element>,
}

impl Scene {
    fn push(&mut self, kind: ElementKind, bounds: Bounds, stroke: &str) -> ElementIndex {
        let index = self.elements.len();
        let (fill_style, stroke_width) = match kind {
            ElementKind::Rectangle { .. } => ("hachure", 1),
            ElementKind::Text { .. } => ("solid", 1),
            ElementKind::Arrow { .. } => ("solid", 2),
        };

        self.elements.push(Element {
            id: format!("{}_{index}", kind.prefix()),
            kind,
            x: bounds.min_x(),
            y: bounds.min_y(),
            width: bounds.width(),
            height: bounds.height(),
            angle: 0.0,
            stroke_color: stroke.to_string(),
            background_color: TRANSPARENT,
            fill_style,
            stroke_width,
            stroke_style: "solid",
            roughness: 1,
            opacity: 100,
            group_ids: Vec::new(),
            seed: seed(index, 0),
            version: 1,
            version_nonce: seed(index, 0x5bd1_e995),
            is_deleted: false,
            bound_elements: Vec::new(),
            updated: 1,
            link: None,
            locked: false,
        });
        ElementIndex(index)
    }

    fn bounds(&self, index: ElementIndex) -> Bounds {
        let element = &self.elements[index.0];
        Bounds::new_from_top_left(
            Point::new(element.x, element.y),
            Size::new(element.width, element.height),
        )
    }

    fn text(&mut self, text: &str, bounds: Bounds) -> ElementIndex {
        let kind = ElementKind::Text {
            text: text.to_string(),
            font_size: 16,
            font_family: 1,
            text_align: "center",
            vertical_align: "top",
            baseline: 18,
            container_id: None,
            original_text: text.to_string(),
            line_height: 1.2,
        };
        self.push(kind, bounds, INK)
    }

    /// Adds a rectangle at absolute `bounds` with `label` bound to it.
    fn labeled_rectangle(&mut self, bounds: Bounds, stroke: &str, label: &str) -> ElementIndex {
        let rectangle = self.push(
            ElementKind::Rectangle {
                roundness: Roundness { kind: 3 },
            },
            bounds,
            stroke,
        );

        let label_bounds = Bounds::new_from_top_left(
            Point::new(bounds.min_x(), bounds.min_y() + LABEL_TOP),
            Size::new(bounds.width(), LABEL_HEIGHT),
        );
        let text = self.text(label, label_bounds);
        self.bind_label(rectangle, text);
        rectangle
    }

    fn bind_label(&mut self, container: ElementIndex, label: ElementIndex) {
        let container_id = self.elements[container.0].id.clone();
        let label_id = self.elements[label.0].id.clone();

        if let ElementKind::Text { container_id: slot, .. } = &mut self.elements[label.0].kind {
            *slot = Some(container_id);
        }
        self.elements[container.0].bound_elements.push(BoundElement {
            id: label_id,
            kind: "text",
        });
    }

    fn bind_arrow(&mut self, arrow: ElementIndex, start: ElementIndex, end: ElementIndex) {
        let arrow_id = self.elements[arrow.0].id.clone();
        let binding = |element: &Element| Binding {
            element_id: element.id.clone(),
            focus: 0.0,
            gap: 1.0,
        };
        let start_binding = binding(&self.elements[start.0]);
        let end_binding = binding(&self.elements[end.0]);

        if let ElementKind::Arrow {
            start_binding: start_slot,
            end_binding: end_slot,
            ..
        } = &mut self.elements[arrow.0].kind
        {
            *start_slot = Some(start_binding);
            *end_slot = Some(end_binding);
        }

        let bound = BoundElement {
            id: arrow_id,
            kind: "arrow",
        };
        for container in [start, end] {
            let bound_elements = &mut self.elements[container.0].bound_elements;
            if !bound_elements.contains(&bound) {
                bound_elements.push(bound.clone());
            }
        }
    }

    /// Adds the rectangles of every layout box, returning the component
    /// rectangles by component identity.
    fn containers<'a>(
        &mut self,
        topology: &'a Topology,
        layout: &Layout,
    ) -> HashMap<&'a ComponentId, ElementIndex> {
        let mut rectangles = HashMap::new();

        for env in layout.environments() {
            let env_abs = env.bounds();
            self.labeled_rectangle(env_abs, ENVIRONMENT_STROKE, env.name());

            for dc in env.datacenters() {
                let dc_abs = offset(env_abs, dc.bounds());
                self.labeled_rectangle(dc_abs, DATACENTER_STROKE, dc.name());

                for area in dc.areas() {
                    let area_abs = offset(dc_abs, area.bounds());
                    self.labeled_rectangle(area_abs, AREA_STROKE, area.name());

                    for component_box in area.components() {
                        let Some(component) = topology.component(component_box.id()) else {
                            warn!(
                                id = component_box.id().as_str();
                                "Layout box has no component, skipping"
                            );
                            continue;
                        };

                        let abs = offset(area_abs, component_box.bounds());
                        let stroke = device_style(component.device_type()).stroke;
                        let rectangle = self.labeled_rectangle(abs, stroke, component.name());
                        trace!(
                            id = component.id().as_str(),
                            x = abs.min_x(),
                            y = abs.min_y();
                            "Component rectangle placed"
                        );
                        rectangles.insert(component.id(), rectangle);
                    }
                }
            }
        }

        rectangles
    }

    /// Adds an arrow between the centers of the two endpoint rectangles, or
    /// returns `None` if either endpoint has no rectangle.
    fn connect(
        &mut self,
        rectangles: &HashMap<&ComponentId, ElementIndex>,
        connection: &Connection,
    ) -> Option<ElementIndex> {
        let start = *rectangles.get(connection.source())?;
        let end = *rectangles.get(connection.target())?;

        let from = self.bounds(start).center();
        let to = self.bounds(end).center();
        let delta = to.sub_point(from);

        let kind = ElementKind::Arrow {
            roundness: Roundness { kind: 2 },
            start_binding: None,
            end_binding: None,
            start_arrowhead: None,
            end_arrowhead: Some("arrow"),
            points: vec![[0.0, 0.0], [delta.x(), delta.y()]],
        };
        let bounds = Bounds::new_from_top_left(from, Size::new(delta.x().abs(), delta.y().abs()));
        let arrow = self.push(kind, bounds, INK);
        self.bind_arrow(arrow, start, end);
        Some(arrow)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;
    use serde_json::Value;

    use super::*;
    use crate::export::fixtures;

    fn render(topology: &Topology, layout: &Layout) -> (Artifact, Value) {
        let artifact = ExcalidrawRenderer::new().render(topology, layout).unwrap();
        let json = serde_json::from_str(artifact.content()).unwrap();
        (artifact, json)
    }

    fn elements(json: &Value) -> &Vec<Value> {
        json["elements"].as_array().unwrap()
    }

    fn find<'v>(json: &'v Value, id: &str) -> &'v Value {
        elements(json)
            .iter()
            .find(|element| element["id"] == id)
            .unwrap()
    }

    fn component_rect<'v>(json: &'v Value, label: &str) -> &'v Value {
        let text = elements(json)
            .iter()
            .find(|element| element["type"] == "text" && element["text"] == label)
            .unwrap();
        find(json, text["containerId"].as_str().unwrap())
    }

    fn f32_of(value: &Value) -> f32 {
        value.as_f64().unwrap() as f32
    }

    #[test]
    fn test_document_envelope() {
        let (topology, layout) = fixtures::laid_out(fixtures::ROUND_TRIP);
        let (artifact, json) = render(&topology, &layout);

        assert_eq!(json["type"], "excalidraw");
        assert_eq!(json["version"], 2);
        assert_eq!(json["appState"]["viewBackgroundColor"], "#ffffff");
        assert_eq!(json["appState"]["gridSize"], 10);
        assert_eq!(json["files"], serde_json::json!({}));

        // A rectangle and a label for each of the three containers and two
        // components, plus one arrow.
        assert_eq!(elements(&json).len(), 11);
        assert_eq!(
            artifact.stats(),
            RenderStats {
                components: 2,
                connections: 1,
                dropped_connections: 0,
            }
        );
    }

    #[test]
    fn test_rectangles_use_absolute_coordinates() {
        let (topology, layout) = fixtures::laid_out(fixtures::ROUND_TRIP);
        let (_, json) = render(&topology, &layout);

        let env = &layout.environments()[0];
        let dc = &env.datacenters()[0];
        let area = &dc.areas()[0];
        let component = &area.components()[0];
        let expected = env.absolute(&[dc.bounds(), area.bounds(), component.bounds()]);

        let rect = component_rect(&json, "路由器1");
        assert!(approx_eq!(f32, f32_of(&rect["x"]), expected.min_x()));
        assert!(approx_eq!(f32, f32_of(&rect["y"]), expected.min_y()));
        assert!(approx_eq!(f32, f32_of(&rect["width"]), expected.width()));
        assert_eq!(rect["strokeColor"], "#2196F3");

        let area_label = elements(&json)
            .iter()
            .find(|element| element["text"] == "核心区")
            .unwrap();
        let area_rect = find(&json, area_label["containerId"].as_str().unwrap());
        let area_abs = env.absolute(&[dc.bounds(), area.bounds()]);
        assert!(approx_eq!(f32, f32_of(&area_rect["x"]), area_abs.min_x()));
        assert_eq!(area_rect["strokeColor"], AREA_STROKE);
    }

    #[test]
    fn test_bindings_are_bidirectional() {
        let (topology, layout) = fixtures::laid_out(fixtures::ROUND_TRIP);
        let (_, json) = render(&topology, &layout);

        let arrow = elements(&json)
            .iter()
            .find(|element| element["type"] == "arrow")
            .unwrap();
        let source = component_rect(&json, "路由器1");
        let target = component_rect(&json, "交换机1");

        assert_eq!(arrow["startBinding"]["elementId"], source["id"]);
        assert_eq!(arrow["endBinding"]["elementId"], target["id"]);

        for rect in [source, target] {
            let bound = rect["boundElements"].as_array().unwrap();
            assert!(bound.iter().any(|b| b["id"] == arrow["id"] && b["type"] == "arrow"));
            assert!(bound.iter().any(|b| b["type"] == "text"));
        }

        for text in elements(&json).iter().filter(|e| e["type"] == "text") {
            let container = find(&json, text["containerId"].as_str().unwrap());
            let bound = container["boundElements"].as_array().unwrap();
            assert!(bound.iter().any(|b| b["id"] == text["id"]));
        }
    }

    #[test]
    fn test_arrow_joins_component_centers() {
        let (topology, layout) = fixtures::laid_out(fixtures::ROUND_TRIP);
        let (_, json) = render(&topology, &layout);

        let arrow = elements(&json)
            .iter()
            .find(|element| element["type"] == "arrow")
            .unwrap();
        let source = component_rect(&json, "路由器1");
        let target = component_rect(&json, "交换机1");

        let center = |rect: &Value| {
            (
                f32_of(&rect["x"]) + f32_of(&rect["width"]) / 2.0,
                f32_of(&rect["y"]) + f32_of(&rect["height"]) / 2.0,
            )
        };
        let (sx, sy) = center(source);
        let (tx, ty) = center(target);

        assert!(approx_eq!(f32, f32_of(&arrow["x"]), sx));
        assert!(approx_eq!(f32, f32_of(&arrow["y"]), sy));
        let end = &arrow["points"][1];
        assert!(approx_eq!(f32, f32_of(&end[0]), tx - sx));
        assert!(approx_eq!(f32, f32_of(&end[1]), ty - sy));
    }

    #[test]
    fn test_output_is_deterministic() {
        let (topology, layout) = fixtures::laid_out(fixtures::MIXED);
        let (first, _) = render(&topology, &layout);
        let (second, _) = render(&topology, &layout);
        assert_eq!(first.content(), second.content());
    }

    #[test]
    fn test_background_color() {
        let (topology, layout) = fixtures::laid_out(fixtures::ROUND_TRIP);
        let color = Color::new("#f5f5f5").unwrap();
        let artifact = ExcalidrawRenderer::new()
            .with_background(&color)
            .render(&topology, &layout)
            .unwrap();
        let json: Value = serde_json::from_str(artifact.content()).unwrap();
        assert_eq!(json["appState"]["viewBackgroundColor"], "#f5f5f5");
    }

    #[test]
    fn test_dangling_connection_is_dropped() {
        let (topology, layout) = fixtures::dangling();
        let (artifact, json) = render(&topology, &layout);

        assert_eq!(artifact.stats().connections, 1);
        assert_eq!(artifact.stats().dropped_connections, 1);
        let arrows = elements(&json).iter().filter(|e| e["type"] == "arrow").count();
        assert_eq!(arrows, 1);
    }

    #[test]
    fn test_empty_topology_renders_placeholder() {
        let (topology, layout) = fixtures::empty();
        let (artifact, json) = render(&topology, &layout);

        let elements = elements(&json);
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0]["type"], "text");
        assert_eq!(elements[0]["text"], EMPTY_PLACEHOLDER);
        assert!(elements[0]["containerId"].is_null());
        assert_eq!(artifact.stats(), RenderStats::default());
    }
}

//! TopFac - network topology diagrams from bracket-tagged text.
//!
//! Parsing, layout and rendering of network topologies. A topology is written
//! one connection per line:
//!
//! ```text
//! 【生产网】【亦庄】的【核心区】【路由器1】连接【生产网】【亦庄】的【核心区】【交换机1】
//! ```
//!
//! and rendered to draw.io, Mermaid and Excalidraw documents that share one
//! box layout.

pub mod config;
pub mod export;
pub mod layout;

mod error;

pub use topofac_core::{classify, color, direction, geometry, identifier, topology};
pub use topofac_parser::{Diagnostic, ParseError, ValidationReport};

pub use error::TopofacError;

use log::{debug, info, trace};

use topofac_core::topology::Topology;

use config::AppConfig;
use export::{
    Artifact, Format, Renderer, drawio::DrawIoRenderer, excalidraw::ExcalidrawRenderer,
    mermaid::MermaidRenderer,
};
use layout::{Engine, Layout};

/// Builder for parsing and rendering topology diagrams.
///
/// # Examples
///
/// ```rust
/// use topofac::{DiagramBuilder, config::AppConfig, export::Format};
///
/// let source = "【生产网】【亦庄】的【核心区】【路由器1】连接【生产网】【亦庄】的【核心区】【交换机1】";
///
/// let builder = DiagramBuilder::new(AppConfig::default());
///
/// // Parse source to a topology
/// let topology = builder.parse(source).expect("Failed to parse");
///
/// // Render it
/// let drawio = builder
///     .render(&topology, Format::DrawIo)
///     .expect("Failed to render");
/// assert!(drawio.content().contains("路由器1"));
///
/// // Or use default config
/// let builder = DiagramBuilder::default();
/// ```
#[derive(Debug, Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration of this builder.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse topology text.
    ///
    /// Malformed lines are skipped with a warning; see
    /// [`topofac_parser::extract`].
    ///
    /// # Errors
    ///
    /// Returns `TopofacError::Parse` if the text is blank or no line holds a
    /// connection statement.
    pub fn parse(&self, source: &str) -> Result<Topology, TopofacError> {
        info!("Parsing topology");

        let topology = topofac_parser::parse(source, &self.config.parse_config())
            .map_err(|err| TopofacError::new_parse_error(err, source))?;

        let stats = topology.statistics();
        debug!(
            environments = stats.environments,
            datacenters = stats.datacenters,
            areas = stats.areas,
            components = stats.components,
            connections = stats.connections;
            "Topology parsed successfully"
        );
        trace!(topology:?; "Parsed topology");

        for diagnostic in topofac_parser::validate_topology(&topology) {
            debug!(code:? = diagnostic.code(); "{}", diagnostic.message());
        }

        Ok(topology)
    }

    /// Check topology text without building a topology.
    pub fn validate(&self, source: &str) -> ValidationReport {
        info!("Validating topology text");
        topofac_parser::validate_text(source)
    }

    /// Calculate the box layout of a topology.
    pub fn layout(&self, topology: &Topology) -> Layout {
        Engine::new(self.config.layout()).calculate(topology)
    }

    /// Lay out and render a topology in one format.
    ///
    /// # Errors
    ///
    /// Returns `TopofacError::Config` for an invalid configuration and
    /// `TopofacError::Export` if the document cannot be serialized.
    pub fn render(&self, topology: &Topology, format: Format) -> Result<Artifact, TopofacError> {
        self.check_layout_config()?;
        let layout = self.layout(topology);
        self.render_layout(topology, &layout, format)
    }

    /// Render a topology with an already calculated layout.
    ///
    /// # Errors
    ///
    /// Same as [`DiagramBuilder::render`].
    pub fn render_layout(
        &self,
        topology: &Topology,
        layout: &Layout,
        format: Format,
    ) -> Result<Artifact, TopofacError> {
        info!(format = format.as_str(); "Rendering topology");
        let renderer = self.renderer(format)?;
        let artifact = renderer.render(topology, layout)?;
        info!(format = format.as_str(), length = artifact.len(); "Topology rendered");
        Ok(artifact)
    }

    /// Render a topology in every format from one shared layout.
    ///
    /// # Errors
    ///
    /// Same as [`DiagramBuilder::render`].
    pub fn render_all(&self, topology: &Topology) -> Result<Vec<Artifact>, TopofacError> {
        self.check_layout_config()?;
        let layout = self.layout(topology);
        Format::ALL
            .into_iter()
            .map(|format| self.render_layout(topology, &layout, format))
            .collect()
    }

    /// Serialize the parsed topology as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `TopofacError::Export` if serialization fails.
    pub fn export_json(&self, topology: &Topology) -> Result<String, TopofacError> {
        serde_json::to_string_pretty(topology).map_err(|err| TopofacError::Export(Box::new(err)))
    }

    fn check_layout_config(&self) -> Result<(), TopofacError> {
        self.config.layout().validate().map_err(TopofacError::Config)
    }

    fn renderer(&self, format: Format) -> Result<Box<dyn Renderer>, TopofacError> {
        let renderer: Box<dyn Renderer> = match format {
            Format::DrawIo => Box::new(DrawIoRenderer::new()),
            Format::Mermaid => Box::new(MermaidRenderer::new()),
            Format::Excalidraw => {
                let background = self
                    .config
                    .style()
                    .background_color()
                    .map_err(TopofacError::Config)?;
                match background {
                    Some(color) => Box::new(ExcalidrawRenderer::new().with_background(&color)),
                    None => Box::new(ExcalidrawRenderer::new()),
                }
            }
        };
        Ok(renderer)
    }
}

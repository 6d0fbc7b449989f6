//! Export of laid-out topologies.
//!
//! This module provides the [`Renderer`] trait that turns a [`Topology`] and
//! its [`Layout`] into a serialized [`Artifact`]. It is the final stage in the
//! TopFac processing pipeline.
//!
//! # Pipeline Position
//!
//! ```text
//! Topology text
//!     ↓ parse
//! Topology
//!     ↓ layout
//! Layout
//!     ↓ export (this module)
//! Artifact
//! ```
//!
//! # Available Backends
//!
//! - [`drawio`] - nested swimlane document using parent-relative coordinates
//! - [`mermaid`] - flowchart text with one subgraph per hierarchy level
//! - [`excalidraw`] - flat scene graph with absolute coordinates and bound
//!   labels and arrows
//!
//! All backends share one layout, so hierarchy and connectivity agree across
//! formats. A connection whose endpoint was never emitted is dropped with a
//! warning and counted in [`RenderStats::dropped_connections`]; an empty
//! topology renders to a placeholder artifact.
//!
//! # Error Handling
//!
//! Export operations return [`Error`], which converts into
//! [`TopofacError::Export`] at the crate boundary.
//!
//! [`TopofacError::Export`]: crate::TopofacError::Export

pub mod drawio;
pub mod excalidraw;
pub mod mermaid;

#[cfg(test)]
mod fixtures;

use std::{fmt, str::FromStr};

use thiserror::Error;

use topofac_core::{classify::DeviceType, topology::Topology};

use crate::layout::Layout;

/// Text shown in place of a diagram when the topology has no components.
pub const EMPTY_PLACEHOLDER: &str = "暂无拓扑数据";

/// Abstraction for diagram export backends.
pub trait Renderer {
    /// Returns the format this renderer produces.
    fn format(&self) -> Format;

    /// Renders `topology`, positioned by `layout`, into an artifact.
    ///
    /// `layout` must have been calculated from `topology`.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the document cannot be serialized.
    fn render(&self, topology: &Topology, layout: &Layout) -> Result<Artifact, Error>;
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    DrawIo,
    Mermaid,
    Excalidraw,
}

impl Format {
    /// Every format, in rendering order.
    pub const ALL: [Format; 3] = [Format::DrawIo, Format::Mermaid, Format::Excalidraw];

    pub fn as_str(self) -> &'static str {
        match self {
            Format::DrawIo => "drawio",
            Format::Mermaid => "mermaid",
            Format::Excalidraw => "excalidraw",
        }
    }

    /// Returns the conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Format::DrawIo => "drawio",
            Format::Mermaid => "mmd",
            Format::Excalidraw => "excalidraw",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "drawio" | "draw.io" | "xml" => Ok(Format::DrawIo),
            "mermaid" | "mmd" => Ok(Format::Mermaid),
            "excalidraw" => Ok(Format::Excalidraw),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

/// Counts reported by every renderer.
///
/// Renderers fed the same topology report the same counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub components: usize,
    pub connections: usize,
    pub dropped_connections: usize,
}

/// A rendered diagram document.
#[derive(Debug, Clone)]
pub struct Artifact {
    format: Format,
    content: String,
    stats: RenderStats,
}

impl Artifact {
    pub fn new(format: Format, content: String, stats: RenderStats) -> Self {
        Self {
            format,
            content,
            stats,
        }
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn into_content(self) -> String {
        self.content
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Returns the length of the document in characters.
    pub fn len(&self) -> usize {
        self.content.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Stroke and font colors of a component, by device type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DeviceStyle {
    pub class: &'static str,
    pub stroke: &'static str,
    pub font: &'static str,
    pub stroke_width: u32,
    pub bold: bool,
}

const DEVICE_STYLES: [(DeviceType, DeviceStyle); 6] = [
    (
        DeviceType::Router,
        DeviceStyle {
            class: "router",
            stroke: "#2196F3",
            font: "#1976D2",
            stroke_width: 2,
            bold: true,
        },
    ),
    (
        DeviceType::Switch,
        DeviceStyle {
            class: "switch",
            stroke: "#4CAF50",
            font: "#388E3C",
            stroke_width: 2,
            bold: true,
        },
    ),
    (
        DeviceType::Firewall,
        DeviceStyle {
            class: "firewall",
            stroke: "#F44336",
            font: "#D32F2F",
            stroke_width: 2,
            bold: true,
        },
    ),
    (
        DeviceType::Server,
        DeviceStyle {
            class: "server",
            stroke: "#FF9800",
            font: "#F57C00",
            stroke_width: 2,
            bold: true,
        },
    ),
    (
        DeviceType::LoadBalancer,
        DeviceStyle {
            class: "loadbalancer",
            stroke: "#9C27B0",
            font: "#6A1B9A",
            stroke_width: 2,
            bold: true,
        },
    ),
    (DeviceType::Unknown, UNKNOWN_STYLE),
];

const UNKNOWN_STYLE: DeviceStyle = DeviceStyle {
    class: "unknown",
    stroke: "#9E9E9E",
    font: "#616161",
    stroke_width: 1,
    bold: false,
};

/// Returns the style of `device_type`, falling back to the unknown style.
pub(crate) fn device_style(device_type: DeviceType) -> DeviceStyle {
    DEVICE_STYLES
        .iter()
        .find(|(kind, _)| *kind == device_type)
        .map_or(UNKNOWN_STYLE, |(_, style)| *style)
}

/// Returns every device style, in declaration order.
pub(crate) fn device_styles() -> impl Iterator<Item = DeviceStyle> {
    DEVICE_STYLES.iter().map(|(_, style)| *style)
}

/// Errors that can occur during diagram export.
#[derive(Debug, Error)]
pub enum Error {
    /// Writing the text document failed.
    #[error("Render error: {0}")]
    Render(#[from] fmt::Error),

    /// Serializing a JSON document failed.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Unknown output format `{0}`")]
    UnknownFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_device_type_has_a_style() {
        let types = [
            DeviceType::Router,
            DeviceType::Switch,
            DeviceType::Firewall,
            DeviceType::Server,
            DeviceType::LoadBalancer,
            DeviceType::Unknown,
        ];
        for device_type in types {
            let style = device_style(device_type);
            assert!(style.stroke.starts_with('#'));
        }
        assert_eq!(device_style(DeviceType::LoadBalancer).stroke, "#9C27B0");
        assert_eq!(device_style(DeviceType::Unknown), UNKNOWN_STYLE);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("drawio".parse::<Format>().unwrap(), Format::DrawIo);
        assert_eq!("MMD".parse::<Format>().unwrap(), Format::Mermaid);
        assert_eq!("excalidraw".parse::<Format>().unwrap(), Format::Excalidraw);
        assert!("svg".parse::<Format>().is_err());
    }

    #[test]
    fn test_artifact_length_counts_characters() {
        let artifact = Artifact::new(Format::Mermaid, "路由器".to_string(), RenderStats::default());
        assert_eq!(artifact.len(), 3);
        assert!(!artifact.is_empty());
    }
}

//! Command-line argument definitions for the TopFac CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, the output format,
//! configuration file selection, and logging verbosity.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

use topofac::{direction::Direction, export::Format};

/// Output formats the CLI can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// draw.io XML document
    #[value(name = "drawio", alias = "xml")]
    DrawIo,
    /// Mermaid flowchart
    #[value(alias = "mmd")]
    Mermaid,
    /// Excalidraw scene
    Excalidraw,
    /// Parsed topology as JSON
    Json,
}

impl OutputFormat {
    /// Guess the format from a file extension.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let extension = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "drawio" | "xml" => Some(Self::DrawIo),
            "mmd" | "mermaid" => Some(Self::Mermaid),
            "excalidraw" => Some(Self::Excalidraw),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// The diagram format, or `None` for the JSON topology dump.
    pub fn diagram_format(self) -> Option<Format> {
        match self {
            Self::DrawIo => Some(Format::DrawIo),
            Self::Mermaid => Some(Format::Mermaid),
            Self::Excalidraw => Some(Format::Excalidraw),
            Self::Json => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self.diagram_format() {
            Some(format) => format.extension(),
            None => "json",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self.diagram_format() {
            Some(format) => format.as_str(),
            None => "json",
        }
    }
}

/// Command-line arguments for the TopFac diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input topology text file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output file [default: out.<format extension>]
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format [default: from the output extension, else drawio]
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Direction in which environments are placed (lr, tb)
    #[arg(short, long)]
    pub direction: Option<Direction>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Only validate the input and report problems
    #[arg(long)]
    pub check: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Resolve the output format.
    ///
    /// An explicit `--format` wins, then the output file extension, then
    /// draw.io.
    pub fn output_format(&self) -> OutputFormat {
        self.format
            .or_else(|| self.output.as_ref().and_then(OutputFormat::from_path))
            .unwrap_or(OutputFormat::DrawIo)
    }

    /// Resolve the output path for `format`.
    pub fn output_path(&self, format: OutputFormat) -> PathBuf {
        match &self.output {
            Some(output) => PathBuf::from(output),
            None => PathBuf::from(format!("out.{}", format.extension())),
        }
    }
}

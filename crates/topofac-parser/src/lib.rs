//! # TopFac Parser
//!
//! Parser for the TopFac bracket notation. Each line of the input may hold
//! one connection statement:
//!
//! ```text
//! 【环境】【数据中心】的【区域】【设备】连接【环境】【数据中心】的【区域】【设备】
//! ```
//!
//! The pipeline is:
//!
//! 1. **Lex** - Tokenize each candidate line (brackets, fields, `的`, `连接`)
//! 2. **Match** - Find the eight-slot statement on the line
//! 3. **Build** - Fold the statements into the four-level [`Topology`]
//!
//! ## Usage
//!
//! ```
//! # use topofac_parser::{parse, ParseConfig, ParseError};
//! fn main() -> Result<(), ParseError> {
//!     let source = "【生产网】【亦庄】的【核心区】【路由器1】连接【生产网】【亦庄】的【核心区】【交换机1】";
//!
//!     let topology = parse(source, &ParseConfig::default())?;
//!     assert_eq!(topology.components().len(), 2);
//!     Ok(())
//! }
//! ```

mod build;
pub mod error;
mod extract;
mod grammar;
mod lexer;
mod span;
mod tokens;
mod validate;

pub use error::{Diagnostic, ParseError};
pub use extract::{Extraction, STANDARD_FORMAT, extract};
pub use grammar::{Endpoint, Statement};
pub use span::Span;
pub use validate::{ValidationReport, validate_text, validate_topology};

use log::{info, warn};

use topofac_core::{
    classify::{AreaTable, DeviceTable},
    topology::{DEFAULT_TOPOLOGY_NAME, Topology},
};

/// Configuration for building a topology.
///
/// Holds the classification tables for device and area names and the name
/// given to the resulting topology.
#[derive(Debug, Clone)]
pub struct ParseConfig {
    pub devices: DeviceTable,
    pub areas: AreaTable,
    pub topology_name: String,
}

impl ParseConfig {
    /// Create a new ParseConfig with the given classification tables
    pub fn new(devices: DeviceTable, areas: AreaTable) -> Self {
        Self {
            devices,
            areas,
            topology_name: DEFAULT_TOPOLOGY_NAME.to_string(),
        }
    }

    /// Sets the name of the parsed topology.
    pub fn with_topology_name(mut self, name: impl Into<String>) -> Self {
        self.topology_name = name.into();
        self
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self::new(DeviceTable::default(), AreaTable::default())
    }
}

/// Parse topology text into a [`Topology`].
///
/// Lines that do not match are skipped and logged as warnings. Fails only
/// when the input is blank or no line matches, see [`extract`].
pub fn parse(source: &str, config: &ParseConfig) -> Result<Topology, ParseError> {
    info!(bytes = source.len(); "Parsing topology text");

    let extraction = extract(source)?;
    for warning in extraction.warnings() {
        warn!(code:? = warning.code(); "{}", warning.message());
    }

    Ok(build::build_topology(&extraction, config))
}

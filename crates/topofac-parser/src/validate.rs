//! Validation of topology text and of built topologies.

use log::warn;

use topofac_core::topology::Topology;

use crate::{
    error::{Diagnostic, ErrorCode},
    extract::{self, STANDARD_FORMAT},
};

/// Outcome of [`validate_text`].
#[derive(Debug, Clone)]
pub struct ValidationReport {
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
    total_lines: usize,
    valid_lines: usize,
}

impl ValidationReport {
    /// Returns `true` if the text can be parsed into a topology.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Returns the number of non-blank lines.
    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Returns the number of lines matching the connection format.
    pub fn valid_lines(&self) -> usize {
        self.valid_lines
    }
}

/// Check topology text without building a topology.
///
/// # Example
///
/// ```
/// # use topofac_parser::validate_text;
/// let report = validate_text("路由器连接交换机");
///
/// assert!(!report.is_valid());
/// assert_eq!(report.total_lines(), 1);
/// assert_eq!(report.valid_lines(), 0);
/// ```
pub fn validate_text(source: &str) -> ValidationReport {
    let extraction = extract::scan(source);
    let mut errors = Vec::new();
    let mut warnings = extraction.warnings().to_vec();

    if extraction.total_lines() == 0 {
        errors.push(extract::empty_input());
    } else if extraction.valid_lines() == 0 {
        errors.push(extract::no_statements(source));
        warnings.push(Diagnostic::warning(format!("standard format: {STANDARD_FORMAT}")));
    }

    ValidationReport {
        errors,
        warnings,
        total_lines: extraction.total_lines(),
        valid_lines: extraction.valid_lines(),
    }
}

/// Check the connections of a built topology.
///
/// Reports self-loops (`E200`) and connections whose endpoints are not
/// components of the topology (`E201`). The topology itself is left as is.
pub fn validate_topology(topology: &Topology) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for connection in topology.connections() {
        if !topology.resolves(connection) {
            warn!(connection = connection.id(); "Dangling connection reference");
            diagnostics.push(
                Diagnostic::warning(format!(
                    "connection `{}` refers to an unknown component",
                    connection.id()
                ))
                .with_code(ErrorCode::E201)
                .with_help(format!(
                    "`{}` -> `{}` will not be drawn",
                    connection.source(),
                    connection.target()
                )),
            );
        } else if connection.is_self_loop() {
            warn!(connection = connection.id(); "Self-loop connection");
            diagnostics.push(
                Diagnostic::warning(format!(
                    "connection `{}` connects `{}` to itself",
                    connection.id(),
                    connection.source_name()
                ))
                .with_code(ErrorCode::E200),
            );
        }
    }

    diagnostics
}

#[cfg(test)]
mod tests {
    use topofac_core::{
        classify::{AreaType, DeviceType},
        topology::{Component, Connection},
    };

    use super::*;

    fn component(name: &str) -> Component {
        Component::new("e", "d", "a", name, DeviceType::Unknown, AreaType::Unknown)
    }

    #[test]
    fn test_valid_text() {
        let report = validate_text(
            "说明\n【生产网】【亦庄】的【核心区】【路由器1】连接【生产网】【亦庄】的【核心区】【交换机1】\n坏行连接",
        );

        assert!(report.is_valid());
        assert_eq!(report.total_lines(), 3);
        assert_eq!(report.valid_lines(), 1);
        assert_eq!(report.warnings().len(), 1);
    }

    #[test]
    fn test_empty_text() {
        let report = validate_text("   ");

        assert!(!report.is_valid());
        assert_eq!(report.errors()[0].code(), Some(ErrorCode::E101));
        assert_eq!(report.total_lines(), 0);
    }

    #[test]
    fn test_no_match_adds_format_hint() {
        let report = validate_text("没有任何连接描述");

        assert_eq!(report.errors()[0].code(), Some(ErrorCode::E102));
        let hint = report.warnings().last().unwrap();
        assert!(hint.message().contains(STANDARD_FORMAT));
    }

    #[test]
    fn test_self_loop_and_dangling() {
        let a = component("a");
        let b = component("b");
        let connections = vec![
            Connection::new(1, &a, &a),
            Connection::new(2, &a, &b),
        ];
        // `b` is not part of the topology
        let topology = Topology::new("t", Vec::new(), vec![a], connections);

        let diagnostics = validate_topology(&topology);
        let codes: Vec<_> = diagnostics.iter().map(Diagnostic::code).collect();
        assert_eq!(codes, vec![Some(ErrorCode::E200), Some(ErrorCode::E201)]);
        assert_eq!(topology.connections().len(), 2);
    }
}

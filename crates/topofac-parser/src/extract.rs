//! Line-by-line extraction of connection statements.
//!
//! Only lines containing the connector `连接` are candidates. Each candidate
//! is lexed and matched independently: a line that does not match is
//! skipped with an `E100` warning and never affects the other lines.

use indexmap::IndexSet;
use log::{debug, trace};

use topofac_core::identifier::ComponentId;

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    grammar::{self, Endpoint, Statement},
    lexer,
    span::Span,
};

/// The notation every connection line must follow.
pub const STANDARD_FORMAT: &str =
    "【环境】【数据中心】的【区域】【设备】连接【环境】【数据中心】的【区域】【设备】";

const CONNECTOR: &str = "连接";

/// Statements extracted from a topology text.
#[derive(Debug, Clone)]
pub struct Extraction<'src> {
    statements: Vec<Statement<'src>>,
    identities: IndexSet<ComponentId>,
    warnings: Vec<Diagnostic>,
    total_lines: usize,
    candidate_lines: usize,
}

impl<'src> Extraction<'src> {
    /// Returns matched statements in input order.
    pub fn statements(&self) -> &[Statement<'src>] {
        &self.statements
    }

    /// Returns the distinct component identities in first-appearance order.
    pub fn identities(&self) -> &IndexSet<ComponentId> {
        &self.identities
    }

    /// Returns the warnings of skipped or suspicious lines.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Returns the number of non-blank lines.
    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Returns the number of lines containing the connector.
    pub fn candidate_lines(&self) -> usize {
        self.candidate_lines
    }

    /// Returns the number of lines that matched the grammar.
    pub fn valid_lines(&self) -> usize {
        self.statements.len()
    }
}

fn identity(endpoint: &Endpoint<'_>) -> ComponentId {
    ComponentId::from_path(
        endpoint.environment(),
        endpoint.datacenter(),
        endpoint.area(),
        endpoint.device(),
    )
}

/// Iterate over lines with their byte offset, without the line terminator.
fn lines_with_offsets(source: &str) -> impl Iterator<Item = (usize, &str)> {
    source.split_inclusive('\n').scan(0, |offset, raw| {
        let start = *offset;
        *offset += raw.len();
        let line = raw.trim_end_matches(['\n', '\r']);
        Some((start, line))
    })
}

/// Scan every line, never failing.
pub(crate) fn scan(source: &str) -> Extraction<'_> {
    let mut extraction = Extraction {
        statements: Vec::new(),
        identities: IndexSet::new(),
        warnings: Vec::new(),
        total_lines: 0,
        candidate_lines: 0,
    };

    for (offset, line) in lines_with_offsets(source) {
        if line.trim().is_empty() {
            continue;
        }
        extraction.total_lines += 1;

        if !line.contains(CONNECTOR) {
            trace!(offset; "Skipping line without connector");
            continue;
        }
        extraction.candidate_lines += 1;

        let line_span = Span::new(offset..offset + line.len());
        let lexed = lexer::tokenize_line(line, offset);
        extraction.warnings.extend(lexed.warnings);

        match grammar::find_statement(&lexed.tokens, line_span) {
            Ok(statement) => {
                trace!(
                    source = statement.source().device(),
                    target = statement.target().device();
                    "Matched connection statement"
                );
                extraction.identities.insert(identity(statement.source()));
                extraction.identities.insert(identity(statement.target()));
                extraction.statements.push(statement);
            }
            Err(mismatch) => {
                let mut diagnostic = Diagnostic::warning("malformed connection statement")
                    .with_code(ErrorCode::E100)
                    .with_label(mismatch.at, format!("expected {}", mismatch.expected));
                if let Some(partial) = mismatch.partial {
                    diagnostic = diagnostic.with_secondary_label(partial, "statement starts here");
                }
                extraction
                    .warnings
                    .push(diagnostic.with_help(format!("use {STANDARD_FORMAT}")));
            }
        }
    }

    debug!(
        total_lines = extraction.total_lines,
        candidate_lines = extraction.candidate_lines,
        valid_lines = extraction.valid_lines();
        "Extraction finished"
    );
    extraction
}

/// The error for input without any non-blank line.
pub(crate) fn empty_input() -> Diagnostic {
    Diagnostic::error("empty input")
        .with_code(ErrorCode::E101)
        .with_help(format!("write one connection per line: {STANDARD_FORMAT}"))
}

/// The error for input where no line matches the grammar.
pub(crate) fn no_statements(source: &str) -> Diagnostic {
    Diagnostic::error("no connection statements found")
        .with_code(ErrorCode::E102)
        .with_label(Span::new(0..source.len()), "no line matches the connection format")
        .with_help(format!("use {STANDARD_FORMAT}"))
}

/// Extract connection statements from topology text.
///
/// Fails with `E101` when the input is blank and with `E102` when no line
/// matches; in the latter case the per-line warnings follow the error.
///
/// # Example
///
/// ```
/// # use topofac_parser::extract;
/// let source = "【生产网】【亦庄】的【核心区】【路由器1】连接【生产网】【亦庄】的【核心区】【交换机1】";
/// let extraction = extract(source).unwrap();
///
/// assert_eq!(extraction.statements().len(), 1);
/// assert_eq!(extraction.identities().len(), 2);
/// ```
pub fn extract(source: &str) -> Result<Extraction<'_>, ParseError> {
    let extraction = scan(source);
    let mut collector = DiagnosticCollector::new();

    if extraction.total_lines == 0 {
        collector.emit(empty_input());
    } else if extraction.statements.is_empty() {
        collector.emit(no_statements(source));
    }
    collector.extend(extraction.warnings.iter().cloned());

    collector.finish()?;
    Ok(extraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "【生产网】【亦庄】的【核心区】【路由器1】连接【生产网】【亦庄】的【核心区】【交换机1】";

    #[test]
    fn test_lines_with_offsets() {
        let lines: Vec<_> = lines_with_offsets("ab\r\ncd\n\nef").collect();
        assert_eq!(lines, vec![(0, "ab"), (4, "cd"), (7, ""), (8, "ef")]);
    }

    #[test]
    fn test_counts() {
        let source = format!("拓扑说明\n\n{LINE}\n坏行连接\n");
        let extraction = scan(&source);

        assert_eq!(extraction.total_lines(), 3);
        assert_eq!(extraction.candidate_lines(), 2);
        assert_eq!(extraction.valid_lines(), 1);
        assert_eq!(extraction.warnings().len(), 1);
        assert_eq!(extraction.warnings()[0].code(), Some(ErrorCode::E100));
    }

    #[test]
    fn test_non_candidate_lines_are_silent() {
        let source = format!("【未闭合\n{LINE}");
        let extraction = extract(&source).unwrap();
        assert!(extraction.warnings().is_empty());
    }

    #[test]
    fn test_statement_spans_are_source_relative() {
        let source = format!("\n{LINE}");
        let extraction = extract(&source).unwrap();
        let span = extraction.statements()[0].span();
        assert_eq!(&source[span.range()], LINE);
    }

    #[test]
    fn test_identities_in_first_appearance_order() {
        let source = format!(
            "{LINE}\n【生产网】【亦庄】的【核心区】【交换机1】连接【测试网】【酒仙桥】的【接入区】【服务器1】"
        );
        let extraction = extract(&source).unwrap();
        let ids: Vec<_> = extraction.identities().iter().map(ComponentId::as_str).collect();
        assert_eq!(
            ids,
            vec![
                "生产网__亦庄__核心区__路由器1",
                "生产网__亦庄__核心区__交换机1",
                "测试网__酒仙桥__接入区__服务器1",
            ]
        );
    }

    #[test]
    fn test_blank_input_is_empty_error() {
        let err = extract("  \n\t\n").unwrap_err();
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E101));
    }

    #[test]
    fn test_no_match_error_keeps_warnings() {
        let err = extract("路由器连接交换机\n【a】【b】连接").unwrap_err();
        let codes: Vec<_> = err.diagnostics().iter().map(|d| d.code()).collect();
        assert_eq!(
            codes,
            vec![Some(ErrorCode::E102), Some(ErrorCode::E100), Some(ErrorCode::E100)]
        );
    }
}

//! Error adapter for converting TopofacError to miette diagnostics.
//!
//! This module provides the bridge between the library's error types and
//! miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! A [`topofac_parser::ParseError`] carries the fatal diagnostic followed by
//! the warnings collected before it. Each one is rendered independently,
//! warnings with miette's warning severity.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, Severity as MietteSeverity, SourceSpan};

use topofac::TopofacError;
use topofac_parser::{
    Span,
    error::{Diagnostic, Severity},
};

/// Adapter for a single parser diagnostic.
pub struct DiagnosticAdapter<'a> {
    diag: &'a Diagnostic,
    src: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    pub fn new(diag: &'a Diagnostic, src: &'a str) -> Self {
        Self { diag, src }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<MietteSeverity> {
        Some(match self.diag.severity() {
            Severity::Error => MietteSeverity::Error,
            Severity::Warning => MietteSeverity::Warning,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = span_to_miette(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Adapter for [`TopofacError`] variants without source locations.
pub struct ErrorAdapter<'a>(pub &'a TopofacError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            TopofacError::Io(_) => "topofac::io",
            TopofacError::Parse { .. } => return None,
            TopofacError::Config(_) => "topofac::config",
            TopofacError::Export(_) => "topofac::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            TopofacError::Config(_) => Some(Box::new(
                "check the [layout] and [style] sections of the configuration file",
            )),
            _ => None,
        }
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A parser diagnostic with source location information.
    Diagnostic(DiagnosticAdapter<'a>),
    /// An error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn severity(&self) -> Option<MietteSeverity> {
        match self {
            Reportable::Diagnostic(d) => d.severity(),
            Reportable::Error(e) => e.severity(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

fn span_to_miette(span: Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Convert a [`TopofacError`] into a list of reportable errors.
///
/// Parse errors yield one [`Reportable`] per diagnostic; every other
/// variant yields a single one.
pub fn to_reportables(err: &TopofacError) -> Vec<Reportable<'_>> {
    match err {
        TopofacError::Parse {
            err: parse_err,
            src,
        } => parse_err
            .diagnostics()
            .iter()
            .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d, src)))
            .collect(),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

#[cfg(test)]
mod tests {
    use topofac_parser::{ParseError, error::ErrorCode};

    use super::*;

    const LINE: &str = "【生产网】【亦庄】【核心区】【路由器1】连接【生产网】【亦庄】的【核心区】【交换机1】";

    #[test]
    fn test_parse_error_yields_one_reportable_per_diagnostic() {
        let parse_err = ParseError::new(vec![
            Diagnostic::error("no connection statements").with_code(ErrorCode::E102),
            Diagnostic::warning("malformed connection statement")
                .with_code(ErrorCode::E100)
                .with_label(Span::new(0..12), "expected `的`")
                .with_help("write the datacenter and area as 【数据中心】的【区域】"),
        ]);
        let err = TopofacError::new_parse_error(parse_err, LINE);

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 2);
        assert_eq!(reportables[0].to_string(), "no connection statements");
        assert_eq!(reportables[1].to_string(), "malformed connection statement");

        assert_eq!(reportables[0].code().unwrap().to_string(), "E102");
        assert_eq!(reportables[0].severity(), Some(MietteSeverity::Error));
        assert_eq!(reportables[1].severity(), Some(MietteSeverity::Warning));
        assert!(reportables[1].help().is_some());
        assert!(reportables[1].source_code().is_some());
    }

    #[test]
    fn test_labels_keep_primary_flag() {
        let diag = Diagnostic::warning("self-loop connection")
            .with_label(Span::new(0..6), "source")
            .with_secondary_label(Span::new(10..16), "target");

        let adapter = DiagnosticAdapter::new(&diag, LINE);
        let labels: Vec<_> = adapter.labels().unwrap().collect();

        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].label(), Some("source"));
        assert!(labels[0].primary());
        assert_eq!(labels[1].label(), Some("target"));
        assert!(!labels[1].primary());
        assert_eq!(labels[1].offset(), 10);
        assert_eq!(labels[1].len(), 6);
    }

    #[test]
    fn test_diagnostic_without_labels() {
        let diag = Diagnostic::error("empty input").with_code(ErrorCode::E101);
        let adapter = DiagnosticAdapter::new(&diag, "");

        assert!(adapter.labels().is_none());
    }

    #[test]
    fn test_config_error() {
        let err = TopofacError::Config("Missing configuration file: a.toml".to_string());

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(
                    e.to_string(),
                    "Configuration error: Missing configuration file: a.toml"
                );
                assert_eq!(e.code().unwrap().to_string(), "topofac::config");
                assert!(e.help().is_some());
            }
            Reportable::Diagnostic(_) => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_io_error() {
        let err = TopofacError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such file",
        ));

        let reportables = to_reportables(&err);
        assert_eq!(reportables[0].code().unwrap().to_string(), "topofac::io");
        assert!(reportables[0].help().is_none());
    }
}

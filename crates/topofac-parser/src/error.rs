//! Error and diagnostic system for the TopFac parser.
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning with an optional error code, labeled source
//! spans, and help text. Fatal diagnostics are wrapped in [`ParseError`]
//! when returned from [`parse`](crate::parse) or [`extract`](crate::extract).
//!
//! Most problems in topology text are recoverable: a malformed line is
//! skipped with a warning and the rest of the input is still used. Only
//! empty input and input without a single well-formed statement are errors.
//!
//! # Example
//!
//! ```
//! # use topofac_parser::error::{Diagnostic, ErrorCode};
//! # use topofac_parser::Span;
//! let diag = Diagnostic::warning("malformed connection statement")
//!     .with_code(ErrorCode::E100)
//!     .with_label(Span::new(0..12), "expected `的`")
//!     .with_help("use 【环境】【数据中心】的【区域】【设备】连接【环境】【数据中心】的【区域】【设备】");
//!
//! assert_eq!(diag.to_string(), "warning[E100]: malformed connection statement");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;

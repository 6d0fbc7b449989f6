//! Error types for TopFac operations.
//!
//! This module provides the main error type [`TopofacError`] which wraps
//! the error conditions that can occur while turning topology text into
//! diagrams.

use std::io;

use thiserror::Error;

use topofac_parser::ParseError;

/// The main error type for TopFac operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant carries the parser diagnostics together with the
/// source text, so callers can render labeled snippets.
///
/// Layout and rendering never fail on empty topologies or dangling
/// connections; those degrade to placeholder artifacts and dropped edges.
#[derive(Debug, Error)]
pub enum TopofacError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<crate::export::Error> for TopofacError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl TopofacError {
    /// Create a new `Parse` error with the associated source text.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}

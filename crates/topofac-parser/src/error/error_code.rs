//! Error codes for the TopFac diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Lexer diagnostics
//! - `E1xx` - Extraction diagnostics
//! - `E2xx` - Topology validation diagnostics

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer (E0xx)
    // =========================================================================
    /// Unterminated bracket.
    ///
    /// A `【` was opened but no `】` follows before the end of the line or
    /// the next `【`.
    E001,

    // =========================================================================
    // Extraction (E1xx)
    // =========================================================================
    /// Malformed connection statement.
    ///
    /// A line contains the connector `连接` but does not match
    /// `【环境】【数据中心】的【区域】【设备】连接【环境】【数据中心】的【区域】【设备】`.
    E100,

    /// Empty input.
    ///
    /// The input contains no non-blank lines.
    E101,

    /// No connection statements.
    ///
    /// Not a single line of the input matches the connection grammar.
    E102,

    // =========================================================================
    // Validation (E2xx)
    // =========================================================================
    /// Self-loop connection.
    ///
    /// Source and target of a connection resolve to the same component.
    E200,

    /// Dangling connection reference.
    ///
    /// A connection refers to a component identity that is not part of
    /// the topology.
    E201,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated bracket",
            ErrorCode::E100 => "malformed connection statement",
            ErrorCode::E101 => "empty input",
            ErrorCode::E102 => "no connection statements",
            ErrorCode::E200 => "self-loop connection",
            ErrorCode::E201 => "dangling connection reference",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//! Severity levels for diagnostics.

use std::fmt;

use log::Level;

/// The severity level of a diagnostic.
///
/// - [`Severity::Error`] stops the pipeline, no topology is produced
/// - [`Severity::Warning`] is reported while the rest of the input is used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    /// Returns `true` if this is an error severity.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    /// Returns `true` if this is a warning severity.
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }

    /// The log level a diagnostic of this severity is reported at.
    pub fn log_level(&self) -> Level {
        match self {
            Severity::Error => Level::Error,
            Severity::Warning => Level::Warn,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level() {
        assert_eq!(Severity::Error.log_level(), Level::Error);
        assert_eq!(Severity::Warning.log_level(), Level::Warn);
        assert_eq!(Severity::Warning.to_string(), "warning");
    }
}

//! Core diagnostic types.

use cinder_ir::SourceLocation;
use std::fmt;

/// Severity of a diagnostic. Only errors count towards the "non-zero exit"
/// decision (`spec.md` §4.6/§7); warnings are informational.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// One diagnostic: `{severity, file, line, col, size, message}`, per
/// `spec.md` §4.6.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    pub file: String,
    pub line: u32,
    pub col: u32,
    pub size: u32,
    pub message: String,
}

impl Diagnostic {
    #[must_use]
    pub fn error(file: impl Into<String>, loc: SourceLocation, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            file: file.into(),
            line: loc.line,
            col: loc.col,
            size: loc.size,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn warning(file: impl Into<String>, loc: SourceLocation, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            file: file.into(),
            line: loc.line,
            col: loc.col,
            size: loc.size,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}: {}",
            self.file, self.line, self.col, self.severity, self.message
        )
    }
}

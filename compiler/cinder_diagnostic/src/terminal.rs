//! Human-readable rendering of diagnostics with source-line highlighting.
//!
//! Ported from `highlightSourceLine`/`error`/`warning` in
//! `original_source/src/AST.h`: fetch the offending line, trim leading
//! whitespace, print it, then underline `size` columns starting at `col`.

use std::fmt::Write as _;

use crate::diagnostic::{Diagnostic, Severity};

/// Color output mode, matching the teacher's `ColorMode` (auto/always/never).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    #[must_use]
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

mod colors {
    pub const ERROR: &str = "\x1b[1;31m";
    pub const WARNING: &str = "\x1b[1;33m";
    pub const RESET: &str = "\x1b[0m";
}

/// Return the 1-indexed `line` of `source`, or `None` if out of range.
/// Mirrors `getSourceLine`'s "no such line" behavior of returning an empty
/// string, except here the caller can tell the difference.
#[must_use]
pub fn source_line(source: &str, line: u32) -> Option<&str> {
    if line == 0 {
        return None;
    }
    source.lines().nth((line - 1) as usize)
}

/// Trim leading spaces/tabs from `line` and underline `size` columns
/// starting at `col` (1-based), matching the original's column math exactly
/// (offsets are computed against the *untrimmed* line, then the caret line
/// is built against the trimmed text, same as `highlightSourceLine`).
#[must_use]
pub fn highlight_source_line(line: &str, col: u32, size: u32) -> String {
    if line.is_empty() {
        return String::new();
    }

    let trim_offset = line
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .count();
    let trimmed = &line[trim_offset.min(line.len())..];

    let mut out = String::new();
    let _ = writeln!(out, "\t{trimmed}");
    out.push('\t');
    let pad = col.saturating_sub(2) as usize;
    for _ in 0..pad {
        out.push(' ');
    }
    for _ in 0..size {
        out.push('^');
    }
    out.push('\n');
    out
}

/// Render a full diagnostic (location line + message + highlighted source)
/// the way the CLI prints it to stderr.
#[must_use]
pub fn render(diagnostic: &Diagnostic, source: Option<&str>, color: ColorMode, is_tty: bool) -> String {
    let use_color = color.should_use_colors(is_tty);
    let (tag_color, reset) = if use_color {
        match diagnostic.severity {
            Severity::Error => (colors::ERROR, colors::RESET),
            Severity::Warning => (colors::WARNING, colors::RESET),
        }
    } else {
        ("", "")
    };

    let mut out = format!(
        "{}:{}:{}: {tag_color}{}{reset}: {}\n",
        diagnostic.file, diagnostic.line, diagnostic.col, diagnostic.severity, diagnostic.message
    );

    if let Some(source) = source {
        if let Some(line) = source_line(source, diagnostic.line) {
            out.push_str(&highlight_source_line(line, diagnostic.col, diagnostic.size));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinder_ir::SourceLocation;

    #[test]
    fn highlight_trims_indentation_and_underlines() {
        let line = "\t\treturn y;";
        // 'y' is the 4th character after the two tabs, so col=4 (1-based within trimmed text)
        let out = highlight_source_line(line, 4, 1);
        assert!(out.contains("return y;"));
        assert!(out.ends_with("^\n"));
    }

    #[test]
    fn render_includes_location_and_message() {
        let diag = Diagnostic::error("f.lpp", SourceLocation::new(2, 3, 1), "undefined variable 'y'");
        let rendered = render(&diag, Some("function f() -> int {\n  return y;\n}"), ColorMode::Never, false);
        assert!(rendered.contains("f.lpp:2:3: error: undefined variable 'y'"));
        assert!(rendered.contains("return y;"));
    }

    #[test]
    fn source_line_is_one_indexed() {
        let source = "a\nb\nc";
        assert_eq!(source_line(source, 1), Some("a"));
        assert_eq!(source_line(source, 3), Some("c"));
        assert_eq!(source_line(source, 4), None);
        assert_eq!(source_line(source, 0), None);
    }
}

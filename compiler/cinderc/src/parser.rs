//! The lexer/parser for the source language itself is an external
//! collaborator (`spec.md` §1, `SPEC_FULL.md` §1): it is assumed to produce
//! a `cinder_ir::Module` from source text, and is explicitly not built by
//! this crate — the same way `tools/ExtractDefinitions` and
//! `tools/HeaderToModule` are named as out-of-scope standalone tools.
//!
//! This module defines the seam a real front end plugs into. No
//! implementation ships here; `NoSourceParser` reports the gap as a
//! diagnostic-shaped error rather than panicking, so the rest of the CLI
//! (argument handling, file IO, tracing, diagnostic rendering, exit codes)
//! stays exercisable end to end without one.

use cinder_ir::Module;

pub trait SourceParser {
    /// Parse `text` (the contents of `source_name` at `source_path`) into a
    /// top-level `Module`. `Err` carries a message suitable for printing to
    /// stderr as-is; it is not a `cinder_diagnostic::Diagnostic` because a
    /// parse failure has no lowering-stage source location to attach to.
    fn parse(&self, source_name: &str, source_path: &str, text: &str) -> Result<Module, String>;
}

pub struct NoSourceParser;

impl SourceParser for NoSourceParser {
    fn parse(&self, _source_name: &str, _source_path: &str, _text: &str) -> Result<Module, String> {
        Err("no source-language parser is wired into this build of cinderc".to_string())
    }
}

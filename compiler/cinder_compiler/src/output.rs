//! What a compile run hands back to its caller.

use cinder_diagnostic::Diagnostic;

/// Result of one [`crate::compile_module`] call.
///
/// `ir_text` is populated even when diagnostics were raised — per
/// `spec.md` §7, "the driver ... writes the IR (so errors can still be
/// post-mortem inspected)" — unless a host-level [`crate::CompileError`]
/// stopped the pipeline before lowering produced a module at all.
pub struct CompileOutput {
    pub ir_text: String,
    /// The companion `.lmod` text, present only when `module_mode` was set
    /// in the [`crate::CompileConfig`] (`spec.md` §6).
    pub definitions_text: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileOutput {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == cinder_diagnostic::Severity::Error)
    }
}

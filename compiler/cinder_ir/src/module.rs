//! A compilation unit: a flat ordered list of top-level `Expr`s plus the
//! source name/path pair used for diagnostics and relative `include` lookup.

use crate::expr::Expr;

/// One source file's worth of top-level declarations, as produced by the
/// (external) parser and consumed/mutated by `cinder_preprocess`.
#[derive(Clone, Debug, Default)]
pub struct Module {
    pub top_level: Vec<Expr>,
    /// Name used in diagnostic output and as the key for the visited-includes
    /// set; set to the included file's name while an `include`/`require`
    /// callback resolves it, then restored (see `spec.md` §4.1).
    pub source_name: String,
    /// Directory `include`/`require` paths are resolved relative to.
    pub source_path: String,
    /// Populated by `require(x)`: link-time library names (`x.ll`), and the
    /// trigger for switching the emitted module's suffix to `.lmod`.
    pub required_libraries: Vec<String>,
}

impl Module {
    #[must_use]
    pub fn new(source_name: impl Into<String>, source_path: impl Into<String>) -> Self {
        Module {
            top_level: Vec::new(),
            source_name: source_name.into(),
            source_path: source_path.into(),
            required_libraries: Vec::new(),
        }
    }

    pub fn push(&mut self, expr: Expr) {
        self.top_level.push(expr);
    }

    /// True once at least one `require` call switched this module to
    /// "module mode" output (`.lmod` suffix, per `spec.md` §6).
    #[must_use]
    pub fn requires_module_suffix(&self) -> bool {
        !self.required_libraries.is_empty()
    }
}

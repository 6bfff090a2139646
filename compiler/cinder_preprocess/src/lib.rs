//! Preprocessing: transform the raw AST into a form the lowerer can
//! consume in a single pass.
//!
//! Runs three phases to completion, in order, over one `Module`: meta-block
//! execution, include expansion, then class-body lowering. See `spec.md`
//! §4.1 and §5 for the ordering guarantee this mirrors.

pub mod class_phase;
pub mod include_phase;
pub mod meta_phase;

pub use include_phase::IncludeResolver;
pub use meta_phase::MetaEvaluator;

use cinder_diagnostic::DiagnosticSink;
use cinder_ir::Module;
use rustc_hash::FxHashSet;

/// Tracks files already included, for the lifetime of a whole compile —
/// shared across nested include expansions so repeated includes anywhere
/// in the unit are deduplicated (`spec.md` §5).
pub type VisitedIncludes = FxHashSet<String>;

/// Run all three preprocessor phases over `module`.
///
/// Stops after include expansion if a callback could not locate its file;
/// class lowering does not run in that case, mirroring the original's
/// "compilation aborts" on a missing include.
pub fn run(
    module: &mut Module,
    meta: &mut dyn MetaEvaluator,
    includes: &dyn IncludeResolver,
    include_path: &str,
    visited: &mut VisitedIncludes,
    diagnostics: &mut DiagnosticSink,
) -> Result<(), ()> {
    meta_phase::run(module, meta, diagnostics);
    include_phase::run(module, includes, include_path, visited, diagnostics)?;
    class_phase::run(module, diagnostics);
    Ok(())
}

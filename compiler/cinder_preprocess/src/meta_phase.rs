//! Meta-block execution, the first preprocessor phase.
//!
//! The tree-walk translation from `Expr` to the scripting engine's source
//! language, and the engine itself, live in `cinder_meta`; this phase only
//! owns the orchestration: call the engine once per `Meta` node, in source
//! order, surfacing its errors as diagnostics.

use cinder_diagnostic::DiagnosticSink;
use cinder_ir::{Expr, Module};

/// A meta engine the preprocessor can hand a module and a meta block's body
/// to. `cinder_meta::Engine` is the production implementation; tests use a
/// stub.
pub trait MetaEvaluator {
    /// Apply one meta block's effects to `module`. Implementations may
    /// insert or remove top-level items. Returns `Err` with the engine's
    /// error string on evaluation failure.
    fn apply(&mut self, module: &mut Module, body: &[Expr]) -> Result<(), String>;
}

/// Run every top-level `Meta` block against `evaluator`, in source order.
/// A block's own failure does not stop the remaining blocks from running.
pub fn run(module: &mut Module, evaluator: &mut dyn MetaEvaluator, diagnostics: &mut DiagnosticSink) {
    let source_name = module.source_name.clone();
    let meta_blocks: Vec<(usize, Vec<Expr>)> = module
        .top_level
        .iter()
        .enumerate()
        .filter_map(|(i, expr)| match expr {
            Expr::Meta { body, .. } => Some((i, body.clone())),
            _ => None,
        })
        .collect();

    for (i, body) in meta_blocks {
        let loc = module.top_level[i].location();
        if let Err(message) = evaluator.apply(module, &body) {
            diagnostics.error(&source_name, loc, format!("meta error: {message}"));
        }
    }
}

//! Class-body lowering, the third and final preprocessor phase.
//!
//! Splits each `ClassDef`'s raw body into `fields` and `methods`, marking
//! each method with `is_member = true` so the lowerer knows to prepend the
//! implicit `self` parameter and mangle its name.

use cinder_diagnostic::DiagnosticSink;
use cinder_ir::{Expr, Module};

/// Classify every top-level `ClassDef`'s body into `fields`/`methods`.
pub fn run(module: &mut Module, diagnostics: &mut DiagnosticSink) {
    let source_name = module.source_name.clone();
    for top in &mut module.top_level {
        let Expr::ClassDef(class) = top else { continue };
        for item in class.body.clone() {
            match item {
                Expr::Function(mut f) => {
                    f.is_member = true;
                    class.methods.push(f);
                }
                Expr::VariableDef(v) => class.fields.push(v),
                other => {
                    diagnostics.error(&source_name, other.location(), "invalid expression in class definition");
                }
            }
        }
    }
}

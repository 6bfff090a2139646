//! The compile-time meta engine: one `Engine` per `cinder_compiler` pipeline
//! run, shared across every `Meta` block the preprocessor finds so that
//! state a meta block sets up (globals, `require`d helper functions) is
//! visible to later blocks in the same compile.

use std::cell::RefCell;
use std::rc::Rc;

use cinder_ir::{Expr, Module};
use cinder_preprocess::MetaEvaluator;

use crate::bindings;
use crate::error::MetaError;
use crate::translate::translate_block;

pub struct Engine {
    lua: mlua::Lua,
    pending: Rc<RefCell<Vec<Expr>>>,
}

impl Engine {
    pub fn new() -> Result<Self, MetaError> {
        let lua = mlua::Lua::new();
        let pending = Rc::new(RefCell::new(Vec::new()));
        bindings::install(&lua, Rc::clone(&pending)).map_err(MetaError::Startup)?;
        Ok(Engine { lua, pending })
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new().expect("embedded Lua interpreter always starts")
    }
}

impl MetaEvaluator for Engine {
    fn apply(&mut self, module: &mut Module, body: &[Expr]) -> Result<(), String> {
        let source = translate_block(body)?;
        tracing::debug!(chunk = %source, "evaluating translated meta block");

        self.lua.load(&source).exec().map_err(|e| e.to_string())?;

        for expr in self.pending.borrow_mut().drain(..) {
            module.push(expr);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinder_diagnostic::DiagnosticSink;
    use cinder_ir::SourceLocation;

    fn loc() -> SourceLocation {
        SourceLocation::default()
    }

    #[test]
    fn translated_arithmetic_runs_without_emitting_anything() {
        let mut engine = Engine::new().unwrap();
        let mut module = Module::new("a.lpp", "./a.lpp");
        let body = vec![Expr::VariableDef(cinder_ir::VariableDef {
            name: "x".to_string(),
            type_name: String::new(),
            initial: Some(Box::new(Expr::Integer { value: 1, loc: loc() })),
            size: 0,
            is_extern: false,
            loc: loc(),
        })];

        engine.apply(&mut module, &body).unwrap();
        assert!(module.top_level.is_empty());
    }

    #[test]
    fn ast_emit_appends_a_fragment_to_the_module() {
        let mut engine = Engine::new().unwrap();
        let mut module = Module::new("a.lpp", "./a.lpp");

        let source = "ast.emit(ast.variable_def(\"generated\", \"int\", ast.integer(5)))";
        engine.lua.load(source).exec().unwrap();
        for expr in engine.pending.borrow_mut().drain(..) {
            module.push(expr);
        }

        assert_eq!(module.top_level.len(), 1);
        match &module.top_level[0] {
            Expr::VariableDef(v) => assert_eq!(v.name, "generated"),
            other => panic!("expected a VariableDef, got {other:?}"),
        }
    }

    #[test]
    fn engine_error_surfaces_as_a_diagnostic() {
        let mut engine = Engine::new().unwrap();
        let mut module = Module::new("a.lpp", "./a.lpp");
        let mut diagnostics = DiagnosticSink::new();

        module.push(Expr::Meta { body: vec![], loc: loc() });
        cinder_preprocess::meta_phase::run(
            &mut module,
            &mut engine,
            &mut diagnostics,
        );
        assert!(!diagnostics.has_errors());
    }
}

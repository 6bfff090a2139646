//! Core compilation pipeline: preprocess → lower → emit.
//!
//! Portable (no process exit, no filesystem IO). An already-parsed
//! `cinder_ir::Module` comes in; a serialized backend-IR module (plus an
//! optional `.lmod` sidecar) comes out. The external parser, real
//! `IncludeResolver`, and process-exit handling live in the `cinderc`
//! binary crate.

use inkwell::context::Context;

use cinder_diagnostic::DiagnosticSink;
use cinder_ir::Module as AstModule;
use cinder_llvm::Lowerer;
use cinder_meta::Engine as MetaEngine;
use cinder_preprocess::{IncludeResolver, VisitedIncludes};

use crate::error::CompileError;
use crate::output::CompileOutput;

/// Configuration for one [`compile_module`] call.
pub struct CompileConfig {
    /// Directory `include`/`require` paths fall back to after a
    /// source-relative lookup fails (`spec.md` §6).
    pub include_path: String,
    /// `-m`: also produce a companion `.lmod` definitions file.
    pub module_mode: bool,
}

impl Default for CompileConfig {
    fn default() -> Self {
        CompileConfig {
            include_path: String::new(),
            module_mode: false,
        }
    }
}

/// Preprocess, lower, and emit one compilation unit.
///
/// `module` is mutated in place by preprocessing (include splicing,
/// class-body lowering, meta-block side effects) exactly as `spec.md`
/// §2/§5 describes; the caller owns its lifetime.
pub fn compile_module(
    context: &Context,
    module: &mut AstModule,
    includes: &dyn IncludeResolver,
    config: &CompileConfig,
) -> Result<CompileOutput, CompileError> {
    let mut diagnostics = DiagnosticSink::new();
    let mut meta = MetaEngine::new()?;
    let mut visited = VisitedIncludes::default();

    let preprocess_span = tracing::info_span!("preprocess", source = %module.source_name);
    let preprocessed = preprocess_span.in_scope(|| {
        cinder_preprocess::run(
            module,
            &mut meta,
            includes,
            &config.include_path,
            &mut visited,
            &mut diagnostics,
        )
    });
    if preprocessed.is_err() {
        return Err(CompileError::Include);
    }

    let definitions_text = config.module_mode.then(|| {
        module
            .top_level
            .iter()
            .map(cinder_ir::Expr::definition_string)
            .collect::<String>()
    });

    let lower_span = tracing::info_span!("lower", source = %module.source_name);
    let mut lowerer = Lowerer::new(context, &module_name(&module.source_name), module.source_name.clone());
    lower_span.in_scope(|| {
        lowerer.lower_module(module, &mut diagnostics);
    });

    // A failed verification is only a host-level bug (`CompileError::Llvm`)
    // when the source program itself checked out clean: diagnosed user
    // errors routinely leave a block without a terminator (e.g. a `return`
    // whose value failed to lower), and `spec.md` §7 still wants the IR
    // text emitted for post-mortem inspection in that case rather than the
    // whole compile aborting.
    let had_user_errors = diagnostics.has_errors();
    let emit_span = tracing::info_span!("emit");
    let ir_text = emit_span.in_scope(move || -> Result<String, CompileError> {
        if let Err(err) = lowerer.verify() {
            if !had_user_errors {
                return Err(CompileError::Llvm(err));
            }
            tracing::debug!(%err, "module verification failed after diagnosed errors; emitting IR anyway");
        }
        Ok(lowerer.finish().print_to_string().to_string())
    })?;

    Ok(CompileOutput {
        ir_text,
        definitions_text,
        diagnostics: diagnostics.into_diagnostics(),
    })
}

/// Derive an LLVM module name from a source file name (strip the extension).
fn module_name(source_name: &str) -> String {
    match source_name.rsplit_once('.') {
        Some((stem, _ext)) => stem.to_string(),
        None => source_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinder_ir::{Expr, Function, Module, SourceLocation};
    use pretty_assertions::assert_eq;

    struct NoIncludes;
    impl IncludeResolver for NoIncludes {
        fn load_source(&self, _name: &str, _source_path: &str, _include_path: &str) -> Option<Vec<Expr>> {
            None
        }
        fn load_definitions(&self, _name: &str, _source_path: &str, _include_path: &str) -> Option<Vec<Expr>> {
            None
        }
    }

    fn loc() -> SourceLocation {
        SourceLocation::default()
    }

    fn main_returning(value: i32) -> Module {
        let mut module = Module::new("a.lpp", "./");
        let mut main = Function::new("main", "int", loc());
        main.body.push(Expr::Return {
            value: Some(Box::new(Expr::Integer { value, loc: loc() })),
            loc: loc(),
        });
        module.push(Expr::Function(main));
        module
    }

    #[test]
    fn scalar_program_compiles_with_zero_diagnostics() {
        let context = Context::create();
        let mut module = main_returning(7);
        let config = CompileConfig::default();

        let output = compile_module(&context, &mut module, &NoIncludes, &config).unwrap();

        assert!(!output.has_errors());
        assert!(output.ir_text.contains("define"));
        assert!(output.ir_text.contains("i32 7"));
    }

    #[test]
    fn module_mode_emits_a_definitions_sidecar() {
        let context = Context::create();
        let mut module = Module::new("a.lpp", "./");
        let mut ext = Function::new("puts", "int", loc());
        ext.is_extern = true;
        ext.params.push(cinder_ir::VariableDef::new("s", "@byte", loc()));
        module.push(Expr::Function(ext));

        let config = CompileConfig {
            module_mode: true,
            ..CompileConfig::default()
        };

        let output = compile_module(&context, &mut module, &NoIncludes, &config).unwrap();
        let definitions = output.definitions_text.expect("module mode requested");
        assert_eq!(definitions, "extern function puts(@byte s) -> int\n");
    }

    #[test]
    fn missing_include_aborts_with_a_host_error() {
        let context = Context::create();
        let mut module = Module::new("a.lpp", "./");
        module.push(Expr::FunctionCall {
            name: "include".to_string(),
            args: vec![Expr::String { value: "missing".to_string(), loc: loc() }],
            is_method: false,
            loc: loc(),
        });

        let config = CompileConfig::default();
        let result = compile_module(&context, &mut module, &NoIncludes, &config);
        assert!(matches!(result, Err(CompileError::Include)));
    }
}

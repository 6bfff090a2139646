//! The lowering engine: walks a preprocessed `cinder_ir::Module` and builds
//! an `inkwell` module, per `spec.md` §4.4.
//!
//! One `Lowerer` is created per compiled unit. It threads a single LLVM
//! `Builder` and the current insertion point, as `spec.md` §4.4's "state
//! model" paragraph describes; control-flow nodes advance the insertion
//! point, everything else leaves it where it found it.

mod call;
mod class;
mod control_flow;
mod expr;
mod function;
mod operators;
mod variable;
mod vardef;

use cinder_diagnostic::DiagnosticSink;
use cinder_ir::{Expr, Module as AstModule, SourceLocation};
use cinder_types::{BaseType, ResolvedType};
use inkwell::builder::Builder as LlvmBuilder;
use inkwell::context::Context;
use inkwell::module::Module as LlvmModule;
use inkwell::values::FunctionValue;
use rustc_hash::FxHashMap;

use crate::scope::SymbolScope;

/// A function's source-level signature, recorded at declaration time so
/// call sites can check arity/argument types without re-deriving them
/// from the (backend-only) `inkwell` function type.
#[derive(Clone, Debug)]
pub(crate) struct FunctionSignature {
    pub params: Vec<ResolvedType>,
    pub return_type: ResolvedType,
    pub is_variadic: bool,
}

/// Lowers one preprocessed `cinder_ir::Module` into an `inkwell::Module`.
///
/// Diagnostics are accumulated on the `DiagnosticSink` passed to
/// [`Lowerer::lower_module`], not stored on the lowerer itself — so the same
/// sink can be shared across multiple compiled units the way
/// `cinder_compiler` does for a include-heavy program.
pub struct Lowerer<'ctx> {
    context: &'ctx Context,
    module: LlvmModule<'ctx>,
    builder: LlvmBuilder<'ctx>,
    scope: SymbolScope<'ctx>,
    source_name: String,
    current_function: Option<FunctionValue<'ctx>>,
    function_signatures: FxHashMap<String, FunctionSignature>,
}

impl<'ctx> Lowerer<'ctx> {
    #[must_use]
    pub fn new(context: &'ctx Context, module_name: &str, source_name: impl Into<String>) -> Self {
        Lowerer {
            context,
            module: context.create_module(module_name),
            builder: context.create_builder(),
            scope: SymbolScope::new(),
            source_name: source_name.into(),
            current_function: None,
            function_signatures: FxHashMap::default(),
        }
    }

    /// Consume the lowerer, returning the finished `inkwell::Module`.
    #[must_use]
    pub fn finish(self) -> LlvmModule<'ctx> {
        self.module
    }

    /// Run LLVM's own module verifier. A failure here means the lowerer
    /// itself emitted invalid IR — a host-level bug, not a user diagnostic
    /// (`SPEC_FULL.md` §7) — so `cinder_compiler` surfaces it as a `Result`,
    /// not another `Diagnostic`.
    pub fn verify(&self) -> Result<(), crate::error::LlvmError> {
        self.module
            .verify()
            .map_err(|msg| crate::error::LlvmError::Verification(msg.to_string()))
    }

    #[must_use]
    pub fn module(&self) -> &LlvmModule<'ctx> {
        &self.module
    }

    /// Walk every top-level item in source order, fully emitting each
    /// function before the next top-level item begins (`spec.md` §5).
    pub fn lower_module(&mut self, ast: &AstModule, diagnostics: &mut DiagnosticSink) {
        for item in &ast.top_level {
            self.lower_top_level(item, diagnostics);
        }
    }

    fn lower_top_level(&mut self, item: &Expr, diagnostics: &mut DiagnosticSink) {
        match item {
            Expr::Function(f) => self.lower_function(f, diagnostics),
            Expr::VariableDef(v) => {
                self.lower_global_variable_def(v, diagnostics);
            }
            Expr::ClassDef(c) => self.lower_class(c, diagnostics),
            Expr::FunctionCall { name, .. } if name == "include" || name == "require" => {
                // Handled by cinder_preprocess; a no-op if one somehow survives.
            }
            other => {
                diagnostics.error(
                    &self.source_name,
                    other.location(),
                    "unsupported top-level expression",
                );
            }
        }
    }

    /// Lower a statement list in source order, stopping early once the
    /// current block already has a terminator (e.g. after `return`/`goto`)
    /// — further instructions in the same block would be invalid IR.
    fn lower_block(&mut self, body: &[Expr], diagnostics: &mut DiagnosticSink) {
        for stmt in body {
            if self.current_block_terminated() {
                break;
            }
            self.lower_expr(stmt, diagnostics);
        }
    }

    fn current_block_terminated(&self) -> bool {
        self.builder
            .get_insert_block()
            .is_some_and(|b| b.get_terminator().is_some())
    }

    /// Resolve a source-form type name against this module's class table.
    fn resolve_type(&self, name: &str) -> Option<ResolvedType> {
        cinder_types::resolve(name, |n| self.scope.class_exists(n))
    }

    fn diagnose_unknown_type(&self, diagnostics: &mut DiagnosticSink, loc: SourceLocation, name: &str) {
        diagnostics.error(&self.source_name, loc, format!("unknown type '{name}'"));
    }

    fn llvm_type_or_diagnose(
        &self,
        diagnostics: &mut DiagnosticSink,
        loc: SourceLocation,
        resolved: &ResolvedType,
    ) -> Option<inkwell::types::BasicTypeEnum<'ctx>> {
        match crate::types::llvm_type(self.context, resolved) {
            Some(t) => Some(t),
            None if matches!(resolved.base, BaseType::Void) && resolved.pointer_depth == 0 => None,
            None => {
                diagnostics.error(&self.source_name, loc, format!("unknown type '{resolved}'"));
                None
            }
        }
    }
}

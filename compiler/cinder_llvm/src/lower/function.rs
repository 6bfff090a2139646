//! `Function` declaration/definition and `Return`, per `spec.md` §4.4.

use cinder_diagnostic::DiagnosticSink;
use cinder_ir::{Expr, Function, SourceLocation};
use cinder_types::{BaseType, ResolvedType};
use inkwell::module::Linkage;
use inkwell::types::BasicMetadataTypeEnum;

use crate::lower::FunctionSignature;
use crate::scope::Slot;
use crate::value::Value;
use crate::Lowerer;

impl<'ctx> Lowerer<'ctx> {
    pub(crate) fn lower_function(&mut self, f: &Function, diagnostics: &mut DiagnosticSink) {
        let mut param_types = Vec::with_capacity(f.params.len());
        for p in &f.params {
            match self.resolve_type(&p.type_name) {
                Some(t) => param_types.push(t),
                None => {
                    self.diagnose_unknown_type(diagnostics, p.loc, &p.type_name);
                    return;
                }
            }
        }

        let return_type = if f.return_type.is_empty() {
            ResolvedType::new(0, BaseType::Void)
        } else {
            match self.resolve_type(&f.return_type) {
                Some(t) => t,
                None => {
                    self.diagnose_unknown_type(diagnostics, f.loc, &f.return_type);
                    return;
                }
            }
        };

        let Some(llvm_param_types) = self.llvm_param_types(diagnostics, f.loc, &param_types) else {
            return;
        };

        let fn_type = match self.llvm_type_or_diagnose(diagnostics, f.loc, &return_type) {
            Some(ret) => ret.fn_type(&llvm_param_types, f.is_variadic),
            None => self.context.void_type().fn_type(&llvm_param_types, f.is_variadic),
        };

        let declared_name = crate::mangle::normalize_declared_name(&f.name);
        let function = self.module.add_function(&declared_name, fn_type, Some(Linkage::External));
        self.function_signatures.insert(
            declared_name,
            FunctionSignature {
                params: param_types.clone(),
                return_type: return_type.clone(),
                is_variadic: f.is_variadic,
            },
        );

        if f.is_extern {
            return;
        }

        let entry = self.context.append_basic_block(function, "entry");
        self.builder.position_at_end(entry);
        self.current_function = Some(function);
        self.scope.enter();

        for (i, (param, resolved)) in f.params.iter().zip(param_types.iter()).enumerate() {
            let llvm_param = function.get_nth_param(i as u32).expect("param index in range");
            let llvm_ty = crate::types::llvm_type(self.context, resolved).expect("resolved param type has an llvm type");
            let alloca = self.builder.build_alloca(llvm_ty, &param.name).expect("build_alloca");
            self.builder.build_store(alloca, llvm_param).expect("build_store");
            self.scope.declare_local(param.name.clone(), Slot::scalar(alloca, resolved.clone()));
        }

        self.lower_block(&f.body, diagnostics);

        if !self.current_block_terminated() && matches!(return_type.base, BaseType::Void) && return_type.pointer_depth == 0 {
            self.builder.build_return(None).expect("build_return");
        }

        self.scope.exit();
        self.current_function = None;
    }

    fn llvm_param_types(
        &self,
        diagnostics: &mut DiagnosticSink,
        loc: SourceLocation,
        params: &[ResolvedType],
    ) -> Option<Vec<BasicMetadataTypeEnum<'ctx>>> {
        let mut out = Vec::with_capacity(params.len());
        for p in params {
            let ty = crate::types::llvm_type(self.context, p).or_else(|| {
                diagnostics.error(&self.source_name, loc, format!("unknown type '{p}'"));
                None
            })?;
            out.push(ty.into());
        }
        Some(out)
    }

    pub(crate) fn lower_return(
        &mut self,
        value: Option<&Expr>,
        _loc: SourceLocation,
        diagnostics: &mut DiagnosticSink,
    ) -> Option<Value<'ctx>> {
        match value {
            None => {
                self.builder.build_return(None).expect("build_return");
            }
            Some(expr) => {
                let value = self.lower_expr(expr, diagnostics)?;
                self.builder.build_return(Some(&value.llvm)).expect("build_return");
            }
        }
        None
    }
}

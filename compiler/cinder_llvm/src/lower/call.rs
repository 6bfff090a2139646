//! `FunctionCall` lowering: plain calls and method-dispatch calls
//! (`recv:m(args)`, encoded as `is_method` with the receiver as the first
//! argument), per `spec.md` §4.4.

use cinder_diagnostic::DiagnosticSink;
use cinder_ir::{Expr, SourceLocation};
use cinder_types::BaseType;
use inkwell::values::{BasicMetadataValueEnum, FunctionValue};

use crate::value::Value;
use crate::Lowerer;

impl<'ctx> Lowerer<'ctx> {
    pub(crate) fn lower_call(
        &mut self,
        name: &str,
        args: &[Expr],
        is_method: bool,
        loc: SourceLocation,
        diagnostics: &mut DiagnosticSink,
    ) -> Option<Value<'ctx>> {
        // Preprocessed away before the lowerer sees a top-level include call;
        // a nested `include(...)` expression otherwise is a no-op here too.
        if name == "include" || name == "require" {
            return None;
        }

        if is_method {
            self.lower_method_call(name, args, loc, diagnostics)
        } else {
            let Some(function) = self.module.get_function(name) else {
                diagnostics.error(&self.source_name, loc, format!("undefined function '{name}'"));
                return None;
            };

            let mut arg_values = Vec::with_capacity(args.len());
            for a in args {
                arg_values.push(self.lower_expr(a, diagnostics)?);
            }
            self.emit_call(function, &arg_values, loc, diagnostics)
        }
    }

    fn lower_method_call(
        &mut self,
        name: &str,
        args: &[Expr],
        loc: SourceLocation,
        diagnostics: &mut DiagnosticSink,
    ) -> Option<Value<'ctx>> {
        let Some((receiver_expr, rest)) = args.split_first() else {
            diagnostics.error(&self.source_name, loc, "method call has no receiver");
            return None;
        };
        let receiver = self.lower_expr(receiver_expr, diagnostics)?;

        let BaseType::Struct(class_name) = &receiver.ty.base else {
            diagnostics.error(&self.source_name, loc, "method call receiver is not a class instance");
            return None;
        };
        let callee_name = crate::mangle::method_name(class_name, name);

        let Some(function) = self.module.get_function(&callee_name) else {
            diagnostics.error(&self.source_name, loc, format!("undefined function '{callee_name}'"));
            return None;
        };

        let self_arg = if receiver.ty.pointer_depth == 0 {
            let Some(place) = receiver.place else {
                diagnostics.error(&self.source_name, loc, "can not take address of a literal value");
                return None;
            };
            Value::rvalue(place.into(), receiver.ty.address_of())
        } else {
            receiver
        };

        let mut arg_values = Vec::with_capacity(rest.len() + 1);
        arg_values.push(self_arg);
        for a in rest {
            arg_values.push(self.lower_expr(a, diagnostics)?);
        }
        self.emit_call(function, &arg_values, loc, diagnostics)
    }

    /// Check arity and per-argument types against the recorded
    /// `FunctionSignature`, then emit the `call` instruction. Shared by
    /// plain calls, method calls, and operator-overload dispatch.
    pub(crate) fn emit_call(
        &mut self,
        function: FunctionValue<'ctx>,
        args: &[Value<'ctx>],
        loc: SourceLocation,
        diagnostics: &mut DiagnosticSink,
    ) -> Option<Value<'ctx>> {
        let name = function.get_name().to_str().unwrap_or_default().to_string();
        let signature = self.function_signatures.get(&name).cloned();

        if let Some(sig) = &signature {
            if !sig.is_variadic && args.len() != sig.params.len() {
                diagnostics.error(
                    &self.source_name,
                    loc,
                    format!(
                        "wrong number of arguments to '{name}': expected {}, got {}",
                        sig.params.len(),
                        args.len()
                    ),
                );
                return None;
            }
            for (i, (arg, expected)) in args.iter().zip(sig.params.iter()).enumerate() {
                if arg.ty != *expected {
                    diagnostics.error(
                        &self.source_name,
                        loc,
                        format!("argument {} to '{name}': expected {expected} but got {}", i + 1, arg.ty),
                    );
                    return None;
                }
            }
        }

        let llvm_args: Vec<BasicMetadataValueEnum> = args.iter().map(|v| v.llvm.into()).collect();
        let call = self.builder.build_call(function, &llvm_args, "call").expect("build_call");

        match signature {
            Some(sig) if !matches!(sig.return_type.base, BaseType::Void) || sig.return_type.pointer_depth > 0 => {
                let result = call.try_as_basic_value().left().expect("non-void call returns a value");
                Some(Value::rvalue(result, sig.return_type))
            }
            _ => None,
        }
    }
}

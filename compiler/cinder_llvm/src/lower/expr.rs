//! Top-level `Expr` dispatch, plus literals and `TypeCast` — the variants
//! with no submodule of their own.

use cinder_diagnostic::DiagnosticSink;
use cinder_ir::Expr;
use cinder_types::{BaseType, ResolvedType};

use crate::value::Value;
use crate::Lowerer;

impl<'ctx> Lowerer<'ctx> {
    /// Lower one expression/statement node, returning its value or `None`
    /// on a recorded diagnostic. Per `spec.md` §4.4/§7: a `None` result
    /// means a diagnostic was already pushed; callers must not emit
    /// further IR that depends on it, but siblings keep lowering.
    pub(crate) fn lower_expr(&mut self, expr: &Expr, diagnostics: &mut DiagnosticSink) -> Option<Value<'ctx>> {
        match expr {
            Expr::Number { value, .. } => {
                let v = self.context.f32_type().const_float(f64::from(*value));
                Some(Value::rvalue(v.into(), ResolvedType::new(0, BaseType::Float)))
            }
            Expr::Integer { value, .. } => {
                let v = self.context.i32_type().const_int(i64::from(*value) as u64, true);
                Some(Value::rvalue(v.into(), ResolvedType::new(0, BaseType::Int)))
            }
            Expr::Bool { value, .. } => {
                let v = self.context.bool_type().const_int(u64::from(*value), false);
                Some(Value::rvalue(v.into(), ResolvedType::new(0, BaseType::Bool)))
            }
            Expr::Byte { value, .. } => {
                let v = self.context.i8_type().const_int(i64::from(*value) as u64, true);
                Some(Value::rvalue(v.into(), ResolvedType::new(0, BaseType::Byte)))
            }
            Expr::String { value, .. } => Some(self.lower_string_literal(value)),
            Expr::TypeCast { type_name, value, loc } => self.lower_type_cast(type_name, value, *loc, diagnostics),
            Expr::Variable(v) => self.lower_variable(v, diagnostics),
            Expr::VariableDef(v) => self.lower_local_variable_def(v, diagnostics),
            Expr::BinaryOp { op, left, right, loc } => self.lower_binary_op(op, left, right, *loc, diagnostics),
            Expr::UnaryOp { op, value, loc } => self.lower_unary_op(*op, value, *loc, diagnostics),
            Expr::FunctionCall { name, args, is_method, loc } => {
                self.lower_call(name, args, *is_method, *loc, diagnostics)
            }
            Expr::Function(f) => {
                self.lower_function(f, diagnostics);
                None
            }
            Expr::Return { value, loc } => self.lower_return(value.as_deref(), *loc, diagnostics),
            Expr::If { head, body, else_body, loc } => self.lower_if(head, body, else_body, *loc, diagnostics),
            Expr::While { head, body, loc } => self.lower_while(head, body, *loc, diagnostics),
            Expr::For { init, cond, inc, body, loc } => self.lower_for(init, cond, inc, body, *loc, diagnostics),
            Expr::Label { name, loc } => {
                self.lower_label(name, *loc);
                None
            }
            Expr::Goto { name, loc } => {
                self.lower_goto(name, *loc, diagnostics);
                None
            }
            Expr::ClassDef(c) => {
                self.lower_class(c, diagnostics);
                None
            }
            Expr::Meta { .. } => {
                // Consumed by cinder_preprocess; never reaches the lowerer.
                None
            }
        }
    }

    /// `String` literal: a global byte array plus an in-bounds GEP to `i8*`
    /// (`spec.md` §4.4's "Literals and Return" paragraph).
    fn lower_string_literal(&mut self, value: &str) -> Value<'ctx> {
        let global = self
            .builder
            .build_global_string(value, "str")
            .expect("build_global_string");
        let zero = self.context.i32_type().const_zero();
        let ptr = unsafe {
            self.builder
                .build_gep(
                    self.context.i8_type().array_type((value.len() + 1) as u32),
                    global.as_pointer_value(),
                    &[zero, zero],
                    "strptr",
                )
                .expect("build_gep")
        };
        Value::rvalue(ptr.into(), ResolvedType::new(1, BaseType::Byte))
    }

    /// `TypeCast`: a pointer-cast if the target is a pointer type (opaque
    /// pointers mean this only changes our own `ResolvedType` bookkeeping,
    /// no instruction is emitted), otherwise a bit-cast, warning when the
    /// source type cannot be losslessly bit-cast (`spec.md` §4.4).
    fn lower_type_cast(
        &mut self,
        type_name: &str,
        inner: &Expr,
        loc: cinder_ir::SourceLocation,
        diagnostics: &mut DiagnosticSink,
    ) -> Option<Value<'ctx>> {
        let target = self.resolve_type(type_name).or_else(|| {
            self.diagnose_unknown_type(diagnostics, loc, type_name);
            None
        })?;
        let value = self.lower_expr(inner, diagnostics)?;

        if target.is_pointer() {
            return Some(Value::rvalue(value.llvm, target));
        }

        let target_llvm = self.llvm_type_or_diagnose(diagnostics, loc, &target)?;
        if same_bit_width(&value.ty, &target) {
            let cast = self
                .builder
                .build_bit_cast(value.llvm, target_llvm, "cast")
                .expect("build_bit_cast");
            Some(Value::rvalue(cast, target))
        } else {
            diagnostics.warning(
                &self.source_name,
                loc,
                format!("cast from '{}' to '{}' is not bit-width preserving", value.ty, target),
            );
            let cast = self
                .builder
                .build_bit_cast(value.llvm, target_llvm, "cast")
                .expect("build_bit_cast");
            Some(Value::rvalue(cast, target))
        }
    }
}

fn same_bit_width(a: &ResolvedType, b: &ResolvedType) -> bool {
    bit_width(a) == bit_width(b)
}

fn bit_width(ty: &ResolvedType) -> u32 {
    if ty.pointer_depth > 0 {
        return 64;
    }
    match ty.base {
        BaseType::Void => 0,
        BaseType::Bool => 1,
        BaseType::Byte => 8,
        BaseType::Int | BaseType::Float => 32,
        BaseType::Struct(_) => 64,
    }
}

#[cfg(test)]
mod tests {
    use super::Expr;
    use crate::lower::test_support::{loc, lower_one_function};
    use cinder_ir::Function;
    use inkwell::context::Context;

    #[test]
    fn string_literal_lowers_to_a_global_and_an_in_bounds_gep() {
        let mut f = Function::new("main", "@byte", loc());
        f.body.push(Expr::Return {
            value: Some(Box::new(Expr::String { value: "hi".to_string(), loc: loc() })),
            loc: loc(),
        });

        let context = Context::create();
        let (ir, diagnostics) = lower_one_function(&context, &f);
        assert!(!diagnostics.has_errors(), "{:?}", diagnostics.diagnostics());
        assert!(ir.contains("getelementptr inbounds"));
        assert!(ir.contains("c\"hi\\00\""));
    }

    #[test]
    fn pointer_type_cast_reuses_the_value_with_no_instruction() {
        let mut f = Function::new("main", "@byte", loc());
        f.body.push(Expr::Return {
            value: Some(Box::new(Expr::TypeCast {
                type_name: "@byte".to_string(),
                value: Box::new(Expr::String { value: "x".to_string(), loc: loc() }),
                loc: loc(),
            })),
            loc: loc(),
        });

        let context = Context::create();
        let (ir, diagnostics) = lower_one_function(&context, &f);
        assert!(!diagnostics.has_errors(), "{:?}", diagnostics.diagnostics());
        assert!(!ir.contains("bitcast"));
    }

    /// `spec.md` §4.4: a bit-width-losing cast still compiles but warns.
    #[test]
    fn lossy_bit_cast_warns_but_still_emits_the_cast() {
        let mut f = Function::new("main", "byte", loc());
        f.body.push(Expr::Return {
            value: Some(Box::new(Expr::TypeCast {
                type_name: "byte".to_string(),
                value: Box::new(Expr::Integer { value: 1, loc: loc() }),
                loc: loc(),
            })),
            loc: loc(),
        });

        let context = Context::create();
        let (_ir, diagnostics) = lower_one_function(&context, &f);
        assert!(!diagnostics.has_errors());
        assert_eq!(diagnostics.diagnostics().len(), 1);
        assert!(diagnostics.diagnostics()[0].message.contains("not bit-width preserving"));
    }

    #[test]
    fn unknown_cast_target_type_is_diagnosed() {
        let mut f = Function::new("main", "int", loc());
        f.body.push(Expr::Return {
            value: Some(Box::new(Expr::TypeCast {
                type_name: "Nonexistent".to_string(),
                value: Box::new(Expr::Integer { value: 1, loc: loc() }),
                loc: loc(),
            })),
            loc: loc(),
        });

        let context = Context::create();
        let (_ir, diagnostics) = lower_one_function(&context, &f);
        assert!(diagnostics.has_errors());
        assert!(diagnostics.diagnostics()[0].message.contains("unknown type 'Nonexistent'"));
    }
}

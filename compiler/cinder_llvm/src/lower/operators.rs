//! `BinaryOp` and `UnaryOp` lowering, per `spec.md` §4.4.

use cinder_diagnostic::DiagnosticSink;
use cinder_ir::{Expr, SourceLocation, UnaryOperator};
use cinder_types::{BaseType, ResolvedType};
use inkwell::{FloatPredicate, IntPredicate};

use crate::types::is_float;
use crate::value::Value;
use crate::Lowerer;

impl<'ctx> Lowerer<'ctx> {
    pub(crate) fn lower_binary_op(
        &mut self,
        op: &str,
        left: &Expr,
        right: &Expr,
        loc: SourceLocation,
        diagnostics: &mut DiagnosticSink,
    ) -> Option<Value<'ctx>> {
        if op == "=" {
            return self.lower_assignment(left, right, loc, diagnostics);
        }

        let lhs = self.lower_expr(left, diagnostics)?;
        let rhs = self.lower_expr(right, diagnostics)?;

        match op {
            "+" | "-" | "*" | "/" => self.lower_arithmetic(op, &lhs, &rhs, loc, diagnostics),
            ">" | "<" | "==" | "~=" | "<=" | ">=" => self.lower_comparison(op, &lhs, &rhs, loc, diagnostics),
            _ => self.lower_operator_overload(op, &lhs, &rhs, loc, diagnostics),
        }
    }

    fn lower_arithmetic(
        &mut self,
        op: &str,
        lhs: &Value<'ctx>,
        rhs: &Value<'ctx>,
        loc: SourceLocation,
        diagnostics: &mut DiagnosticSink,
    ) -> Option<Value<'ctx>> {
        if is_float(&rhs.ty) || is_float(&lhs.ty) {
            let l = self.coerce_to_float(lhs);
            let r = self.coerce_to_float(rhs);
            let result = match op {
                "+" => self.builder.build_float_add(l, r, "fadd"),
                "-" => self.builder.build_float_sub(l, r, "fsub"),
                "*" => self.builder.build_float_mul(l, r, "fmul"),
                "/" => self.builder.build_float_div(l, r, "fdiv"),
                _ => unreachable!("caller only dispatches + - * /"),
            }
            .expect("float arithmetic");
            self.check_operand_types_match(lhs, rhs, loc, diagnostics);
            Some(Value::rvalue(result.into(), ResolvedType::new(0, BaseType::Float)))
        } else if rhs.ty.pointer_depth == 0 && matches!(rhs.ty.base, BaseType::Int | BaseType::Byte) {
            let l = lhs.llvm.into_int_value();
            let r = rhs.llvm.into_int_value();
            let result = match op {
                "+" => self.builder.build_int_add(l, r, "iadd"),
                "-" => self.builder.build_int_sub(l, r, "isub"),
                "*" => self.builder.build_int_mul(l, r, "imul"),
                "/" => self.builder.build_int_signed_div(l, r, "idiv"),
                _ => unreachable!("caller only dispatches + - * /"),
            }
            .expect("int arithmetic");
            self.check_operand_types_match(lhs, rhs, loc, diagnostics);
            Some(Value::rvalue(result.into(), rhs.ty.clone()))
        } else {
            self.lower_operator_overload(op, lhs, rhs, loc, diagnostics)
        }
    }

    fn lower_comparison(
        &mut self,
        op: &str,
        lhs: &Value<'ctx>,
        rhs: &Value<'ctx>,
        loc: SourceLocation,
        diagnostics: &mut DiagnosticSink,
    ) -> Option<Value<'ctx>> {
        let bool_ty = ResolvedType::new(0, BaseType::Bool);

        if rhs.ty.is_pointer() || lhs.ty.is_pointer() {
            if !matches!(op, "==" | "~=") {
                diagnostics.error(
                    &self.source_name,
                    loc,
                    format!("operator '{op}' is not defined for pointer types"),
                );
                return None;
            }
            let ptr_int_ty = self.context.i32_type();
            let l = self
                .builder
                .build_ptr_to_int(lhs.llvm.into_pointer_value(), ptr_int_ty, "ptoi")
                .expect("ptr_to_int");
            let r = self
                .builder
                .build_ptr_to_int(rhs.llvm.into_pointer_value(), ptr_int_ty, "ptoi")
                .expect("ptr_to_int");
            let predicate = if op == "==" { IntPredicate::EQ } else { IntPredicate::NE };
            let result = self.builder.build_int_compare(predicate, l, r, "cmp").expect("icmp");
            return Some(Value::rvalue(result.into(), bool_ty));
        }

        if is_float(&rhs.ty) || is_float(&lhs.ty) {
            let l = self.coerce_to_float(lhs);
            let r = self.coerce_to_float(rhs);
            let predicate = float_predicate(op)?;
            let result = self.builder.build_float_compare(predicate, l, r, "fcmp").expect("fcmp");
            self.check_operand_types_match(lhs, rhs, loc, diagnostics);
            Some(Value::rvalue(result.into(), bool_ty))
        } else {
            let l = lhs.llvm.into_int_value();
            let r = rhs.llvm.into_int_value();
            let predicate = int_predicate(op)?;
            let result = self.builder.build_int_compare(predicate, l, r, "icmp").expect("icmp");
            self.check_operand_types_match(lhs, rhs, loc, diagnostics);
            Some(Value::rvalue(result.into(), bool_ty))
        }
    }

    /// Assignment: the left operand must be a prior load's backing
    /// pointer (a true l-value); the pointee type must equal the right
    /// operand's type (`spec.md` §4.4).
    fn lower_assignment(
        &mut self,
        left: &Expr,
        right: &Expr,
        loc: SourceLocation,
        diagnostics: &mut DiagnosticSink,
    ) -> Option<Value<'ctx>> {
        let lhs = self.lower_expr(left, diagnostics)?;
        let rhs = self.lower_expr(right, diagnostics)?;

        let Some(place) = lhs.place else {
            diagnostics.error(&self.source_name, loc, "left assignment operand is not a variable");
            return None;
        };

        if lhs.ty != rhs.ty {
            diagnostics.error(
                &self.source_name,
                loc,
                format!("Types do not match. Expected {} but got {}", lhs.ty, rhs.ty),
            );
            return None;
        }

        self.builder.build_store(place, rhs.llvm).expect("build_store");
        Some(Value::rvalue(rhs.llvm, rhs.ty))
    }

    /// Built-in patterns exhausted: synthesize `Operator_{op}_{L}_{R}` and
    /// call it, diagnosing if no such overload exists.
    fn lower_operator_overload(
        &mut self,
        op: &str,
        lhs: &Value<'ctx>,
        rhs: &Value<'ctx>,
        loc: SourceLocation,
        diagnostics: &mut DiagnosticSink,
    ) -> Option<Value<'ctx>> {
        let left_name = cinder_types::type2str(&lhs.ty);
        let right_name = cinder_types::type2str(&rhs.ty);
        let callee_name = crate::mangle::operator_name(op, &left_name, &right_name);

        let Some(function) = self.module.get_function(&callee_name) else {
            diagnostics.error(
                &self.source_name,
                loc,
                format!("operator undefined for types '{left_name}' and '{right_name}'"),
            );
            return None;
        };

        self.emit_call(function, &[lhs.clone(), rhs.clone()], loc, diagnostics)
    }

    pub(crate) fn lower_unary_op(
        &mut self,
        op: UnaryOperator,
        inner: &Expr,
        loc: SourceLocation,
        diagnostics: &mut DiagnosticSink,
    ) -> Option<Value<'ctx>> {
        let value = self.lower_expr(inner, diagnostics)?;

        match op {
            UnaryOperator::Not => {
                if value.ty != ResolvedType::new(0, BaseType::Bool) {
                    diagnostics.error(&self.source_name, loc, "operator '~' requires a bool operand");
                    return None;
                }
                let result = self
                    .builder
                    .build_not(value.llvm.into_int_value(), "not")
                    .expect("build_not");
                Some(Value::rvalue(result.into(), value.ty))
            }
            UnaryOperator::Neg => {
                if is_float(&value.ty) {
                    let result = self
                        .builder
                        .build_float_neg(value.llvm.into_float_value(), "fneg")
                        .expect("build_float_neg");
                    Some(Value::rvalue(result.into(), value.ty))
                } else if value.ty.pointer_depth == 0 && matches!(value.ty.base, BaseType::Int | BaseType::Byte) {
                    let result = self
                        .builder
                        .build_int_neg(value.llvm.into_int_value(), "ineg")
                        .expect("build_int_neg");
                    Some(Value::rvalue(result.into(), value.ty))
                } else {
                    diagnostics.error(&self.source_name, loc, "operator '-' requires an int or float operand");
                    None
                }
            }
            UnaryOperator::AddressOf => {
                let Some(place) = value.place else {
                    diagnostics.error(&self.source_name, loc, "can not take address of a literal value");
                    return None;
                };
                Some(Value::rvalue(place.into(), value.ty.address_of()))
            }
            UnaryOperator::Deref => {
                if !value.ty.is_pointer() {
                    diagnostics.error(&self.source_name, loc, "operator '$' requires a pointer operand");
                    return None;
                }
                let pointee = value.ty.deref_once().expect("is_pointer implies deref_once");
                let pointee_llvm = self.llvm_type_or_diagnose(diagnostics, loc, &pointee)?;
                let ptr = value.llvm.into_pointer_value();
                let loaded = self.builder.build_load(pointee_llvm, ptr, "deref").expect("build_load");
                Some(Value::loaded(loaded, pointee, ptr))
            }
        }
    }

    /// `spec.md` §4.4: "On success, post-check that both operand types
    /// match and diagnose otherwise" — applied to the built-in arithmetic
    /// and comparison paths once the operator itself has been emitted.
    fn check_operand_types_match(
        &mut self,
        lhs: &Value<'ctx>,
        rhs: &Value<'ctx>,
        loc: SourceLocation,
        diagnostics: &mut DiagnosticSink,
    ) {
        if lhs.ty != rhs.ty {
            diagnostics.error(
                &self.source_name,
                loc,
                format!("Types do not match. Expected {} but got {}", rhs.ty, lhs.ty),
            );
        }
    }

    /// `int`/`byte` → `float` widening used when the right operand of an
    /// arithmetic/comparison op is float but the left is not.
    fn coerce_to_float(&mut self, value: &Value<'ctx>) -> inkwell::values::FloatValue<'ctx> {
        if is_float(&value.ty) {
            return value.llvm.into_float_value();
        }
        self.builder
            .build_signed_int_to_float(value.llvm.into_int_value(), self.context.f32_type(), "sitofp")
            .expect("sitofp")
    }
}

fn float_predicate(op: &str) -> Option<FloatPredicate> {
    Some(match op {
        ">" => FloatPredicate::OGT,
        "<" => FloatPredicate::OLT,
        "==" => FloatPredicate::OEQ,
        "~=" => FloatPredicate::ONE,
        "<=" => FloatPredicate::OLE,
        ">=" => FloatPredicate::OGE,
        _ => return None,
    })
}

fn int_predicate(op: &str) -> Option<IntPredicate> {
    Some(match op {
        ">" => IntPredicate::SGT,
        "<" => IntPredicate::SLT,
        "==" => IntPredicate::EQ,
        "~=" => IntPredicate::NE,
        "<=" => IntPredicate::SLE,
        ">=" => IntPredicate::SGE,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lower::test_support::{loc, lower_one_function};
    use cinder_ir::{Expr, Function, Variable, VariableDef};
    use inkwell::context::Context;

    fn int(value: i32) -> Expr {
        Expr::Integer { value, loc: loc() }
    }

    fn number(value: f32) -> Expr {
        Expr::Number { value, loc: loc() }
    }

    fn binary(op: &str, left: Expr, right: Expr) -> Expr {
        Expr::BinaryOp { op: op.to_string(), left: Box::new(left), right: Box::new(right), loc: loc() }
    }

    /// Scenario 1 at the operator level: `1 + 2 * 3` dispatches to integer
    /// arithmetic (neither operand is float).
    #[test]
    fn int_arithmetic_emits_integer_instructions() {
        let mut f = Function::new("main", "int", loc());
        f.body.push(Expr::Return { value: Some(Box::new(binary("+", int(1), int(2)))), loc: loc() });

        let context = Context::create();
        let (ir, diagnostics) = lower_one_function(&context, &f);
        assert!(!diagnostics.has_errors(), "{:?}", diagnostics.diagnostics());
        assert!(ir.contains("add i32"));
    }

    /// Scenario 2: the spec's float-vs-int dispatch rule — either operand
    /// being float routes to floating-point arithmetic.
    #[test]
    fn mixed_float_int_arithmetic_emits_float_instructions() {
        let mut f = Function::new("main", "float", loc());
        f.body.push(Expr::Return { value: Some(Box::new(binary("+", number(1.0), int(2)))), loc: loc() });

        let context = Context::create();
        let (ir, diagnostics) = lower_one_function(&context, &f);
        assert!(!diagnostics.has_errors(), "{:?}", diagnostics.diagnostics());
        assert!(ir.contains("fadd"));
        assert!(ir.contains("sitofp"));
    }

    #[test]
    fn comparison_of_well_typed_ints_never_forces_a_mismatch_diagnostic() {
        // Open Question #2 (`DESIGN.md`): the newer lowerer's behavior, not
        // the older copy's forced mismatch on every `==`.
        let mut f = Function::new("main", "bool", loc());
        f.body.push(Expr::Return { value: Some(Box::new(binary("==", int(1), int(1)))), loc: loc() });

        let context = Context::create();
        let (ir, diagnostics) = lower_one_function(&context, &f);
        assert!(!diagnostics.has_errors(), "{:?}", diagnostics.diagnostics());
        assert!(ir.contains("icmp eq"));
    }

    #[test]
    fn assignment_to_a_non_lvalue_is_diagnosed() {
        let mut f = Function::new("main", "int", loc());
        f.body.push(Expr::BinaryOp {
            op: "=".to_string(),
            left: Box::new(int(1)),
            right: Box::new(int(2)),
            loc: loc(),
        });
        f.body.push(Expr::Return { value: Some(Box::new(int(0))), loc: loc() });

        let context = Context::create();
        let (_ir, diagnostics) = lower_one_function(&context, &f);
        assert!(diagnostics.has_errors());
        assert!(diagnostics.diagnostics()[0].message.contains("not a variable"));
    }

    #[test]
    fn assignment_through_a_loaded_variable_stores_into_its_backing_slot() {
        let mut f = Function::new("main", "int", loc());
        f.body.push(Expr::VariableDef(VariableDef::new("x", "int", loc())));
        f.body.push(Expr::BinaryOp {
            op: "=".to_string(),
            left: Box::new(Expr::Variable(Variable::new("x", loc()))),
            right: Box::new(int(9)),
            loc: loc(),
        });
        f.body.push(Expr::Return { value: Some(Box::new(Expr::Variable(Variable::new("x", loc())))), loc: loc() });

        let context = Context::create();
        let (ir, diagnostics) = lower_one_function(&context, &f);
        assert!(!diagnostics.has_errors(), "{:?}", diagnostics.diagnostics());
        assert!(ir.contains("store i32 9"));
    }

    /// Scenario 4: no built-in pattern matches two `bool` operands under
    /// `+`, so the lowerer synthesizes and calls the mangled overload name.
    #[test]
    fn unresolved_operator_dispatches_to_the_mangled_overload_name() {
        let context = Context::create();
        let mut lowerer = crate::Lowerer::new(&context, "test", "test.lpp");
        let mut diagnostics = DiagnosticSink::new();

        let mut overload = Function::new("Operator_+_bool_bool", "bool", loc());
        overload.params.push(VariableDef::new("a", "bool", loc()));
        overload.params.push(VariableDef::new("b", "bool", loc()));
        overload.body.push(Expr::Return { value: Some(Box::new(Expr::Bool { value: true, loc: loc() })), loc: loc() });
        lowerer.lower_function(&overload, &mut diagnostics);

        let mut main = Function::new("main", "bool", loc());
        main.body.push(Expr::Return {
            value: Some(Box::new(binary(
                "+",
                Expr::Bool { value: true, loc: loc() },
                Expr::Bool { value: false, loc: loc() },
            ))),
            loc: loc(),
        });
        lowerer.lower_function(&main, &mut diagnostics);

        assert!(!diagnostics.has_errors(), "{:?}", diagnostics.diagnostics());
        let ir = lowerer.module().print_to_string().to_string();
        assert!(ir.contains("call i1 @Operator_Plus_bool_bool"));
    }

    #[test]
    fn unresolved_operator_without_a_matching_overload_is_diagnosed() {
        let context = Context::create();
        let mut f = Function::new("main", "bool", loc());
        f.body.push(Expr::Return {
            value: Some(Box::new(binary(
                "+",
                Expr::Bool { value: true, loc: loc() },
                Expr::Bool { value: false, loc: loc() },
            ))),
            loc: loc(),
        });

        let (_ir, diagnostics) = lower_one_function(&context, &f);
        assert!(diagnostics.has_errors());
        assert!(diagnostics.diagnostics()[0].message.contains("operator undefined"));
    }

    #[test]
    fn unary_not_requires_bool() {
        let context = Context::create();
        let mut f = Function::new("main", "bool", loc());
        f.body.push(Expr::Return {
            value: Some(Box::new(Expr::UnaryOp {
                op: UnaryOperator::Not,
                value: Box::new(int(1)),
                loc: loc(),
            })),
            loc: loc(),
        });

        let (_ir, diagnostics) = lower_one_function(&context, &f);
        assert!(diagnostics.has_errors());
        assert!(diagnostics.diagnostics()[0].message.contains("requires a bool operand"));
    }

    #[test]
    fn address_of_a_literal_is_diagnosed() {
        let context = Context::create();
        let mut f = Function::new("main", "int", loc());
        f.body.push(Expr::Return {
            value: Some(Box::new(Expr::UnaryOp {
                op: UnaryOperator::AddressOf,
                value: Box::new(int(1)),
                loc: loc(),
            })),
            loc: loc(),
        });

        let (_ir, diagnostics) = lower_one_function(&context, &f);
        assert!(diagnostics.has_errors());
        assert!(diagnostics.diagnostics()[0].message.contains("can not take address of"));
    }

    #[test]
    fn address_of_a_loaded_variable_recovers_its_backing_pointer() {
        let context = Context::create();
        let mut f = Function::new("main", "@int", loc());
        f.body.push(Expr::VariableDef(VariableDef::new("x", "int", loc())));
        f.body.push(Expr::Return {
            value: Some(Box::new(Expr::UnaryOp {
                op: UnaryOperator::AddressOf,
                value: Box::new(Expr::Variable(Variable::new("x", loc()))),
                loc: loc(),
            })),
            loc: loc(),
        });

        let (_ir, diagnostics) = lower_one_function(&context, &f);
        assert!(!diagnostics.has_errors(), "{:?}", diagnostics.diagnostics());
    }
}

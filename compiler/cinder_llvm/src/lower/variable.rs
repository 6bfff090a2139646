//! `Variable` lowering: name resolution, indexing, and field-chain
//! traversal, per `spec.md` §4.4 and `SPEC_FULL.md` §3.1.
//!
//! Every `Variable` produces a *loaded* value — the lowerer's uniform
//! l-value/r-value convention (`spec.md` §4.3). Callers that need the
//! address back (assignment, `@`) recover it from `Value::place`.

use cinder_diagnostic::DiagnosticSink;
use cinder_ir::{SourceLocation, Variable};
use cinder_types::{BaseType, ResolvedType};
use inkwell::values::PointerValue;

use crate::scope::Slot;
use crate::value::Value;
use crate::Lowerer;

impl<'ctx> Lowerer<'ctx> {
    pub(crate) fn lower_variable(&mut self, var: &Variable, diagnostics: &mut DiagnosticSink) -> Option<Value<'ctx>> {
        let slot = match self.scope.lookup(&var.name).cloned() {
            Some(slot) => slot,
            None => return self.lower_function_reference(var, diagnostics),
        };

        let mut current_ptr = slot.ptr;
        let mut current_ty = slot.ty;
        let mut current_array_len = slot.array_len;
        let mut link = var;

        loop {
            if let Some(index_expr) = &link.index {
                let (ptr, ty) = self.lower_index(
                    current_ptr,
                    &current_ty,
                    current_array_len,
                    index_expr,
                    link.loc,
                    diagnostics,
                )?;
                current_ptr = ptr;
                current_ty = ty;
                current_array_len = None;
            }

            match &link.field {
                Some(next) => {
                    let (ptr, ty, array_len) =
                        self.lower_field_access(current_ptr, &current_ty, next, diagnostics)?;
                    current_ptr = ptr;
                    current_ty = ty;
                    current_array_len = array_len;
                    link = next;
                }
                None => break,
            }
        }

        let elem_llvm = self.llvm_type_or_diagnose(diagnostics, link.loc, &current_ty)?;
        let loaded = self
            .builder
            .build_load(elem_llvm, current_ptr, "load")
            .expect("build_load");
        Some(Value::loaded(loaded, current_ty, current_ptr))
    }

    /// `scope.lookup` fallback (`spec.md` §4.3): no slot bound under this
    /// name, but a function of that name exists — yield an i8* bitcast of
    /// its address rather than diagnosing "undefined variable". Only
    /// applies to a bare name reference; a function has no fields or
    /// elements to index, so an index/field chain on one still diagnoses.
    fn lower_function_reference(&mut self, var: &Variable, diagnostics: &mut DiagnosticSink) -> Option<Value<'ctx>> {
        if var.index.is_none() && var.field.is_none() {
            if let Some(function) = self.module.get_function(&var.name) {
                let ptr = crate::scope::function_pointer_value(function);
                return Some(Value::rvalue(ptr.into(), ResolvedType::new(1, BaseType::Byte)));
            }
        }
        diagnostics.error(&self.source_name, var.loc, format!("undefined variable '{}'", var.name));
        None
    }

    /// `v[i]`: array-typed slots GEP into the array then (conceptually)
    /// narrow to an element pointer; plain pointer variables load the
    /// pointer value first, then GEP on *that* (`SPEC_FULL.md` §3.1).
    fn lower_index(
        &mut self,
        base_ptr: PointerValue<'ctx>,
        base_ty: &ResolvedType,
        array_len: Option<u32>,
        index_expr: &cinder_ir::Expr,
        loc: SourceLocation,
        diagnostics: &mut DiagnosticSink,
    ) -> Option<(PointerValue<'ctx>, ResolvedType)> {
        let index = self.lower_expr(index_expr, diagnostics)?;
        let index = index.llvm.into_int_value();
        let zero = self.context.i32_type().const_zero();

        if let Some(len) = array_len {
            let elem_llvm = self.llvm_type_or_diagnose(diagnostics, loc, base_ty)?;
            let array_llvm = elem_llvm.array_type(len);
            let ptr = unsafe {
                self.builder
                    .build_gep(array_llvm, base_ptr, &[zero, index], "idx")
                    .expect("build_gep")
            };
            return Some((ptr, base_ty.clone()));
        }

        if !base_ty.is_pointer() {
            diagnostics.error(&self.source_name, loc, "can not index scalar values");
            return None;
        }

        let ptr_llvm = self.context.ptr_type(inkwell::AddressSpace::default());
        let pointee = base_ty.deref_once().expect("is_pointer implies deref_once");
        let loaded_ptr = self
            .builder
            .build_load(ptr_llvm, base_ptr, "ptrval")
            .expect("build_load")
            .into_pointer_value();
        let elem_llvm = self.llvm_type_or_diagnose(diagnostics, loc, &pointee)?;
        let ptr = unsafe {
            self.builder
                .build_gep(elem_llvm, loaded_ptr, &[index], "idx")
                .expect("build_gep")
        };
        Some((ptr, pointee))
    }

    /// Descend one `.field` link: implicitly dereference one pointer level
    /// if `base_ty` is a pointer to a struct, then GEP the named field.
    fn lower_field_access(
        &mut self,
        base_ptr: PointerValue<'ctx>,
        base_ty: &ResolvedType,
        field: &Variable,
        diagnostics: &mut DiagnosticSink,
    ) -> Option<(PointerValue<'ctx>, ResolvedType, Option<u32>)> {
        let (struct_ptr, struct_ty) = if base_ty.pointer_depth >= 1 {
            let ptr_llvm = self.context.ptr_type(inkwell::AddressSpace::default());
            let loaded = self
                .builder
                .build_load(ptr_llvm, base_ptr, "field_base")
                .expect("build_load")
                .into_pointer_value();
            (loaded, base_ty.deref_once().expect("pointer_depth >= 1"))
        } else {
            (base_ptr, base_ty.clone())
        };

        let BaseType::Struct(class_name) = &struct_ty.base else {
            diagnostics.error(
                &self.source_name,
                field.loc,
                "can not access a field of a non-class object",
            );
            return None;
        };
        if struct_ty.pointer_depth != 0 {
            diagnostics.error(
                &self.source_name,
                field.loc,
                "can not access a field of a non-class object",
            );
            return None;
        }

        let class = self.scope.class(class_name).cloned().or_else(|| {
            diagnostics.error(&self.source_name, field.loc, format!("undefined class '{class_name}'"));
            None
        })?;

        let Some(struct_index) = self.struct_field_index(&class, &field.name) else {
            diagnostics.error(
                &self.source_name,
                field.loc,
                format!("class '{}' has no field '{}'", class.name, field.name),
            );
            return None;
        };
        let field_def = class.member(&field.name).expect("struct_field_index implies member");
        let field_ty = self.resolve_type(&field_def.type_name).or_else(|| {
            self.diagnose_unknown_type(diagnostics, field.loc, &field_def.type_name);
            None
        })?;

        let struct_llvm = self
            .context
            .get_struct_type(&class.name)
            .expect("class lowering registers the struct type before fields are accessed");
        let ptr = self
            .builder
            .build_struct_gep(struct_llvm, struct_ptr, struct_index, "field")
            .expect("build_struct_gep");

        let array_len = if field_def.size > 0 { Some(field_def.size) } else { None };
        Some((ptr, field_ty, array_len))
    }

    /// Index of `name` among the fields actually present in the LLVM
    /// struct body — excludes self-typed-by-value fields the way
    /// [`Lowerer::struct_body_fields`] does, so GEP indices line up.
    fn struct_field_index(&self, class: &cinder_ir::ClassDef, name: &str) -> Option<u32> {
        self.struct_body_fields(class)
            .iter()
            .position(|f| f.name == name)
            .map(|i| i as u32)
    }

    /// Fields that contribute to the class's LLVM struct body: every
    /// declared field except one whose type names the class itself *by
    /// value* (`SPEC_FULL.md` §3.1 — a self-referential pointer field,
    /// e.g. a linked-list `next`, is unaffected and stays in the body).
    pub(crate) fn struct_body_fields<'a>(&self, class: &'a cinder_ir::ClassDef) -> Vec<&'a cinder_ir::VariableDef> {
        class
            .fields
            .iter()
            .filter(|f| f.type_name != class.name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::lower::test_support::{loc, lower_one_function};
    use cinder_ir::{ClassDef, Expr, Function, Variable, VariableDef};
    use inkwell::context::Context;

    /// Scenario 6: an undefined variable produces a single diagnostic at
    /// the referencing expression's location.
    #[test]
    fn undefined_variable_is_diagnosed() {
        let mut f = Function::new("f", "int", loc());
        f.body.push(Expr::Return {
            value: Some(Box::new(Expr::Variable(Variable::new("y", loc())))),
            loc: loc(),
        });

        let context = Context::create();
        let (_ir, diagnostics) = lower_one_function(&context, &f);
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.diagnostics().len(), 1);
        assert!(diagnostics.diagnostics()[0].message.contains("undefined variable 'y'"));
    }

    #[test]
    fn indexing_a_scalar_is_diagnosed() {
        let mut f = Function::new("f", "int", loc());
        f.body.push(Expr::VariableDef(VariableDef::new("x", "int", loc())));
        f.body.push(Expr::Return {
            value: Some(Box::new(Expr::Variable(
                Variable::new("x", loc()).with_index(Expr::Integer { value: 0, loc: loc() }),
            ))),
            loc: loc(),
        });

        let context = Context::create();
        let (_ir, diagnostics) = lower_one_function(&context, &f);
        assert!(diagnostics.has_errors());
        assert!(diagnostics.diagnostics()[0].message.contains("can not index scalar values"));
    }

    #[test]
    fn array_local_indexes_via_the_array_gep_path() {
        let mut f = Function::new("f", "int", loc());
        let mut xs = VariableDef::new("xs", "int", loc());
        xs.size = 4;
        f.body.push(Expr::VariableDef(xs));
        f.body.push(Expr::Return {
            value: Some(Box::new(Expr::Variable(
                Variable::new("xs", loc()).with_index(Expr::Integer { value: 1, loc: loc() }),
            ))),
            loc: loc(),
        });

        let context = Context::create();
        let (ir, diagnostics) = lower_one_function(&context, &f);
        assert!(!diagnostics.has_errors(), "{:?}", diagnostics.diagnostics());
        assert!(ir.contains("getelementptr inbounds"));
        assert!(ir.contains("[4 x i32]"));
    }

    #[test]
    fn field_access_on_a_non_class_value_is_diagnosed() {
        let mut f = Function::new("f", "int", loc());
        f.body.push(Expr::VariableDef(VariableDef::new("x", "int", loc())));
        f.body.push(Expr::Return {
            value: Some(Box::new(Expr::Variable(Variable::new("x", loc()).with_field(Variable::new("y", loc()))))),
            loc: loc(),
        });

        let context = Context::create();
        let (_ir, diagnostics) = lower_one_function(&context, &f);
        assert!(diagnostics.has_errors());
        assert!(diagnostics.diagnostics()[0].message.contains("non-class object"));
    }

    /// `SPEC_FULL.md` §3.1: a self-referential *pointer* field (a linked-list
    /// `next`) stays in the struct body — indexing past it to a later field
    /// must still land on the right GEP index.
    #[test]
    fn field_chain_resolves_past_a_self_referential_pointer_field() {
        let context = Context::create();
        let mut lowerer = crate::Lowerer::new(&context, "test", "test.lpp");
        let mut diagnostics = cinder_diagnostic::DiagnosticSink::new();

        let mut class = ClassDef::new("Node", loc());
        class.fields.push(VariableDef::new("next", "@Node", loc()));
        class.fields.push(VariableDef::new("value", "int", loc()));
        lowerer.lower_class(&class, &mut diagnostics);

        let mut f = Function::new("read_value", "int", loc());
        f.params.push(VariableDef::new("n", "@Node", loc()));
        f.body.push(Expr::Return {
            value: Some(Box::new(Expr::Variable(Variable::new("n", loc()).with_field(Variable::new("value", loc()))))),
            loc: loc(),
        });
        lowerer.lower_function(&f, &mut diagnostics);

        assert!(!diagnostics.has_errors(), "{:?}", diagnostics.diagnostics());
    }

    /// `SPEC_FULL.md` §3.1: a field typed exactly as the enclosing class
    /// (by value, not by pointer) is excluded from the LLVM struct body —
    /// `struct_body_fields` drops it, so a later field's GEP index is
    /// computed against the reduced field list, not `class.fields` itself.
    #[test]
    fn self_typed_by_value_field_is_excluded_from_the_struct_body() {
        let context = Context::create();
        let mut lowerer = crate::Lowerer::new(&context, "test", "test.lpp");
        let mut diagnostics = cinder_diagnostic::DiagnosticSink::new();

        let mut class = ClassDef::new("Weird", loc());
        class.fields.push(VariableDef::new("self_value", "Weird", loc()));
        class.fields.push(VariableDef::new("value", "int", loc()));
        assert_eq!(lowerer.struct_body_fields(&class).len(), 1);
        lowerer.lower_class(&class, &mut diagnostics);

        let mut f = Function::new("read_value", "int", loc());
        f.params.push(VariableDef::new("n", "@Weird", loc()));
        f.body.push(Expr::Return {
            value: Some(Box::new(Expr::Variable(Variable::new("n", loc()).with_field(Variable::new("value", loc()))))),
            loc: loc(),
        });
        lowerer.lower_function(&f, &mut diagnostics);

        assert!(!diagnostics.has_errors(), "{:?}", diagnostics.diagnostics());
    }

    /// `spec.md` §4.3: a bare name with no bound variable but a matching
    /// declared function resolves to that function's address (i8* bitcast)
    /// instead of diagnosing "undefined variable".
    #[test]
    fn bare_name_matching_a_function_resolves_to_its_address() {
        let context = Context::create();
        let mut lowerer = crate::Lowerer::new(&context, "test", "test.lpp");
        let mut diagnostics = cinder_diagnostic::DiagnosticSink::new();

        let helper = Function::new("helper", "int", loc());
        lowerer.lower_function(&helper, &mut diagnostics);

        let mut main = Function::new("main", "int", loc());
        main.body.push(Expr::VariableDef(VariableDef::new("fp", "@byte", loc())));
        main.body.push(Expr::BinaryOp {
            op: "=".to_string(),
            left: Box::new(Expr::Variable(Variable::new("fp", loc()))),
            right: Box::new(Expr::Variable(Variable::new("helper", loc()))),
            loc: loc(),
        });
        main.body.push(Expr::Return { value: Some(Box::new(Expr::Integer { value: 0, loc: loc() })), loc: loc() });
        lowerer.lower_function(&main, &mut diagnostics);

        assert!(!diagnostics.has_errors(), "{:?}", diagnostics.diagnostics());
        let ir = lowerer.module().print_to_string().to_string();
        assert!(ir.contains("@helper"));
    }

    /// An index/field chain on a bare name that only matches a function
    /// (not a variable) still diagnoses — functions have no elements or
    /// fields to index into.
    #[test]
    fn indexing_a_function_name_is_still_diagnosed() {
        let context = Context::create();
        let mut lowerer = crate::Lowerer::new(&context, "test", "test.lpp");
        let mut diagnostics = cinder_diagnostic::DiagnosticSink::new();

        let helper = Function::new("helper", "int", loc());
        lowerer.lower_function(&helper, &mut diagnostics);

        let mut main = Function::new("main", "int", loc());
        main.body.push(Expr::Return {
            value: Some(Box::new(Expr::Variable(
                Variable::new("helper", loc()).with_index(Expr::Integer { value: 0, loc: loc() }),
            ))),
            loc: loc(),
        });
        lowerer.lower_function(&main, &mut diagnostics);

        assert!(diagnostics.has_errors());
        assert!(diagnostics.diagnostics()[0].message.contains("undefined variable 'helper'"));
    }
}

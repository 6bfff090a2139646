//! `VariableDef` lowering: locals and globals, inferred and explicitly
//! typed, scalar and fixed-size array, per `spec.md` §4.4.

use cinder_diagnostic::DiagnosticSink;
use cinder_types::ResolvedType;
use inkwell::module::Linkage;

use cinder_ir::VariableDef;

use crate::scope::Slot;
use crate::value::Value;
use crate::Lowerer;

impl<'ctx> Lowerer<'ctx> {
    /// A `VariableDef` reached in statement position inside a function
    /// body — always local (`spec.md` §4.3's `is_top_level` distinguishes
    /// this from [`Lowerer::lower_global_variable_def`], which handles the
    /// top-level case directly rather than through this dispatch path).
    pub(crate) fn lower_local_variable_def(
        &mut self,
        def: &VariableDef,
        diagnostics: &mut DiagnosticSink,
    ) -> Option<Value<'ctx>> {
        if self.scope.collides(&def.name) {
            diagnostics.error(&self.source_name, def.loc, format!("variable name collision: '{}'", def.name));
            return None;
        }

        if def.is_inferred() {
            let Some(initial) = &def.initial else {
                diagnostics.error(&self.source_name, def.loc, "inferred-type local requires an initializer");
                return None;
            };
            let initial = self.lower_expr(initial, diagnostics)?;
            let llvm_ty = self.llvm_type_or_diagnose(diagnostics, def.loc, &initial.ty)?;
            let alloca = self.builder.build_alloca(llvm_ty, &def.name).expect("build_alloca");
            self.builder.build_store(alloca, initial.llvm).expect("build_store");
            self.scope.declare_local(def.name.clone(), Slot::scalar(alloca, initial.ty));
            return None;
        }

        let declared = self.resolve_type(&def.type_name).or_else(|| {
            self.diagnose_unknown_type(diagnostics, def.loc, &def.type_name);
            None
        })?;
        let slot = self.allocate_local_slot(def, &declared, diagnostics)?;

        if let Some(initial) = &def.initial {
            let initial = self.lower_expr(initial, diagnostics)?;
            if initial.ty != declared {
                diagnostics.error(
                    &self.source_name,
                    def.loc,
                    format!("Types do not match. Expected {declared} but got {}", initial.ty),
                );
                return None;
            }
            self.builder.build_store(slot.ptr, initial.llvm).expect("build_store");
        }

        self.scope.declare_local(def.name.clone(), slot);
        None
    }

    fn allocate_local_slot(
        &mut self,
        def: &VariableDef,
        declared: &ResolvedType,
        diagnostics: &mut DiagnosticSink,
    ) -> Option<Slot<'ctx>> {
        let elem_llvm = self.llvm_type_or_diagnose(diagnostics, def.loc, declared)?;
        if def.is_array() {
            let array_llvm = elem_llvm.array_type(def.size);
            let alloca = self.builder.build_alloca(array_llvm, &def.name).expect("build_alloca");
            Some(Slot::array(alloca, declared.clone(), def.size))
        } else {
            let alloca = self.builder.build_alloca(elem_llvm, &def.name).expect("build_alloca");
            Some(Slot::scalar(alloca, declared.clone()))
        }
    }

    /// Top-level `VariableDef`: extern declaration or a global with
    /// common linkage, constant-initialized.
    pub(crate) fn lower_global_variable_def(&mut self, def: &VariableDef, diagnostics: &mut DiagnosticSink) {
        if self.scope.collides(&def.name) {
            diagnostics.error(&self.source_name, def.loc, format!("variable name collision: '{}'", def.name));
            return;
        }

        if def.is_extern {
            if def.initial.is_some() {
                diagnostics.error(&self.source_name, def.loc, "extern variable can not have an initializer");
                return;
            }
            let Some(declared) = self.resolve_type(&def.type_name) else {
                self.diagnose_unknown_type(diagnostics, def.loc, &def.type_name);
                return;
            };
            let Some(elem_llvm) = self.llvm_type_or_diagnose(diagnostics, def.loc, &declared) else {
                return;
            };
            let llvm_ty = if def.is_array() { elem_llvm.array_type(def.size).into() } else { elem_llvm };
            let global = self.module.add_global(llvm_ty, None, &def.name);
            global.set_linkage(Linkage::External);
            self.scope.declare_global(def.name.clone(), Slot::scalar(global.as_pointer_value(), declared));
            return;
        }

        if def.is_inferred() {
            let Some(initial_expr) = &def.initial else {
                diagnostics.error(&self.source_name, def.loc, "inferred-type global requires an initializer");
                return;
            };
            let Some(initial) = self.lower_expr(initial_expr, diagnostics) else { return };
            if !initial.llvm.is_const() {
                diagnostics.error(&self.source_name, def.loc, "global initializer must be a constant");
                return;
            }
            let global = self.module.add_global(initial.llvm.get_type(), None, &def.name);
            global.set_linkage(Linkage::Common);
            global.set_initializer(&initial.llvm);
            self.scope
                .declare_global(def.name.clone(), Slot::scalar(global.as_pointer_value(), initial.ty));
            return;
        }

        let Some(declared) = self.resolve_type(&def.type_name) else {
            self.diagnose_unknown_type(diagnostics, def.loc, &def.type_name);
            return;
        };
        let Some(elem_llvm) = self.llvm_type_or_diagnose(diagnostics, def.loc, &declared) else {
            return;
        };
        let llvm_ty = if def.is_array() { elem_llvm.array_type(def.size).into() } else { elem_llvm };
        let global = self.module.add_global(llvm_ty, None, &def.name);
        global.set_linkage(Linkage::Common);

        match &def.initial {
            Some(initial_expr) => {
                let Some(initial) = self.lower_expr(initial_expr, diagnostics) else { return };
                if initial.ty != declared {
                    diagnostics.error(
                        &self.source_name,
                        def.loc,
                        format!("Types do not match. Expected {declared} but got {}", initial.ty),
                    );
                    return;
                }
                if !initial.llvm.is_const() {
                    diagnostics.error(&self.source_name, def.loc, "global initializer must be a constant");
                    return;
                }
                global.set_initializer(&initial.llvm);
            }
            None => {
                global.set_initializer(&llvm_ty.const_zero());
            }
        }

        self.scope.declare_global(def.name.clone(), Slot::scalar(global.as_pointer_value(), declared));
    }
}

#[cfg(test)]
mod tests {
    use crate::lower::test_support::{loc, lower_one_function};
    use cinder_ir::{Expr, Function, VariableDef};
    use inkwell::context::Context;

    #[test]
    fn inferred_local_allocates_the_initializers_type() {
        let mut f = Function::new("main", "int", loc());
        let mut x = VariableDef::new("x", "", loc());
        x.initial = Some(Box::new(Expr::Integer { value: 7, loc: loc() }));
        f.body.push(Expr::VariableDef(x));
        f.body.push(Expr::Return {
            value: Some(Box::new(Expr::Variable(cinder_ir::Variable::new("x", loc())))),
            loc: loc(),
        });

        let context = Context::create();
        let (ir, diagnostics) = lower_one_function(&context, &f);
        assert!(!diagnostics.has_errors(), "{:?}", diagnostics.diagnostics());
        assert!(ir.contains("alloca i32"));
    }

    #[test]
    fn typed_local_with_mismatched_initializer_is_diagnosed() {
        let mut f = Function::new("main", "int", loc());
        let mut x = VariableDef::new("x", "float", loc());
        x.initial = Some(Box::new(Expr::Integer { value: 1, loc: loc() }));
        f.body.push(Expr::VariableDef(x));
        f.body.push(Expr::Return { value: Some(Box::new(Expr::Integer { value: 0, loc: loc() })), loc: loc() });

        let context = Context::create();
        let (_ir, diagnostics) = lower_one_function(&context, &f);
        assert!(diagnostics.has_errors());
        assert!(diagnostics.diagnostics()[0].message.contains("float"));
        assert!(diagnostics.diagnostics()[0].message.contains("int"));
    }

    #[test]
    fn duplicate_local_name_is_a_collision() {
        let mut f = Function::new("main", "int", loc());
        f.body.push(Expr::VariableDef(VariableDef::new("x", "int", loc())));
        f.body.push(Expr::VariableDef(VariableDef::new("x", "int", loc())));
        f.body.push(Expr::Return { value: Some(Box::new(Expr::Integer { value: 0, loc: loc() })), loc: loc() });

        let context = Context::create();
        let (_ir, diagnostics) = lower_one_function(&context, &f);
        assert!(diagnostics.has_errors());
        assert!(diagnostics.diagnostics()[0].message.contains("collision"));
    }

    #[test]
    fn array_sized_local_allocates_an_array_type() {
        let mut f = Function::new("main", "int", loc());
        let mut xs = VariableDef::new("xs", "int", loc());
        xs.size = 4;
        f.body.push(Expr::VariableDef(xs));
        f.body.push(Expr::Return { value: Some(Box::new(Expr::Integer { value: 0, loc: loc() })), loc: loc() });

        let context = Context::create();
        let (ir, diagnostics) = lower_one_function(&context, &f);
        assert!(!diagnostics.has_errors(), "{:?}", diagnostics.diagnostics());
        assert!(ir.contains("alloca [4 x i32]"));
    }

    #[test]
    fn extern_local_disallows_an_initializer_only_at_top_level() {
        // `spec.md` §3: `VariableDef.extern` is only meaningful at top
        // level; this test documents the local path never even looks at
        // `is_extern` for collision/type purposes.
        let mut f = Function::new("main", "int", loc());
        f.body.push(Expr::VariableDef(VariableDef::new("x", "int", loc())));
        f.body.push(Expr::Return {
            value: Some(Box::new(Expr::Variable(cinder_ir::Variable::new("x", loc())))),
            loc: loc(),
        });

        let context = Context::create();
        let (_ir, diagnostics) = lower_one_function(&context, &f);
        assert!(!diagnostics.has_errors());
    }
}

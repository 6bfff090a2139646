//! `ClassDef` lowering: an opaque LLVM struct type plus its methods,
//! each mangled and given an implicit leading `self` parameter, per
//! `spec.md` §3/§4.4.

use cinder_diagnostic::DiagnosticSink;
use cinder_ir::ClassDef;

use crate::Lowerer;

impl<'ctx> Lowerer<'ctx> {
    pub(crate) fn lower_class(&mut self, class: &ClassDef, diagnostics: &mut DiagnosticSink) {
        if !self.scope.declare_class(class.clone()) {
            diagnostics.error(&self.source_name, class.loc, format!("class '{}' is already defined", class.name));
            return;
        }

        let struct_ty = self.context.opaque_struct_type(&class.name);
        let mut body = Vec::new();
        for field in self.struct_body_fields(class) {
            let Some(resolved) = self.resolve_type(&field.type_name) else {
                self.diagnose_unknown_type(diagnostics, field.loc, &field.type_name);
                continue;
            };
            let Some(elem) = self.llvm_type_or_diagnose(diagnostics, field.loc, &resolved) else {
                continue;
            };
            body.push(if field.is_array() { elem.array_type(field.size).into() } else { elem });
        }
        struct_ty.set_body(&body, false);

        // The class table already stores the unmangled names the method
        // bodies call `self:method(...)` with — mangle only for the
        // duration of `lower_function`, then restore, so repeated lowering
        // of the same module (e.g. `cinder_compiler`'s multi-unit driver)
        // sees the original AST each time.
        let class = self.scope.class(&class.name).cloned().expect("just declared");
        for method in &class.methods {
            let mut mangled = method.clone();
            mangled.name = crate::mangle::method_name(&class.name, &method.name);
            let self_ty = format!("@{}", class.name);
            let has_self_param = mangled.params.first().is_some_and(|p| p.type_name == self_ty);
            if !has_self_param {
                mangled
                    .params
                    .insert(0, cinder_ir::VariableDef::new("self", format!("@{}", class.name), method.loc));
            }
            self.lower_function(&mangled, diagnostics);
        }
    }
}

//! `If`/`While`/`For`/`Label`/`Goto` lowering, per `spec.md` §4.4.
//!
//! Each construct creates fresh basic blocks for its branches and a shared
//! continuation block; the insertion point ends on the continuation,
//! terminated or not, so the caller's `lower_block` can keep emitting.

use cinder_diagnostic::DiagnosticSink;
use cinder_ir::{Expr, SourceLocation};
use cinder_types::{BaseType, ResolvedType};

use crate::value::Value;
use crate::Lowerer;

impl<'ctx> Lowerer<'ctx> {
    pub(crate) fn lower_if(
        &mut self,
        head: &Expr,
        body: &[Expr],
        else_body: &[Expr],
        loc: SourceLocation,
        diagnostics: &mut DiagnosticSink,
    ) -> Option<Value<'ctx>> {
        let cond = self.lower_bool_head(head, loc, diagnostics)?;

        let function = self.current_function.expect("If only appears inside a function body");
        let then_block = self.context.append_basic_block(function, "if_true");
        let else_block = self.context.append_basic_block(function, "if_false");
        let continue_block = self.context.append_basic_block(function, "if_continue");

        self.builder
            .build_conditional_branch(cond, then_block, else_block)
            .expect("build_conditional_branch");

        self.builder.position_at_end(then_block);
        self.scope.enter();
        self.lower_block(body, diagnostics);
        self.scope.exit();
        if !self.current_block_terminated() {
            self.builder.build_unconditional_branch(continue_block).expect("build_unconditional_branch");
        }

        self.builder.position_at_end(else_block);
        self.scope.enter();
        self.lower_block(else_body, diagnostics);
        self.scope.exit();
        if !self.current_block_terminated() {
            self.builder.build_unconditional_branch(continue_block).expect("build_unconditional_branch");
        }

        self.builder.position_at_end(continue_block);
        None
    }

    pub(crate) fn lower_while(
        &mut self,
        head: &Expr,
        body: &[Expr],
        loc: SourceLocation,
        diagnostics: &mut DiagnosticSink,
    ) -> Option<Value<'ctx>> {
        let function = self.current_function.expect("While only appears inside a function body");
        let head_block = self.context.append_basic_block(function, "while_head");
        let body_block = self.context.append_basic_block(function, "while_body");
        let continue_block = self.context.append_basic_block(function, "while_continue");

        self.builder.build_unconditional_branch(head_block).expect("build_unconditional_branch");
        self.builder.position_at_end(head_block);
        let cond = self.lower_bool_head(head, loc, diagnostics)?;
        self.builder
            .build_conditional_branch(cond, body_block, continue_block)
            .expect("build_conditional_branch");

        self.builder.position_at_end(body_block);
        self.scope.enter();
        self.lower_block(body, diagnostics);
        self.scope.exit();
        if !self.current_block_terminated() {
            self.builder.build_unconditional_branch(head_block).expect("build_unconditional_branch");
        }

        self.builder.position_at_end(continue_block);
        None
    }

    pub(crate) fn lower_for(
        &mut self,
        init: &Expr,
        cond: &Expr,
        inc: &Expr,
        body: &[Expr],
        loc: SourceLocation,
        diagnostics: &mut DiagnosticSink,
    ) -> Option<Value<'ctx>> {
        let function = self.current_function.expect("For only appears inside a function body");

        self.scope.enter();
        self.lower_expr(init, diagnostics);

        let head_block = self.context.append_basic_block(function, "for_head");
        let body_block = self.context.append_basic_block(function, "for_body");
        let continue_block = self.context.append_basic_block(function, "for_continue");

        self.builder.build_unconditional_branch(head_block).expect("build_unconditional_branch");
        self.builder.position_at_end(head_block);
        let head_cond = self.lower_bool_head(cond, loc, diagnostics);
        let Some(head_cond) = head_cond else {
            self.scope.exit();
            return None;
        };
        self.builder
            .build_conditional_branch(head_cond, body_block, continue_block)
            .expect("build_conditional_branch");

        self.builder.position_at_end(body_block);
        self.lower_block(body, diagnostics);
        if !self.current_block_terminated() {
            self.lower_expr(inc, diagnostics);
            self.builder.build_unconditional_branch(head_block).expect("build_unconditional_branch");
        }

        self.scope.exit();
        self.builder.position_at_end(continue_block);
        None
    }

    /// A label declares a basic block at the current point and falls
    /// through into it; `goto` later jumps to whatever block the label
    /// with that name resolves to.
    pub(crate) fn lower_label(&mut self, name: &str, _loc: SourceLocation) {
        let function = self.current_function.expect("Label only appears inside a function body");
        let block = self.context.append_basic_block(function, name);
        if !self.current_block_terminated() {
            self.builder.build_unconditional_branch(block).expect("build_unconditional_branch");
        }
        self.scope.declare_label(name, block);
        self.builder.position_at_end(block);
    }

    pub(crate) fn lower_goto(&mut self, name: &str, loc: SourceLocation, diagnostics: &mut DiagnosticSink) {
        let Some(block) = self.scope.lookup_label(name) else {
            diagnostics.error(&self.source_name, loc, format!("undefined label '{name}'"));
            return;
        };
        self.builder.build_unconditional_branch(block).expect("build_unconditional_branch");
    }

    /// Evaluate a control-flow head expression, diagnosing if it is not
    /// `bool`-typed (`spec.md` §4.4).
    fn lower_bool_head(
        &mut self,
        head: &Expr,
        loc: SourceLocation,
        diagnostics: &mut DiagnosticSink,
    ) -> Option<inkwell::values::IntValue<'ctx>> {
        let value = self.lower_expr(head, diagnostics)?;
        if value.ty != ResolvedType::new(0, BaseType::Bool) {
            diagnostics.error(&self.source_name, loc, "condition must be a bool expression");
            return None;
        }
        Some(value.llvm.into_int_value())
    }
}

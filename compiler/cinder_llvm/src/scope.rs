//! Lexically-scoped symbol table, per `spec.md` §4.3.
//!
//! A stack of frames mapping name → addressable slot, plus a flat
//! module-wide class table. Scoped to one `lower_module` call rather than
//! process-global (`SPEC_FULL.md` §4.3's refinement of `spec.md` §9's note
//! on lifting the original's global visited-files set into a context
//! object, applied here to the class table too).

use cinder_ir::ClassDef;
use cinder_types::ResolvedType;
use inkwell::values::{BasicBlock, FunctionValue, PointerValue};
use rustc_hash::FxHashMap;

/// An addressable name binding: the pointer backing a variable or global,
/// and the source-level type it points to.
#[derive(Clone, Debug)]
pub struct Slot<'ctx> {
    pub ptr: PointerValue<'ctx>,
    pub ty: ResolvedType,
    /// `Some(n)` when this slot is a fixed-size array of `n` elements of
    /// `ty` (`VariableDef.size > 0`), indexed differently from a plain
    /// pointer variable — see `SPEC_FULL.md` §3.1.
    pub array_len: Option<u32>,
}

impl<'ctx> Slot<'ctx> {
    #[must_use]
    pub fn scalar(ptr: PointerValue<'ctx>, ty: ResolvedType) -> Self {
        Slot { ptr, ty, array_len: None }
    }

    #[must_use]
    pub fn array(ptr: PointerValue<'ctx>, ty: ResolvedType, len: u32) -> Self {
        Slot { ptr, ty, array_len: Some(len) }
    }
}

/// One lexical level: local variables plus `Label` targets declared at
/// this level (both live in the same namespace in the original; kept
/// separate here since an LLVM `BasicBlock` and a variable slot are not
/// interchangeable under opaque pointers the way two `llvm::Value*`s were).
#[derive(Default)]
struct Frame<'ctx> {
    variables: FxHashMap<String, Slot<'ctx>>,
    labels: FxHashMap<String, BasicBlock<'ctx>>,
}

pub struct SymbolScope<'ctx> {
    frames: Vec<Frame<'ctx>>,
    globals: FxHashMap<String, Slot<'ctx>>,
    classes: FxHashMap<String, ClassDef>,
}

impl<'ctx> SymbolScope<'ctx> {
    #[must_use]
    pub fn new() -> Self {
        SymbolScope {
            frames: Vec::new(),
            globals: FxHashMap::default(),
            classes: FxHashMap::default(),
        }
    }

    pub fn enter(&mut self) {
        self.frames.push(Frame::default());
    }

    pub fn exit(&mut self) {
        self.frames.pop();
    }

    /// True at global scope — no frame is currently open. Distinguishes a
    /// top-level `VariableDef` from a local one (`spec.md` §4.3).
    #[must_use]
    pub fn is_top_level(&self) -> bool {
        self.frames.is_empty()
    }

    /// Declare a local in the innermost frame. Panics if called at top
    /// level — callers must route top-level definitions through
    /// `declare_global` instead (enforced by `is_top_level` checks in the
    /// lowerer, not re-checked here).
    pub fn declare_local(&mut self, name: impl Into<String>, slot: Slot<'ctx>) {
        self.frames
            .last_mut()
            .expect("declare_local called at top level")
            .variables
            .insert(name.into(), slot);
    }

    pub fn declare_global(&mut self, name: impl Into<String>, slot: Slot<'ctx>) {
        self.globals.insert(name.into(), slot);
    }

    /// True if `name` is already bound in the *innermost* frame (locals) or
    /// globals (top level) — `spec.md`'s "variable name collision" check is
    /// scoped to "the same scope or in globals", not outer frames.
    #[must_use]
    pub fn collides(&self, name: &str) -> bool {
        if let Some(frame) = self.frames.last() {
            frame.variables.contains_key(name)
        } else {
            self.globals.contains_key(name)
        }
    }

    /// Search frames innermost to outermost, then fall back to globals.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Slot<'ctx>> {
        for frame in self.frames.iter().rev() {
            if let Some(slot) = frame.variables.get(name) {
                return Some(slot);
            }
        }
        self.globals.get(name)
    }

    pub fn declare_label(&mut self, name: impl Into<String>, block: BasicBlock<'ctx>) {
        self.frames
            .last_mut()
            .expect("declare_label called at top level")
            .labels
            .insert(name.into(), block);
    }

    #[must_use]
    pub fn lookup_label(&self, name: &str) -> Option<BasicBlock<'ctx>> {
        for frame in self.frames.iter().rev() {
            if let Some(block) = frame.labels.get(name) {
                return Some(*block);
            }
        }
        None
    }

    pub fn declare_class(&mut self, class: ClassDef) -> bool {
        if self.classes.contains_key(&class.name) {
            return false;
        }
        self.classes.insert(class.name.clone(), class);
        true
    }

    #[must_use]
    pub fn class(&self, name: &str) -> Option<&ClassDef> {
        self.classes.get(name)
    }

    #[must_use]
    pub fn class_exists(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }
}

impl<'ctx> Default for SymbolScope<'ctx> {
    fn default() -> Self {
        Self::new()
    }
}

/// `scope.lookup` falls back to a bitcast-free function pointer when no
/// variable of that name exists (`spec.md` §4.3): a plain wrapper so the
/// lowerer doesn't need to know `FunctionValue` internals to produce one.
#[must_use]
pub fn function_pointer_value(function: FunctionValue<'_>) -> PointerValue<'_> {
    function.as_global_value().as_pointer_value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkwell::context::Context;
    use inkwell::AddressSpace;

    fn dummy_slot(context: &Context) -> Slot<'_> {
        let ptr_ty = context.ptr_type(AddressSpace::default());
        Slot::scalar(ptr_ty.const_null(), ResolvedType::new(0, cinder_types::BaseType::Int))
    }

    #[test]
    fn lookup_searches_innermost_frame_first() {
        let context = Context::create();
        let mut scope = SymbolScope::new();
        scope.enter();
        scope.declare_local("x", dummy_slot(&context));
        scope.enter();
        assert!(scope.lookup("x").is_some());
        scope.exit();
        scope.exit();
        assert!(scope.lookup("x").is_none());
    }

    #[test]
    fn is_top_level_tracks_frame_stack() {
        let mut scope: SymbolScope<'_> = SymbolScope::new();
        assert!(scope.is_top_level());
        scope.enter();
        assert!(!scope.is_top_level());
        scope.exit();
        assert!(scope.is_top_level());
    }

    #[test]
    fn collision_checked_only_against_current_scope() {
        let context = Context::create();
        let mut scope = SymbolScope::new();
        scope.declare_global("x", dummy_slot(&context));
        scope.enter();
        // a local named "x" does not collide with the outer global
        assert!(!scope.collides("x"));
        scope.declare_local("x", dummy_slot(&context));
        assert!(scope.collides("x"));
    }

    #[test]
    fn class_table_rejects_redefinition() {
        let mut scope: SymbolScope<'_> = SymbolScope::new();
        assert!(scope.declare_class(ClassDef::new("Point", cinder_ir::SourceLocation::default())));
        assert!(!scope.declare_class(ClassDef::new("Point", cinder_ir::SourceLocation::default())));
    }
}

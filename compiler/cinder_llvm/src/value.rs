//! The lowerer's per-expression result: an LLVM value paired with its
//! source-level type and, when addressable, the pointer it was loaded from.
//!
//! LLVM 17 has opaque pointers — a `ptr` carries no pointee-type information
//! at the IR level, so `getPointerOperand()`-style tricks the original
//! implementation used to recover an l-value's address from a `LoadInst`
//! (`original_source/src/AST.h`'s `=`/`@` handling) have nothing to operate
//! on here. `Value` threads the source-level `ResolvedType` and, for
//! anything loaded from a slot, that slot's address explicitly instead —
//! see `DESIGN.md` for why this replaces the downcast-the-load approach
//! rather than only patching around opaque pointers locally.

use cinder_types::ResolvedType;
use inkwell::values::{BasicValueEnum, PointerValue};

/// One lowered expression's result.
#[derive(Clone, Debug)]
pub struct Value<'ctx> {
    /// The LLVM value a caller consumes (a loaded scalar, a call result, a
    /// pointer value, ...).
    pub llvm: BasicValueEnum<'ctx>,
    /// The source-level type of `llvm`.
    pub ty: ResolvedType,
    /// `Some(ptr)` when `llvm` is a load out of `ptr` — recovered instead of
    /// downcasting an LLVM instruction, since opaque pointers carry no
    /// pointee type to recover anyway. `None` for values with no backing
    /// address (literals, call results, binary-op results).
    pub place: Option<PointerValue<'ctx>>,
}

impl<'ctx> Value<'ctx> {
    /// A pure value with no backing address: literals, call/binop results.
    #[must_use]
    pub fn rvalue(llvm: BasicValueEnum<'ctx>, ty: ResolvedType) -> Self {
        Value { llvm, ty, place: None }
    }

    /// A value loaded from an addressable slot — `place` is that slot's
    /// pointer, recoverable later for assignment or `@` (address-of).
    #[must_use]
    pub fn loaded(llvm: BasicValueEnum<'ctx>, ty: ResolvedType, place: PointerValue<'ctx>) -> Self {
        Value { llvm, ty, place: Some(place) }
    }

    /// True when this value was loaded from a slot — i.e. `@value` and
    /// `value = ...` are legal on it (`spec.md` §4.4's l-value discipline).
    #[must_use]
    pub fn is_lvalue(&self) -> bool {
        self.place.is_some()
    }
}

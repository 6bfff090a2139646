//! `ResolvedType` → `inkwell` type, the only place in the workspace that
//! turns a backend-agnostic type (`cinder_types`) into an actual LLVM type.
//!
//! Per `SPEC_FULL.md` §4.2: LLVM 17 uses opaque pointers, so every pointer
//! depth ≥ 1 maps onto the same `ptr` type regardless of what it points to —
//! the pointee information lives only in `ResolvedType`, never recovered
//! from the `inkwell` type itself. Named structs are looked up by name in
//! the `Context` (set up once per `ClassDef`, see `lower::class`).

use cinder_types::{BaseType, ResolvedType};
use inkwell::context::Context;
use inkwell::types::BasicTypeEnum;
use inkwell::AddressSpace;

/// Map a fully resolved type to its `inkwell` representation. Returns
/// `None` only for bare `void` (not a `BasicTypeEnum` in LLVM) — callers
/// lowering a function's return type check for `void` before calling this,
/// and a `@void` (pointer depth ≥ 1) resolves to the generic opaque `ptr`
/// type just like any other pointer.
#[must_use]
pub fn llvm_type<'ctx>(context: &'ctx Context, resolved: &ResolvedType) -> Option<BasicTypeEnum<'ctx>> {
    if resolved.pointer_depth > 0 {
        return Some(context.ptr_type(AddressSpace::default()).into());
    }

    match &resolved.base {
        BaseType::Void => None,
        BaseType::Int => Some(context.i32_type().into()),
        BaseType::Bool => Some(context.bool_type().into()),
        BaseType::Float => Some(context.f32_type().into()),
        BaseType::Byte => Some(context.i8_type().into()),
        BaseType::Struct(name) => context.get_struct_type(name).map(Into::into),
    }
}

/// True when `ty` denotes an IEEE float at the source level — the
/// tie-breaker `spec.md` §4.4 uses throughout `BinaryOp` lowering (operator
/// variant picked by whether the *right* operand is float, except where
/// the original picks the *left* operand — see `lower::binop` per-operator
/// notes).
#[must_use]
pub fn is_float(ty: &ResolvedType) -> bool {
    ty.pointer_depth == 0 && matches!(ty.base, BaseType::Float)
}

#[must_use]
pub fn is_pointer(ty: &ResolvedType) -> bool {
    ty.pointer_depth > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_depth_always_maps_to_opaque_ptr() {
        let context = Context::create();
        let byte_ptr = ResolvedType::new(1, BaseType::Byte);
        let int_ptr = ResolvedType::new(1, BaseType::Int);
        assert_eq!(
            llvm_type(&context, &byte_ptr).unwrap(),
            llvm_type(&context, &int_ptr).unwrap()
        );
    }

    #[test]
    fn bare_void_has_no_basic_type() {
        let context = Context::create();
        let void = ResolvedType::new(0, BaseType::Void);
        assert!(llvm_type(&context, &void).is_none());
    }

    #[test]
    fn pointer_to_void_is_a_basic_ptr_type() {
        let context = Context::create();
        let void_ptr = ResolvedType::new(1, BaseType::Void);
        assert!(llvm_type(&context, &void_ptr).is_some());
    }

    #[test]
    fn is_float_only_true_for_scalar_float() {
        assert!(is_float(&ResolvedType::new(0, BaseType::Float)));
        assert!(!is_float(&ResolvedType::new(1, BaseType::Float)));
        assert!(!is_float(&ResolvedType::new(0, BaseType::Int)));
    }
}

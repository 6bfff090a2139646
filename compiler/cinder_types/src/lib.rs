//! Backend-agnostic type resolution.
//!
//! `resolve` turns a source-form type name (`@`-prefixed pointer depth plus
//! a primitive or class identifier) into a `ResolvedType` without touching
//! an IR builder, so it can be unit-tested without linking LLVM. `cinder_llvm`
//! is the only crate that maps a `ResolvedType` onto an actual inkwell type.

use std::fmt;

/// The non-pointer part of a resolved type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum BaseType {
    Void,
    Int,
    Bool,
    Float,
    Byte,
    /// Names a user class; the backend looks this up in its struct table.
    Struct(String),
}

/// A fully resolved type: a base type plus a pointer depth.
///
/// `string` is sugar for `@byte`, so `resolve("string")` and
/// `resolve("@byte")` both produce `ResolvedType { pointer_depth: 1, base: Byte }`;
/// the two source spellings are intentionally not distinguishable once resolved.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ResolvedType {
    pub pointer_depth: u32,
    pub base: BaseType,
}

impl ResolvedType {
    #[must_use]
    pub fn new(pointer_depth: u32, base: BaseType) -> Self {
        ResolvedType { pointer_depth, base }
    }

    #[must_use]
    pub fn is_pointer(&self) -> bool {
        self.pointer_depth > 0
    }

    /// The type this one points to, if it is a pointer.
    #[must_use]
    pub fn deref_once(&self) -> Option<ResolvedType> {
        if self.pointer_depth == 0 {
            return None;
        }
        Some(ResolvedType::new(self.pointer_depth - 1, self.base.clone()))
    }

    /// One level of pointer indirection added.
    #[must_use]
    pub fn address_of(&self) -> ResolvedType {
        ResolvedType::new(self.pointer_depth + 1, self.base.clone())
    }
}

/// Resolve a source-form type name. `struct_exists` answers whether a
/// stripped (no leading `@`) identifier names a known class; callers
/// typically back it with the current backend module's class table.
#[must_use]
pub fn resolve(name: &str, struct_exists: impl Fn(&str) -> bool) -> Option<ResolvedType> {
    let stripped = name.trim_start_matches('@');
    let pointer_depth = (name.len() - stripped.len()) as u32;

    let (extra_depth, base) = match stripped {
        "void" => (0, BaseType::Void),
        "int" => (0, BaseType::Int),
        "bool" => (0, BaseType::Bool),
        "float" => (0, BaseType::Float),
        "byte" => (0, BaseType::Byte),
        "string" => (1, BaseType::Byte),
        other => {
            if struct_exists(other) {
                (0, BaseType::Struct(other.to_string()))
            } else {
                return None;
            }
        }
    };

    Some(ResolvedType::new(pointer_depth + extra_depth, base))
}

/// Recover a source-form name from a resolved type: primitives by name,
/// structs by their name, with `pointer_depth` leading `@`s. The `string`
/// sugar is not reconstructed — `@byte` is the canonical spelling a
/// resolved type prints back to.
#[must_use]
pub fn type2str(ty: &ResolvedType) -> String {
    let base = match &ty.base {
        BaseType::Void => "void",
        BaseType::Int => "int",
        BaseType::Bool => "bool",
        BaseType::Float => "float",
        BaseType::Byte => "byte",
        BaseType::Struct(name) => name.as_str(),
    };
    format!("{}{base}", "@".repeat(ty.pointer_depth as usize))
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", type2str(self))
    }
}

//! The compile-time meta engine (`spec.md` §4.5): translates a `Meta`
//! block's sub-AST to Lua source text, evaluates it against an embedded
//! `mlua` interpreter, and feeds any AST fragments the script constructs
//! back into the enclosing module.

pub mod bindings;
pub mod engine;
pub mod error;
pub mod translate;

pub use engine::Engine;
pub use error::MetaError;

//! Lowering of a preprocessed `cinder_ir::Module` to LLVM IR, via `inkwell`.
//!
//! `cinder_types` resolves source-level type names to a backend-agnostic
//! `ResolvedType`; this crate is the only place a `ResolvedType` becomes an
//! actual `inkwell` type, and the only crate in the workspace linking LLVM.
//! See `spec.md` §4.2–§4.4 for the contracts every submodule below implements.

pub mod error;
pub mod lower;
pub mod mangle;
pub mod scope;
pub mod types;
pub mod value;

pub use error::LlvmError;
pub use lower::Lowerer;
pub use scope::{Slot, SymbolScope};
pub use value::Value;

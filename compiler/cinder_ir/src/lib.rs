//! AST model for the Cinder compiler.
//!
//! Defines the `Expr` sum type (every node kind is a variant), the
//! `SourceLocation` every node carries, and `Module` — the flat top-level
//! sequence an (external) parser produces and `cinder_preprocess` mutates in
//! place. See `spec.md` §3 for the full data model and its invariants.

pub mod expr;
pub mod items;
pub mod module;
pub mod operators;
pub mod span;
pub mod variable;

pub use expr::Expr;
pub use items::{ClassDef, Function};
pub use module::Module;
pub use operators::UnaryOperator;
pub use span::SourceLocation;
pub use variable::{Variable, VariableDef};

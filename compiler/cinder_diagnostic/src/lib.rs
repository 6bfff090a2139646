//! Diagnostics engine for the Cinder compiler.
//!
//! Errors and warnings are accumulated in a `DiagnosticSink` rather than
//! raised as Rust errors (see `spec.md` §7): lowering keeps going after a
//! local failure so one run can report everything wrong with a module, and
//! only the final error count decides whether the process exits non-zero.

pub mod diagnostic;
pub mod sink;
pub mod terminal;

pub use diagnostic::{Diagnostic, Severity};
pub use sink::DiagnosticSink;
pub use terminal::{render, ColorMode};

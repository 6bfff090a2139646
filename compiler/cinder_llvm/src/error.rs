//! Host-level (Rust `Result`) failures distinct from accumulated
//! `Diagnostic`s — see `SPEC_FULL.md` §7. These signal the lowerer could
//! not run at all, not that the source program failed to type-check.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlvmError {
    #[error("LLVM module verification failed: {0}")]
    Verification(String),
}

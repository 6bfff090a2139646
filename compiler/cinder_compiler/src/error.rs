//! Host-level failures: the pipeline could not run to completion at all,
//! as distinct from the accumulated `Diagnostic`s a malformed *source*
//! program produces (`SPEC_FULL.md` §7). Reported once, outside the
//! per-diagnostic accounting.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("preprocessing could not locate an included file; compilation aborted")]
    Include,
    #[error(transparent)]
    Meta(#[from] cinder_meta::MetaError),
    #[error(transparent)]
    Llvm(#[from] cinder_llvm::error::LlvmError),
}

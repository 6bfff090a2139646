//! Host-level failures distinct from the diagnostics a meta block's own
//! script errors produce — see `SPEC_FULL.md` §7.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetaError {
    #[error("could not start the embedded Lua interpreter: {0}")]
    Startup(#[source] mlua::Error),
}

//! Tracing initialization for the `cinderc` binary.
//!
//! Adapted from the teacher's own `OnceLock`-gated subscriber setup, but
//! with no environment-variable hook: `spec.md` §6 is explicit that the CLI
//! surface is the only externally visible configuration, so the filter
//! level is fixed rather than read from `RUST_LOG`-style variables.

use std::sync::OnceLock;
use tracing_subscriber::{prelude::*, EnvFilter, Registry};

static INIT: OnceLock<()> = OnceLock::new();

/// Initialize the tracing subscriber. Safe to call multiple times — only
/// the first call takes effect.
pub fn init() {
    INIT.get_or_init(|| {
        Registry::default()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .with(EnvFilter::new("warn"))
            .init();
    });
}

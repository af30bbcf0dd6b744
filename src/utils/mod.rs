//! Utility modules

pub mod memory_storage;
pub mod validation;

pub use memory_storage::*;
pub use validation::*;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Installs a global fmt subscriber filtered by `RUST_LOG` plus `directive`
/// (for example `njangi_core=debug`). Later calls are no-ops.
pub fn init_tracing(directive: &str) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let mut filter = EnvFilter::from_default_env();
        match directive.parse() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(err) => eprintln!("ignoring log directive {:?}: {}", directive, err),
        }

        if fmt().with_env_filter(filter).try_init().is_ok() {
            tracing::debug!("njangi-core tracing initialized");
        }
    });
}

//! Tracing subscriber setup for binaries.

use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber. `RUST_LOG` wins; otherwise `crud_sdk=debug` in debug mode, `crud_sdk=info` if not.
pub fn init_tracing(debug: bool) {
    let fallback = if debug { "crud_sdk=debug,info" } else { "crud_sdk=info,warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    // A subscriber may already be installed (tests, embedding apps); keep it.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

//! Logging setup
//!
//! Call `logging::init(verbose)` once at startup. Later calls are ignored, so
//! tests may call it freely.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,asset_refs=info";

/// Install the global subscriber. Returns false if one was already installed.
///
/// `RUST_LOG` overrides the default filter. `verbose` adds targets and thread ids.
pub fn init(verbose: bool) -> bool {
    let env_filter = match std::env::var("RUST_LOG") {
        Ok(val) => EnvFilter::new(val),
        Err(_) => EnvFilter::new(DEFAULT_FILTER),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(verbose)
        .with_thread_ids(verbose);

    match builder.try_init() {
        Ok(()) => {
            tracing::debug!("Logging initialized (verbose: {})", verbose);
            true
        }
        Err(_) => false,
    }
}

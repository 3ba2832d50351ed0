//! Logging bootstrap for applications embedding the renderer.
//!
//! The renderer itself only emits `tracing` events; installing a subscriber is
//! left to the application, which can call [`init`] once at startup.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "debug,wgpu_core=warn,wgpu_hal=warn,naga=warn";

static INIT: Once = Once::new();

/// Install a formatted subscriber using `RUST_LOG`, or [`DEFAULT_FILTER`].
pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// Install a formatted subscriber with the given fallback filter.
///
/// Only the first call has an effect. If another global subscriber was already
/// installed, this call is ignored.
pub fn init_with_filter(filter: &str) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_thread_names(true)
            .try_init();
    });
}

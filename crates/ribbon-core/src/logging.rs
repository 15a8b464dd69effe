use tracing_subscriber::EnvFilter;

/// Directive used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,ribbon_stream=debug,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Install the global fmt subscriber.
///
/// Honors `RUST_LOG` when present, otherwise falls back to [`DEFAULT_FILTER`].
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Install the global fmt subscriber with an explicit filter directive.
///
/// Returns `false` if a global subscriber was already installed, which
/// happens when several tests in one binary call this.
pub fn init_with_filter(directive: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directive))
        .with_test_writer()
        .try_init()
        .is_ok()
}

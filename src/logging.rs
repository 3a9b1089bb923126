//! Logging initialization.

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber with env-filter support. `log` macro
/// call sites across the crate are bridged in via tracing-log. Safe to call
/// more than once; later calls are ignored.
pub fn init() {
    let filter = EnvFilter::from_default_env()
        .add_directive("bookery=debug".parse().expect("static directive"))
        .add_directive("info".parse().expect("static directive"));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .with_target(false)
        .try_init()
        .is_ok()
    {
        tracing::debug!("logging initialized");
    }
}

//! Logger setup shared by Huddle binaries.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence. Otherwise `name` (a binary or crate name) and
/// `tower_http` are logged at `default_level`.
///
/// Calling this more than once is harmless: later calls leave the first
/// subscriber in place.
pub fn setup_logger(name: &str, default_level: &str) {
    let crate_name = name.replace('-', "_");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{crate_name}={default_level},huddle_server={default_level},tower_http={default_level}"
        ))
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}

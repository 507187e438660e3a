//! Tracing setup.
//!
//! The filter comes from `TRIBUTARY_LOG` and defaults to `tributary=info`.
//! Initialization happens at most once per process; later calls are no-ops,
//! as is any call made after another global subscriber was installed.

pub mod events;
pub mod spans;
pub use spans::names;

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directive.
pub const LOG_ENV_VAR: &str = "TRIBUTARY_LOG";

/// Filter used when [`LOG_ENV_VAR`] is unset or invalid.
pub const DEFAULT_FILTER: &str = "tributary=info";

static INIT: Once = Once::new();

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a human-readable fmt subscriber.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_target(true)
            .try_init();
    });
}

/// Install a JSON subscriber for log shipping.
pub fn init_tracing_json() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .try_init();
    });
}

/// Install a subscriber with an explicit filter (tests, embedding hosts).
pub fn init_tracing_with_filter(filter: &str) {
    let filter = EnvFilter::new(filter);
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init();
    });
}

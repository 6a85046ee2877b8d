//! Tracing subscriber setup.
//!
//! Filter precedence: `QS_LOG_LEVEL`, then the caller's default directive.
//! Initialization is idempotent so parallel tests can all call it.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the tracing filter directives.
pub const LOG_LEVEL_ENV: &str = "QS_LOG_LEVEL";

/// Installs the global subscriber with a console formatter.
pub fn init(default_level: &str) {
    let env_filter = EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(true);

    // A second init (tests, embedding callers) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}

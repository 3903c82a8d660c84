// * Telemetry - structured logging setup
// * JSON output for deployed builds, pretty output while developing.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// * Filter used when RUST_LOG is not set
pub const DEFAULT_FILTER: &str = "tldr_lens=info,warn";

fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Initializes the tracing subscriber with JSON formatting
///
/// # Example
/// ```ignore
/// use tldr_lens::ops::telemetry;
///
/// telemetry::init_tracing();
/// tracing::info!(url = "https://example.com/post", "Analyzing page");
/// ```
pub fn init_tracing() {
    init_tracing_with_level(DEFAULT_FILTER);
}

/// Initializes tracing with custom log level
pub fn init_tracing_with_level(level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(fmt::layer().json().with_target(false))
        .init();
}

/// Initializes tracing with pretty formatting (for development)
pub fn init_tracing_pretty() {
    tracing_subscriber::registry()
        .with(env_filter("tldr_lens=debug,info"))
        .with(fmt::layer().pretty())
        .init();
}

/// Installs a JSON subscriber unless one is already set; returns whether it was installed
pub fn try_init_tracing(level: &str) -> bool {
    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(fmt::layer().json().with_target(false))
        .try_init()
        .is_ok()
}

//! Tracing subscriber setup for hosts that want the crate to own it.

use tracing_subscriber::EnvFilter;

/// Initialize structured logging. Level comes from `RUST_LOG` (falling back
/// to `LOG_LEVEL`, then `info`); `LOG_FORMAT=json` switches to JSON output.
/// Safe to call when a subscriber is already installed.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        EnvFilter::new(level)
    });

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }
}

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static TRACING_INIT: Once = Once::new();

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_LOG_DIRECTIVE: &str =
    "tabi_shiori=info,tabi_core=info,tabi_storage_json=info,tabi_config=info";

/// Builds the log filter: a valid `RUST_LOG` value replaces the default wholesale.
pub fn log_filter(env_value: Option<&str>) -> EnvFilter {
    env_value
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_DIRECTIVE))
}

/// Initializes the global tracing subscriber, writing to stderr so command
/// output on stdout stays clean.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::fmt;

        let env_value = std::env::var(EnvFilter::DEFAULT_ENV).ok();
        let filter = log_filter(env_value.as_deref());

        // A subscriber installed elsewhere (tests, embedding apps) wins.
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

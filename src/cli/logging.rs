use tracing_subscriber::{EnvFilter, fmt};

/// Level used when `RUST_LOG` is not set
const DEFAULT_FILTER: &str = "warn";

/// Log to stderr so diagnostics never mix with the conversation on stdout
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // A second init (tests, embedding) keeps the first subscriber
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

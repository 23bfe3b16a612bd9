use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize console logging for the console binaries.
///
/// # Configuration
///
/// - **Log Level**: `LOG_LEVEL` (default: "info"), applied to the userdesk crates
/// - **Format**: `LOG_FORMAT=json` switches to one JSON object per line,
///   anything else gives compact human-readable output
/// - **Override**: `RUST_LOG` wins over both when set
///
/// Logs go to stderr so command output on stdout stays clean.
pub fn init_tracing() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let json = std::env::var("LOG_FORMAT")
        .map(|f| f.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{}={level},userdesk_api={level},userdesk_auth={level},warn",
            env!("CARGO_PKG_NAME"),
            level = log_level
        ))
    });

    let console_layer = if json {
        fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::io::stderr)
            .with_filter(env_filter)
            .boxed()
    } else {
        fmt::layer()
            .compact()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_file(false)
            .with_line_number(false)
            .with_writer(std::io::stderr)
            .with_filter(env_filter)
            .boxed()
    };

    // A second init (tests, repeated CLI setup) keeps the first subscriber.
    let _ = tracing_subscriber::registry().with(console_layer).try_init();
}

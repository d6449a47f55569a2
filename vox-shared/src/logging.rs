use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs a console subscriber for `tracing`.
///
/// `RUST_LOG` takes precedence over `default_filter`, which is usually
/// [`CollisionConfig::log_level`](crate::config::CollisionConfig::log_level). Does nothing if a
/// global subscriber was already installed.
///
/// Returns whether the subscriber was installed.
pub fn init_logging(default_filter: &str) -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| env_filter(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_thread_names(true))
        .try_init()
        .is_ok()
}

/// Parses `filter`, falling back to `info` if it is malformed.
fn env_filter(filter: &str) -> EnvFilter {
    EnvFilter::try_new(filter).unwrap_or_else(|error| {
        eprintln!("invalid log filter {filter:?}, using \"info\": {error}");
        EnvFilter::new("info")
    })
}

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Crate filter and default `EnvFilter` directive. Warnings stay visible when
/// not verbose, since unreachable market data providers are reported with
/// `warn!`.
fn log_levels(verbose: bool) -> (LevelFilter, &'static str) {
    if verbose {
        (LevelFilter::DEBUG, "debug")
    } else {
        (LevelFilter::WARN, "warn")
    }
}

/// Installs the global subscriber. Logs go to stderr so that reports printed
/// on stdout stay machine readable.
pub fn init_logging(verbose: bool) {
    let (level_filter, level) = log_levels(verbose);
    let app_filter = Targets::new().with_target("finreport", level_filter);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .pretty()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(app_filter)
        .with(env_filter)
        .init();
}

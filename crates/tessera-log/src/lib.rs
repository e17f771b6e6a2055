//! Structured logging and tracing for Tessera.
//!
//! Console output with timestamps and module paths, plus JSON file logging in
//! debug builds. The level comes from `RUST_LOG` first, then the config's
//! `debug.log_level`.

use std::path::Path;

use tessera_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config names a level.
const DEFAULT_FILTER: &str = "info";
/// JSON log file created inside the log directory.
const LOG_FILE_NAME: &str = "tessera.log";

/// JSON lines layer writing to [`LOG_FILE_NAME`] in `log_dir`.
type JsonFileLayer<S> = fmt::Layer<
    S,
    fmt::format::JsonFields,
    fmt::format::Format<fmt::format::Json, fmt::time::Uptime>,
    std::fs::File,
>;

/// Build the filter string for a config, falling back to [`DEFAULT_FILTER`].
pub fn filter_directive(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.is_empty() => config.debug.log_level.clone(),
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Initialize the global tracing subscriber.
///
/// # Arguments
///
/// * `log_dir` - Optional directory for JSON log files (debug builds only)
/// * `debug_build` - Whether this is a debug build (enables file logging)
/// * `config` - Optional configuration to use for log level override
///
/// # Examples
///
/// ```no_run
/// use tessera_config::Config;
/// use tessera_log::init_logging;
///
/// let config = Config::default();
/// init_logging(None, cfg!(debug_assertions), Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let filter_str = filter_directive(config);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && let Some(file_layer) = json_file_layer(log_dir)
    {
        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// Create `log_dir` and a fresh log file in it; `None` if either fails.
fn json_file_layer<S>(log_dir: &Path) -> Option<JsonFileLayer<S>> {
    std::fs::create_dir_all(log_dir).ok()?;
    let log_file = std::fs::File::create(log_dir.join(LOG_FILE_NAME)).ok()?;
    Some(
        fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json(),
    )
}

/// An `EnvFilter` built from the default filter string.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

//! Structured logging for the orrery viewer.
//!
//! Console output with uptime timestamps and module paths, plus a JSON log
//! file in debug builds. The filter comes from `RUST_LOG` when set, otherwise
//! from the config's `debug.log_level`.

use orrery_config::Config;
use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Targets that are too chatty at `info`.
const QUIET_TARGETS: &str = "wgpu=warn,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Name of the JSON log file written inside the log directory.
pub const LOG_FILE_NAME: &str = "orrery.log";

/// Build the filter string for a configured level.
///
/// An empty level falls back to `info`. GPU crates are always capped at `warn`
/// unless the level already mentions them.
pub fn filter_string(level: &str) -> String {
    let level = level.trim();
    let base = if level.is_empty() { "info" } else { level };
    if base.contains("wgpu") || base.contains("naga") {
        base.to_string()
    } else {
        format!("{base},{QUIET_TARGETS}")
    }
}

/// Initialize the global tracing subscriber.
///
/// * `log_dir` - directory for the JSON log file (debug builds only)
/// * `debug_build` - whether file logging may be enabled
/// * `config` - optional configuration providing the level and file toggle
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let filter_str = filter_string(config.map(|c| c.debug.log_level.as_str()).unwrap_or(""));
    let log_to_file = config.is_none_or(|c| c.debug.log_to_file);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && log_to_file
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE_NAME))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

use colored::*;
use log::LevelFilter;

/// Maps a configured level name to a filter; unknown names fall back to `warn`.
pub fn level_from_name(level: Option<&str>) -> LevelFilter {
    level
        .map(|level| match level.trim().to_lowercase().as_str() {
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "info" => LevelFilter::Info,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            "off" => LevelFilter::Off,
            _ => LevelFilter::Warn,
        })
        .unwrap_or(LevelFilter::Warn)
}

/// Initialize env_logger; `RUST_LOG` still wins over the configured level.
pub fn init(level: Option<&str>) {
    let level = level_from_name(level);
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(level.to_string()),
    )
    .format_timestamp(None)
    .try_init();
}

pub fn log_info(message: &str) {
    log::info!("{}", message);
}

pub fn log_error(message: &str) {
    eprintln!("{} {}", "[ERROR]".red().bold(), message);
}

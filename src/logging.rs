//! Logger setup
//!
//! Everything logs through the `log` facade; this installs `env_logger`
//! with the level and line format taken from [`LoggingConfig`].
//! `RUST_LOG`, when set, overrides the configured level.

use std::io::Write;

use chrono::{SecondsFormat, Utc};
use log::LevelFilter;

use crate::config::LoggingConfig;

/// Map a config level name to a filter; unknown names fall back to `info`.
pub fn parse_log_level(level: &str) -> LevelFilter {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "warn" | "warning" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

/// Build a logger for the given settings without installing it.
pub fn builder(config: &LoggingConfig) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(parse_log_level(&config.level))
        .parse_default_env()
        .target(env_logger::Target::Stdout);

    if config.format == "json" {
        builder.format(|buf, record| {
            let line = serde_json::json!({
                "ts": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                "level": record.level().as_str(),
                "target": record.target(),
                "msg": record.args().to_string(),
            });
            writeln!(buf, "{}", line)
        });
    } else {
        builder.format_timestamp_millis();
    }
    builder
}

/// Install the global logger. Returns `false` if one was already set.
pub fn init_logging(config: &LoggingConfig) -> bool {
    builder(config).try_init().is_ok()
}

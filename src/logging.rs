use chrono::Local;
use env_logger::{Builder, Env};
use log::{Level, LevelFilter, Record};
use std::io::Write;
use yansi::Paint;

use crate::error::{DocifyError, Result};

/// Installs the command-line logger
///
/// `RUST_LOG` still wins over `level` when it is set. Calling this twice is harmless.
pub fn init(level: LevelFilter) {
    let env = Env::default()
        .filter_or("RUST_LOG", level.to_string())
        .write_style_or("RUST_LOG_STYLE", "auto");

    let _ = Builder::from_env(env)
        .format(|buf, record| writeln!(buf, "{}", format_log(record)))
        .try_init();
}

/// Parses `--log-level`; unknown names are rejected rather than silently mapped
pub fn parse_log_level(level: &str) -> Result<LevelFilter> {
    match level.trim().to_lowercase().as_str() {
        "off" => Ok(LevelFilter::Off),
        "error" => Ok(LevelFilter::Error),
        "warn" | "warning" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        other => Err(DocifyError::Config(format!(
            "unknown log level '{}' (expected off, error, warn, info, debug or trace)",
            other
        ))),
    }
}

/// `HH:MM:SS.mmm LEVEL target: message`, with the level coloured
pub fn format_log(record: &Record) -> String {
    let level = match record.level() {
        Level::Error => Paint::red("ERROR").bold(),
        Level::Warn => Paint::yellow("WARN ").bold(),
        Level::Info => Paint::green("INFO ").bold(),
        Level::Debug => Paint::blue("DEBUG"),
        Level::Trace => Paint::magenta("TRACE"),
    };
    let target = match record.target() {
        "" => record.module_path().unwrap_or("docify"),
        target => target,
    };

    format!(
        "{} {} {}: {}",
        Local::now().format("%H:%M:%S%.3f"),
        level,
        Paint::new(target).dimmed(),
        record.args()
    )
}

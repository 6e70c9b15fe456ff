//! Stderr logging for the binary.
//!
//! The library only emits through `log` macros; the binary calls [`init`]
//! once at startup and keeps the returned handle alive for the process.

use flexi_logger::{DeferredNow, Logger, LoggerHandle};
use log::Record;

/// Map `-q` / `-v` counts to a level spec.
pub fn level_for(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Start the stderr logger.
///
/// # Errors
/// Returns a human-readable message when the level spec is rejected or the
/// backend cannot start.
pub fn init(level: &str) -> Result<LoggerHandle, String> {
    let handle = Logger::try_with_str(level)
        .map_err(|err| format!("invalid log level `{level}`: {err}"))?
        .log_to_stderr()
        .format(line_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    log::debug!(
        "event=logger_start level={level} version={} git_sha={}",
        env!("CARGO_PKG_VERSION"),
        crate::build_info::git_sha().unwrap_or("unknown")
    );
    Ok(handle)
}

fn line_format(
    w: &mut dyn std::io::Write,
    _now: &mut DeferredNow,
    record: &Record,
) -> std::io::Result<()> {
    write!(
        w,
        "{} [{}] {}",
        record.level(),
        record.module_path().unwrap_or("<unnamed>"),
        record.args()
    )
}

//! Logger bootstrap.
//!
//! The library only talks to the `log` facade. The binary calls
//! [`init_logging`] once at start-up; later calls with the same level are no-ops.

use flexi_logger::{Logger, LoggerHandle};
use log::info;
use once_cell::sync::OnceCell;

use crate::error::LoggingError;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    _logger: LoggerHandle,
}

/// Start logging to stderr at `level`.
///
/// Never panics. A second call with a different level is refused, since the
/// running logger keeps its level filter.
pub fn init_logging(level: &str) -> Result<(), LoggingError> {
    let level = normalize_level(level)?;

    if let Some(state) = LOGGING_STATE.get() {
        return if state.level == level {
            Ok(())
        } else {
            Err(LoggingError::AlreadyStarted { active: state.level })
        };
    }

    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState, LoggingError> {
        let logger = Logger::try_with_env_or_str(level)?
            .log_to_stderr()
            .format(flexi_logger::detailed_format)
            .start()?;
        info!(
            "event=app_start platform={} version={} level={}",
            std::env::consts::OS,
            env!("CARGO_PKG_VERSION"),
            level
        );
        Ok(LoggingState {
            level,
            _logger: logger,
        })
    })?;

    if state.level != level {
        return Err(LoggingError::AlreadyStarted { active: state.level });
    }
    Ok(())
}

/// Level the logger was started with, if it was.
pub fn active_level() -> Option<&'static str> {
    LOGGING_STATE.get().map(|s| s.level)
}

pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn normalize_level(level: &str) -> Result<&'static str, LoggingError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        "off" => Ok("off"),
        other => Err(LoggingError::InvalidLevel(other.to_string())),
    }
}

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Why a gesture was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectionCode {
    MinDuration,
    NoRoom,
    LockedBoundary,
}

impl RejectionCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionCode::MinDuration => "MIN_DURATION",
            RejectionCode::NoRoom => "NO_ROOM",
            RejectionCode::LockedBoundary => "LOCKED_BOUNDARY",
        }
    }
}

/// A structured refusal handed back to the caller for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{}: {message}", .code.as_str())]
pub struct Rejection {
    pub code: RejectionCode,
    pub message: String,
}

impl Rejection {
    pub fn new(code: RejectionCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn locked(message: impl Into<String>) -> Self {
        Self::new(RejectionCode::LockedBoundary, message)
    }

    pub fn no_room(message: impl Into<String>) -> Self {
        Self::new(RejectionCode::NoRoom, message)
    }

    pub fn min_duration(message: impl Into<String>) -> Self {
        Self::new(RejectionCode::MinDuration, message)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read settings {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write settings {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("no configuration directory available on this platform")]
    NoConfigDir,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV is missing required columns. Found headers: {found:?}. Need columns for: name, start date, end date.")]
    MissingColumns { found: Vec<String> },
    #[error("no valid items found in CSV ({skipped} rows skipped)")]
    NoValidRows { skipped: usize },
    #[error("CSV file is empty or has no data rows")]
    Empty,
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("unsupported log level `{0}`; expected trace|debug|info|warn|error")]
    InvalidLevel(String),
    #[error("logging already started at level `{active}`")]
    AlreadyStarted { active: &'static str },
    #[error("failed to start logger: {0}")]
    Start(#[from] flexi_logger::FlexiLoggerError),
}

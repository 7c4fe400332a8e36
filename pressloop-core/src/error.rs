//! Error types shared by the notifier, poller and reporter

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by pressloop units.
///
/// Network and API failures are never retried here; they propagate to the
/// scheduler that invoked the unit.
#[derive(Error, Debug)]
pub enum PressloopError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Chat API call {method} failed: {description}")]
    ChatApi { method: String, description: String },

    #[error("Table API error {status}: {body}")]
    TableApi { status: u16, body: String },

    #[error("Failed to access record file {path:?}: {source}")]
    RecordIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Record file {path:?} is corrupt: {source}")]
    RecordCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Record {path} holds no button press yet")]
    NoButtonPress { path: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PressloopError>;

impl PressloopError {
    pub(crate) fn record_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::RecordIo {
            path: path.into(),
            source,
        }
    }
}

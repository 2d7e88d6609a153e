//! Unified error types surfaced by the runtime API.
//!
//! Combat outcomes are never errors: failed attacks and flee attempts come
//! back inside their reports. These cover setup (content, environment) and
//! snapshot construction.
use thiserror::Error;

use combat_core::state::SnapshotError;
use combat_core::{CombatError, ErrorSeverity};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to load combat content")]
    Content(#[source] anyhow::Error),

    #[error("invalid value {value:?} for {key}")]
    InvalidEnv { key: &'static str, value: String },

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

impl CombatError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Content(_) | Self::InvalidEnv { .. } => ErrorSeverity::Validation,
            Self::Snapshot(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Content(_) => "RUNTIME_CONTENT",
            Self::InvalidEnv { .. } => "RUNTIME_INVALID_ENV",
            Self::Snapshot(err) => err.error_code(),
        }
    }
}

/// Failures of an external skill classifier.
///
/// Never surfaced to players; the runtime logs them at debug level and falls
/// back to the keyword table.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier unavailable: {0}")]
    Unavailable(String),

    #[error("malformed classifier output: {0}")]
    Malformed(String),
}

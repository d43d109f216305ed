//! Error types for the transcriber session layer.

use thiserror::Error;
use transcriber_types::ErrorCode;

use crate::stream::StreamState;

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, TranscribeError>;

/// Errors surfaced by the session layer.
///
/// `LoadFailure` is fatal to the session and only appears at construction.
/// `InvalidState` is a caller bug, never retried internally. The remaining
/// variants are engine-side failures: they are returned to the synchronous
/// caller and also delivered to listeners as `TranscriptEvent::Error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscribeError {
    #[error("failed to load transcriber: {0}")]
    LoadFailure(ErrorCode),

    #[error("{op} called on a {state:?} stream")]
    InvalidState { op: &'static str, state: StreamState },

    #[error("engine returned '{code}' from {op}")]
    Engine { op: &'static str, code: ErrorCode },

    #[error("engine returned no transcript from {op}")]
    MissingTranscript { op: &'static str },

    #[error("engine contract violation on line {id}: {detail}")]
    ContractViolation { id: u64, detail: &'static str },
}

impl TranscribeError {
    pub(crate) fn engine(op: &'static str, raw: i32) -> Self {
        Self::Engine {
            op,
            code: ErrorCode::from_raw(raw),
        }
    }
}

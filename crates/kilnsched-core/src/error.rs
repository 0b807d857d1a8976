use thiserror::Error;

/// Errors raised by the scheduling core.
///
/// `InvalidPieceType` and `InvalidStepKey` are data-integrity failures: an
/// order detail carries an enum value the process catalogue doesn't
/// recognise. Both are fatal for a scheduler run per the fail-fast policy —
/// callers that want skip-and-log semantics catch these at the call site
/// rather than have the core swallow them.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("invalid piece type: {0}")]
    InvalidPieceType(String),

    #[error("invalid step key: {0}")]
    InvalidStepKey(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("validation error: {0}")]
    Validation(String),
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;

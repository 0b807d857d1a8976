use thiserror::Error;

/// Failures local to a storage backend, before they're folded into
/// `kilnsched_core::SchedulerError::Storage` at the crate boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid stored row: {0}")]
    Row(String),
}

impl From<StoreError> for kilnsched_core::SchedulerError {
    fn from(err: StoreError) -> Self {
        kilnsched_core::SchedulerError::Storage(err.to_string())
    }
}

use crate::comm::CommId;

pub type Result<T> = std::result::Result<T, TesseraError>;

#[derive(Debug, thiserror::Error)]
pub enum TesseraError {
    #[error("{operation} entry failed on comm {comm_id}: {reason}")]
    EntryFailed {
        operation: &'static str,
        comm_id: CommId,
        reason: String,
    },

    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("schedule aborted by an earlier fatal error")]
    ScheduleAborted,
}

impl TesseraError {
    /// Create an `EntryFailed` error carrying the transport's failure description.
    pub fn entry_failed(
        operation: &'static str,
        comm_id: CommId,
        reason: impl Into<String>,
    ) -> Self {
        Self::EntryFailed {
            operation,
            comm_id,
            reason: reason.into(),
        }
    }
}

//! The non-blocking transport seam schedule entries are driven over.
//!
//! The transport performs the actual data movement behind a collective
//! operation; this crate only issues operations and polls them. Whatever
//! fabric sits behind the trait (network, shared memory, or the in-process
//! [`LocalFabric`]) must already provide the collective's data-movement
//! guarantee; the entry layer contributes sizing, issuing, polling, and
//! error reporting.

mod local;

pub use local::{LocalFabric, LocalTransport};

pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Failures a transport can report. The display string doubles as the
/// human-readable description carried into fatal entry errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("issue rejected: {reason}")]
    Rejected { reason: String },

    #[error("transport failure: {reason}")]
    Failed { reason: String },

    #[error("unknown or finished request req#{id}")]
    UnknownRequest { id: u64 },
}

impl TransportError {
    /// Create a `Rejected` error with just a reason.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    /// Create a `Failed` error with just a reason.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }
}

/// Opaque token for one in-flight transport operation.
///
/// Valid from a successful issue call until the poll that observes
/// completion; a token is never reused for a second operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransportRequest(u64);

impl TransportRequest {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TransportRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "req#{}", self.0)
    }
}

/// A non-blocking communication substrate.
///
/// One endpoint per participant; all endpoints of a fabric jointly realize
/// the collective semantics. Issue calls return immediately with a request
/// token; completion is observed by polling. There is no abort: once issued,
/// an operation can only run to completion or fail.
pub trait Transport: Send + Sync {
    /// Issue one non-blocking all-to-all exchange.
    ///
    /// `bytes` is the per-peer chunk size. After the returned request
    /// completes, the receive region holds, contiguously by source rank,
    /// the chunk each source sent to this participant. A zero-byte exchange
    /// is still issued and still synchronizes all participants.
    ///
    /// # Safety
    /// `send` must be readable and `recv` writable for `world * bytes`
    /// bytes, where `world` is the participant count behind this endpoint,
    /// and both regions must stay valid until [`Transport::poll`] reports
    /// the returned request complete.
    unsafe fn issue_alltoall(
        &self,
        send: u64,
        recv: u64,
        bytes: usize,
    ) -> TransportResult<TransportRequest>;

    /// Poll an in-flight request.
    ///
    /// `Ok(false)` means still in flight, `Ok(true)` means the operation
    /// completed. An error is fatal for the issuing entry.
    fn poll(&self, request: &TransportRequest) -> TransportResult<bool>;
}

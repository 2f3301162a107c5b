use std::fmt::{self, Write};

use crate::error::Result;

/// Lifecycle states of a schedule entry.
///
/// The state is monotonic: `NotStarted → Started → Complete`, driven only
/// by [`ScheduleEntry::start`] and [`ScheduleEntry::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    NotStarted,
    Started,
    Complete,
}

impl EntryStatus {
    pub fn is_complete(self) -> bool {
        self == EntryStatus::Complete
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryStatus::NotStarted => f.write_str("not_started"),
            EntryStatus::Started => f.write_str("started"),
            EntryStatus::Complete => f.write_str("complete"),
        }
    }
}

/// A schedulable unit of collective work.
///
/// Each concrete variant drives one collective algorithm through a uniform
/// three-state lifecycle so an executor can progress heterogeneous entries
/// without knowing their internals. `start` issues exactly one non-blocking
/// transport operation; `update` polls it and is callable arbitrarily many
/// times while the operation is in flight. Neither call ever blocks; all
/// waiting is the caller's poll cadence. A fatal error from either call
/// aborts the enclosing schedule — there is no retry and no cancellation.
///
/// Calling `start` outside `NotStarted`, or `update` outside `Started`, is
/// a caller contract violation; implementations treat it as a no-op and
/// never re-issue the transport operation.
pub trait ScheduleEntry: Send {
    /// Stable algorithm name for diagnostics.
    fn name(&self) -> &'static str;

    /// Current lifecycle state.
    fn status(&self) -> EntryStatus;

    /// Compute derived sizing and issue the transport operation.
    ///
    /// On success the entry is `Started`. On a transport issue failure the
    /// entry stays un-started and the error carries the algorithm name plus
    /// the transport's failure description.
    fn start(&mut self) -> Result<()>;

    /// Poll the outstanding transport operation.
    ///
    /// Completion moves the entry to `Complete`; a still-in-flight poll
    /// leaves the state unchanged; a poll failure is fatal.
    fn update(&mut self) -> Result<()>;

    /// Write a human-readable snapshot of parameters and request identity.
    ///
    /// Diagnostic only; never used for control flow and never mutates the
    /// entry.
    fn dump_detail(&self, out: &mut dyn fmt::Write) -> fmt::Result;

    /// Formatted one-line diagnostic: name, state, then detail.
    fn dump(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, "{} [{}] ", self.name(), self.status());
        let _ = self.dump_detail(&mut out);
        out
    }
}

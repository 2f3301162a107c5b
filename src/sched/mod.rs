//! Schedules: ordered collections of pollable collective entries.
//!
//! A schedule owns its entries and is progressed from exactly one thread;
//! entries perform no locking of their own, so exclusivity is structural.
//! Multiple schedules, each with its own communicator, may run concurrently
//! on separate threads.

mod alltoall;
mod entry;

pub use alltoall::AlltoallEntry;
pub use entry::{EntryStatus, ScheduleEntry};

use crate::config::TesseraConfig;
use crate::error::{Result, TesseraError};

/// An ordered collection of entries driven to completion by polling.
///
/// The executor contract: [`Schedule::start`] starts every entry exactly
/// once, then [`Schedule::progress`] is called repeatedly (any cadence)
/// until every entry reports complete. The first fatal entry error aborts
/// the schedule; an aborted schedule refuses further driving with
/// [`TesseraError::ScheduleAborted`]. There is no way to retract an
/// already-issued operation.
pub struct Schedule {
    entries: Vec<Box<dyn ScheduleEntry>>,
    started: bool,
    aborted: bool,
}

impl Schedule {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            started: false,
            aborted: false,
        }
    }

    /// Add an entry to the schedule.
    pub fn push(&mut self, entry: Box<dyn ScheduleEntry>) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Start every entry, in order, exactly once.
    pub fn start(&mut self) -> Result<()> {
        if self.aborted {
            return Err(TesseraError::ScheduleAborted);
        }
        if self.started {
            tracing::warn!("schedule start called twice, ignoring");
            return Ok(());
        }
        self.started = true;
        for entry in &mut self.entries {
            if let Err(e) = entry.start() {
                self.aborted = true;
                return Err(e);
            }
        }
        Ok(())
    }

    /// One non-blocking poll pass over every incomplete entry.
    ///
    /// Returns `Ok(true)` once every entry reports complete.
    pub fn progress(&mut self) -> Result<bool> {
        if self.aborted {
            return Err(TesseraError::ScheduleAborted);
        }
        if !self.started {
            tracing::warn!("schedule progress called before start, ignoring");
            return Ok(false);
        }
        let mut all_complete = true;
        for entry in &mut self.entries {
            if entry.status().is_complete() {
                continue;
            }
            if let Err(e) = entry.update() {
                self.aborted = true;
                return Err(e);
            }
            if !entry.status().is_complete() {
                all_complete = false;
            }
        }
        Ok(all_complete)
    }

    /// Drive [`Schedule::progress`] until every entry completes.
    ///
    /// Yields the thread cooperatively every `yield_interval_passes` poll
    /// passes and emits a one-shot warning once `stall_warn_passes` passes
    /// go by without completion. No timeout is enforced; a stalled peer
    /// keeps this spinning until the caller gives up.
    pub fn complete(&mut self, config: &TesseraConfig) -> Result<()> {
        let mut passes: u64 = 0;
        let mut stall_warned = false;
        while !self.progress()? {
            passes += 1;
            if !stall_warned && passes >= config.stall_warn_passes {
                tracing::warn!(
                    passes,
                    entries = self.entries.len(),
                    "schedule still polling with no completion, continuing"
                );
                stall_warned = true;
            }
            if config.yield_interval_passes > 0 && passes.is_multiple_of(config.yield_interval_passes)
            {
                std::thread::yield_now();
            }
        }
        Ok(())
    }

    /// Formatted diagnostic snapshot of every entry, one line each.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&entry.dump());
            out.push('\n');
        }
        out
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    /// Entry that completes after a fixed number of updates, or fails at a
    /// scripted update.
    struct StubEntry {
        status: EntryStatus,
        updates_left: usize,
        fail_on_start: bool,
        fail_on_update: bool,
        starts: usize,
    }

    impl StubEntry {
        fn completing_after(updates: usize) -> Self {
            Self {
                status: EntryStatus::NotStarted,
                updates_left: updates,
                fail_on_start: false,
                fail_on_update: false,
                starts: 0,
            }
        }

        fn failing_on_start() -> Self {
            Self {
                fail_on_start: true,
                ..Self::completing_after(0)
            }
        }

        fn failing_on_update() -> Self {
            Self {
                fail_on_update: true,
                ..Self::completing_after(1)
            }
        }
    }

    impl ScheduleEntry for StubEntry {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn status(&self) -> EntryStatus {
            self.status
        }

        fn start(&mut self) -> crate::error::Result<()> {
            self.starts += 1;
            if self.fail_on_start {
                return Err(TesseraError::entry_failed("stub", 0, "start refused"));
            }
            self.status = EntryStatus::Started;
            Ok(())
        }

        fn update(&mut self) -> crate::error::Result<()> {
            if self.fail_on_update {
                return Err(TesseraError::entry_failed("stub", 0, "poll refused"));
            }
            if self.updates_left == 0 {
                self.status = EntryStatus::Complete;
            } else {
                self.updates_left -= 1;
            }
            Ok(())
        }

        fn dump_detail(&self, out: &mut dyn fmt::Write) -> fmt::Result {
            write!(out, "updates_left {}", self.updates_left)
        }
    }

    #[test]
    fn test_progress_drives_all_entries_to_completion() {
        let mut sched = Schedule::new();
        sched.push(Box::new(StubEntry::completing_after(0)));
        sched.push(Box::new(StubEntry::completing_after(3)));

        sched.start().unwrap();
        let mut passes = 0;
        while !sched.progress().unwrap() {
            passes += 1;
            assert!(passes < 100, "schedule never completed");
        }
        assert!(sched.progress().unwrap());
    }

    #[test]
    fn test_empty_schedule_is_immediately_complete() {
        let mut sched = Schedule::new();
        assert!(sched.is_empty());
        sched.start().unwrap();
        assert!(sched.progress().unwrap());
    }

    #[test]
    fn test_complete_drives_to_done() {
        let mut sched = Schedule::new();
        sched.push(Box::new(StubEntry::completing_after(5)));
        sched.start().unwrap();
        sched.complete(&TesseraConfig::default()).unwrap();
        assert!(sched.progress().unwrap());
    }

    #[test]
    fn test_start_failure_aborts_schedule() {
        let mut sched = Schedule::new();
        sched.push(Box::new(StubEntry::failing_on_start()));
        sched.push(Box::new(StubEntry::completing_after(1)));

        let err = sched.start().unwrap_err();
        assert!(err.to_string().contains("start refused"));
        assert!(matches!(
            sched.progress().unwrap_err(),
            TesseraError::ScheduleAborted
        ));
    }

    #[test]
    fn test_update_failure_aborts_schedule() {
        let mut sched = Schedule::new();
        sched.push(Box::new(StubEntry::failing_on_update()));
        sched.start().unwrap();

        let err = sched.progress().unwrap_err();
        assert!(err.to_string().contains("poll refused"));
        assert!(matches!(
            sched.complete(&TesseraConfig::default()).unwrap_err(),
            TesseraError::ScheduleAborted
        ));
    }

    #[test]
    fn test_progress_before_start_is_a_no_op() {
        let mut sched = Schedule::new();
        sched.push(Box::new(StubEntry::completing_after(0)));
        assert!(!sched.progress().unwrap());
    }

    #[test]
    fn test_double_start_does_not_restart_entries() {
        let mut sched = Schedule::new();
        sched.push(Box::new(StubEntry::completing_after(1)));
        sched.start().unwrap();
        sched.start().unwrap();
        // The stub guards nothing itself; the schedule must not call start twice.
        sched.complete(&TesseraConfig::default()).unwrap();
    }

    #[test]
    fn test_dump_lists_every_entry() {
        let mut sched = Schedule::new();
        sched.push(Box::new(StubEntry::completing_after(2)));
        sched.push(Box::new(StubEntry::completing_after(4)));
        sched.start().unwrap();

        let dump = sched.dump();
        assert_eq!(dump.lines().count(), 2);
        for line in dump.lines() {
            assert!(line.starts_with("stub [started] "), "{line}");
        }
    }
}

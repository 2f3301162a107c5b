//! Pollable, non-blocking execution core for collective communication
//! schedules.
//!
//! A [`Schedule`] owns an ordered set of [`ScheduleEntry`] values, each of
//! which drives one collective algorithm over a non-blocking [`Transport`].
//! Entries are started once and then polled to completion; nothing in this
//! crate blocks or spawns threads. The crate ships one concrete entry, the
//! flat [`AlltoallEntry`], plus an in-process [`LocalFabric`] transport for
//! tests and single-process runs.

pub mod comm;
pub mod config;
pub mod datatype;
pub mod error;
pub mod memory;
pub mod sched;
pub mod transport;

pub use comm::{CommId, Communicator, Rank};
pub use config::TesseraConfig;
pub use datatype::{DataType, DatatypeDescriptor, DatatypeRegistry};
pub use error::{Result, TesseraError};
pub use memory::Buffer;
pub use sched::{AlltoallEntry, EntryStatus, Schedule, ScheduleEntry};
pub use transport::{
    LocalFabric, LocalTransport, Transport, TransportError, TransportRequest,
    TransportResult,
};

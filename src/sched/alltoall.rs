use std::fmt;
use std::sync::Arc;

use crate::comm::Communicator;
use crate::datatype::DataType;
use crate::error::{Result, TesseraError};
use crate::memory::Buffer;
use crate::transport::TransportRequest;

use super::entry::{EntryStatus, ScheduleEntry};

/// Drives one non-blocking all-to-all exchange.
///
/// Every participant sends a distinct `cnt`-element chunk to every rank
/// (arranged contiguously by destination in the send buffer) and receives
/// one chunk from each, contiguously by source, in the receive buffer. The
/// entry does not move data itself; it sizes, issues, and polls a transport
/// operation that carries that guarantee.
///
/// The per-peer byte size `cnt * element_size(dtype)` is computed once at
/// `start` and held for the entry's remaining life. `cnt = 0` is legal:
/// the zero-length exchange is still issued and polled to completion, so
/// it remains a synchronization point across participants.
pub struct AlltoallEntry {
    send_buf: Buffer,
    recv_buf: Buffer,
    cnt: usize,
    dtype: DataType,
    comm: Arc<Communicator>,
    bytes: Option<usize>,
    request: Option<TransportRequest>,
    status: EntryStatus,
}

impl AlltoallEntry {
    pub const NAME: &'static str = "alltoall";

    pub fn new(
        send_buf: Buffer,
        recv_buf: Buffer,
        cnt: usize,
        dtype: DataType,
        comm: Arc<Communicator>,
    ) -> Self {
        Self {
            send_buf,
            recv_buf,
            cnt,
            dtype,
            comm,
            bytes: None,
            request: None,
            status: EntryStatus::NotStarted,
        }
    }

    /// Per-peer chunk size in bytes, available once started.
    pub fn bytes(&self) -> Option<usize> {
        self.bytes
    }
}

impl ScheduleEntry for AlltoallEntry {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn status(&self) -> EntryStatus {
        self.status
    }

    fn start(&mut self) -> Result<()> {
        if self.status != EntryStatus::NotStarted {
            tracing::warn!(
                entry = Self::NAME,
                status = %self.status,
                "start called on an already-started entry, ignoring"
            );
            return Ok(());
        }

        let bytes = self.cnt * self.comm.registry().size_of(self.dtype);
        self.bytes = Some(bytes);

        let send = self.send_buf.resolve(bytes)?;
        let recv = self.recv_buf.resolve(bytes)?;

        // SAFETY: Buffer construction vouches that both regions are valid
        // for the caller-declared capacity and outlive this entry; the
        // operation is polled to completion before the buffers are released.
        let issued = unsafe { self.comm.ctx().issue_alltoall(send, recv, bytes) };
        let request = issued
            .map_err(|e| TesseraError::entry_failed(Self::NAME, self.comm.id(), e.to_string()))?;

        tracing::debug!(
            entry = Self::NAME,
            request = %request,
            bytes,
            comm_id = self.comm.id(),
            "issued"
        );
        self.request = Some(request);
        self.status = EntryStatus::Started;
        Ok(())
    }

    fn update(&mut self) -> Result<()> {
        if self.status != EntryStatus::Started {
            tracing::warn!(
                entry = Self::NAME,
                status = %self.status,
                "update called outside started state, ignoring"
            );
            return Ok(());
        }
        let Some(request) = self.request.as_ref() else {
            return Ok(());
        };

        match self.comm.ctx().poll(request) {
            Ok(true) => {
                tracing::debug!(entry = Self::NAME, request = %request, "complete");
                self.status = EntryStatus::Complete;
                Ok(())
            }
            Ok(false) => Ok(()),
            Err(e) => Err(TesseraError::entry_failed(
                Self::NAME,
                self.comm.id(),
                e.to_string(),
            )),
        }
    }

    fn dump_detail(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        write!(
            out,
            "dt {}, send_buf {}, recv_buf {}, cnt {}, bytes ",
            self.comm.registry().name_of(self.dtype),
            self.send_buf,
            self.recv_buf,
            self.cnt
        )?;
        match self.bytes {
            Some(b) => write!(out, "{b}")?,
            None => out.write_str("-")?,
        }
        write!(out, ", comm_id {}, req ", self.comm.id())?;
        match self.request.as_ref() {
            Some(r) => write!(out, "{r}"),
            None => out.write_str("-"),
        }
    }
}

//! In-process loopback fabric.
//!
//! One [`LocalTransport`] endpoint per rank, all sharing one fabric state
//! behind a mutex. Collective instances match by per-rank issue order: the
//! k-th exchange issued by a rank pairs with the k-th exchange issued by
//! every other rank. Data destined for a rank is written into its receive
//! region only from that rank's own poll call, so each thread driving a
//! schedule writes nothing but its own buffers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::comm::Rank;

use super::{Transport, TransportError, TransportRequest, TransportResult};

struct Exchange {
    bytes: usize,
    staged: Vec<Option<Vec<u8>>>,
    recv_ptrs: Vec<Option<u64>>,
    delivered: Vec<bool>,
    issued: u32,
    delivered_count: u32,
}

impl Exchange {
    fn new(world: u32, bytes: usize) -> Self {
        let world = world as usize;
        Self {
            bytes,
            staged: vec![None; world],
            recv_ptrs: vec![None; world],
            delivered: vec![false; world],
            issued: 0,
            delivered_count: 0,
        }
    }
}

#[derive(Default)]
struct FabricState {
    exchanges: HashMap<u64, Exchange>,
}

/// Bootstrap for in-process fabrics.
pub struct LocalFabric;

impl LocalFabric {
    /// Create `world` endpoints sharing one fabric, one per rank.
    pub fn bootstrap(world: u32) -> Vec<LocalTransport> {
        let shared = Arc::new(Mutex::new(FabricState::default()));
        (0..world)
            .map(|rank| LocalTransport {
                rank,
                world,
                next_seq: AtomicU64::new(0),
                shared: Arc::clone(&shared),
            })
            .collect()
    }
}

/// One rank's endpoint into an in-process fabric.
pub struct LocalTransport {
    rank: Rank,
    world: u32,
    next_seq: AtomicU64,
    shared: Arc<Mutex<FabricState>>,
}

impl LocalTransport {
    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn world(&self) -> u32 {
        self.world
    }

    fn lock(&self) -> TransportResult<MutexGuard<'_, FabricState>> {
        self.shared
            .lock()
            .map_err(|_| TransportError::failed("fabric lock poisoned"))
    }
}

impl Transport for LocalTransport {
    unsafe fn issue_alltoall(
        &self,
        send: u64,
        recv: u64,
        bytes: usize,
    ) -> TransportResult<TransportRequest> {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let total = bytes * self.world as usize;
        let image = if total == 0 {
            Vec::new()
        } else {
            // SAFETY: the caller guarantees `send` is readable for
            // world * bytes.
            unsafe { std::slice::from_raw_parts(send as *const u8, total) }.to_vec()
        };

        let mut state = self.lock()?;
        let me = self.rank as usize;
        let world = self.world;
        let ex = state
            .exchanges
            .entry(seq)
            .or_insert_with(|| Exchange::new(world, bytes));
        if ex.bytes != bytes {
            return Err(TransportError::rejected(format!(
                "chunk size disagreement on exchange {seq}: {} vs {} bytes",
                ex.bytes, bytes
            )));
        }
        if ex.staged[me].is_some() {
            return Err(TransportError::rejected(format!(
                "rank {} already issued exchange {seq}",
                self.rank
            )));
        }
        ex.staged[me] = Some(image);
        ex.recv_ptrs[me] = Some(recv);
        ex.issued += 1;
        Ok(TransportRequest::new(seq))
    }

    fn poll(&self, request: &TransportRequest) -> TransportResult<bool> {
        let mut state = self.lock()?;
        let seq = request.id();
        let Some(ex) = state.exchanges.get_mut(&seq) else {
            return Err(TransportError::UnknownRequest { id: seq });
        };
        let me = self.rank as usize;
        if ex.delivered[me] {
            return Ok(true);
        }
        if ex.issued < self.world {
            return Ok(false);
        }

        let bytes = ex.bytes;
        let Some(recv) = ex.recv_ptrs[me] else {
            return Err(TransportError::failed(format!(
                "rank {} has no receive region for exchange {seq}",
                self.rank
            )));
        };
        if bytes > 0 {
            for src in 0..self.world as usize {
                let Some(image) = ex.staged[src].as_ref() else {
                    return Err(TransportError::failed(format!(
                        "rank {src} staged no data for exchange {seq}"
                    )));
                };
                let chunk = &image[me * bytes..(me + 1) * bytes];
                let dst = (recv + (src * bytes) as u64) as *mut u8;
                // SAFETY: the issue contract guarantees `recv` is writable
                // for world * bytes and stays valid until this poll reports
                // completion; only the owning rank writes this region.
                unsafe { std::ptr::copy_nonoverlapping(chunk.as_ptr(), dst, bytes) };
            }
        }
        ex.delivered[me] = true;
        ex.delivered_count += 1;
        if ex.delivered_count == self.world {
            state.exchanges.remove(&seq);
        }
        Ok(true)
    }
}

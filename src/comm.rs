use std::sync::Arc;

use crate::datatype::DatatypeRegistry;
use crate::transport::Transport;

/// Rank of a participant in a communicator group (0-indexed).
pub type Rank = u32;

/// Stable identifier of a communicator, used in diagnostics.
pub type CommId = u32;

/// The group of participants jointly executing collective operations.
///
/// Carries the opaque transport context used to issue and poll operations,
/// the datatype registry, and a stable identifier for diagnostics. Entries
/// share a communicator read-only; nothing in this crate mutates it after
/// construction. All participants of one collective instance must agree on
/// count and datatype; that agreement is a caller contract and is not
/// detected here.
pub struct Communicator {
    id: CommId,
    size: u32,
    ctx: Arc<dyn Transport>,
    registry: Arc<DatatypeRegistry>,
}

impl Communicator {
    pub fn new(
        id: CommId,
        size: u32,
        ctx: Arc<dyn Transport>,
        registry: Arc<DatatypeRegistry>,
    ) -> Self {
        Self {
            id,
            size,
            ctx,
            registry,
        }
    }

    /// Identifier for diagnostics.
    pub fn id(&self) -> CommId {
        self.id
    }

    /// Number of participants.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// The transport context operations are issued and polled through.
    pub fn ctx(&self) -> &dyn Transport {
        self.ctx.as_ref()
    }

    /// The datatype registry shared by this group.
    pub fn registry(&self) -> &DatatypeRegistry {
        &self.registry
    }
}

impl std::fmt::Debug for Communicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Communicator")
            .field("id", &self.id)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

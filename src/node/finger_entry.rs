use std::fmt;

use crate::node::actor::NodeHandle;
use crate::ring::Id;

/// One entry in a node's finger table: the id the entry was computed for
/// (`self.id + 2^i`) paired with the handle of the node responsible for it.
///
/// A handle carries no id of its own — the owning node's id can only be
/// learned by sending it a `GetId` — so `start` is the only thing this
/// type can show without a round trip.
#[derive(Clone)]
pub struct FingerEntry {
    start: Id,
    handle: NodeHandle,
}

impl fmt::Debug for FingerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FingerEntry").field("start", &self.start).finish()
    }
}

impl FingerEntry {
    pub fn new(start: Id, handle: NodeHandle) -> Self {
        FingerEntry { start, handle }
    }

    pub fn start(&self) -> Id {
        self.start
    }

    pub fn handle(&self) -> &NodeHandle {
        &self.handle
    }
}

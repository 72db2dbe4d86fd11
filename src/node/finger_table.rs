use crate::node::actor::NodeHandle;
use crate::node::finger_entry::FingerEntry;
use crate::ring::{self, Id, RingConfig};
use crate::supervisor::Registry;

/// A node's routing table: `bits` entries, the i-th pointing at the node
/// responsible for `(id + 2^i) mod ring_size`.
#[derive(Default)]
pub struct FingerTable {
    entries: Vec<FingerEntry>,
}

impl FingerTable {
    /// Builds the table against a fully-populated registry. Synchronous
    /// and pure: no messaging is needed because every node already holds
    /// the whole id->handle map.
    pub fn build(id: Id, config: RingConfig, registry: &Registry, self_handle: &NodeHandle) -> Self {
        let sorted_ids: Vec<Id> = registry.keys().copied().collect();
        let mut entries = Vec::with_capacity(config.bits as usize);
        for i in 0..config.bits {
            let start = config.finger_start(id, i);
            let owner_id = ring::find_successor_in_sorted(start, &sorted_ids);
            let handle = registry.get(&owner_id).cloned().unwrap_or_else(|| self_handle.clone());
            entries.push(FingerEntry::new(start, handle));
        }
        FingerTable { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FingerEntry> {
        self.entries.get(index)
    }

    pub fn first_handle(&self) -> Option<NodeHandle> {
        self.entries.first().map(|e| e.handle().clone())
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &FingerEntry> {
        self.entries.iter()
    }
}

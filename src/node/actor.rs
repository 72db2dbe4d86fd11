use log::{debug, info, warn};
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;

use crate::node::finger_table::FingerTable;
use crate::node::message::{FoundSuccessor, NodeMessage};
use crate::ring::{self, Id, RingConfig};
use crate::supervisor::Registry;
use crate::utils::constants::{FINGER_WALK_TIMEOUT, LOOKUP_SUBQUERY_TIMEOUT};

/// A send-only reference to a node actor's inbox. Cloning a `NodeHandle`
/// clones the underlying channel sender; it carries no id of its own —
/// the owning node's id is only ever learned by sending it a `GetId`.
#[derive(Clone)]
pub struct NodeHandle {
    inbox: mpsc::UnboundedSender<NodeMessage>,
}

impl NodeHandle {
    pub(crate) fn from_sender(inbox: mpsc::UnboundedSender<NodeMessage>) -> Self {
        NodeHandle { inbox }
    }

    fn send(&self, message: NodeMessage) {
        // The receiver only disappears once its task has exited, which
        // only happens after Shutdown; a send past that point is dropped
        // silently, since callers can race a dying node during teardown.
        let _ = self.inbox.send(message);
    }

    pub async fn get_id(&self) -> Option<Id> {
        let (reply, rx) = oneshot::channel();
        self.send(NodeMessage::GetId { reply });
        rx.await.ok()
    }

    pub async fn get_id_bounded(&self) -> Option<Id> {
        let (reply, rx) = oneshot::channel();
        self.send(NodeMessage::GetId { reply });
        timeout(FINGER_WALK_TIMEOUT, rx).await.ok()?.ok()
    }

    pub async fn get_successor(&self) -> Option<NodeHandle> {
        let (reply, rx) = oneshot::channel();
        self.send(NodeMessage::GetSuccessor { reply });
        rx.await.ok().flatten()
    }

    pub fn set_successor(&self, handle: NodeHandle) {
        self.send(NodeMessage::SetSuccessor { handle });
    }

    pub fn set_predecessor(&self, handle: NodeHandle) {
        self.send(NodeMessage::SetPredecessor { handle });
    }

    pub fn init_finger_table(&self, registry: Registry, ack: mpsc::UnboundedSender<()>) {
        self.send(NodeMessage::InitFingerTable { registry, ack });
    }

    pub async fn get_finger_entry(&self, index: usize) -> Option<NodeHandle> {
        let (reply, rx) = oneshot::channel();
        self.send(NodeMessage::GetFingerEntry { index, reply });
        rx.await.ok().flatten()
    }

    /// Sends `FindSuccessor` and returns the channel the eventual reply
    /// will arrive on — possibly forwarded several hops away.
    pub fn find_successor(&self, target: Id, hops: u32) -> oneshot::Receiver<FoundSuccessor> {
        let (reply, rx) = oneshot::channel();
        self.send(NodeMessage::FindSuccessor { target, hops, reply });
        rx
    }

    pub async fn closest_preceding_finger_bounded(&self, target: Id) -> Option<NodeHandle> {
        let (reply, rx) = oneshot::channel();
        self.send(NodeMessage::ClosestPrecedingFinger { target, reply });
        timeout(LOOKUP_SUBQUERY_TIMEOUT, rx).await.ok()?.ok().flatten()
    }
}

/// Whether a node has completed `InitFingerTable` yet. Before that, it
/// degrades gracefully on routing messages — replying with itself —
/// rather than erroring.
#[derive(Debug, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Initialized,
}

struct NodeState {
    id: Id,
    config: RingConfig,
    self_handle: NodeHandle,
    lifecycle: Lifecycle,
    successor: Option<NodeHandle>,
    predecessor: Option<NodeHandle>,
    finger_table: FingerTable,
}

/// Spawns one node actor and returns a handle to its inbox. The task runs
/// until its inbox is dropped (all handles gone) or the process exits.
pub fn spawn_node(id: Id, config: RingConfig) -> NodeHandle {
    let (tx, rx) = mpsc::unbounded_channel();
    let self_handle = NodeHandle::from_sender(tx.clone());
    let state = NodeState {
        id,
        config,
        self_handle: self_handle.clone(),
        lifecycle: Lifecycle::Created,
        successor: None,
        predecessor: None,
        finger_table: FingerTable::default(),
    };
    tokio::spawn(run_node(rx, state));
    self_handle
}

async fn run_node(mut rx: mpsc::UnboundedReceiver<NodeMessage>, mut state: NodeState) {
    debug!("node {}: actor started", state.id);
    while let Some(message) = rx.recv().await {
        handle_message(&mut state, message).await;
    }
    debug!("node {}: actor exiting, inbox closed", state.id);
}

async fn handle_message(state: &mut NodeState, message: NodeMessage) {
    match message {
        NodeMessage::GetId { reply } => {
            let _ = reply.send(state.id);
        }
        NodeMessage::GetSuccessor { reply } => {
            let _ = reply.send(state.successor.clone());
        }
        NodeMessage::SetSuccessor { handle } => {
            state.successor = Some(handle);
        }
        NodeMessage::SetPredecessor { handle } => {
            state.predecessor = Some(handle);
        }
        NodeMessage::InitFingerTable { registry, ack } => {
            build_finger_table(state, &registry);
            state.lifecycle = Lifecycle::Initialized;
            info!("node {}: finger table initialized", state.id);
            let _ = ack.send(());
        }
        NodeMessage::GetFingerEntry { index, reply } => {
            let handle = state.finger_table.get(index).map(|e| e.handle().clone());
            let _ = reply.send(handle);
        }
        NodeMessage::FindSuccessor { target, hops, reply } => {
            find_successor(state, target, hops, reply).await;
        }
        NodeMessage::ClosestPrecedingFinger { target, reply } => {
            let handle = closest_preceding_finger(state, target).await;
            let _ = reply.send(handle);
        }
    }
}

/// Builds the finger table against the supplied registry: a synchronous,
/// pure computation since every node is handed the full id->handle map at
/// init time, standing in for a live join protocol.
fn build_finger_table(state: &mut NodeState, registry: &Registry) {
    let table = FingerTable::build(state.id, state.config, registry, &state.self_handle);
    state.successor = table.first_handle();
    state.finger_table = table;
}

/// Classic Chord recursive lookup, routed via message forwarding: each hop
/// either resolves the answer directly or forwards the same reply channel
/// one step closer, so the final response always goes straight back to
/// whoever asked first.
async fn find_successor(
    state: &mut NodeState,
    target: Id,
    hops: u32,
    reply: oneshot::Sender<FoundSuccessor>,
) {
    if state.lifecycle == Lifecycle::Created || state.successor.is_none() {
        let _ = reply.send(FoundSuccessor {
            id: state.id,
            handle: state.self_handle.clone(),
            hops,
        });
        return;
    }

    if target == state.id {
        let _ = reply.send(FoundSuccessor {
            id: state.id,
            handle: state.self_handle.clone(),
            hops,
        });
        return;
    }

    let successor = state.successor.clone().unwrap();
    let successor_id = match successor.get_id_bounded().await {
        Some(id) => id,
        None => {
            warn!("node {}: successor did not answer GetId, best-effort reply", state.id);
            let _ = reply.send(FoundSuccessor {
                id: state.id,
                handle: state.self_handle.clone(),
                hops,
            });
            return;
        }
    };

    if ring::in_range(target, state.id, successor_id) {
        let _ = reply.send(FoundSuccessor {
            id: successor_id,
            handle: successor,
            hops,
        });
        return;
    }

    // Not covered by our own successor: consult our own finger table for
    // the closest node preceding the target and hand the reply channel
    // off to it. This is what gives the lookup its O(log N) hop count —
    // each forward can jump roughly half the remaining ring distance
    // instead of walking the successor chain node by node.
    match closest_preceding_finger(state, target).await {
        Some(closer) => {
            closer.send(NodeMessage::FindSuccessor {
                target,
                hops: hops + 1,
                reply,
            });
        }
        None => {
            let _ = reply.send(FoundSuccessor {
                id: successor_id,
                handle: successor,
                hops,
            });
        }
    }
}

/// Walks finger indices from `m-1` down to `0`; the first finger whose id
/// lies strictly between `self.id` and `target` wins.
async fn closest_preceding_finger(state: &NodeState, target: Id) -> Option<NodeHandle> {
    for entry in state.finger_table.iter().rev() {
        if let Some(finger_id) = entry.handle().get_id_bounded().await {
            if ring::in_range_exclusive(finger_id, state.id, target) {
                return Some(entry.handle().clone());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn config() -> RingConfig {
        RingConfig::new(8) // small ring, 256 ids, for fast tests
    }

    async fn build_ring(ids: &[Id]) -> Vec<NodeHandle> {
        let cfg = config();
        let handles: Vec<NodeHandle> = ids.iter().map(|&id| spawn_node(id, cfg)).collect();
        let registry: Registry = Arc::new(
            ids.iter()
                .copied()
                .zip(handles.iter().cloned())
                .collect::<BTreeMap<_, _>>(),
        );
        let (ack_tx, mut ack_rx) = mpsc::unbounded_channel();
        for h in &handles {
            h.init_finger_table(registry.clone(), ack_tx.clone());
        }
        drop(ack_tx);
        for _ in 0..handles.len() {
            ack_rx.recv().await.unwrap();
        }
        handles
    }

    #[tokio::test]
    async fn single_node_ring_every_finger_is_self() {
        let handles = build_ring(&[0]).await;
        let id = handles[0].get_id().await.unwrap();
        assert_eq!(id, 0);
        for i in 0..8 {
            let finger = handles[0].get_finger_entry(i).await.unwrap();
            assert_eq!(finger.get_id().await.unwrap(), 0);
        }
    }

    #[tokio::test]
    async fn two_node_ring_lookup_directions() {
        // ids chosen per generate_ids(2, RingConfig(8)): 0 and 128
        let handles = build_ring(&[0, 128]).await;
        let rx = handles[0].find_successor(64, 0);
        let found = rx.await.unwrap();
        assert_eq!(found.id, 128);

        let rx = handles[0].find_successor(200, 0);
        let found = rx.await.unwrap();
        assert_eq!(found.id, 0);
    }

    #[tokio::test]
    async fn lookup_of_participant_id_returns_that_id_from_any_start_node() {
        let ids = vec![0u32, 30, 60, 120, 200];
        let handles = build_ring(&ids).await;
        for (start_idx, &start_id) in ids.iter().enumerate() {
            for &target in &ids {
                let rx = handles[start_idx].find_successor(target, 0);
                let found = rx.await.unwrap();
                assert_eq!(found.id, target, "start={start_id} target={target}");
            }
        }
    }

    #[tokio::test]
    async fn closest_preceding_finger_message_is_queryable_directly() {
        let ids = vec![0u32, 30, 60, 120, 200];
        let handles = build_ring(&ids).await;
        // from node 0, the closest node strictly preceding 150 must itself
        // precede 150 and must not be node 0.
        let candidate = handles[0].closest_preceding_finger_bounded(150).await;
        if let Some(handle) = candidate {
            let id = handle.get_id().await.unwrap();
            assert!(ring::in_range_exclusive(id, 0, 150));
        }
    }
}

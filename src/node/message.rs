use tokio::sync::{mpsc, oneshot};

use crate::node::actor::NodeHandle;
use crate::ring::Id;
use crate::supervisor::Registry;

/// Result of a completed `FindSuccessor` lookup, delivered directly to the
/// original caller's reply channel by whichever node in the forwarding
/// chain resolves it.
#[derive(Debug)]
pub struct FoundSuccessor {
    pub id: Id,
    pub handle: NodeHandle,
    /// Number of forwarding hops the lookup actually took. Threaded
    /// through the chain rather than estimated; see `supervisor::stats`
    /// for the separate log2(N) baseline used for the verdict.
    pub hops: u32,
}

/// Reply to `InitFingerTable`; acked through the supervisor's shared ack
/// channel rather than returned here, but kept as a marker type so the
/// intent at call sites is self-documenting.
#[derive(Debug)]
pub struct InitializationComplete;

/// One message in a node actor's inbox. Processed strictly in arrival
/// order; see `node::actor::run_node`.
pub enum NodeMessage {
    GetId {
        reply: oneshot::Sender<Id>,
    },
    GetSuccessor {
        reply: oneshot::Sender<Option<NodeHandle>>,
    },
    SetSuccessor {
        handle: NodeHandle,
    },
    SetPredecessor {
        handle: NodeHandle,
    },
    InitFingerTable {
        registry: Registry,
        ack: mpsc::UnboundedSender<()>,
    },
    GetFingerEntry {
        index: usize,
        reply: oneshot::Sender<Option<NodeHandle>>,
    },
    FindSuccessor {
        target: Id,
        hops: u32,
        reply: oneshot::Sender<FoundSuccessor>,
    },
    ClosestPrecedingFinger {
        target: Id,
        reply: oneshot::Sender<Option<NodeHandle>>,
    },
}

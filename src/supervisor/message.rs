use tokio::sync::oneshot;

use crate::ring::Id;
use crate::supervisor::stats::SimulationStats;

#[derive(Debug)]
pub enum InitOutcome {
    InitComplete,
    InitFailed(String),
}

#[derive(Debug)]
pub enum SimulationOutcome {
    SimulationComplete(SimulationStats),
    SimulationFailed(String),
}

#[derive(Debug)]
pub enum LookupOutcome {
    LookupSuccess { target: Id, hops: u32, found_at: Id },
    LookupFailure(String),
}

/// One message in the supervisor actor's inbox.
pub enum SupervisorMessage {
    InitializeNodes {
        reply: oneshot::Sender<InitOutcome>,
    },
    StartSimulation {
        node_ids: Vec<Id>,
        requests_per_node: usize,
        reply: oneshot::Sender<SimulationOutcome>,
    },
    Lookup {
        target: Id,
        from_node: Id,
        reply: oneshot::Sender<LookupOutcome>,
    },
    GetNodeCount {
        reply: oneshot::Sender<usize>,
    },
    Shutdown,
}

/// A handle used to drive the supervisor actor from `main`/tests.
#[derive(Clone)]
pub struct SupervisorMessageHandle {
    pub(crate) inbox: tokio::sync::mpsc::UnboundedSender<SupervisorMessage>,
}

impl SupervisorMessageHandle {
    pub async fn initialize_nodes(&self) -> InitOutcome {
        let (reply, rx) = oneshot::channel();
        let _ = self.inbox.send(SupervisorMessage::InitializeNodes { reply });
        rx.await.unwrap_or(InitOutcome::InitFailed("supervisor actor dropped".into()))
    }

    pub async fn start_simulation(&self, node_ids: Vec<Id>, requests_per_node: usize) -> SimulationOutcome {
        let (reply, rx) = oneshot::channel();
        let _ = self.inbox.send(SupervisorMessage::StartSimulation {
            node_ids,
            requests_per_node,
            reply,
        });
        rx.await
            .unwrap_or(SimulationOutcome::SimulationFailed("supervisor actor dropped".into()))
    }

    pub async fn lookup(&self, target: Id, from_node: Id) -> LookupOutcome {
        let (reply, rx) = oneshot::channel();
        let _ = self.inbox.send(SupervisorMessage::Lookup { target, from_node, reply });
        rx.await
            .unwrap_or(LookupOutcome::LookupFailure("supervisor actor dropped".into()))
    }

    pub async fn node_count(&self) -> usize {
        let (reply, rx) = oneshot::channel();
        let _ = self.inbox.send(SupervisorMessage::GetNodeCount { reply });
        rx.await.unwrap_or(0)
    }

    pub fn shutdown(&self) {
        let _ = self.inbox.send(SupervisorMessage::Shutdown);
    }
}

use std::collections::BTreeMap;
use std::sync::Arc;

use log::{info, warn};
use tokio::sync::mpsc;
use tokio::time::timeout;

use crate::node::{self, NodeHandle};
use crate::ring::{self, Id, RingConfig};
use crate::supervisor::message::{
    InitOutcome, LookupOutcome, SimulationOutcome, SupervisorMessage, SupervisorMessageHandle,
};
use crate::supervisor::workload;
use crate::supervisor::Registry;
use crate::utils::constants::{INIT_ACK_TIMEOUT, INIT_BARRIER_CEILING, SIMULATION_CEILING, TOP_LEVEL_LOOKUP_TIMEOUT};

pub type SupervisorHandle = SupervisorMessageHandle;

struct SupervisorState {
    ids: Vec<Id>,
    registry: Registry,
    config: RingConfig,
    seed: u64,
}

/// Creates `n` node actors and an owning supervisor actor to drive them.
/// All nodes exist before the supervisor begins sending them anything.
pub fn spawn_supervisor(n: usize, config: RingConfig, seed: u64) -> SupervisorHandle {
    let ids = ring::generate_ids(n, &config);
    let mut map = BTreeMap::new();
    for &id in &ids {
        let handle: NodeHandle = node::spawn_node(id, config);
        map.insert(id, handle);
    }
    let registry: Registry = Arc::new(map);

    let state = SupervisorState { ids, registry, config, seed };
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(run_supervisor(rx, state));
    SupervisorMessageHandle { inbox: tx }
}

async fn run_supervisor(mut rx: mpsc::UnboundedReceiver<SupervisorMessage>, state: SupervisorState) {
    info!("supervisor: managing {} nodes", state.ids.len());
    while let Some(message) = rx.recv().await {
        match message {
            SupervisorMessage::InitializeNodes { reply } => {
                let outcome = initialize_nodes(&state).await;
                let _ = reply.send(outcome);
            }
            SupervisorMessage::StartSimulation {
                node_ids,
                requests_per_node,
                reply,
            } => {
                let outcome = match timeout(
                    SIMULATION_CEILING,
                    workload::run(&node_ids, &state.registry, requests_per_node, state.seed, state.config),
                )
                .await
                {
                    Ok(stats) => SimulationOutcome::SimulationComplete(stats),
                    Err(_) => {
                        warn!("supervisor: simulation run exceeded the {:?} ceiling", SIMULATION_CEILING);
                        SimulationOutcome::SimulationFailed(format!("simulation exceeded {:?} ceiling", SIMULATION_CEILING))
                    }
                };
                let _ = reply.send(outcome);
            }
            SupervisorMessage::Lookup { target, from_node, reply } => {
                let outcome = lookup_one(&state, target, from_node).await;
                let _ = reply.send(outcome);
            }
            SupervisorMessage::GetNodeCount { reply } => {
                let _ = reply.send(state.ids.len());
            }
            SupervisorMessage::Shutdown => {
                info!("supervisor: shutting down, abandoning node actors");
                break;
            }
        }
    }
}

/// Broadcasts `InitFingerTable` to every node over a single shared ack
/// channel, then waits for exactly N acks, each individually bounded. The
/// whole barrier additionally carries an outer ceiling, since N separate
/// per-ack timeouts could otherwise sum to far longer than any single run
/// should reasonably take. Ack order never matters — only the count.
async fn initialize_nodes(state: &SupervisorState) -> InitOutcome {
    match timeout(INIT_BARRIER_CEILING, await_all_acks(state)).await {
        Ok(outcome) => outcome,
        Err(_) => {
            warn!("supervisor: init barrier exceeded the {:?} ceiling", INIT_BARRIER_CEILING);
            InitOutcome::InitFailed(format!("init barrier exceeded {:?} ceiling", INIT_BARRIER_CEILING))
        }
    }
}

async fn await_all_acks(state: &SupervisorState) -> InitOutcome {
    let (ack_tx, mut ack_rx) = mpsc::unbounded_channel();
    for handle in state.registry.values() {
        handle.init_finger_table(state.registry.clone(), ack_tx.clone());
    }
    drop(ack_tx);

    for received in 0..state.registry.len() {
        match timeout(INIT_ACK_TIMEOUT, ack_rx.recv()).await {
            Ok(Some(())) => continue,
            Ok(None) => {
                return InitOutcome::InitFailed(format!(
                    "ack channel closed after {received}/{} acks",
                    state.registry.len()
                ));
            }
            Err(_) => {
                warn!("supervisor: init ack {received} timed out");
                return InitOutcome::InitFailed(format!(
                    "timed out waiting for ack {received}/{}",
                    state.registry.len()
                ));
            }
        }
    }
    InitOutcome::InitComplete
}

async fn lookup_one(state: &SupervisorState, target: Id, from_node: Id) -> LookupOutcome {
    let Some(start_handle) = state.registry.get(&from_node) else {
        return LookupOutcome::LookupFailure(format!("no start node found for id {from_node}"));
    };
    let rx = start_handle.find_successor(target, 0);
    match timeout(TOP_LEVEL_LOOKUP_TIMEOUT, rx).await {
        Ok(Ok(found)) => LookupOutcome::LookupSuccess {
            target,
            hops: found.hops,
            found_at: found.id,
        },
        Ok(Err(_)) | Err(_) => LookupOutcome::LookupFailure(format!("lookup for target {target} timed out")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn init_then_simulate_small_ring() {
        let handle = spawn_supervisor(10, RingConfig::new(16), 12345);
        assert_eq!(handle.node_count().await, 10);

        match handle.initialize_nodes().await {
            InitOutcome::InitComplete => {}
            InitOutcome::InitFailed(reason) => panic!("init failed: {reason}"),
        }

        let ids = ring::generate_ids(10, &RingConfig::new(16));
        match handle.start_simulation(ids, 5).await {
            SimulationOutcome::SimulationComplete(stats) => {
                assert_eq!(stats.total_requests, 50);
                assert_eq!(stats.successful_lookups, 50);
            }
            SimulationOutcome::SimulationFailed(reason) => panic!("simulation failed: {reason}"),
        }
        handle.shutdown();
    }

    #[tokio::test]
    async fn single_node_simulation_matches_scenario_one() {
        let handle = spawn_supervisor(1, RingConfig::new(16), 12345);
        handle.initialize_nodes().await;
        let ids = ring::generate_ids(1, &RingConfig::new(16));
        match handle.start_simulation(ids, 10).await {
            SimulationOutcome::SimulationComplete(stats) => {
                assert_eq!(stats.total_requests, 10);
                assert_eq!(stats.successful_lookups, 10);
                assert_eq!(stats.avg_hops(), 0.0);
            }
            SimulationOutcome::SimulationFailed(reason) => panic!("simulation failed: {reason}"),
        }
    }

    #[tokio::test]
    async fn lookup_missing_start_node_fails_gracefully() {
        let handle = spawn_supervisor(5, RingConfig::new(16), 12345);
        handle.initialize_nodes().await;
        match handle.lookup(100, 65000).await {
            LookupOutcome::LookupFailure(_) => {}
            LookupOutcome::LookupSuccess { .. } => panic!("expected failure for unknown start node"),
        }
    }
}

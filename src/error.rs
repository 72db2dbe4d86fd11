use thiserror::Error;

use crate::ring::Id;

/// Crate-level error type. Nothing is raised across an actor boundary —
/// these only ever appear as plain `Result`s returned from CLI parsing or
/// from top-level driving code in `main`; the actors themselves fold
/// failure into the typed reply enums described in the message modules.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Usage: chord-ring-sim <num_nodes> <num_requests>")]
    ArgParse,

    #[error("num_nodes and num_requests must be positive integers")]
    InvalidArgs,

    #[error("node {node_id} failed to acknowledge initialization")]
    InitTimeout { node_id: Id },

    #[error("lookup for target {target} timed out")]
    LookupTimeout { target: Id },

    #[error("no start node found for id {id}")]
    MissingStartNode { id: Id },
}

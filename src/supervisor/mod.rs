pub mod actor;
pub mod message;
pub mod stats;
pub mod workload;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::node::actor::NodeHandle;
use crate::ring::Id;

/// The immutable id->handle map every node actor is given a clone of at
/// init time, and the supervisor retains for the lifetime of the run.
pub type Registry = Arc<BTreeMap<Id, NodeHandle>>;

pub use actor::{spawn_supervisor, SupervisorHandle};

use std::time::Duration;

/// Bounded wait on `GetId` while walking a neighbor's finger table.
pub const FINGER_WALK_TIMEOUT: Duration = Duration::from_millis(100);

/// Bounded wait on an intra-lookup sub-query (`GetId`, `ClosestPrecedingFinger`).
pub const LOOKUP_SUBQUERY_TIMEOUT: Duration = Duration::from_secs(1);

/// Bounded wait at the supervisor for a top-level lookup to resolve.
pub const TOP_LEVEL_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Bounded wait per node during the initialization ack barrier.
pub const INIT_ACK_TIMEOUT: Duration = Duration::from_secs(50);

/// External ceiling on the whole initialization barrier.
pub const INIT_BARRIER_CEILING: Duration = Duration::from_secs(90);

/// External ceiling on a whole simulation run.
pub const SIMULATION_CEILING: Duration = Duration::from_secs(180);

/// Default PRNG seed for the workload driver.
pub const DEFAULT_SEED: u64 = 12345;

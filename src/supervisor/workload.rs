use std::time::Instant;

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::time::timeout;

use crate::ring::{Id, RingConfig};
use crate::supervisor::stats::SimulationStats;
use crate::supervisor::Registry;
use crate::utils::constants::TOP_LEVEL_LOOKUP_TIMEOUT;

/// Drives the random-lookup workload: for every participant, in order,
/// issues `requests_per_node` lookups against a single reproducible PRNG
/// stream. One uniform draw is consumed per lookup regardless of outcome,
/// so re-running with the same `(node_ids, requests_per_node, seed)`
/// reproduces identical statistics.
pub async fn run(
    node_ids: &[Id],
    registry: &Registry,
    requests_per_node: usize,
    seed: u64,
    config: RingConfig,
) -> SimulationStats {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let ring_size = config.ring_size();

    let total_requests = node_ids.len() * requests_per_node;
    let mut successful_lookups = 0usize;
    let mut total_hops = 0u64;

    let started = Instant::now();

    for &start_id in node_ids {
        let Some(start_handle) = registry.get(&start_id) else {
            debug!("workload: missing start node {start_id}, skipping its requests");
            continue;
        };
        for _ in 0..requests_per_node {
            let target = rng.gen_range(0..ring_size) as Id;
            let rx = start_handle.find_successor(target, 0);
            match timeout(TOP_LEVEL_LOOKUP_TIMEOUT, rx).await {
                Ok(Ok(found)) => {
                    successful_lookups += 1;
                    total_hops += found.hops as u64;
                }
                Ok(Err(_)) | Err(_) => {
                    debug!("workload: lookup for target {target} from node {start_id} did not resolve in time");
                }
            }
        }
    }

    SimulationStats {
        total_requests,
        successful_lookups,
        total_hops,
        duration_ms: started.elapsed().as_millis(),
    }
}

//! Property test: for any ring built from randomly chosen participant
//! counts and any target, `FindSuccessor` agrees with the brute-force
//! sorted-id-list oracle — `first_clockwise(target)`.

use std::collections::BTreeMap;
use std::sync::Arc;

use proptest::prelude::*;
use tokio::sync::mpsc;

use chord_ring_sim::node::{spawn_node, NodeHandle};
use chord_ring_sim::ring::{self, Id, RingConfig};
use chord_ring_sim::supervisor::Registry;

const BITS: u32 = 10; // ring_size = 1024, large enough for n up to a few hundred

async fn build_ring(n: usize) -> (Vec<Id>, Registry) {
    let config = RingConfig::new(BITS);
    let ids = ring::generate_ids(n, &config);
    let handles: Vec<NodeHandle> = ids.iter().map(|&id| spawn_node(id, config)).collect();
    let registry: Registry = Arc::new(ids.iter().copied().zip(handles.into_iter()).collect::<BTreeMap<_, _>>());

    let (ack_tx, mut ack_rx) = mpsc::unbounded_channel();
    for handle in registry.values() {
        handle.init_finger_table(registry.clone(), ack_tx.clone());
    }
    drop(ack_tx);
    for _ in 0..n {
        ack_rx.recv().await.unwrap();
    }
    (ids, registry)
}

async fn check_lookup_matches_oracle(n: usize, target: Id, start_idx: usize) -> Result<(), String> {
    let (ids, registry) = build_ring(n).await;
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    let expected = ring::find_successor_in_sorted(target, &sorted);

    let start_id = ids[start_idx % ids.len()];
    let start_handle = registry.get(&start_id).expect("start node must exist in its own registry");
    let rx = start_handle.find_successor(target, 0);
    let found = rx
        .await
        .map_err(|_| "reply channel dropped before a FoundSuccessor was sent".to_string())?;

    if found.id == expected {
        Ok(())
    } else {
        Err(format!(
            "n={n} target={target} start_idx={start_idx}: expected {expected}, got {}",
            found.id
        ))
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn find_successor_matches_first_clockwise_oracle(
        n in 2usize..300,
        target in 0u32..1024,
        start_idx in 0usize..300,
    ) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        if let Err(reason) = runtime.block_on(check_lookup_matches_oracle(n, target, start_idx)) {
            prop_assert!(false, "{reason}");
        }
    }
}

//! Pure modular-arithmetic helpers over the Chord identifier space.
//!
//! The ring is the cyclic group of integers modulo `2^bits`. Everything in
//! this module is a free function with no actor/channel dependency so it
//! can be unit- and property-tested in isolation from the node/supervisor
//! machinery.

use serde::{Deserialize, Serialize};

/// A node or key identifier. `u32` comfortably covers `bits` up to 32;
/// the default configuration (`bits = 16`) only ever produces values in
/// `[0, 65536)`.
pub type Id = u32;

/// The fixed bit-width of the identifier space, and the ring size it implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingConfig {
    pub bits: u32,
}

impl RingConfig {
    pub const DEFAULT_BITS: u32 = 16;

    pub fn new(bits: u32) -> Self {
        RingConfig { bits }
    }

    /// `2^bits`, the number of distinct identifiers on the ring.
    pub fn ring_size(&self) -> u64 {
        1u64 << self.bits
    }

    /// `(v + 2^i) mod ring_size`, the start of the i-th finger interval.
    pub fn finger_start(&self, v: Id, i: u32) -> Id {
        let ring_size = self.ring_size();
        (((v as u64) + pow2(i)) % ring_size) as Id
    }
}

impl Default for RingConfig {
    fn default() -> Self {
        RingConfig::new(Self::DEFAULT_BITS)
    }
}

/// `2^i`, required for `i` up to `m - 1`.
pub fn pow2(i: u32) -> u64 {
    1u64 << i
}

/// True iff `v` lies on the clockwise arc `(s, e]`.
///
/// When `s < e` this is the ordinary half-open interval `s < v <= e`. When
/// `s > e` the arc wraps past the ring's zero point, so membership is
/// `v > s || v <= e`. `s == e` is unspecified by the protocol: a
/// well-formed ring of at least two distinct nodes never calls this with
/// `s == e` because a node's successor is always some other node.
pub fn in_range(v: Id, s: Id, e: Id) -> bool {
    if s < e {
        v > s && v <= e
    } else if s > e {
        v > s || v <= e
    } else {
        false
    }
}

/// True iff `v` lies on the open clockwise arc `(s, e)`, excluding both
/// endpoints. Same wrap handling as [`in_range`].
pub fn in_range_exclusive(v: Id, s: Id, e: Id) -> bool {
    if s < e {
        v > s && v < e
    } else if s > e {
        v > s || v < e
    } else {
        false
    }
}

/// Given `sorted_ids` (ascending, distinct), returns the first id `>=
/// target`, wrapping to the smallest id if none exists.
///
/// Panics if `sorted_ids` is empty; the ring always has at least one
/// participant by construction.
pub fn find_successor_in_sorted(target: Id, sorted_ids: &[Id]) -> Id {
    match sorted_ids.iter().find(|&&id| id >= target) {
        Some(&id) => id,
        None => sorted_ids[0],
    }
}

/// `id_k = floor(k * ring_size / n)` for `k` in `[0, n)` — an even
/// distribution policy, purely a generation convenience and not a Chord
/// requirement.
pub fn generate_ids(n: usize, config: &RingConfig) -> Vec<Id> {
    let ring_size = config.ring_size();
    (0..n as u64)
        .map(|k| ((k * ring_size) / (n as u64)) as Id)
        .collect()
}

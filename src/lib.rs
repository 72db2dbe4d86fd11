//! Single-process Chord ring simulator: builds a ring of N node actors,
//! routes random lookups through their finger tables, and reports hop
//! counts against the log2(N) baseline.

pub mod error;
pub mod node;
pub mod ring;
pub mod supervisor;
pub mod utils;

pub use error::SimError;
pub use ring::{Id, RingConfig};

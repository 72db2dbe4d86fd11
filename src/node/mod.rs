pub mod actor;
pub mod finger_entry;
pub mod finger_table;
pub mod message;

pub use actor::{spawn_node, NodeHandle};

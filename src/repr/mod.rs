//! Runtime representation of the trained ensemble.

mod forest;
mod tree;

pub use forest::{Forest, ForestValidationError};
pub use tree::{MutableTree, Tree, TreeValidationError};

/// Node index within a single tree (0 = root).
pub type NodeId = u32;

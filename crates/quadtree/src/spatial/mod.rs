//! Spatial indexing.
//!
//! Point-region quadtree with capacity-triggered subdivision and eager
//! coalescing of emptied subtrees.

mod iter;
mod node;
mod quadtree;

pub use iter::{NodeInfo, Nodes, Points};
pub use quadtree::{QuadTree, TreeStats, DEFAULT_CAPACITY};

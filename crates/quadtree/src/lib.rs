//! Dynamic 2D point quadtree.
//!
//! An in-memory spatial index over a set of unique points. Leaves hold up to
//! `capacity` points and split into four quadrants when they overflow;
//! internal nodes whose whole subtree empties are collapsed back into a
//! single empty leaf.

pub mod config;
pub mod error;
pub mod spatial;

// Re-export commonly used types
pub use config::TreeConfig;
pub use error::{InvariantViolation, QuadTreeError};
pub use geometry::{Point, Quadrant, Rectangle};
pub use spatial::{NodeInfo, Nodes, Points, QuadTree, TreeStats, DEFAULT_CAPACITY};

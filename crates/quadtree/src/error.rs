//! Quadtree error types.

use geometry::{Point, Rectangle};
use thiserror::Error;

/// Errors returned by quadtree construction and insertion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuadTreeError {
    #[error("{point} is outside the tree bounds {bounds}")]
    OutOfBounds { point: Point, bounds: Rectangle },

    #[error("{point} is outside the node region {region}")]
    OutOfRegion { point: Point, region: Rectangle },

    #[error("Invalid bucket capacity: {0} (must be at least 1)")]
    InvalidCapacity(usize),

    #[error("Invalid tree bounds: {0}")]
    InvalidBounds(Rectangle),
}

/// A broken structural invariant, reported by
/// [`QuadTree::validate_invariants`](crate::QuadTree::validate_invariants).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantViolation {
    #[error("Leaf {region} holds {len} points, capacity is {capacity}")]
    LeafOverCapacity {
        region: Rectangle,
        len: usize,
        capacity: usize,
    },

    #[error("{point} is stored outside its node region {region}")]
    PointOutsideRegion { point: Point, region: Rectangle },

    #[error("{point} is stored more than once")]
    DuplicatePoint { point: Point },

    #[error("Children of {region} do not tile it")]
    ChildrenDoNotTile { region: Rectangle },

    #[error("Internal node {region} has an empty subtree")]
    EmptyInternalNode { region: Rectangle },

    #[error("Cached size {cached} does not match stored point count {actual}")]
    SizeMismatch { cached: usize, actual: usize },
}

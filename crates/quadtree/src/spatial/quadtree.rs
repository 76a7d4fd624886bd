//! QuadTree for spatial indexing.
//!
//! Owns the root [`QuadNode`] and the configuration shared by every node.

use geometry::{Point, Rectangle};
use tracing::debug;

use super::iter::{Nodes, Points};
use super::node::QuadNode;
use crate::config::TreeConfig;
use crate::error::{InvariantViolation, QuadTreeError};

/// Bucket capacity used by [`QuadTree::with_bounds`].
pub const DEFAULT_CAPACITY: usize = 4;

/// Shape statistics of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    /// Depth of the deepest node (a lone root has depth 0).
    pub depth: usize,
    pub node_count: usize,
    pub leaf_count: usize,
}

/// Dynamic point-region quadtree with set semantics.
///
/// Leaves hold at most `capacity` points. Inserting into a full leaf splits
/// it into four quadrants; removing the last point below an internal node
/// collapses it back into an empty leaf.
#[derive(Clone)]
pub struct QuadTree {
    root: QuadNode,
    bounds: Rectangle,
    capacity: usize,
    len: usize,
}

impl QuadTree {
    /// Create an empty tree over `bounds` whose leaves split once they
    /// would exceed `capacity` points.
    pub fn new(bounds: Rectangle, capacity: usize) -> Result<Self, QuadTreeError> {
        if capacity < 1 {
            return Err(QuadTreeError::InvalidCapacity(capacity));
        }
        if !bounds.is_valid() {
            return Err(QuadTreeError::InvalidBounds(bounds));
        }
        debug!(%bounds, capacity, "created quadtree");

        Ok(Self {
            root: QuadNode::new(bounds),
            bounds,
            capacity,
            len: 0,
        })
    }

    /// Create a tree with [`DEFAULT_CAPACITY`].
    pub fn with_bounds(bounds: Rectangle) -> Result<Self, QuadTreeError> {
        Self::new(bounds, DEFAULT_CAPACITY)
    }

    pub fn from_config(config: &TreeConfig) -> Result<Self, QuadTreeError> {
        Self::new(config.bounds, config.capacity)
    }

    #[inline]
    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Insert a point.
    ///
    /// Returns `Ok(true)` if the point was newly added and `Ok(false)` if it
    /// was already stored. Points outside the tree bounds are rejected
    /// without touching the tree.
    pub fn insert(&mut self, point: Point) -> Result<bool, QuadTreeError> {
        if !self.bounds.contains(point) {
            return Err(QuadTreeError::OutOfBounds {
                point,
                bounds: self.bounds,
            });
        }
        let added = self.root.insert(point, self.capacity)?;
        if added {
            self.len += 1;
        }
        Ok(added)
    }

    /// Insert every point in order, stopping at the first one outside the
    /// bounds. Returns how many points were newly added.
    pub fn extend<I>(&mut self, points: I) -> Result<usize, QuadTreeError>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut added = 0;
        for point in points {
            if self.insert(point)? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Remove a point. Returns whether it was present.
    pub fn remove(&mut self, point: Point) -> bool {
        let removed = self.root.remove(point);
        if removed {
            self.len -= 1;
        }
        removed
    }

    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        self.root.contains(point)
    }

    /// Find all stored points inside `range`. Order is unspecified.
    pub fn query(&self, range: &Rectangle) -> Vec<Point> {
        let mut results = Vec::new();
        self.root.query(range, &mut results);
        results
    }

    /// Get the number of stored points.
    #[inline]
    pub fn size(&self) -> usize {
        self.len
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every point and reset to a single empty leaf.
    pub fn clear(&mut self) {
        self.root = QuadNode::new(self.bounds);
        self.len = 0;
        debug!(bounds = %self.bounds, "cleared quadtree");
    }

    /// Iterate over all stored points in pre-order.
    pub fn iter(&self) -> Points<'_> {
        Points::new(&self.root, self.len)
    }

    /// Iterate over all nodes in pre-order.
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes::new(&self.root)
    }

    pub fn stats(&self) -> TreeStats {
        self.nodes().fold(
            TreeStats {
                depth: 0,
                node_count: 0,
                leaf_count: 0,
            },
            |mut stats, node| {
                stats.depth = stats.depth.max(node.depth);
                stats.node_count += 1;
                stats.leaf_count += usize::from(node.is_leaf);
                stats
            },
        )
    }

    /// Verify every structural invariant of the tree.
    pub fn validate_invariants(&self) -> Result<(), InvariantViolation> {
        let actual = self.root.validate(self.capacity)?;
        if actual != self.len {
            return Err(InvariantViolation::SizeMismatch {
                cached: self.len,
                actual,
            });
        }
        debug_assert_eq!(actual, self.root.size());
        Ok(())
    }
}

impl<'a> IntoIterator for &'a QuadTree {
    type Item = Point;
    type IntoIter = Points<'a>;

    fn into_iter(self) -> Points<'a> {
        self.iter()
    }
}

impl std::fmt::Debug for QuadTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuadTree")
            .field("points", &self.len)
            .field("bounds", &self.bounds)
            .field("capacity", &self.capacity)
            .finish()
    }
}

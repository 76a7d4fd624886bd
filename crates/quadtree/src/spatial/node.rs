//! Recursive quadtree node.
//!
//! A node is either a leaf holding a bounded bucket of points or an
//! internal node owning exactly four children that tile its region.

use geometry::{Point, Quadrant, Rectangle};
use tracing::trace;

use crate::error::{InvariantViolation, QuadTreeError};

/// Leaf/internal state of a node.
#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    /// Bucket of at most `capacity` points.
    Leaf(Vec<Point>),
    /// Children in [`Quadrant::ALL`] order.
    Internal(Box<[QuadNode; 4]>),
}

#[derive(Debug, Clone)]
pub(crate) struct QuadNode {
    region: Rectangle,
    kind: NodeKind,
}

impl QuadNode {
    /// Create an empty leaf over `region`.
    pub(crate) fn new(region: Rectangle) -> Self {
        Self {
            region,
            kind: NodeKind::Leaf(Vec::new()),
        }
    }

    #[inline]
    pub(crate) fn region(&self) -> &Rectangle {
        &self.region
    }

    #[inline]
    pub(crate) fn kind(&self) -> &NodeKind {
        &self.kind
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    /// Points held directly by this node. Always empty for internal nodes.
    #[inline]
    pub(crate) fn bucket(&self) -> &[Point] {
        match &self.kind {
            NodeKind::Leaf(bucket) => bucket,
            NodeKind::Internal(_) => &[],
        }
    }

    #[inline]
    fn child_for(&self, p: Point) -> Option<&QuadNode> {
        match &self.kind {
            NodeKind::Leaf(_) => None,
            NodeKind::Internal(children) => Some(&children[Quadrant::of(&self.region, p).index()]),
        }
    }

    /// Insert `p` into this subtree.
    ///
    /// Returns `Ok(false)` if the point is already stored.
    pub(crate) fn insert(&mut self, p: Point, capacity: usize) -> Result<bool, QuadTreeError> {
        if !self.region.contains(p) {
            return Err(QuadTreeError::OutOfRegion {
                point: p,
                region: self.region,
            });
        }
        Ok(self.insert_within(p, capacity, 0))
    }

    /// `p` must lie inside this node's region.
    fn insert_within(&mut self, p: Point, capacity: usize, depth: usize) -> bool {
        let overflow = match &mut self.kind {
            NodeKind::Internal(children) => {
                let child = &mut children[Quadrant::of(&self.region, p).index()];
                return child.insert_within(p, capacity, depth + 1);
            }
            NodeKind::Leaf(bucket) => {
                if bucket.contains(&p) {
                    return false;
                }
                if bucket.len() < capacity {
                    bucket.push(p);
                    return true;
                }
                std::mem::take(bucket)
            }
        };

        self.subdivide(overflow, capacity, depth);
        self.insert_within(p, capacity, depth)
    }

    /// Turn this leaf into an internal node and push `points` down into the
    /// new children.
    fn subdivide(&mut self, points: Vec<Point>, capacity: usize, depth: usize) {
        let mut children = Box::new(self.region.quadrants().map(QuadNode::new));
        for p in points {
            children[Quadrant::of(&self.region, p).index()].insert_within(p, capacity, depth + 1);
        }
        self.kind = NodeKind::Internal(children);
        trace!(depth, region = %self.region, "subdivided leaf");
    }

    /// Remove `p` from this subtree. Returns whether it was present.
    pub(crate) fn remove(&mut self, p: Point) -> bool {
        if !self.region.contains(p) {
            return false;
        }
        self.remove_within(p, 0)
    }

    fn remove_within(&mut self, p: Point, depth: usize) -> bool {
        let removed = match &mut self.kind {
            NodeKind::Leaf(bucket) => match bucket.iter().position(|q| *q == p) {
                Some(idx) => {
                    bucket.swap_remove(idx);
                    true
                }
                None => false,
            },
            NodeKind::Internal(children) => {
                children[Quadrant::of(&self.region, p).index()].remove_within(p, depth + 1)
            }
        };

        if removed {
            self.coalesce(depth);
        }
        removed
    }

    /// Collapse this node into an empty leaf if all four children are empty
    /// leaves.
    fn coalesce(&mut self, depth: usize) {
        let empty = match &self.kind {
            NodeKind::Leaf(_) => false,
            NodeKind::Internal(children) => children
                .iter()
                .all(|c| matches!(&c.kind, NodeKind::Leaf(bucket) if bucket.is_empty())),
        };
        if empty {
            self.kind = NodeKind::Leaf(Vec::new());
            trace!(depth, region = %self.region, "coalesced empty children");
        }
    }

    pub(crate) fn contains(&self, p: Point) -> bool {
        if !self.region.contains(p) {
            return false;
        }
        let mut node = self;
        while let Some(child) = node.child_for(p) {
            node = child;
        }
        node.bucket().contains(&p)
    }

    /// Append every stored point inside `range` to `results`.
    pub(crate) fn query(&self, range: &Rectangle, results: &mut Vec<Point>) {
        if !self.region.intersects(range) {
            return;
        }
        if range.covers(&self.region) {
            self.collect_all(results);
            return;
        }
        match &self.kind {
            NodeKind::Leaf(bucket) => {
                results.extend(bucket.iter().copied().filter(|p| range.contains(*p)));
            }
            NodeKind::Internal(children) => {
                for child in children.iter() {
                    child.query(range, results);
                }
            }
        }
    }

    fn collect_all(&self, results: &mut Vec<Point>) {
        match &self.kind {
            NodeKind::Leaf(bucket) => results.extend_from_slice(bucket),
            NodeKind::Internal(children) => {
                for child in children.iter() {
                    child.collect_all(results);
                }
            }
        }
    }

    /// Number of points stored in this subtree.
    pub(crate) fn size(&self) -> usize {
        let mut total = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match &node.kind {
                NodeKind::Leaf(bucket) => total += bucket.len(),
                NodeKind::Internal(children) => stack.extend(children.iter()),
            }
        }
        total
    }

    /// Check the structural invariants of this subtree and return its point
    /// count.
    ///
    /// Walks an explicit stack: a tree over a huge region can legitimately
    /// be thousands of levels deep.
    pub(crate) fn validate(&self, capacity: usize) -> Result<usize, InvariantViolation> {
        // (node, children already visited)
        let mut stack = vec![(self, false)];
        // Subtree point counts, consumed four at a time by their parent.
        let mut totals: Vec<usize> = Vec::new();

        while let Some((node, visited)) = stack.pop() {
            match &node.kind {
                NodeKind::Leaf(bucket) => {
                    node.validate_leaf(bucket, capacity)?;
                    totals.push(bucket.len());
                }
                NodeKind::Internal(_) if visited => {
                    let total: usize = totals.drain(totals.len() - 4..).sum();
                    if total == 0 {
                        return Err(InvariantViolation::EmptyInternalNode {
                            region: node.region,
                        });
                    }
                    totals.push(total);
                }
                NodeKind::Internal(children) => {
                    let expected = node.region.quadrants();
                    if children.iter().zip(expected.iter()).any(|(c, r)| c.region != *r) {
                        return Err(InvariantViolation::ChildrenDoNotTile {
                            region: node.region,
                        });
                    }
                    stack.push((node, true));
                    stack.extend(children.iter().map(|c| (c, false)));
                }
            }
        }

        Ok(totals.pop().unwrap_or(0))
    }

    fn validate_leaf(&self, bucket: &[Point], capacity: usize) -> Result<(), InvariantViolation> {
        if bucket.len() > capacity {
            return Err(InvariantViolation::LeafOverCapacity {
                region: self.region,
                len: bucket.len(),
                capacity,
            });
        }
        for (i, &point) in bucket.iter().enumerate() {
            if !self.region.contains(point) {
                return Err(InvariantViolation::PointOutsideRegion {
                    point,
                    region: self.region,
                });
            }
            // Leaf regions are disjoint, so duplicates can only share a
            // bucket.
            if bucket[i + 1..].contains(&point) {
                return Err(InvariantViolation::DuplicatePoint { point });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> Rectangle {
        Rectangle::new(0.0, 0.0, 100.0, 100.0)
    }

    fn children(node: &QuadNode) -> &[QuadNode; 4] {
        match node.kind() {
            NodeKind::Internal(children) => children,
            NodeKind::Leaf(_) => panic!("expected internal node"),
        }
    }

    #[test]
    fn test_insert_outside_region() {
        let mut node = QuadNode::new(region());
        let err = node.insert(Point::new(100.0, 1.0), 4).unwrap_err();
        assert!(matches!(err, QuadTreeError::OutOfRegion { .. }));
        assert_eq!(node.size(), 0);
    }

    #[test]
    fn test_duplicate_insert_is_noop() {
        let mut node = QuadNode::new(region());
        assert!(node.insert(Point::new(1.0, 1.0), 4).unwrap());
        assert!(!node.insert(Point::new(1.0, 1.0), 4).unwrap());
        assert_eq!(node.size(), 1);
    }

    #[test]
    fn test_overflow_subdivides() {
        let mut node = QuadNode::new(region());
        for p in [(10.0, 10.0), (60.0, 10.0), (10.0, 60.0)] {
            node.insert(Point::from(p), 2).unwrap();
        }
        assert!(!node.is_leaf());
        assert!(node.bucket().is_empty());

        let [nw, ne, sw, se] = children(&node);
        assert_eq!(nw.bucket(), &[Point::new(10.0, 60.0)]);
        assert!(ne.bucket().is_empty());
        assert_eq!(sw.bucket(), &[Point::new(10.0, 10.0)]);
        assert_eq!(se.bucket(), &[Point::new(60.0, 10.0)]);
        assert_eq!(node.validate(2), Ok(3));
    }

    #[test]
    fn test_clustered_overflow_cascades() {
        // All points in the south-west corner force several levels of split.
        let mut node = QuadNode::new(region());
        for i in 0..5 {
            node.insert(Point::new(i as f64 * 0.1, 0.0), 1).unwrap();
        }
        assert_eq!(node.size(), 5);
        assert_eq!(node.validate(1), Ok(5));
        assert!(!children(&node)[Quadrant::SouthWest.index()].is_leaf());
    }

    #[test]
    fn test_duplicate_detected_after_subdivision() {
        let mut node = QuadNode::new(region());
        for p in [(1.0, 1.0), (99.0, 99.0), (1.0, 99.0)] {
            node.insert(Point::from(p), 1).unwrap();
        }
        assert!(!node.insert(Point::new(99.0, 99.0), 1).unwrap());
        assert_eq!(node.size(), 3);
    }

    #[test]
    fn test_remove_coalesces_bottom_up() {
        let mut node = QuadNode::new(region());
        let points = [(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)];
        for p in points {
            node.insert(Point::from(p), 1).unwrap();
        }
        assert!(!node.is_leaf());

        assert!(node.remove(Point::new(2.0, 2.0)));
        assert!(node.remove(Point::new(1.0, 1.0)));
        assert!(!node.is_leaf());
        assert!(node.remove(Point::new(3.0, 3.0)));
        assert!(node.is_leaf());
        assert!(node.bucket().is_empty());
    }

    #[test]
    fn test_remove_missing_leaves_structure() {
        let mut node = QuadNode::new(region());
        node.insert(Point::new(5.0, 5.0), 4).unwrap();
        assert!(!node.remove(Point::new(6.0, 6.0)));
        assert!(!node.remove(Point::new(500.0, 5.0)));
        assert!(node.contains(Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_query_filters_leaf_points() {
        let mut node = QuadNode::new(region());
        for p in [(1.0, 1.0), (50.0, 50.0), (90.0, 90.0)] {
            node.insert(Point::from(p), 4).unwrap();
        }
        let mut results = Vec::new();
        node.query(&Rectangle::new(0.0, 0.0, 10.0, 10.0), &mut results);
        assert_eq!(results, vec![Point::new(1.0, 1.0)]);
    }

    #[test]
    fn test_validate_reports_empty_internal() {
        let mut node = QuadNode::new(region());
        node.kind = NodeKind::Internal(Box::new(region().quadrants().map(QuadNode::new)));
        assert!(matches!(
            node.validate(4),
            Err(InvariantViolation::EmptyInternalNode { .. })
        ));
    }

    #[test]
    fn test_validate_reports_misplaced_point() {
        let mut node = QuadNode::new(Rectangle::new(0.0, 0.0, 10.0, 10.0));
        node.kind = NodeKind::Leaf(vec![Point::new(20.0, 20.0)]);
        assert!(matches!(
            node.validate(4),
            Err(InvariantViolation::PointOutsideRegion { .. })
        ));
    }
}

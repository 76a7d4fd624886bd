//! Pre-order traversal over nodes and stored points.

use std::fmt;

use geometry::{Point, Rectangle};

use super::node::{NodeKind, QuadNode};

/// Read-only snapshot of one node, yielded by [`QuadTree::nodes`](super::QuadTree::nodes).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeInfo {
    /// Region covered by the node.
    pub region: Rectangle,
    /// Distance from the root (the root is at depth 0).
    pub depth: usize,
    /// Whether the node is a leaf.
    pub is_leaf: bool,
    /// Points held directly by the node. Zero for internal nodes.
    pub point_count: usize,
}

/// One dump line: `POLYGON((...));count;is_leaf`.
impl fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{};{}", self.region, self.point_count, self.is_leaf)
    }
}

/// Pre-order node iterator. Children are visited in
/// [`Quadrant::ALL`](geometry::Quadrant::ALL) order.
#[derive(Debug, Clone)]
pub struct Nodes<'a> {
    stack: Vec<(&'a QuadNode, usize)>,
}

impl<'a> Nodes<'a> {
    pub(crate) fn new(root: &'a QuadNode) -> Self {
        Self {
            stack: vec![(root, 0)],
        }
    }
}

impl<'a> Iterator for Nodes<'a> {
    type Item = NodeInfo;

    fn next(&mut self) -> Option<NodeInfo> {
        let (node, depth) = self.stack.pop()?;
        if let NodeKind::Internal(children) = node.kind() {
            self.stack.extend(children.iter().rev().map(|c| (c, depth + 1)));
        }
        Some(NodeInfo {
            region: *node.region(),
            depth,
            is_leaf: node.is_leaf(),
            point_count: node.bucket().len(),
        })
    }
}

/// Iterator over every stored point, leaf by leaf in pre-order.
#[derive(Debug, Clone)]
pub struct Points<'a> {
    stack: Vec<&'a QuadNode>,
    bucket: std::slice::Iter<'a, Point>,
    remaining: usize,
}

impl<'a> Points<'a> {
    pub(crate) fn new(root: &'a QuadNode, len: usize) -> Self {
        Self {
            stack: vec![root],
            bucket: Default::default(),
            remaining: len,
        }
    }
}

impl<'a> Iterator for Points<'a> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        loop {
            if let Some(&p) = self.bucket.next() {
                self.remaining = self.remaining.saturating_sub(1);
                return Some(p);
            }
            let node = self.stack.pop()?;
            match node.kind() {
                NodeKind::Leaf(bucket) => self.bucket = bucket.iter(),
                NodeKind::Internal(children) => self.stack.extend(children.iter().rev()),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Points<'_> {}

//! Tree configuration.

use geometry::Rectangle;
use serde::{Deserialize, Serialize};

use crate::spatial::DEFAULT_CAPACITY;

/// Construction parameters for a [`QuadTree`](crate::QuadTree).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TreeConfig {
    /// Fixed region covered by the root node.
    #[serde(default = "default_bounds")]
    pub bounds: Rectangle,
    /// Maximum points a leaf holds before it subdivides.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            bounds: default_bounds(),
            capacity: default_capacity(),
        }
    }
}

fn default_bounds() -> Rectangle {
    Rectangle::new(0.0, 0.0, 100.0, 100.0)
}
fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

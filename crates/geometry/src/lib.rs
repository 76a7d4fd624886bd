//! Geometry primitives shared by the quadtree crates.
//!
//! This crate contains:
//! - `Point`, an exact-equality 2D coordinate
//! - `Rectangle`, a half-open axis-aligned region
//! - `Quadrant`, the four-way split used by the tree

mod point;
mod rect;

pub use point::Point;
pub use rect::{Quadrant, Rectangle};

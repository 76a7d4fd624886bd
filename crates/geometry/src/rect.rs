//! Axis-aligned rectangles and quadrant partitioning.

use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::Point;

/// Axis-aligned region.
///
/// Containment is half-open: the minimum edges belong to the rectangle, the
/// maximum edges do not. This makes the four quadrants of a rectangle an
/// exact partition with no shared boundary.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rectangle {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

/// One of the four sub-regions of a rectangle split at its center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl Quadrant {
    /// All quadrants, in child storage order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthWest,
        Quadrant::NorthEast,
        Quadrant::SouthWest,
        Quadrant::SouthEast,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Quadrant::NorthWest => 0,
            Quadrant::NorthEast => 1,
            Quadrant::SouthWest => 2,
            Quadrant::SouthEast => 3,
        }
    }

    /// Select the quadrant of `region` that holds `p`.
    ///
    /// Points on the vertical split line go east, points on the horizontal
    /// split line go north. `p` is assumed to lie inside `region`.
    #[inline]
    pub fn of(region: &Rectangle, p: Point) -> Self {
        let mid = region.center();
        let east = p.x >= mid.x;
        let north = p.y >= mid.y;
        match (north, east) {
            (true, false) => Quadrant::NorthWest,
            (true, true) => Quadrant::NorthEast,
            (false, false) => Quadrant::SouthWest,
            (false, true) => Quadrant::SouthEast,
        }
    }
}

impl Rectangle {
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    #[inline]
    pub fn min(&self) -> DVec2 {
        DVec2::new(self.min_x, self.min_y)
    }

    #[inline]
    pub fn max(&self) -> DVec2 {
        DVec2::new(self.max_x, self.max_y)
    }

    /// Center of the rectangle. Halving each corner first keeps the result
    /// finite for any finite rectangle.
    #[inline]
    pub fn center(&self) -> DVec2 {
        self.min() * 0.5 + self.max() * 0.5
    }

    /// Get the width of the rectangle.
    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Get the height of the rectangle.
    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Returns `true` if all edges are finite and the region is non-empty on
    /// both axes.
    pub fn is_valid(&self) -> bool {
        Point::new(self.min_x, self.min_y).is_finite()
            && Point::new(self.max_x, self.max_y).is_finite()
            && self.min_x < self.max_x
            && self.min_y < self.max_y
    }

    /// Half-open point containment.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.min_x <= p.x && p.x < self.max_x && self.min_y <= p.y && p.y < self.max_y
    }

    /// Check if two rectangles overlap on both axes.
    #[inline]
    pub fn intersects(&self, other: &Rectangle) -> bool {
        !(other.min_x >= self.max_x
            || other.max_x <= self.min_x
            || other.min_y >= self.max_y
            || other.max_y <= self.min_y)
    }

    /// Returns `true` if every point contained by `other` is also contained
    /// by `self`.
    #[inline]
    pub fn covers(&self, other: &Rectangle) -> bool {
        self.min_x <= other.min_x
            && other.max_x <= self.max_x
            && self.min_y <= other.min_y
            && other.max_y <= self.max_y
    }

    /// Sub-rectangle for one quadrant, split at the center.
    pub fn quadrant(&self, which: Quadrant) -> Rectangle {
        let mid = self.center();
        match which {
            Quadrant::NorthWest => Rectangle::new(self.min_x, mid.y, mid.x, self.max_y),
            Quadrant::NorthEast => Rectangle::new(mid.x, mid.y, self.max_x, self.max_y),
            Quadrant::SouthWest => Rectangle::new(self.min_x, self.min_y, mid.x, mid.y),
            Quadrant::SouthEast => Rectangle::new(mid.x, self.min_y, self.max_x, mid.y),
        }
    }

    /// All four quadrants in [`Quadrant::ALL`] order.
    pub fn quadrants(&self) -> [Rectangle; 4] {
        Quadrant::ALL.map(|q| self.quadrant(q))
    }
}

/// WKT rendering as a closed ring, e.g.
/// `POLYGON((0 0, 10 0, 10 10, 0 10, 0 0))`.
impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x0, y0, x1, y1) = (self.min_x, self.min_y, self.max_x, self.max_y);
        write!(
            f,
            "POLYGON(({x0} {y0}, {x1} {y0}, {x1} {y1}, {x0} {y1}, {x0} {y0}))"
        )
    }
}

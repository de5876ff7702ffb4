//! Map Geometry
//!
//! Grid points, unit steps, and the tile-step distance used everywhere in the
//! ruleset.
//!
//! # Example
//!
//! ```
//! use empire_types::Point;
//!
//! let a = Point::new(3, 4);
//! let b = Point::new(6, 5);
//! assert_eq!(a.distance(b), 3);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Relative offsets of the eight neighbours of a tile.
///
/// This is the canonical enumeration order: row by row from the top
/// (dy = -1) to the bottom (dy = 1), left to right inside a row, skipping the
/// centre. Every neighbour scan in the workspace uses this order so that
/// first-found tie-breaking is reproducible.
pub const NEIGHBOR_OFFSETS: [Delta; 8] = [
    Delta::new(-1, -1),
    Delta::new(0, -1),
    Delta::new(1, -1),
    Delta::new(-1, 0),
    Delta::new(1, 0),
    Delta::new(-1, 1),
    Delta::new(0, 1),
    Delta::new(1, 1),
];

/// A tile position on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Tile-step (Chebyshev) distance: the number of single-tile moves
    /// needed to walk from `self` to `other` on an open map.
    pub fn distance(self, other: Point) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        dx.max(dy)
    }

    /// Returns the point shifted by `delta`.
    pub fn offset(self, delta: Delta) -> Point {
        Point::new(self.x + delta.dx, self.y + delta.dy)
    }

    /// Iterates the eight neighbours in canonical order.
    pub fn neighbors(self) -> impl Iterator<Item = Point> {
        NEIGHBOR_OFFSETS.into_iter().map(move |d| self.offset(d))
    }

    /// Returns true if `other` lies inside the square of the given radius
    /// centred on `self` (inclusive bounding box).
    pub fn within_box(self, other: Point, radius: u32) -> bool {
        let r = radius as i32;
        other.x >= self.x - r
            && other.x <= self.x + r
            && other.y >= self.y - r
            && other.y <= self.y + r
    }

    /// Single-step delta pointing from `self` towards `target`, each axis
    /// clamped to {-1, 0, 1}.
    pub fn step_towards(self, target: Point) -> Delta {
        Delta::new((target.x - self.x).signum(), (target.y - self.y).signum())
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A relative move on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Delta {
    pub dx: i32,
    pub dy: i32,
}

impl Delta {
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    pub fn is_zero(self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    /// True for a move to one of the eight adjacent tiles.
    pub fn is_single_step(self) -> bool {
        !self.is_zero() && self.dx.abs() <= 1 && self.dy.abs() <= 1
    }
}

impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:+}, {:+}]", self.dx, self.dy)
    }
}

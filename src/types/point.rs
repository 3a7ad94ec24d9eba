//! Point type for blueprint strokes

use serde::{Deserialize, Serialize};

/// A single point of a blueprint stroke, in device pixel coordinates.
///
/// Points are immutable once appended to a blueprint; equality is
/// structural (`x` and `y` equal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a new point
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

//! Two-component vectors used for offsets, sizes and parallax factors.

use std::fmt;

use serde::Serialize;

/// A pair of values along the x and y axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Vector2<T> {
    pub x: T,
    pub y: T,
}

impl<T> Vector2<T> {
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl<T: fmt::Display> fmt::Display for Vector2<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.x, self.y)
    }
}

pub type Vector2i = Vector2<i32>;
pub type Vector2u = Vector2<u32>;
pub type Vector2f = Vector2<f32>;

impl Vector2u {
    /// Number of cells in a grid of this size, saturating at `usize::MAX`.
    pub fn area(self) -> usize {
        (self.x as usize).saturating_mul(self.y as usize)
    }
}

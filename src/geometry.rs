//! Structures used to map areas on the screen

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Narrow `value` to the width of a protocol field
fn narrow<T: TryFrom<i64>>(what: &'static str, value: impl Into<i64>) -> Result<T> {
    let value = value.into();
    T::try_from(value).map_err(|_| Error::OutOfRange { what, value })
}

// =============================== Point ==============================
// ====================================================================

/// Wrapper for [`Point`](x11rb::protocol::xproto::Point). When this is used
/// with a [`Rectangle`], it represents the top-left corner
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Point {
    /// X-coordinate
    pub x: i32,
    /// Y-coordinate
    pub y: i32,
}

impl Point {
    /// Create a new [`Point`]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Return the `x` and `y` coordinates as a tuple
    pub const fn as_tuple(self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// The coordinates as the 16-bit values requests carry
    pub fn to_x11(self) -> Result<(i16, i16)> {
        Ok((narrow("x-coordinate", self.x)?, narrow("y-coordinate", self.y)?))
    }

    /// Check if [`Point`] is `(0, 0)`
    pub const fn is_zero(self) -> bool {
        self.x == 0_i32 && self.y == 0_i32
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "x: {}, y: {}", self.x, self.y)
    }
}

// ============================= Dimension ===========================
// ====================================================================

/// A `width` and a `height`. The area of a [`Rectangle`]
#[derive(
    Debug, Default, Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct Dimension {
    /// The width of the [`Rectangle`]
    pub width:  u32,
    /// The height of the [`Rectangle`]
    pub height: u32,
}

impl Dimension {
    /// Create a new [`Dimension`]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Return the `width` and `height` as a tuple
    pub const fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The sides as the 16-bit values requests carry
    pub fn to_x11(self) -> Result<(u16, u16)> {
        Ok((narrow("width", self.width)?, narrow("height", self.height)?))
    }

    /// Check if either side of the [`Dimension`] is zero
    pub const fn is_zero(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// ============================= Rectangle ============================
// ====================================================================

/// Equivalent to `xcb_rectangle_t`
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Rectangle {
    /// Represents the top-left corner of the rectangle
    pub point:     Point,
    /// The width and height of the rectangle
    pub dimension: Dimension,
}

impl Rectangle {
    /// Create a new [`Rectangle`]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            point:     Point::new(x, y),
            dimension: Dimension::new(width, height),
        }
    }

    /// Check if the [`Rectangle`] covers no area
    pub const fn is_zero(&self) -> bool {
        self.dimension.is_zero()
    }

    /// Return the area of the [`Rectangle`]
    pub const fn area(&self) -> u64 {
        self.dimension.width as u64 * self.dimension.height as u64
    }

    /// Check whether the [`Point`] lies within the [`Rectangle`]
    pub const fn is_inside(&self, point: Point) -> bool {
        point.x >= self.point.x
            && point.y >= self.point.y
            && (point.x as i64) < self.point.x as i64 + self.dimension.width as i64
            && (point.y as i64) < self.point.y as i64 + self.dimension.height as i64
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}+{}+{}", self.dimension, self.point.x, self.point.y)
    }
}

//! Geometric primitives for diagram layout.
//!
//! This module provides the value types every layout phase works with:
//!
//! - [`Point`] - A 2D coordinate in diagram space
//! - [`Dimensions`] - Width and height, clamped at zero when shrunk
//! - [`Rectangle`] - An axis-aligned box given by its top-left corner and dimensions
//! - [`Direction`] / [`DirectionTriple`] - Segment directions of a routed connector
//! - [`Connector`] - A three-segment polyline between two anchor points
//!
//! # Coordinate System
//!
//! Tessera uses the same coordinate system as SVG and most drawing backends:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! All coordinates are `f64` pixels.

mod connector;
mod direction;
mod rectangle;

pub use connector::Connector;
pub use direction::{Direction, DirectionTriple};
pub use rectangle::Rectangle;

/// Tolerance used when comparing derived coordinates.
pub const EPSILON: f64 = 1e-9;

/// A 2D point in diagram coordinate space.
///
/// # Examples
///
/// ```
/// # use tessera_core::geometry::Point;
/// let a = Point::new(10.0, 20.0);
/// let b = Point::new(14.0, 23.0);
/// assert_eq!(a.manhattan_distance(b), 7.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f64 {
        self.y
    }

    /// Returns this point moved by `dx` and `dy`
    pub fn shift(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Sum of the absolute coordinate differences to `other`
    pub fn manhattan_distance(self, other: Point) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Checks whether both coordinates equal those of `other` within [`EPSILON`]
    pub fn is_close_to(self, other: Point) -> bool {
        (self.x - other.x).abs() < EPSILON && (self.y - other.y).abs() < EPSILON
    }
}

/// Width and height of an element.
///
/// Growing and shrinking never produces negative extents: shrinking below zero
/// clamps the affected extent at zero.
///
/// # Examples
///
/// ```
/// # use tessera_core::geometry::Dimensions;
/// let mut dims = Dimensions::new(40.0, 10.0);
/// dims.shrink(50.0, 4.0);
/// assert_eq!(dims.width(), 0.0);
/// assert_eq!(dims.height(), 6.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Dimensions {
    width: f64,
    height: f64,
}

impl Dimensions {
    /// Creates new dimensions; negative inputs are clamped to zero.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Returns the width
    pub fn width(self) -> f64 {
        self.width
    }

    /// Returns the height
    pub fn height(self) -> f64 {
        self.height
    }

    /// Returns `width * height`
    pub fn area(self) -> f64 {
        self.width * self.height
    }

    /// Returns true if either extent is zero
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Grows both extents; negative deltas shrink with clamping at zero.
    pub fn expand(&mut self, delta_width: f64, delta_height: f64) {
        self.width = (self.width + delta_width).max(0.0);
        self.height = (self.height + delta_height).max(0.0);
    }

    /// Shrinks both extents, clamping at zero.
    pub fn shrink(&mut self, delta_width: f64, delta_height: f64) {
        self.expand(-delta_width, -delta_height);
    }

    /// Returns the component-wise maximum of `self` and `other`
    pub fn max(self, other: Dimensions) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    /// Stacks `other` below `self`: heights add, the wider width wins.
    pub fn stack_vertical(self, other: Dimensions) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height + other.height,
        }
    }

    /// Returns the extent along the chosen axis
    pub fn extent(self, horizontal: bool) -> f64 {
        if horizontal { self.width } else { self.height }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_point_shift_and_distance() {
        let p = Point::new(1.0, 2.0).shift(3.0, -4.0);
        assert_eq!(p, Point::new(4.0, -2.0));
        assert_approx_eq!(f64, p.manhattan_distance(Point::default()), 6.0);
    }

    #[test]
    fn test_point_is_close_to() {
        assert!(Point::new(1.0, 1.0).is_close_to(Point::new(1.0 + 1e-12, 1.0)));
        assert!(!Point::new(1.0, 1.0).is_close_to(Point::new(1.1, 1.0)));
    }

    #[test]
    fn test_dimensions_new_clamps_negative() {
        let dims = Dimensions::new(-5.0, 3.0);
        assert_eq!(dims.width(), 0.0);
        assert_eq!(dims.height(), 3.0);
        assert!(dims.is_empty());
    }

    #[test]
    fn test_dimensions_expand_and_shrink() {
        let mut dims = Dimensions::new(10.0, 20.0);
        dims.expand(5.0, 5.0);
        assert_eq!(dims, Dimensions::new(15.0, 25.0));

        dims.shrink(20.0, 5.0);
        assert_eq!(dims.width(), 0.0);
        assert_eq!(dims.height(), 20.0);
    }

    #[test]
    fn test_dimensions_max_and_stack() {
        let a = Dimensions::new(10.0, 5.0);
        let b = Dimensions::new(4.0, 8.0);
        assert_eq!(a.max(b), Dimensions::new(10.0, 8.0));
        assert_eq!(a.stack_vertical(b), Dimensions::new(10.0, 13.0));
        assert_approx_eq!(f64, a.area(), 50.0);
        assert_eq!(a.extent(true), 10.0);
        assert_eq!(a.extent(false), 5.0);
    }
}

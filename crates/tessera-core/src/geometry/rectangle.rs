use super::{Dimensions, EPSILON, Point};

/// An axis-aligned rectangle given by its top-left corner and its dimensions.
///
/// A rectangle with zero width or height is *empty*: it occupies no area, never
/// intersects anything and is what [`Rectangle::intersection`] returns for disjoint
/// inputs. Empty rectangles still carry a position so that zero-size boxes (the inner
/// space of an icon-shaped classifier, for example) remain anchored.
///
/// # Examples
///
/// ```
/// # use tessera_core::geometry::Rectangle;
/// let a = Rectangle::new(0.0, 0.0, 100.0, 50.0);
/// let b = Rectangle::new(80.0, 40.0, 40.0, 40.0);
///
/// assert_eq!(a.right(), 100.0);
/// assert_eq!(a.intersect_area(&b), 200.0);
/// assert_eq!(a.bounding(&b), Rectangle::new(0.0, 0.0, 120.0, 80.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rectangle {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl Rectangle {
    /// Creates a rectangle; negative extents are clamped to zero.
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Creates a rectangle of the given dimensions centered on `center`
    pub fn from_center(center: Point, dimensions: Dimensions) -> Self {
        Self::new(
            center.x() - dimensions.width() / 2.0,
            center.y() - dimensions.height() / 2.0,
            dimensions.width(),
            dimensions.height(),
        )
    }

    /// Creates the rectangle spanned by two corner points given in any order
    pub fn from_corners(a: Point, b: Point) -> Self {
        let left = a.x().min(b.x());
        let top = a.y().min(b.y());
        Self::new(
            left,
            top,
            a.x().max(b.x()) - left,
            a.y().max(b.y()) - top,
        )
    }

    /// Returns the left edge
    pub fn left(&self) -> f64 {
        self.left
    }

    /// Returns the top edge
    pub fn top(&self) -> f64 {
        self.top
    }

    /// Returns the right edge
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Returns the bottom edge
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }

    /// Returns the center point
    pub fn center(&self) -> Point {
        Point::new(self.center_x(), self.center_y())
    }

    /// Returns width and height as [`Dimensions`]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Returns true if the rectangle occupies no area
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Returns the extent along the chosen axis
    pub fn extent(&self, horizontal: bool) -> f64 {
        if horizontal { self.width } else { self.height }
    }

    /// Returns the leading edge (left or top) along the chosen axis
    pub fn start(&self, horizontal: bool) -> f64 {
        if horizontal { self.left } else { self.top }
    }

    /// Checks if the point lies inside or on the border of the rectangle
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }

    /// Checks if `other` lies completely inside this rectangle (borders may touch).
    ///
    /// An empty `other` is contained if its anchor point is.
    pub fn contains(&self, other: &Rectangle) -> bool {
        other.left >= self.left - EPSILON
            && other.top >= self.top - EPSILON
            && other.right() <= self.right() + EPSILON
            && other.bottom() <= self.bottom() + EPSILON
    }

    /// Checks if both rectangles share a region of positive area
    pub fn is_intersecting(&self, other: &Rectangle) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }

    /// Returns the shared region, or an empty rectangle if there is none
    pub fn intersection(&self, other: &Rectangle) -> Rectangle {
        if !self.is_intersecting(other) {
            return Rectangle::default();
        }
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        Rectangle::new(
            left,
            top,
            self.right().min(other.right()) - left,
            self.bottom().min(other.bottom()) - top,
        )
    }

    /// Returns the area of the shared region
    pub fn intersect_area(&self, other: &Rectangle) -> f64 {
        self.intersection(other).area()
    }

    /// Returns the part of this rectangle's area that lies outside `frame`
    pub fn area_outside(&self, frame: &Rectangle) -> f64 {
        (self.area() - self.intersect_area(frame)).max(0.0)
    }

    /// Returns the smallest rectangle containing both rectangles.
    ///
    /// Empty rectangles are ignored unless both are empty.
    pub fn bounding(&self, other: &Rectangle) -> Rectangle {
        if other.is_empty() && !self.is_empty() {
            return *self;
        }
        if self.is_empty() && !other.is_empty() {
            return *other;
        }
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        Rectangle::new(
            left,
            top,
            self.right().max(other.right()) - left,
            self.bottom().max(other.bottom()) - top,
        )
    }

    /// Grows this rectangle in place so that it also covers `other`
    pub fn embrace(&mut self, other: &Rectangle) {
        *self = self.bounding(other);
    }

    /// Returns this rectangle moved by `dx` and `dy`
    pub fn shifted(&self, dx: f64, dy: f64) -> Rectangle {
        Rectangle {
            left: self.left + dx,
            top: self.top + dy,
            ..*self
        }
    }

    /// Moves this rectangle in place
    pub fn shift(&mut self, dx: f64, dy: f64) {
        self.left += dx;
        self.top += dy;
    }

    /// Returns this rectangle grown by `dx` on the left and right and by `dy` on the
    /// top and bottom; negative values shrink it, clamping at zero around the center.
    pub fn expanded(&self, dx: f64, dy: f64) -> Rectangle {
        let width = self.width + 2.0 * dx;
        let height = self.height + 2.0 * dy;
        let (left, width) = if width < 0.0 {
            (self.center_x(), 0.0)
        } else {
            (self.left - dx, width)
        };
        let (top, height) = if height < 0.0 {
            (self.center_y(), 0.0)
        } else {
            (self.top - dy, height)
        };
        Rectangle::new(left, top, width, height)
    }

    /// Returns the same rectangle with a new left edge, keeping the right edge
    pub fn with_left(&self, left: f64) -> Rectangle {
        Rectangle::new(left, self.top, self.right() - left, self.height)
    }

    /// Returns the same rectangle with a new top edge, keeping the bottom edge
    pub fn with_top(&self, top: f64) -> Rectangle {
        Rectangle::new(self.left, top, self.width, self.bottom() - top)
    }

    /// Returns the same rectangle with a new right edge, keeping the left edge
    pub fn with_right(&self, right: f64) -> Rectangle {
        Rectangle::new(self.left, self.top, right - self.left, self.height)
    }

    /// Returns the same rectangle with a new bottom edge, keeping the top edge
    pub fn with_bottom(&self, bottom: f64) -> Rectangle {
        Rectangle::new(self.left, self.top, self.width, bottom - self.top)
    }

    /// Returns the offset that moves this rectangle into `frame` with minimal travel.
    ///
    /// Along an axis where this rectangle is larger than the frame, the leading edges
    /// are aligned.
    pub fn offset_into(&self, frame: &Rectangle) -> (f64, f64) {
        fn axis(start: f64, extent: f64, frame_start: f64, frame_extent: f64) -> f64 {
            if extent >= frame_extent || start < frame_start {
                frame_start - start
            } else if start + extent > frame_start + frame_extent {
                frame_start + frame_extent - (start + extent)
            } else {
                0.0
            }
        }
        (
            axis(self.left, self.width, frame.left, frame.width),
            axis(self.top, self.height, frame.top, frame.height),
        )
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_rectangle_accessors() {
        let rect = Rectangle::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.right(), 40.0);
        assert_eq!(rect.bottom(), 60.0);
        assert_eq!(rect.center(), Point::new(25.0, 40.0));
        assert_approx_eq!(f64, rect.area(), 1200.0);
        assert_eq!(rect.dimensions(), Dimensions::new(30.0, 40.0));
    }

    #[test]
    fn test_rectangle_from_center_and_corners() {
        let rect = Rectangle::from_center(Point::new(50.0, 50.0), Dimensions::new(20.0, 10.0));
        assert_eq!(rect, Rectangle::new(40.0, 45.0, 20.0, 10.0));

        let rect = Rectangle::from_corners(Point::new(5.0, 9.0), Point::new(1.0, 2.0));
        assert_eq!(rect, Rectangle::new(1.0, 2.0, 4.0, 7.0));
    }

    #[test]
    fn test_rectangle_touching_edges_do_not_intersect() {
        let a = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        let b = Rectangle::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.is_intersecting(&b));
        assert!(a.intersection(&b).is_empty());
        assert_eq!(a.intersect_area(&b), 0.0);
    }

    #[test]
    fn test_rectangle_intersection() {
        let a = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        let b = Rectangle::new(5.0, 6.0, 10.0, 10.0);
        assert_eq!(a.intersection(&b), Rectangle::new(5.0, 6.0, 5.0, 4.0));
        assert_approx_eq!(f64, a.intersect_area(&b), 20.0);
    }

    #[test]
    fn test_rectangle_contains() {
        let outer = Rectangle::new(0.0, 0.0, 100.0, 100.0);
        assert!(outer.contains(&Rectangle::new(0.0, 0.0, 100.0, 100.0)));
        assert!(outer.contains(&Rectangle::new(10.0, 10.0, 0.0, 0.0)));
        assert!(!outer.contains(&Rectangle::new(90.0, 10.0, 20.0, 10.0)));
        assert!(outer.contains_point(100.0, 0.0));
        assert!(!outer.contains_point(100.5, 0.0));
    }

    #[test]
    fn test_rectangle_area_outside() {
        let frame = Rectangle::new(0.0, 0.0, 100.0, 100.0);
        let rect = Rectangle::new(90.0, 0.0, 20.0, 10.0);
        assert_approx_eq!(f64, rect.area_outside(&frame), 100.0);
        assert_approx_eq!(f64, frame.area_outside(&frame), 0.0);
    }

    #[test]
    fn test_rectangle_bounding_ignores_empty() {
        let a = Rectangle::new(10.0, 10.0, 10.0, 10.0);
        let empty = Rectangle::new(500.0, 500.0, 0.0, 0.0);
        assert_eq!(a.bounding(&empty), a);
        assert_eq!(empty.bounding(&a), a);

        let mut grown = a;
        grown.embrace(&Rectangle::new(0.0, 30.0, 5.0, 5.0));
        assert_eq!(grown, Rectangle::new(0.0, 10.0, 20.0, 25.0));
    }

    #[test]
    fn test_rectangle_expanded_clamps() {
        let rect = Rectangle::new(10.0, 10.0, 10.0, 4.0);
        assert_eq!(rect.expanded(2.0, 1.0), Rectangle::new(8.0, 9.0, 14.0, 6.0));

        let collapsed = rect.expanded(-1.0, -3.0);
        assert_eq!(collapsed.width(), 8.0);
        assert_eq!(collapsed.height(), 0.0);
        assert_eq!(collapsed.top(), 12.0);
    }

    #[test]
    fn test_rectangle_edge_setters() {
        let rect = Rectangle::new(10.0, 10.0, 10.0, 10.0);
        assert_eq!(rect.with_left(5.0), Rectangle::new(5.0, 10.0, 15.0, 10.0));
        assert_eq!(rect.with_top(0.0), Rectangle::new(10.0, 0.0, 10.0, 20.0));
        assert_eq!(rect.with_right(30.0), Rectangle::new(10.0, 10.0, 20.0, 10.0));
        assert_eq!(rect.with_bottom(15.0), Rectangle::new(10.0, 10.0, 10.0, 5.0));
    }

    #[test]
    fn test_rectangle_offset_into() {
        let frame = Rectangle::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(Rectangle::new(90.0, -5.0, 20.0, 10.0).offset_into(&frame), (-10.0, 5.0));
        assert_eq!(Rectangle::new(10.0, 10.0, 20.0, 10.0).offset_into(&frame), (0.0, 0.0));
        assert_eq!(Rectangle::new(30.0, 10.0, 200.0, 10.0).offset_into(&frame), (-30.0, 0.0));
    }
}

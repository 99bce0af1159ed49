use super::{Direction, DirectionTriple, EPSILON, Point, Rectangle};

/// A three-segment polyline between a source anchor and a destination anchor.
///
/// The polyline runs `source_end → main_source → main_destination →
/// destination_end`: a source stub, the main line, and a destination stub. Any
/// segment may have zero length, so the same type represents straight lines, one-bend
/// (L/7), direct two-bend (Z/N) and wrap-around (U/C) routes.
///
/// A connector owns no references; it is pure geometry.
///
/// # Examples
///
/// ```
/// # use tessera_core::geometry::{Connector, Direction, Point};
/// let connector = Connector::with_vertical_main_line(
///     Point::new(100.0, 25.0),
///     Point::new(300.0, 75.0),
///     200.0,
/// );
/// assert_eq!(connector.length(), 250.0);
/// assert_eq!(connector.directions().second(), Direction::Down);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Connector {
    source_end: Point,
    main_source: Point,
    main_destination: Point,
    destination_end: Point,
}

impl Connector {
    pub fn new(
        source_end: Point,
        main_source: Point,
        main_destination: Point,
        destination_end: Point,
    ) -> Self {
        Self {
            source_end,
            main_source,
            main_destination,
            destination_end,
        }
    }

    /// Creates a connector with horizontal stubs and a vertical main line at `main_line_x`
    pub fn with_vertical_main_line(
        source_end: Point,
        destination_end: Point,
        main_line_x: f64,
    ) -> Self {
        Self::new(
            source_end,
            Point::new(main_line_x, source_end.y()),
            Point::new(main_line_x, destination_end.y()),
            destination_end,
        )
    }

    /// Creates a connector with vertical stubs and a horizontal main line at `main_line_y`
    pub fn with_horizontal_main_line(
        source_end: Point,
        destination_end: Point,
        main_line_y: f64,
    ) -> Self {
        Self::new(
            source_end,
            Point::new(source_end.x(), main_line_y),
            Point::new(destination_end.x(), main_line_y),
            destination_end,
        )
    }

    /// Creates a straight connector: both stubs have zero length
    pub fn straight(source_end: Point, destination_end: Point) -> Self {
        Self::new(source_end, source_end, destination_end, destination_end)
    }

    pub fn source_end(&self) -> Point {
        self.source_end
    }

    pub fn main_source(&self) -> Point {
        self.main_source
    }

    pub fn main_destination(&self) -> Point {
        self.main_destination
    }

    pub fn destination_end(&self) -> Point {
        self.destination_end
    }

    /// Returns the four polyline points from source to destination
    pub fn points(&self) -> [Point; 4] {
        [
            self.source_end,
            self.main_source,
            self.main_destination,
            self.destination_end,
        ]
    }

    /// Returns the three segments from source to destination
    pub fn segments(&self) -> [(Point, Point); 3] {
        [
            (self.source_end, self.main_source),
            (self.main_source, self.main_destination),
            (self.main_destination, self.destination_end),
        ]
    }

    /// Total length of all segments (segments are axis-aligned, so this is the
    /// sum of Manhattan lengths).
    pub fn length(&self) -> f64 {
        self.segments()
            .iter()
            .map(|(from, to)| from.manhattan_distance(*to))
            .sum()
    }

    /// Returns the pattern of segment directions
    pub fn directions(&self) -> DirectionTriple {
        let [first, second, third] = self.segments();
        DirectionTriple::new(
            Direction::of_segment(first.0, first.1),
            Direction::of_segment(second.0, second.1),
            Direction::of_segment(third.0, third.1),
        )
    }

    /// Returns the smallest rectangle containing all points
    pub fn bounding_rectangle(&self) -> Rectangle {
        let points = self.points();
        let (mut min_x, mut min_y) = (points[0].x(), points[0].y());
        let (mut max_x, mut max_y) = (min_x, min_y);
        for point in &points[1..] {
            min_x = min_x.min(point.x());
            min_y = min_y.min(point.y());
            max_x = max_x.max(point.x());
            max_y = max_y.max(point.y());
        }
        Rectangle::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Checks whether any segment passes through the interior of `rect`.
    ///
    /// Touching the border does not count, so a connector whose end lies on a
    /// rectangle's edge does not intersect that rectangle.
    pub fn intersects_rectangle(&self, rect: &Rectangle) -> bool {
        !rect.is_empty()
            && self
                .segments()
                .iter()
                .any(|(from, to)| segment_crosses_interior(*from, *to, rect))
    }

    /// Counts the segment pairs of the two connectors that cross or touch.
    ///
    /// Zero-length segments are skipped; collinear overlapping segments count once.
    pub fn count_intersections(&self, other: &Connector) -> u32 {
        let mut count = 0;
        for (a, b) in self.segments() {
            if a.is_close_to(b) {
                continue;
            }
            for (c, d) in other.segments() {
                if c.is_close_to(d) {
                    continue;
                }
                if segments_intersect(a, b, c, d) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Returns the shortest distance from the point to the polyline
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        let point = Point::new(x, y);
        self.segments()
            .iter()
            .map(|(from, to)| distance_to_segment(point, *from, *to))
            .fold(f64::INFINITY, f64::min)
    }

    /// Checks whether the point lies within `max_distance` of the polyline
    pub fn is_close(&self, x: f64, y: f64, max_distance: f64) -> bool {
        self.distance_to(x, y) <= max_distance
    }
}

/// Liang-Barsky clipping of a segment against the open interior of `rect`.
fn segment_crosses_interior(from: Point, to: Point, rect: &Rectangle) -> bool {
    let left = rect.left() + EPSILON;
    let right = rect.right() - EPSILON;
    let top = rect.top() + EPSILON;
    let bottom = rect.bottom() - EPSILON;
    if left >= right || top >= bottom {
        return false;
    }

    let dx = to.x() - from.x();
    let dy = to.y() - from.y();
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;
    let checks = [
        (-dx, from.x() - left),
        (dx, right - from.x()),
        (-dy, from.y() - top),
        (dy, bottom - from.y()),
    ];
    for (p, q) in checks {
        if p.abs() < EPSILON {
            if q < 0.0 {
                return false;
            }
        } else {
            let t = q / p;
            if p < 0.0 {
                t0 = t0.max(t);
            } else {
                t1 = t1.min(t);
            }
            if t0 > t1 {
                return false;
            }
        }
    }
    true
}

fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b.x() - a.x()) * (c.y() - a.y()) - (b.y() - a.y()) * (c.x() - a.x())
}

fn within_box(a: Point, b: Point, c: Point) -> bool {
    c.x() >= a.x().min(b.x()) - EPSILON
        && c.x() <= a.x().max(b.x()) + EPSILON
        && c.y() >= a.y().min(b.y()) - EPSILON
        && c.y() <= a.y().max(b.y()) + EPSILON
}

fn segments_intersect(a: Point, b: Point, c: Point, d: Point) -> bool {
    let o1 = orientation(a, b, c);
    let o2 = orientation(a, b, d);
    let o3 = orientation(c, d, a);
    let o4 = orientation(c, d, b);

    let strictly_opposite =
        |p: f64, q: f64| (p > EPSILON && q < -EPSILON) || (p < -EPSILON && q > EPSILON);
    if strictly_opposite(o1, o2) && strictly_opposite(o3, o4) {
        return true;
    }

    (o1.abs() < EPSILON && within_box(a, b, c))
        || (o2.abs() < EPSILON && within_box(a, b, d))
        || (o3.abs() < EPSILON && within_box(c, d, a))
        || (o4.abs() < EPSILON && within_box(c, d, b))
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x() - a.x();
    let dy = b.y() - a.y();
    let length_squared = dx * dx + dy * dy;
    if length_squared < EPSILON {
        return (p.x() - a.x()).hypot(p.y() - a.y());
    }
    let t = (((p.x() - a.x()) * dx + (p.y() - a.y()) * dy) / length_squared).clamp(0.0, 1.0);
    let nearest = Point::new(a.x() + t * dx, a.y() + t * dy);
    (p.x() - nearest.x()).hypot(p.y() - nearest.y())
}

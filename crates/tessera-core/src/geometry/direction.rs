use std::fmt;

use super::{EPSILON, Point};

/// Direction of a single axis-aligned connector segment.
///
/// `Center` marks a segment of zero length, which is how one-bend connectors
/// (L/7 shapes) and straight messages are represented in the three-segment
/// [`Connector`](super::Connector) model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    Center,
    Left,
    Up,
    Right,
    Down,
}

impl Direction {
    /// Classifies the segment from `from` to `to`.
    ///
    /// Diagonal segments are classified by their dominant axis.
    pub fn of_segment(from: Point, to: Point) -> Self {
        let dx = to.x() - from.x();
        let dy = to.y() - from.y();
        if dx.abs() < EPSILON && dy.abs() < EPSILON {
            Direction::Center
        } else if dx.abs() >= dy.abs() {
            if dx > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if dy > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        }
    }

    /// Returns true for `Left` and `Right`
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Returns true for `Up` and `Down`
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// Returns the direction after a clockwise quarter turn (screen coordinates)
    pub fn clockwise(self) -> Self {
        match self {
            Direction::Center => Direction::Center,
            Direction::Left => Direction::Up,
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
        }
    }

    /// Returns the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Center => Direction::Center,
            Direction::Left => Direction::Right,
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
        }
    }

    /// Returns true if the two directions are at a right angle
    pub fn is_perpendicular_to(self, other: Direction) -> bool {
        (self.is_horizontal() && other.is_vertical())
            || (self.is_vertical() && other.is_horizontal())
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Center => "center",
            Direction::Left => "left",
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
        };
        write!(f, "{s}")
    }
}

/// The directions of the three segments of a connector, source to destination.
///
/// The triple is the connector's *pattern*, used when scoring routing candidates.
///
/// # Examples
///
/// ```
/// # use tessera_core::geometry::{Direction, DirectionTriple};
/// let z = DirectionTriple::new(Direction::Right, Direction::Down, Direction::Right);
/// assert!(z.is_zig_zag());
/// assert!(z.is_right_handed_zig_zag());
///
/// let n = DirectionTriple::new(Direction::Right, Direction::Up, Direction::Right);
/// assert!(n.is_zig_zag());
/// assert!(!n.is_right_handed_zig_zag());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DirectionTriple {
    first: Direction,
    second: Direction,
    third: Direction,
}

impl DirectionTriple {
    pub fn new(first: Direction, second: Direction, third: Direction) -> Self {
        Self {
            first,
            second,
            third,
        }
    }

    pub fn first(self) -> Direction {
        self.first
    }

    pub fn second(self) -> Direction {
        self.second
    }

    pub fn third(self) -> Direction {
        self.third
    }

    /// A zig-zag leaves and enters in the same direction with a perpendicular
    /// main segment in between (the Z and N shapes).
    pub fn is_zig_zag(self) -> bool {
        self.first == self.third && self.first.is_perpendicular_to(self.second)
    }

    /// A zig-zag whose first bend is a clockwise (right-hand) turn.
    pub fn is_right_handed_zig_zag(self) -> bool {
        self.is_zig_zag() && self.second == self.first.clockwise()
    }

    /// A wrap-around leaves and enters in opposite directions (the U and C shapes).
    pub fn is_wrap_around(self) -> bool {
        self.first == self.third.opposite()
            && self.first != Direction::Center
            && self.first.is_perpendicular_to(self.second)
    }
}

impl fmt::Display for DirectionTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.first, self.second, self.third)
    }
}

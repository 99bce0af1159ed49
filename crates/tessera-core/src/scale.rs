//! Non-linear mapping between integer order keys and pixel locations.
//!
//! Model elements carry sparse integer "orders" (`x_order`, `y_order`,
//! `list_order`) instead of coordinates. A [`NonLinearScale`] collects the orders
//! in use on one axis and spreads them evenly over a pixel range, so the visual
//! distance between neighbors does not depend on how far apart their order keys
//! are.

use log::trace;

use crate::error::ScaleError;

/// One defined point of a scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalePoint {
    order: i32,
    location: f64,
}

impl ScalePoint {
    pub fn order(&self) -> i32 {
        self.order
    }

    pub fn location(&self) -> f64 {
        self.location
    }
}

/// Maps order keys to increasing locations within `[lower, upper]`.
///
/// Two sentinel points pin `i32::MIN` to `lower` and `i32::MAX` to `upper`; every
/// inserted order lies strictly between them. After each insertion all points are
/// redistributed evenly by rank, so a new order lands halfway between the
/// locations its neighbors end up at and the relative spacing stays uniform.
///
/// # Examples
///
/// ```
/// # use tessera_core::scale::NonLinearScale;
/// let mut scale = NonLinearScale::new(0.0, 400.0);
/// scale.add_order(-1000)?;
/// scale.add_order(5)?;
/// scale.add_order(7)?;
///
/// assert_eq!(scale.location(-1000), 100.0);
/// assert_eq!(scale.location(5), 200.0);
/// assert_eq!(scale.location(7), 300.0);
/// assert_eq!(scale.order(201.0, 2.0), 5);
/// # Ok::<(), tessera_core::error::ScaleError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NonLinearScale {
    lower: f64,
    upper: f64,
    points: Vec<ScalePoint>,
    point_limit: Option<usize>,
}

impl NonLinearScale {
    /// Creates a scale spanning `[lower, upper]` with no orders defined
    pub fn new(lower: f64, upper: f64) -> Self {
        Self {
            lower,
            upper,
            points: vec![
                ScalePoint {
                    order: i32::MIN,
                    location: lower,
                },
                ScalePoint {
                    order: i32::MAX,
                    location: upper,
                },
            ],
            point_limit: None,
        }
    }

    /// Limits the number of orders the scale accepts.
    ///
    /// Once `limit` orders are defined, [`add_order`](Self::add_order) fails with
    /// [`ScaleError::CapacityExceeded`] for every new order.
    pub fn with_point_limit(mut self, limit: usize) -> Self {
        self.point_limit = Some(limit);
        self
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Number of inserted orders, sentinels excluded
    pub fn len(&self) -> usize {
        self.points.len() - 2
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the inserted points in ascending order, sentinels excluded.
    ///
    /// Renderers use these to draw grid lines.
    pub fn points(&self) -> &[ScalePoint] {
        &self.points[1..self.points.len() - 1]
    }

    /// Checks whether `order` is a defined point of the scale
    pub fn contains_order(&self, order: i32) -> bool {
        self.points.binary_search_by_key(&order, |p| p.order).is_ok()
    }

    /// Inserts `order` if absent and redistributes all points.
    ///
    /// Returns `Ok(true)` when the order was inserted and `Ok(false)` when it was
    /// already defined. The sentinel orders `i32::MIN` and `i32::MAX` are always
    /// defined.
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError::CapacityExceeded`] when a point limit is set and
    /// already reached.
    pub fn add_order(&mut self, order: i32) -> Result<bool, ScaleError> {
        let index = match self.points.binary_search_by_key(&order, |p| p.order) {
            Ok(_) => return Ok(false),
            Err(index) => index,
        };
        self.check_capacity()?;

        self.points.insert(
            index,
            ScalePoint {
                order,
                location: self.lower,
            },
        );
        self.redistribute();
        trace!(order, location = self.points[index].location; "Added order to scale");
        Ok(true)
    }

    /// Inserts `order` at a fixed location, leaving the other points in place.
    ///
    /// The location is clamped between the neighboring points, so locations keep
    /// increasing with orders. A later [`add_order`](Self::add_order) redistributes
    /// pinned points like any other.
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError::CapacityExceeded`] when a point limit is set and
    /// already reached.
    pub fn pin_order(&mut self, order: i32, location: f64) -> Result<bool, ScaleError> {
        let index = match self.points.binary_search_by_key(&order, |p| p.order) {
            Ok(_) => return Ok(false),
            Err(index) => index,
        };
        self.check_capacity()?;

        // sentinels bracket every other order, so both neighbors exist
        let (before, after) = (self.points[index - 1], self.points[index]);
        let location = location.max(before.location).min(after.location);
        self.points.insert(index, ScalePoint { order, location });
        trace!(order, location; "Pinned order on scale");
        Ok(true)
    }

    fn check_capacity(&self) -> Result<(), ScaleError> {
        match self.point_limit {
            Some(limit) if self.len() >= limit => Err(ScaleError::CapacityExceeded { limit }),
            _ => Ok(()),
        }
    }

    fn redistribute(&mut self) {
        let last = (self.points.len() - 1) as f64;
        let span = self.upper - self.lower;
        for (rank, point) in self.points.iter_mut().enumerate() {
            point.location = self.lower + span * rank as f64 / last;
        }
        // pin the upper sentinel against rounding
        if let Some(point) = self.points.last_mut() {
            point.location = self.upper;
        }
    }

    /// Maps an order to a location.
    ///
    /// Defined orders map to their point; other orders are interpolated linearly
    /// between the bracketing points.
    pub fn location(&self, order: i32) -> f64 {
        let index = self.points.partition_point(|p| p.order < order);
        let after = self.points[index];
        if after.order == order || index == 0 {
            return after.location;
        }
        let before = self.points[index - 1];
        let t = (f64::from(order) - f64::from(before.order))
            / (f64::from(after.order) - f64::from(before.order));
        before.location + (after.location - before.location) * t
    }

    /// Maps a location back to an order.
    ///
    /// If the nearest defined point (sentinels included) is within
    /// `snap_interval`, its order is returned. Otherwise the order is interpolated
    /// between the bracketing points and rounded. Locations outside the scale's
    /// range clamp to the sentinel orders.
    pub fn order(&self, location: f64, snap_interval: f64) -> i32 {
        let nearest = self.points.iter().min_by(|a, b| {
            (a.location - location)
                .abs()
                .total_cmp(&(b.location - location).abs())
        });
        if let Some(nearest) = nearest.filter(|p| (p.location - location).abs() <= snap_interval) {
            return nearest.order;
        }

        if location <= self.lower {
            return i32::MIN;
        }
        if location >= self.upper {
            return i32::MAX;
        }

        let index = self
            .points
            .partition_point(|p| p.location < location)
            .clamp(1, self.points.len() - 1);
        let before = self.points[index - 1];
        let after = self.points[index];
        let width = after.location - before.location;
        if width <= 0.0 {
            return before.order;
        }
        let t = (location - before.location) / width;
        let order =
            f64::from(before.order) + (f64::from(after.order) - f64::from(before.order)) * t;
        order.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_empty_scale_maps_sentinels() {
        let scale = NonLinearScale::new(10.0, 110.0);
        assert!(scale.is_empty());
        assert!(scale.points().is_empty());
        assert_approx_eq!(f64, scale.location(i32::MIN), 10.0);
        assert_approx_eq!(f64, scale.location(i32::MAX), 110.0);
        assert_approx_eq!(f64, scale.location(0), 60.0, epsilon = 1e-6);
    }

    #[test]
    fn test_single_order_lands_in_the_middle() {
        let mut scale = NonLinearScale::new(0.0, 200.0);
        assert_eq!(scale.add_order(42), Ok(true));
        assert_approx_eq!(f64, scale.location(42), 100.0);
    }

    #[test]
    fn test_add_order_is_idempotent() {
        let mut scale = NonLinearScale::new(0.0, 200.0);
        assert_eq!(scale.add_order(3), Ok(true));
        assert_eq!(scale.add_order(3), Ok(false));
        assert_eq!(scale.add_order(i32::MIN), Ok(false));
        assert_eq!(scale.len(), 1);
    }

    #[test]
    fn test_insertion_redistributes_evenly() {
        let mut scale = NonLinearScale::new(0.0, 300.0);
        scale.add_order(100).unwrap();
        scale.add_order(-5).unwrap();
        assert_approx_eq!(f64, scale.location(-5), 100.0);
        assert_approx_eq!(f64, scale.location(100), 200.0);

        // the new order takes the middle rank between its neighbors
        scale.add_order(50).unwrap();
        assert_approx_eq!(f64, scale.location(-5), 75.0);
        assert_approx_eq!(f64, scale.location(50), 150.0);
        assert_approx_eq!(f64, scale.location(100), 225.0);
    }

    #[test]
    fn test_location_interpolates_between_points() {
        let mut scale = NonLinearScale::new(0.0, 300.0);
        scale.add_order(0).unwrap();
        scale.add_order(10).unwrap();
        assert_approx_eq!(f64, scale.location(5), 150.0);
    }

    #[test]
    fn test_order_snaps_and_interpolates() {
        let mut scale = NonLinearScale::new(0.0, 300.0);
        scale.add_order(0).unwrap();
        scale.add_order(10).unwrap();

        assert_eq!(scale.order(104.0, 5.0), 0);
        assert_eq!(scale.order(150.0, 5.0), 5);
        assert_eq!(scale.order(-50.0, 0.0), i32::MIN);
        assert_eq!(scale.order(350.0, 0.0), i32::MAX);
    }

    #[test]
    fn test_point_limit() {
        let mut scale = NonLinearScale::new(0.0, 100.0).with_point_limit(2);
        scale.add_order(1).unwrap();
        scale.add_order(2).unwrap();
        assert_eq!(scale.add_order(2), Ok(false));
        assert_eq!(
            scale.add_order(3),
            Err(ScaleError::CapacityExceeded { limit: 2 })
        );
        assert_eq!(scale.len(), 2);
    }

    #[test]
    fn test_pinned_orders_keep_their_location() {
        let mut scale = NonLinearScale::new(0.0, 400.0);
        assert_eq!(scale.pin_order(0, 30.0), Ok(true));
        assert_eq!(scale.pin_order(10, 250.0), Ok(true));
        assert_eq!(scale.pin_order(10, 300.0), Ok(false));
        assert_approx_eq!(f64, scale.location(0), 30.0);
        assert_approx_eq!(f64, scale.location(10), 250.0);
        assert_eq!(scale.order(30.0, 0.0), 0);
        assert_eq!(scale.order(250.0, 0.0), 10);

        // a location out of order is clamped between the neighbors
        scale.pin_order(5, 350.0).unwrap();
        assert_approx_eq!(f64, scale.location(5), 250.0);
    }

    #[test]
    fn test_pin_order_respects_point_limit() {
        let mut scale = NonLinearScale::new(0.0, 100.0).with_point_limit(1);
        scale.pin_order(1, 20.0).unwrap();
        assert_eq!(
            scale.pin_order(2, 80.0),
            Err(ScaleError::CapacityExceeded { limit: 1 })
        );
    }

    #[test]
    fn test_points_are_sorted() {
        let mut scale = NonLinearScale::new(0.0, 100.0);
        for order in [9, -3, 4] {
            scale.add_order(order).unwrap();
        }
        let orders: Vec<i32> = scale.points().iter().map(ScalePoint::order).collect();
        assert_eq!(orders, vec![-3, 4, 9]);
        assert!(scale.contains_order(4));
        assert!(!scale.contains_order(5));
    }
}

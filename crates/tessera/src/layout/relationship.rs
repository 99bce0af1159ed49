//! Relationship routing.
//!
//! Every relationship first gets a [`Visibility`]. Visible relationships on
//! free-form diagrams are then routed one by one, the longest and strongest
//! first, so that their paths constrain the ones routed later. Each route is the
//! cheapest of a set of candidate [`Connector`]s from three shape families:
//!
//! ```text
//!  Z/N                 L/7                U/C
//! ┌───┐               ┌───┐              ┌─────────┐
//! │ A ├──┐            │ A ├────┐         │         │
//! └───┘  │  ┌───┐     └───┘    │       ┌─┴─┐     ┌─┴─┐
//!        └──┤ B │            ┌─┴─┐     │ A │     │ B │
//!           └───┘            │ B │     └───┘     └───┘
//!                            └───┘
//! ```
//!
//! On sequence and timing diagrams relationships are messages between lifelines
//! and are drawn straight across the scenario at their list order.

use std::collections::{HashMap, HashSet};

use log::{debug, trace, warn};

use tessera_core::{
    geometry::{Connector, EPSILON, Point, Rectangle},
    model::DiagramKind,
    scale::NonLinearScale,
    text::TextMeasure,
};

use super::{
    containment::{ContainmentHierarchy, is_nesting},
    data::{ClassifierIndex, LayoutData, LayoutRelationship, RelationshipIndex, Visibility},
    sizes::SizeProfile,
};

const SOLUTION_INDEX_DEBT: f64 = 0.1;
const ZIG_ZAG_DEBT_FACTOR: f64 = 0.2;
const OUTSIDE_DRAW_AREA_DEBT: f64 = 1_000_000.0;
const SYMBOL_CROSSING_DEBT: f64 = 100_000.0;
const LABEL_CROSSING_DEBT: f64 = 10_000.0;
const CONNECTOR_CROSSING_DEBT: f64 = 1_000.0;
const SAME_ZIG_ZAG_CROSSING_DEBT: f64 = 1_000_000.0;

/// The two rectangles a relationship connects, with their anchor offset
#[derive(Debug, Clone, Copy)]
struct Ends {
    source: Rectangle,
    destination: Rectangle,
    /// Shift of the anchors away from the side centers
    offset: f64,
}

fn clamp(value: f64, low: f64, high: f64) -> f64 {
    value.max(low).min(high)
}

pub(crate) struct RelationshipLayouter<'p> {
    profile: &'p SizeProfile,
    measure: &'p dyn TextMeasure,
    hierarchy: &'p ContainmentHierarchy,
}

impl<'p> RelationshipLayouter<'p> {
    pub(crate) fn new(
        profile: &'p SizeProfile,
        measure: &'p dyn TextMeasure,
        hierarchy: &'p ContainmentHierarchy,
    ) -> Self {
        Self {
            profile,
            measure,
            hierarchy,
        }
    }

    /// Assigns visibilities and shapes every visible relationship.
    ///
    /// `embraced` holds the `(parent, child)` pairs the classifier pass grew a
    /// container around.
    pub(crate) fn layout(
        &self,
        data: &mut LayoutData<'_>,
        kind: DiagramKind,
        x_scale: &NonLinearScale,
        y_scale: &NonLinearScale,
        embraced: &[(ClassifierIndex, ClassifierIndex)],
    ) {
        self.assign_visibility(data, kind);
        match kind {
            DiagramKind::Sequence => self.layout_messages(data, y_scale, true),
            DiagramKind::Timing => self.layout_messages(data, x_scale, false),
            _ => {
                self.hide_relations_of_embraced_children(data, embraced);
                self.route_all(data);
            }
        }
    }

    pub(crate) fn assign_visibility(&self, data: &mut LayoutData<'_>, kind: DiagramKind) {
        let indices: Vec<RelationshipIndex> = data.relationship_indices().collect();
        for index in indices {
            let relationship = data.relationship(index);
            let grayed_out = [relationship.from_classifier(), relationship.to_classifier()]
                .into_iter()
                .any(|end| data.classifier(end).element().display().is_grayed_out());

            let visibility = if !kind.shows_relationships() {
                Visibility::Implicit
            } else if kind.is_interaction()
                && relationship.from_feature().is_none()
                && relationship.to_feature().is_none()
            {
                Visibility::Implicit
            } else if grayed_out {
                Visibility::GrayOut
            } else {
                Visibility::Show
            };
            data.relationship_mut(index).set_visibility(visibility);
        }
    }

    /// Hides containments whose embraced child still sits inside the parent's space.
    ///
    /// A child embraced by two containers follows only one of them when groups
    /// move, so the space is checked again.
    pub(crate) fn hide_relations_of_embraced_children(
        &self,
        data: &mut LayoutData<'_>,
        embraced: &[(ClassifierIndex, ClassifierIndex)],
    ) {
        let hidden: Vec<RelationshipIndex> = data
            .relationship_indices()
            .filter(|&index| {
                let relationship = data.relationship(index);
                let (parent, child) =
                    (relationship.from_classifier(), relationship.to_classifier());
                is_nesting(relationship)
                    && embraced.contains(&(parent, child))
                    && data
                        .classifier(parent)
                        .space()
                        .contains(&data.classifier(child).bounds())
            })
            .collect();
        debug!(hidden = hidden.len(); "Hiding containments of embraced children");
        for index in hidden {
            data.relationship_mut(index)
                .set_visibility(Visibility::Implicit);
        }
    }

    fn routing_order(&self, data: &LayoutData<'_>) -> Vec<RelationshipIndex> {
        let draw_area = data.frame().draw_area();
        let penalty = draw_area.width() + draw_area.height();
        let mut keyed: Vec<(f64, RelationshipIndex)> = data
            .relationship_indices()
            .filter(|&index| data.relationship(index).visibility() != Visibility::Implicit)
            .map(|index| {
                let relationship = data.relationship(index);
                let from = data.classifier(relationship.from_classifier()).bounds();
                let to = data.classifier(relationship.to_classifier()).bounds();
                let mut key = -((from.center_x() - to.center_x()).abs()
                    + (from.center_y() - to.center_y()).abs());
                // grayed out relationships are routed like shown ones
                if relationship.relationship().kind().is_weak() {
                    key += penalty;
                }
                (key, index)
            })
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        keyed.into_iter().map(|(_, index)| index).collect()
    }

    /// Spreads the anchors of relationships that join the same pair of placements.
    fn anchor_offsets(
        &self,
        data: &LayoutData<'_>,
        order: &[RelationshipIndex],
    ) -> HashMap<RelationshipIndex, f64> {
        let mut pairs: HashMap<(ClassifierIndex, ClassifierIndex), Vec<RelationshipIndex>> =
            HashMap::new();
        for &index in order {
            let relationship = data.relationship(index);
            let (from, to) = (relationship.from_classifier(), relationship.to_classifier());
            pairs
                .entry((from.min(to), from.max(to)))
                .or_default()
                .push(index);
        }

        let step = self.profile.object_distance() / 2.0;
        let mut offsets = HashMap::new();
        for mut members in pairs.into_values() {
            members.sort();
            let center = (members.len() as f64 - 1.0) / 2.0;
            for (rank, index) in members.into_iter().enumerate() {
                offsets.insert(index, (rank as f64 - center) * step);
            }
        }
        offsets
    }

    fn end_rectangle(
        &self,
        data: &LayoutData<'_>,
        relationship: &LayoutRelationship<'_>,
        source: bool,
    ) -> Rectangle {
        let (classifier, feature) = if source {
            (relationship.from_classifier(), relationship.from_feature())
        } else {
            (relationship.to_classifier(), relationship.to_feature())
        };
        match feature {
            Some(feature) => data.feature(feature).bounds(),
            None => data.classifier(classifier).symbol_box(),
        }
    }

    fn route_all(&self, data: &mut LayoutData<'_>) {
        let order = self.routing_order(data);
        let offsets = self.anchor_offsets(data, &order);

        let mut routed: Vec<RelationshipIndex> = Vec::new();
        for index in order {
            let relationship = data.relationship(index);
            let ends = Ends {
                source: self.end_rectangle(data, relationship, true),
                destination: self.end_rectangle(data, relationship, false),
                offset: offsets.get(&index).copied().unwrap_or_default(),
            };
            let excluded: HashSet<ClassifierIndex> = self
                .hierarchy
                .lineage(relationship.from_classifier())
                .chain(self.hierarchy.lineage(relationship.to_classifier()))
                .collect();
            let obstacles: Vec<Rectangle> = data
                .classifier_indices()
                .filter(|other| !excluded.contains(other))
                .map(|other| data.classifier(other).symbol_box())
                .collect();

            let candidates = self.candidates(&ends, &obstacles);
            let mut best: Option<(f64, Connector)> = None;
            for (solution, candidate) in candidates.into_iter().enumerate() {
                let debt = self.debt(data, index, &candidate, solution, &excluded, &routed);
                trace!(
                    relationship = index.index(),
                    solution,
                    pattern:% = candidate.directions(),
                    debt;
                    "Connector candidate"
                );
                if best.is_none_or(|(best_debt, _)| debt < best_debt) {
                    best = Some((debt, candidate));
                }
            }

            if let Some((debt, shape)) = best {
                let label_box = self.label_box(data.relationship(index), &shape);
                debug!(
                    relationship = index.index(),
                    debt,
                    pattern:% = shape.directions();
                    "Routed relationship"
                );
                data.relationship_mut(index).set_shape(shape, label_box);
                routed.push(index);
            }
        }
        debug!(routed = routed.len(); "Routed relationships");
    }

    /// Generates candidates of all applicable shape families, wrap-arounds last.
    fn candidates(&self, ends: &Ends, obstacles: &[Rectangle]) -> Vec<Connector> {
        let mut candidates = Vec::new();
        let self_loop = ends.source == ends.destination;
        if !self_loop {
            candidates.extend(self.zig_zag_candidates(ends, obstacles));
            candidates.extend(self.corner_candidates(ends));
        }
        candidates.extend(self.wrap_around_candidates(ends));
        candidates
    }

    /// Direct routes with one main line between two clearly separated rectangles.
    fn zig_zag_candidates(&self, ends: &Ends, obstacles: &[Rectangle]) -> Vec<Connector> {
        let distance = self.profile.object_distance();
        let (s, d) = (ends.source, ends.destination);
        let mut candidates = Vec::new();

        let ys = clamp(s.center_y() + ends.offset, s.top(), s.bottom());
        let yd = clamp(d.center_y() + ends.offset, d.top(), d.bottom());
        let horizontal = if d.left() - s.right() >= 2.0 * distance {
            Some((Point::new(s.right(), ys), Point::new(d.left(), yd)))
        } else if s.left() - d.right() >= 2.0 * distance {
            Some((Point::new(s.left(), ys), Point::new(d.right(), yd)))
        } else {
            None
        };
        if let Some((source, destination)) = horizontal {
            let (low, high) = (source.x().min(destination.x()), source.x().max(destination.x()));
            let x = self
                .find_space_for_line(obstacles, true, (low + distance, high - distance), (ys, yd))
                .unwrap_or_else(|| {
                    warn!(low, high; "No space for a vertical line, using the midpoint");
                    (low + high) / 2.0
                });
            candidates.push(Connector::with_vertical_main_line(source, destination, x));
        }

        let xs = clamp(s.center_x() + ends.offset, s.left(), s.right());
        let xd = clamp(d.center_x() + ends.offset, d.left(), d.right());
        let vertical = if d.top() - s.bottom() >= 2.0 * distance {
            Some((Point::new(xs, s.bottom()), Point::new(xd, d.top())))
        } else if s.top() - d.bottom() >= 2.0 * distance {
            Some((Point::new(xs, s.top()), Point::new(xd, d.bottom())))
        } else {
            None
        };
        if let Some((source, destination)) = vertical {
            let (low, high) = (source.y().min(destination.y()), source.y().max(destination.y()));
            let y = self
                .find_space_for_line(obstacles, false, (low + distance, high - distance), (xs, xd))
                .unwrap_or_else(|| {
                    warn!(low, high; "No space for a horizontal line, using the midpoint");
                    (low + high) / 2.0
                });
            candidates.push(Connector::with_horizontal_main_line(source, destination, y));
        }
        candidates
    }

    /// Searches a line position in `range` that crosses none of the obstacles.
    ///
    /// A vertical line at `x` spans `span` in y (and the other way round for a
    /// horizontal line). Probes the middle of the range first, then positions just
    /// beside each obstacle, nearest to the middle first. Returns `None` if every
    /// probe is blocked.
    pub(crate) fn find_space_for_line(
        &self,
        obstacles: &[Rectangle],
        vertical: bool,
        range: (f64, f64),
        span: (f64, f64),
    ) -> Option<f64> {
        let (low, high) = range;
        if low > high {
            return None;
        }
        let middle = (low + high) / 2.0;
        let distance = self.profile.object_distance();

        let mut probes = vec![middle];
        for obstacle in obstacles {
            let (start, end) = if vertical {
                (obstacle.left(), obstacle.right())
            } else {
                (obstacle.top(), obstacle.bottom())
            };
            probes.push(start - distance);
            probes.push(end + distance);
        }
        probes.retain(|probe| *probe >= low - EPSILON && *probe <= high + EPSILON);
        probes.sort_by(|a, b| (a - middle).abs().total_cmp(&(b - middle).abs()));

        let (a, b) = span;
        probes.into_iter().find(|&probe| {
            let line = if vertical {
                Connector::straight(Point::new(probe, a), Point::new(probe, b))
            } else {
                Connector::straight(Point::new(a, probe), Point::new(b, probe))
            };
            !obstacles
                .iter()
                .any(|obstacle| line.intersects_rectangle(obstacle))
        })
    }

    /// One-bend routes between diagonally offset rectangles, in both bend orders.
    fn corner_candidates(&self, ends: &Ends) -> Vec<Connector> {
        let distance = self.profile.object_distance();
        let (s, d) = (ends.source, ends.destination);
        let mut candidates = Vec::new();

        // leave horizontally, enter vertically
        let ys = clamp(s.center_y() + ends.offset, s.top(), s.bottom());
        let xd = clamp(d.center_x() + ends.offset, d.left(), d.right());
        let exit_x = if d.left() - s.right() >= distance {
            Some(s.right())
        } else if s.left() - d.right() >= distance {
            Some(s.left())
        } else {
            None
        };
        let entry_y = if d.top() - ys >= distance {
            Some(d.top())
        } else if ys - d.bottom() >= distance {
            Some(d.bottom())
        } else {
            None
        };
        if let (Some(exit_x), Some(entry_y)) = (exit_x, entry_y) {
            let corner = Point::new(xd, ys);
            candidates.push(Connector::new(
                Point::new(exit_x, ys),
                corner,
                corner,
                Point::new(xd, entry_y),
            ));
        }

        // leave vertically, enter horizontally
        let xs = clamp(s.center_x() + ends.offset, s.left(), s.right());
        let yd = clamp(d.center_y() + ends.offset, d.top(), d.bottom());
        let exit_y = if d.top() - s.bottom() >= distance {
            Some(s.bottom())
        } else if s.top() - d.bottom() >= distance {
            Some(s.top())
        } else {
            None
        };
        let entry_x = if d.left() - xs >= distance {
            Some(d.left())
        } else if xs - d.right() >= distance {
            Some(d.right())
        } else {
            None
        };
        if let (Some(exit_y), Some(entry_x)) = (exit_y, entry_x) {
            let corner = Point::new(xs, yd);
            candidates.push(Connector::new(
                Point::new(xs, exit_y),
                corner,
                corner,
                Point::new(entry_x, yd),
            ));
        }
        candidates
    }

    /// Routes around the outside of both rectangles, one per side.
    fn wrap_around_candidates(&self, ends: &Ends) -> Vec<Connector> {
        let distance = self.profile.object_distance();
        let (s, d) = (ends.source, ends.destination);

        // keep forward and return paths apart when the anchors would coincide
        let spread = distance / 4.0;
        let (dxs, dxd) = if (s.center_x() - d.center_x()).abs() < EPSILON {
            (-spread, spread)
        } else {
            (0.0, 0.0)
        };
        let (dys, dyd) = if (s.center_y() - d.center_y()).abs() < EPSILON {
            (-spread, spread)
        } else {
            (0.0, 0.0)
        };
        let xs = clamp(s.center_x() + ends.offset + dxs, s.left(), s.right());
        let xd = clamp(d.center_x() + ends.offset + dxd, d.left(), d.right());
        let ys = clamp(s.center_y() + ends.offset + dys, s.top(), s.bottom());
        let yd = clamp(d.center_y() + ends.offset + dyd, d.top(), d.bottom());

        vec![
            Connector::with_horizontal_main_line(
                Point::new(xs, s.top()),
                Point::new(xd, d.top()),
                s.top().min(d.top()) - distance,
            ),
            Connector::with_horizontal_main_line(
                Point::new(xs, s.bottom()),
                Point::new(xd, d.bottom()),
                s.bottom().max(d.bottom()) + distance,
            ),
            Connector::with_vertical_main_line(
                Point::new(s.left(), ys),
                Point::new(d.left(), yd),
                s.left().min(d.left()) - distance,
            ),
            Connector::with_vertical_main_line(
                Point::new(s.right(), ys),
                Point::new(d.right(), yd),
                s.right().max(d.right()) + distance,
            ),
        ]
    }

    fn debt(
        &self,
        data: &LayoutData<'_>,
        index: RelationshipIndex,
        candidate: &Connector,
        solution: usize,
        excluded: &HashSet<ClassifierIndex>,
        routed: &[RelationshipIndex],
    ) -> f64 {
        let length = candidate.length();
        let pattern = candidate.directions();
        let mut debt = length + SOLUTION_INDEX_DEBT * solution as f64;

        if pattern.is_right_handed_zig_zag() && length > 4.0 * self.profile.object_distance() {
            debt += ZIG_ZAG_DEBT_FACTOR * length;
        }
        if !data
            .frame()
            .draw_area()
            .contains(&candidate.bounding_rectangle())
        {
            debt += OUTSIDE_DRAW_AREA_DEBT;
        }

        for other in data.classifier_indices().filter(|i| !excluded.contains(i)) {
            let placement = data.classifier(other);
            if candidate.intersects_rectangle(&placement.symbol_box()) {
                debt += SYMBOL_CROSSING_DEBT;
            }
            if candidate.intersects_rectangle(&placement.label_box()) {
                debt += LABEL_CROSSING_DEBT;
            }
        }

        let current = data.relationship(index);
        let current_ends = [current.from_classifier(), current.to_classifier()];
        for &other_index in routed {
            let other = data.relationship(other_index);
            let crossings = candidate.count_intersections(other.shape());
            if crossings == 0 {
                continue;
            }
            let other_ends = [other.from_classifier(), other.to_classifier()];
            let shared: HashSet<ClassifierIndex> = current_ends
                .iter()
                .filter(|end| other_ends.contains(end))
                .copied()
                .collect();
            let same_kind =
                current.relationship().kind() == other.relationship().kind();
            let per_crossing = if same_kind && shared.len() == 1 {
                0.0
            } else if pattern.is_right_handed_zig_zag() && pattern == other.shape().directions() {
                SAME_ZIG_ZAG_CROSSING_DEBT
            } else {
                CONNECTOR_CROSSING_DEBT
            };
            debt += per_crossing * f64::from(crossings);
        }
        debt
    }

    /// Centers the measured name on the main line.
    fn label_box(&self, relationship: &LayoutRelationship<'_>, shape: &Connector) -> Rectangle {
        let label = self.measure.measure_text(
            relationship.relationship().name(),
            &self.profile.footnote_font(),
        );
        let (a, b) = (shape.main_source(), shape.main_destination());
        let middle = Point::new((a.x() + b.x()) / 2.0, (a.y() + b.y()) / 2.0);
        Rectangle::from_center(middle, label)
    }

    /// Draws messages straight between lifelines at their list order.
    ///
    /// Sequence messages run horizontally, timing messages vertically.
    fn layout_messages(&self, data: &mut LayoutData<'_>, scale: &NonLinearScale, horizontal: bool) {
        let distance = self.profile.object_distance();
        let indices: Vec<RelationshipIndex> = data
            .relationship_indices()
            .filter(|&index| data.relationship(index).visibility() != Visibility::Implicit)
            .collect();

        for &index in &indices {
            let relationship = data.relationship(index);
            let position = scale.location(relationship.relationship().list_order());
            let source = self.end_rectangle(data, relationship, true);
            let destination = self.end_rectangle(data, relationship, false);
            let self_message = relationship.from_classifier() == relationship.to_classifier()
                || source == destination;

            let shape = if horizontal {
                let (x1, x2) = (source.center_x(), destination.center_x());
                if self_message {
                    Connector::new(
                        Point::new(x1, position),
                        Point::new(x1 + distance, position),
                        Point::new(x1 + distance, position + distance / 2.0),
                        Point::new(x1, position + distance / 2.0),
                    )
                } else {
                    Connector::straight(Point::new(x1, position), Point::new(x2, position))
                }
            } else {
                let (y1, y2) = (source.center_y(), destination.center_y());
                if self_message {
                    Connector::new(
                        Point::new(position, y1),
                        Point::new(position, y1 - distance),
                        Point::new(position + distance / 2.0, y1 - distance),
                        Point::new(position + distance / 2.0, y1),
                    )
                } else {
                    Connector::straight(Point::new(position, y1), Point::new(position, y2))
                }
            };
            let label_box = self.label_box(relationship, &shape);
            data.relationship_mut(index).set_shape(shape, label_box);
        }
        debug!(messages = indices.len(), horizontal; "Placed messages");
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use tessera_core::{
        model::{
            Classifier, ClassifierKind, Diagram, DiagramSnapshot, Relationship, RelationshipKind,
        },
        text::FixedAdvanceMeasure,
    };

    use super::*;
    use crate::{config::SizeConfig, layout::data::DiagramFrame};

    fn hierarchy() -> ContainmentHierarchy {
        let snapshot = DiagramSnapshot::new(Diagram::new(1, DiagramKind::Class, ""));
        let bounds = Rectangle::new(0.0, 0.0, 600.0, 600.0);
        let profile = SizeProfile::new(&SizeConfig::default(), &bounds);
        let frame = DiagramFrame::new(snapshot.diagram(), bounds, &profile, &FixedAdvanceMeasure);
        ContainmentHierarchy::new(&LayoutData::new(&snapshot, frame))
    }

    fn profile() -> SizeProfile {
        // object distance 30
        SizeProfile::new(&SizeConfig::default(), &Rectangle::new(0.0, 0.0, 576.0, 576.0))
    }

    #[test]
    fn test_routing_order_ignores_gray_out() {
        let snapshot = DiagramSnapshot::new(Diagram::new(1, DiagramKind::Class, ""))
            .with_placed_classifier(Classifier::new(1, ClassifierKind::Class, "A"))
            .with_placed_classifier(Classifier::new(2, ClassifierKind::Class, "Near"))
            .with_placed_classifier(Classifier::new(3, ClassifierKind::Class, "Far"))
            .with_relationship(Relationship::new(10, RelationshipKind::Association, 1, 2))
            .with_relationship(Relationship::new(11, RelationshipKind::Association, 1, 3))
            .with_relationship(Relationship::new(12, RelationshipKind::Dependency, 1, 3));
        let bounds = Rectangle::new(0.0, 0.0, 600.0, 600.0);
        let profile = SizeProfile::new(&SizeConfig::default(), &bounds);
        let frame = DiagramFrame::new(snapshot.diagram(), bounds, &profile, &FixedAdvanceMeasure);
        let mut data = LayoutData::new(&snapshot, frame);
        for (i, left) in [(0, 0.0), (1, 100.0), (2, 400.0)] {
            let rect = Rectangle::new(left, 0.0, 50.0, 50.0);
            data.classifier_mut(ClassifierIndex::new(i))
                .set_geometry(rect, rect, rect, rect);
        }
        let [near, far, weak] = [0, 1, 2].map(RelationshipIndex::new);
        data.relationship_mut(far).set_visibility(Visibility::GrayOut);

        let hierarchy = ContainmentHierarchy::new(&data);
        let layouter = RelationshipLayouter::new(&profile, &FixedAdvanceMeasure, &hierarchy);
        assert_eq!(layouter.routing_order(&data), vec![far, near, weak]);
    }

    #[test]
    fn test_zig_zag_ends_on_rectangle_borders() {
        let (profile, hierarchy) = (profile(), hierarchy());
        let layouter = RelationshipLayouter::new(&profile, &FixedAdvanceMeasure, &hierarchy);
        let ends = Ends {
            source: Rectangle::new(0.0, 0.0, 100.0, 50.0),
            destination: Rectangle::new(300.0, 0.0, 100.0, 50.0),
            offset: 0.0,
        };

        let candidates = layouter.zig_zag_candidates(&ends, &[]);
        assert_eq!(candidates.len(), 1);
        let connector = candidates[0];
        assert_approx_eq!(f64, connector.source_end().x(), 100.0);
        assert_approx_eq!(f64, connector.destination_end().x(), 300.0);
        let main_x = connector.main_source().x();
        assert!(main_x > 100.0 && main_x < 300.0);
        assert_approx_eq!(f64, connector.length(), 200.0);
    }

    #[test]
    fn test_zig_zag_requires_wide_gap() {
        let (profile, hierarchy) = (profile(), hierarchy());
        let layouter = RelationshipLayouter::new(&profile, &FixedAdvanceMeasure, &hierarchy);
        let ends = Ends {
            source: Rectangle::new(0.0, 0.0, 100.0, 50.0),
            destination: Rectangle::new(150.0, 10.0, 100.0, 50.0),
            offset: 0.0,
        };
        assert!(layouter.zig_zag_candidates(&ends, &[]).is_empty());
        // wrap-arounds are always offered
        assert_eq!(layouter.candidates(&ends, &[]).len(), 4);
    }

    #[test]
    fn test_find_space_for_line_avoids_obstacles() {
        let (profile, hierarchy) = (profile(), hierarchy());
        let layouter = RelationshipLayouter::new(&profile, &FixedAdvanceMeasure, &hierarchy);
        let obstacle = Rectangle::new(190.0, -100.0, 20.0, 200.0);

        let x = layouter.find_space_for_line(&[obstacle], true, (130.0, 270.0), (25.0, 25.0));
        assert_eq!(x, Some(160.0));

        let wall = Rectangle::new(100.0, -100.0, 200.0, 200.0);
        let x = layouter.find_space_for_line(&[wall], true, (130.0, 270.0), (25.0, 25.0));
        assert_eq!(x, None);
    }

    #[test]
    fn test_corner_candidates_for_diagonal_offset() {
        let (profile, hierarchy) = (profile(), hierarchy());
        let layouter = RelationshipLayouter::new(&profile, &FixedAdvanceMeasure, &hierarchy);
        let ends = Ends {
            source: Rectangle::new(0.0, 0.0, 100.0, 50.0),
            destination: Rectangle::new(200.0, 150.0, 100.0, 50.0),
            offset: 0.0,
        };

        let candidates = layouter.corner_candidates(&ends);
        assert_eq!(candidates.len(), 2);
        let horizontal_first = candidates[0];
        assert_eq!(horizontal_first.source_end(), Point::new(100.0, 25.0));
        assert_eq!(horizontal_first.destination_end(), Point::new(250.0, 150.0));
        assert_approx_eq!(f64, horizontal_first.length(), 275.0);
    }

    #[test]
    fn test_self_loops_keep_ends_apart() {
        let (profile, hierarchy) = (profile(), hierarchy());
        let layouter = RelationshipLayouter::new(&profile, &FixedAdvanceMeasure, &hierarchy);
        let rect = Rectangle::new(100.0, 100.0, 100.0, 50.0);
        let ends = Ends {
            source: rect,
            destination: rect,
            offset: 0.0,
        };

        let candidates = layouter.candidates(&ends, &[]);
        assert_eq!(candidates.len(), 4);
        for candidate in candidates {
            assert!(!candidate.source_end().is_close_to(candidate.destination_end()));
            assert!(candidate.directions().is_wrap_around());
            assert!(!candidate.intersects_rectangle(&rect));
        }
    }
}

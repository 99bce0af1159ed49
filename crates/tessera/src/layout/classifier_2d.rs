//! Classifier placement for free-form diagrams.
//!
//! Runs three phases in order:
//!
//! 1. estimate: size every classifier and center it on its grid position
//! 2. embrace: grow containers around their contained classifiers
//! 3. move: shift classifier groups until they stop overlapping
//!
//! Containment pairs are exempt from overlap checks in every phase.

use std::collections::HashSet;

use log::{debug, trace, warn};

use tessera_core::{
    geometry::{Dimensions, EPSILON, Point, Rectangle},
    scale::NonLinearScale,
};

use super::{
    composer::ClassifierComposer,
    containment::{ContainmentHierarchy, is_nesting},
    data::{ClassifierIndex, LayoutData},
    feature::FeatureLayouter,
    sizes::SizeProfile,
};

/// Width-to-height ratio of the default classifier size
const DEFAULT_ASPECT_RATIO: f64 = 2.1;

/// Minimum default width relative to the standard font size
const MIN_DEFAULT_WIDTH_FACTOR: f64 = 8.0;

const OUTSIDE_SIMPLENESS_WEIGHT: f64 = 16.0;
const OUTSIDE_DEBT_WEIGHT: f64 = 32.0;
const MOVED_OVERLAP_WEIGHT: f64 = 4.0;

/// Derives the size every box-shaped classifier grows to at least.
///
/// Four classifier sizes fit into the draw area per classifier, at an aspect
/// ratio of 2.1. The width is clamped to a third of the draw area but never
/// below eight standard font sizes, unless the third is smaller.
pub(crate) fn default_classifier_size(
    draw_area: &Rectangle,
    classifier_count: usize,
    profile: &SizeProfile,
) -> Dimensions {
    let count = classifier_count.max(1) as f64;
    let width = (draw_area.area() / count / 4.0 * DEFAULT_ASPECT_RATIO).sqrt();
    let width = width
        .max(profile.standard_font_size() * MIN_DEFAULT_WIDTH_FACTOR)
        .min(draw_area.width() / 3.0);
    Dimensions::new(width, width / DEFAULT_ASPECT_RATIO)
}

pub(crate) struct Classifier2dLayouter<'p> {
    profile: &'p SizeProfile,
    composer: &'p ClassifierComposer<'p>,
    features: &'p FeatureLayouter<'p>,
    hierarchy: &'p ContainmentHierarchy,
}

impl<'p> Classifier2dLayouter<'p> {
    pub(crate) fn new(
        profile: &'p SizeProfile,
        composer: &'p ClassifierComposer<'p>,
        features: &'p FeatureLayouter<'p>,
        hierarchy: &'p ContainmentHierarchy,
    ) -> Self {
        Self {
            profile,
            composer,
            features,
            hierarchy,
        }
    }

    /// Runs all three phases; returns the `(parent, child)` pairs that were embraced.
    pub(crate) fn layout(
        &self,
        data: &mut LayoutData<'_>,
        x_scale: &NonLinearScale,
        y_scale: &NonLinearScale,
        default_size: Dimensions,
    ) -> Vec<(ClassifierIndex, ClassifierIndex)> {
        self.estimate_bounds(data, x_scale, y_scale, default_size);
        let embraced = self.embrace_children(data);
        self.move_to_avoid_overlaps(data, &embraced, default_size);
        embraced
    }

    pub(crate) fn estimate_bounds(
        &self,
        data: &mut LayoutData<'_>,
        x_scale: &NonLinearScale,
        y_scale: &NonLinearScale,
        default_size: Dimensions,
    ) {
        let indices: Vec<ClassifierIndex> = data.classifier_indices().collect();
        for index in indices {
            let features = self.features.calculate_features_bounds(data, index);
            let placement = data.classifier(index);
            let min = self.composer.min_dimensions(placement, features);
            let classifier = placement.classifier();
            let size = if classifier.kind().is_compact() {
                min
            } else {
                min.max(default_size)
            };
            let center = Point::new(
                x_scale.location(classifier.x_order()),
                y_scale.location(classifier.y_order()),
            );
            let bounds = Rectangle::from_center(center, size);
            self.composer
                .compose_from_bounds(data.classifier_mut(index), bounds);
        }
        debug!(classifiers = data.classifiers().len(); "Estimated classifier bounds");
    }

    /// Grows containers so that their space holds their contained classifiers.
    ///
    /// Containers with fewer descendants go first, so inner containers reach their
    /// final size before their own containers embrace them. A growth is dropped if
    /// the grown parent would overlap any classifier that is neither its ancestor
    /// nor its descendant, even one it already overlapped.
    pub(crate) fn embrace_children(
        &self,
        data: &mut LayoutData<'_>,
    ) -> Vec<(ClassifierIndex, ClassifierIndex)> {
        let mut nestings: Vec<(ClassifierIndex, ClassifierIndex)> = Vec::new();
        for relationship in data.relationships().iter().filter(|r| is_nesting(r)) {
            let pair = (relationship.from_classifier(), relationship.to_classifier());
            if !nestings.contains(&pair) {
                nestings.push(pair);
            }
        }
        nestings.sort_by_key(|&(parent, _)| self.hierarchy.descendant_count(parent));

        let gap = self.profile.object_distance();
        let mut embraced = Vec::new();
        for (parent, child) in nestings {
            if self.hierarchy.is_cyclic(parent, child) {
                debug!(
                    parent = parent.index(),
                    child = child.index();
                    "Skipping cyclic containment"
                );
                continue;
            }

            let child_bounds = data.classifier(child).bounds();
            let mut grown = data.classifier(parent).clone();
            let requested = grown.space().bounding(&child_bounds.expanded(gap, gap));
            self.composer.compose_from_space(&mut grown, requested);

            if !grown.space().contains(&child_bounds) {
                warn!(
                    parent = parent.index(),
                    child = child.index();
                    "Container cannot embrace its child"
                );
                continue;
            }

            let blocker = data.classifier_indices().find(|&other| {
                if self.hierarchy.are_related(parent, other) {
                    return false;
                }
                grown.bounds().intersect_area(&data.classifier(other).bounds()) > EPSILON
            });
            if let Some(blocker) = blocker {
                warn!(
                    parent = parent.index(),
                    child = child.index(),
                    blocker = blocker.index();
                    "Embracing would overlap an unrelated classifier"
                );
                continue;
            }

            *data.classifier_mut(parent) = grown;
            embraced.push((parent, child));
        }
        debug!(embraced = embraced.len(); "Embraced contained classifiers");
        embraced
    }

    /// Shifts classifier groups until they leave each other and the frame alone.
    ///
    /// A group is a classifier that no other classifier embraces, together with
    /// everything it embraces. Groups with the lowest simpleness move first;
    /// groups moved earlier are obstacles for the later ones.
    pub(crate) fn move_to_avoid_overlaps(
        &self,
        data: &mut LayoutData<'_>,
        embraced: &[(ClassifierIndex, ClassifierIndex)],
        default_size: Dimensions,
    ) {
        let draw_area = data.frame().draw_area();
        let gap = self.profile.object_distance();
        let children: HashSet<ClassifierIndex> =
            embraced.iter().map(|&(_, child)| child).collect();
        let units: Vec<ClassifierIndex> = data
            .classifier_indices()
            .filter(|index| !children.contains(index))
            .collect();

        let default_area = default_size.area();
        let mut ranked: Vec<(f64, ClassifierIndex)> = units
            .iter()
            .map(|&unit| {
                let bounds = data.classifier(unit).bounds();
                let overlap: f64 = self
                    .unrelated(&units, unit)
                    .map(|other| bounds.intersect_area(&data.classifier(other).bounds()))
                    .sum();
                let simpleness = OUTSIDE_SIMPLENESS_WEIGHT * bounds.area_outside(&draw_area)
                    - overlap
                    + default_area * default_area / bounds.area().max(1.0);
                (simpleness, unit)
            })
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut processed: Vec<ClassifierIndex> = Vec::new();
        // a classifier embraced by two containers follows the first one only
        let mut shifted: HashSet<ClassifierIndex> = HashSet::new();
        for (simpleness, unit) in ranked {
            let bounds = data.classifier(unit).bounds();
            if bounds.width() > draw_area.width() || bounds.height() > draw_area.height() {
                warn!(
                    classifier = unit.index(),
                    width = bounds.width(),
                    height = bounds.height();
                    "Classifier is larger than the draw area"
                );
            }

            let obstacles: Vec<Rectangle> = self
                .unrelated(&processed, unit)
                .map(|other| data.classifier(other).bounds().expanded(gap, gap))
                .collect();
            let candidates = [
                bounds.offset_into(&draw_area),
                clearing_shift(&bounds, &obstacles, Clearing::Up),
                clearing_shift(&bounds, &obstacles, Clearing::Down),
                clearing_shift(&bounds, &obstacles, Clearing::Left),
                clearing_shift(&bounds, &obstacles, Clearing::Right),
            ];

            let mut best = (f64::INFINITY, 0.0, 0.0);
            for (candidate, &(dx, dy)) in candidates.iter().enumerate() {
                let moved = bounds.shifted(dx, dy);
                let overlap: f64 = self
                    .unrelated(&units, unit)
                    .map(|other| {
                        let weight = if processed.contains(&other) {
                            MOVED_OVERLAP_WEIGHT
                        } else {
                            1.0
                        };
                        weight * moved.intersect_area(&data.classifier(other).bounds())
                    })
                    .sum();
                let debt = dx.abs()
                    + dy.abs()
                    + OUTSIDE_DEBT_WEIGHT * moved.area_outside(&draw_area)
                    + overlap;
                trace!(unit = unit.index(), candidate, dx, dy, debt; "Move candidate");
                if debt < best.0 {
                    best = (debt, dx, dy);
                }
            }

            let (_, dx, dy) = best;
            for member in group_of(unit, embraced) {
                if !shifted.insert(member) {
                    continue;
                }
                data.classifier_mut(member).shift(dx, dy);
            }
            debug!(unit = unit.index(), simpleness, dx, dy; "Moved classifier group");
            processed.push(unit);
        }
    }

    fn unrelated<'s>(
        &'s self,
        candidates: &'s [ClassifierIndex],
        unit: ClassifierIndex,
    ) -> impl Iterator<Item = ClassifierIndex> + 's {
        candidates
            .iter()
            .copied()
            .filter(move |&other| !self.hierarchy.are_related(unit, other))
    }
}

#[derive(Debug, Clone, Copy)]
enum Clearing {
    Up,
    Down,
    Left,
    Right,
}

/// Returns the shortest shift in one direction that clears all obstacles.
///
/// Every step jumps past the obstacles the shifted rectangle still hits, so at
/// most one step per obstacle is needed.
fn clearing_shift(bounds: &Rectangle, obstacles: &[Rectangle], clearing: Clearing) -> (f64, f64) {
    let (mut dx, mut dy) = (0.0, 0.0);
    for _ in 0..obstacles.len() {
        let moved = bounds.shifted(dx, dy);
        let hits = obstacles.iter().filter(|o| o.is_intersecting(&moved));
        let step = match clearing {
            Clearing::Up => hits.map(|o| o.top() - moved.bottom()).reduce(f64::min),
            Clearing::Down => hits.map(|o| o.bottom() - moved.top()).reduce(f64::max),
            Clearing::Left => hits.map(|o| o.left() - moved.right()).reduce(f64::min),
            Clearing::Right => hits.map(|o| o.right() - moved.left()).reduce(f64::max),
        };
        let Some(step) = step else {
            break;
        };
        match clearing {
            Clearing::Up | Clearing::Down => dy += step,
            Clearing::Left | Clearing::Right => dx += step,
        }
    }
    (dx, dy)
}

/// Returns a unit together with everything it transitively embraces
fn group_of(
    unit: ClassifierIndex,
    embraced: &[(ClassifierIndex, ClassifierIndex)],
) -> Vec<ClassifierIndex> {
    let mut group = vec![unit];
    let mut next = 0;
    while next < group.len() {
        let parent = group[next];
        for &(p, child) in embraced {
            if p == parent && !group.contains(&child) {
                group.push(child);
            }
        }
        next += 1;
    }
    group
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use tessera_core::{
        model::{
            Classifier, ClassifierKind, Diagram, DiagramKind, DiagramSnapshot, Relationship,
            RelationshipKind,
        },
        text::FixedAdvanceMeasure,
    };

    use super::*;
    use crate::{config::SizeConfig, layout::data::DiagramFrame};

    fn scales(draw_area: &Rectangle, data: &LayoutData<'_>) -> (NonLinearScale, NonLinearScale) {
        let mut x_scale = NonLinearScale::new(draw_area.left(), draw_area.right());
        let mut y_scale = NonLinearScale::new(draw_area.top(), draw_area.bottom());
        for placement in data.classifiers() {
            x_scale.add_order(placement.classifier().x_order()).unwrap();
            y_scale.add_order(placement.classifier().y_order()).unwrap();
        }
        (x_scale, y_scale)
    }

    type Embraced = Vec<(ClassifierIndex, ClassifierIndex)>;

    fn run(snapshot: &DiagramSnapshot) -> (LayoutData<'_>, Embraced) {
        let bounds = Rectangle::new(0.0, 0.0, 800.0, 600.0);
        let profile = SizeProfile::new(&SizeConfig::default(), &bounds);
        let frame = DiagramFrame::new(snapshot.diagram(), bounds, &profile, &FixedAdvanceMeasure);
        let mut data = LayoutData::new(snapshot, frame);
        let hierarchy = ContainmentHierarchy::new(&data);
        let composer = ClassifierComposer::new(&profile, &FixedAdvanceMeasure);
        let features = FeatureLayouter::new(&profile, &FixedAdvanceMeasure);
        let layouter = Classifier2dLayouter::new(&profile, &composer, &features, &hierarchy);

        let draw_area = data.frame().draw_area();
        let (x_scale, y_scale) = scales(&draw_area, &data);
        let default_size =
            default_classifier_size(&draw_area, data.classifiers().len(), &profile);
        let embraced = layouter.layout(&mut data, &x_scale, &y_scale, default_size);
        (data, embraced)
    }

    #[test]
    fn test_default_size_is_clamped() {
        let draw_area = Rectangle::new(0.0, 0.0, 840.0, 400.0);
        let profile = SizeProfile::new(&SizeConfig::default(), &draw_area);

        let one = default_classifier_size(&draw_area, 1, &profile);
        assert_approx_eq!(f64, one.width(), 280.0);
        assert_approx_eq!(f64, one.height(), 280.0 / 2.1);

        let many = default_classifier_size(&draw_area, 1000, &profile);
        assert_approx_eq!(f64, many.width(), profile.standard_font_size() * 8.0);
    }

    #[test]
    fn test_clearing_shift_jumps_past_chained_obstacles() {
        let bounds = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        let obstacles = [
            Rectangle::new(5.0, 0.0, 10.0, 10.0),
            Rectangle::new(5.0, -15.0, 10.0, 10.0),
        ];
        let (dx, dy) = clearing_shift(&bounds, &obstacles, Clearing::Up);
        assert_approx_eq!(f64, dx, 0.0);
        assert_approx_eq!(f64, dy, -25.0);
        let (dx, _) = clearing_shift(&bounds, &obstacles, Clearing::Right);
        assert_approx_eq!(f64, dx, 15.0);
    }

    #[test]
    fn test_coincident_classifiers_are_separated() {
        let snapshot = DiagramSnapshot::new(Diagram::new(1, DiagramKind::Class, ""))
            .with_placed_classifier(Classifier::new(1, ClassifierKind::Class, "A"))
            .with_placed_classifier(Classifier::new(2, ClassifierKind::Class, "B"));
        let (data, _) = run(&snapshot);

        let [a, b] = [0, 1].map(|i| data.classifier(ClassifierIndex::new(i)).bounds());
        assert!(!a.is_intersecting(&b), "{a:?} {b:?}");
        let draw_area = data.frame().draw_area();
        assert!(draw_area.contains(&a));
        assert!(draw_area.contains(&b));
    }

    #[test]
    fn test_container_embraces_child() {
        let snapshot = DiagramSnapshot::new(Diagram::new(1, DiagramKind::Package, ""))
            .with_placed_classifier(
                Classifier::new(1, ClassifierKind::Package, "outer").with_orders(0, 0),
            )
            .with_placed_classifier(
                Classifier::new(2, ClassifierKind::Class, "inner").with_orders(10, 10),
            )
            .with_relationship(Relationship::new(1, RelationshipKind::Containment, 1, 2));
        let (data, embraced) = run(&snapshot);

        let [outer, inner] = [0, 1].map(ClassifierIndex::new);
        assert_eq!(embraced, vec![(outer, inner)]);
        assert!(
            data.classifier(outer)
                .space()
                .contains(&data.classifier(inner).bounds())
        );
    }

    #[test]
    fn test_embrace_rejected_when_parent_overlaps_unrelated() {
        // the package and the stranger share a grid position
        let snapshot = DiagramSnapshot::new(Diagram::new(1, DiagramKind::Package, ""))
            .with_placed_classifier(
                Classifier::new(1, ClassifierKind::Package, "outer").with_orders(0, 0),
            )
            .with_placed_classifier(
                Classifier::new(2, ClassifierKind::Class, "inner").with_orders(10, 10),
            )
            .with_placed_classifier(
                Classifier::new(3, ClassifierKind::Class, "stranger").with_orders(0, 0),
            )
            .with_relationship(Relationship::new(1, RelationshipKind::Containment, 1, 2));
        let bounds = Rectangle::new(0.0, 0.0, 800.0, 600.0);
        let profile = SizeProfile::new(&SizeConfig::default(), &bounds);
        let frame = DiagramFrame::new(snapshot.diagram(), bounds, &profile, &FixedAdvanceMeasure);
        let mut data = LayoutData::new(&snapshot, frame);
        let hierarchy = ContainmentHierarchy::new(&data);
        let composer = ClassifierComposer::new(&profile, &FixedAdvanceMeasure);
        let features = FeatureLayouter::new(&profile, &FixedAdvanceMeasure);
        let layouter = Classifier2dLayouter::new(&profile, &composer, &features, &hierarchy);

        let draw_area = data.frame().draw_area();
        let (x_scale, y_scale) = scales(&draw_area, &data);
        let default_size = default_classifier_size(&draw_area, 3, &profile);
        layouter.estimate_bounds(&mut data, &x_scale, &y_scale, default_size);

        let [outer, stranger] = [0, 2].map(ClassifierIndex::new);
        let before = data.classifier(outer).bounds();
        assert!(before.is_intersecting(&data.classifier(stranger).bounds()));

        assert!(layouter.embrace_children(&mut data).is_empty());
        assert_eq!(data.classifier(outer).bounds(), before);
    }

    #[test]
    fn test_compact_container_cannot_embrace() {
        let snapshot = DiagramSnapshot::new(Diagram::new(1, DiagramKind::UseCase, ""))
            .with_placed_classifier(Classifier::new(1, ClassifierKind::Actor, "user"))
            .with_placed_classifier(
                Classifier::new(2, ClassifierKind::UseCase, "login").with_orders(5, 5),
            )
            .with_relationship(Relationship::new(1, RelationshipKind::Containment, 1, 2));
        let (_, embraced) = run(&snapshot);
        assert!(embraced.is_empty());
    }

    #[test]
    fn test_group_of_follows_embrace_chain() {
        let [a, b, c, d] = [0, 1, 2, 3].map(ClassifierIndex::new);
        let embraced = [(b, c), (a, b), (d, d)];
        assert_eq!(group_of(a, &embraced), vec![a, b, c]);
        assert_eq!(group_of(c, &embraced), vec![c]);
    }
}

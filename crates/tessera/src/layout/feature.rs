//! Feature placement inside and around classifier placements.
//!
//! Features are laid out by role once the classifier geometry is final:
//!
//! - list rows (properties, operations, tagged values) stack inside the space
//! - ports and interfaces straddle the border of the symbol
//! - a lifeline spans from its classifier across the scenario region

use log::debug;

use tessera_core::{
    geometry::{Dimensions, Point, Rectangle},
    model::DiagramKind,
    text::TextMeasure,
};

use super::{
    data::{ClassifierIndex, FeatureIndex, LayoutData},
    sizes::SizeProfile,
};

/// Port square size relative to the standard font size
const PORT_SIZE_FACTOR: f64 = 0.8;

/// Interface circle size relative to the port size
const INTERFACE_SIZE_FACTOR: f64 = 1.2;

/// Border of a classifier symbol a port or interface sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Side {
    Left,
    Top,
    Right,
    Bottom,
}

impl Side {
    /// Splits the order range into four quarters, one per side.
    fn of_order(order: i32) -> Self {
        let offset = i64::from(order) - i64::from(i32::MIN);
        match offset / (1_i64 << 30) {
            0 => Side::Left,
            1 => Side::Top,
            2 => Side::Right,
            _ => Side::Bottom,
        }
    }
}

pub(crate) struct FeatureLayouter<'p> {
    profile: &'p SizeProfile,
    measure: &'p dyn TextMeasure,
}

impl<'p> FeatureLayouter<'p> {
    pub(crate) fn new(profile: &'p SizeProfile, measure: &'p dyn TextMeasure) -> Self {
        Self { profile, measure }
    }

    fn row_dimensions(&self, data: &LayoutData<'_>, index: FeatureIndex) -> Dimensions {
        let border = self.profile.object_border();
        let label = self.measure.measure_text(
            &data.feature(index).feature().label(),
            &self.profile.feature_font(),
        );
        Dimensions::new(
            label.width() + 2.0 * border,
            self.profile.standard_font_size() + 2.0 * border,
        )
    }

    /// Returns the area the list rows of a placement need inside its space.
    pub(crate) fn calculate_features_bounds(
        &self,
        data: &LayoutData<'_>,
        classifier: ClassifierIndex,
    ) -> Dimensions {
        data.features_of(classifier)
            .filter(|&index| data.feature(index).feature().kind().is_list_like())
            .map(|index| self.row_dimensions(data, index))
            .fold(Dimensions::default(), Dimensions::stack_vertical)
    }

    /// Places every feature of the diagram.
    pub(crate) fn layout(&self, data: &mut LayoutData<'_>, kind: DiagramKind) {
        let classifiers: Vec<ClassifierIndex> = data.classifier_indices().collect();
        for classifier in classifiers {
            let features: Vec<FeatureIndex> = data.features_of(classifier).collect();
            if features.is_empty() {
                continue;
            }
            let (rows, others): (Vec<_>, Vec<_>) = features
                .into_iter()
                .partition(|&index| data.feature(index).feature().kind().is_list_like());
            self.layout_rows(data, classifier, rows);

            let (lifelines, attached): (Vec<_>, Vec<_>) = others
                .into_iter()
                .partition(|&index| data.feature(index).feature().kind().is_lifeline());
            for lifeline in lifelines {
                self.layout_lifeline(data, classifier, lifeline, kind);
            }
            let attached: Vec<FeatureIndex> = attached
                .into_iter()
                .filter(|&index| {
                    let kind = data.feature(index).feature().kind();
                    kind.is_port_like() || kind.is_interface()
                })
                .collect();
            self.layout_attached(data, classifier, attached);
        }
        debug!(features = data.features().len(); "Placed features");
    }

    fn layout_rows(
        &self,
        data: &mut LayoutData<'_>,
        classifier: ClassifierIndex,
        mut rows: Vec<FeatureIndex>,
    ) {
        rows.sort_by_key(|&index| (data.feature(index).feature().list_order(), index));

        let border = self.profile.object_border();
        let space = data.classifier(classifier).space();
        let mut top = space.top();
        for index in rows {
            let height = self.row_dimensions(data, index).height();
            let row_top = top.min(space.bottom());
            let bounds = Rectangle::new(
                space.left(),
                row_top,
                space.width(),
                height.min(space.bottom() - row_top),
            );
            data.feature_mut(index)
                .set_geometry(bounds, bounds.expanded(-border, -border));
            top += height;
        }
    }

    fn layout_lifeline(
        &self,
        data: &mut LayoutData<'_>,
        classifier: ClassifierIndex,
        lifeline: FeatureIndex,
        kind: DiagramKind,
    ) {
        let placement = data.classifier(classifier);
        let bounds = placement.bounds();
        let symbol = placement.symbol_box();
        let width = self.profile.object_border();
        let scenario = data.scenario().unwrap_or(data.frame().draw_area());

        let line = match kind {
            DiagramKind::Sequence => Rectangle::new(
                symbol.center_x() - width / 2.0,
                bounds.bottom(),
                width,
                scenario.bottom() - bounds.bottom(),
            ),
            DiagramKind::Timing => Rectangle::new(
                bounds.right(),
                symbol.center_y() - width / 2.0,
                scenario.right() - bounds.right(),
                width,
            ),
            _ => symbol,
        };
        let label_box = Rectangle::from_center(line.center(), Dimensions::default());
        data.feature_mut(lifeline).set_geometry(line, label_box);
    }

    /// Places ports and interfaces evenly along the sides of the symbol.
    fn layout_attached(
        &self,
        data: &mut LayoutData<'_>,
        classifier: ClassifierIndex,
        attached: Vec<FeatureIndex>,
    ) {
        let symbol = data.classifier(classifier).symbol_box();
        let mut by_side: Vec<(Side, i32, FeatureIndex)> = attached
            .into_iter()
            .map(|index| {
                let order = data.feature(index).feature().list_order();
                (Side::of_order(order), order, index)
            })
            .collect();
        by_side.sort();

        for side in [Side::Left, Side::Top, Side::Right, Side::Bottom] {
            let on_side: Vec<FeatureIndex> = by_side
                .iter()
                .filter(|(s, _, _)| *s == side)
                .map(|&(_, _, index)| index)
                .collect();
            let count = on_side.len() as f64;
            for (rank, index) in on_side.into_iter().enumerate() {
                let t = (rank as f64 + 1.0) / (count + 1.0);
                let anchor = match side {
                    Side::Left => Point::new(symbol.left(), symbol.top() + symbol.height() * t),
                    Side::Right => Point::new(symbol.right(), symbol.top() + symbol.height() * t),
                    Side::Top => Point::new(symbol.left() + symbol.width() * t, symbol.top()),
                    Side::Bottom => {
                        Point::new(symbol.left() + symbol.width() * t, symbol.bottom())
                    }
                };
                self.place_attached(data, index, side, anchor);
            }
        }
    }

    fn place_attached(
        &self,
        data: &mut LayoutData<'_>,
        index: FeatureIndex,
        side: Side,
        anchor: Point,
    ) {
        let feature = data.feature(index).feature();
        let port = self.profile.standard_font_size() * PORT_SIZE_FACTOR;
        let size = if feature.kind().is_port_like() {
            port
        } else {
            port * INTERFACE_SIZE_FACTOR
        };
        let bounds = Rectangle::from_center(anchor, Dimensions::new(size, size));

        let label = self
            .measure
            .measure_text(&feature.label(), &self.profile.footnote_font());
        let gap = self.profile.object_border();
        let label_box = match side {
            Side::Left => Rectangle::new(
                bounds.left() - gap - label.width(),
                anchor.y() - label.height() / 2.0,
                label.width(),
                label.height(),
            ),
            Side::Right => Rectangle::new(
                bounds.right() + gap,
                anchor.y() - label.height() / 2.0,
                label.width(),
                label.height(),
            ),
            Side::Top => Rectangle::new(
                anchor.x() - label.width() / 2.0,
                bounds.top() - gap - label.height(),
                label.width(),
                label.height(),
            ),
            Side::Bottom => Rectangle::new(
                anchor.x() - label.width() / 2.0,
                bounds.bottom() + gap,
                label.width(),
                label.height(),
            ),
        };
        data.feature_mut(index).set_geometry(bounds, label_box);
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use tessera_core::{
        model::{Classifier, ClassifierKind, Diagram, DiagramSnapshot, Feature, FeatureKind},
        text::FixedAdvanceMeasure,
    };

    use super::*;
    use crate::{
        config::SizeConfig,
        layout::{composer::ClassifierComposer, data::DiagramFrame},
    };

    fn profile() -> SizeProfile {
        SizeProfile::new(&SizeConfig::default(), &Rectangle::new(0.0, 0.0, 576.0, 576.0))
    }

    fn class_snapshot() -> DiagramSnapshot {
        DiagramSnapshot::new(Diagram::new(1, DiagramKind::Class, ""))
            .with_placed_classifier(Classifier::new(1, ClassifierKind::Class, "Order"))
            .with_feature(
                Feature::new(1, FeatureKind::Operation, 1, "total()").with_list_order(0),
            )
            .with_feature(Feature::new(2, FeatureKind::Property, 1, "id").with_list_order(5))
            .with_feature(
                Feature::new(3, FeatureKind::Property, 1, "lines").with_list_order(-5),
            )
            .with_feature(Feature::new(4, FeatureKind::Port, 1, "p").with_list_order(0))
    }

    #[test]
    fn test_port_side_follows_order_quarter() {
        assert_eq!(Side::of_order(i32::MIN), Side::Left);
        assert_eq!(Side::of_order(-1), Side::Top);
        assert_eq!(Side::of_order(0), Side::Right);
        assert_eq!(Side::of_order(i32::MAX), Side::Bottom);
    }

    #[test]
    fn test_rows_stack_inside_space() {
        let snapshot = class_snapshot();
        let profile = profile();
        let bounds = Rectangle::new(0.0, 0.0, 576.0, 576.0);
        let frame = DiagramFrame::new(snapshot.diagram(), bounds, &profile, &FixedAdvanceMeasure);
        let mut data = LayoutData::new(&snapshot, frame);
        let layouter = FeatureLayouter::new(&profile, &FixedAdvanceMeasure);
        let composer = ClassifierComposer::new(&profile, &FixedAdvanceMeasure);

        let classifier = ClassifierIndex::new(0);
        let rows = layouter.calculate_features_bounds(&data, classifier);
        // three rows of 12 + 2 * 4
        assert_approx_eq!(f64, rows.height(), 60.0);
        let min = composer.min_dimensions(data.classifier(classifier), rows);
        composer.compose_from_bounds(
            data.classifier_mut(classifier),
            Rectangle::new(100.0, 100.0, min.width(), min.height()),
        );
        layouter.layout(&mut data, DiagramKind::Class);

        let space = data.classifier(classifier).space();
        let keys: Vec<&str> = {
            let mut rows: Vec<_> = data
                .features()
                .iter()
                .filter(|f| f.feature().kind().is_list_like())
                .collect();
            rows.sort_by(|a, b| a.bounds().top().total_cmp(&b.bounds().top()));
            rows.iter().map(|f| f.feature().key()).collect()
        };
        // list order only, whatever the kind
        assert_eq!(keys, vec!["lines", "total()", "id"]);
        for feature in data.features() {
            if feature.feature().kind().is_list_like() {
                assert!(space.contains(&feature.bounds()), "{:?}", feature.bounds());
            }
        }
    }

    #[test]
    fn test_rows_are_clipped_to_small_space() {
        let snapshot = class_snapshot();
        let profile = profile();
        let bounds = Rectangle::new(0.0, 0.0, 576.0, 576.0);
        let frame = DiagramFrame::new(snapshot.diagram(), bounds, &profile, &FixedAdvanceMeasure);
        let mut data = LayoutData::new(&snapshot, frame);
        let composer = ClassifierComposer::new(&profile, &FixedAdvanceMeasure);
        composer.compose_from_bounds(
            data.classifier_mut(ClassifierIndex::new(0)),
            Rectangle::new(0.0, 0.0, 60.0, 40.0),
        );
        FeatureLayouter::new(&profile, &FixedAdvanceMeasure).layout(&mut data, DiagramKind::Class);

        let space = data.classifier(ClassifierIndex::new(0)).space();
        for feature in data.features() {
            if feature.feature().kind().is_list_like() {
                assert!(space.contains(&feature.bounds()));
            }
        }
    }

    #[test]
    fn test_port_straddles_symbol_border() {
        let snapshot = class_snapshot().with_feature(
            Feature::new(5, FeatureKind::ProvidedInterface, 1, "api").with_list_order(i32::MIN),
        );
        let profile = profile();
        let bounds = Rectangle::new(0.0, 0.0, 576.0, 576.0);
        let frame = DiagramFrame::new(snapshot.diagram(), bounds, &profile, &FixedAdvanceMeasure);
        let mut data = LayoutData::new(&snapshot, frame);
        let composer = ClassifierComposer::new(&profile, &FixedAdvanceMeasure);
        composer.compose_from_bounds(
            data.classifier_mut(ClassifierIndex::new(0)),
            Rectangle::new(100.0, 100.0, 200.0, 100.0),
        );
        FeatureLayouter::new(&profile, &FixedAdvanceMeasure).layout(&mut data, DiagramKind::Class);

        let port = data
            .features()
            .iter()
            .find(|f| f.feature().kind() == FeatureKind::Port)
            .map(|f| f.bounds())
            .unwrap_or_default();
        // order 0 falls on the right side, centered vertically
        assert_approx_eq!(f64, port.center_x(), 300.0);
        assert_approx_eq!(f64, port.center_y(), 150.0);
        assert_approx_eq!(f64, port.width(), 9.6, epsilon = 1e-9);

        let interface = data
            .features()
            .iter()
            .find(|f| f.feature().kind().is_interface())
            .map(|f| f.bounds())
            .unwrap_or_default();
        assert_approx_eq!(f64, interface.center_x(), 100.0);
        assert_approx_eq!(f64, interface.center_y(), 150.0);
        assert_approx_eq!(f64, interface.width(), 9.6 * 1.2, epsilon = 1e-9);
    }
}

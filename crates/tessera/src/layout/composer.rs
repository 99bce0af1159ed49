//! Derives the inner rectangles of a classifier from its outer bounds.
//!
//! Box-shaped classifiers draw their whole bounds as the symbol, with the label
//! at the top and the feature space below it. Compact classifiers (actors,
//! control nodes, history states, time events) draw a fixed-size icon with the
//! label underneath and offer no inner space.
//!
//! ```text
//!  box                          compact
//! ┌──────────────────────┐          ○
//! │   «stereotype»       │         ─┼─
//! │       Name           │         / \
//! │ ┌──────────────────┐ │        Name
//! │ │      space       │ │
//! │ └──────────────────┘ │
//! └──────────────────────┘
//! ```

use tessera_core::{
    geometry::{Dimensions, Rectangle},
    model::ClassifierKind,
    text::TextMeasure,
};

use super::{data::VisibleClassifier, sizes::SizeProfile};

/// Icon height of compact classifiers relative to the standard font size
const ICON_HEIGHT_FACTOR: f64 = 2.5;

pub(crate) struct ClassifierComposer<'p> {
    profile: &'p SizeProfile,
    measure: &'p dyn TextMeasure,
}

impl<'p> ClassifierComposer<'p> {
    pub(crate) fn new(profile: &'p SizeProfile, measure: &'p dyn TextMeasure) -> Self {
        Self { profile, measure }
    }

    /// Measures the name and the optional stereotype line.
    fn label_dimensions(&self, classifier: &VisibleClassifier<'_>) -> Dimensions {
        let name = self
            .measure
            .measure_text(classifier.label(), &self.profile.standard_font());
        match classifier.classifier().stereotype() {
            Some(stereotype) if !stereotype.is_empty() => {
                let text = format!("\u{ab}{stereotype}\u{bb}");
                self.measure
                    .measure_text(&text, &self.profile.footnote_font())
                    .stack_vertical(name)
            }
            _ => name,
        }
    }

    fn icon_dimensions(&self, kind: ClassifierKind) -> Dimensions {
        let height = self.profile.standard_font_size() * ICON_HEIGHT_FACTOR;
        Dimensions::new(height * kind.icon_aspect_ratio(), height)
    }

    /// Border between the symbol outline and its content.
    ///
    /// Emphasized placements draw a heavier outline and keep its width clear.
    fn border(&self, classifier: &VisibleClassifier<'_>) -> f64 {
        let border = self.profile.object_border();
        if classifier.element().display().is_emphasized() {
            border + self.profile.line_width()
        } else {
            border
        }
    }

    fn label_gap(&self, label: Dimensions) -> f64 {
        if label.is_empty() {
            0.0
        } else {
            self.profile.object_border()
        }
    }

    /// Smallest bounds showing the label and a space of at least `features`.
    pub(crate) fn min_dimensions(
        &self,
        classifier: &VisibleClassifier<'_>,
        features: Dimensions,
    ) -> Dimensions {
        let label = self.label_dimensions(classifier);
        let gap = self.label_gap(label);
        let kind = classifier.classifier().kind();
        if kind.is_compact() {
            let icon = self.icon_dimensions(kind);
            return Dimensions::new(
                icon.width().max(label.width()),
                icon.height() + gap + label.height(),
            );
        }
        let border = self.border(classifier);
        Dimensions::new(
            label.width().max(features.width()) + 2.0 * border,
            label.height() + gap + features.height() + 2.0 * border,
        )
    }

    /// Sets the classifier's bounds and derives symbol, label and space from them.
    pub(crate) fn compose_from_bounds(
        &self,
        classifier: &mut VisibleClassifier<'_>,
        bounds: Rectangle,
    ) {
        let label = self.label_dimensions(classifier);
        let gap = self.label_gap(label);
        let kind = classifier.classifier().kind();

        if kind.is_compact() {
            let icon = self.icon_dimensions(kind);
            let total = icon.height() + gap + label.height();
            let top = bounds.center_y() - total / 2.0;
            let symbol_box = Rectangle::new(
                bounds.center_x() - icon.width() / 2.0,
                top,
                icon.width(),
                icon.height(),
            );
            let label_box = Rectangle::new(
                bounds.center_x() - label.width() / 2.0,
                symbol_box.bottom() + gap,
                label.width(),
                label.height(),
            );
            let space = Rectangle::from_center(symbol_box.center(), Dimensions::default());
            classifier.set_geometry(bounds, symbol_box, label_box, space);
            return;
        }

        let border = self.border(classifier);
        let inner = bounds.expanded(-border, -border);
        let label_width = label.width().min(inner.width());
        let label_box = Rectangle::new(
            inner.center_x() - label_width / 2.0,
            inner.top(),
            label_width,
            label.height().min(inner.height()),
        );
        let space = if label_box.is_empty() {
            inner
        } else {
            inner.with_top((label_box.bottom() + gap).min(inner.bottom()))
        };
        classifier.set_geometry(bounds, bounds, label_box, space);
    }

    /// Sets the classifier's bounds so that its space covers `space`.
    ///
    /// The resulting space may be wider than requested when the label is wider.
    /// Compact classifiers have no space; they are centered on the requested one.
    pub(crate) fn compose_from_space(
        &self,
        classifier: &mut VisibleClassifier<'_>,
        space: Rectangle,
    ) {
        let label = self.label_dimensions(classifier);
        if classifier.classifier().kind().is_compact() {
            let size = self.min_dimensions(classifier, Dimensions::default());
            let bounds = Rectangle::from_center(space.center(), size);
            self.compose_from_bounds(classifier, bounds);
            return;
        }

        let border = self.border(classifier);
        let gap = self.label_gap(label);
        let width = space.width().max(label.width()) + 2.0 * border;
        let bounds = Rectangle::new(
            space.center_x() - width / 2.0,
            space.top() - gap - label.height() - border,
            width,
            space.height() + label.height() + gap + 2.0 * border,
        );
        self.compose_from_bounds(classifier, bounds);
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use tessera_core::{
        geometry::Point,
        model::{Classifier, DiagramElement, DisplayFlags, Highlight, InstanceMode},
        text::FixedAdvanceMeasure,
    };

    use super::*;
    use crate::{config::SizeConfig, layout::data::test_support::visible};

    fn profile() -> SizeProfile {
        // standard font 12, border 4
        SizeProfile::new(&SizeConfig::default(), &Rectangle::new(0.0, 0.0, 576.0, 576.0))
    }

    #[test]
    fn test_box_min_dimensions() {
        let profile = profile();
        let composer = ClassifierComposer::new(&profile, &FixedAdvanceMeasure);
        let classifier = Classifier::new(1, ClassifierKind::Class, "Order");
        let element = DiagramElement::new(1, 1);
        let vc = visible(&classifier, &element);

        // "Order": 5 * 12 * 0.55 = 33 wide, 13.8 high
        let min = composer.min_dimensions(&vc, Dimensions::new(50.0, 20.0));
        assert_approx_eq!(f64, min.width(), 58.0, epsilon = 1e-9);
        assert_approx_eq!(f64, min.height(), 13.8 + 20.0 + 12.0, epsilon = 1e-9);
    }

    #[test]
    fn test_emphasis_widens_border() {
        let profile = profile();
        let composer = ClassifierComposer::new(&profile, &FixedAdvanceMeasure);
        let classifier = Classifier::new(1, ClassifierKind::Class, "Order");
        let plain = DiagramElement::new(1, 1);
        let emphasized = DiagramElement::new(2, 1)
            .with_display(DisplayFlags::new(Highlight::Emphasis, InstanceMode::Type));

        let features = Dimensions::new(50.0, 20.0);
        let normal = composer.min_dimensions(&visible(&classifier, &plain), features);
        let mut vc = visible(&classifier, &emphasized);
        let heavy = composer.min_dimensions(&vc, features);
        let extra = 2.0 * profile.line_width();
        assert_approx_eq!(f64, heavy.width(), normal.width() + extra, epsilon = 1e-9);
        assert_approx_eq!(f64, heavy.height(), normal.height() + extra, epsilon = 1e-9);

        let bounds = Rectangle::new(0.0, 0.0, 100.0, 60.0);
        composer.compose_from_bounds(&mut vc, bounds);
        let inset = profile.object_border() + profile.line_width();
        assert_approx_eq!(f64, vc.space().left(), inset, epsilon = 1e-9);
        assert_approx_eq!(f64, vc.space().bottom(), 60.0 - inset, epsilon = 1e-9);
    }

    #[test]
    fn test_box_compose_from_bounds() {
        let profile = profile();
        let composer = ClassifierComposer::new(&profile, &FixedAdvanceMeasure);
        let classifier = Classifier::new(1, ClassifierKind::Class, "Order");
        let element = DiagramElement::new(1, 1);
        let mut vc = visible(&classifier, &element);

        let bounds = Rectangle::new(0.0, 0.0, 100.0, 60.0);
        composer.compose_from_bounds(&mut vc, bounds);
        assert_eq!(vc.symbol_box(), bounds);
        assert!(bounds.contains(&vc.label_box()));
        assert!(bounds.contains(&vc.space()));
        assert_approx_eq!(f64, vc.label_box().center_x(), 50.0);
        assert_approx_eq!(f64, vc.space().top(), 4.0 + 13.8 + 4.0, epsilon = 1e-9);
        assert_approx_eq!(f64, vc.space().bottom(), 56.0);
        assert!(!vc.label_box().is_intersecting(&vc.space()));
    }

    #[test]
    fn test_box_compose_from_space_covers_request() {
        let profile = profile();
        let composer = ClassifierComposer::new(&profile, &FixedAdvanceMeasure);
        let classifier = Classifier::new(1, ClassifierKind::Package, "A rather long package name")
            .with_stereotype("subsystem");
        let element = DiagramElement::new(1, 1);
        let mut vc = visible(&classifier, &element);

        let requested = Rectangle::new(100.0, 100.0, 40.0, 80.0);
        composer.compose_from_space(&mut vc, requested);
        assert!(vc.space().contains(&requested));
        assert!(vc.bounds().contains(&vc.space()));
        assert!(vc.bounds().width() > requested.width());
    }

    #[test]
    fn test_compact_classifier_has_empty_space() {
        let profile = profile();
        let composer = ClassifierComposer::new(&profile, &FixedAdvanceMeasure);
        let classifier = Classifier::new(1, ClassifierKind::Actor, "Customer");
        let element = DiagramElement::new(1, 1);
        let mut vc = visible(&classifier, &element);

        let min = composer.min_dimensions(&vc, Dimensions::new(500.0, 500.0));
        // icon is 15 x 30, the label is wider
        assert_approx_eq!(f64, min.width(), 8.0 * 12.0 * 0.55, epsilon = 1e-9);
        assert_approx_eq!(f64, min.height(), 30.0 + 4.0 + 13.8, epsilon = 1e-9);

        composer.compose_from_bounds(&mut vc, Rectangle::from_center(Point::new(50.0, 50.0), min));
        assert!(vc.space().is_empty());
        assert_approx_eq!(f64, vc.symbol_box().width(), 15.0);
        assert!(vc.bounds().contains(&vc.symbol_box()));
        assert!(vc.bounds().contains(&vc.label_box()));
    }
}

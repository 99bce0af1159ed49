//! Classifier placement for list, sequence and timing diagrams.
//!
//! Classifiers are partitioned by role and every partition is distributed along
//! one axis of its region. The regions are apportioned with golden-ratio splits:
//!
//! ```text
//!  sequence                          timing
//! ┌──────────────────────┬───────┐  ┌──────┬────────────────────┐
//! │ acting classifiers   │ notes │  │ act. │                    │
//! ├──────────────────────┤       │  │      │     scenario       │
//! │                      ├───────┤  │      │                    │
//! │      scenario        │ refs  │  ├──────┴────────────────────┤
//! │                      │       │  │          notes            │
//! └──────────────────────┴───────┘  └───────────────────────────┘
//! ```

use log::debug;

use tessera_core::{
    geometry::{Dimensions, Rectangle},
    model::DiagramKind,
};

use super::{
    composer::ClassifierComposer,
    data::{ClassifierIndex, LayoutData},
    feature::FeatureLayouter,
    sizes::SizeProfile,
};

const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// Share of a region given to the secondary partition
const MINOR_SHARE: f64 = 1.0 - 1.0 / GOLDEN_RATIO;

/// Placement of a classifier across the distribution axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Alignment {
    Start,
    Center,
    End,
    /// Fill the whole cross extent of the region
    Stretch,
}

pub(crate) struct Classifier1dLayouter<'p> {
    profile: &'p SizeProfile,
    composer: &'p ClassifierComposer<'p>,
    features: &'p FeatureLayouter<'p>,
}

impl<'p> Classifier1dLayouter<'p> {
    pub(crate) fn new(
        profile: &'p SizeProfile,
        composer: &'p ClassifierComposer<'p>,
        features: &'p FeatureLayouter<'p>,
    ) -> Self {
        Self {
            profile,
            composer,
            features,
        }
    }

    fn min_dimensions(&self, data: &LayoutData<'_>, index: ClassifierIndex) -> Dimensions {
        let features = self.features.calculate_features_bounds(data, index);
        self.composer.min_dimensions(data.classifier(index), features)
    }

    /// Places all classifiers of a one-dimensional diagram and records its scenario.
    pub(crate) fn layout(&self, data: &mut LayoutData<'_>, kind: DiagramKind) {
        let draw_area = data.frame().draw_area();
        match kind {
            DiagramKind::Sequence => self.layout_sequence(data, draw_area),
            DiagramKind::Timing => self.layout_timing(data, draw_area),
            _ => {
                let all: Vec<ClassifierIndex> = data.classifier_indices().collect();
                self.layout_along(data, &all, draw_area, false, Alignment::Stretch);
            }
        }
        debug!(
            kind:? = kind,
            classifiers = data.classifiers().len(),
            scenario:? = data.scenario();
            "Placed classifiers along one axis"
        );
    }

    fn layout_sequence(&self, data: &mut LayoutData<'_>, draw_area: Rectangle) {
        let mut notes = Vec::new();
        let mut references = Vec::new();
        let mut acting = Vec::new();
        for index in data.classifier_indices() {
            let kind = data.classifier(index).classifier().kind();
            if kind.is_note_like() {
                notes.push(index);
            } else if kind.is_diagram_reference() {
                references.push(index);
            } else {
                acting.push(index);
            }
        }

        let mut main = draw_area;
        if !notes.is_empty() || !references.is_empty() {
            main = draw_area.with_right(draw_area.right() - draw_area.width() * MINOR_SHARE);
            let side = draw_area.with_left(main.right());
            let (note_area, reference_area) = match (notes.is_empty(), references.is_empty()) {
                (false, false) => {
                    let split = side.top() + side.height() / GOLDEN_RATIO;
                    (side.with_bottom(split), side.with_top(split))
                }
                _ => (side, side),
            };
            self.layout_along(data, &notes, note_area, false, Alignment::Stretch);
            self.layout_along(data, &references, reference_area, false, Alignment::Start);
        }

        let header_height = acting
            .iter()
            .map(|&index| self.min_dimensions(data, index).height())
            .fold(0.0, f64::max)
            + self.profile.object_distance();
        let header_height = header_height.min(main.height() * MINOR_SHARE);
        let header = main.with_bottom(main.top() + header_height);
        self.layout_along(data, &acting, header, true, Alignment::Center);
        data.set_scenario(main.with_top(header.bottom()));
    }

    fn layout_timing(&self, data: &mut LayoutData<'_>, draw_area: Rectangle) {
        let (notes, acting): (Vec<_>, Vec<_>) = data
            .classifier_indices()
            .partition(|&index| data.classifier(index).classifier().kind().is_note_like());

        let mut main = draw_area;
        if !notes.is_empty() {
            main = draw_area.with_bottom(draw_area.bottom() - draw_area.height() * MINOR_SHARE);
            let band = draw_area.with_top(main.bottom());
            self.layout_along(data, &notes, band, true, Alignment::Stretch);
        }

        let column_width = acting
            .iter()
            .map(|&index| self.min_dimensions(data, index).width())
            .fold(0.0, f64::max)
            + self.profile.object_distance();
        let column_width = column_width.min(main.width() * MINOR_SHARE);
        let column = main.with_right(main.left() + column_width);
        // flush right, so every lifeline starts at the scenario's left edge
        self.layout_along(data, &acting, column, false, Alignment::End);
        data.set_scenario(main.with_left(column.right()));
    }

    /// Distributes classifiers along one axis of `area` in list order.
    ///
    /// Each classifier's envelope is its minimum extent plus half the object
    /// distance on both sides; the area's length is divided in proportion to the
    /// envelopes.
    pub(crate) fn layout_along(
        &self,
        data: &mut LayoutData<'_>,
        indices: &[ClassifierIndex],
        area: Rectangle,
        horizontal: bool,
        alignment: Alignment,
    ) {
        if indices.is_empty() {
            return;
        }
        let mut sorted = indices.to_vec();
        sorted.sort_by_key(|&index| (data.classifier(index).classifier().list_order(), index));

        let margin = self.profile.object_distance() / 2.0;
        let sized: Vec<(ClassifierIndex, Dimensions)> = sorted
            .into_iter()
            .map(|index| (index, self.min_dimensions(data, index)))
            .collect();
        let total: f64 = sized
            .iter()
            .map(|(_, min)| min.extent(horizontal) + 2.0 * margin)
            .sum();
        let factor = if total > 0.0 {
            area.extent(horizontal) / total
        } else {
            0.0
        };

        let cross_start = area.start(!horizontal);
        let cross_extent = area.extent(!horizontal);
        let mut position = area.start(horizontal);
        for (index, min) in sized {
            let band = (min.extent(horizontal) + 2.0 * margin) * factor;
            let along_start = position + margin * factor;
            let along_extent = min.extent(horizontal) * factor;

            let extent = match alignment {
                Alignment::Stretch => cross_extent,
                _ => min.extent(!horizontal).min(cross_extent),
            };
            let start = match alignment {
                Alignment::Start | Alignment::Stretch => cross_start,
                Alignment::Center => cross_start + (cross_extent - extent) / 2.0,
                Alignment::End => cross_start + cross_extent - extent,
            };

            let bounds = if horizontal {
                Rectangle::new(along_start, start, along_extent, extent)
            } else {
                Rectangle::new(start, along_start, extent, along_extent)
            };
            self.composer
                .compose_from_bounds(data.classifier_mut(index), bounds);
            position += band;
        }
    }
}

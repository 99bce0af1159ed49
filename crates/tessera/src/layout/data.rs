//! The arena of one layout pass.
//!
//! [`LayoutData`] owns every layout object of a diagram. Objects refer to each
//! other through typed indices into the arena ([`ClassifierIndex`],
//! [`FeatureIndex`], [`RelationshipIndex`]) and borrow the model elements they
//! lay out from the snapshot.
//!
//! The arena is created with empty geometry; the classifier, feature and
//! relationship layouters fill it in, each during its own phase.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, trace};

use tessera_core::{
    geometry::{Connector, Rectangle},
    model::{
        Classifier, ClassifierId, Diagram, DiagramElement, DiagramSnapshot, Feature, FeatureId,
        Relationship,
    },
    text::TextMeasure,
};

use super::sizes::SizeProfile;

macro_rules! define_index {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(usize);

        impl $name {
            pub(crate) fn new(index: usize) -> Self {
                Self(index)
            }

            /// Position in the arena
            pub fn index(self) -> usize {
                self.0
            }
        }
    };
}

define_index!(
    /// Handle of a [`VisibleClassifier`] in [`LayoutData`]
    ClassifierIndex
);
define_index!(
    /// Handle of a [`LayoutFeature`] in [`LayoutData`]
    FeatureIndex
);
define_index!(
    /// Handle of a [`LayoutRelationship`] in [`LayoutData`]
    RelationshipIndex
);

/// Frame of the diagram: its outer bounds, title and the area inside the frame.
#[derive(Debug, Clone)]
pub struct DiagramFrame<'a> {
    diagram: &'a Diagram,
    bounds: Rectangle,
    label_box: Rectangle,
    draw_area: Rectangle,
}

impl<'a> DiagramFrame<'a> {
    /// Places the title in the top left corner and derives the draw area below it.
    pub(crate) fn new(
        diagram: &'a Diagram,
        bounds: Rectangle,
        profile: &SizeProfile,
        measure: &dyn TextMeasure,
    ) -> Self {
        let border = profile.object_border();
        let label = measure.measure_text(diagram.name(), &profile.title_font());
        let inner = bounds.expanded(-border, -border);
        let label_box = Rectangle::new(
            inner.left(),
            inner.top(),
            label.width().min(inner.width()),
            label.height().min(inner.height()),
        );
        let draw_area = if label_box.is_empty() {
            inner
        } else {
            inner.with_top((label_box.bottom() + border).min(inner.bottom()))
        };
        Self {
            diagram,
            bounds,
            label_box,
            draw_area,
        }
    }

    pub fn diagram(&self) -> &'a Diagram {
        self.diagram
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    pub fn label_box(&self) -> Rectangle {
        self.label_box
    }

    /// Area available to classifiers
    pub fn draw_area(&self) -> Rectangle {
        self.draw_area
    }
}

/// A classifier placement being laid out.
///
/// - `bounds` is the outer rectangle, including the label of icon-shaped kinds
/// - `symbol_box` is the drawn symbol (the box, or the icon)
/// - `label_box` holds the name and stereotype
/// - `space` is the inner area available to features and contained classifiers
#[derive(Debug, Clone)]
pub struct VisibleClassifier<'a> {
    classifier: &'a Classifier,
    element: &'a DiagramElement,
    label: String,
    bounds: Rectangle,
    space: Rectangle,
    label_box: Rectangle,
    symbol_box: Rectangle,
}

impl<'a> VisibleClassifier<'a> {
    fn new(classifier: &'a Classifier, element: &'a DiagramElement) -> Self {
        Self {
            classifier,
            element,
            label: element.label(classifier),
            bounds: Rectangle::default(),
            space: Rectangle::default(),
            label_box: Rectangle::default(),
            symbol_box: Rectangle::default(),
        }
    }

    pub fn classifier(&self) -> &'a Classifier {
        self.classifier
    }

    pub fn element(&self) -> &'a DiagramElement {
        self.element
    }

    /// Name text as displayed
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    pub fn space(&self) -> Rectangle {
        self.space
    }

    pub fn label_box(&self) -> Rectangle {
        self.label_box
    }

    pub fn symbol_box(&self) -> Rectangle {
        self.symbol_box
    }

    pub(crate) fn set_geometry(
        &mut self,
        bounds: Rectangle,
        symbol_box: Rectangle,
        label_box: Rectangle,
        space: Rectangle,
    ) {
        self.bounds = bounds;
        self.symbol_box = symbol_box;
        self.label_box = label_box;
        self.space = space;
    }

    /// Moves all rectangles of the classifier
    pub(crate) fn shift(&mut self, dx: f64, dy: f64) {
        self.bounds.shift(dx, dy);
        self.space.shift(dx, dy);
        self.label_box.shift(dx, dy);
        self.symbol_box.shift(dx, dy);
    }
}

/// A feature being laid out, owned by one classifier placement.
#[derive(Debug, Clone)]
pub struct LayoutFeature<'a> {
    feature: &'a Feature,
    classifier: ClassifierIndex,
    bounds: Rectangle,
    label_box: Rectangle,
}

impl<'a> LayoutFeature<'a> {
    pub fn feature(&self) -> &'a Feature {
        self.feature
    }

    /// The owning classifier placement
    pub fn classifier(&self) -> ClassifierIndex {
        self.classifier
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    pub fn label_box(&self) -> Rectangle {
        self.label_box
    }

    pub(crate) fn set_geometry(&mut self, bounds: Rectangle, label_box: Rectangle) {
        self.bounds = bounds;
        self.label_box = label_box;
    }
}

/// Whether and how a relationship is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Show,
    GrayOut,
    /// Computed but not drawn; its meaning is conveyed otherwise
    Implicit,
}

/// A relationship between two classifier placements being laid out.
#[derive(Debug, Clone)]
pub struct LayoutRelationship<'a> {
    relationship: &'a Relationship,
    from: ClassifierIndex,
    to: ClassifierIndex,
    from_feature: Option<FeatureIndex>,
    to_feature: Option<FeatureIndex>,
    shape: Connector,
    label_box: Rectangle,
    visibility: Visibility,
}

impl<'a> LayoutRelationship<'a> {
    pub fn relationship(&self) -> &'a Relationship {
        self.relationship
    }

    /// Placement the relationship starts at
    pub fn from_classifier(&self) -> ClassifierIndex {
        self.from
    }

    /// Placement the relationship ends at
    pub fn to_classifier(&self) -> ClassifierIndex {
        self.to
    }

    pub fn from_feature(&self) -> Option<FeatureIndex> {
        self.from_feature
    }

    pub fn to_feature(&self) -> Option<FeatureIndex> {
        self.to_feature
    }

    pub fn shape(&self) -> &Connector {
        &self.shape
    }

    pub fn label_box(&self) -> Rectangle {
        self.label_box
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub(crate) fn set_shape(&mut self, shape: Connector, label_box: Rectangle) {
        self.shape = shape;
        self.label_box = label_box;
    }

    pub(crate) fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }
}

/// All layout objects of one diagram.
#[derive(Debug, Clone)]
pub struct LayoutData<'a> {
    frame: DiagramFrame<'a>,
    classifiers: Vec<VisibleClassifier<'a>>,
    features: Vec<LayoutFeature<'a>>,
    relationships: Vec<LayoutRelationship<'a>>,
    scenario: Option<Rectangle>,
}

impl<'a> LayoutData<'a> {
    /// Instantiates the layout objects of a validated snapshot.
    ///
    /// Every diagram element becomes one visible classifier. Features and
    /// relationships are instantiated once per placement (combination) of their
    /// classifiers. Lifelines belong to the placement that focuses them; on
    /// interaction diagrams only lifelines are shown.
    pub(crate) fn new(snapshot: &'a DiagramSnapshot, frame: DiagramFrame<'a>) -> Self {
        let kind = snapshot.diagram().kind();
        let models: IndexMap<ClassifierId, &'a Classifier> = snapshot
            .classifiers()
            .iter()
            .map(|classifier| (classifier.id(), classifier))
            .collect();

        let mut classifiers = Vec::new();
        let mut placements: IndexMap<ClassifierId, Vec<ClassifierIndex>> = IndexMap::new();
        for element in snapshot.elements() {
            let Some(classifier) = models.get(&element.classifier_id()) else {
                continue;
            };
            placements
                .entry(classifier.id())
                .or_default()
                .push(ClassifierIndex::new(classifiers.len()));
            classifiers.push(VisibleClassifier::new(classifier, element));
        }

        let mut features = Vec::new();
        let mut feature_lookup: HashMap<(FeatureId, ClassifierIndex), FeatureIndex> =
            HashMap::new();
        for feature in snapshot.features() {
            let owners = placements
                .get(&feature.classifier_id())
                .map(Vec::as_slice)
                .unwrap_or_default();
            for &owner in owners {
                let element = classifiers[owner.index()].element;
                let shown = if feature.kind().is_lifeline() {
                    element.focused_feature() == Some(feature.id())
                } else {
                    !kind.is_interaction()
                };
                if !shown {
                    continue;
                }
                let index = FeatureIndex::new(features.len());
                feature_lookup.insert((feature.id(), owner), index);
                features.push(LayoutFeature {
                    feature,
                    classifier: owner,
                    bounds: Rectangle::default(),
                    label_box: Rectangle::default(),
                });
            }
        }

        // Unresolved features: on interaction diagrams the placement takes no part
        // in the message; elsewhere the end attaches to the classifier itself.
        let resolve = |feature: Option<FeatureId>, owner: ClassifierIndex| match feature {
            None => Some(None),
            Some(id) => match feature_lookup.get(&(id, owner)) {
                Some(&index) => Some(Some(index)),
                None if kind.is_interaction() => None,
                None => Some(None),
            },
        };

        let mut relationships = Vec::new();
        for relationship in snapshot.relationships() {
            let (Some(sources), Some(targets)) = (
                placements.get(&relationship.from_classifier_id()),
                placements.get(&relationship.to_classifier_id()),
            ) else {
                continue;
            };
            for &from in sources {
                for &to in targets {
                    let (Some(from_feature), Some(to_feature)) = (
                        resolve(relationship.from_feature_id(), from),
                        resolve(relationship.to_feature_id(), to),
                    ) else {
                        debug!(
                            relationship = relationship.id().value(),
                            from = from.index(),
                            to = to.index();
                            "Skipping relationship between placements without its features"
                        );
                        continue;
                    };
                    relationships.push(LayoutRelationship {
                        relationship,
                        from,
                        to,
                        from_feature,
                        to_feature,
                        shape: Connector::default(),
                        label_box: Rectangle::default(),
                        visibility: Visibility::Show,
                    });
                }
            }
        }

        debug!(
            classifiers = classifiers.len(),
            features = features.len(),
            relationships = relationships.len();
            "Instantiated layout objects"
        );
        trace!(placements:?; "Classifier placements");

        Self {
            frame,
            classifiers,
            features,
            relationships,
            scenario: None,
        }
    }

    pub fn frame(&self) -> &DiagramFrame<'a> {
        &self.frame
    }

    pub fn classifiers(&self) -> &[VisibleClassifier<'a>] {
        &self.classifiers
    }

    pub fn features(&self) -> &[LayoutFeature<'a>] {
        &self.features
    }

    pub fn relationships(&self) -> &[LayoutRelationship<'a>] {
        &self.relationships
    }

    pub fn classifier(&self, index: ClassifierIndex) -> &VisibleClassifier<'a> {
        &self.classifiers[index.0]
    }

    pub fn feature(&self, index: FeatureIndex) -> &LayoutFeature<'a> {
        &self.features[index.0]
    }

    pub fn relationship(&self, index: RelationshipIndex) -> &LayoutRelationship<'a> {
        &self.relationships[index.0]
    }

    pub(crate) fn classifier_mut(&mut self, index: ClassifierIndex) -> &mut VisibleClassifier<'a> {
        &mut self.classifiers[index.0]
    }

    pub(crate) fn feature_mut(&mut self, index: FeatureIndex) -> &mut LayoutFeature<'a> {
        &mut self.features[index.0]
    }

    pub(crate) fn relationship_mut(
        &mut self,
        index: RelationshipIndex,
    ) -> &mut LayoutRelationship<'a> {
        &mut self.relationships[index.0]
    }

    pub fn classifier_indices(&self) -> impl Iterator<Item = ClassifierIndex> {
        (0..self.classifiers.len()).map(ClassifierIndex::new)
    }

    pub fn feature_indices(&self) -> impl Iterator<Item = FeatureIndex> {
        (0..self.features.len()).map(FeatureIndex::new)
    }

    pub fn relationship_indices(&self) -> impl Iterator<Item = RelationshipIndex> {
        (0..self.relationships.len()).map(RelationshipIndex::new)
    }

    /// Returns the features owned by a classifier placement
    pub fn features_of(
        &self,
        classifier: ClassifierIndex,
    ) -> impl Iterator<Item = FeatureIndex> {
        self.feature_indices()
            .filter(move |&index| self.features[index.0].classifier == classifier)
    }

    /// Region spanned by lifelines on interaction diagrams
    pub fn scenario(&self) -> Option<Rectangle> {
        self.scenario
    }

    pub(crate) fn set_scenario(&mut self, scenario: Rectangle) {
        self.scenario = Some(scenario);
    }
}


#[cfg(test)]
mod tests {
    use tessera_core::{
        model::{ClassifierKind, DiagramKind, FeatureKind, RelationshipKind},
        text::FixedAdvanceMeasure,
    };

    use super::*;
    use crate::config::SizeConfig;

    fn frame_for(diagram: &Diagram) -> DiagramFrame<'_> {
        let bounds = Rectangle::new(0.0, 0.0, 480.0, 480.0);
        let profile = SizeProfile::new(&SizeConfig::default(), &bounds);
        DiagramFrame::new(diagram, bounds, &profile, &FixedAdvanceMeasure)
    }

    #[test]
    fn test_frame_places_title_above_draw_area() {
        let diagram = Diagram::new(1, DiagramKind::Class, "Title");
        let frame = frame_for(&diagram);
        let border = 10.0 / 3.0;
        assert!(frame.label_box().width() > 0.0);
        assert!(frame.draw_area().top() > frame.label_box().bottom());
        assert!(frame.bounds().contains(&frame.draw_area()));
        assert!((frame.draw_area().left() - border).abs() < 1e-9);

        let untitled = Diagram::new(2, DiagramKind::Class, "");
        let frame = frame_for(&untitled);
        assert!((frame.draw_area().top() - border).abs() < 1e-9);
    }

    #[test]
    fn test_multiple_placements_multiply_relationships() {
        let snapshot = DiagramSnapshot::new(Diagram::new(1, DiagramKind::Class, ""))
            .with_placed_classifier(Classifier::new(1, ClassifierKind::Class, "A"))
            .with_placed_classifier(Classifier::new(2, ClassifierKind::Class, "B"))
            .with_element(DiagramElement::new(3, 2))
            .with_feature(Feature::new(1, FeatureKind::Property, 2, "x"))
            .with_relationship(Relationship::new(1, RelationshipKind::Association, 1, 2));
        let data = LayoutData::new(&snapshot, frame_for(snapshot.diagram()));

        assert_eq!(data.classifiers().len(), 3);
        assert_eq!(data.features().len(), 2);
        assert_eq!(data.relationships().len(), 2);
        assert_eq!(data.features_of(ClassifierIndex::new(2)).count(), 1);
    }

    #[test]
    fn test_lifelines_follow_focus_on_interaction_diagrams() {
        let snapshot = DiagramSnapshot::new(Diagram::new(1, DiagramKind::Sequence, ""))
            .with_classifier(Classifier::new(1, ClassifierKind::Object, "A"))
            .with_classifier(Classifier::new(2, ClassifierKind::Object, "B"))
            .with_feature(Feature::new(10, FeatureKind::Lifeline, 1, ""))
            .with_feature(Feature::new(11, FeatureKind::Lifeline, 1, ""))
            .with_feature(Feature::new(12, FeatureKind::Property, 1, "hidden"))
            .with_feature(Feature::new(20, FeatureKind::Lifeline, 2, ""))
            .with_element(DiagramElement::new(1, 1).with_focused_feature(10))
            .with_element(DiagramElement::new(2, 2).with_focused_feature(20))
            .with_relationship(
                Relationship::new(1, RelationshipKind::SyncMessage, 1, 2).with_features(10, 20),
            )
            .with_relationship(
                Relationship::new(2, RelationshipKind::SyncMessage, 1, 2).with_features(11, 20),
            );
        let data = LayoutData::new(&snapshot, frame_for(snapshot.diagram()));

        let shown: Vec<i64> = data
            .features()
            .iter()
            .map(|f| f.feature().id().value())
            .collect();
        assert_eq!(shown, vec![10, 20]);
        // the message from the unfocused lifeline has no placement to run between
        assert_eq!(data.relationships().len(), 1);
        assert_eq!(data.relationships()[0].from_feature(), Some(FeatureIndex::new(0)));
    }
}

//! The read-only input of one layout pass.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{Classifier, ClassifierId, Diagram, DiagramElement, Feature, FeatureId, Relationship};
use crate::error::SnapshotError;

/// A diagram together with everything placed on it.
///
/// Build it from the model store, then [`validate`](Self::validate) it; the layout
/// engine rejects invalid snapshots before any work starts.
///
/// # Examples
///
/// ```
/// # use tessera_core::model::*;
/// let snapshot = DiagramSnapshot::new(Diagram::new(1, DiagramKind::Class, "Shop"))
///     .with_classifier(Classifier::new(1, ClassifierKind::Class, "Order"))
///     .with_classifier(Classifier::new(2, ClassifierKind::Class, "Item"))
///     .with_element(DiagramElement::new(1, 1))
///     .with_element(DiagramElement::new(2, 2))
///     .with_relationship(Relationship::new(1, RelationshipKind::Composition, 1, 2));
/// assert!(snapshot.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramSnapshot {
    diagram: Diagram,
    #[serde(default)]
    classifiers: Vec<Classifier>,
    #[serde(default)]
    features: Vec<Feature>,
    #[serde(default)]
    relationships: Vec<Relationship>,
    #[serde(default)]
    elements: Vec<DiagramElement>,
}

impl DiagramSnapshot {
    pub fn new(diagram: Diagram) -> Self {
        Self {
            diagram,
            classifiers: Vec::new(),
            features: Vec::new(),
            relationships: Vec::new(),
            elements: Vec::new(),
        }
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifiers.push(classifier);
        self
    }

    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.push(relationship);
        self
    }

    pub fn with_element(mut self, element: DiagramElement) -> Self {
        self.elements.push(element);
        self
    }

    /// Adds a classifier together with a default placement of it.
    ///
    /// The placement takes the classifier's id as its own.
    pub fn with_placed_classifier(self, classifier: Classifier) -> Self {
        let element = DiagramElement::new(classifier.id().value(), classifier.id());
        self.with_classifier(classifier).with_element(element)
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn classifiers(&self) -> &[Classifier] {
        &self.classifiers
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn elements(&self) -> &[DiagramElement] {
        &self.elements
    }

    pub fn classifier(&self, id: ClassifierId) -> Option<&Classifier> {
        self.classifiers.iter().find(|c| c.id() == id)
    }

    pub fn feature(&self, id: FeatureId) -> Option<&Feature> {
        self.features.iter().find(|f| f.id() == id)
    }

    /// Checks all cross references of the snapshot.
    ///
    /// # Errors
    ///
    /// Returns the first [`SnapshotError`] found: duplicate ids, placements of
    /// unknown classifiers, features without owner, or relationships referencing
    /// unknown classifiers or features not owned by their endpoints.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let classifier_ids = unique_ids(
            "classifier",
            self.classifiers.iter().map(|c| c.id().value()),
        )?;
        unique_ids(
            "diagram element",
            self.elements.iter().map(|e| e.id().value()),
        )?;
        unique_ids(
            "relationship",
            self.relationships.iter().map(|r| r.id().value()),
        )?;
        unique_ids("feature", self.features.iter().map(|f| f.id().value()))?;

        let mut feature_owner = HashMap::new();
        for feature in &self.features {
            if !classifier_ids.contains(&feature.classifier_id().value()) {
                return Err(SnapshotError::FeatureWithoutOwner {
                    feature: feature.id().value(),
                    classifier: feature.classifier_id().value(),
                });
            }
            feature_owner.insert(feature.id(), feature.classifier_id());
        }

        for element in &self.elements {
            if !classifier_ids.contains(&element.classifier_id().value()) {
                return Err(SnapshotError::UnknownClassifier {
                    element: element.id().value(),
                    classifier: element.classifier_id().value(),
                });
            }
            if let Some(feature) = element.focused_feature() {
                if feature_owner.get(&feature) != Some(&element.classifier_id()) {
                    return Err(SnapshotError::ForeignFocusedFeature {
                        element: element.id().value(),
                        feature: feature.value(),
                    });
                }
            }
        }

        for relationship in &self.relationships {
            let ends = [
                (relationship.from_classifier_id(), relationship.from_feature_id()),
                (relationship.to_classifier_id(), relationship.to_feature_id()),
            ];
            for (classifier, feature) in ends {
                if !classifier_ids.contains(&classifier.value()) {
                    return Err(SnapshotError::DanglingRelationship {
                        relationship: relationship.id().value(),
                        classifier: classifier.value(),
                    });
                }
                let Some(feature) = feature else {
                    continue;
                };
                match feature_owner.get(&feature) {
                    None => {
                        return Err(SnapshotError::DanglingFeature {
                            relationship: relationship.id().value(),
                            feature: feature.value(),
                        });
                    }
                    Some(owner) if *owner != classifier => {
                        return Err(SnapshotError::MismatchedFeature {
                            relationship: relationship.id().value(),
                            feature: feature.value(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        Ok(())
    }
}

fn unique_ids(
    kind: &'static str,
    ids: impl Iterator<Item = i64>,
) -> Result<HashSet<i64>, SnapshotError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(SnapshotError::DuplicateId { kind, id });
        }
    }
    Ok(seen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassifierKind, DiagramKind, FeatureKind, RelationshipKind};

    fn base() -> DiagramSnapshot {
        DiagramSnapshot::new(Diagram::new(1, DiagramKind::Sequence, "Checkout"))
            .with_placed_classifier(Classifier::new(1, ClassifierKind::Object, "Client"))
            .with_placed_classifier(Classifier::new(2, ClassifierKind::Object, "Server"))
            .with_feature(Feature::new(10, FeatureKind::Lifeline, 1, ""))
            .with_feature(Feature::new(20, FeatureKind::Lifeline, 2, ""))
    }

    #[test]
    fn test_valid_snapshot() {
        let snapshot = base().with_relationship(
            Relationship::new(1, RelationshipKind::SyncMessage, 1, 2).with_features(10, 20),
        );
        assert_eq!(snapshot.validate(), Ok(()));
        assert_eq!(snapshot.elements().len(), 2);
        assert_eq!(
            snapshot.classifier(ClassifierId::new(2)).map(Classifier::name),
            Some("Server")
        );
    }

    #[test]
    fn test_duplicate_classifier_id() {
        let snapshot = base().with_classifier(Classifier::new(1, ClassifierKind::Class, "Again"));
        assert_eq!(
            snapshot.validate(),
            Err(SnapshotError::DuplicateId {
                kind: "classifier",
                id: 1
            })
        );
    }

    #[test]
    fn test_dangling_relationship() {
        let snapshot =
            base().with_relationship(Relationship::new(5, RelationshipKind::Association, 1, 99));
        assert_eq!(
            snapshot.validate(),
            Err(SnapshotError::DanglingRelationship {
                relationship: 5,
                classifier: 99
            })
        );
    }

    #[test]
    fn test_mismatched_feature() {
        let snapshot = base().with_relationship(
            Relationship::new(5, RelationshipKind::SyncMessage, 1, 2).with_features(20, 10),
        );
        assert_eq!(
            snapshot.validate(),
            Err(SnapshotError::MismatchedFeature {
                relationship: 5,
                feature: 20
            })
        );
    }

    #[test]
    fn test_unknown_placement_and_focus() {
        let unknown = base().with_element(DiagramElement::new(9, 42));
        assert_eq!(
            unknown.validate(),
            Err(SnapshotError::UnknownClassifier {
                element: 9,
                classifier: 42
            })
        );

        let foreign = base().with_element(DiagramElement::new(9, 1).with_focused_feature(20));
        assert_eq!(
            foreign.validate(),
            Err(SnapshotError::ForeignFocusedFeature {
                element: 9,
                feature: 20
            })
        );
    }

    #[test]
    fn test_feature_without_owner() {
        let snapshot = base().with_feature(Feature::new(30, FeatureKind::Port, 7, "p"));
        assert_eq!(
            snapshot.validate(),
            Err(SnapshotError::FeatureWithoutOwner {
                feature: 30,
                classifier: 7
            })
        );
    }
}

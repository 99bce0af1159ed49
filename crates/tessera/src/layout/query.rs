//! Position queries over a computed layout.

use log::trace;

use tessera_core::model::{ClassifierId, DiagramElementId, DiagramId, FeatureId, RelationshipId};

use super::{
    Layout,
    data::{ClassifierIndex, Visibility},
};

/// A model object shown on the diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectRef {
    Diagram(DiagramId),
    Classifier {
        classifier: ClassifierId,
        element: DiagramElementId,
    },
    /// A feature as shown by one classifier placement
    Feature {
        feature: FeatureId,
        element: DiagramElementId,
    },
    Relationship(RelationshipId),
}

/// Result of [`Layout::object_id_at_position`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionHit {
    selected: ObjectRef,
    surrounding: ObjectRef,
}

impl PositionHit {
    /// The topmost object at the position
    pub fn selected(&self) -> ObjectRef {
        self.selected
    }

    /// The object whose inner area holds the position, the diagram if there is none
    pub fn surrounding(&self) -> ObjectRef {
        self.surrounding
    }
}

/// Grid orders of a position, as a new classifier placed there would get them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridOrder {
    x_order: i32,
    y_order: i32,
}

impl GridOrder {
    pub fn x_order(&self) -> i32 {
        self.x_order
    }

    pub fn y_order(&self) -> i32 {
        self.y_order
    }
}

impl Layout<'_> {
    fn classifier_ref(&self, index: ClassifierIndex) -> ObjectRef {
        let placement = self.data.classifier(index);
        ObjectRef::Classifier {
            classifier: placement.classifier().id(),
            element: placement.element().id(),
        }
    }

    /// Finds the object at a position and the object surrounding it.
    ///
    /// Features take precedence over relationships, which take precedence over
    /// classifiers; among overlapping classifiers the smallest wins. Returns `None`
    /// outside the diagram bounds.
    pub fn object_id_at_position(&self, x: f64, y: f64) -> Option<PositionHit> {
        let frame = self.data.frame();
        if !frame.bounds().contains_point(x, y) {
            return None;
        }
        let diagram = ObjectRef::Diagram(frame.diagram().id());

        let feature = self
            .data
            .features()
            .iter()
            .filter(|f| f.bounds().contains_point(x, y) || f.label_box().contains_point(x, y))
            .min_by(|a, b| a.bounds().area().total_cmp(&b.bounds().area()));
        if let Some(feature) = feature {
            let hit = PositionHit {
                selected: ObjectRef::Feature {
                    feature: feature.feature().id(),
                    element: self.data.classifier(feature.classifier()).element().id(),
                },
                surrounding: self.classifier_ref(feature.classifier()),
            };
            trace!(hit:?; "Feature at position");
            return Some(hit);
        }

        let tolerance = self.profile.object_border();
        let relationship = self
            .data
            .relationships()
            .iter()
            .filter(|r| r.visibility() != Visibility::Implicit)
            .map(|r| (r.shape().distance_to(x, y), r))
            .filter(|(distance, r)| *distance <= tolerance || r.label_box().contains_point(x, y))
            .min_by(|a, b| a.0.total_cmp(&b.0));
        if let Some((_, relationship)) = relationship {
            return Some(PositionHit {
                selected: ObjectRef::Relationship(relationship.relationship().id()),
                surrounding: diagram,
            });
        }

        let smallest = |candidates: &mut dyn Iterator<Item = ClassifierIndex>| {
            candidates.min_by(|&a, &b| {
                let area = |index| self.data.classifier(index).bounds().area();
                area(a).total_cmp(&area(b))
            })
        };
        let selected = smallest(
            &mut self
                .data
                .classifier_indices()
                .filter(|&i| self.data.classifier(i).bounds().contains_point(x, y)),
        );
        let Some(selected) = selected else {
            return Some(PositionHit {
                selected: diagram,
                surrounding: diagram,
            });
        };

        let surrounding = if self.data.classifier(selected).space().contains_point(x, y) {
            Some(selected)
        } else {
            smallest(&mut self.data.classifier_indices().filter(|&i| {
                i != selected && self.data.classifier(i).space().contains_point(x, y)
            }))
        };
        Some(PositionHit {
            selected: self.classifier_ref(selected),
            surrounding: surrounding.map_or(diagram, |index| self.classifier_ref(index)),
        })
    }

    /// Maps a position to grid orders, snapping to nearby defined orders.
    ///
    /// Returns `None` outside the diagram bounds.
    pub fn order_at_position(&self, x: f64, y: f64) -> Option<GridOrder> {
        if !self.data.frame().bounds().contains_point(x, y) {
            return None;
        }
        Some(GridOrder {
            x_order: self.x_scale.order(x, self.snap_interval),
            y_order: self.y_scale.order(y, self.snap_interval),
        })
    }
}

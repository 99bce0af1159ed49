//! Model elements referenced by a layout pass.

use serde::{Deserialize, Serialize};

use super::{
    ClassifierId, ClassifierKind, DiagramElementId, FeatureId, FeatureKind, RelationshipId,
    RelationshipKind,
};

/// A model element displayed as a box or icon.
///
/// `x_order` and `y_order` place the classifier on free-form diagrams through the
/// non-linear scales; `list_order` orders it on one-dimensional diagrams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classifier {
    id: ClassifierId,
    kind: ClassifierKind,
    name: String,
    #[serde(default)]
    stereotype: Option<String>,
    #[serde(default)]
    x_order: i32,
    #[serde(default)]
    y_order: i32,
    #[serde(default)]
    list_order: i32,
}

impl Classifier {
    pub fn new(id: impl Into<ClassifierId>, kind: ClassifierKind, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            stereotype: None,
            x_order: 0,
            y_order: 0,
            list_order: 0,
        }
    }

    /// Sets the free-form placement orders
    pub fn with_orders(mut self, x_order: i32, y_order: i32) -> Self {
        self.x_order = x_order;
        self.y_order = y_order;
        self
    }

    pub fn with_list_order(mut self, list_order: i32) -> Self {
        self.list_order = list_order;
        self
    }

    pub fn with_stereotype(mut self, stereotype: impl Into<String>) -> Self {
        self.stereotype = Some(stereotype.into());
        self
    }

    pub fn id(&self) -> ClassifierId {
        self.id
    }

    pub fn kind(&self) -> ClassifierKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stereotype(&self) -> Option<&str> {
        self.stereotype.as_deref()
    }

    pub fn x_order(&self) -> i32 {
        self.x_order
    }

    pub fn y_order(&self) -> i32 {
        self.y_order
    }

    pub fn list_order(&self) -> i32 {
        self.list_order
    }
}

/// A model element owned by a classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    id: FeatureId,
    kind: FeatureKind,
    classifier_id: ClassifierId,
    key: String,
    #[serde(default)]
    value: String,
    #[serde(default)]
    list_order: i32,
}

impl Feature {
    pub fn new(
        id: impl Into<FeatureId>,
        kind: FeatureKind,
        classifier_id: impl Into<ClassifierId>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            classifier_id: classifier_id.into(),
            key: key.into(),
            value: String::new(),
            list_order: 0,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_list_order(mut self, list_order: i32) -> Self {
        self.list_order = list_order;
        self
    }

    pub fn id(&self) -> FeatureId {
        self.id
    }

    pub fn kind(&self) -> FeatureKind {
        self.kind
    }

    pub fn classifier_id(&self) -> ClassifierId {
        self.classifier_id
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn list_order(&self) -> i32 {
        self.list_order
    }

    /// Text of the feature's row: `key: value`, or the key alone.
    pub fn label(&self) -> String {
        if self.value.is_empty() {
            self.key.clone()
        } else {
            format!("{}: {}", self.key, self.value)
        }
    }
}

/// A directed relationship between two classifiers.
///
/// On interaction diagrams the optional features name the lifelines a message
/// runs between.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    id: RelationshipId,
    kind: RelationshipKind,
    #[serde(default)]
    name: String,
    from_classifier_id: ClassifierId,
    to_classifier_id: ClassifierId,
    #[serde(default)]
    from_feature_id: Option<FeatureId>,
    #[serde(default)]
    to_feature_id: Option<FeatureId>,
    #[serde(default)]
    list_order: i32,
}

impl Relationship {
    pub fn new(
        id: impl Into<RelationshipId>,
        kind: RelationshipKind,
        from_classifier_id: impl Into<ClassifierId>,
        to_classifier_id: impl Into<ClassifierId>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            name: String::new(),
            from_classifier_id: from_classifier_id.into(),
            to_classifier_id: to_classifier_id.into(),
            from_feature_id: None,
            to_feature_id: None,
            list_order: 0,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Attaches both ends to features of the endpoint classifiers
    pub fn with_features(
        mut self,
        from_feature_id: impl Into<FeatureId>,
        to_feature_id: impl Into<FeatureId>,
    ) -> Self {
        self.from_feature_id = Some(from_feature_id.into());
        self.to_feature_id = Some(to_feature_id.into());
        self
    }

    pub fn with_from_feature(mut self, feature_id: impl Into<FeatureId>) -> Self {
        self.from_feature_id = Some(feature_id.into());
        self
    }

    pub fn with_to_feature(mut self, feature_id: impl Into<FeatureId>) -> Self {
        self.to_feature_id = Some(feature_id.into());
        self
    }

    pub fn with_list_order(mut self, list_order: i32) -> Self {
        self.list_order = list_order;
        self
    }

    pub fn id(&self) -> RelationshipId {
        self.id
    }

    pub fn kind(&self) -> RelationshipKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn from_classifier_id(&self) -> ClassifierId {
        self.from_classifier_id
    }

    pub fn to_classifier_id(&self) -> ClassifierId {
        self.to_classifier_id
    }

    pub fn from_feature_id(&self) -> Option<FeatureId> {
        self.from_feature_id
    }

    pub fn to_feature_id(&self) -> Option<FeatureId> {
        self.to_feature_id
    }

    pub fn list_order(&self) -> i32 {
        self.list_order
    }
}

/// Visual emphasis of a placed classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Highlight {
    #[default]
    Normal,
    Emphasis,
    GrayOut,
}

/// Whether a placement shows the classifier as a type or as an instance of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceMode {
    #[default]
    Type,
    Anonymous,
    Named { instance: String },
}

/// Display flags of one placement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayFlags {
    #[serde(default)]
    highlight: Highlight,
    #[serde(default)]
    instance: InstanceMode,
}

impl DisplayFlags {
    pub fn new(highlight: Highlight, instance: InstanceMode) -> Self {
        Self {
            highlight,
            instance,
        }
    }

    pub fn highlight(&self) -> Highlight {
        self.highlight
    }

    pub fn instance(&self) -> &InstanceMode {
        &self.instance
    }

    pub fn is_grayed_out(&self) -> bool {
        self.highlight == Highlight::GrayOut
    }

    pub fn is_emphasized(&self) -> bool {
        self.highlight == Highlight::Emphasis
    }
}

/// One placement of a classifier on the diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramElement {
    id: DiagramElementId,
    classifier_id: ClassifierId,
    #[serde(default)]
    focused_feature: Option<FeatureId>,
    #[serde(default)]
    display: DisplayFlags,
}

impl DiagramElement {
    pub fn new(id: impl Into<DiagramElementId>, classifier_id: impl Into<ClassifierId>) -> Self {
        Self {
            id: id.into(),
            classifier_id: classifier_id.into(),
            focused_feature: None,
            display: DisplayFlags::default(),
        }
    }

    /// Selects the lifeline that belongs to this placement
    pub fn with_focused_feature(mut self, feature_id: impl Into<FeatureId>) -> Self {
        self.focused_feature = Some(feature_id.into());
        self
    }

    pub fn with_display(mut self, display: DisplayFlags) -> Self {
        self.display = display;
        self
    }

    pub fn id(&self) -> DiagramElementId {
        self.id
    }

    pub fn classifier_id(&self) -> ClassifierId {
        self.classifier_id
    }

    pub fn focused_feature(&self) -> Option<FeatureId> {
        self.focused_feature
    }

    pub fn display(&self) -> &DisplayFlags {
        &self.display
    }

    /// Label text of the placed classifier, honoring the instance mode.
    pub fn label(&self, classifier: &Classifier) -> String {
        match &self.display.instance {
            InstanceMode::Type => classifier.name().to_string(),
            InstanceMode::Anonymous => format!(": {}", classifier.name()),
            InstanceMode::Named { instance } => format!("{instance} : {}", classifier.name()),
        }
    }
}

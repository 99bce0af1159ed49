//! Read-only model snapshot consumed by the layout engine.
//!
//! The snapshot is what the model store hands to a layout pass: one diagram, the
//! classifiers placed on it (through [`DiagramElement`]s), their features and the
//! relationships between them. It carries abstract facts only (kinds, order keys,
//! names); no coordinates.
//!
//! # Organization
//!
//! - [`kind`] - Closed enums over diagram, classifier, feature and relationship kinds
//! - [`element`] - [`Classifier`], [`Feature`], [`Relationship`], [`DiagramElement`]
//! - [`snapshot`] - [`DiagramSnapshot`] and its validation

pub mod element;
pub mod kind;
pub mod snapshot;

pub use element::*;
pub use kind::*;
pub use snapshot::*;

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[derive(Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn value(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Identifies a diagram in the model store
    DiagramId
);
define_id!(
    /// Identifies a classifier in the model store
    ClassifierId
);
define_id!(
    /// Identifies a feature in the model store
    FeatureId
);
define_id!(
    /// Identifies a relationship in the model store
    RelationshipId
);
define_id!(
    /// Identifies one placement of a classifier on a diagram
    DiagramElementId
);

/// The diagram being laid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    id: DiagramId,
    kind: DiagramKind,
    name: String,
}

impl Diagram {
    pub fn new(id: impl Into<DiagramId>, kind: DiagramKind, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
        }
    }

    pub fn id(&self) -> DiagramId {
        self.id
    }

    pub fn kind(&self) -> DiagramKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_convert_and_display() {
        let id = ClassifierId::from(7);
        assert_eq!(id, ClassifierId::new(7));
        assert_eq!(id.value(), 7);
        assert_eq!(id.to_string(), "7");
        assert!(FeatureId::new(1) < FeatureId::new(2));
    }

    #[test]
    fn test_diagram_accessors() {
        let diagram = Diagram::new(3, DiagramKind::Class, "Overview");
        assert_eq!(diagram.id(), DiagramId::new(3));
        assert_eq!(diagram.kind(), DiagramKind::Class);
        assert_eq!(diagram.name(), "Overview");
    }
}

//! Error types for the core value types and the model snapshot.

use thiserror::Error;

/// Errors raised by [`NonLinearScale`](crate::scale::NonLinearScale).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScaleError {
    #[error("scale point limit of {limit} exceeded")]
    CapacityExceeded { limit: usize },
}

/// Precondition violations found when validating a
/// [`DiagramSnapshot`](crate::model::DiagramSnapshot).
///
/// A snapshot is rejected before any layout work starts, so none of these are
/// discovered mid-pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: i64 },

    #[error("diagram element {element} references unknown classifier {classifier}")]
    UnknownClassifier { element: i64, classifier: i64 },

    #[error("diagram element {element} focuses feature {feature} of another classifier")]
    ForeignFocusedFeature { element: i64, feature: i64 },

    #[error("feature {feature} references unknown classifier {classifier}")]
    FeatureWithoutOwner { feature: i64, classifier: i64 },

    #[error("relationship {relationship} references unknown classifier {classifier}")]
    DanglingRelationship { relationship: i64, classifier: i64 },

    #[error("relationship {relationship} references unknown feature {feature}")]
    DanglingFeature { relationship: i64, feature: i64 },

    #[error("relationship {relationship} uses feature {feature} not owned by its endpoint")]
    MismatchedFeature { relationship: i64, feature: i64 },
}

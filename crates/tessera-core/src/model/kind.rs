//! Closed kind enums of the model.
//!
//! Layout behavior is dispatched by `match` over these enums; the query methods
//! group kinds the way the layouters need them.

use serde::{Deserialize, Serialize};

/// Kind of diagram, deciding the layout strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagramKind {
    List,
    Box,
    BlockDefinition,
    InternalBlock,
    Parametric,
    Requirement,
    Activity,
    Class,
    Communication,
    Component,
    CompositeStructure,
    Deployment,
    InteractionOverview,
    Package,
    Profile,
    Sequence,
    StateMachine,
    Timing,
    UseCase,
}

impl DiagramKind {
    /// List, sequence and timing diagrams arrange classifiers along one axis.
    pub fn is_one_dimensional(self) -> bool {
        matches!(
            self,
            DiagramKind::List | DiagramKind::Sequence | DiagramKind::Timing
        )
    }

    /// List and box diagrams show classifiers only; all relationships are implicit.
    pub fn shows_relationships(self) -> bool {
        !matches!(self, DiagramKind::List | DiagramKind::Box)
    }

    /// Sequence and timing diagrams show a scenario with lifelines and messages.
    pub fn is_interaction(self) -> bool {
        matches!(self, DiagramKind::Sequence | DiagramKind::Timing)
    }
}

/// Kind of classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    Block,
    ConstraintBlock,
    Requirement,
    Class,
    Interface,
    Component,
    Part,
    Object,
    Package,
    Node,
    Artifact,
    Actor,
    UseCase,
    Activity,
    Action,
    InitialNode,
    FinalNode,
    ForkNode,
    JoinNode,
    DecisionNode,
    State,
    ShallowHistory,
    DeepHistory,
    TimeEvent,
    Interaction,
    DiagramReference,
    Comment,
}

impl ClassifierKind {
    /// Comments and requirements annotate a scenario rather than act in it.
    pub fn is_note_like(self) -> bool {
        matches!(self, ClassifierKind::Comment | ClassifierKind::Requirement)
    }

    pub fn is_diagram_reference(self) -> bool {
        matches!(self, ClassifierKind::DiagramReference)
    }

    /// Compact classifiers are drawn as a fixed icon with the label below it.
    pub fn is_compact(self) -> bool {
        matches!(
            self,
            ClassifierKind::Actor
                | ClassifierKind::InitialNode
                | ClassifierKind::FinalNode
                | ClassifierKind::ForkNode
                | ClassifierKind::JoinNode
                | ClassifierKind::DecisionNode
                | ClassifierKind::ShallowHistory
                | ClassifierKind::DeepHistory
                | ClassifierKind::TimeEvent
        )
    }

    /// Width-to-height ratio of the icon of a compact classifier.
    pub fn icon_aspect_ratio(self) -> f64 {
        match self {
            ClassifierKind::Actor => 0.5,
            ClassifierKind::ForkNode | ClassifierKind::JoinNode => 4.0,
            ClassifierKind::TimeEvent => 0.75,
            _ => 1.0,
        }
    }
}

/// Kind of feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Property,
    Operation,
    Port,
    InPort,
    OutPort,
    EntryPoint,
    ExitPoint,
    Lifeline,
    ProvidedInterface,
    RequiredInterface,
    TaggedValue,
}

impl FeatureKind {
    /// Ports and pseudo-state points straddle the classifier border as squares.
    pub fn is_port_like(self) -> bool {
        matches!(
            self,
            FeatureKind::Port
                | FeatureKind::InPort
                | FeatureKind::OutPort
                | FeatureKind::EntryPoint
                | FeatureKind::ExitPoint
        )
    }

    /// Interfaces straddle the classifier border as circles.
    pub fn is_interface(self) -> bool {
        matches!(
            self,
            FeatureKind::ProvidedInterface | FeatureKind::RequiredInterface
        )
    }

    /// Features listed as text rows inside the classifier space.
    pub fn is_list_like(self) -> bool {
        matches!(
            self,
            FeatureKind::Property | FeatureKind::Operation | FeatureKind::TaggedValue
        )
    }

    pub fn is_lifeline(self) -> bool {
        matches!(self, FeatureKind::Lifeline)
    }
}

/// Kind of relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    Association,
    Aggregation,
    Composition,
    Generalization,
    Realization,
    Dependency,
    Containment,
    Refine,
    Trace,
    Satisfy,
    Include,
    Extend,
    ControlFlow,
    ObjectFlow,
    Transition,
    SyncMessage,
    AsyncMessage,
    ReturnMessage,
    Assembly,
}

impl RelationshipKind {
    /// Weak relationships are routed after strong ones.
    pub fn is_weak(self) -> bool {
        matches!(
            self,
            RelationshipKind::Dependency
                | RelationshipKind::Containment
                | RelationshipKind::Refine
                | RelationshipKind::Trace
                | RelationshipKind::Satisfy
        )
    }

    pub fn is_containment(self) -> bool {
        matches!(self, RelationshipKind::Containment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagram_kind_groups() {
        assert!(DiagramKind::List.is_one_dimensional());
        assert!(DiagramKind::Timing.is_one_dimensional());
        assert!(!DiagramKind::Class.is_one_dimensional());

        assert!(!DiagramKind::List.shows_relationships());
        assert!(!DiagramKind::Box.shows_relationships());
        assert!(DiagramKind::Sequence.shows_relationships());

        assert!(DiagramKind::Sequence.is_interaction());
        assert!(!DiagramKind::List.is_interaction());
    }

    #[test]
    fn test_classifier_kind_groups() {
        assert!(ClassifierKind::Comment.is_note_like());
        assert!(ClassifierKind::Requirement.is_note_like());
        assert!(!ClassifierKind::Class.is_note_like());
        assert!(ClassifierKind::Actor.is_compact());
        assert!(!ClassifierKind::Component.is_compact());
        assert!(ClassifierKind::DiagramReference.is_diagram_reference());
    }

    #[test]
    fn test_feature_kind_groups() {
        assert!(FeatureKind::OutPort.is_port_like());
        assert!(FeatureKind::RequiredInterface.is_interface());
        assert!(FeatureKind::Operation.is_list_like());
        assert!(!FeatureKind::Lifeline.is_list_like());
        assert!(FeatureKind::Lifeline.is_lifeline());
    }

    #[test]
    fn test_relationship_kind_weakness() {
        assert!(RelationshipKind::Dependency.is_weak());
        assert!(RelationshipKind::Containment.is_weak());
        assert!(!RelationshipKind::Association.is_weak());
        assert!(RelationshipKind::Containment.is_containment());
    }
}

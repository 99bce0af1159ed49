//! Tessera - Automatic layout for UML and SysML diagrams.
//!
//! Given a read-only snapshot of a diagram (its classifiers, features and
//! relationships with their abstract order keys) and the rectangle it is drawn in,
//! a layout pass computes rectangles for every shown classifier and feature and a
//! connector for every relationship. The result also answers position queries:
//! which object lies under a point, and which grid orders a point maps to.
//!
//! Free-form diagrams place classifiers on a grid of x and y orders; list and
//! interaction diagrams arrange them along a single axis.

pub mod config;

mod error;
pub mod layout;

pub use tessera_core::{geometry, model, scale, text};

pub use error::LayoutError;
pub use layout::{GridOrder, Layout, ObjectRef, PositionHit};

use log::{debug, info};

use config::LayoutConfig;
use geometry::Rectangle;
use model::DiagramSnapshot;
use text::TextMeasure;

/// Builder for running layout passes over diagram snapshots.
///
/// # Examples
///
/// ```rust
/// use tessera::{
///     Layouter,
///     config::LayoutConfig,
///     geometry::Rectangle,
///     model::{Classifier, ClassifierKind, Diagram, DiagramKind, DiagramSnapshot},
///     text::FixedAdvanceMeasure,
/// };
///
/// let snapshot = DiagramSnapshot::new(Diagram::new(1, DiagramKind::Class, "Shop"))
///     .with_placed_classifier(Classifier::new(10, ClassifierKind::Class, "Order"))
///     .with_placed_classifier(
///         Classifier::new(11, ClassifierKind::Class, "Customer").with_orders(1, 0),
///     );
///
/// let layouter = Layouter::new(LayoutConfig::default());
/// let layout = layouter
///     .layout(&snapshot, Rectangle::new(0.0, 0.0, 800.0, 600.0), &FixedAdvanceMeasure)
///     .expect("Failed to lay out");
///
/// assert_eq!(layout.data().classifiers().len(), 2);
///
/// // Or use default config
/// let layouter = Layouter::default();
/// ```
#[derive(Debug, Default)]
pub struct Layouter {
    config: LayoutConfig,
}

impl Layouter {
    /// Create a new layouter with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Size and grid settings applied to every pass
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration passes run with.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out a diagram snapshot inside the given bounds.
    ///
    /// The returned [`Layout`] borrows the snapshot; it stays valid until the
    /// snapshot is dropped. Laying out the same snapshot twice with the same
    /// bounds yields identical geometry.
    ///
    /// # Arguments
    ///
    /// * `snapshot` - The diagram and the model objects shown on it
    /// * `bounds` - The rectangle the diagram is drawn in
    /// * `measure` - Measures label text for sizing
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidBounds`] for empty or non-finite bounds,
    /// [`LayoutError::InvalidSnapshot`] for snapshots with dangling references or
    /// duplicate ids, and [`LayoutError::CapacityExceeded`] when more distinct
    /// orders are used than the grid configuration allows.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tessera::{
    ///     Layouter, LayoutError,
    ///     geometry::Rectangle,
    ///     model::{Diagram, DiagramKind, DiagramSnapshot},
    ///     text::FixedAdvanceMeasure,
    /// };
    ///
    /// let snapshot = DiagramSnapshot::new(Diagram::new(1, DiagramKind::Class, "Empty"));
    /// let result = Layouter::default().layout(
    ///     &snapshot,
    ///     Rectangle::new(0.0, 0.0, 0.0, 0.0),
    ///     &FixedAdvanceMeasure,
    /// );
    /// assert!(matches!(result, Err(LayoutError::InvalidBounds(_))));
    /// ```
    pub fn layout<'a>(
        &self,
        snapshot: &'a DiagramSnapshot,
        bounds: Rectangle,
        measure: &dyn TextMeasure,
    ) -> Result<Layout<'a>, LayoutError> {
        let diagram = snapshot.diagram();
        info!(
            diagram_id = diagram.id().value(),
            diagram_kind:? = diagram.kind(),
            classifiers = snapshot.elements().len();
            "Laying out diagram"
        );
        debug!(bounds:?; "Diagram bounds");

        let layout = layout::run(&self.config, snapshot, bounds, measure)?;

        info!(
            classifiers = layout.data().classifiers().len(),
            features = layout.data().features().len(),
            relationships = layout.data().relationships().len();
            "Layout calculated"
        );
        Ok(layout)
    }
}

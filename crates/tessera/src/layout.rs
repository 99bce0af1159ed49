//! The layout pass and its result.
//!
//! A pass runs in a fixed order of phases, each borrowing the arena mutably:
//!
//! 1. instantiate the layout objects of the snapshot ([`LayoutData`])
//! 2. place classifiers, along one axis or on the free-form grid
//! 3. place features relative to their classifiers
//! 4. route relationships between the placed rectangles
//!
//! The resulting [`Layout`] owns the arena and the two order scales and answers
//! position queries for interactive use.

mod classifier_1d;
mod classifier_2d;
mod composer;
mod containment;
mod data;
mod feature;
mod query;
mod relationship;
mod sizes;

pub use data::{
    ClassifierIndex, DiagramFrame, FeatureIndex, LayoutData, LayoutFeature, LayoutRelationship,
    RelationshipIndex, VisibleClassifier, Visibility,
};
pub use query::{GridOrder, ObjectRef, PositionHit};
pub use sizes::SizeProfile;

use log::{debug, trace};

use tessera_core::{
    geometry::Rectangle,
    model::{DiagramKind, DiagramSnapshot},
    scale::NonLinearScale,
    text::TextMeasure,
};

use crate::{
    config::{GridConfig, LayoutConfig},
    error::LayoutError,
};

use classifier_1d::Classifier1dLayouter;
use classifier_2d::{Classifier2dLayouter, default_classifier_size};
use composer::ClassifierComposer;
use containment::ContainmentHierarchy;
use feature::FeatureLayouter;
use relationship::RelationshipLayouter;

/// The computed geometry of one diagram.
#[derive(Debug, Clone)]
pub struct Layout<'a> {
    data: LayoutData<'a>,
    x_scale: NonLinearScale,
    y_scale: NonLinearScale,
    profile: SizeProfile,
    snap_interval: f64,
}

impl<'a> Layout<'a> {
    /// All layout objects: frame, classifiers, features and relationships
    pub fn data(&self) -> &LayoutData<'a> {
        &self.data
    }

    /// Scale mapping x orders to horizontal locations
    pub fn x_scale(&self) -> &NonLinearScale {
        &self.x_scale
    }

    /// Scale mapping y orders to vertical locations
    pub fn y_scale(&self) -> &NonLinearScale {
        &self.y_scale
    }

    /// Sizes the pass derived from the configuration and the diagram bounds
    pub fn profile(&self) -> &SizeProfile {
        &self.profile
    }
}

fn validate_bounds(bounds: &Rectangle) -> Result<(), LayoutError> {
    let values = [bounds.left(), bounds.top(), bounds.width(), bounds.height()];
    if values.iter().any(|value| !value.is_finite()) {
        return Err(LayoutError::InvalidBounds(format!(
            "{bounds:?} has non-finite coordinates"
        )));
    }
    if bounds.is_empty() {
        return Err(LayoutError::InvalidBounds(format!("{bounds:?} is empty")));
    }
    Ok(())
}

fn new_scale(lower: f64, upper: f64, grid: &GridConfig) -> NonLinearScale {
    let scale = NonLinearScale::new(lower, upper.max(lower));
    match grid.max_points() {
        Some(limit) => scale.with_point_limit(limit),
        None => scale,
    }
}

/// Builds a scale over `[lower, upper]` holding every given order.
fn scale_of(
    lower: f64,
    upper: f64,
    orders: impl IntoIterator<Item = i32>,
    grid: &GridConfig,
) -> Result<NonLinearScale, LayoutError> {
    let mut scale = new_scale(lower, upper, grid);
    for order in orders {
        scale.add_order(order)?;
    }
    Ok(scale)
}

/// Scales of free-form diagrams: classifier x and y orders over the draw area.
fn grid_scales(
    data: &LayoutData<'_>,
    grid: &GridConfig,
) -> Result<(NonLinearScale, NonLinearScale), LayoutError> {
    let draw_area = data.frame().draw_area();
    let classifiers = data.classifiers();
    let x_scale = scale_of(
        draw_area.left(),
        draw_area.right(),
        classifiers.iter().map(|c| c.classifier().x_order()),
        grid,
    )?;
    let y_scale = scale_of(
        draw_area.top(),
        draw_area.bottom(),
        classifiers.iter().map(|c| c.classifier().y_order()),
        grid,
    )?;
    Ok((x_scale, y_scale))
}

/// Builds a scale over `[lower, upper]` with each classifier's list order pinned
/// at its placed center, so a position on a classifier maps back to its order.
///
/// Classifiers sharing a list order share the leading one's point.
fn placed_scale(
    lower: f64,
    upper: f64,
    classifiers: &[&VisibleClassifier<'_>],
    horizontal: bool,
    grid: &GridConfig,
) -> Result<NonLinearScale, LayoutError> {
    let mut centers: Vec<(i32, f64)> = classifiers
        .iter()
        .map(|c| {
            let bounds = c.bounds();
            let center = if horizontal {
                bounds.center_x()
            } else {
                bounds.center_y()
            };
            (c.classifier().list_order(), center)
        })
        .collect();
    centers.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));

    let mut scale = new_scale(lower, upper, grid);
    for (order, center) in centers {
        scale.pin_order(order, center)?;
    }
    Ok(scale)
}

/// Scales of one-dimensional diagrams, built after the classifiers are placed.
///
/// The classifier axis holds the list orders of the acting classifiers at their
/// centers; on interaction diagrams the other axis holds the message orders,
/// inset from the scenario's edges by the object distance.
fn list_scales(
    data: &LayoutData<'_>,
    kind: DiagramKind,
    profile: &SizeProfile,
    grid: &GridConfig,
) -> Result<(NonLinearScale, NonLinearScale), LayoutError> {
    let draw_area = data.frame().draw_area();
    let scenario = data.scenario().unwrap_or(draw_area);
    let acting: Vec<&VisibleClassifier<'_>> = data
        .classifiers()
        .iter()
        .filter(|c| {
            let classifier_kind = c.classifier().kind();
            // timing diagrams keep references in the acting column
            !classifier_kind.is_note_like()
                && (kind == DiagramKind::Timing || !classifier_kind.is_diagram_reference())
        })
        .collect();
    let messages = data
        .relationships()
        .iter()
        .map(|r| r.relationship().list_order());
    let inset = |start: f64, extent: f64| {
        let margin = profile.object_distance().min(extent / 2.0);
        (start + margin, start + extent - margin)
    };

    match kind {
        DiagramKind::Sequence => {
            let (top, bottom) = inset(scenario.top(), scenario.height());
            Ok((
                placed_scale(scenario.left(), scenario.right(), &acting, true, grid)?,
                scale_of(top, bottom, messages, grid)?,
            ))
        }
        DiagramKind::Timing => {
            let (left, right) = inset(scenario.left(), scenario.width());
            Ok((
                scale_of(left, right, messages, grid)?,
                placed_scale(scenario.top(), scenario.bottom(), &acting, false, grid)?,
            ))
        }
        _ => {
            let all: Vec<&VisibleClassifier<'_>> = data.classifiers().iter().collect();
            Ok((
                new_scale(draw_area.left(), draw_area.right(), grid),
                placed_scale(draw_area.top(), draw_area.bottom(), &all, false, grid)?,
            ))
        }
    }
}

/// Runs all phases of a layout pass.
pub(crate) fn run<'a>(
    config: &LayoutConfig,
    snapshot: &'a DiagramSnapshot,
    bounds: Rectangle,
    measure: &dyn TextMeasure,
) -> Result<Layout<'a>, LayoutError> {
    validate_bounds(&bounds)?;
    snapshot.validate()?;

    let kind = snapshot.diagram().kind();
    let profile = SizeProfile::new(config.sizes(), &bounds);
    let frame = DiagramFrame::new(snapshot.diagram(), bounds, &profile, measure);
    let mut data = LayoutData::new(snapshot, frame);
    let hierarchy = ContainmentHierarchy::new(&data);
    let composer = ClassifierComposer::new(&profile, measure);
    let features = FeatureLayouter::new(&profile, measure);

    let (x_scale, y_scale, embraced) = if kind.is_one_dimensional() {
        Classifier1dLayouter::new(&profile, &composer, &features).layout(&mut data, kind);
        let (x_scale, y_scale) = list_scales(&data, kind, &profile, config.grid())?;
        (x_scale, y_scale, Vec::new())
    } else {
        let (x_scale, y_scale) = grid_scales(&data, config.grid())?;
        let draw_area = data.frame().draw_area();
        let default_size =
            default_classifier_size(&draw_area, data.classifiers().len(), &profile);
        debug!(
            width = default_size.width(),
            height = default_size.height();
            "Default classifier size"
        );
        let embraced = Classifier2dLayouter::new(&profile, &composer, &features, &hierarchy)
            .layout(&mut data, &x_scale, &y_scale, default_size);
        (x_scale, y_scale, embraced)
    };

    features.layout(&mut data, kind);
    RelationshipLayouter::new(&profile, measure, &hierarchy).layout(
        &mut data,
        kind,
        &x_scale,
        &y_scale,
        &embraced,
    );
    trace!(x_scale:?, y_scale:?; "Order scales");

    let snap_interval = config.grid().snap_factor() * profile.object_distance();
    Ok(Layout {
        data,
        x_scale,
        y_scale,
        profile,
        snap_interval,
    })
}

//! Example: Laying out a diagram snapshot
//!
//! This example demonstrates how to build a model snapshot programmatically,
//! lay it out and query the result the way an interactive editor would.

use tessera::{
    Layouter,
    config::LayoutConfig,
    geometry::Rectangle,
    model::{
        Classifier, ClassifierKind, Diagram, DiagramKind, DiagramSnapshot, Feature, FeatureKind,
        Relationship, RelationshipKind,
    },
    text::CosmicTextMeasure,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Building diagram snapshot...\n");

    // Classifiers carry grid orders instead of coordinates
    let order = Classifier::new(1, ClassifierKind::Class, "Order").with_orders(0, 0);
    let customer = Classifier::new(2, ClassifierKind::Class, "Customer").with_orders(1, 0);
    let invoice = Classifier::new(3, ClassifierKind::Class, "Invoice")
        .with_orders(0, 1)
        .with_stereotype("entity");
    let shop = Classifier::new(4, ClassifierKind::Package, "shop").with_orders(-1, 0);

    let snapshot = DiagramSnapshot::new(Diagram::new(1, DiagramKind::Class, "Ordering"))
        .with_placed_classifier(order)
        .with_placed_classifier(customer)
        .with_placed_classifier(invoice)
        .with_placed_classifier(shop)
        .with_feature(Feature::new(10, FeatureKind::Property, 1, "total").with_value("Money"))
        .with_feature(Feature::new(11, FeatureKind::Operation, 1, "cancel()"))
        .with_feature(Feature::new(12, FeatureKind::Port, 2, "web"))
        .with_relationship(
            Relationship::new(20, RelationshipKind::Association, 2, 1).with_name("places"),
        )
        .with_relationship(Relationship::new(21, RelationshipKind::Composition, 1, 3))
        .with_relationship(Relationship::new(22, RelationshipKind::Containment, 4, 1));

    // Print snapshot info
    println!("Created snapshot:");
    println!("  Kind: {:?}", snapshot.diagram().kind());
    println!("  Classifiers: {}", snapshot.classifiers().len());
    println!("  Relationships: {}", snapshot.relationships().len());
    println!();

    // Lay out the snapshot inside a 1280x800 canvas
    println!("Laying out...");
    let layouter = Layouter::new(LayoutConfig::default());
    let bounds = Rectangle::new(0.0, 0.0, 1280.0, 800.0);
    let layout = layouter.layout(&snapshot, bounds, CosmicTextMeasure::shared())?;

    for classifier in layout.data().classifiers() {
        println!("  {:<10} {:?}", classifier.label(), classifier.bounds());
    }
    for relationship in layout.data().relationships() {
        println!(
            "  {:<10} {} {:?}",
            relationship.relationship().name(),
            relationship.shape().directions(),
            relationship.visibility()
        );
    }
    println!();

    // Query the layout like a pointer would
    let center = layout.data().classifiers()[0].bounds().center();
    if let Some(hit) = layout.object_id_at_position(center.x(), center.y()) {
        println!("At {center:?}: {:?} in {:?}", hit.selected(), hit.surrounding());
    }
    if let Some(grid) = layout.order_at_position(center.x(), center.y()) {
        println!("Grid orders: ({}, {})", grid.x_order(), grid.y_order());
    }

    Ok(())
}

//! Tessera Core Types
//!
//! This crate provides the value types the Tessera layout engine works with.
//! It includes:
//!
//! - **Geometry**: Points, dimensions, rectangles and connectors ([`geometry`] module)
//! - **Scales**: Order-to-location mapping ([`scale::NonLinearScale`])
//! - **Model**: The read-only diagram snapshot a layout pass consumes ([`model`] module)
//! - **Text**: Label measurement ([`text::TextMeasure`])
//! - **Errors**: [`error::ScaleError`] and [`error::SnapshotError`]

pub mod error;
pub mod geometry;
pub mod model;
pub mod scale;
pub mod text;

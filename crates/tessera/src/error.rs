//! Error types for Tessera layout operations.
//!
//! This module provides the main error type [`LayoutError`] which wraps the
//! conditions that stop a layout pass before or while it runs.

use thiserror::Error;

use tessera_core::error::{ScaleError, SnapshotError};

/// The main error type for layout operations.
///
/// Every variant is raised before any layout result is handed out; a pass never
/// returns partial or truncated layout data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("Capacity exceeded: {0}")]
    CapacityExceeded(String),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(#[from] SnapshotError),

    #[error("Invalid diagram bounds: {0}")]
    InvalidBounds(String),
}

impl From<ScaleError> for LayoutError {
    fn from(error: ScaleError) -> Self {
        Self::CapacityExceeded(error.to_string())
    }
}

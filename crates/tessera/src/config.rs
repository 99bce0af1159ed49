//! Configuration types for Tessera layout passes.
//!
//! This module provides configuration structures that control sizing and the
//! order grid. All types implement [`serde::Deserialize`] for flexible loading
//! from external sources, and every field has a default so partial documents load.
//!
//! # Overview
//!
//! - [`LayoutConfig`] - Top-level configuration combining size and grid settings.
//! - [`SizeConfig`] - Font family and the rules deriving font and spacing sizes.
//! - [`GridConfig`] - Non-linear scale limits and snapping of position queries.
//!
//! # Example
//!
//! ```
//! # use tessera::config::LayoutConfig;
//! let config = LayoutConfig::default();
//! assert_eq!(config.sizes().font_family(), "sans-serif");
//! assert!(config.grid().max_points().is_none());
//! ```

use serde::Deserialize;

/// Top-level layout configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LayoutConfig {
    /// Size configuration section.
    #[serde(default)]
    sizes: SizeConfig,

    /// Grid configuration section.
    #[serde(default)]
    grid: GridConfig,
}

impl LayoutConfig {
    /// Creates a new [`LayoutConfig`] from its sections.
    pub fn new(sizes: SizeConfig, grid: GridConfig) -> Self {
        Self { sizes, grid }
    }

    /// Returns the size configuration.
    pub fn sizes(&self) -> &SizeConfig {
        &self.sizes
    }

    /// Returns the grid configuration.
    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }
}

/// Rules deriving font sizes and spacing from the diagram bounds.
///
/// The standard font size is the smaller side of the diagram divided by
/// `font_size_divisor`, clamped to `[min_font_size, max_font_size]`. All other
/// sizes follow from the standard font size unless overridden.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SizeConfig {
    #[serde(default = "default_font_family")]
    font_family: String,

    #[serde(default = "default_min_font_size")]
    min_font_size: f64,

    #[serde(default = "default_max_font_size")]
    max_font_size: f64,

    #[serde(default = "default_font_size_divisor")]
    font_size_divisor: f64,

    /// Fixed preferred distance between objects, in pixels.
    #[serde(default)]
    object_distance: Option<f64>,
}

fn default_font_family() -> String {
    String::from("sans-serif")
}

fn default_min_font_size() -> f64 {
    8.0
}

fn default_max_font_size() -> f64 {
    16.0
}

fn default_font_size_divisor() -> f64 {
    48.0
}

impl Default for SizeConfig {
    fn default() -> Self {
        Self {
            font_family: default_font_family(),
            min_font_size: default_min_font_size(),
            max_font_size: default_max_font_size(),
            font_size_divisor: default_font_size_divisor(),
            object_distance: None,
        }
    }
}

impl SizeConfig {
    /// Returns a copy with a fixed preferred object distance.
    pub fn with_object_distance(mut self, distance: f64) -> Self {
        self.object_distance = Some(distance);
        self
    }

    /// Returns a copy using the given font family.
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn min_font_size(&self) -> f64 {
        self.min_font_size
    }

    pub fn max_font_size(&self) -> f64 {
        self.max_font_size
    }

    pub fn font_size_divisor(&self) -> f64 {
        self.font_size_divisor
    }

    pub fn object_distance(&self) -> Option<f64> {
        self.object_distance
    }
}

/// Settings of the order grid spanned by the non-linear scales.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GridConfig {
    /// Maximum number of orders per scale; unlimited when unset.
    #[serde(default)]
    max_points: Option<usize>,

    /// Snap distance of `order_at_position`, relative to the object distance.
    #[serde(default = "default_snap_factor")]
    snap_factor: f64,
}

fn default_snap_factor() -> f64 {
    0.5
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            max_points: None,
            snap_factor: default_snap_factor(),
        }
    }
}

impl GridConfig {
    /// Returns a copy limiting every scale to `limit` orders.
    pub fn with_max_points(mut self, limit: usize) -> Self {
        self.max_points = Some(limit);
        self
    }

    pub fn max_points(&self) -> Option<usize> {
        self.max_points
    }

    pub fn snap_factor(&self) -> f64 {
        self.snap_factor
    }
}

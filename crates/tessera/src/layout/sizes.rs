//! Font and spacing sizes of one layout pass.

use log::debug;

use tessera_core::{geometry::Rectangle, text::FontStyle};

use crate::config::SizeConfig;

/// Title font size relative to the standard font size
const TITLE_FONT_FACTOR: f64 = 1.25;

/// Footnote font size relative to the standard font size
const FOOTNOTE_FONT_FACTOR: f64 = 0.8;

/// Sizes derived from the configuration and the diagram bounds.
///
/// Every spacing used by the layouters scales with the standard font size, so a
/// diagram keeps its proportions when its bounds change.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeProfile {
    font_family: String,
    standard_font_size: f64,
    line_width: f64,
    object_border: f64,
    object_distance: f64,
}

impl SizeProfile {
    /// Derives the profile for a diagram drawn into `bounds`.
    pub fn new(config: &SizeConfig, bounds: &Rectangle) -> Self {
        let smaller_side = bounds.width().min(bounds.height());
        let divisor = config.font_size_divisor().max(1.0);
        let standard_font_size = (smaller_side / divisor)
            .max(config.min_font_size())
            .min(config.max_font_size().max(config.min_font_size()));

        let profile = Self {
            font_family: config.font_family().to_string(),
            standard_font_size,
            line_width: standard_font_size / 12.0,
            object_border: standard_font_size / 3.0,
            object_distance: config
                .object_distance()
                .unwrap_or(standard_font_size * 2.5)
                .max(0.0),
        };
        debug!(
            standard_font_size,
            object_distance = profile.object_distance;
            "Derived size profile"
        );
        profile
    }

    /// Returns a copy with a different preferred object distance
    pub fn with_object_distance(mut self, distance: f64) -> Self {
        self.object_distance = distance.max(0.0);
        self
    }

    pub fn standard_font_size(&self) -> f64 {
        self.standard_font_size
    }

    pub fn title_font_size(&self) -> f64 {
        self.standard_font_size * TITLE_FONT_FACTOR
    }

    pub fn footnote_font_size(&self) -> f64 {
        self.standard_font_size * FOOTNOTE_FONT_FACTOR
    }

    /// Font of classifier names
    pub fn standard_font(&self) -> FontStyle {
        FontStyle::new(self.font_family.as_str(), self.standard_font_size).bold()
    }

    /// Font of feature rows
    pub fn feature_font(&self) -> FontStyle {
        FontStyle::new(self.font_family.as_str(), self.standard_font_size)
    }

    /// Font of the diagram title
    pub fn title_font(&self) -> FontStyle {
        FontStyle::new(self.font_family.as_str(), self.title_font_size()).bold()
    }

    /// Font of stereotypes and port labels
    pub fn footnote_font(&self) -> FontStyle {
        FontStyle::new(self.font_family.as_str(), self.footnote_font_size())
    }

    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    /// Gap between a classifier's border and its contents
    pub fn object_border(&self) -> f64 {
        self.object_border
    }

    /// Preferred distance between neighboring objects
    pub fn object_distance(&self) -> f64 {
        self.object_distance
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_font_size_follows_smaller_side() {
        let bounds = Rectangle::new(0.0, 0.0, 1200.0, 576.0);
        let profile = SizeProfile::new(&SizeConfig::default(), &bounds);
        assert_approx_eq!(f64, profile.standard_font_size(), 12.0);
        assert_approx_eq!(f64, profile.object_border(), 4.0);
        assert_approx_eq!(f64, profile.object_distance(), 30.0);
        assert_approx_eq!(f64, profile.line_width(), 1.0);
    }

    #[test]
    fn test_font_size_is_clamped() {
        let config = SizeConfig::default();
        let tiny = SizeProfile::new(&config, &Rectangle::new(0.0, 0.0, 10.0, 10.0));
        assert_approx_eq!(f64, tiny.standard_font_size(), 8.0);

        let huge = SizeProfile::new(&config, &Rectangle::new(0.0, 0.0, 1e5, 1e5));
        assert_approx_eq!(f64, huge.standard_font_size(), 16.0);
        assert_approx_eq!(f64, huge.title_font_size(), 20.0);
        assert!(huge.title_font().is_bold());
    }

    #[test]
    fn test_object_distance_override() {
        let config = SizeConfig::default().with_object_distance(0.0);
        let profile = SizeProfile::new(&config, &Rectangle::new(0.0, 0.0, 500.0, 500.0));
        assert_approx_eq!(f64, profile.object_distance(), 0.0);
        assert_approx_eq!(f64, profile.with_object_distance(7.0).object_distance(), 7.0);
    }
}

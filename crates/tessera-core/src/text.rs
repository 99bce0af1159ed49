//! Text measurement for label sizing.
//!
//! The layout engine never renders text; it only needs the extent a label will
//! occupy. [`TextMeasure`] is the collaborator interface, with two implementations:
//!
//! - [`CosmicTextMeasure`] - Shapes text with `cosmic-text` against the system fonts
//! - [`FixedAdvanceMeasure`] - Deterministic per-character estimate, independent of
//!   installed fonts

use std::sync::{Mutex, OnceLock, PoisonError};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, Weight};
use log::info;

use crate::geometry::Dimensions;

/// Average advance of a glyph relative to the font size
const ADVANCE_FACTOR: f64 = 0.55;

/// Line height relative to the font size
const LINE_HEIGHT_FACTOR: f64 = 1.15;

/// Font settings of one text run.
#[derive(Debug, Clone, PartialEq)]
pub struct FontStyle {
    family: String,
    size: f64,
    bold: bool,
}

impl FontStyle {
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
            bold: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    /// Font size in pixels
    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn is_bold(&self) -> bool {
        self.bold
    }

    /// Height of one line of text in this style
    pub fn line_height(&self) -> f64 {
        self.size * LINE_HEIGHT_FACTOR
    }
}

/// Measures the extent of text.
///
/// Implementations must be deterministic: measuring the same text twice yields the
/// same dimensions, which keeps layout passes reproducible.
pub trait TextMeasure {
    /// Returns the width and height of `text` set in `style`; empty text is empty.
    fn measure_text(&self, text: &str, style: &FontStyle) -> Dimensions;
}

/// Estimates text extents from character and line counts.
///
/// # Examples
///
/// ```
/// # use tessera_core::text::{FixedAdvanceMeasure, FontStyle, TextMeasure};
/// let dims = FixedAdvanceMeasure.measure_text("abcd", &FontStyle::new("sans-serif", 10.0));
/// assert!((dims.width() - 22.0).abs() < 1e-9);
/// assert!((dims.height() - 11.5).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedAdvanceMeasure;

impl TextMeasure for FixedAdvanceMeasure {
    fn measure_text(&self, text: &str, style: &FontStyle) -> Dimensions {
        if text.is_empty() {
            return Dimensions::default();
        }
        let longest = text.lines().map(|line| line.chars().count()).max().unwrap_or(0);
        let lines = text.lines().count().max(1);
        Dimensions::new(
            longest as f64 * style.size() * ADVANCE_FACTOR,
            lines as f64 * style.line_height(),
        )
    }
}

/// Shapes text with `cosmic-text` to measure it.
///
/// Creating a [`FontSystem`] loads the system font database, which is slow; use
/// [`CosmicTextMeasure::shared`] to reuse one instance for the whole process.
pub struct CosmicTextMeasure {
    font_system: Mutex<FontSystem>,
}

static SHARED_MEASURE: OnceLock<CosmicTextMeasure> = OnceLock::new();

impl Default for CosmicTextMeasure {
    fn default() -> Self {
        Self::new()
    }
}

impl CosmicTextMeasure {
    /// Creates a measurer with its own font system
    pub fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Mutex::new(FontSystem::new()),
        }
    }

    /// Returns the process-wide measurer
    pub fn shared() -> &'static Self {
        SHARED_MEASURE.get_or_init(Self::new)
    }
}

impl TextMeasure for CosmicTextMeasure {
    fn measure_text(&self, text: &str, style: &FontStyle) -> Dimensions {
        if text.is_empty() {
            return Dimensions::default();
        }

        let mut font_system = self
            .font_system
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let font_size = style.size() as f32;
        let metrics = Metrics::new(font_size, style.line_height() as f32);

        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let weight = if style.is_bold() {
            Weight::BOLD
        } else {
            Weight::NORMAL
        };
        let attrs = Attrs::new()
            .family(Family::Name(style.family()))
            .weight(weight);

        // unlimited size, so lines never wrap
        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut max_width: f32 = 0.0;
        let mut total_height: f32 = 0.0;
        for run in buffer.layout_runs() {
            if let Some(last) = run.glyphs.last() {
                max_width = max_width.max(last.x + last.w);
            }
            total_height += metrics.line_height;
        }

        if max_width <= 0.0 {
            // no usable fonts: fall back to the estimate
            return FixedAdvanceMeasure.measure_text(text, style);
        }
        Dimensions::new(f64::from(max_width), f64::from(total_height))
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_fixed_advance_empty_text() {
        let dims = FixedAdvanceMeasure.measure_text("", &FontStyle::new("serif", 12.0));
        assert!(dims.is_empty());
    }

    #[test]
    fn test_fixed_advance_multiline() {
        let style = FontStyle::new("serif", 20.0);
        let dims = FixedAdvanceMeasure.measure_text("ab\nabcde", &style);
        assert_approx_eq!(f64, dims.width(), 55.0);
        assert_approx_eq!(f64, dims.height(), 46.0);
    }

    #[test]
    fn test_font_style_accessors() {
        let style = FontStyle::new("monospace", 10.0).bold();
        assert_eq!(style.family(), "monospace");
        assert!(style.is_bold());
        assert_approx_eq!(f64, style.line_height(), 11.5);
    }

    #[test]
    fn test_cosmic_text_measure_is_deterministic() {
        let measure = CosmicTextMeasure::shared();
        let style = FontStyle::new("sans-serif", 14.0);
        let first = measure.measure_text("Order", &style);
        let second = measure.measure_text("Order", &style);
        assert_eq!(first, second);
        assert!(first.width() > 0.0);
        assert!(first.height() > 0.0);
        assert!(measure.measure_text("", &style).is_empty());
    }
}

//! Glyph metric storage
//!
//! The built-in tables are generated by `build.rs` from
//! `data/font_metrics_data.json` into `phf` maps keyed by code point, one map
//! per font family. Extra families can be registered at runtime.

use crate::font_metrics::{MetricMap, MetricsProvider};
use crate::types::KeyMap;

/// Font metrics for a single character
/// The array contains: [depth, height, italic, skew, width]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterMetrics {
    /// Depth of the character
    pub depth: f64,
    /// Height of the character
    pub height: f64,
    /// Italic correction
    pub italic: f64,
    /// Skew of the character
    pub skew: f64,
    /// Width of the character
    pub width: f64,
}

impl CharacterMetrics {
    /// Create a new CharacterMetrics instance
    #[must_use]
    pub const fn new(depth: f64, height: f64, italic: f64, skew: f64, width: f64) -> Self {
        Self {
            depth,
            height,
            italic,
            skew,
            width,
        }
    }
}

// Include the generated phf maps from the build script
include!(concat!(env!("OUT_DIR"), "/font_metrics_data_phf.rs"));

/// Built-in glyph tables plus runtime additions
#[derive(Debug, Default)]
pub struct FontMetricsData {
    /// Custom font metrics added at runtime
    pub custom: KeyMap<String, MetricMap>,
}

impl FontMetricsData {
    /// Get metrics for a specific character in a font family.
    ///
    /// Runtime additions take precedence over the built-in tables.
    #[must_use]
    pub fn get_metric(&self, font_family: &str, char_code: u32) -> Option<&CharacterMetrics> {
        if let Some(metrics) = self
            .custom
            .get(font_family)
            .and_then(|custom| custom.get(&char_code))
        {
            return Some(metrics);
        }
        FONT_METRICS_INDEX
            .get(font_family)
            .and_then(|metrics| metrics.get(&char_code))
    }

    /// Register metrics for one glyph of a font family
    pub fn add_custom_metrics(
        &mut self,
        font_family: String,
        char_code: u32,
        metrics: CharacterMetrics,
    ) {
        self.custom
            .entry(font_family)
            .or_default()
            .insert(char_code, metrics);
    }

    /// Whether the font family has any metrics, built-in or custom
    #[must_use]
    pub fn has_font(&self, font_family: &str) -> bool {
        FONT_METRICS_INDEX.contains_key(font_family) || self.custom.contains_key(font_family)
    }
}

impl MetricsProvider for FontMetricsData {
    fn character_metrics(&self, ch: char, font: &str) -> Option<CharacterMetrics> {
        self.get_metric(font, ch as u32).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_tables_are_indexed_by_family() {
        let data = FontMetricsData::default();
        let x = data.get_metric("Math-Italic", 'x' as u32);
        assert_eq!(x.map(|m| m.height), Some(0.43056));
        assert!(data.has_font("Size1-Regular"));
        assert!(!data.has_font("Comic-Sans"));
        assert!(data.get_metric("Main-Regular", 0x1F600).is_none());
    }

    #[test]
    fn custom_metrics_override_built_in() {
        let mut data = FontMetricsData::default();
        let wide = CharacterMetrics::new(0.1, 0.9, 0.0, 0.0, 2.0);
        data.add_custom_metrics("Main-Regular".to_owned(), 'x' as u32, wide);
        data.add_custom_metrics("Custom".to_owned(), 'q' as u32, wide);
        assert_eq!(data.character_metrics('x', "Main-Regular"), Some(wide));
        assert_eq!(data.character_metrics('q', "Custom"), Some(wide));
        assert!(data.has_font("Custom"));
    }
}

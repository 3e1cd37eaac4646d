//! Global context for layout operations

use crate::font_metrics::MetricMap;
use crate::font_metrics_data::FontMetricsData;
use crate::options::Options;
use crate::types::Settings;

/// Immutable registry shared by every render.
///
/// The LayoutContext is built once, before any layout happens, and is then
/// passed by shared reference through the whole render. It holds the glyph
/// metric tables and the resolved [`Settings`].
#[derive(Debug, Default)]
pub struct LayoutContext {
    /// Resolved configuration, registers included
    pub settings: Settings,
    /// Font metrics data for character measurements
    pub font_metrics: FontMetricsData,
}

impl LayoutContext {
    /// Create a context with the built-in metric tables.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            font_metrics: FontMetricsData::default(),
        }
    }

    /// Set or override font metrics for a specific font family
    pub fn set_font_metrics(&mut self, font_name: &str, metrics: MetricMap) {
        self.font_metrics
            .custom
            .insert(font_name.to_owned(), metrics);
    }

    /// Options for the root of a render, derived from the settings.
    #[must_use]
    pub fn root_options(&self) -> Options {
        Options::from_settings(&self.settings)
    }
}

//! Font metrics module
//!
//! This module contains metrics regarding fonts and individual symbols. The
//! sigma and xi variables, as well as the metric map contain data extracted
//! from TeX, TeX font metrics, and the TTF files. These data are then exposed
//! via the `FontMetrics` struct and the character metrics functions.
//!
//! In TeX, there are actually three sets of dimensions, one for each of
//! textstyle (size index 5 and higher: >=9pt), scriptstyle (size index 3 and 4:
//! 7-8pt), and scriptscriptstyle (size index 1 and 2: 5-6pt).
//!
//! The font metrics are stored in fonts cmsy10, cmsy7, and cmsy5 respectively.

include!(concat!(env!("OUT_DIR"), "/sigmas_and_xis_generated.rs"));

use phf::phf_map;
use tracing::debug;

use crate::font_metrics_data::CharacterMetrics;
use crate::types::KeyMap;

/// Font size index for different styles
/// 0 = textstyle (>=9pt), 1 = scriptstyle (7-8pt), 2 = scriptscriptstyle
/// (5-6pt)
pub type FontSizeIndex = usize;

/// Type alias for metric maps (character code -> metrics)
pub type MetricMap = KeyMap<u32, CharacterMetrics>;

/// Metrics used for glyphs no font knows about.
pub const DEFAULT_CHARACTER_METRICS: CharacterMetrics =
    CharacterMetrics::new(0.2, 0.7, 0.0, 0.0, 0.5);

/// Lookup service for glyph metrics.
///
/// Implementations answer in ems of the font at its design size. `None`
/// means the glyph is unknown; callers fall back to
/// [`DEFAULT_CHARACTER_METRICS`] through [`get_character_metrics`].
pub trait MetricsProvider {
    /// Metrics of `ch` in the font family `font`, like `"Main-Regular"`.
    fn character_metrics(&self, ch: char, font: &str) -> Option<CharacterMetrics>;
}

/// Mapping for characters that don't have direct font metrics
///
/// These are rough approximations by a visually similar ASCII glyph. The
/// metrics do not account for extra height from the accents.
pub const EXTRA_CHARACTER_MAP: phf::Map<char, char> = phf_map! {
    // Latin-1
    '\u{c0}' => 'A',
    '\u{c1}' => 'A',
    '\u{c5}' => 'A',
    '\u{c9}' => 'E',
    '\u{d0}' => 'D',
    '\u{de}' => 'o',
    '\u{e0}' => 'a',
    '\u{e1}' => 'a',
    '\u{e5}' => 'a',
    '\u{e8}' => 'e',
    '\u{e9}' => 'e',
    '\u{f0}' => 'd',
    '\u{fe}' => 'o',

    // Greek look-alikes
    '\u{391}' => 'A',
    '\u{392}' => 'B',
    '\u{395}' => 'E',
    '\u{39f}' => 'O',
    '\u{3bf}' => 'o',
};

/// Looks up the metrics of `character` in `font`.
///
/// Unknown glyphs are tried once more through [`EXTRA_CHARACTER_MAP`], then
/// fall back to [`DEFAULT_CHARACTER_METRICS`]. A missing glyph is never an
/// error.
pub fn get_character_metrics(
    provider: &dyn MetricsProvider,
    character: char,
    font: &str,
) -> CharacterMetrics {
    if let Some(metrics) = provider.character_metrics(character, font) {
        return metrics;
    }

    if let Some(&replacement) = EXTRA_CHARACTER_MAP.get(&character)
        && let Some(metrics) = provider.character_metrics(replacement, font)
    {
        return metrics;
    }

    debug!(
        character = %character.escape_unicode(),
        font,
        "no metrics for glyph, using defaults"
    );
    DEFAULT_CHARACTER_METRICS
}

//! Stretchy wide elements drawn from named vector graphics
//!
//! Wide accents, extensible arrows and braces are not glyphs: the layout
//! engine only reserves a box of the right size and records the graphic's
//! name in [`LayoutBox::svg_body`]. The markup serializer resolves the name
//! to artwork.

use phf::{phf_map, phf_set};
use tracing::debug;

use crate::box_tree::{BoxType, LayoutBox};
use crate::types::CssProperty;
use crate::units::make_em;

/// Size data of a stretchy graphic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageData {
    /// Minimum width in ems
    pub min_width: f64,
    /// Height in ems
    pub height: f64,
}

impl ImageData {
    /// Create a new [`ImageData`] instance
    #[must_use]
    pub const fn new(min_width: f64, height: f64) -> Self {
        Self { min_width, height }
    }
}

/// Graphic used when a name is not in [`IMAGES_DATA`].
const FALLBACK_IMAGE: ImageData = ImageData::new(0.888, 0.522);

const IMAGES_DATA: phf::Map<&'static str, ImageData> = phf_map! {
    "overrightarrow" => ImageData::new(0.888, 0.522),
    "overleftarrow" => ImageData::new(0.888, 0.522),
    "underrightarrow" => ImageData::new(0.888, 0.522),
    "underleftarrow" => ImageData::new(0.888, 0.522),
    "xrightarrow" => ImageData::new(1.469, 0.522),
    "xleftarrow" => ImageData::new(1.469, 0.522),
    "Overrightarrow" => ImageData::new(0.888, 0.56),
    "xRightarrow" => ImageData::new(1.526, 0.56),
    "xLeftarrow" => ImageData::new(1.526, 0.56),
    "overleftharpoon" => ImageData::new(0.888, 0.522),
    "xleftharpoonup" => ImageData::new(0.888, 0.522),
    "xleftharpoondown" => ImageData::new(0.888, 0.522),
    "overrightharpoon" => ImageData::new(0.888, 0.522),
    "xrightharpoonup" => ImageData::new(0.888, 0.522),
    "xrightharpoondown" => ImageData::new(0.888, 0.522),
    "xlongequal" => ImageData::new(0.888, 0.334),
    "xtwoheadleftarrow" => ImageData::new(0.888, 0.334),
    "xtwoheadrightarrow" => ImageData::new(0.888, 0.334),
    "overleftrightarrow" => ImageData::new(0.888, 0.522),
    "underleftrightarrow" => ImageData::new(0.888, 0.522),
    "xleftrightarrow" => ImageData::new(1.75, 0.522),
    "xLeftrightarrow" => ImageData::new(1.75, 0.56),
    "xrightleftharpoons" => ImageData::new(1.75, 0.716),
    "xleftrightharpoons" => ImageData::new(1.75, 0.716),
    "xhookleftarrow" => ImageData::new(1.08, 0.522),
    "xhookrightarrow" => ImageData::new(1.08, 0.522),
    "xmapsto" => ImageData::new(1.5, 0.522),
    "xtofrom" => ImageData::new(1.75, 0.528),
    "xrightleftarrows" => ImageData::new(1.75, 0.901),
    "xrightequilibrium" => ImageData::new(1.75, 0.716),
    "xleftequilibrium" => ImageData::new(1.75, 0.716),
    "overbrace" => ImageData::new(1.6, 0.548),
    "underbrace" => ImageData::new(1.6, 0.548),
    "overgroup" => ImageData::new(0.888, 0.342),
    "undergroup" => ImageData::new(0.888, 0.342),
    "overlinesegment" => ImageData::new(0.888, 0.522),
    "underlinesegment" => ImageData::new(0.888, 0.522),
};

/// Accents whose height grows with the width of their body.
const WIDE_ACCENTS: phf::Set<&'static str> = phf_set! {
    "widehat", "widecheck", "widetilde", "utilde"
};

/// Heights of wide accents, by body width in ems (rounded down, capped).
const WIDE_ACCENT_HEIGHTS: [f64; 5] = [0.24, 0.3, 0.3, 0.36, 0.44];

/// Size data of the graphic `name` stretched over `width` ems.
#[must_use]
pub fn image_data(name: &str, width: f64) -> ImageData {
    if WIDE_ACCENTS.contains(name) {
        let index = (width.max(0.0).floor() as usize).min(WIDE_ACCENT_HEIGHTS.len() - 1);
        return ImageData::new(0.0, WIDE_ACCENT_HEIGHTS[index]);
    }
    IMAGES_DATA.get(name).copied().unwrap_or_else(|| {
        debug!(name, "unknown stretchy graphic, using default size");
        FALLBACK_IMAGE
    })
}

/// Whether `name` is a wide accent drawn over its body.
#[must_use]
pub fn is_wide_accent(name: &str) -> bool {
    WIDE_ACCENTS.contains(name)
}

/// A box reserving room for the graphic `name` stretched over `width` ems.
///
/// The box sits on the baseline. Its width is at least the graphic's
/// minimum width.
#[must_use]
pub fn svg_box(name: &str, width: f64, box_type: BoxType) -> LayoutBox {
    let data = image_data(name, width);
    let mut result = LayoutBox::empty(box_type).add_class("ML__stretchy");
    result.svg_body = Some(name.to_owned());
    result.height = data.height;
    result.width = width.max(data.min_width);
    result.max_font_size = 1.0;
    result.set_style(CssProperty::Height, make_em(data.height));
    result.set_style(CssProperty::Width, make_em(result.width));
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_respect_minimum_width() {
        let arrow = svg_box("xrightarrow", 0.5, BoxType::Rel);
        assert_eq!(arrow.svg_body.as_deref(), Some("xrightarrow"));
        assert_eq!(arrow.width, 1.469);
        assert_eq!(arrow.height, 0.522);
        assert_eq!(arrow.box_type, BoxType::Rel);

        let wide = svg_box("overbrace", 3.0, BoxType::Ord);
        assert_eq!(wide.width, 3.0);
    }

    #[test]
    fn wide_accents_grow_with_width() {
        assert_eq!(image_data("widehat", 0.5).height, 0.24);
        assert_eq!(image_data("widehat", 3.2).height, 0.36);
        assert_eq!(image_data("widetilde", 40.0).height, 0.44);
        assert!(is_wide_accent("utilde"));
        assert!(!is_wide_accent("overbrace"));
    }

    #[test]
    fn unknown_graphics_get_a_default_size() {
        assert_eq!(image_data("no-such-arrow", 1.0), FALLBACK_IMAGE);
    }
}

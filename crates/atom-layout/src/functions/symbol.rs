//! Leaf boxes: symbols, placeholders, explicit spaces and error boxes

use tracing::warn;

use crate::atom::Atom;
use crate::box_tree::{BoxType, LayoutBox};
use crate::context::LayoutContext;
use crate::options::Options;
use crate::types::{CssProperty, Mode};
use crate::units::{Measurement, make_em};

/// Glyph shown in an empty slot.
const PLACEHOLDER_GLYPH: &str = "\u{2b1a}";

/// Whether a math-mode symbol is set in italics by default.
fn is_math_italic(value: &str) -> bool {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => ch.is_ascii_alphabetic() || ('\u{3b1}'..='\u{3c9}').contains(&ch),
        _ => false,
    }
}

/// Font family a value-bearing atom is set in.
///
/// An explicit family wins. Otherwise math-mode letters are italic unless
/// the shape is `up`, and everything else is upright.
fn symbol_font(ctx: &LayoutContext, atom: &Atom, options: &Options) -> String {
    if let Some(font) = &options.font {
        return font.clone();
    }
    let value = atom.value().unwrap_or_default();
    if atom.style.font_series.as_deref() == Some("b") && ctx.font_metrics.has_font("Main-Bold") {
        return "Main-Bold".to_owned();
    }
    let upright = atom.style.font_shape.as_deref() == Some("up");
    if atom.mode == Mode::Math && !upright && is_math_italic(value) {
        "Math-Italic".to_owned()
    } else {
        "Main-Regular".to_owned()
    }
}

/// The box of a symbol atom, without its scripts.
#[must_use]
pub fn make_symbol(ctx: &LayoutContext, atom: &Atom, options: &Options) -> LayoutBox {
    let font = symbol_font(ctx, atom, options);
    let value = atom.value().unwrap_or_default();
    LayoutBox::text(value, &font, atom.kind.box_type(), &ctx.font_metrics)
}

/// The box of an empty slot.
#[must_use]
pub fn make_placeholder(ctx: &LayoutContext) -> LayoutBox {
    LayoutBox::text(
        PLACEHOLDER_GLYPH,
        "Main-Regular",
        BoxType::Placeholder,
        &ctx.font_metrics,
    )
    .add_class("ML__placeholder")
}

/// An empty box as wide as `measurement`.
#[must_use]
pub fn make_spacing(measurement: Measurement, options: &Options) -> LayoutBox {
    let mut space = LayoutBox::empty(BoxType::Spacing).add_class("mspace");
    space.width = measurement.to_em(options);
    space.set_style(CssProperty::Width, make_em(space.width));
    space
}

/// A box flagging a construct that could not be laid out.
///
/// The text is set upright in the error color of the settings.
#[must_use]
pub fn make_error_box(ctx: &LayoutContext, text: &str) -> LayoutBox {
    warn!(text, "rendering unresolved construct as an error box");
    let mut error = LayoutBox::text(text, "Main-Regular", BoxType::Error, &ctx.font_metrics)
        .add_class("ML__error");
    error.set_style(CssProperty::Color, ctx.settings.error_color.as_str());
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::{AtomKind, AtomStyle};
    use crate::units::Unit;

    #[test]
    fn letters_are_italic_in_math() {
        let ctx = LayoutContext::default();
        let options = Options::default();
        let x = make_symbol(&ctx, &Atom::symbol(AtomKind::Ord, "x"), &options);
        assert_eq!(x.font.as_deref(), Some("Math-Italic"));
        assert_eq!(x.box_type, BoxType::Ord);

        let plus = make_symbol(&ctx, &Atom::symbol(AtomKind::Bin, "+"), &options);
        assert_eq!(plus.font.as_deref(), Some("Main-Regular"));
        assert_eq!(plus.box_type, BoxType::Bin);

        let upright = Atom::symbol(AtomKind::Ord, "d").with_style(AtomStyle {
            font_shape: Some("up".to_owned()),
            ..AtomStyle::default()
        });
        let d = make_symbol(&ctx, &upright, &options);
        assert_eq!(d.font.as_deref(), Some("Main-Regular"));

        let text = Atom::symbol(AtomKind::Ord, "a").with_mode(Mode::Text);
        assert_eq!(make_symbol(&ctx, &text, &options).font.as_deref(), Some("Main-Regular"));
    }

    #[test]
    fn bold_falls_back_when_the_font_is_missing() {
        let ctx = LayoutContext::default();
        let bold = Atom::symbol(AtomKind::Ord, "1").with_style(AtomStyle {
            font_series: Some("b".to_owned()),
            ..AtomStyle::default()
        });
        let one = make_symbol(&ctx, &bold, &Options::default());
        assert_eq!(one.font.as_deref(), Some("Main-Regular"));
    }

    #[test]
    fn spacing_and_errors() {
        let ctx = LayoutContext::default();
        let options = Options::default();
        let quad = make_spacing(Measurement::new(1.0, Unit::Em), &options);
        assert_eq!(quad.width, 1.0);
        assert_eq!(quad.box_type, BoxType::Spacing);

        let error = make_error_box(&ctx, "\\over");
        assert_eq!(error.box_type, BoxType::Error);
        assert!(error.has_class("ML__error"));
        assert_eq!(error.style.get(CssProperty::Color), Some("#cc0000"));

        let slot = make_placeholder(&ctx);
        assert_eq!(slot.box_type, BoxType::Placeholder);
    }
}

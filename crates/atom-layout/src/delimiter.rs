//! Delimiter handling
//!
//! This module creates and sizes delimiters: parentheses, brackets, braces
//! and bars placed around fractions and arrays. A delimiter of a requested
//! height is found by walking a sequence of candidates, from restyled
//! `Main-Regular` glyphs through the `Size1`..`Size4` fonts, and finally a
//! stacked delimiter drawn as a graphic.

use phf::{Set, phf_map, phf_set};

use crate::box_tree::{BoxType, LayoutBox};
use crate::context::LayoutContext;
use crate::font_metrics::MetricsProvider as _;
use crate::font_metrics_data::CharacterMetrics;
use crate::options::Options;
use crate::style::MathStyle;
use crate::types::CssProperty;
use crate::units::make_em;

/// Candidate in a delimiter sizing sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimiterType {
    /// `Main-Regular` glyph set in the given style
    Small(MathStyle),
    /// Glyph of the `Size<n>-Regular` font
    Large(usize),
    /// Stacked delimiter for very tall content
    Stack,
}

impl DelimiterType {
    fn font(self) -> String {
        match self {
            Self::Small(_) => "Main-Regular".to_owned(),
            Self::Large(size) => format!("Size{size}-Regular"),
            Self::Stack => "Size4-Regular".to_owned(),
        }
    }
}

/// Glyph drawn for a delimiter given by name, like `\lbrace`.
const DELIMITER_GLYPHS: phf::Map<&'static str, char> = phf_map! {
    "\\lparen" => '(',
    "\\rparen" => ')',
    "\\lbrack" => '[',
    "\\rbrack" => ']',
    "\\{" => '{',
    "\\}" => '}',
    "\\lbrace" => '{',
    "\\rbrace" => '}',
    "\\lfloor" => '\u{230a}',
    "\\rfloor" => '\u{230b}',
    "\\lceil" => '\u{2308}',
    "\\rceil" => '\u{2309}',
    "\\langle" => '\u{27e8}',
    "\\rangle" => '\u{27e9}',
    "\\lt" => '\u{27e8}',
    "\\gt" => '\u{27e9}',
    "<" => '\u{27e8}',
    ">" => '\u{27e9}',
    "\\vert" => '\u{2223}',
    "\\lvert" => '\u{2223}',
    "\\rvert" => '\u{2223}',
    "|" => '\u{2223}',
    "\\Vert" => '\u{2225}',
    "\\lVert" => '\u{2225}',
    "\\rVert" => '\u{2225}',
    "\\|" => '\u{2225}',
    "\\backslash" => '\\',
    "\\uparrow" => '\u{2191}',
    "\\downarrow" => '\u{2193}',
    "\\updownarrow" => '\u{2195}',
    "\\Uparrow" => '\u{21d1}',
    "\\Downarrow" => '\u{21d3}',
    "\\Updownarrow" => '\u{21d5}',
};

const STACK_LARGE_DELIMITERS: Set<&str> = phf_set!(
    "(", "\\lparen", ")", "\\rparen", "[", "\\lbrack", "]", "\\rbrack", "\\{", "\\lbrace", "\\}",
    "\\rbrace", "\\lfloor", "\\rfloor", "\u{230a}", "\u{230b}", "\\lceil", "\\rceil", "\u{2308}",
    "\u{2309}", "{", "}",
);

const STACK_NEVER_DELIMITERS: Set<&str> = phf_set!(
    "<",
    ">",
    "\\langle",
    "\\rangle",
    "\u{27e8}",
    "\u{27e9}",
    "/",
    "\\backslash",
    "\\lt",
    "\\gt",
);

const STACK_NEVER_DELIMITER_SEQUENCE: &[DelimiterType] = &[
    DelimiterType::Small(MathStyle::ScriptScript),
    DelimiterType::Small(MathStyle::Script),
    DelimiterType::Small(MathStyle::Text),
    DelimiterType::Large(1),
    DelimiterType::Large(2),
    DelimiterType::Large(3),
    DelimiterType::Large(4),
];

const STACK_ALWAYS_DELIMITER_SEQUENCE: &[DelimiterType] = &[
    DelimiterType::Small(MathStyle::ScriptScript),
    DelimiterType::Small(MathStyle::Script),
    DelimiterType::Small(MathStyle::Text),
    DelimiterType::Stack,
];

const STACK_LARGE_DELIMITER_SEQUENCE: &[DelimiterType] = &[
    DelimiterType::Small(MathStyle::ScriptScript),
    DelimiterType::Small(MathStyle::Script),
    DelimiterType::Small(MathStyle::Text),
    DelimiterType::Large(1),
    DelimiterType::Large(2),
    DelimiterType::Large(3),
    DelimiterType::Large(4),
    DelimiterType::Stack,
];

/// Whether `delim` stands for no delimiter at all.
#[must_use]
pub fn is_null_delimiter(delim: &str) -> bool {
    delim.is_empty() || delim == "."
}

fn delimiter_glyph(delim: &str) -> Option<char> {
    DELIMITER_GLYPHS.get(delim).copied().or_else(|| {
        let mut chars = delim.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Some(ch),
            _ => None,
        }
    })
}

/// An empty box as wide as `\nulldelimiterspace`.
///
/// Stands in for an absent delimiter, so that stacked fractions keep their
/// horizontal alignment.
#[must_use]
pub fn make_null_delimiter(
    ctx: &LayoutContext,
    options: &Options,
    box_type: BoxType,
) -> LayoutBox {
    let mut result = LayoutBox::empty(box_type).add_class("nulldelimiter");
    result.width = ctx.settings.registers.nulldelimiterspace.to_em(options);
    result.set_style(CssProperty::Width, make_em(result.width));
    result
}

/// Moves a delimiter so that it is centered on the math axis.
fn center_on_axis(delim: &mut LayoutBox, options: &Options) {
    let axis = options.font_metrics().axis_height;
    let shift = (delim.height - delim.depth) / 2.0 - axis;
    delim.height -= shift;
    delim.depth += shift;
    delim.set_style(CssProperty::Position, "relative");
    delim.set_style(CssProperty::Top, make_em(shift));
}

fn glyph_box(
    ctx: &LayoutContext,
    glyph: char,
    font: &str,
    box_type: BoxType,
) -> LayoutBox {
    LayoutBox::text(glyph.encode_utf8(&mut [0; 4]), font, box_type, &ctx.font_metrics)
}

/// Makes a small delimiter: a `Main-Regular` glyph restyled to text,
/// script or scriptscript size.
fn make_small_delim(
    ctx: &LayoutContext,
    glyph: char,
    style: MathStyle,
    center: bool,
    options: &Options,
    box_type: BoxType,
) -> LayoutBox {
    let style_options = options.having_style(style);
    let mut delim = glyph_box(ctx, glyph, "Main-Regular", box_type)
        .wrap(&style_options)
        .add_class("ML__small-delim");
    delim.box_type = box_type;
    if center {
        center_on_axis(&mut delim, options);
    }
    delim
}

/// Makes a large delimiter from a `Size<n>-Regular` glyph, always in text
/// style.
fn make_large_delim(
    ctx: &LayoutContext,
    glyph: char,
    size: usize,
    center: bool,
    options: &Options,
    box_type: BoxType,
) -> LayoutBox {
    let text_options = options.having_style(options.style.text());
    let mut delim = glyph_box(ctx, glyph, &DelimiterType::Large(size).font(), box_type)
        .add_class("delimsizing")
        .add_class(&format!("size{size}"))
        .wrap(&text_options);
    delim.box_type = box_type;
    if center {
        center_on_axis(&mut delim, options);
    }
    delim
}

/// Makes a delimiter of arbitrary height drawn as a graphic.
///
/// The box reports exactly the requested total height.
fn make_stacked_delim(
    ctx: &LayoutContext,
    delim: &str,
    glyph: Option<char>,
    height_total: f64,
    center: bool,
    options: &Options,
    box_type: BoxType,
) -> LayoutBox {
    let width = glyph
        .and_then(|ch| ctx.font_metrics.character_metrics(ch, "Size4-Regular"))
        .or_else(|| {
            glyph.and_then(|ch| ctx.font_metrics.character_metrics(ch, "Main-Regular"))
        })
        .map_or(0.5, |metrics| metrics.width);

    let mut result = LayoutBox::empty(box_type).add_class("ML__stacked-delim");
    result.svg_body = Some(format!("stacked:{delim}"));
    result.width = width;
    result.max_font_size = 1.0;
    if center {
        let axis = options.font_metrics().axis_height;
        result.height = height_total / 2.0 + axis;
        result.depth = height_total / 2.0 - axis;
    } else {
        result.height = height_total;
    }
    result.set_style(CssProperty::Height, make_em(height_total));
    result
}

/// Walks a sizing sequence to find the first candidate taller than
/// `height`.
///
/// Smaller styles start earlier in the sequence: scriptscript at index 0,
/// script at 1, text and display at 2.
fn traverse_sequence(
    ctx: &LayoutContext,
    glyph: Option<char>,
    height: f64,
    sequence: &[DelimiterType],
    options: &Options,
) -> DelimiterType {
    let start = 3usize.saturating_sub(options.style.size()).min(2);
    for &delim_type in sequence.iter().skip(start) {
        if delim_type == DelimiterType::Stack {
            // Always the last entry
            break;
        }

        let Some(metrics): Option<CharacterMetrics> =
            glyph.and_then(|ch| ctx.font_metrics.character_metrics(ch, &delim_type.font()))
        else {
            continue;
        };
        let mut height_depth = metrics.height + metrics.depth;

        // Small delimiters are scaled versions of the same glyph
        if let DelimiterType::Small(style) = delim_type {
            height_depth *= options.having_style(style).scaling_factor();
        }

        if height_depth > height {
            return delim_type;
        }
    }

    sequence
        .last()
        .copied()
        .unwrap_or(DelimiterType::Stack)
}

/// Makes a delimiter of the given total height, optionally centered on the
/// axis.
///
/// A null delimiter (`.`) yields [`make_null_delimiter`]. Glyph lookups go
/// through the metrics provider of `ctx`; sizes without a glyph are skipped.
#[must_use]
pub fn custom_sized_delim(
    ctx: &LayoutContext,
    delim: &str,
    height: f64,
    center: bool,
    options: &Options,
    box_type: BoxType,
) -> LayoutBox {
    if is_null_delimiter(delim) {
        return make_null_delimiter(ctx, options, box_type);
    }

    let sequence = if STACK_NEVER_DELIMITERS.contains(delim) {
        STACK_NEVER_DELIMITER_SEQUENCE
    } else if STACK_LARGE_DELIMITERS.contains(delim) {
        STACK_LARGE_DELIMITER_SEQUENCE
    } else {
        STACK_ALWAYS_DELIMITER_SEQUENCE
    };

    let glyph = delimiter_glyph(delim);
    match (traverse_sequence(ctx, glyph, height, sequence, options), glyph) {
        (DelimiterType::Small(style), Some(glyph)) => {
            make_small_delim(ctx, glyph, style, center, options, box_type)
        }
        (DelimiterType::Large(size), Some(glyph)) => {
            make_large_delim(ctx, glyph, size, center, options, box_type)
        }
        _ => make_stacked_delim(ctx, delim, glyph, height, center, options, box_type),
    }
}

/// Makes a delimiter for use around content of the given height and depth,
/// like `\left` and `\right`.
#[must_use]
pub fn left_right_delim(
    ctx: &LayoutContext,
    delim: &str,
    height: f64,
    depth: f64,
    options: &Options,
    box_type: BoxType,
) -> LayoutBox {
    // Always centered, so the axis is always shifted
    let metrics = options.font_metrics();
    let axis_height = metrics.axis_height;

    // tex.web, function make_left_right
    let delimiter_factor = 901.0;
    let delimiter_extend = 5.0 / metrics.pt_per_em;

    let max_dist_from_axis = (height - axis_height).max(depth + axis_height);

    let total_height = (max_dist_from_axis / 500.0 * delimiter_factor)
        .max(2.0f64.mul_add(max_dist_from_axis, -delimiter_extend));

    custom_sized_delim(ctx, delim, total_height, true, options, box_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_delimiter_has_register_width() {
        let ctx = LayoutContext::default();
        let options = Options::default();
        let delim = make_null_delimiter(&ctx, &options, BoxType::Open);
        assert!((delim.width - 0.12).abs() < 1e-12);
        assert!(delim.has_class("nulldelimiter"));
        assert_eq!(
            custom_sized_delim(&ctx, ".", 3.0, true, &options, BoxType::Close),
            make_null_delimiter(&ctx, &options, BoxType::Close)
        );
    }

    #[test]
    fn small_request_uses_main_font() {
        let ctx = LayoutContext::default();
        let options = Options::default();
        let delim = custom_sized_delim(&ctx, "(", 0.9, false, &options, BoxType::Open);
        assert_eq!(delim.font.as_deref(), Some("Main-Regular"));
        assert_eq!(delim.total_height(), 1.0);
        assert_eq!(delim.box_type, BoxType::Open);
    }

    #[test]
    fn larger_requests_pick_size_fonts() {
        let ctx = LayoutContext::default();
        let options = Options::default();
        let delim = custom_sized_delim(&ctx, "(", 1.1, false, &options, BoxType::Open);
        assert!(delim.has_class("size1"));
        let huge = custom_sized_delim(&ctx, "(", 2.5, false, &options, BoxType::Open);
        assert!(huge.has_class("size4"));
    }

    #[test]
    fn very_tall_requests_stack() {
        let ctx = LayoutContext::default();
        let options = Options::default();
        let delim = custom_sized_delim(&ctx, "\\lbrace", 5.0, true, &options, BoxType::Open);
        assert_eq!(delim.svg_body.as_deref(), Some("stacked:\\lbrace"));
        assert!((delim.total_height() - 5.0).abs() < 1e-12);
        assert!((delim.height - delim.depth - 2.0 * 0.25).abs() < 1e-12);
    }

    #[test]
    fn centered_delimiters_straddle_the_axis() {
        let ctx = LayoutContext::default();
        let options = Options::default();
        let delim = left_right_delim(&ctx, "(", 1.0, 0.5, &options, BoxType::Open);
        let axis = options.font_metrics().axis_height;
        assert!(((delim.height - axis) - (delim.depth + axis)).abs() < 1e-9);
    }
}

//! Per-level rendering context
//!
//! An [`Options`] value describes the environment a box is built in: math
//! style, size, colors and phantom state. Options are immutable; every
//! `having_*`/`with_*` method returns a child context that remembers the
//! state of its parent, which is what [`LayoutBox::wrap`] compares against to
//! decide whether a box needs rescaling or recoloring.
//!
//! [`LayoutBox::wrap`]: crate::box_tree::LayoutBox::wrap
use bon::bon;

use crate::font_metrics::{FONT_METRICS, FontMetrics, FontSizeIndex};
use crate::style::MathStyle;
use crate::types::Settings;

/// Size style mapping table
/// Each element contains [textsize, scriptsize, scriptscriptsize].
/// The size mappings are taken from TeX with \normalsize=10pt.
const SIZE_STYLE_MAP: [[usize; 3]; 11] = [
    [1, 1, 1],   // size1: [5, 5, 5]              \tiny
    [2, 1, 1],   // size2: [6, 5, 5]
    [3, 1, 1],   // size3: [7, 5, 5]              \scriptsize
    [4, 2, 1],   // size4: [8, 6, 5]              \footnotesize
    [5, 2, 1],   // size5: [9, 6, 5]              \small
    [6, 3, 1],   // size6: [10, 7, 5]             \normalsize
    [7, 4, 2],   // size7: [12, 8, 6]             \large
    [8, 6, 3],   // size8: [14.4, 10, 7]          \Large
    [9, 7, 6],   // size9: [17.28, 12, 10]        \LARGE
    [10, 8, 7],  // size10: [20.74, 14.4, 12]     \huge
    [11, 10, 9], // size11: [24.88, 20.74, 17.28] \HUGE
];

/// Size multipliers corresponding to different sizes
const SIZE_MULTIPLIERS: [f64; 11] = [0.5, 0.6, 0.7, 0.8, 0.9, 1.0, 1.2, 1.44, 1.728, 2.074, 2.488];

const fn size_at_style(size: usize, style: MathStyle) -> usize {
    if style.size() < 2 {
        size
    } else {
        SIZE_STYLE_MAP[size - 1][style.size() - 1]
    }
}

const fn multiplier_for(size: usize) -> f64 {
    let idx = if size == 0 {
        0
    } else if size > SIZE_MULTIPLIERS.len() {
        SIZE_MULTIPLIERS.len() - 1
    } else {
        size - 1
    };
    SIZE_MULTIPLIERS[idx]
}

/// The parts of the enclosing context a child compares itself against.
#[derive(Debug, Clone, PartialEq)]
pub struct ParentState {
    /// Size multiplier of the enclosing context
    pub size_multiplier: f64,
    /// Color of the enclosing context
    pub color: Option<String>,
    /// Background of the enclosing context
    pub background_color: Option<String>,
    /// Phantom flag of the enclosing context
    pub phantom: bool,
}

#[derive(Debug, Clone, PartialEq)]
/// Rendering context of one nesting level
pub struct Options {
    /// Current math style
    pub style: MathStyle,
    /// Current size index (1 to 11)
    pub size: usize,
    /// Size index of text style at this level
    pub text_size: usize,
    /// Current color
    pub color: Option<String>,
    /// Current background color
    pub background_color: Option<String>,
    /// Phantom flag: content takes space but is not drawn
    pub phantom: bool,
    /// Font family override for glyph lookups (like "Main-Regular")
    pub font: Option<String>,
    /// Size multiplier relative to the base size
    pub size_multiplier: f64,
    /// Maximum size of user-specified dimensions, in ems
    pub max_size: f64,
    /// Minimum rule thickness, in ems
    pub min_rule_thickness: f64,
    /// State of the enclosing context
    pub parent: ParentState,
}

#[bon]
impl Options {
    #[builder]
    /// Create a new root Options instance with builder
    pub fn new(
        style: MathStyle,
        size: Option<usize>,
        color: Option<String>,
        background_color: Option<String>,
        phantom: Option<bool>,
        font: Option<String>,
        max_size: Option<f64>,
        min_rule_thickness: Option<f64>,
    ) -> Self {
        let size = size.unwrap_or(Self::BASESIZE).clamp(1, SIZE_MULTIPLIERS.len());
        let size_multiplier = multiplier_for(size);
        let phantom = phantom.unwrap_or(false);
        Self {
            style,
            size,
            text_size: size,
            parent: ParentState {
                size_multiplier,
                color: color.clone(),
                background_color: background_color.clone(),
                phantom,
            },
            color,
            background_color,
            phantom,
            font,
            size_multiplier,
            max_size: max_size.unwrap_or(f64::INFINITY),
            min_rule_thickness: min_rule_thickness.unwrap_or(0.0),
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::builder().style(MathStyle::Text).build()
    }
}

impl Options {
    /// The base size index
    pub const BASESIZE: usize = 6;

    /// Root options for the given settings.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self::builder()
            .style(if settings.display_mode {
                MathStyle::Display
            } else {
                MathStyle::Text
            })
            .maybe_color(settings.color.clone())
            .maybe_background_color(settings.background_color.clone())
            .max_size(settings.max_size)
            .min_rule_thickness(settings.min_rule_thickness)
            .build()
    }

    /// A child context that records `self` as its parent.
    fn extend(&self) -> Self {
        let mut child = self.clone();
        child.parent = ParentState {
            size_multiplier: self.size_multiplier,
            color: self.color.clone(),
            background_color: self.background_color.clone(),
            phantom: self.phantom,
        };
        child
    }

    /// A child context in the given style.
    #[must_use]
    pub fn having_style(&self, style: MathStyle) -> Self {
        let mut child = self.extend();
        let size = size_at_style(self.text_size, style);
        child.style = style;
        child.size = size;
        child.size_multiplier = multiplier_for(size);
        child
    }

    /// A child context in the cramped version of the current style.
    #[must_use]
    pub fn having_cramped_style(&self) -> Self {
        self.having_style(self.style.cramp())
    }

    /// A child context at the given size, in at least `\textstyle`.
    #[must_use]
    pub fn having_size(&self, size: usize) -> Self {
        let size = size.clamp(1, SIZE_MULTIPLIERS.len());
        let mut child = self.extend();
        child.style = self.style.text();
        child.size = size;
        child.text_size = size;
        child.size_multiplier = multiplier_for(size);
        child
    }

    /// A child context with the given color.
    #[must_use]
    pub fn with_color(&self, color: String) -> Self {
        let mut child = self.extend();
        child.color = Some(color);
        child
    }

    /// A child context with the given background color.
    #[must_use]
    pub fn with_background(&self, color: String) -> Self {
        let mut child = self.extend();
        child.background_color = Some(color);
        child
    }

    /// A child context whose content is invisible.
    #[must_use]
    pub fn with_phantom(&self) -> Self {
        let mut child = self.extend();
        child.phantom = true;
        child
    }

    /// A child context using the given font family for glyph lookups.
    #[must_use]
    pub fn with_font(&self, font: String) -> Self {
        let mut child = self.extend();
        child.font = Some(font);
        child
    }

    /// A single child context applying several overrides at once.
    ///
    /// Unlike chaining `having_size` and `with_color`, the child remembers
    /// `self` as its parent, so one [`LayoutBox::wrap`] records every change.
    ///
    /// [`LayoutBox::wrap`]: crate::box_tree::LayoutBox::wrap
    #[must_use]
    pub fn with_overrides(
        &self,
        size: Option<usize>,
        color: Option<&str>,
        background_color: Option<&str>,
        font: Option<&str>,
    ) -> Self {
        let mut child = self.extend();
        if let Some(size) = size {
            let size = size.clamp(1, SIZE_MULTIPLIERS.len());
            child.style = self.style.text();
            child.size = size;
            child.text_size = size;
            child.size_multiplier = multiplier_for(size);
        }
        if let Some(color) = color {
            child.color = Some(color.to_owned());
        }
        if let Some(background) = background_color {
            child.background_color = Some(background.to_owned());
        }
        if let Some(font) = font {
            child.font = Some(font.to_owned());
        }
        child
    }

    /// Ratio between this context's font size and its parent's.
    #[must_use]
    pub fn scaling_factor(&self) -> f64 {
        self.size_multiplier / self.parent.size_multiplier
    }

    /// Whether the color differs from the parent's.
    #[must_use]
    pub fn color_changed(&self) -> bool {
        self.color.is_some() && self.color != self.parent.color
    }

    /// Whether the background differs from the parent's.
    #[must_use]
    pub fn background_changed(&self) -> bool {
        self.background_color.is_some() && self.background_color != self.parent.background_color
    }

    /// Whether this context turned phantom relative to its parent.
    #[must_use]
    pub const fn phantom_changed(&self) -> bool {
        self.phantom && !self.parent.phantom
    }

    /// Whether the style is display or cramped display.
    #[must_use]
    pub const fn is_display_style(&self) -> bool {
        self.style.is_display()
    }

    /// Whether the tight spacing table applies.
    #[must_use]
    pub const fn is_tight(&self) -> bool {
        self.style.is_tight()
    }

    /// Layout constants for the current size.
    #[must_use]
    pub const fn font_metrics(&self) -> &'static FontMetrics {
        let size_index: FontSizeIndex = if self.size >= 5 {
            0
        } else if self.size >= 3 {
            1
        } else {
            2
        };

        &FONT_METRICS[size_index]
    }
}

//! Box tree produced by layout
//!
//! A [`LayoutBox`] is the elementary renderable unit: a string leaf or a list
//! of child boxes, with TeX dimensions in ems. The markup serializer consumes
//! these boxes; nothing in this crate reads `classes` or `style` back for
//! layout decisions.

use alloc::rc::Rc;

use strum::{AsRefStr, Display, EnumString};

use crate::font_metrics::{MetricsProvider, get_character_metrics};
use crate::options::Options;
use crate::types::{CssProperty, CssStyle};

/// Semantic class of a box.
///
/// The first eight variants are the TeX atom classes used by the spacing
/// tables. The rest are structural markers that control composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum BoxType {
    /// Ordinary atom
    #[default]
    Ord,
    /// Binary operator
    Bin,
    /// Large operator
    Op,
    /// Relation
    Rel,
    /// Opening delimiter
    Open,
    /// Closing delimiter
    Close,
    /// Punctuation
    Punct,
    /// Inner list, such as a fraction
    Inner,
    /// Branch sentinel; starts a new list for spacing purposes
    First,
    /// Invisible for spacing, never the predecessor of another box
    Ignore,
    /// Children are spliced into the enclosing list for spacing
    Lift,
    /// Explicit space
    Spacing,
    /// Base with attached scripts
    #[strum(serialize = "supsub")]
    SupSub,
    /// Empty slot of an incomplete construct
    Placeholder,
    /// Unresolved construct
    Error,
}

impl BoxType {
    /// Whether the type takes part in the inter-atom spacing tables.
    #[must_use]
    pub const fn is_spacing_class(self) -> bool {
        matches!(
            self,
            Self::Ord
                | Self::Bin
                | Self::Op
                | Self::Rel
                | Self::Open
                | Self::Close
                | Self::Punct
                | Self::Inner
        )
    }
}

/// What a box contains.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum BoxContent {
    /// Nothing, the box only occupies space
    #[default]
    Empty,
    /// A string set in a single font
    Text(String),
    /// Nested boxes laid out horizontally
    Children(Vec<LayoutBox>),
}

/// A dimensioned layout unit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutBox {
    /// Semantic class, drives spacing
    pub box_type: BoxType,
    /// Leaf text or child boxes
    pub content: BoxContent,
    /// Font family of a text leaf
    pub font: Option<String>,
    /// Distance above the baseline
    pub height: f64,
    /// Distance below the baseline
    pub depth: f64,
    /// Italic correction
    pub italic: f64,
    /// Skew kern for accent placement
    pub skew: f64,
    /// Advance width
    pub width: f64,
    /// Largest font size multiplier inside this box
    pub max_font_size: f64,
    /// Extra space on the left, from inter-atom spacing or placement
    pub left: f64,
    /// Extra space on the right
    pub margin_right: f64,
    /// Whether the box was built in a script style
    pub is_tight: bool,
    /// Class names for the serializer
    pub classes: Vec<String>,
    /// Style entries for the serializer
    pub style: CssStyle,
    /// Name of a stretchy graphic drawn in place of content
    pub svg_body: Option<String>,
    /// Caret decoration
    pub caret: bool,
    /// Selection decoration
    pub is_selected: bool,
}

impl LayoutBox {
    /// A box with no content and no dimensions.
    #[must_use]
    pub fn empty(box_type: BoxType) -> Self {
        Self {
            box_type,
            ..Self::default()
        }
    }

    /// A leaf holding `value` set in `font`.
    ///
    /// Height, depth, italic and skew are the maxima over the characters,
    /// the width is the sum of their advances.
    pub fn text(
        value: &str,
        font: &str,
        box_type: BoxType,
        metrics: &dyn MetricsProvider,
    ) -> Self {
        let mut height = 0.0f64;
        let mut depth = 0.0f64;
        let mut italic = 0.0f64;
        let mut skew = 0.0f64;
        let mut width = 0.0f64;
        for ch in value.chars() {
            let m = get_character_metrics(metrics, ch, font);
            height = height.max(m.height);
            depth = depth.max(m.depth);
            italic = italic.max(m.italic);
            skew = skew.max(m.skew);
            width += m.width;
        }

        Self {
            box_type,
            content: BoxContent::Text(value.to_owned()),
            font: Some(font.to_owned()),
            height,
            depth,
            italic,
            skew,
            width,
            max_font_size: 1.0,
            ..Self::default()
        }
    }

    /// A composite of `children`, laid out horizontally.
    ///
    /// A single child is inherited verbatim. Two or more children take the
    /// maximum height and depth and the sum of the widths.
    #[must_use]
    pub fn new(children: Vec<Self>, box_type: BoxType) -> Self {
        let mut result = Self::empty(box_type);
        match children.as_slice() {
            [] => {}
            [only] => {
                result.height = only.height;
                result.depth = only.depth;
                result.italic = only.italic;
                result.skew = only.skew;
                result.width = only.left + only.width + only.margin_right;
                result.max_font_size = only.max_font_size;
            }
            many => {
                for child in many {
                    result.height = result.height.max(child.height);
                    result.depth = result.depth.max(child.depth);
                    result.max_font_size = result.max_font_size.max(child.max_font_size);
                    result.width += child.left + child.width + child.margin_right;
                }
                if let Some(last) = many.last() {
                    result.italic = last.italic;
                }
            }
        }
        if !children.is_empty() {
            result.content = BoxContent::Children(children);
        }
        result
    }

    /// A zero-sized box of the given class, used for struts and fillers.
    #[must_use]
    pub fn with_class(class: &str) -> Self {
        Self::empty(BoxType::Ignore).add_class(class)
    }

    /// Adds a class name.
    #[must_use]
    pub fn add_class(mut self, class: &str) -> Self {
        self.push_class(class);
        self
    }

    /// Adds a class name in place.
    pub fn push_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_owned());
        }
    }

    /// Whether the box carries `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Sets a style entry.
    pub fn set_style<T: Into<Rc<str>>>(&mut self, property: CssProperty, value: T) {
        self.style.insert(property, value);
    }

    /// Sum of height and depth.
    #[must_use]
    pub fn total_height(&self) -> f64 {
        self.height + self.depth
    }

    /// Child boxes, empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match &self.content {
            BoxContent::Children(children) => children,
            BoxContent::Empty | BoxContent::Text(_) => &[],
        }
    }

    /// Mutable child boxes, empty for leaves.
    pub fn children_mut(&mut self) -> &mut [Self] {
        match &mut self.content {
            BoxContent::Children(children) => children,
            BoxContent::Empty | BoxContent::Text(_) => &mut [],
        }
    }

    /// Text of a leaf box.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match &self.content {
            BoxContent::Text(text) => Some(text),
            BoxContent::Empty | BoxContent::Children(_) => None,
        }
    }

    /// Adapts a box built in `options` to the context of its parent.
    ///
    /// When the font size, color, background and phantom state all match
    /// the parent the box is returned unchanged. Otherwise it is nested in a
    /// box of the same type carrying the changes, with its dimensions
    /// converted to the parent's ems.
    #[must_use]
    pub fn wrap(self, options: &Options) -> Self {
        let factor = options.scaling_factor();
        let color = options.color_changed();
        let background = options.background_changed();
        let phantom = options.phantom_changed();
        if factor == 1.0 && !color && !background && !phantom {
            return self;
        }

        let box_type = self.box_type;
        let is_tight = self.is_tight;
        let mut outer = Self::new(vec![self], box_type);
        outer.is_tight = is_tight;

        if factor != 1.0 {
            outer.set_style(CssProperty::FontSize, format_percent(factor));
            outer.height *= factor;
            outer.depth *= factor;
            outer.italic *= factor;
            outer.skew *= factor;
            outer.width *= factor;
            outer.max_font_size *= factor;
        }
        if color && let Some(value) = &options.color {
            outer.set_style(CssProperty::Color, value.as_str());
        }
        if background && let Some(value) = &options.background_color {
            outer.set_style(CssProperty::BackgroundColor, value.as_str());
            outer.set_style(CssProperty::Display, "inline-block");
        }
        if phantom {
            outer.set_style(CssProperty::Opacity, "0");
        }
        outer
    }
}

/// Formats a scale factor as a CSS percentage, like `70%`.
fn format_percent(factor: f64) -> String {
    let mut s = format!("{:.2}", factor * 100.0);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s.push('%');
    s
}

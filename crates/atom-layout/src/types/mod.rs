//! Core type definitions shared across the layout engine

use core::fmt;
use core::option;

use alloc::rc::Rc;

use rapidhash::{RapidHashMap, RapidHashSet};
use strum::{AsRefStr, Display, EnumCount, EnumIter, EnumString, FromRepr};

mod layout_error;
pub use layout_error::{LayoutError, LayoutErrorKind};

mod settings;
pub use settings::{Registers, Settings};

/// Make it easier to switch between different hash backends.
pub type KeyMap<K, V> = RapidHashMap<K, V>;
/// Alias for the default hash set.
pub type KeySet<K> = RapidHashSet<K>;

/// Parsing mode of an atom.
///
/// Math atoms follow mathematical typesetting conventions (italic letters,
/// inter-atom spacing), text atoms are set upright without math spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AsRefStr, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// Mathematical mode
    #[default]
    Math,
    /// Text mode
    Text,
}

/// Style properties understood by the markup serializer.
///
/// The layout engine only writes these, it never reads them back for layout
/// decisions. Serialized in `kebab-case`.
#[derive(
    EnumIter, Debug, Copy, AsRefStr, PartialEq, Eq, Hash, Clone, Display, EnumCount, FromRepr,
)]
#[strum(serialize_all = "kebab-case")]
#[repr(u8)]
pub enum CssProperty {
    /// Background color of a box whose context changed background.
    BackgroundColor,
    /// Border style of a vertical array separator.
    BorderRightStyle,
    /// Border width of a vertical array separator.
    BorderRightWidth,
    /// Foreground color of a box whose context changed color.
    Color,
    /// Display override, set together with a background color.
    Display,
    /// Relative font size of a rescaled box.
    FontSize,
    /// Explicit height, used by struts and separators.
    Height,
    /// Opacity, zero for phantom content.
    Opacity,
    /// Positioning scheme, used by over/under stacks.
    Position,
    /// Vertical offset of a child inside a vertical list.
    Top,
    /// Vertical alignment of separators and struts.
    VerticalAlign,
    /// Explicit width, used by gaps.
    Width,
}

/// Opaque style bag attached to every box.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct CssStyle {
    map: [Option<Rc<str>>; CssProperty::COUNT],
}

impl fmt::Debug for CssStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ds = f.debug_struct("CssStyle");
        for (property, value) in self {
            ds.field(property.as_ref(), &value);
        }
        ds.finish()
    }
}

/// Iterator over CSS style properties
pub struct CssStyleIter<'a> {
    index: usize,
    data: &'a [Option<Rc<str>>; CssProperty::COUNT],
}

impl<'a> Iterator for CssStyleIter<'a> {
    type Item = (CssProperty, &'a str);
    fn next(&mut self) -> Option<Self::Item> {
        while self.index < CssProperty::COUNT {
            let idx = self.index;
            self.index += 1;
            if let Some(v) = &self.data[idx]
                && let Some(prop) = CssProperty::from_repr(idx as u8)
            {
                return Some((prop, v.as_ref()));
            }
        }
        None
    }
}

impl<'a> IntoIterator for &'a CssStyle {
    type Item = (CssProperty, &'a str);
    type IntoIter = CssStyleIter<'a>;
    fn into_iter(self) -> Self::IntoIter {
        CssStyleIter {
            index: 0,
            data: &self.map,
        }
    }
}

impl CssStyle {
    /// Inserts or updates a property.
    #[inline]
    pub fn insert<T>(&mut self, property: CssProperty, value: T)
    where
        T: Into<Rc<str>>,
    {
        self.map[property as usize] = Some(value.into());
    }

    #[inline]
    /// Checks if the style contains a specific property.
    #[must_use]
    pub const fn contains_key(&self, property: CssProperty) -> bool {
        self.map[property as usize].is_some()
    }

    #[inline]
    /// Retrieves the value of a property, if set.
    #[must_use]
    pub fn get(&self, property: CssProperty) -> Option<&str> {
        self.map[property as usize].as_deref()
    }

    /// Checks if the style contains no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.iter().all(option::Option::is_none)
    }

    /// Iterates over the set properties in declaration order.
    #[must_use]
    pub fn iter(&self) -> CssStyleIter<'_> {
        self.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr as _;

    #[test]
    fn css_style_iterates_in_declaration_order() {
        let mut style = CssStyle::default();
        style.insert(CssProperty::Opacity, "0");
        style.insert(CssProperty::Color, "red");
        let collected: Vec<_> = style.iter().collect();
        assert_eq!(
            collected,
            vec![(CssProperty::Color, "red"), (CssProperty::Opacity, "0")]
        );
        assert_eq!(CssProperty::BackgroundColor.as_ref(), "background-color");
    }

    #[test]
    fn mode_round_trips_through_strings() {
        assert_eq!(Mode::from_str("text"), Ok(Mode::Text));
        assert_eq!(Mode::Math.to_string(), "math");
    }
}

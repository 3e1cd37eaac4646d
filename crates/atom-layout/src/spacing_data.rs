//! Inter-atom spacing tables
//!
//! This module provides the spacing relationships between the classes of
//! adjacent boxes. The tables name a spacing register rather than a length:
//! the register values live in [`Registers`] and can be overridden through
//! [`Settings`](crate::types::Settings).

use phf::{Map, phf_map};

use crate::types::Registers;
use crate::units::Measurement;

/// One of the three math spacing registers.
///
/// In LaTeX these correspond to `\,` (thin), `\:` (medium) and `\;` (thick),
/// 3, 4 and 5 mu with the default registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpacingRegister {
    /// `\thinmuskip`
    Thin,
    /// `\medmuskip`
    Medium,
    /// `\thickmuskip`
    Thick,
}

impl SpacingRegister {
    /// Current value of the register.
    #[must_use]
    pub const fn measurement(self, registers: &Registers) -> Measurement {
        match self {
            Self::Thin => registers.thinmuskip,
            Self::Medium => registers.medmuskip,
            Self::Thick => registers.thickmuskip,
        }
    }
}

use SpacingRegister::{Medium, Thick, Thin};

/// Spacing between box classes: left class, then right class.
///
/// Keys are the names of [`BoxType`](crate::box_tree::BoxType) spacing
/// classes: `ord`, `op`, `bin`, `rel`, `open`, `close`, `punct`, `inner`.
pub type Spacings = Map<&'static str, Map<&'static str, SpacingRegister>>;

/// Spacing relationships for display and text styles.
///
/// | Left \ Right | ord  | op   | bin  | rel  | open | close | punct | inner |
/// |--------------|------|------|------|------|------|-------|-------|-------|
/// | ord          | -    | thin | med  | thick| -    | -     | -     | thin  |
/// | op           | thin | thin | -    | thick| -    | -     | -     | thin  |
/// | bin          | med  | med  | -    | -    | med  | -     | -     | med   |
/// | rel          | thick| thick| -    | -    | thick| -     | -     | thick |
/// | open         | -    | -    | -    | -    | -    | -     | -     | -     |
/// | close        | -    | thin | med  | thick| -    | -     | -     | thin  |
/// | punct        | thin | thin | -    | thick| thin | thin  | thin  | thin  |
/// | inner        | thin | thin | med  | thick| thin | -     | thin  | thin  |
pub const SPACINGS: Spacings = phf_map! {
    "ord" => phf_map! {
        "op" => Thin,
        "bin" => Medium,
        "rel" => Thick,
        "inner" => Thin,
    },
    "op" => phf_map! {
        "ord" => Thin,
        "op" => Thin,
        "rel" => Thick,
        "inner" => Thin,
    },
    "bin" => phf_map! {
        "ord" => Medium,
        "op" => Medium,
        "open" => Medium,
        "inner" => Medium,
    },
    "rel" => phf_map! {
        "ord" => Thick,
        "op" => Thick,
        "open" => Thick,
        "inner" => Thick,
    },
    "open" => phf_map!{},
    "close" => phf_map! {
        "op" => Thin,
        "bin" => Medium,
        "rel" => Thick,
        "inner" => Thin,
    },
    "punct" => phf_map! {
        "ord" => Thin,
        "op" => Thin,
        "rel" => Thick,
        "open" => Thin,
        "close" => Thin,
        "punct" => Thin,
        "inner" => Thin,
    },
    "inner" => phf_map! {
        "ord" => Thin,
        "op" => Thin,
        "bin" => Medium,
        "rel" => Thick,
        "open" => Thin,
        "punct" => Thin,
        "inner" => Thin,
    },
};

/// Spacing relationships for script and scriptscript styles.
///
/// Only the thin spaces around operators survive in the smaller styles.
pub const TIGHT_SPACINGS: Spacings = phf_map! {
    "ord" => phf_map! {
        "op" => Thin,
    },
    "op" => phf_map! {
        "ord" => Thin,
        "op" => Thin,
    },
    "bin" => phf_map!{},
    "rel" => phf_map!{},
    "open" => phf_map!{},
    "close" => phf_map! {
        "op" => Thin,
    },
    "punct" => phf_map!{},
    "inner" => phf_map! {
        "op" => Thin,
    },
};

/// Register to insert between a `left` and a `right` box class, if any.
#[must_use]
pub fn spacing_between(left: &str, right: &str, tight: bool) -> Option<SpacingRegister> {
    let table = if tight { &TIGHT_SPACINGS } else { &SPACINGS };
    table.get(left).and_then(|row| row.get(right)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Unit;

    #[test]
    fn test_register_values() {
        let registers = Registers::default();
        assert_eq!(Thin.measurement(&registers), Measurement::new(3.0, Unit::Mu));
        assert_eq!(Medium.measurement(&registers), Measurement::new(4.0, Unit::Mu));
        assert_eq!(Thick.measurement(&registers), Measurement::new(5.0, Unit::Mu));
    }

    #[test]
    fn test_spacings_structure() {
        for class in ["ord", "op", "bin", "rel", "open", "close", "punct", "inner"] {
            assert!(SPACINGS.contains_key(class), "Missing class: {class}");
            assert!(TIGHT_SPACINGS.contains_key(class), "Missing class: {class}");
        }

        assert_eq!(spacing_between("ord", "op", false), Some(Thin));
        assert_eq!(spacing_between("ord", "bin", false), Some(Medium));
        assert_eq!(spacing_between("ord", "rel", false), Some(Thick));
        assert_eq!(spacing_between("punct", "rel", false), Some(Thick));
        assert_eq!(spacing_between("ord", "ord", false), None);
        assert_eq!(spacing_between("open", "ord", false), None);
        assert_eq!(spacing_between("supsub", "ord", false), None);
    }

    #[test]
    fn test_tight_spacings_structure() {
        assert_eq!(TIGHT_SPACINGS.get("ord").map(Map::len), Some(1));
        assert_eq!(spacing_between("ord", "op", true), Some(Thin));
        assert_eq!(spacing_between("ord", "bin", true), None);
        assert_eq!(spacing_between("inner", "op", true), Some(Thin));
    }
}

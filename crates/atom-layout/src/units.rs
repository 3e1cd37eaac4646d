//! Units conversion utilities
//!
//! Converts TeX dimensions into ems of the current [`Options`]. Absolute units
//! go through TeX points, `mu` follows the math style, `em` and `ex` always
//! refer to the text style font at the current size.

use core::fmt;
use core::str::FromStr;

use strum::{AsRefStr, Display, EnumString};

use crate::options::Options;
use crate::types::{LayoutError, LayoutErrorKind};

/// A TeX length unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Unit {
    /// TeX point
    Pt,
    /// Millimeter
    Mm,
    /// Centimeter
    Cm,
    /// Inch
    In,
    /// Big (PostScript) point
    Bp,
    /// CSS pixel, treated as a big point
    Px,
    /// Pica
    Pc,
    /// Didot
    Dd,
    /// Cicero (12 didot)
    Cc,
    /// New didot
    Nd,
    /// New cicero (12 new didot)
    Nc,
    /// Scaled point
    Sp,
    /// Quad of the current font
    Em,
    /// x-height of the current font
    Ex,
    /// Math unit, 1/18 em of the math style
    Mu,
}

impl Unit {
    /// TeX points per unit for absolute units.
    #[must_use]
    pub fn pt_per_unit(self) -> Option<f64> {
        match self {
            Self::Pt => Some(1.0),
            Self::Mm => Some(7227.0 / 2540.0),
            Self::Cm => Some(7227.0 / 254.0),
            Self::In => Some(72.27),
            // \pdfpxdimen defaults to 1 bp in pdfTeX and LuaTeX
            Self::Bp | Self::Px => Some(803.0 / 800.0),
            Self::Pc => Some(12.0),
            Self::Dd => Some(1238.0 / 1157.0),
            Self::Cc => Some(14856.0 / 1157.0),
            Self::Nd => Some(685.0 / 642.0),
            Self::Nc => Some(1370.0 / 107.0),
            Self::Sp => Some(1.0 / 65536.0),
            Self::Em | Self::Ex | Self::Mu => None,
        }
    }
}

/// A number with a unit, such as `3mu` or `0.4pt`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Numeric value of the measurement
    pub number: f64,
    /// Unit of measurement
    pub unit: Unit,
}

impl Measurement {
    /// Creates a measurement.
    #[must_use]
    pub const fn new(number: f64, unit: Unit) -> Self {
        Self { number, unit }
    }

    /// A length in ems of the current font.
    #[must_use]
    pub const fn em(number: f64) -> Self {
        Self::new(number, Unit::Em)
    }

    /// Converts this measurement into ems for the given options.
    #[must_use]
    pub fn to_em(&self, options: &Options) -> f64 {
        let scale = if let Some(pt) = self.unit.pt_per_unit() {
            // Absolute units: unit -> pt -> em, then undo the size scaling.
            pt / options.font_metrics().pt_per_em / options.size_multiplier
        } else if self.unit == Unit::Mu {
            options.font_metrics().css_em_per_mu
        } else {
            let unit_options = if options.style.is_tight() {
                options.having_style(options.style.text())
            } else {
                options.clone()
            };
            let metrics = unit_options.font_metrics();
            let mut scale = if self.unit == Unit::Ex {
                metrics.x_height
            } else {
                metrics.quad
            };
            if unit_options.size != options.size {
                scale *= unit_options.size_multiplier / options.size_multiplier;
            }
            scale
        };

        f64::min(self.number * scale, options.max_size)
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.number, self.unit)
    }
}

impl FromStr for Measurement {
    type Err = LayoutError;

    /// Parses `"<number><unit>"`, e.g. `"-1.5em"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| c.is_ascii_alphabetic())
            .ok_or_else(|| {
                LayoutError::new(LayoutErrorKind::InvalidUnit { unit: s.to_owned() })
            })?;
        let (number, unit) = s.split_at(split);
        let number = number.trim().parse::<f64>().map_err(|_| {
            LayoutError::new(LayoutErrorKind::InvalidUnit { unit: s.to_owned() })
        })?;
        let unit = Unit::from_str(unit.trim()).map_err(|_| {
            LayoutError::new(LayoutErrorKind::InvalidUnit {
                unit: unit.to_owned(),
            })
        })?;
        Ok(Self { number, unit })
    }
}

/// Round to 4 decimal places and append "em", dropping trailing zeros.
#[must_use]
pub fn make_em(n: f64) -> String {
    let mut s = format!("{n:.4}");

    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }

    if s == "-0" {
        "0".clone_into(&mut s);
    }

    s.push_str("em");
    s
}

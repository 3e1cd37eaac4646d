use bon::bon;

use crate::units::{Measurement, Unit};

/// TeX dimension registers consulted during layout.
///
/// Each register holds a [`Measurement`] that is converted to ems against the
/// current [`Options`](crate::options::Options) when it is read, so `mu`
/// registers shrink with the math style while `pt` registers stay absolute.
#[derive(Debug, Clone, PartialEq)]
pub struct Registers {
    /// `\thinmuskip`, the space inserted for thin inter-atom pairs.
    pub thinmuskip: Measurement,
    /// `\medmuskip`, the space around binary operators.
    pub medmuskip: Measurement,
    /// `\thickmuskip`, the space around relations.
    pub thickmuskip: Measurement,
    /// `\arraycolsep`, half the gap between array columns.
    pub arraycolsep: Measurement,
    /// `\jot`, extra depth between rows of align-like environments.
    pub jot: Measurement,
    /// `\baselineskip`, distance between array row baselines before stretch.
    pub baselineskip: Measurement,
    /// `\arrayrulewidth`, thickness of array separators.
    pub arrayrulewidth: Measurement,
    /// `\doublerulesep`, gap between adjacent array separators.
    pub doublerulesep: Measurement,
    /// `\nulldelimiterspace`, width of an absent delimiter.
    pub nulldelimiterspace: Measurement,
    /// `\scriptspace`, space after a superscript or subscript.
    pub scriptspace: Measurement,
}

impl Default for Registers {
    fn default() -> Self {
        Self {
            thinmuskip: Measurement::new(3.0, Unit::Mu),
            medmuskip: Measurement::new(4.0, Unit::Mu),
            thickmuskip: Measurement::new(5.0, Unit::Mu),
            arraycolsep: Measurement::new(5.0, Unit::Pt),
            jot: Measurement::new(3.0, Unit::Pt),
            baselineskip: Measurement::new(12.0, Unit::Pt),
            arrayrulewidth: Measurement::new(0.4, Unit::Pt),
            doublerulesep: Measurement::new(2.0, Unit::Pt),
            nulldelimiterspace: Measurement::new(1.2, Unit::Pt),
            scriptspace: Measurement::new(0.5, Unit::Pt),
        }
    }
}

/// Resolved layout configuration.
///
/// All fields hold concrete values; construct through [`Settings::builder`]
/// to get the defaults for anything left unset.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Whether the root list is laid out in display style.
    pub display_mode: bool,
    /// Lower bound for rule thicknesses, in ems.
    pub min_rule_thickness: f64,
    /// Upper bound for user-specified sizes, in ems.
    pub max_size: f64,
    /// Foreground color of the root context.
    pub color: Option<String>,
    /// Background color of the root context.
    pub background_color: Option<String>,
    /// Color recorded on error boxes.
    pub error_color: String,
    /// Dimension registers.
    pub registers: Registers,
}

#[bon]
impl Settings {
    /// Creates a new [`Settings`] instance from optional configuration values.
    ///
    /// # Default Values
    /// - `display_mode`: `false` (text style at the root)
    /// - `min_rule_thickness`: `0.0`
    /// - `max_size`: `f64::INFINITY`
    /// - `error_color`: `"#cc0000"`
    /// - `registers`: the LaTeX defaults, see [`Registers::default`]
    #[must_use]
    #[builder]
    pub fn new(
        /// Lay out the root in display style.
        display_mode: Option<bool>,
        /// Minimum rule thickness in ems.
        min_rule_thickness: Option<f64>,
        /// Maximum allowed size in ems.
        max_size: Option<f64>,
        /// Root foreground color.
        color: Option<String>,
        /// Root background color.
        background_color: Option<String>,
        /// Color for error boxes.
        error_color: Option<String>,
        /// Register overrides.
        registers: Option<Registers>,
    ) -> Self {
        Self {
            display_mode: display_mode.unwrap_or(false),
            min_rule_thickness: min_rule_thickness.unwrap_or(0.0).max(0.0),
            max_size: max_size.unwrap_or(f64::INFINITY).max(0.0),
            color,
            background_color,
            error_color: error_color.unwrap_or_else(|| "#cc0000".to_owned()),
            registers: registers.unwrap_or_default(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::builder().build()
    }
}

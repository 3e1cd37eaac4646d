//! Math styles and the transitions between them
//!
//! TeX distinguishes four math styles (display, text, script, scriptscript),
//! each in a normal and a cramped variant. Cramped styles lower superscripts
//! and are used wherever something sits underneath a bar or an accent.
//! The lookup tables below encode the style changes of Appendix G, rules
//! 11 through 18.

use strum::{AsRefStr, Display, EnumCount, EnumIter, EnumString, FromRepr};

/// One of the eight TeX math styles.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
    FromRepr,
)]
#[repr(u8)]
pub enum MathStyle {
    /// `\displaystyle`
    #[strum(serialize = "displaystyle")]
    Display,
    /// Cramped display style, used for display denominators
    #[strum(serialize = "displaystyle-cramped")]
    DisplayCramped,
    /// `\textstyle`
    #[strum(serialize = "textstyle")]
    Text,
    /// Cramped text style
    #[strum(serialize = "textstyle-cramped")]
    TextCramped,
    /// `\scriptstyle`
    #[strum(serialize = "scriptstyle")]
    Script,
    /// Cramped script style
    #[strum(serialize = "scriptstyle-cramped")]
    ScriptCramped,
    /// `\scriptscriptstyle`
    #[strum(serialize = "scriptscriptstyle")]
    ScriptScript,
    /// Cramped scriptscript style
    #[strum(serialize = "scriptscriptstyle-cramped")]
    ScriptScriptCramped,
}

use MathStyle::{
    Display as D, DisplayCramped as DC, Script as S, ScriptCramped as SC, ScriptScript as SS,
    ScriptScriptCramped as SSC, Text as T, TextCramped as TC,
};

const SUP: [MathStyle; 8] = [S, SC, S, SC, SS, SSC, SS, SSC];
const SUB: [MathStyle; 8] = [SC, SC, SC, SC, SSC, SSC, SSC, SSC];
const FRAC_NUM: [MathStyle; 8] = [T, TC, S, SC, SS, SSC, SS, SSC];
const FRAC_DEN: [MathStyle; 8] = [TC, TC, SC, SC, SSC, SSC, SSC, SSC];
const CRAMP: [MathStyle; 8] = [DC, DC, TC, TC, SC, SC, SSC, SSC];
const TEXT_LOOKUP: [MathStyle; 8] = [D, DC, T, TC, T, TC, T, TC];

impl MathStyle {
    const fn id(self) -> usize {
        self as usize
    }

    /// Size level: 0 display, 1 text, 2 script, 3 scriptscript.
    #[must_use]
    pub const fn size(self) -> usize {
        self.id() / 2
    }

    /// Whether this is a cramped style.
    #[must_use]
    pub const fn is_cramped(self) -> bool {
        self.id() % 2 == 1
    }

    /// Whether this is one of the two display styles.
    #[must_use]
    pub const fn is_display(self) -> bool {
        self.size() == 0
    }

    /// Style of a superscript attached to a base in this style.
    #[must_use]
    pub const fn sup(self) -> Self {
        SUP[self.id()]
    }

    /// Style of a subscript attached to a base in this style.
    #[must_use]
    pub const fn sub(self) -> Self {
        SUB[self.id()]
    }

    /// Style of a fraction numerator.
    #[must_use]
    pub const fn frac_num(self) -> Self {
        FRAC_NUM[self.id()]
    }

    /// Style of a fraction denominator.
    #[must_use]
    pub const fn frac_den(self) -> Self {
        FRAC_DEN[self.id()]
    }

    /// Cramped variant; cramping a cramped style is a no-op.
    #[must_use]
    pub const fn cramp(self) -> Self {
        CRAMP[self.id()]
    }

    /// Text or display version of this style, keeping crampedness.
    #[must_use]
    pub const fn text(self) -> Self {
        TEXT_LOOKUP[self.id()]
    }

    /// Script and scriptscript styles use the tight spacing table.
    #[must_use]
    pub const fn is_tight(self) -> bool {
        self.size() >= 2
    }
}

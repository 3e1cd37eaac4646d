//! Atom tree: the input of layout
//!
//! An atom is one mathematical construct: a symbol, a fraction, an accent,
//! an array. Atoms live in an arena ([`AtomTree`]) and refer to each other by
//! [`AtomId`]. A structural atom owns named branches, each an ordered list of
//! child atoms whose element 0 is a sentinel atom of kind
//! [`AtomKind::First`]; an array atom additionally owns a grid of cell
//! branches. Children point back at their parent through a weak index that is
//! only used for lookup and invalidation.

use core::cell::OnceCell;
use core::fmt;

use strum::EnumCount as _;

use crate::box_tree::BoxType;
use crate::style::MathStyle;
use crate::types::Mode;
use crate::units::Measurement;

mod array;
mod branch;
mod serialize;
mod tree;

pub use array::Grid;
pub use branch::{BranchId, BranchName};
pub use tree::AtomTree;

/// Index of an atom in its [`AtomTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomId(pub(crate) usize);

impl AtomId {
    /// Position of the atom in the arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for AtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether limits of a big operator go above and below it or to the side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Limits {
    /// Above and below in display style, to the side otherwise
    #[default]
    Auto,
    /// Always above and below (`\limits`)
    Limits,
    /// Always to the side (`\nolimits`)
    NoLimits,
}

/// Options of a big operator such as `\sum` or `\int`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpOptions {
    /// Placement of scripts
    pub limits: Limits,
    /// Whether the symbol grows in display style
    pub large: bool,
}

/// Horizontal alignment of the numerator and denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FracAlign {
    /// Flush left
    Left,
    /// Centered
    #[default]
    Center,
    /// Flush right
    Right,
}

/// Options of a generalized fraction (`\frac`, `\binom`, `\cfrac`, ...).
#[derive(Debug, Clone, PartialEq, bon::Builder)]
pub struct GenfracOptions {
    /// Draw the fraction bar
    #[builder(default = true)]
    pub has_bar_line: bool,
    /// Bar thickness, the default rule thickness when absent
    pub bar_thickness: Option<Measurement>,
    /// Left delimiter, such as `(` for `\binom`
    pub left_delim: Option<String>,
    /// Right delimiter
    pub right_delim: Option<String>,
    /// Style override, like `\dfrac` or `\tfrac`
    pub math_style: Option<MathStyle>,
    /// Alignment of numerator and denominator
    #[builder(default)]
    pub align: FracAlign,
    /// Continued fraction: no restyling, zero-width right delimiter
    #[builder(default)]
    pub continued_fraction: bool,
    /// Prefix serialized before the numerator, like `\displaystyle`
    pub numer_prefix: Option<String>,
}

impl Default for GenfracOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// The mark of an accent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccentMark {
    /// A single accent glyph, like U+02C6 for `\hat`
    Char(char),
    /// A named stretchy graphic, like `widehat`
    Stretchy(String),
}

/// Options of an accent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccentOptions {
    /// The accent mark
    pub accent: AccentMark,
}

/// How scripts attach to an over/under construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SupSubPlacement {
    /// Stacked above and below, like the limits of a big operator
    OverUnder,
    /// At the corners, per the usual script rules
    #[default]
    Adjacent,
}

/// Options of an over/under stack (`\overset`, `\xrightarrow`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Default, bon::Builder)]
pub struct OverUnderOptions {
    /// Stretchy graphic drawn as the base
    pub svg_body: Option<String>,
    /// Stretchy graphic drawn above the base
    pub svg_above: Option<String>,
    /// Stretchy graphic drawn below the base
    pub svg_below: Option<String>,
    /// Flank the base with null delimiters
    #[builder(default)]
    pub padded_body: bool,
    /// Pad the labels horizontally
    #[builder(default)]
    pub padded_labels: bool,
    /// Spacing class of the result
    #[builder(default)]
    pub box_type: BoxType,
    /// Script placement
    #[builder(default)]
    pub supsub_placement: SupSubPlacement,
}

/// Horizontal alignment of an array column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnAlign {
    /// `l`
    Left,
    /// `c`
    #[default]
    Center,
    /// `r`
    Right,
}

/// Line style of an array column separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeparatorStyle {
    /// `|`
    #[default]
    Solid,
    /// `:`
    Dashed,
}

/// One entry of an array column format.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnFormat {
    /// A content column
    Align(ColumnAlign),
    /// An explicit gap in ems, from `@{...}`
    Gap(f64),
    /// A vertical rule
    Separator(SeparatorStyle),
}

/// Column spacing scheme of an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColSeparation {
    /// `\arraycolsep` on each side of a column
    #[default]
    Default,
    /// Narrow columns, as in `smallmatrix`
    Small,
}

/// Options of an array or matrix environment.
#[derive(Debug, Clone, PartialEq, bon::Builder)]
pub struct ArrayOptions {
    /// Environment name, like `pmatrix` or `cases`
    #[builder(default = "array".to_owned(), into)]
    pub environment: String,
    /// Column format; ten left-aligned columns are assumed when it has no
    /// content columns
    #[builder(default)]
    pub col_format: Vec<ColumnFormat>,
    /// Extra space below each row, from `\\[<gap>]`
    #[builder(default)]
    pub row_gaps: Vec<Option<Measurement>>,
    /// Left delimiter, `.` or absent for none
    pub left_delim: Option<String>,
    /// Right delimiter
    pub right_delim: Option<String>,
    /// `\arraystretch`
    #[builder(default = 1.0)]
    pub arraystretch: f64,
    /// Override of the `\arraycolsep` register
    pub arraycolsep: Option<Measurement>,
    /// Column spacing scheme
    #[builder(default)]
    pub col_separation: ColSeparation,
    /// Math style of the cells, like script style for `smallmatrix`
    pub math_style: Option<MathStyle>,
}

impl Default for ArrayOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Where an overlapped body sticks out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapAlign {
    /// `\llap`: the body extends to the left
    Left,
    /// `\rlap`: the body extends to the right
    #[default]
    Right,
    /// `\clap`: the body is centered
    Center,
}

/// Options of a zero-width overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlapOptions {
    /// Overlap direction
    pub align: OverlapAlign,
    /// Spacing class of the result
    pub box_type: BoxType,
}

/// Options of `\phantom`, `\hphantom`, `\vphantom` and `\smash`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhantomOptions {
    /// Hide the body while keeping its dimensions
    pub is_invisible: bool,
    /// Report zero height
    pub smash_height: bool,
    /// Report zero depth
    pub smash_depth: bool,
    /// Report zero width
    pub smash_width: bool,
}

/// Closed set of atom kinds, each carrying the options of its construct.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AtomKind {
    /// Ordinary symbol
    #[default]
    Ord,
    /// Binary operator
    Bin,
    /// Relation
    Rel,
    /// Opening delimiter
    Open,
    /// Closing delimiter
    Close,
    /// Punctuation
    Punct,
    /// Inner atom
    Inner,
    /// Big operator
    Op(OpOptions),
    /// Branch sentinel, never rendered as content
    First,
    /// Empty slot
    Placeholder,
    /// Braced group
    Group,
    /// Explicit space, like `\quad`
    Spacing(Measurement),
    /// Generalized fraction
    Genfrac(GenfracOptions),
    /// Accent over the body
    Accent(AccentOptions),
    /// Labels above and/or below the body
    OverUnder(OverUnderOptions),
    /// Grid of cells
    Array(ArrayOptions),
    /// Zero-width overlap
    Overlap(OverlapOptions),
    /// Phantom or smash
    Phantom(PhantomOptions),
    /// Infix command, like `\over`, left unresolved by the producer of the tree
    Infix {
        /// The command, like `\over`
        command: String,
    },
    /// Unknown command or invalid input, rendered as an error box
    Error,
}

impl AtomKind {
    /// Box class this kind produces by default.
    #[must_use]
    pub const fn box_type(&self) -> BoxType {
        match self {
            Self::Ord | Self::Group | Self::Accent(_) | Self::Array(_) | Self::Phantom(_) => {
                BoxType::Ord
            }
            Self::Bin => BoxType::Bin,
            Self::Rel => BoxType::Rel,
            Self::Open => BoxType::Open,
            Self::Close => BoxType::Close,
            Self::Punct => BoxType::Punct,
            Self::Inner | Self::Genfrac(_) => BoxType::Inner,
            Self::Op(_) => BoxType::Op,
            Self::First => BoxType::First,
            Self::Placeholder => BoxType::Placeholder,
            Self::Spacing(_) => BoxType::Spacing,
            Self::OverUnder(options) => options.box_type,
            Self::Overlap(options) => options.box_type,
            Self::Infix { .. } | Self::Error => BoxType::Error,
        }
    }

    /// Kinds that carry a value instead of branches.
    #[must_use]
    pub const fn is_value_kind(&self) -> bool {
        matches!(
            self,
            Self::Ord
                | Self::Bin
                | Self::Rel
                | Self::Open
                | Self::Close
                | Self::Punct
                | Self::Inner
                | Self::Op(_)
                | Self::Error
        )
    }

    /// Short name used in diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Ord => "ord",
            Self::Bin => "bin",
            Self::Rel => "rel",
            Self::Open => "open",
            Self::Close => "close",
            Self::Punct => "punct",
            Self::Inner => "inner",
            Self::Op(_) => "op",
            Self::First => "first",
            Self::Placeholder => "placeholder",
            Self::Group => "group",
            Self::Spacing(_) => "spacing",
            Self::Genfrac(_) => "genfrac",
            Self::Accent(_) => "accent",
            Self::OverUnder(_) => "overunder",
            Self::Array(_) => "array",
            Self::Overlap(_) => "overlap",
            Self::Phantom(_) => "phantom",
            Self::Infix { .. } => "infix",
            Self::Error => "error",
        }
    }
}

/// Style overrides of an atom; `None` inherits from the enclosing context.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AtomStyle {
    /// Foreground color
    pub color: Option<String>,
    /// Background color
    pub background_color: Option<String>,
    /// Font family, like `Main-Regular`
    pub font_family: Option<String>,
    /// Font shape, like `it` or `up`
    pub font_shape: Option<String>,
    /// Font series, like `b`
    pub font_series: Option<String>,
    /// Size index from 1 (`\tiny`) to 11 (`\Huge`)
    pub font_size: Option<usize>,
}

/// A node of the atom tree.
///
/// An atom carries either a value or content branches, never both. Script
/// branches may be added to any atom.
#[derive(Debug, Clone, Default)]
pub struct Atom {
    /// Construct kind and its options
    pub kind: AtomKind,
    /// Math or text mode
    pub mode: Mode,
    /// Style overrides
    pub style: AtomStyle,
    /// LaTeX command, used by the serializer
    pub command: Option<String>,
    /// Caret decoration
    pub caret: bool,
    /// Selection decoration
    pub is_selected: bool,
    pub(crate) value: Option<String>,
    pub(crate) branches: [Option<Vec<AtomId>>; BranchName::COUNT],
    pub(crate) grid: Option<Vec<Vec<Vec<AtomId>>>>,
    pub(crate) parent: Option<AtomId>,
    pub(crate) parent_branch: Option<BranchId>,
    pub(crate) dirty: bool,
    pub(crate) children_cache: OnceCell<Vec<AtomId>>,
    pub(crate) serialized: OnceCell<String>,
}

impl Atom {
    /// A structural atom of the given kind, without branches yet.
    #[must_use]
    pub fn new(kind: AtomKind) -> Self {
        Self {
            kind,
            dirty: true,
            ..Self::default()
        }
    }

    /// A value-bearing atom, like the letter `x` or the relation `=`.
    #[must_use]
    pub fn symbol(kind: AtomKind, value: &str) -> Self {
        Self {
            value: Some(value.to_owned()),
            ..Self::new(kind)
        }
    }

    /// Sets the LaTeX command.
    #[must_use]
    pub fn with_command(mut self, command: &str) -> Self {
        self.command = Some(command.to_owned());
        self
    }

    /// Sets the mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the style overrides.
    #[must_use]
    pub fn with_style(mut self, style: AtomStyle) -> Self {
        self.style = style;
        self
    }

    /// The rendered glyph or string of a value-bearing atom.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// The branch `name`, sentinel included.
    #[must_use]
    pub fn branch(&self, name: BranchName) -> Option<&[AtomId]> {
        self.branches[name as usize].as_deref()
    }

    /// Whether the branch `name` is present and holds more than its sentinel.
    #[must_use]
    pub fn has_content(&self, name: BranchName) -> bool {
        self.branch(name).is_some_and(|branch| branch.len() > 1)
    }

    /// The cell grid of an array atom.
    #[must_use]
    pub fn grid(&self) -> Option<&[Vec<Vec<AtomId>>]> {
        self.grid.as_deref()
    }

    /// Parent atom, if attached.
    #[must_use]
    pub const fn parent(&self) -> Option<AtomId> {
        self.parent
    }

    /// Branch of the parent this atom is attached to.
    #[must_use]
    pub const fn parent_branch(&self) -> Option<BranchId> {
        self.parent_branch
    }

    /// Whether the atom changed since it was last marked clean.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether a content branch (above, body, below) or a grid is present.
    #[must_use]
    pub fn has_content_branches(&self) -> bool {
        [BranchName::Above, BranchName::Body, BranchName::Below]
            .into_iter()
            .any(|name| self.branch(name).is_some())
            || self.grid.is_some()
    }

    /// Whether any named branch or grid is present.
    #[must_use]
    pub fn has_branches(&self) -> bool {
        self.branches.iter().any(Option::is_some) || self.grid.is_some()
    }
}

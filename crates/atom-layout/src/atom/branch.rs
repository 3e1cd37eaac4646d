use core::fmt;

use strum::{AsRefStr, Display, EnumCount, EnumIter, EnumString, FromRepr};

/// Name of a branch of a structural atom.
///
/// The declaration order is the traversal order of
/// [`AtomTree::children`](super::AtomTree::children).
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
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum BranchName {
    /// Numerator of a fraction, label above a stack
    Above,
    /// Main content
    Body,
    /// Denominator of a fraction, label below a stack
    Below,
    /// Superscript
    Superscript,
    /// Subscript
    Subscript,
}

impl BranchName {
    /// Superscript or subscript. Script branches may attach to any atom,
    /// value-bearing ones included.
    #[must_use]
    pub const fn is_script(self) -> bool {
        matches!(self, Self::Superscript | Self::Subscript)
    }
}

/// Where an atom is attached in its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchId {
    /// A named branch
    Named(BranchName),
    /// A cell of an array grid
    Cell {
        /// Row index
        row: usize,
        /// Column index
        col: usize,
    },
}

impl From<BranchName> for BranchId {
    fn from(name: BranchName) -> Self {
        Self::Named(name)
    }
}

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{name}"),
            Self::Cell { row, col } => write!(f, "cell[{row}, {col}]"),
        }
    }
}

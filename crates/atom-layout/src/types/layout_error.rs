//! Layout error handling
//!
//! Structural defects in an atom tree (a branch without its `first`
//! sentinel, a vertical list anchored on a kern, an atom attached twice) are
//! programming errors of whoever built the tree. They abort the render of the
//! offending subtree and propagate to the caller as a [`LayoutError`].
//! Missing glyph metrics are not errors, they fall back to default metrics.

use alloc::boxed::Box;
use alloc::string::String;
use thiserror::Error;

use crate::atom::{AtomId, BranchId};

/// Main error type returned when an atom tree cannot be laid out.
#[derive(Debug, Error)]
#[error("Layout error: {kind}")]
pub struct LayoutError {
    /// Categorised reason for the failure.
    #[source]
    pub kind: Box<LayoutErrorKind>,
    /// The atom being processed when the failure was detected, if known.
    pub atom: Option<AtomId>,
}

impl LayoutError {
    /// Create a new LayoutError with the given kind
    pub fn new<T: Into<LayoutErrorKind>>(kind: T) -> Self {
        Self {
            kind: Box::new(kind.into()),
            atom: None,
        }
    }

    /// Create a new LayoutError pointing at the offending atom
    pub fn at<T: Into<LayoutErrorKind>>(kind: T, atom: AtomId) -> Self {
        Self {
            kind: Box::new(kind.into()),
            atom: Some(atom),
        }
    }
}

impl From<LayoutErrorKind> for LayoutError {
    fn from(kind: LayoutErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<strum::ParseError> for LayoutError {
    fn from(err: strum::ParseError) -> Self {
        Self::new(LayoutErrorKind::EnumParse(err))
    }
}

/// Describes the specific reason for a [`LayoutError`].
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum LayoutErrorKind {
    #[error("branch {branch} does not start with a `first` atom")]
    MissingFirstSentinel { branch: BranchId },
    #[error("the first child of a {variant} vertical list must be a box, not a kern")]
    VBoxFirstChildIsKern { variant: &'static str },
    #[error("a {variant} vertical list needs at least one child")]
    EmptyVBox { variant: &'static str },
    #[error("atom {atom} is already attached to a branch")]
    AlreadyAttached { atom: AtomId },
    #[error("atom {atom} is the `first` atom of its branch and cannot be removed")]
    SentinelRemoval { atom: AtomId },
    #[error("atom {atom} is not attached to a branch")]
    NotAttached { atom: AtomId },
    #[error("no atom with id {atom} in this tree")]
    UnknownAtom { atom: AtomId },
    #[error("atom {atom} carries a value and cannot own branches")]
    ValueWithBranches { atom: AtomId },
    #[error("atom {atom} has no {branch} branch")]
    MissingBranch { atom: AtomId, branch: BranchId },
    #[error("atom {atom} is not an array")]
    NotAnArray { atom: AtomId },
    #[error("an atom cannot be attached inside its own subtree")]
    Cycle,
    #[error("invalid unit: '{unit}'")]
    InvalidUnit { unit: String },
    #[error("{0}")]
    EnumParse(#[from] strum::ParseError),
}

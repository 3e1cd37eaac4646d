//! atom-layout - TeX Appendix G layout for math atom trees
//!
//! The crate turns a tree of mathematical atoms (symbols, fractions,
//! accents, arrays, ...) into a tree of boxes with exact TeX dimensions in
//! ems. It covers inter-atom spacing, superscript and subscript placement,
//! and the layout of each construct. Parsing LaTeX and serializing the
//! boxes to markup are left to the caller.
#![warn(missing_docs)]
#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]
#![warn(clippy::str_to_string)]
#![warn(clippy::non_ascii_literal)]
#![warn(clippy::pointer_format)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::absolute_paths)]
#![warn(clippy::panic)]
#![warn(clippy::expect_used)]
#![warn(clippy::unwrap_in_result)]
#![warn(clippy::if_then_some_else_none)]
#![warn(clippy::unused_trait_names)]
#![warn(clippy::get_unwrap)]
#![warn(clippy::impl_trait_in_params)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::unimplemented)]
#![warn(clippy::return_and_then)]
#![warn(clippy::needless_raw_strings)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(clippy::rc_buffer)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::map_with_unused_argument_over_ranges)]
#![warn(clippy::missing_asserts_for_indexing)]
#![warn(clippy::separated_literal_suffix)]
#![warn(clippy::ref_patterns)]
// Not sure
#![allow(clippy::indexing_slicing)]
#![allow(clippy::string_slice)]
#![allow(clippy::pub_use)]
// clippy exceptions
#![allow(clippy::float_cmp)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::default_numeric_fallback)]
#![allow(clippy::single_call_fn)]
#![allow(clippy::module_name_repetitions)]

extern crate alloc;
pub mod atom;
pub mod box_tree;
pub mod build_box;
pub mod build_common;
pub mod context;
pub mod delimiter;
pub mod font_metrics;
pub mod font_metrics_data;
pub mod functions;
pub mod options;
pub mod spacing_data;
pub mod stretchy;
pub mod style;
pub mod types;
pub mod units;

pub use crate::atom::{
    AccentMark, AccentOptions, ArrayOptions, Atom, AtomId, AtomKind, AtomStyle, AtomTree, BranchId,
    BranchName, ColSeparation, ColumnAlign, ColumnFormat, FracAlign, GenfracOptions, Grid, Limits,
    OpOptions, OverUnderOptions, OverlapAlign, OverlapOptions, PhantomOptions, SeparatorStyle,
    SupSubPlacement,
};
pub use crate::box_tree::{BoxContent, BoxType, LayoutBox};
pub use crate::context::LayoutContext;
pub use crate::options::Options;
pub use crate::style::MathStyle;
pub use crate::types::{LayoutError, LayoutErrorKind, Mode, Registers, Settings};
pub use crate::units::{Measurement, Unit};

/// Lays out an atom tree starting at `root`.
///
/// The root is built with the options derived from the settings of `ctx`:
/// display style when `display_mode` is set, text style otherwise. The tree
/// is only read; rendering the same tree twice gives the same boxes.
///
/// # Examples
///
/// ```rust
/// use atom_layout::{Atom, AtomKind, AtomTree, BranchName, LayoutContext, render};
///
/// fn main() -> Result<(), atom_layout::LayoutError> {
///     let ctx = LayoutContext::default();
///     let mut tree = AtomTree::new();
///
///     let root = tree.add(Atom::new(AtomKind::Group));
///     let x = tree.add(Atom::symbol(AtomKind::Ord, "x"));
///     let plus = tree.add(Atom::symbol(AtomKind::Bin, "+"));
///     let y = tree.add(Atom::symbol(AtomKind::Ord, "y"));
///     tree.set_branch(root, BranchName::Body, vec![x, plus, y])?;
///
///     let layout = render(&ctx, &tree, root)?;
///     assert!(layout.height > 0.0);
///     Ok(())
/// }
/// ```
///
/// Structural defects are reported with the offending atom:
///
/// ```rust
/// use atom_layout::{AtomTree, LayoutContext, LayoutErrorKind, render};
///
/// let ctx = LayoutContext::default();
/// let mut other = AtomTree::new();
/// let stray = other.add(atom_layout::Atom::new(atom_layout::AtomKind::Group));
///
/// let err = render(&ctx, &AtomTree::new(), stray).unwrap_err();
/// assert!(matches!(*err.kind, LayoutErrorKind::UnknownAtom { .. }));
/// ```
pub use crate::build_box::render;

//! Per-construct layout
//!
//! Each submodule turns one kind of atom into a [`LayoutBox`], reading its
//! branches through the [`AtomTree`] and rendering them with
//! [`build_branch`]. The constructs share two ways of attaching scripts:
//! [`attach_sup_sub`] places them at the corners following TeX's Rule 18,
//! while [`assemble_sup_sub`] stacks them as limits above and below.
//!
//! [`LayoutBox`]: crate::box_tree::LayoutBox
//! [`AtomTree`]: crate::atom::AtomTree
//! [`build_branch`]: crate::build_box::build_branch

mod accent;
mod array;
mod genfrac;
mod lap;
mod op;
mod overunder;
mod phantom;
pub(crate) mod supsub;
mod symbol;
pub(crate) mod utils;

pub use accent::build_accent;
pub use array::build_array;
pub use genfrac::build_genfrac;
pub use lap::build_overlap;
pub use op::build_op;
pub use overunder::build_over_under;
pub use phantom::build_phantom;
pub use supsub::{SupSubOptions, SupSubShifts, attach_sup_sub, sup_sub_shifts};
pub use symbol::{make_error_box, make_placeholder, make_spacing, make_symbol};
pub use utils::assemble_sup_sub;

//! Layout helpers shared by several constructs.

mod assemble_sup_sub;

pub use assemble_sup_sub::assemble_sup_sub;

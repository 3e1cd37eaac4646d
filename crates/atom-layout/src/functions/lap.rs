//! Zero-width overlaps: `\mathllap`, `\mathrlap` and `\mathclap`
//!
//! The body is drawn but takes no horizontal room, so it sticks out to the
//! left, to the right or on both sides of its position.

use crate::atom::{AtomId, AtomTree, BranchName, OverlapAlign, OverlapOptions};
use crate::box_tree::{BoxType, LayoutBox};
use crate::build_box::build_named_branch;
use crate::build_common::make_strut;
use crate::context::LayoutContext;
use crate::functions::supsub::{SupSubOptions, attach_sup_sub};
use crate::options::Options;
use crate::types::LayoutError;

const fn lap_class(align: OverlapAlign) -> &'static str {
    match align {
        OverlapAlign::Left => "ML__llap",
        OverlapAlign::Right => "ML__rlap",
        OverlapAlign::Center => "ML__clap",
    }
}

/// Builds an overlap atom.
pub fn build_overlap(
    ctx: &LayoutContext,
    tree: &AtomTree,
    id: AtomId,
    lap: OverlapOptions,
    options: &Options,
) -> Result<LayoutBox, LayoutError> {
    let body = build_named_branch(ctx, tree, id, BranchName::Body, options)?
        .unwrap_or_else(|| LayoutBox::empty(BoxType::Ord));

    let mut inner = LayoutBox::new(vec![body], BoxType::Ord).add_class("inner");
    if lap.align == OverlapAlign::Center {
        // Centering needs an extra level
        inner = LayoutBox::new(vec![inner], BoxType::Ord);
    }
    let strut = make_strut(inner.height, inner.depth);

    let mut result = LayoutBox::new(
        vec![strut, inner, LayoutBox::with_class("ML__fix")],
        lap.box_type,
    )
    .add_class(lap_class(lap.align));
    result.width = 0.0;
    result.italic = 0.0;

    let params = SupSubOptions {
        box_type: Some(lap.box_type),
        ..SupSubOptions::default()
    };
    attach_sup_sub(ctx, tree, id, result, options, params)
}

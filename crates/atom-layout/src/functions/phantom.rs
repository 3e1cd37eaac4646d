//! Phantoms and smashes
//!
//! `\phantom` reserves the room of its body without drawing it.
//! `\hphantom` keeps only the width, `\vphantom` only the height and depth,
//! and `\smash` draws the body while reporting no height or depth.

use crate::atom::{AtomId, AtomTree, BranchName, PhantomOptions};
use crate::box_tree::{BoxType, LayoutBox};
use crate::build_box::build_named_branch;
use crate::build_common::{VBoxParam, make_v_box};
use crate::context::LayoutContext;
use crate::functions::supsub::{SupSubOptions, attach_sup_sub};
use crate::options::Options;
use crate::types::LayoutError;

/// Builds a phantom or smash atom.
pub fn build_phantom(
    ctx: &LayoutContext,
    tree: &AtomTree,
    id: AtomId,
    phantom: PhantomOptions,
    options: &Options,
) -> Result<LayoutBox, LayoutError> {
    let body_options = if phantom.is_invisible {
        options.with_phantom()
    } else {
        options.having_style(options.style)
    };
    let mut content = build_named_branch(ctx, tree, id, BranchName::Body, &body_options)?
        .unwrap_or_else(|| LayoutBox::empty(BoxType::Ord))
        .wrap(&body_options);
    content.box_type = BoxType::Ord;

    if phantom.smash_height || phantom.smash_depth {
        if phantom.smash_height {
            content.height = 0.0;
        }
        if phantom.smash_depth {
            content.depth = 0.0;
        }
        for child in content.children_mut() {
            if phantom.smash_height {
                child.height = 0.0;
            }
            if phantom.smash_depth {
                child.depth = 0.0;
            }
        }
        content = make_v_box(VBoxParam::FirstBaseline(vec![content.into()]), options)
            .map_err(|mut err| {
                err.atom.get_or_insert(id);
                err
            })?;
    }

    if phantom.smash_width {
        let mut lap = LayoutBox::new(
            vec![
                LayoutBox::new(vec![content], BoxType::Ord).add_class("inner"),
                LayoutBox::with_class("ML__fix"),
            ],
            BoxType::Ord,
        )
        .add_class("ML__rlap");
        lap.width = 0.0;
        content = lap;
    }
    content.box_type = BoxType::Ord;

    let params = SupSubOptions {
        box_type: Some(BoxType::Ord),
        ..SupSubOptions::default()
    };
    attach_sup_sub(ctx, tree, id, content, options, params)
}

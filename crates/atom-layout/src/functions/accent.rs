//! Accents over a body: `\hat`, `\vec`, `\widehat` and friends
//!
//! Glyph accents sit on the body's x-height, stretchy ones span its width.

use crate::atom::{AccentMark, AccentOptions, AtomId, AtomTree, BranchName};
use crate::box_tree::{BoxType, LayoutBox};
use crate::build_box::build_named_branch;
use crate::build_common::{VBoxChild, VBoxElem, VBoxParam, make_v_box};
use crate::context::LayoutContext;
use crate::functions::supsub::{SupSubOptions, attach_sup_sub};
use crate::options::Options;
use crate::stretchy::svg_box;
use crate::types::LayoutError;

/// Builds an accent over the body of `id`, following Rule 12.
///
/// The body is set in the cramped style. A glyph accent is moved right by
/// twice the skew of a single-character body, which centers it over the
/// slanted glyph. Scripts attach to the accented whole.
pub fn build_accent(
    ctx: &LayoutContext,
    tree: &AtomTree,
    id: AtomId,
    accent: &AccentOptions,
    options: &Options,
) -> Result<LayoutBox, LayoutError> {
    let body_options = options.having_cramped_style();
    let mut base = build_named_branch(ctx, tree, id, BranchName::Body, &body_options)?
        .unwrap_or_else(|| LayoutBox::empty(BoxType::Ord))
        .wrap(&body_options);
    base.box_type = BoxType::Ord;

    let single_char = matches!(
        tree.get(id)?.branch(BranchName::Body),
        Some([_, only]) if tree.is_character_box(*only)
    );
    let skew = if single_char { base.skew } else { 0.0 };

    let metrics = options.font_metrics();
    let mut clearance = base.height.min(metrics.x_height);
    let accent_box = match &accent.accent {
        AccentMark::Char(ch) => {
            let mut glyph = LayoutBox::text(
                ch.encode_utf8(&mut [0; 4]),
                "Main-Regular",
                BoxType::Ord,
                &ctx.font_metrics,
            );
            glyph.italic = 0.0;
            glyph
        }
        AccentMark::Stretchy(name) => {
            clearance = metrics.big_op_spacing1 - clearance;
            svg_box(name, base.width, BoxType::Ord)
        }
    };

    let stack = make_v_box(
        VBoxParam::FirstBaseline(vec![
            base.into(),
            VBoxChild::kern(-clearance),
            VBoxElem::builder()
                .elem(accent_box)
                .margin_left(2.0 * skew)
                .wrapper_classes(vec!["ML__center".to_owned()])
                .build()
                .into(),
        ]),
        options,
    )
    .map_err(|mut err| {
        err.atom.get_or_insert(id);
        err
    })?;

    let mut result = LayoutBox::new(vec![stack], BoxType::Ord).add_class("ML__accent-body");
    result.skew = skew;
    let params = SupSubOptions {
        box_type: Some(BoxType::Ord),
        ..SupSubOptions::default()
    };
    attach_sup_sub(ctx, tree, id, result, options, params)
}

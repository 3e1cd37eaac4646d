//! Labels stacked over and under a body
//!
//! Covers `\overset`, `\underset`, `\overbrace` and the extensible arrows
//! such as `\xrightarrow[below]{above}`, where the body itself is a stretchy
//! graphic as wide as the widest label.

use crate::atom::{AtomId, AtomTree, BranchName, OverUnderOptions, SupSubPlacement};
use crate::box_tree::{BoxType, LayoutBox};
use crate::build_box::build_named_branch;
use crate::build_common::{VBoxChild, VBoxParam, make_gap, make_v_box};
use crate::context::LayoutContext;
use crate::delimiter::make_null_delimiter;
use crate::functions::supsub::{SupSubOptions, attach_sup_sub, build_script};
use crate::functions::utils::assemble_sup_sub;
use crate::options::Options;
use crate::stretchy::svg_box;
use crate::types::LayoutError;

const LABEL_PADDING: f64 = 0.5;

fn pad_label(label: LayoutBox) -> LayoutBox {
    LayoutBox::new(
        vec![make_gap(LABEL_PADDING), label, make_gap(LABEL_PADDING)],
        BoxType::Ord,
    )
}

/// Builds an over/under stack.
pub fn build_over_under(
    ctx: &LayoutContext,
    tree: &AtomTree,
    id: AtomId,
    stack: &OverUnderOptions,
    options: &Options,
) -> Result<LayoutBox, LayoutError> {
    let mut above = build_script(ctx, tree, id, BranchName::Above, options.style.sup(), options)?;
    let mut below = build_script(ctx, tree, id, BranchName::Below, options.style.sub(), options)?;
    if stack.padded_labels {
        above = above.map(pad_label);
        below = below.map(pad_label);
    }

    let mut base = match &stack.svg_body {
        Some(name) => {
            let label_width = above
                .iter()
                .chain(below.iter())
                .map(|label| label.width)
                .fold(0.0f64, f64::max);
            svg_box(name, label_width, BoxType::Ord)
        }
        None => build_named_branch(ctx, tree, id, BranchName::Body, options)?
            .unwrap_or_else(|| LayoutBox::empty(BoxType::Ord)),
    };
    base.box_type = BoxType::Ord;
    if stack.padded_body {
        base = LayoutBox::new(
            vec![
                make_null_delimiter(ctx, options, BoxType::Open),
                base,
                make_null_delimiter(ctx, options, BoxType::Close),
            ],
            BoxType::Ord,
        );
    }

    if let Some(name) = &stack.svg_above {
        above = Some(svg_box(name, base.width, BoxType::Ord));
    }
    if let Some(name) = &stack.svg_below {
        below = Some(svg_box(name, base.width, BoxType::Ord));
    }

    let gap = options.font_metrics().big_op_spacing5;
    let param = match (above, below) {
        (Some(above), Some(below)) => VBoxParam::Bottom {
            position: gap + below.total_height() + base.depth,
            children: vec![
                VBoxChild::kern(gap),
                below.into(),
                base.into(),
                above.into(),
                VBoxChild::kern(gap),
            ],
        },
        (None, Some(below)) => VBoxParam::Top {
            position: base.height,
            children: vec![below.into(), VBoxChild::kern(gap), base.into()],
        },
        (Some(above), None) => VBoxParam::Bottom {
            position: base.depth,
            children: vec![base.into(), VBoxChild::kern(gap), above.into()],
        },
        (None, None) => VBoxParam::FirstBaseline(vec![base.into()]),
    };
    let mut result = make_v_box(param, options).map_err(|mut err| {
        err.atom.get_or_insert(id);
        err
    })?;
    result.box_type = stack.box_type;

    match stack.supsub_placement {
        SupSubPlacement::OverUnder => {
            assemble_sup_sub(ctx, tree, id, result, options, 0.0, stack.box_type)
        }
        SupSubPlacement::Adjacent => {
            let params = SupSubOptions {
                box_type: Some(stack.box_type),
                ..SupSubOptions::default()
            };
            attach_sup_sub(ctx, tree, id, result, options, params)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::{Atom, AtomKind};

    fn stack(
        tree: &mut AtomTree,
        options: &OverUnderOptions,
        above: Option<&str>,
        below: Option<&str>,
    ) -> Result<AtomId, LayoutError> {
        let id = tree.add(Atom::new(AtomKind::OverUnder(options.clone())));
        if options.svg_body.is_none() {
            let body = tree.add(Atom::symbol(AtomKind::Ord, "x"));
            tree.set_branch(id, BranchName::Body, vec![body])?;
        }
        for (name, label) in [(BranchName::Above, above), (BranchName::Below, below)] {
            if let Some(label) = label {
                let atom = tree.add(Atom::symbol(AtomKind::Ord, label));
                tree.set_branch(id, name, vec![atom])?;
            }
        }
        Ok(id)
    }

    #[test]
    fn overset_keeps_the_body_baseline() -> Result<(), LayoutError> {
        let ctx = LayoutContext::default();
        let mut tree = AtomTree::new();
        let opts = OverUnderOptions::default();
        let id = stack(&mut tree, &opts, Some("a"), None)?;
        let options = Options::default();
        let result = build_over_under(&ctx, &tree, id, &opts, &options)?;

        let gap = options.font_metrics().big_op_spacing5;
        let label = 0.43056 * 0.7;
        assert_eq!(result.depth, 0.0);
        assert!((result.height - (0.43056 + gap + label)).abs() < 1e-9);
        assert_eq!(result.box_type, BoxType::Ord);
        Ok(())
    }

    #[test]
    fn underset_hangs_below() -> Result<(), LayoutError> {
        let ctx = LayoutContext::default();
        let mut tree = AtomTree::new();
        let opts = OverUnderOptions::default();
        let id = stack(&mut tree, &opts, None, Some("a"))?;
        let options = Options::default();
        let result = build_over_under(&ctx, &tree, id, &opts, &options)?;

        let gap = options.font_metrics().big_op_spacing5;
        assert!((result.height - 0.43056).abs() < 1e-9);
        assert!((result.depth - (gap + 0.43056 * 0.7)).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn both_labels_only_get_outer_gaps() -> Result<(), LayoutError> {
        let ctx = LayoutContext::default();
        let mut tree = AtomTree::new();
        let opts = OverUnderOptions::default();
        let id = stack(&mut tree, &opts, Some("a"), Some("a"))?;
        let options = Options::default();
        let result = build_over_under(&ctx, &tree, id, &opts, &options)?;

        let gap = options.font_metrics().big_op_spacing5;
        let label = 0.43056 * 0.7;
        assert!((result.height - (0.43056 + label + gap)).abs() < 1e-9);
        assert!((result.depth - (gap + label)).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn extensible_arrow_is_a_relation_as_wide_as_its_label() -> Result<(), LayoutError> {
        let ctx = LayoutContext::default();
        let mut tree = AtomTree::new();
        let opts = OverUnderOptions::builder()
            .svg_body("xrightarrow".to_owned())
            .padded_labels(true)
            .padded_body(true)
            .box_type(BoxType::Rel)
            .build();
        let id = stack(&mut tree, &opts, Some("W"), Some("a"))?;
        let result = build_over_under(&ctx, &tree, id, &opts, &Options::default())?;

        assert_eq!(result.box_type, BoxType::Rel);
        let label = LayoutBox::text("W", "Math-Italic", BoxType::Ord, &ctx.font_metrics);
        assert!(result.width >= label.width * 0.7 + 2.0 * LABEL_PADDING - 1e-9);
        Ok(())
    }
}

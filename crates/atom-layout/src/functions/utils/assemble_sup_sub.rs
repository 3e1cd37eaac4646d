//! Limits placement: scripts stacked above and below their base
//!
//! Used by big operators in display style (`\sum_{i=0}^n`) and by over/under
//! stacks configured for it. The spacing follows TeX's `make_op` with the
//! `big_op_spacing1` to `big_op_spacing5` parameters.

use crate::atom::{AtomId, AtomTree, BranchName};
use crate::box_tree::{BoxType, LayoutBox};
use crate::build_common::{VBoxChild, VBoxElem, VBoxParam, make_gap, make_v_box};
use crate::context::LayoutContext;
use crate::functions::supsub::build_script;
use crate::options::Options;
use crate::types::LayoutError;

/// A rendered limit and the kern separating it from the base.
struct Limit {
    elem: LayoutBox,
    kern: f64,
}

/// Whether the subscript of `id` is a single glyph.
fn sub_is_single_character(tree: &AtomTree, id: AtomId) -> bool {
    tree.get(id)
        .ok()
        .and_then(|atom| atom.branch(BranchName::Subscript))
        .is_some_and(|sub| matches!(sub, [_, only] if tree.is_character_box(*only)))
}

/// Stacks the scripts of `id` above and below `base`.
///
/// `slant` is the italic correction of the base glyph: the upper limit moves
/// right by it and the lower one left. Returns `base` unchanged when the atom
/// has no scripts.
pub fn assemble_sup_sub(
    ctx: &LayoutContext,
    tree: &AtomTree,
    id: AtomId,
    base: LayoutBox,
    options: &Options,
    slant: f64,
    box_type: BoxType,
) -> Result<LayoutBox, LayoutError> {
    let metrics = options.font_metrics();
    let sup = build_script(ctx, tree, id, BranchName::Superscript, options.style.sup(), options)?
        .map(|elem| Limit {
            kern: metrics
                .big_op_spacing1
                .max(metrics.big_op_spacing3 - elem.depth),
            elem,
        });
    let sub = build_script(ctx, tree, id, BranchName::Subscript, options.style.sub(), options)?
        .map(|elem| Limit {
            kern: metrics
                .big_op_spacing2
                .max(metrics.big_op_spacing4 - elem.height),
            elem,
        });

    let has_sub = sub.is_some();
    let base_height = base.height;
    let base_depth = base.depth;
    let gap = metrics.big_op_spacing5;
    let limit = |elem: LayoutBox, margin: f64| {
        VBoxChild::from(VBoxElem::builder().elem(elem).margin_left(margin).build())
    };

    let param = match (sup, sub) {
        (Some(sup), Some(sub)) => {
            let bottom = gap + sub.elem.total_height() + sub.kern + base_depth;
            VBoxParam::Bottom {
                position: bottom,
                children: vec![
                    VBoxChild::kern(gap),
                    limit(sub.elem, -slant),
                    VBoxChild::kern(sub.kern),
                    base.into(),
                    VBoxChild::kern(sup.kern),
                    limit(sup.elem, slant),
                    VBoxChild::kern(gap),
                ],
            }
        }
        (None, Some(sub)) => VBoxParam::Top {
            position: base_height,
            children: vec![
                VBoxChild::kern(gap),
                limit(sub.elem, -slant),
                VBoxChild::kern(sub.kern),
                base.into(),
            ],
        },
        (Some(sup), None) => VBoxParam::Bottom {
            position: base_depth,
            children: vec![
                base.into(),
                VBoxChild::kern(sup.kern),
                limit(sup.elem, slant),
                VBoxChild::kern(gap),
            ],
        },
        (None, None) => return Ok(base),
    };

    let stack = make_v_box(param, options).map_err(|mut err| {
        err.atom.get_or_insert(id);
        err
    })?;

    let mut parts = vec![stack];
    if has_sub && slant != 0.0 && !sub_is_single_character(tree, id) {
        // Keeps the shifted lower limit clear of the preceding box
        parts.insert(0, make_gap(slant));
    }
    Ok(LayoutBox::new(parts, box_type).add_class("op-limits"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::{Atom, AtomKind};
    use crate::style::MathStyle;

    fn op_base() -> LayoutBox {
        LayoutBox {
            box_type: BoxType::Op,
            height: 1.0,
            depth: 0.5,
            width: 1.0,
            max_font_size: 1.0,
            ..LayoutBox::default()
        }
    }

    #[test]
    fn upper_limit_clears_the_base() -> Result<(), LayoutError> {
        let ctx = LayoutContext::default();
        let options = Options::default().having_style(MathStyle::Display);
        let mut tree = AtomTree::new();
        let op = tree.add(Atom::new(AtomKind::Group));
        let n = tree.add(Atom::symbol(AtomKind::Ord, "n"));
        tree.append(op, BranchName::Superscript, n)?;

        let stacked = assemble_sup_sub(&ctx, &tree, op, op_base(), &options, 0.0, BoxType::Op)?;
        let metrics = options.font_metrics();
        assert_eq!(stacked.box_type, BoxType::Op);
        assert_eq!(stacked.depth, 0.5);
        assert!(stacked.height >= 1.0 + metrics.big_op_spacing1 + metrics.big_op_spacing5);
        Ok(())
    }

    #[test]
    fn no_limits_keeps_the_base() -> Result<(), LayoutError> {
        let ctx = LayoutContext::default();
        let mut tree = AtomTree::new();
        let op = tree.add(Atom::new(AtomKind::Group));
        let base = op_base();
        let result =
            assemble_sup_sub(&ctx, &tree, op, base.clone(), &Options::default(), 0.0, BoxType::Op)?;
        assert_eq!(result, base);
        Ok(())
    }
}

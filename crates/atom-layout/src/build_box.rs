//! Render dispatch and list layout
//!
//! [`build_atom`] turns one atom into a [`LayoutBox`] by dispatching on its
//! kind. [`build_branch`] renders a branch as a new list: every atom after the
//! `first` sentinel is built, binary operators are reclassified and the
//! inter-atom spacing of TeX's Appendix G is applied between siblings.

use tracing::{debug, trace};

use crate::atom::{AtomId, AtomKind, AtomStyle, AtomTree, BranchId, BranchName};
use crate::box_tree::{BoxType, LayoutBox};
use crate::context::LayoutContext;
use crate::functions::{self, SupSubOptions};
use crate::options::Options;
use crate::spacing_data::spacing_between;
use crate::types::{LayoutError, LayoutErrorKind};

/// Lays out the atom `root` with the root options of `ctx`.
pub fn render(ctx: &LayoutContext, tree: &AtomTree, root: AtomId) -> Result<LayoutBox, LayoutError> {
    let options = ctx.root_options();
    let result = build_atom(ctx, tree, root, &options)?;
    debug!(
        atom = %root,
        height = result.height,
        depth = result.depth,
        width = result.width,
        "rendered"
    );
    Ok(result)
}

/// Builds the box of a single atom, scripts included.
///
/// Style overrides of the atom (size, colors, font family) apply to the atom
/// and its subtree; the result is converted back to the ems of `options`.
pub fn build_atom(
    ctx: &LayoutContext,
    tree: &AtomTree,
    id: AtomId,
    options: &Options,
) -> Result<LayoutBox, LayoutError> {
    let atom = tree.get(id)?;
    trace!(atom = %id, kind = atom.kind.name(), "building atom");

    let overrides = &atom.style;
    let atom_options = has_overrides(overrides).then(|| {
        options.with_overrides(
            overrides.font_size,
            overrides.color.as_deref(),
            overrides.background_color.as_deref(),
            overrides.font_family.as_deref(),
        )
    });
    let local = atom_options.as_ref().unwrap_or(options);

    let mut result = match &atom.kind {
        AtomKind::First => LayoutBox::empty(BoxType::First),
        AtomKind::Ord
        | AtomKind::Bin
        | AtomKind::Rel
        | AtomKind::Open
        | AtomKind::Close
        | AtomKind::Punct
        | AtomKind::Inner => {
            let base = functions::make_symbol(ctx, atom, local);
            let params = SupSubOptions {
                is_character_box: tree.is_character_box(id),
                is_extensible: false,
                box_type: Some(base.box_type),
            };
            functions::attach_sup_sub(ctx, tree, id, base, local, params)?
        }
        AtomKind::Op(op) => functions::build_op(ctx, tree, id, *op, local)?,
        AtomKind::Placeholder => {
            let base = functions::make_placeholder(ctx);
            functions::attach_sup_sub(ctx, tree, id, base, local, SupSubOptions::default())?
        }
        AtomKind::Group => {
            let transparent = *overrides != AtomStyle::default() && overrides.font_size.is_none();
            let box_type = if transparent && !has_scripts(tree, id)? {
                BoxType::Lift
            } else {
                BoxType::Ord
            };
            let mut body = build_named_branch(ctx, tree, id, BranchName::Body, local)?
                .unwrap_or_else(|| LayoutBox::empty(BoxType::Ord));
            body.box_type = box_type;
            let params = SupSubOptions {
                is_character_box: tree.is_character_box(id),
                is_extensible: false,
                box_type: Some(BoxType::Ord),
            };
            functions::attach_sup_sub(ctx, tree, id, body, local, params)?
        }
        AtomKind::Spacing(measurement) => functions::make_spacing(*measurement, local),
        AtomKind::Genfrac(frac) => functions::build_genfrac(ctx, tree, id, frac, local)?,
        AtomKind::Accent(accent) => functions::build_accent(ctx, tree, id, accent, local)?,
        AtomKind::OverUnder(stack) => functions::build_over_under(ctx, tree, id, stack, local)?,
        AtomKind::Array(array) => functions::build_array(ctx, tree, id, array, local)?,
        AtomKind::Overlap(lap) => functions::build_overlap(ctx, tree, id, *lap, local)?,
        AtomKind::Phantom(phantom) => functions::build_phantom(ctx, tree, id, *phantom, local)?,
        AtomKind::Infix { command } => functions::make_error_box(ctx, command),
        AtomKind::Error => functions::make_error_box(ctx, atom.value().unwrap_or_default()),
    };

    result.is_tight = local.is_tight();
    if let Some(atom_options) = &atom_options {
        result = result.wrap(atom_options);
    }
    result.caret = atom.caret;
    result.is_selected = atom.is_selected;
    Ok(result)
}

fn has_overrides(style: &AtomStyle) -> bool {
    style.font_size.is_some()
        || style.color.is_some()
        || style.background_color.is_some()
        || style.font_family.is_some()
}

fn has_scripts(tree: &AtomTree, id: AtomId) -> Result<bool, LayoutError> {
    let atom = tree.get(id)?;
    Ok(atom.has_content(BranchName::Superscript) || atom.has_content(BranchName::Subscript))
}

/// Renders a branch of `owner` as a new list.
///
/// Returns `None` when the branch holds nothing but its sentinel. The result
/// has type [`BoxType::Lift`]; callers give it the type of their construct.
pub fn build_branch(
    ctx: &LayoutContext,
    tree: &AtomTree,
    owner: AtomId,
    branch: BranchId,
    list: &[AtomId],
    options: &Options,
) -> Result<Option<LayoutBox>, LayoutError> {
    let Some((&first, rest)) = list.split_first() else {
        return Ok(None);
    };
    if !matches!(tree.get(first)?.kind, AtomKind::First) {
        return Err(LayoutError::at(
            LayoutErrorKind::MissingFirstSentinel { branch },
            owner,
        ));
    }
    if rest.is_empty() {
        return Ok(None);
    }

    let boxes = render_list(ctx, tree, rest, options)?;
    Ok(Some(LayoutBox::new(boxes, BoxType::Lift)))
}

/// Renders the named branch of `owner`, if present and not empty.
pub fn build_named_branch(
    ctx: &LayoutContext,
    tree: &AtomTree,
    owner: AtomId,
    name: BranchName,
    options: &Options,
) -> Result<Option<LayoutBox>, LayoutError> {
    match tree.get(owner)?.branch(name) {
        Some(list) => build_branch(ctx, tree, owner, BranchId::Named(name), list, options),
        None => Ok(None),
    }
}

/// Builds a list of sibling atoms and applies inter-atom spacing.
pub fn render_list(
    ctx: &LayoutContext,
    tree: &AtomTree,
    list: &[AtomId],
    options: &Options,
) -> Result<Vec<LayoutBox>, LayoutError> {
    let mut boxes = list
        .iter()
        .map(|&id| build_atom(ctx, tree, id, options))
        .collect::<Result<Vec<_>, _>>()?;

    {
        let mut items = Vec::with_capacity(boxes.len());
        flatten_lifted(&mut boxes, &mut items);
        adjust_types(&mut items);
        apply_inter_box_spacing(ctx, &mut items, options);
    }
    refresh_lifted_widths(&mut boxes);
    Ok(boxes)
}

/// Collects the boxes taking part in spacing, looking through `Lift` boxes.
fn flatten_lifted<'a>(boxes: &'a mut [LayoutBox], out: &mut Vec<&'a mut LayoutBox>) {
    for item in boxes {
        if item.box_type == BoxType::Lift {
            flatten_lifted(item.children_mut(), out);
        } else {
            out.push(item);
        }
    }
}

const fn is_skipped(box_type: BoxType) -> bool {
    matches!(box_type, BoxType::Spacing | BoxType::Ignore)
}

/// Reclassifies binary operators that have no operand on one side.
///
/// A `bin` at the start of a list, or after `bin`, `op`, `rel`, `open` or
/// `punct`, becomes an `ord`. So does a `bin` before `rel`, `close` or
/// `punct`, or at the end of the list.
pub fn adjust_types(items: &mut [&mut LayoutBox]) {
    let mut prev: Option<usize> = None;
    for index in 0..items.len() {
        let box_type = items[index].box_type;
        if is_skipped(box_type) {
            continue;
        }
        if box_type == BoxType::First {
            prev = None;
            continue;
        }

        if box_type == BoxType::Bin
            && prev.is_none_or(|p| {
                matches!(
                    items[p].box_type,
                    BoxType::Bin | BoxType::Op | BoxType::Rel | BoxType::Open | BoxType::Punct
                )
            })
        {
            items[index].box_type = BoxType::Ord;
        }

        if matches!(box_type, BoxType::Rel | BoxType::Close | BoxType::Punct)
            && let Some(p) = prev
            && items[p].box_type == BoxType::Bin
        {
            items[p].box_type = BoxType::Ord;
        }
        prev = Some(index);
    }

    if let Some(p) = prev
        && items[p].box_type == BoxType::Bin
    {
        items[p].box_type = BoxType::Ord;
    }
}

/// Name of the spacing table class of a box type.
const fn spacing_class(box_type: BoxType) -> Option<&'static str> {
    match box_type {
        BoxType::Ord | BoxType::Placeholder | BoxType::SupSub | BoxType::Error => Some("ord"),
        BoxType::Bin => Some("bin"),
        BoxType::Op => Some("op"),
        BoxType::Rel => Some("rel"),
        BoxType::Open => Some("open"),
        BoxType::Close => Some("close"),
        BoxType::Punct => Some("punct"),
        BoxType::Inner => Some("inner"),
        BoxType::First | BoxType::Ignore | BoxType::Lift | BoxType::Spacing => None,
    }
}

/// Adds the inter-atom space to the left margin of each box.
///
/// Script styles use the tight table.
pub fn apply_inter_box_spacing(
    ctx: &LayoutContext,
    items: &mut [&mut LayoutBox],
    options: &Options,
) {
    let mut prev: Option<&'static str> = None;
    for item in items.iter_mut() {
        if item.box_type == BoxType::First {
            prev = None;
            continue;
        }
        let Some(class) = spacing_class(item.box_type) else {
            continue;
        };
        if let Some(left) = prev
            && let Some(register) = spacing_between(left, class, item.is_tight)
        {
            item.left += register
                .measurement(&ctx.settings.registers)
                .to_em(options);
        }
        prev = Some(class);
    }
}

/// Recomputes the width of `Lift` boxes after their children moved.
fn refresh_lifted_widths(boxes: &mut [LayoutBox]) {
    for item in boxes {
        if item.box_type == BoxType::Lift {
            refresh_lifted_widths(item.children_mut());
            item.width = item
                .children()
                .iter()
                .map(|child| child.left + child.width + child.margin_right)
                .sum();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Atom;

    fn typed(box_type: BoxType) -> LayoutBox {
        LayoutBox::empty(box_type)
    }

    fn types_after_adjust(types: &[BoxType]) -> Vec<BoxType> {
        let mut boxes: Vec<_> = types.iter().copied().map(typed).collect();
        let mut items: Vec<&mut LayoutBox> = boxes.iter_mut().collect();
        adjust_types(&mut items);
        boxes.iter().map(|b| b.box_type).collect()
    }

    #[test]
    fn leading_bin_becomes_ord() {
        assert_eq!(
            types_after_adjust(&[BoxType::Bin, BoxType::Ord]),
            [BoxType::Ord, BoxType::Ord]
        );
        assert_eq!(
            types_after_adjust(&[BoxType::Rel, BoxType::Bin, BoxType::Ord]),
            [BoxType::Rel, BoxType::Ord, BoxType::Ord]
        );
    }

    #[test]
    fn bin_before_closer_becomes_ord() {
        assert_eq!(
            types_after_adjust(&[BoxType::Ord, BoxType::Bin, BoxType::Close]),
            [BoxType::Ord, BoxType::Ord, BoxType::Close]
        );
        assert_eq!(
            types_after_adjust(&[BoxType::Ord, BoxType::Bin, BoxType::Ord]),
            [BoxType::Ord, BoxType::Bin, BoxType::Ord]
        );
    }

    #[test]
    fn spacing_boxes_are_transparent() {
        assert_eq!(
            types_after_adjust(&[BoxType::Ord, BoxType::Spacing, BoxType::Bin, BoxType::Ord]),
            [BoxType::Ord, BoxType::Spacing, BoxType::Bin, BoxType::Ord]
        );
        assert_eq!(
            types_after_adjust(&[BoxType::Ord, BoxType::Bin]),
            [BoxType::Ord, BoxType::Ord]
        );
    }

    #[test]
    fn medium_space_around_bin() {
        let ctx = LayoutContext::default();
        let options = Options::default();
        let mut boxes = vec![typed(BoxType::Ord), typed(BoxType::Bin), typed(BoxType::Ord)];
        let mut items: Vec<&mut LayoutBox> = boxes.iter_mut().collect();
        apply_inter_box_spacing(&ctx, &mut items, &options);
        let medium = 4.0 / 18.0;
        assert_eq!(boxes[0].left, 0.0);
        assert!((boxes[1].left - medium).abs() < 1e-12);
        assert!((boxes[2].left - medium).abs() < 1e-12);
    }

    #[test]
    fn tight_boxes_skip_medium_space() {
        let ctx = LayoutContext::default();
        let options = Options::default();
        let mut boxes = vec![typed(BoxType::Ord), typed(BoxType::Bin), typed(BoxType::Ord)];
        for b in &mut boxes {
            b.is_tight = true;
        }
        let mut items: Vec<&mut LayoutBox> = boxes.iter_mut().collect();
        apply_inter_box_spacing(&ctx, &mut items, &options);
        assert!(boxes.iter().all(|b| b.left == 0.0));
    }

    #[test]
    fn lifted_children_are_spaced_in_the_enclosing_list() {
        let mut boxes = vec![
            typed(BoxType::Ord),
            LayoutBox::new(vec![typed(BoxType::Rel)], BoxType::Lift),
        ];
        let mut items = Vec::new();
        flatten_lifted(&mut boxes, &mut items);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].box_type, BoxType::Rel);
    }

    #[test]
    fn branch_without_sentinel_is_rejected() -> Result<(), LayoutError> {
        let ctx = LayoutContext::default();
        let mut tree = AtomTree::new();
        let group = tree.add(Atom::new(AtomKind::Group));
        let x = tree.add(Atom::symbol(AtomKind::Ord, "x"));
        let err = build_branch(
            &ctx,
            &tree,
            group,
            BranchId::Named(BranchName::Body),
            &[x],
            &Options::default(),
        );
        assert!(matches!(
            err.map_err(|e| (*e.kind, e.atom)),
            Err((LayoutErrorKind::MissingFirstSentinel { .. }, Some(atom))) if atom == group
        ));
        Ok(())
    }
}

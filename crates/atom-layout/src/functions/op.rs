//! Big operators such as `\sum` and `\int`
//!
//! Large operators switch to the `Size1` or `Size2` font depending on the
//! style and are centered on the math axis. Their scripts become limits in
//! display style (or always, with `\limits`), otherwise they attach at the
//! corners like the scripts of an extensible symbol.

use crate::atom::{AtomId, AtomTree, Limits, OpOptions};
use crate::box_tree::{BoxType, LayoutBox};
use crate::context::LayoutContext;
use crate::functions::supsub::{SupSubOptions, attach_sup_sub};
use crate::functions::utils::assemble_sup_sub;
use crate::options::Options;
use crate::types::{CssProperty, LayoutError};
use crate::units::make_em;

/// Builds a big operator with its limits or scripts.
pub fn build_op(
    ctx: &LayoutContext,
    tree: &AtomTree,
    id: AtomId,
    op: OpOptions,
    options: &Options,
) -> Result<LayoutBox, LayoutError> {
    let atom = tree.get(id)?;
    let display = options.is_display_style();
    let font = match (op.large, display) {
        (true, true) => "Size2-Regular",
        (true, false) => "Size1-Regular",
        (false, _) => options.font.as_deref().unwrap_or("Main-Regular"),
    };

    let mut base = LayoutBox::text(
        atom.value().unwrap_or_default(),
        font,
        BoxType::Op,
        &ctx.font_metrics,
    )
    .add_class("op-symbol");
    let slant = base.italic;

    if op.large {
        base.push_class("large-op");
        // Center on the axis
        let shift = (base.height - base.depth) / 2.0 - options.font_metrics().axis_height;
        base.height -= shift;
        base.depth += shift;
        base.set_style(CssProperty::Position, "relative");
        base.set_style(CssProperty::Top, make_em(shift));
    }

    let has_limits = match op.limits {
        Limits::Limits => true,
        Limits::Auto => display,
        Limits::NoLimits => false,
    };
    if has_limits {
        assemble_sup_sub(ctx, tree, id, base, options, slant, BoxType::Op)
    } else {
        let params = SupSubOptions {
            is_character_box: false,
            is_extensible: slant != 0.0,
            box_type: Some(BoxType::Op),
        };
        attach_sup_sub(ctx, tree, id, base, options, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::{Atom, AtomKind, BranchName};
    use crate::style::MathStyle;

    fn sum(tree: &mut AtomTree, limits: Limits) -> AtomId {
        let op = OpOptions {
            limits,
            large: true,
        };
        tree.add(Atom::symbol(AtomKind::Op(op), "\u{2211}").with_command("\\sum"))
    }

    #[test]
    fn large_ops_are_centered_on_the_axis() -> Result<(), LayoutError> {
        let ctx = LayoutContext::default();
        let mut tree = AtomTree::new();
        let id = sum(&mut tree, Limits::Auto);
        let options = Options::default();
        let op = build_op(&ctx, &tree, id, OpOptions { limits: Limits::Auto, large: true }, &options)?;
        assert_eq!(op.font.as_deref(), Some("Size1-Regular"));
        let axis = options.font_metrics().axis_height;
        assert!(((op.height - axis) - (op.depth + axis)).abs() < 1e-9);

        let display = options.having_style(MathStyle::Display);
        let op = build_op(&ctx, &tree, id, OpOptions { limits: Limits::Auto, large: true }, &display)?;
        assert_eq!(op.font.as_deref(), Some("Size2-Regular"));
        Ok(())
    }

    #[test]
    fn limits_follow_the_style() -> Result<(), LayoutError> {
        let ctx = LayoutContext::default();
        let mut tree = AtomTree::new();
        let id = sum(&mut tree, Limits::Auto);
        let n = tree.add(Atom::symbol(AtomKind::Ord, "n"));
        tree.append(id, BranchName::Superscript, n)?;
        let params = OpOptions { limits: Limits::Auto, large: true };

        let display = Options::default().having_style(MathStyle::Display);
        let stacked = build_op(&ctx, &tree, id, params, &display)?;
        assert!(stacked.has_class("op-limits"));
        assert_eq!(stacked.box_type, BoxType::Op);

        let inline = build_op(&ctx, &tree, id, params, &Options::default())?;
        assert!(!inline.has_class("op-limits"));
        assert_eq!(inline.box_type, BoxType::Op);
        assert_eq!(inline.children().len(), 2);

        let forced = OpOptions { limits: Limits::Limits, large: true };
        assert!(build_op(&ctx, &tree, id, forced, &Options::default())?.has_class("op-limits"));
        Ok(())
    }
}

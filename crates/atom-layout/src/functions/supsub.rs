//! Superscript and subscript attachment
//!
//! Scripts are placed at the corners of their base following TeXbook rules
//! 18(a-f). The shift computation is split out as the pure function
//! [`sup_sub_shifts`] so that it can be checked against the rules directly.

use core::mem;

use crate::atom::{AtomId, AtomTree, BranchName};
use crate::box_tree::{BoxType, LayoutBox};
use crate::build_box::build_named_branch;
use crate::build_common::{VBoxChild, VBoxElem, VBoxParam, make_v_box};
use crate::context::LayoutContext;
use crate::font_metrics::FontMetrics;
use crate::options::Options;
use crate::style::MathStyle;
use crate::types::LayoutError;

/// Baseline shifts of the scripts, both measured away from the base
/// baseline: up for the superscript, down for the subscript.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SupSubShifts {
    /// Raise of the superscript baseline
    pub sup_shift: f64,
    /// Drop of the subscript baseline
    pub sub_shift: f64,
}

/// How the base takes part in script placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SupSubOptions {
    /// The base is a single glyph: no drop corrections, and the subscript
    /// tucks under the italic correction
    pub is_character_box: bool,
    /// The base is an extensible symbol such as an integral sign
    pub is_extensible: bool,
    /// Type of the composite, [`BoxType::SupSub`] when absent
    pub box_type: Option<BoxType>,
}

/// Ratio of the size of `style` to the size of `options`.
fn script_ratio(options: &Options, style: MathStyle) -> (f64, &'static FontMetrics) {
    let script_options = options.having_style(style);
    (
        script_options.size_multiplier / options.size_multiplier,
        script_options.font_metrics(),
    )
}

/// Computes the script shifts of rules 18a to 18f.
///
/// `sup` and `sub` are the script boxes already converted to the ems of
/// `options`.
#[must_use]
pub fn sup_sub_shifts(
    base_height: f64,
    base_depth: f64,
    sup: Option<&LayoutBox>,
    sub: Option<&LayoutBox>,
    options: &Options,
    is_character_box: bool,
) -> SupSubShifts {
    let metrics = options.font_metrics();
    let mut shifts = SupSubShifts::default();

    // Rule 18a
    if !is_character_box {
        let (ratio, sup_metrics) = script_ratio(options, options.style.sup());
        shifts.sup_shift = sup_metrics.sup_drop.mul_add(-ratio, base_height);
        let (ratio, sub_metrics) = script_ratio(options, options.style.sub());
        shifts.sub_shift = sub_metrics.sub_drop.mul_add(ratio, base_depth);
    }

    let min_sup_shift = if options.style.is_display() {
        metrics.sup1
    } else if options.style.is_cramped() {
        metrics.sup3
    } else {
        metrics.sup2
    };

    match (sup, sub) {
        (Some(sup), Some(sub)) => {
            // Rule 18c
            shifts.sup_shift = shifts
                .sup_shift
                .max(min_sup_shift)
                .max(0.25f64.mul_add(metrics.x_height, sup.depth));
            // Rule 18e
            shifts.sub_shift = shifts.sub_shift.max(metrics.sub2);

            let rule_width = metrics.default_rule_thickness;
            let max_width = 4.0 * rule_width;
            if (shifts.sup_shift - sup.depth) - (sub.height - shifts.sub_shift) < max_width {
                shifts.sub_shift = max_width - (shifts.sup_shift - sup.depth) + sub.height;
                let psi = 0.8f64.mul_add(metrics.x_height, -(shifts.sup_shift - sup.depth));
                if psi > 0.0 {
                    shifts.sup_shift += psi;
                    shifts.sub_shift -= psi;
                }
            }
        }
        (None, Some(sub)) => {
            // Rule 18b
            shifts.sub_shift = shifts
                .sub_shift
                .max(metrics.sub1)
                .max(0.8f64.mul_add(-metrics.x_height, sub.height));
        }
        (Some(sup), None) => {
            // Rule 18c, d
            shifts.sup_shift = shifts
                .sup_shift
                .max(min_sup_shift)
                .max(0.25f64.mul_add(metrics.x_height, sup.depth));
        }
        (None, None) => {}
    }
    shifts
}

/// Renders a script branch in `style` and converts it to the ems of
/// `options`.
pub(crate) fn build_script(
    ctx: &LayoutContext,
    tree: &AtomTree,
    id: AtomId,
    name: BranchName,
    style: MathStyle,
    options: &Options,
) -> Result<Option<LayoutBox>, LayoutError> {
    let script_options = options.having_style(style);
    Ok(build_named_branch(ctx, tree, id, name, &script_options)?
        .map(|script| script.wrap(&script_options)))
}

/// Attaches the scripts of `id` to its rendered `base`.
///
/// Returns `base` unchanged when the atom has no scripts. Otherwise the
/// result is a composite of the base and a vertical list of the scripts,
/// carrying the caret of the base.
pub fn attach_sup_sub(
    ctx: &LayoutContext,
    tree: &AtomTree,
    id: AtomId,
    mut base: LayoutBox,
    options: &Options,
    params: SupSubOptions,
) -> Result<LayoutBox, LayoutError> {
    let sup = build_script(ctx, tree, id, BranchName::Superscript, options.style.sup(), options)?;
    let sub = build_script(ctx, tree, id, BranchName::Subscript, options.style.sub(), options)?;
    if sup.is_none() && sub.is_none() {
        return Ok(base);
    }

    let SupSubShifts {
        sup_shift,
        sub_shift,
    } = sup_sub_shifts(
        base.height,
        base.depth,
        sup.as_ref(),
        sub.as_ref(),
        options,
        params.is_character_box,
    );

    let script_space = ctx.settings.registers.scriptspace.to_em(options);
    // Subscripts tuck under the italic correction of glyphs
    let sub_margin_left = ((params.is_character_box || params.is_extensible)
        && base.italic != 0.0)
        .then_some(-base.italic);

    let vbox = match (sup, sub) {
        (Some(sup), Some(sub)) => VBoxParam::IndividualShift(vec![
            VBoxElem::builder()
                .elem(sub)
                .shift(sub_shift)
                .maybe_margin_left(sub_margin_left)
                .margin_right(script_space)
                .build(),
            VBoxElem::builder()
                .elem(sup)
                .shift(-sup_shift)
                .margin_right(script_space)
                .build(),
        ]),
        (None, Some(sub)) => VBoxParam::Shift {
            position: sub_shift,
            children: vec![VBoxChild::from(
                VBoxElem::builder()
                    .elem(sub)
                    .maybe_margin_left(sub_margin_left)
                    .margin_right(script_space)
                    .build(),
            )],
        },
        (Some(sup), None) => VBoxParam::Shift {
            position: -sup_shift,
            children: vec![VBoxChild::from(
                VBoxElem::builder()
                    .elem(sup)
                    .margin_right(script_space)
                    .build(),
            )],
        },
        (None, None) => return Ok(base),
    };

    let mut scripts = make_v_box(vbox, options)
        .map_err(|mut err| {
            err.atom.get_or_insert(id);
            err
        })?
        .add_class("msupsub");
    scripts.box_type = BoxType::Ignore;

    let caret = mem::take(&mut base.caret);
    let mut result = LayoutBox::new(
        vec![base, scripts],
        params.box_type.unwrap_or(BoxType::SupSub),
    );
    result.caret = caret;
    Ok(result)
}

//! Generalized fractions: `\frac`, `\binom`, `\cfrac` and friends
//!
//! Numerator and denominator are stacked around the math axis following
//! TeXbook rules 15a to 15e, optionally separated by a bar and flanked by
//! delimiters.

use crate::atom::{AtomId, AtomTree, BranchName, FracAlign, GenfracOptions};
use crate::box_tree::{BoxType, LayoutBox};
use crate::build_box::build_named_branch;
use crate::build_common::{VBoxElem, VBoxParam, make_rule, make_strut, make_v_box};
use crate::context::LayoutContext;
use crate::delimiter::{custom_sized_delim, make_null_delimiter};
use crate::functions::supsub::{SupSubOptions, attach_sup_sub};
use crate::options::Options;
use crate::types::LayoutError;
use crate::units::{Measurement, Unit};

const fn align_class(align: FracAlign) -> &'static str {
    match align {
        FracAlign::Left => "ML__left",
        FracAlign::Center => "ML__center",
        FracAlign::Right => "ML__right",
    }
}

/// Renders one side of the fraction and converts it to `frac_options` ems.
fn build_part(
    ctx: &LayoutContext,
    tree: &AtomTree,
    id: AtomId,
    name: BranchName,
    part_options: &Options,
    strut: Option<(f64, f64)>,
) -> Result<LayoutBox, LayoutError> {
    let mut part = build_named_branch(ctx, tree, id, name, part_options)?
        .unwrap_or_else(|| LayoutBox::empty(BoxType::Ord));
    part.box_type = BoxType::Ord;
    if let Some((height, depth)) = strut {
        part = LayoutBox::new(vec![make_strut(height, depth), part], BoxType::Ord);
    }
    Ok(part.wrap(part_options))
}

/// Builds a fraction atom.
pub fn build_genfrac(
    ctx: &LayoutContext,
    tree: &AtomTree,
    id: AtomId,
    frac: &GenfracOptions,
    options: &Options,
) -> Result<LayoutBox, LayoutError> {
    let style = frac.math_style.unwrap_or(options.style);
    let frac_options = options.having_style(style);
    let metrics = frac_options.font_metrics();

    let (numer_options, denom_options) = if frac.continued_fraction {
        (frac_options.having_style(style), frac_options.having_style(style))
    } else {
        (
            frac_options.having_style(style.frac_num()),
            frac_options.having_style(style.frac_den()),
        )
    };
    let strut = frac.continued_fraction.then(|| {
        (
            Measurement::new(8.5, Unit::Pt).to_em(&numer_options),
            Measurement::new(3.5, Unit::Pt).to_em(&numer_options),
        )
    });

    let numer = build_part(ctx, tree, id, BranchName::Above, &numer_options, strut)?;
    let denom = build_part(ctx, tree, id, BranchName::Below, &denom_options, strut)?;

    let rule_width = if frac.has_bar_line {
        frac.bar_thickness
            .map_or(metrics.default_rule_thickness, |t| t.to_em(&frac_options))
    } else {
        0.0
    };

    let display = style.size() == 0;
    let (mut num_shift, clearance) = if display {
        let clearance = if rule_width > 0.0 {
            3.0 * rule_width
        } else {
            7.0 * metrics.default_rule_thickness
        };
        (metrics.num1, clearance)
    } else if rule_width > 0.0 {
        (metrics.num2, rule_width)
    } else {
        (metrics.num3, 3.0 * metrics.default_rule_thickness)
    };
    let mut denom_shift = if display { metrics.denom1 } else { metrics.denom2 };

    let numer_elem = |elem: LayoutBox, shift: f64| {
        VBoxElem::builder()
            .elem(elem)
            .shift(shift)
            .wrapper_classes(vec![align_class(frac.align).to_owned()])
            .build()
    };

    let stack = if rule_width > 0.0 {
        let axis = metrics.axis_height;
        num_shift = num_shift.max(clearance + numer.depth + axis + rule_width / 2.0);
        denom_shift = denom_shift.max(clearance + denom.height - axis + rule_width / 2.0);

        let mut rule = make_rule(
            "ML__frac-line",
            rule_width,
            numer.width.max(denom.width),
            &frac_options,
        );
        // Centered on the axis
        let thickness = rule.height;
        rule.height = thickness / 2.0;
        rule.depth = thickness / 2.0;

        VBoxParam::IndividualShift(vec![
            numer_elem(denom, denom_shift),
            VBoxElem::builder().elem(rule).shift(-axis).build(),
            numer_elem(numer, -num_shift),
        ])
    } else {
        let candidate = (num_shift - numer.depth) - (denom.height - denom_shift);
        if candidate < clearance {
            let adjust = (clearance - candidate) / 2.0;
            num_shift += adjust;
            denom_shift += adjust;
        }
        VBoxParam::IndividualShift(vec![
            numer_elem(denom, denom_shift),
            numer_elem(numer, -num_shift),
        ])
    };

    let mut frac_box = make_v_box(stack, &frac_options)
        .map_err(|mut err| {
            err.atom.get_or_insert(id);
            err
        })?
        .add_class("mfrac");
    frac_box.box_type = BoxType::Ord;

    let delim_size = if display { metrics.delim1 } else { metrics.delim2 };
    let left = match frac.left_delim.as_deref() {
        Some(delim) => custom_sized_delim(ctx, delim, delim_size, true, &frac_options, BoxType::Open),
        None => make_null_delimiter(ctx, &frac_options, BoxType::Open),
    };
    let right = if frac.continued_fraction {
        LayoutBox::empty(BoxType::Close)
    } else {
        match frac.right_delim.as_deref() {
            Some(delim) => {
                custom_sized_delim(ctx, delim, delim_size, true, &frac_options, BoxType::Close)
            }
            None => make_null_delimiter(ctx, &frac_options, BoxType::Close),
        }
    };

    let result = LayoutBox::new(vec![left, frac_box, right], BoxType::Inner).wrap(&frac_options);
    let params = SupSubOptions {
        box_type: Some(BoxType::Inner),
        ..SupSubOptions::default()
    };
    attach_sup_sub(ctx, tree, id, result, options, params)
}

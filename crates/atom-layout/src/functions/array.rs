//! Array layout: matrices, `cases` and `array` grids
//!
//! Rows are measured first, each at least as tall as the array strut, then
//! every content column becomes a vertical list whose cells sit at their
//! row's baseline. The grid is centered on the math axis. Column gaps and
//! vertical rules come from the column format.

use core::{iter, mem};

use phf::phf_set;
use tracing::trace;

use crate::atom::{
    ArrayOptions, AtomId, AtomTree, BranchId, ColSeparation, ColumnAlign, ColumnFormat,
    SeparatorStyle,
};
use crate::box_tree::{BoxType, LayoutBox};
use crate::build_box::build_branch;
use crate::build_common::{VBoxElem, VBoxParam, make_gap, make_v_box};
use crate::context::LayoutContext;
use crate::delimiter::{is_null_delimiter, left_right_delim};
use crate::functions::supsub::{SupSubOptions, attach_sup_sub};
use crate::options::Options;
use crate::style::MathStyle;
use crate::types::{CssProperty, LayoutError};
use crate::units::make_em;

/// Environments whose rows are not separated by `\jot`.
const MATRIX_ENVIRONMENTS: phf::Set<&'static str> = phf_set! {
    "array", "subarray", "smallmatrix", "cases", "dcases", "rcases",
    "matrix", "pmatrix", "bmatrix", "Bmatrix", "vmatrix", "Vmatrix",
    "matrix*", "pmatrix*", "bmatrix*", "Bmatrix*", "vmatrix*", "Vmatrix*",
};

/// Column separation of `smallmatrix`, in script ems.
const SMALL_COLSEP: f64 = 0.2778;

/// Strut proportions of a row, relative to the array skip.
const STRUT_HEIGHT: f64 = 0.7;
const STRUT_DEPTH: f64 = 0.3;

struct Row {
    cells: Vec<LayoutBox>,
    height: f64,
    depth: f64,
    pos: f64,
}

/// What the column format emitted last.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Last {
    Start,
    Content,
    Rule,
    Gap,
}

const fn align_class(align: ColumnAlign) -> &'static str {
    match align {
        ColumnAlign::Left => "col-align-l",
        ColumnAlign::Center => "col-align-c",
        ColumnAlign::Right => "col-align-r",
    }
}

/// The column format with one `Align` entry per content column at most.
fn effective_format(format: &[ColumnFormat], columns: usize) -> Vec<ColumnFormat> {
    if !format.iter().any(|f| matches!(f, ColumnFormat::Align(_))) {
        let mut result = format.to_vec();
        result.extend(iter::repeat_n(
            ColumnFormat::Align(ColumnAlign::Left),
            columns,
        ));
        return result;
    }
    let mut seen = 0;
    format
        .iter()
        .filter(|f| {
            if matches!(f, ColumnFormat::Align(_)) {
                seen += 1;
                seen <= columns
            } else {
                true
            }
        })
        .copied()
        .collect()
}

fn column_separation(ctx: &LayoutContext, array: &ArrayOptions, options: &Options) -> f64 {
    match array.col_separation {
        ColSeparation::Small => {
            let script = options.having_style(MathStyle::Script);
            SMALL_COLSEP * script.size_multiplier / options.size_multiplier
        }
        ColSeparation::Default => array
            .arraycolsep
            .unwrap_or(ctx.settings.registers.arraycolsep)
            .to_em(options),
    }
}

fn measure_rows(
    ctx: &LayoutContext,
    tree: &AtomTree,
    id: AtomId,
    grid: &[Vec<Vec<AtomId>>],
    array: &ArrayOptions,
    options: &Options,
) -> Result<(Vec<Row>, f64), LayoutError> {
    let cell_options = options.having_style(array.math_style.unwrap_or(options.style));
    let registers = &ctx.settings.registers;
    let arrayskip = array.arraystretch * registers.baselineskip.to_em(options);
    let strut_height = STRUT_HEIGHT * arrayskip;
    let strut_depth = STRUT_DEPTH * arrayskip;
    let jot = if MATRIX_ENVIRONMENTS.contains(array.environment.as_str()) {
        0.0
    } else {
        registers.jot.to_em(options)
    };

    let mut rows = Vec::with_capacity(grid.len());
    let mut pos = 0.0;
    for (r, cells) in grid.iter().enumerate() {
        let mut height = strut_height;
        let mut depth = strut_depth;
        let mut row_cells = Vec::with_capacity(cells.len());
        for (c, list) in cells.iter().enumerate() {
            let branch = BranchId::Cell { row: r, col: c };
            let cell = build_branch(ctx, tree, id, branch, list, &cell_options)?
                .unwrap_or_else(|| LayoutBox::empty(BoxType::Ord))
                .wrap(&cell_options);
            height = height.max(cell.height);
            depth = depth.max(cell.depth);
            row_cells.push(cell);
        }

        if r + 1 < grid.len() {
            depth += jot;
        }
        if let Some(Some(gap)) = array.row_gaps.get(r) {
            let gap = gap.to_em(options);
            if gap > 0.0 {
                depth = depth.max(gap + strut_depth);
            }
        }

        pos += height;
        rows.push(Row {
            cells: row_cells,
            height,
            depth,
            pos,
        });
        pos += depth;
    }
    Ok((rows, pos))
}

/// Builds an array atom.
pub fn build_array(
    ctx: &LayoutContext,
    tree: &AtomTree,
    id: AtomId,
    array: &ArrayOptions,
    options: &Options,
) -> Result<LayoutBox, LayoutError> {
    let grid = tree.get(id)?.grid().unwrap_or_default();
    if grid.is_empty() {
        let params = SupSubOptions::default();
        return attach_sup_sub(ctx, tree, id, LayoutBox::empty(BoxType::Ord), options, params);
    }

    let (mut rows, total) = measure_rows(ctx, tree, id, grid, array, options)?;
    let columns = rows.iter().map(|row| row.cells.len()).max().unwrap_or(0);
    let offset = total / 2.0 + options.font_metrics().axis_height;
    trace!(atom = %id, rows = rows.len(), columns, total, "laying out array");

    let registers = &ctx.settings.registers;
    let colsep = column_separation(ctx, array, options);
    let rule_width = registers.arrayrulewidth.to_em(options);
    let double_rule_sep = registers.doublerulesep.to_em(options);

    let mut parts = Vec::new();
    let mut last = Last::Start;
    let mut column = 0;
    for format in effective_format(&array.col_format, columns) {
        match format {
            ColumnFormat::Align(align) => {
                let gap = match last {
                    Last::Start | Last::Rule => colsep,
                    Last::Content => 2.0 * colsep,
                    Last::Gap => 0.0,
                };
                if gap > 0.0 {
                    parts.push(make_gap(gap));
                }

                // Bottom row first
                let mut elems = Vec::with_capacity(rows.len());
                for row in rows.iter_mut().rev() {
                    let mut cell = if column < row.cells.len() {
                        mem::take(&mut row.cells[column])
                    } else {
                        LayoutBox::empty(BoxType::Ord)
                    };
                    cell.height = row.height;
                    cell.depth = row.depth;
                    elems.push(VBoxElem::builder().elem(cell).shift(row.pos - offset).build());
                }
                let mut col = make_v_box(VBoxParam::IndividualShift(elems), options)
                    .map_err(|mut err| {
                        err.atom.get_or_insert(id);
                        err
                    })?
                    .add_class(align_class(align));
                col.box_type = BoxType::Ord;
                parts.push(col);
                column += 1;
                last = Last::Content;
            }
            ColumnFormat::Gap(width) => {
                parts.push(make_gap(width));
                last = Last::Gap;
            }
            ColumnFormat::Separator(style) => {
                let mut separator = LayoutBox::with_class("ML__vertical-separator");
                separator.width = rule_width;
                separator.height = offset;
                separator.depth = total - offset;
                separator.left = match last {
                    Last::Rule => double_rule_sep - rule_width,
                    Last::Content => colsep - rule_width,
                    Last::Start | Last::Gap => 0.0,
                };
                separator.set_style(CssProperty::BorderRightWidth, make_em(rule_width));
                separator.set_style(
                    CssProperty::BorderRightStyle,
                    match style {
                        SeparatorStyle::Solid => "solid",
                        SeparatorStyle::Dashed => "dashed",
                    },
                );
                separator.set_style(CssProperty::Height, make_em(total));
                separator.set_style(CssProperty::VerticalAlign, make_em(offset - total));
                parts.push(separator);
                last = Last::Rule;
            }
        }
    }

    let left_delim = array.left_delim.as_deref().unwrap_or(".");
    let right_delim = array.right_delim.as_deref().unwrap_or(".");
    if last == Last::Content && is_null_delimiter(right_delim) {
        parts.push(make_gap(colsep));
    }

    let mut body = LayoutBox::new(parts, BoxType::Ord).add_class("mtable");
    body.height = body.height.max(offset);
    body.depth = body.depth.max(total - offset);

    let result = if is_null_delimiter(left_delim) && is_null_delimiter(right_delim) {
        body
    } else {
        let (height, depth) = (body.height, body.depth);
        LayoutBox::new(
            vec![
                left_right_delim(ctx, left_delim, height, depth, options, BoxType::Open),
                body,
                left_right_delim(ctx, right_delim, height, depth, options, BoxType::Close),
            ],
            BoxType::Inner,
        )
    };

    let params = SupSubOptions {
        box_type: Some(result.box_type),
        ..SupSubOptions::default()
    };
    attach_sup_sub(ctx, tree, id, result, options, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::{Atom, AtomKind, Grid};

    fn filled(tree: &mut AtomTree, array: ArrayOptions, cells: &[&[&str]]) -> Result<AtomId, LayoutError> {
        let grid: Grid = cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|value| vec![tree.add(Atom::symbol(AtomKind::Ord, value))])
                    .collect()
            })
            .collect();
        tree.new_array(array, grid)
    }

    fn options_of(tree: &AtomTree, id: AtomId) -> Result<ArrayOptions, LayoutError> {
        match &tree.get(id)?.kind {
            AtomKind::Array(array) => Ok(array.clone()),
            _ => Ok(ArrayOptions::default()),
        }
    }

    #[test]
    fn matrix_is_centered_on_the_axis() -> Result<(), LayoutError> {
        let ctx = LayoutContext::default();
        let mut tree = AtomTree::new();
        let pmatrix = ArrayOptions::builder()
            .environment("pmatrix")
            .left_delim("(".to_owned())
            .right_delim(")".to_owned())
            .build();
        let id = filled(&mut tree, pmatrix, &[&["a", "b"], &["c", "d"]])?;
        let array = options_of(&tree, id)?;
        let result = build_array(&ctx, &tree, id, &array, &Options::default())?;

        assert_eq!(result.box_type, BoxType::Inner);
        let body = &result.children()[1];
        assert!(body.has_class("mtable"));
        // Two rows of 0.84 + 0.36, centered on the 0.25 axis
        assert!((body.height - 1.45).abs() < 1e-9);
        assert!((body.depth - 0.95).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn separators_replace_half_a_column_gap() -> Result<(), LayoutError> {
        let ctx = LayoutContext::default();
        let mut tree = AtomTree::new();
        let format = vec![
            ColumnFormat::Align(ColumnAlign::Center),
            ColumnFormat::Separator(SeparatorStyle::Solid),
            ColumnFormat::Align(ColumnAlign::Center),
        ];
        let with_rule = ArrayOptions::builder().col_format(format).build();
        let id = filled(&mut tree, with_rule, &[&["a", "b"]])?;
        let array = options_of(&tree, id)?;
        let result = build_array(&ctx, &tree, id, &array, &Options::default())?;

        let glyphs = LayoutBox::text("ab", "Math-Italic", BoxType::Ord, &ctx.font_metrics);
        assert!((result.width - (4.0 * 0.5 + glyphs.width)).abs() < 1e-9);
        assert_eq!(result.box_type, BoxType::Ord);
        Ok(())
    }

    #[test]
    fn align_environments_add_jot_between_rows() -> Result<(), LayoutError> {
        let ctx = LayoutContext::default();
        let mut tree = AtomTree::new();
        let matrix = filled(
            &mut tree,
            ArrayOptions::builder().environment("matrix").build(),
            &[&["x"], &["y"]],
        )?;
        let aligned = filled(
            &mut tree,
            ArrayOptions::builder().environment("aligned").build(),
            &[&["x"], &["y"]],
        )?;
        let options = Options::default();
        let plain = build_array(&ctx, &tree, matrix, &options_of(&tree, matrix)?, &options)?;
        let spread = build_array(&ctx, &tree, aligned, &options_of(&tree, aligned)?, &options)?;
        let jot = 0.3;
        assert!((spread.total_height() - plain.total_height() - jot).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn row_gaps_extend_the_row() -> Result<(), LayoutError> {
        let ctx = LayoutContext::default();
        let mut tree = AtomTree::new();
        let gapped = ArrayOptions::builder()
            .environment("matrix")
            .row_gaps(vec![Some(crate::units::Measurement::em(1.0))])
            .build();
        let id = filled(&mut tree, gapped, &[&["x"], &["y"]])?;
        let result = build_array(&ctx, &tree, id, &options_of(&tree, id)?, &Options::default())?;
        // First row depth grows from 0.36 to 1 + 0.36
        assert!((result.total_height() - (2.0 * 1.2 + 1.0)).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn small_matrices_use_narrow_columns() {
        let ctx = LayoutContext::default();
        let small = ArrayOptions::builder()
            .col_separation(ColSeparation::Small)
            .build();
        let sep = column_separation(&ctx, &small, &Options::default());
        assert!((sep - 0.2778 * 0.7).abs() < 1e-12);
        assert!((column_separation(&ctx, &ArrayOptions::default(), &Options::default()) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn array_without_cells_is_empty() -> Result<(), LayoutError> {
        let ctx = LayoutContext::default();
        let mut tree = AtomTree::new();
        let id = tree.add(Atom::new(AtomKind::Array(ArrayOptions::default())));
        let result = build_array(&ctx, &tree, id, &ArrayOptions::default(), &Options::default())?;
        assert_eq!(result.width, 0.0);
        assert_eq!(result.box_type, BoxType::Ord);
        Ok(())
    }

    #[test]
    fn format_is_padded_or_trimmed_to_the_columns() {
        let padded = effective_format(&[], 2);
        assert_eq!(padded.len(), 2);
        let trimmed = effective_format(
            &[
                ColumnFormat::Align(ColumnAlign::Left),
                ColumnFormat::Separator(SeparatorStyle::Dashed),
                ColumnFormat::Align(ColumnAlign::Right),
                ColumnFormat::Align(ColumnAlign::Right),
            ],
            2,
        );
        assert_eq!(trimmed.len(), 3);
    }
}

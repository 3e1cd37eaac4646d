//! Array grid normalization

use tracing::trace;

use crate::types::{LayoutError, LayoutErrorKind, Mode};

use super::{Atom, AtomId, AtomKind, AtomTree, ArrayOptions, BranchId, ColumnFormat};

/// Rows of cells, each cell a branch of atoms.
pub type Grid = Vec<Vec<Vec<AtomId>>>;

/// Content columns assumed when the column format declares none.
const DEFAULT_COLUMNS: usize = 10;

fn content_columns(options: &ArrayOptions) -> usize {
    match options
        .col_format
        .iter()
        .filter(|format| matches!(format, ColumnFormat::Align(_)))
        .count()
    {
        0 => DEFAULT_COLUMNS,
        n => n,
    }
}

impl AtomTree {
    /// Creates an array atom and fills it with `rows`.
    pub fn new_array(&mut self, options: ArrayOptions, rows: Grid) -> Result<AtomId, LayoutError> {
        let id = self.add(Atom::new(AtomKind::Array(options)));
        self.set_cells(id, rows)?;
        Ok(id)
    }

    /// Replaces the cells of an array atom.
    ///
    /// The grid is normalized first:
    /// - rows longer than the number of content columns wrap around;
    /// - a trailing row whose cells are all empty is dropped, unless it is
    ///   the only row;
    /// - short rows are padded and empty cells get a placeholder;
    /// - every cell starts with a `first` sentinel.
    pub fn set_cells(&mut self, id: AtomId, rows: Grid) -> Result<(), LayoutError> {
        let atom = self.get(id)?;
        let AtomKind::Array(options) = &atom.kind else {
            return Err(LayoutError::at(LayoutErrorKind::NotAnArray { atom: id }, id));
        };
        if atom.value.is_some() {
            return Err(LayoutError::at(
                LayoutErrorKind::ValueWithBranches { atom: id },
                id,
            ));
        }
        let max_cols = content_columns(options);
        let mode = atom.mode;

        // Cells may be moved around within the same array
        let previous = self.take_grid(id)?;
        let incoming: Vec<AtomId> = rows.iter().flatten().flatten().copied().collect();
        if let Err(err) = self.check_attachable(id, &incoming) {
            if let Some(previous) = previous {
                self.install_grid(id, previous)?;
            }
            return Err(err);
        }

        let grid = self.normalize_grid(rows, max_cols, mode);
        trace!(
            atom = %id,
            rows = grid.len(),
            cols = grid.first().map_or(0, Vec::len),
            "normalized array grid"
        );
        self.install_grid(id, grid)?;
        self.mark_dirty(id)
    }

    fn take_grid(&mut self, id: AtomId) -> Result<Option<Grid>, LayoutError> {
        let previous = self.get_mut(id)?.grid.take();
        if let Some(grid) = &previous {
            let atoms: Vec<AtomId> = grid.iter().flatten().flatten().copied().collect();
            self.detach_all(&atoms);
        }
        Ok(previous)
    }

    fn install_grid(&mut self, id: AtomId, grid: Grid) -> Result<(), LayoutError> {
        for (row, cells) in grid.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                for &atom in cell {
                    self.attach(id, BranchId::Cell { row, col }, atom)?;
                }
            }
        }
        self.get_mut(id)?.grid = Some(grid);
        Ok(())
    }

    fn is_empty_cell(&self, cell: &[AtomId]) -> bool {
        cell.iter().all(|&atom| self.is_first(atom))
    }

    fn normalize_grid(&mut self, rows: Grid, max_cols: usize, mode: Mode) -> Grid {
        let mut folded: Grid = Vec::with_capacity(rows.len());
        for row in rows {
            if row.len() > max_cols {
                folded.extend(row.chunks(max_cols).map(<[Vec<AtomId>]>::to_vec));
            } else {
                folded.push(row);
            }
        }

        if folded.len() > 1
            && let Some(last) = folded.last()
            && last.iter().all(|cell| self.is_empty_cell(cell))
        {
            folded.pop();
        }
        if folded.is_empty() {
            folded.push(Vec::new());
        }

        let col_count = folded.iter().map(Vec::len).max().unwrap_or(0).max(1);
        for row in &mut folded {
            row.resize_with(col_count, Vec::new);
            for cell in row.iter_mut() {
                if !cell.first().is_some_and(|&first| self.is_first(first)) {
                    cell.insert(0, self.add_sentinel(mode));
                }
                if cell.len() == 1 {
                    let placeholder = self.add(Atom::new(AtomKind::Placeholder).with_mode(mode));
                    cell.push(placeholder);
                }
            }
        }
        folded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::ColumnAlign;

    fn two_columns() -> ArrayOptions {
        ArrayOptions::builder()
            .col_format(vec![
                ColumnFormat::Align(ColumnAlign::Center),
                ColumnFormat::Align(ColumnAlign::Center),
            ])
            .build()
    }

    fn kind_of(tree: &AtomTree, id: AtomId) -> &'static str {
        tree.get(id).map_or("missing", |atom| atom.kind.name())
    }

    #[test]
    fn long_rows_fold_and_pad() -> Result<(), LayoutError> {
        let mut tree = AtomTree::new();
        let [a, b, c] = ["a", "b", "c"].map(|v| tree.add(Atom::symbol(AtomKind::Ord, v)));
        let array = tree.new_array(two_columns(), vec![vec![vec![a], vec![b], vec![c]]])?;

        let grid = tree.get(array)?.grid().unwrap_or_default().to_vec();
        assert_eq!(grid.len(), 2);
        assert!(grid.iter().all(|row| row.len() == 2));
        assert_eq!(grid[0][0][1], a);
        assert_eq!(grid[0][1][1], b);
        assert_eq!(grid[1][0][1], c);
        assert_eq!(kind_of(&tree, grid[1][1][1]), "placeholder");
        for row in &grid {
            for cell in row {
                assert_eq!(kind_of(&tree, cell[0]), "first");
            }
        }
        assert_eq!(
            tree.get(c)?.parent_branch(),
            Some(BranchId::Cell { row: 1, col: 0 })
        );
        assert_eq!(tree.get(c)?.parent(), Some(array));
        Ok(())
    }

    #[test]
    fn trailing_empty_row_is_dropped() -> Result<(), LayoutError> {
        let mut tree = AtomTree::new();
        let a = tree.add(Atom::symbol(AtomKind::Ord, "a"));
        let array = tree.new_array(two_columns(), vec![vec![vec![a]], vec![vec![]]])?;
        assert_eq!(tree.get(array)?.grid().map(<[_]>::len), Some(1));

        let lonely = tree.new_array(two_columns(), vec![vec![vec![]]])?;
        let grid = tree.get(lonely)?.grid().unwrap_or_default().to_vec();
        assert_eq!(grid.len(), 1);
        assert_eq!(kind_of(&tree, grid[0][0][1]), "placeholder");
        Ok(())
    }

    #[test]
    fn trailing_row_of_empty_cells_is_dropped() -> Result<(), LayoutError> {
        let mut tree = AtomTree::new();
        let [a, b] = ["a", "b"].map(|v| tree.add(Atom::symbol(AtomKind::Ord, v)));
        let array = tree.new_array(
            two_columns(),
            vec![vec![vec![a], vec![b]], vec![vec![], vec![]]],
        )?;
        assert_eq!(tree.get(array)?.grid().map(<[_]>::len), Some(1));

        let c = tree.add(Atom::symbol(AtomKind::Ord, "c"));
        let kept = tree.new_array(two_columns(), vec![vec![vec![c]], vec![vec![], vec![]]])?;
        let grid = tree.get(kept)?.grid().unwrap_or_default().to_vec();
        assert_eq!(grid.len(), 1);
        assert_eq!(grid[0][1].len(), 2);

        let both_empty = tree.new_array(two_columns(), vec![vec![vec![], vec![]]])?;
        assert_eq!(tree.get(both_empty)?.grid().map(<[_]>::len), Some(1));
        Ok(())
    }

    #[test]
    fn default_format_allows_ten_columns() -> Result<(), LayoutError> {
        let mut tree = AtomTree::new();
        let cells: Vec<Vec<AtomId>> = (0..12)
            .map(|_| vec![tree.add(Atom::symbol(AtomKind::Ord, "x"))])
            .collect();
        let array = tree.new_array(ArrayOptions::default(), vec![cells])?;
        let grid = tree.get(array)?.grid().unwrap_or_default().to_vec();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0].len(), 10);
        Ok(())
    }

    #[test]
    fn set_cells_can_reuse_cells_and_rejects_non_arrays() -> Result<(), LayoutError> {
        let mut tree = AtomTree::new();
        let a = tree.add(Atom::symbol(AtomKind::Ord, "a"));
        let array = tree.new_array(two_columns(), vec![vec![vec![a]]])?;
        let before = tree.change_counter();
        tree.set_cells(array, vec![vec![vec![], vec![a]]])?;
        assert!(tree.change_counter() > before);
        assert_eq!(
            tree.get(a)?.parent_branch(),
            Some(BranchId::Cell { row: 0, col: 1 })
        );

        let group = tree.add(Atom::new(AtomKind::Group));
        let err = tree.set_cells(group, vec![]).map_err(|e| *e.kind);
        assert!(matches!(err, Err(LayoutErrorKind::NotAnArray { .. })));
        Ok(())
    }
}

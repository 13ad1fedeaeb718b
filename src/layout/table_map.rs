//! Grid map: which cell owns each `(row, column)` position of a table.
//!
//! Cells are placed row by row. Within a row, each cell takes the next column
//! not already covered by a row-spanning cell from a previous row, then covers
//! `row_span × col_span` positions.

use std::collections::HashMap;

use super::index_u32;
use crate::document::Tree;
use crate::error::{Result, TableError};
use crate::types::{NodeKey, SelectionShape};

/// One occupied grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapCell {
    pub cell: NodeKey,
    /// Row of the cell's top-left position
    pub start_row: u32,
    /// Column of the cell's top-left position
    pub start_col: u32,
    pub row_span: u32,
    pub col_span: u32,
}

impl MapCell {
    pub fn end_row(&self) -> u32 {
        self.start_row.saturating_add(self.row_span.max(1) - 1)
    }

    pub fn end_col(&self) -> u32 {
        self.start_col.saturating_add(self.col_span.max(1) - 1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableMap {
    grid: Vec<Vec<Option<MapCell>>>,
    width: u32,
    positions: HashMap<NodeKey, MapCell>,
    /// Positions claimed by more than one cell (lenient mode only)
    overlaps: Vec<(u32, u32)>,
}

impl TableMap {
    /// Compute the map, failing if two cells claim the same position.
    pub fn compute(tree: &Tree, table: NodeKey) -> Result<Self> {
        let map = Self::build(tree, table)?;
        if let Some((row, col)) = map.overlaps.first() {
            return Err(TableError::invariant(format!(
                "table {table}: position ({row}, {col}) is covered by more than one cell"
            )));
        }
        Ok(map)
    }

    /// Compute the map, keeping the first claimant of any overlapping position.
    pub fn compute_lenient(tree: &Tree, table: NodeKey) -> Result<Self> {
        Self::build(tree, table)
    }

    fn build(tree: &Tree, table: NodeKey) -> Result<Self> {
        let rows = &tree.table(table)?.rows;
        let height = rows.len();
        let mut grid: Vec<Vec<Option<MapCell>>> = vec![Vec::new(); height];
        let mut positions = HashMap::new();
        let mut overlaps = Vec::new();

        for (r, row_key) in rows.iter().enumerate() {
            let row = tree.row(*row_key)?;
            let mut c = 0usize;
            for cell_key in &row.cells {
                let cell = tree.cell(*cell_key)?;
                while grid
                    .get(r)
                    .and_then(|line| line.get(c))
                    .is_some_and(Option::is_some)
                {
                    c += 1;
                }
                let entry = MapCell {
                    cell: *cell_key,
                    start_row: index_u32(r),
                    start_col: index_u32(c),
                    // Row spans stop at the last row
                    row_span: cell.row_span.clamp(1, index_u32(height - r)),
                    col_span: cell.col_span.max(1),
                };
                let end_row = r + entry.row_span as usize;
                let end_col = c + entry.col_span as usize;
                for rr in r..end_row {
                    let Some(line) = grid.get_mut(rr) else {
                        continue;
                    };
                    if line.len() < end_col {
                        line.resize(end_col, None);
                    }
                    for cc in c..end_col {
                        if let Some(slot) = line.get_mut(cc) {
                            if slot.is_some() {
                                overlaps.push((index_u32(rr), index_u32(cc)));
                            } else {
                                *slot = Some(entry);
                            }
                        }
                    }
                }
                positions.insert(*cell_key, entry);
                c = end_col;
            }
        }

        let width = index_u32(grid.iter().map(Vec::len).max().unwrap_or(0));
        for line in &mut grid {
            line.resize(width as usize, None);
        }

        Ok(Self {
            grid,
            width,
            positions,
            overlaps,
        })
    }

    /// Number of grid rows (equals the number of row nodes)
    pub fn height(&self) -> u32 {
        index_u32(self.grid.len())
    }

    /// Number of grid columns
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn get(&self, row: u32, col: u32) -> Option<&MapCell> {
        self.grid
            .get(row as usize)
            .and_then(|line| line.get(col as usize))
            .and_then(Option::as_ref)
    }

    pub fn position_of(&self, cell: NodeKey) -> Option<&MapCell> {
        self.positions.get(&cell)
    }

    /// Column of the first grid position owned by `cell`, scanning row-major.
    pub fn column_index_of(&self, cell: NodeKey) -> Option<u32> {
        for line in &self.grid {
            for (col, slot) in line.iter().enumerate() {
                if slot.is_some_and(|m| m.cell == cell) {
                    return Some(index_u32(col));
                }
            }
        }
        None
    }

    /// Positions within the table bounds not covered by any cell.
    pub fn gaps(&self) -> Vec<(u32, u32)> {
        let mut gaps = Vec::new();
        for (r, line) in self.grid.iter().enumerate() {
            for (c, slot) in line.iter().enumerate() {
                if slot.is_none() {
                    gaps.push((index_u32(r), index_u32(c)));
                }
            }
        }
        gaps
    }

    /// Positions covered by more than one cell.
    pub fn overlaps(&self) -> &[(u32, u32)] {
        &self.overlaps
    }

    /// Every position covered by exactly one cell.
    pub fn is_fully_covered(&self) -> bool {
        self.overlaps.is_empty() && self.gaps().is_empty()
    }

    /// Grow `shape` until every cell it touches lies entirely inside it.
    pub fn expand_shape(&self, shape: SelectionShape) -> SelectionShape {
        let max_x = self.width.saturating_sub(1);
        let max_y = self.height().saturating_sub(1);
        let mut current = SelectionShape::new(
            shape.from_x.min(max_x),
            shape.from_y.min(max_y),
            shape.to_x.min(max_x),
            shape.to_y.min(max_y),
        );
        loop {
            let mut grown = current;
            for y in current.from_y..=current.to_y {
                for x in current.from_x..=current.to_x {
                    if let Some(m) = self.get(y, x) {
                        grown = grown.union_block(m.start_col, m.start_row, m.col_span, m.row_span);
                    }
                }
            }
            grown.to_x = grown.to_x.min(max_x);
            grown.to_y = grown.to_y.min(max_y);
            if grown == current {
                return current;
            }
            current = grown;
        }
    }

    /// Distinct cells inside `shape`, in row-major order of their first position.
    pub fn cells_in(&self, shape: SelectionShape) -> Vec<NodeKey> {
        let mut cells = Vec::new();
        for y in shape.from_y..=shape.to_y {
            for x in shape.from_x..=shape.to_x {
                if let Some(m) = self.get(y, x) {
                    if !cells.contains(&m.cell) {
                        cells.push(m.cell);
                    }
                }
            }
        }
        cells
    }

    /// Cells of grid row `row` whose top-left position lies in that row,
    /// ordered by start column.
    pub fn cells_starting_in_row(&self, row: u32) -> Vec<MapCell> {
        let mut cells: Vec<MapCell> = self
            .positions
            .values()
            .filter(|m| m.start_row == row)
            .copied()
            .collect();
        cells.sort_by_key(|m| m.start_col);
        cells
    }

    /// Index at which a new cell for grid column `col` belongs in row `row`'s
    /// child list: after every cell of that row starting left of `col`.
    pub fn insertion_index(&self, row: u32, col: u32) -> usize {
        self.cells_starting_in_row(row)
            .iter()
            .filter(|m| m.start_col < col)
            .count()
    }

    /// Selection shape spanned by two cells (including their spans).
    pub fn shape_between(&self, anchor: NodeKey, focus: NodeKey) -> Option<SelectionShape> {
        let a = self.position_of(anchor)?;
        let f = self.position_of(focus)?;
        Some(
            SelectionShape::new(a.start_col, a.start_row, a.end_col(), a.end_row()).union_block(
                f.start_col,
                f.start_row,
                f.col_span,
                f.row_span,
            ),
        )
    }
}

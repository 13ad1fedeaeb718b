//! Row, column and table structure edits.

use std::collections::{HashMap, HashSet};

use super::{skipped, Outcome, SkipReason, TableEngine};
use crate::document::{Tree, UpdateTag};
use crate::error::{Result, TableError};
use crate::layout::TableMap;
use crate::types::{CellNode, NodeKey, Selection, SelectionShape, SerializedTable};

impl TableEngine {
    /// Insert a `rows × cols` table of empty cells after the table holding
    /// the selection (or at the end of the document) and put the caret in its
    /// first cell.
    pub fn insert_table(&mut self, rows: u32, cols: u32) -> Result<Outcome> {
        if rows == 0 || cols == 0 {
            return Ok(skipped("insert table", SkipReason::InvalidSize));
        }
        let index = self.selection_shape().and_then(|(table, _)| {
            self.tree()
                .tables()
                .iter()
                .position(|t| *t == table)
                .map(|i| i + 1)
        });
        let blank = SerializedTable::grid(rows as usize, cols as usize, |_, _| String::new());
        let Some(first) = self.update(&[UpdateTag::Structural], |tree, _| {
            let table = tree.import_table(&blank, index)?;
            first_cell(tree, table)
        })?
        else {
            return Ok(skipped("insert table", SkipReason::Detached));
        };
        log::debug!("inserted {rows}x{cols} table");
        self.selection = first.map(Selection::cursor);
        Ok(Outcome::Applied)
    }

    /// Insert one row above (or below) the selected rows.
    ///
    /// Cells spanning across the insertion point grow by one row instead of
    /// receiving a new cell.
    pub fn insert_row(&mut self, after: bool) -> Result<Outcome> {
        let (table, shape) = match self.reference() {
            Ok(r) => r,
            Err(reason) => return Ok(skipped("insert row", reason)),
        };
        let applied = self.update(&[UpdateTag::Structural], |tree, _| {
            insert_row_at(tree, table, shape, after)
        })?;
        Ok(applied.map_or(Outcome::Skipped(SkipReason::Detached), |()| Outcome::Applied))
    }

    /// Insert `count` columns left (or right) of the selected columns.
    pub fn insert_column(&mut self, after: bool, count: u32) -> Result<Outcome> {
        if count == 0 {
            return Ok(skipped("insert column", SkipReason::InvalidSize));
        }
        if let Err(reason) = self.reference() {
            return Ok(skipped("insert column", reason));
        }
        let Some(selection) = self.selection else {
            return Ok(skipped("insert column", SkipReason::NoSelection));
        };
        let applied = self.update(&[UpdateTag::Structural], |tree, config| {
            for _ in 0..count {
                // The selected cells shift right when inserting to their left
                let table = tree.table_of(selection.anchor_cell())?;
                let map = TableMap::compute(tree, table)?;
                let shape = map
                    .shape_between(selection.anchor_cell(), selection.focus_cell())
                    .map(|s| map.expand_shape(s))
                    .ok_or(TableError::Detached(selection.focus_cell()))?;
                insert_column_at(tree, table, &map, shape, after, config.min_column_width)?;
            }
            Ok(())
        })?;
        Ok(applied.map_or(Outcome::Skipped(SkipReason::Detached), |()| Outcome::Applied))
    }

    /// Delete the selected rows. Refuses to delete every row of a table.
    pub fn delete_row(&mut self) -> Result<Outcome> {
        let (table, shape) = match self.reference() {
            Ok(r) => r,
            Err(reason) => return Ok(skipped("delete row", reason)),
        };
        let height = TableMap::compute_lenient(self.tree(), table)?.height();
        if shape.rows() >= height {
            return Ok(skipped("delete row", SkipReason::LastRow));
        }
        let Some(next) = self.update(&[UpdateTag::Structural], |tree, _| {
            delete_rows(tree, table, shape)?;
            let map = TableMap::compute(tree, table)?;
            let row = shape.from_y.min(map.height().saturating_sub(1));
            Ok(map.get(row, shape.from_x.min(map.width().saturating_sub(1))).map(|m| m.cell))
        })?
        else {
            return Ok(skipped("delete row", SkipReason::Detached));
        };
        self.selection = next.map(Selection::cursor);
        Ok(Outcome::Applied)
    }

    /// Delete the selected columns. Refuses to delete every column of a table.
    pub fn delete_column(&mut self) -> Result<Outcome> {
        let (table, shape) = match self.reference() {
            Ok(r) => r,
            Err(reason) => return Ok(skipped("delete column", reason)),
        };
        let width = TableMap::compute_lenient(self.tree(), table)?.width();
        if shape.columns() >= width {
            return Ok(skipped("delete column", SkipReason::LastColumn));
        }
        let Some(next) = self.update(&[UpdateTag::Structural], |tree, _| {
            delete_columns(tree, table, shape)?;
            let map = TableMap::compute(tree, table)?;
            let col = shape.from_x.min(map.width().saturating_sub(1));
            Ok(map.get(shape.from_y.min(map.height().saturating_sub(1)), col).map(|m| m.cell))
        })?
        else {
            return Ok(skipped("delete column", SkipReason::Detached));
        };
        self.selection = next.map(Selection::cursor);
        Ok(Outcome::Applied)
    }

    /// Remove the table holding the selection and clear the selection.
    pub fn delete_table(&mut self) -> Result<Outcome> {
        let (table, _) = match self.reference() {
            Ok(r) => r,
            Err(reason) => return Ok(skipped("delete table", reason)),
        };
        let applied = self.update(&[UpdateTag::Structural], |tree, _| tree.remove_table(table))?;
        if applied.is_none() {
            return Ok(skipped("delete table", SkipReason::Detached));
        }
        self.selection = None;
        Ok(Outcome::Applied)
    }
}

fn first_cell(tree: &Tree, table: NodeKey) -> Result<Option<NodeKey>> {
    let Some(row) = tree.table(table)?.rows.first() else {
        return Ok(None);
    };
    Ok(tree.row(*row)?.cells.first().copied())
}

fn row_key(tree: &Tree, table: NodeKey, index: u32) -> Result<NodeKey> {
    tree.table(table)?
        .rows
        .get(index as usize)
        .copied()
        .ok_or_else(|| TableError::invariant(format!("table {table} has no row {index}")))
}

fn insert_row_at(tree: &mut Tree, table: NodeKey, shape: SelectionShape, after: bool) -> Result<()> {
    let map = TableMap::compute(tree, table)?;
    let target = if after { shape.to_y } else { shape.from_y };
    let index = if after { target + 1 } else { target };
    let new_row = tree.create_row(table, index as usize)?;

    let mut col = 0;
    while col < map.width() {
        let Some(m) = map.get(target, col).copied() else {
            tree.create_cell(new_row, usize::MAX, CellNode::placeholder(new_row))?;
            col += 1;
            continue;
        };
        let spans_across = if after {
            m.end_row() > target
        } else {
            m.start_row < target
        };
        if spans_across {
            tree.cell_mut(m.cell)?.row_span += 1;
        } else {
            for _ in 0..m.col_span {
                tree.create_cell(new_row, usize::MAX, CellNode::placeholder(new_row))?;
            }
        }
        col = m.end_col() + 1;
    }
    Ok(())
}

fn insert_column_at(
    tree: &mut Tree,
    table: NodeKey,
    map: &TableMap,
    shape: SelectionShape,
    after: bool,
    width: u32,
) -> Result<()> {
    let target = if after { shape.to_x } else { shape.from_x };
    let new_col = if after { target + 1 } else { target };

    for row in 0..map.height() {
        if let Some(m) = map.get(row, target).copied() {
            let spans_across = if after {
                m.end_col() > target
            } else {
                m.start_col < target
            };
            if spans_across {
                if m.start_row == row {
                    tree.cell_mut(m.cell)?.col_span += 1;
                }
                continue;
            }
        }
        let row_node = row_key(tree, table, row)?;
        let index = map.insertion_index(row, new_col);
        tree.create_cell(row_node, index, CellNode::placeholder(row_node))?;
    }

    if let Some(widths) = tree.table_mut(table)?.col_widths.as_mut() {
        let at = (new_col as usize).min(widths.len());
        widths.insert(at, width);
    }
    Ok(())
}

fn delete_rows(tree: &mut Tree, table: NodeKey, shape: SelectionShape) -> Result<()> {
    let map = TableMap::compute(tree, table)?;
    let (first, last) = (shape.from_y, shape.to_y);
    let survivor_row = last + 1;
    let mut seen = HashSet::new();
    let mut moved = Vec::new();

    for row in first..=last {
        for col in 0..map.width() {
            let Some(m) = map.get(row, col).copied() else {
                continue;
            };
            if !seen.insert(m.cell) {
                continue;
            }
            let overlap = m.end_row().min(last) - m.start_row.max(first) + 1;
            if m.start_row < first {
                tree.cell_mut(m.cell)?.row_span -= overlap;
            } else if m.end_row() > last {
                // Starts in a deleted row but reaches below: keep it in the first surviving row
                tree.cell_mut(m.cell)?.row_span -= overlap;
                moved.push(m);
            }
        }
    }

    if !moved.is_empty() {
        let target = row_key(tree, table, survivor_row)?;
        let mut start_cols: HashMap<NodeKey, u32> = map
            .cells_starting_in_row(survivor_row)
            .iter()
            .map(|m| (m.cell, m.start_col))
            .collect();
        for m in &moved {
            tree.move_cell(m.cell, target, usize::MAX)?;
            start_cols.insert(m.cell, m.start_col);
        }
        tree.row_mut(target)?
            .cells
            .sort_by_key(|c| start_cols.get(c).copied().unwrap_or(u32::MAX));
    }

    for row in (first..=last).rev() {
        let key = row_key(tree, table, row)?;
        tree.remove_row(key)?;
    }
    Ok(())
}

fn delete_columns(tree: &mut Tree, table: NodeKey, shape: SelectionShape) -> Result<()> {
    let map = TableMap::compute(tree, table)?;
    let (first, last) = (shape.from_x, shape.to_x);
    let mut seen = HashSet::new();

    for row in 0..map.height() {
        for col in first..=last {
            let Some(m) = map.get(row, col).copied() else {
                continue;
            };
            if !seen.insert(m.cell) {
                continue;
            }
            let overlap = m.end_col().min(last) - m.start_col.max(first) + 1;
            if overlap >= m.col_span {
                tree.remove_cell(m.cell)?;
            } else {
                tree.cell_mut(m.cell)?.col_span -= overlap;
            }
        }
    }

    if let Some(widths) = tree.table_mut(table)?.col_widths.as_mut() {
        let end = (last as usize + 1).min(widths.len());
        let start = (first as usize).min(end);
        widths.drain(start..end);
    }
    Ok(())
}

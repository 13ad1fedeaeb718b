//! Merging rectangular selections into one cell and splitting them back.

use super::{skipped, Outcome, SkipReason, TableEngine};
use crate::cell_ref::format_shape;
use crate::document::{Tree, UpdateTag};
use crate::error::{Result, TableError};
use crate::layout::TableMap;
use crate::types::{Block, CellNode, NodeKey, Selection, SelectionShape};

/// A shape can be merged when it covers more than one grid position.
pub fn can_merge(shape: &SelectionShape) -> bool {
    shape.columns() > 1 || shape.rows() > 1
}

impl TableEngine {
    /// Whether the current selection is a cell range that can be merged.
    pub fn can_merge(&self) -> bool {
        self.selection.is_some_and(|s| !s.is_collapsed())
            && self
                .selection_shape()
                .is_some_and(|(_, shape)| can_merge(&shape))
    }

    /// Whether the current selection can be unmerged: a caret (or single
    /// selected cell) inside a cell spanning more than one position.
    pub fn can_unmerge(&self) -> bool {
        let Some(selection) = self.selection else {
            return false;
        };
        selection.is_collapsed()
            && self.tree().is_attached(selection.anchor_cell())
            && self
                .tree()
                .cell(selection.anchor_cell())
                .is_ok_and(CellNode::is_merged)
    }

    /// Merge the current selection.
    pub fn merge_cells(&mut self) -> Result<Outcome> {
        match self.reference() {
            Ok((table, shape)) => self.merge_selection(table, shape),
            Err(reason) => Ok(skipped("merge", reason)),
        }
    }

    /// Merge every cell inside `shape` (grown to whole cells) into its
    /// top-left cell and put the caret at the end of the merged content.
    pub fn merge_selection(&mut self, table: NodeKey, shape: SelectionShape) -> Result<Outcome> {
        if !can_merge(&shape) {
            return Ok(skipped("merge", SkipReason::NothingToMerge));
        }
        let Some(result) = self.update(&[UpdateTag::Structural], |tree, _| {
            merge_in(tree, table, shape)
        })?
        else {
            return Ok(skipped("merge", SkipReason::Detached));
        };
        let Some(caret) = result else {
            return Ok(skipped("merge", SkipReason::NothingToMerge));
        };
        self.selection = Some(caret);
        Ok(Outcome::Applied)
    }

    /// Split the merged cell under the caret back into unit cells.
    pub fn unmerge_selection(&mut self) -> Result<Outcome> {
        let Some(selection) = self.selection else {
            return Ok(skipped("unmerge", SkipReason::NoSelection));
        };
        if !selection.is_collapsed() {
            return Ok(skipped("unmerge", SkipReason::MultiCellSelection));
        }
        let cell = selection.anchor_cell();
        let Some(split) = self.update(&[UpdateTag::Structural], |tree, _| unmerge_in(tree, cell))?
        else {
            return Ok(skipped("unmerge", SkipReason::Detached));
        };
        if !split {
            return Ok(skipped("unmerge", SkipReason::NotMerged));
        }
        Ok(Outcome::Applied)
    }
}

/// Returns the caret to place after merging, or `None` when the expanded
/// shape still covers a single cell.
fn merge_in(tree: &mut Tree, table: NodeKey, shape: SelectionShape) -> Result<Option<Selection>> {
    let map = TableMap::compute(tree, table)?;
    let shape = map.expand_shape(shape);
    let cells = map.cells_in(shape);
    let Some((&survivor, rest)) = cells.split_first() else {
        return Ok(None);
    };
    if rest.is_empty() {
        return Ok(None);
    }

    {
        let target = tree.cell_mut(survivor)?;
        target.col_span = shape.columns();
        target.row_span = shape.rows();
        if target.contains_empty_paragraph() {
            target.blocks.clear();
        }
    }
    for cell in rest {
        let removed = tree.remove_cell(*cell)?;
        if !removed.contains_empty_paragraph() {
            tree.cell_mut(survivor)?.blocks.extend(removed.blocks);
        }
    }

    let target = tree.cell_mut(survivor)?;
    if target.blocks.is_empty() {
        target.blocks.push(Block::empty());
    }
    let block = target.blocks.len() - 1;
    let offset = target.blocks.last().map_or(0, Block::char_len);
    log::debug!(
        "merged {} cells into {survivor} ({})",
        cells.len(),
        format_shape(&shape)
    );
    Ok(Some(Selection::Cursor {
        cell: survivor,
        block,
        offset,
    }))
}

/// Returns `false` when the cell is not merged.
fn unmerge_in(tree: &mut Tree, cell: NodeKey) -> Result<bool> {
    tree.ensure_attached(cell)?;
    let table = tree.table_of(cell)?;
    let map = TableMap::compute(tree, table)?;
    let m = *map
        .position_of(cell)
        .ok_or(TableError::Detached(cell))?;
    let (header, own_row) = {
        let data = tree.cell(cell)?;
        if !data.is_merged() {
            return Ok(false);
        }
        (data.header, data.parent)
    };
    let rows = tree.table(table)?.rows.clone();

    for r in m.start_row..=m.end_row() {
        let row = rows.get(r as usize).copied().ok_or_else(|| {
            TableError::invariant(format!("cell {cell} spans past the last row of {table}"))
        })?;
        let (first_col, mut index) = if r == m.start_row {
            let own = tree
                .row(own_row)?
                .cells
                .iter()
                .position(|c| *c == cell)
                .unwrap_or(0);
            (m.start_col + 1, own + 1)
        } else {
            (m.start_col, map.insertion_index(r, m.start_col))
        };
        for _ in first_col..=m.end_col() {
            let mut fresh = CellNode::placeholder(row);
            fresh.header = header;
            tree.create_cell(row, index, fresh)?;
            index += 1;
        }
    }

    let data = tree.cell_mut(cell)?;
    data.col_span = 1;
    data.row_span = 1;
    log::debug!("unmerged {cell} ({}x{})", m.col_span, m.row_span);
    Ok(true)
}

//! Committing column widths and row heights after a resize drag.

use super::{skipped, Outcome, SkipReason, TableEngine};
use crate::document::UpdateTag;
use crate::error::{Result, TableError};
use crate::layout::TableMap;
use crate::surface::RenderSurface;
use crate::types::NodeKey;

const RESIZE_TAGS: &[UpdateTag] = &[UpdateTag::Resize, UpdateTag::SkipScrollIntoView];

/// `old + delta`, rounded to whole pixels and never below `min`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn clamp_size(old: f32, delta: f32, min: u32) -> u32 {
    let size = (old + delta).round();
    if size.is_nan() || size <= min as f32 {
        return min;
    }
    if size >= u32::MAX as f32 {
        return u32::MAX;
    }
    size as u32
}

impl TableEngine {
    /// Change the width of the grid column where `cell` first appears.
    pub fn resize_column(&mut self, cell: NodeKey, delta: f32) -> Result<Outcome> {
        if !self.tree().is_attached(cell) {
            return Ok(skipped("resize column", SkipReason::Detached));
        }
        let table = self.tree().table_of(cell)?;
        let col = TableMap::compute_lenient(self.tree(), table)?
            .column_index_of(cell)
            .ok_or_else(|| {
                TableError::invariant(format!("cell {cell} is not in the map of {table}"))
            })?;
        self.resize_column_at(table, col, delta)
    }

    /// Change the width of grid column `col` of `table`.
    pub fn resize_column_at(&mut self, table: NodeKey, col: u32, delta: f32) -> Result<Outcome> {
        if !self.tree().is_attached(table) {
            return Ok(skipped("resize column", SkipReason::Detached));
        }
        let applied = self.update(RESIZE_TAGS, |tree, config| {
            let Some(width) = tree
                .table_mut(table)?
                .col_widths
                .as_mut()
                .and_then(|w| w.get_mut(col as usize))
            else {
                return Ok(false);
            };
            let new_width = clamp_size(*width as f32, delta, config.min_column_width);
            log::debug!("column {col} of {table}: {} -> {new_width}", *width);
            *width = new_width;
            Ok(true)
        })?;
        match applied {
            Some(true) => Ok(Outcome::Applied),
            Some(false) => Ok(skipped("resize column", SkipReason::NoColumnWidth)),
            None => Ok(skipped("resize column", SkipReason::Detached)),
        }
    }

    /// Change the height of the last row `cell` spans.
    ///
    /// A row that was never resized starts from the smallest rendered height
    /// among its cells.
    pub fn resize_row(
        &mut self,
        cell: NodeKey,
        delta: f32,
        surface: &dyn RenderSurface,
    ) -> Result<Outcome> {
        if !self.tree().is_attached(cell) {
            return Ok(skipped("resize row", SkipReason::Detached));
        }
        let applied = self.update(RESIZE_TAGS, |tree, config| {
            let table = tree.table_of(cell)?;
            let index = TableMap::compute_lenient(tree, table)?
                .position_of(cell)
                .ok_or(TableError::Detached(cell))?
                .end_row();
            let row = tree.table(table)?.rows.get(index as usize).copied().ok_or_else(|| {
                TableError::invariant(format!("cell {cell} spans past the last row of {table}"))
            })?;

            let node = tree.row(row)?;
            let old = match node.height {
                Some(h) => h as f32,
                None => node
                    .cells
                    .iter()
                    .filter_map(|c| surface.cell_height(*c))
                    .reduce(f32::min)
                    .unwrap_or(config.min_row_height as f32),
            };
            let new_height = clamp_size(old, delta, config.min_row_height);
            log::debug!("row {index} of {table}: {old} -> {new_height}");
            tree.row_mut(row)?.height = Some(new_height);
            Ok(())
        })?;
        match applied {
            Some(()) => Ok(Outcome::Applied),
            None => Ok(skipped("resize row", SkipReason::Detached)),
        }
    }
}

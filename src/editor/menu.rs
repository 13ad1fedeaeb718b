//! Context-menu actions for the cell under the selection.

use serde::{Deserialize, Serialize};

use super::{skipped, Outcome, SkipReason, TableEngine};
use crate::error::Result;
use crate::surface::RenderSurface;
use crate::types::{NodeKey, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TableAction {
    MergeCells,
    UnmergeCells,
    InsertRowAbove,
    InsertRowBelow,
    InsertColumnLeft,
    InsertColumnRight,
    DeleteRow,
    DeleteColumn,
    DeleteTable,
}

impl TableAction {
    /// Actions offered whenever the selection is inside a table.
    const ALWAYS: [TableAction; 7] = [
        TableAction::InsertRowAbove,
        TableAction::InsertRowBelow,
        TableAction::InsertColumnLeft,
        TableAction::InsertColumnRight,
        TableAction::DeleteRow,
        TableAction::DeleteColumn,
        TableAction::DeleteTable,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TableAction::MergeCells => "Merge Cells",
            TableAction::UnmergeCells => "Unmerge Cells",
            TableAction::InsertRowAbove => "Insert Row Above",
            TableAction::InsertRowBelow => "Insert Row Below",
            TableAction::InsertColumnLeft => "Insert Column Left",
            TableAction::InsertColumnRight => "Insert Column Right",
            TableAction::DeleteRow => "Delete Row",
            TableAction::DeleteColumn => "Delete Column",
            TableAction::DeleteTable => "Delete Table",
        }
    }
}

/// Where to attach the action menu: the selection's anchor cell and its
/// bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuAnchor {
    pub cell: NodeKey,
    pub rect: Rect,
}

impl TableEngine {
    /// Menu entries for the current selection, in display order.
    pub fn available_actions(&self) -> Vec<TableAction> {
        if self.selection_shape().is_none() {
            return Vec::new();
        }
        let mut actions = Vec::with_capacity(8);
        if self.can_merge() {
            actions.push(TableAction::MergeCells);
        } else if self.can_unmerge() {
            actions.push(TableAction::UnmergeCells);
        }
        actions.extend(TableAction::ALWAYS);
        actions
    }

    /// Run `action` against the current selection.
    pub fn dispatch(&mut self, action: TableAction) -> Result<Outcome> {
        log::debug!("dispatch {}", action.label());
        match action {
            TableAction::MergeCells => self.merge_cells(),
            TableAction::UnmergeCells => self.unmerge_selection(),
            TableAction::InsertRowAbove => self.insert_row(false),
            TableAction::InsertRowBelow => self.insert_row(true),
            TableAction::InsertColumnLeft | TableAction::InsertColumnRight => {
                let Some((_, shape)) = self.selection_shape() else {
                    return Ok(skipped("insert column", SkipReason::NoSelection));
                };
                self.insert_column(
                    action == TableAction::InsertColumnRight,
                    shape.columns(),
                )
            }
            TableAction::DeleteRow => self.delete_row(),
            TableAction::DeleteColumn => self.delete_column(),
            TableAction::DeleteTable => self.delete_table(),
        }
    }

    /// Anchor for the action menu, re-derived from the surface on every call.
    pub fn menu_anchor(&self, surface: &dyn RenderSurface) -> Option<MenuAnchor> {
        let cell = self.selection?.anchor_cell();
        if !self.tree().is_attached(cell) {
            return None;
        }
        let rect = surface.cell_rect(cell)?;
        Some(MenuAnchor { cell, rect })
    }
}

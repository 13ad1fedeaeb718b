use serde::{Deserialize, Serialize};

use super::NodeKey;

/// Rectangular region of grid coordinates (inclusive on both ends).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionShape {
    pub from_x: u32,
    pub from_y: u32,
    pub to_x: u32,
    pub to_y: u32,
}

impl SelectionShape {
    /// Build a shape from two corners in any order.
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self {
            from_x: x1.min(x2),
            from_y: y1.min(y2),
            to_x: x1.max(x2),
            to_y: y1.max(y2),
        }
    }

    /// Shape covering exactly one grid position
    pub fn single(x: u32, y: u32) -> Self {
        Self::new(x, y, x, y)
    }

    pub fn columns(&self) -> u32 {
        self.to_x - self.from_x + 1
    }

    pub fn rows(&self) -> u32 {
        self.to_y - self.from_y + 1
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.from_x && x <= self.to_x && y >= self.from_y && y <= self.to_y
    }

    /// Smallest shape containing both `self` and the given block.
    pub fn union_block(&self, x: u32, y: u32, cols: u32, rows: u32) -> Self {
        Self {
            from_x: self.from_x.min(x),
            from_y: self.from_y.min(y),
            to_x: self.to_x.max(x.saturating_add(cols.max(1) - 1)),
            to_y: self.to_y.max(y.saturating_add(rows.max(1) - 1)),
        }
    }
}

/// The host's current selection, as far as tables are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Selection {
    /// Collapsed caret inside one cell.
    Cursor {
        cell: NodeKey,
        /// Index of the block holding the caret
        block: usize,
        /// Character offset within that block
        offset: usize,
    },
    /// Rectangular multi-cell selection between two cells of the same table.
    CellRange { anchor: NodeKey, focus: NodeKey },
}

impl Selection {
    /// Caret at the start of a cell
    pub fn cursor(cell: NodeKey) -> Self {
        Selection::Cursor {
            cell,
            block: 0,
            offset: 0,
        }
    }

    pub fn range(anchor: NodeKey, focus: NodeKey) -> Self {
        Selection::CellRange { anchor, focus }
    }

    pub fn anchor_cell(&self) -> NodeKey {
        match *self {
            Selection::Cursor { cell, .. } => cell,
            Selection::CellRange { anchor, .. } => anchor,
        }
    }

    pub fn focus_cell(&self) -> NodeKey {
        match *self {
            Selection::Cursor { cell, .. } => cell,
            Selection::CellRange { focus, .. } => focus,
        }
    }

    /// True for a caret, or a range whose anchor and focus are the same cell.
    pub fn is_collapsed(&self) -> bool {
        match *self {
            Selection::Cursor { .. } => true,
            Selection::CellRange { anchor, focus } => anchor == focus,
        }
    }
}

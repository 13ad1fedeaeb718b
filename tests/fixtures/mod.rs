//! Test fixtures for building tables in memory.
//!
//! # Example
//!
//! ```rust,ignore
//! use fixtures::TableBuilder;
//!
//! let table = TableBuilder::new()
//!     .widths(&[120, 92])
//!     .row(&["Name", "Qty"])
//!     .row_cells(vec![cell("wide").with_span(2, 1)])
//!     .build();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use tablegrid::{Block, SerializedCell, SerializedRow, SerializedTable};

// ============================================================================
// Table Builder
// ============================================================================

/// Builder for `SerializedTable` values.
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    table: SerializedTable,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit column widths
    pub fn widths(mut self, widths: &[u32]) -> Self {
        self.table.col_widths = Some(widths.to_vec());
        self
    }

    /// Append a row of unit cells with the given texts.
    pub fn row(self, texts: &[&str]) -> Self {
        self.row_cells(texts.iter().map(|t| cell(t)).collect())
    }

    /// Append a row of arbitrary cells.
    pub fn row_cells(mut self, cells: Vec<SerializedCell>) -> Self {
        self.table.rows.push(SerializedRow {
            height: None,
            cells,
        });
        self
    }

    /// Set the height of the most recently added row.
    pub fn height(mut self, height: u32) -> Self {
        if let Some(row) = self.table.rows.last_mut() {
            row.height = Some(height);
        }
        self
    }

    pub fn build(self) -> SerializedTable {
        self.table
    }
}

// ============================================================================
// Shorthands
// ============================================================================

/// Unit cell holding one paragraph.
pub fn cell(text: &str) -> SerializedCell {
    SerializedCell::text(text)
}

/// Unit cell holding one empty paragraph.
pub fn empty_cell() -> SerializedCell {
    SerializedCell::text("")
}

/// Cell holding several paragraphs.
pub fn multi_block_cell(texts: &[&str]) -> SerializedCell {
    SerializedCell {
        blocks: texts.iter().map(|t| Block::paragraph(*t)).collect(),
        ..SerializedCell::text("")
    }
}

/// `rows × cols` grid where each cell reads `r{row}c{col}`.
pub fn labelled_grid(rows: usize, cols: usize) -> SerializedTable {
    SerializedTable::grid(rows, cols, |r, c| format!("r{r}c{c}"))
}

//! Pre-computed pixel layout for one table.
//!
//! Positions are computed once from column widths and row heights, enabling
//! O(log n) hit testing. Coordinates are in unzoomed table pixels relative to
//! the table's top-left corner.

use super::TableMap;
use crate::config::TableConfig;
use crate::document::Tree;
use crate::error::Result;
use crate::types::{NodeKey, Point, Rect};

#[derive(Debug, Clone)]
pub struct TableLayout {
    pub table: NodeKey,
    /// Cumulative column positions (`col_positions[i]` = x of column i's left edge)
    pub col_positions: Vec<f32>,
    /// Cumulative row positions (`row_positions[i]` = y of row i's top edge)
    pub row_positions: Vec<f32>,
    pub col_widths: Vec<f32>,
    pub row_heights: Vec<f32>,
    pub map: TableMap,
}

impl TableLayout {
    /// Lay out `table`. Missing column widths fall back to the default column
    /// width; rows without an explicit height render at the minimum height.
    pub fn compute(tree: &Tree, table: NodeKey, config: &TableConfig) -> Result<Self> {
        let map = TableMap::compute_lenient(tree, table)?;
        let node = tree.table(table)?;
        let explicit = node.col_widths.as_deref().unwrap_or(&[]);

        let mut col_positions = Vec::with_capacity(map.width() as usize + 1);
        let mut col_widths = Vec::with_capacity(map.width() as usize);
        let mut x: f32 = 0.0;
        for col in 0..map.width() as usize {
            col_positions.push(x);
            let w = explicit
                .get(col)
                .copied()
                .unwrap_or(config.default_column_width) as f32;
            col_widths.push(w);
            x += w;
        }
        col_positions.push(x); // Final edge

        let mut row_positions = Vec::with_capacity(node.rows.len() + 1);
        let mut row_heights = Vec::with_capacity(node.rows.len());
        let mut y: f32 = 0.0;
        for row_key in &node.rows {
            row_positions.push(y);
            let h = tree
                .row(*row_key)?
                .height
                .unwrap_or(config.min_row_height) as f32;
            row_heights.push(h);
            y += h;
        }
        row_positions.push(y); // Final edge

        Ok(Self {
            table,
            col_positions,
            row_positions,
            col_widths,
            row_heights,
            map,
        })
    }

    pub fn total_width(&self) -> f32 {
        self.col_positions.last().copied().unwrap_or(0.0)
    }

    pub fn total_height(&self) -> f32 {
        self.row_positions.last().copied().unwrap_or(0.0)
    }

    /// Bounds of `cell` including its spans.
    pub fn cell_rect(&self, cell: NodeKey) -> Option<Rect> {
        let m = self.map.position_of(cell)?;
        let x = self.col_positions.get(m.start_col as usize).copied()?;
        let y = self.row_positions.get(m.start_row as usize).copied()?;
        let last_col = self.col_positions.len().saturating_sub(1);
        let last_row = self.row_positions.len().saturating_sub(1);
        let end_col = (m.end_col() as usize).saturating_add(1).min(last_col);
        let end_row = (m.end_row() as usize).saturating_add(1).min(last_row);
        let right = self.col_positions.get(end_col).copied().unwrap_or(x);
        let bottom = self.row_positions.get(end_row).copied().unwrap_or(y);
        Some(Rect::new(x, y, right - x, bottom - y))
    }

    /// Find row at y position (binary search)
    pub fn row_at_y(&self, y: f32) -> Option<u32> {
        if y < 0.0 || y >= self.total_height() {
            return None;
        }
        position_index(&self.row_positions, y)
    }

    /// Find column at x position (binary search)
    pub fn col_at_x(&self, x: f32) -> Option<u32> {
        if x < 0.0 || x >= self.total_width() {
            return None;
        }
        position_index(&self.col_positions, x)
    }

    /// Cell owning the grid position under a table-local point.
    pub fn cell_at(&self, p: Point) -> Option<NodeKey> {
        let row = self.row_at_y(p.y)?;
        let col = self.col_at_x(p.x)?;
        self.map.get(row, col).map(|m| m.cell)
    }
}

fn position_index(positions: &[f32], v: f32) -> Option<u32> {
    if positions.is_empty() {
        return None;
    }
    match positions.binary_search_by(|pos| pos.partial_cmp(&v).unwrap_or(std::cmp::Ordering::Equal)) {
        Ok(i) => u32::try_from(i).ok(),
        Err(i) => u32::try_from(i.saturating_sub(1)).ok(),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::types::{SerializedCell, SerializedTable};

    fn layout_of(table: &SerializedTable) -> (Tree, TableLayout) {
        let mut tree = Tree::new();
        let key = tree.import_table(table, None).unwrap();
        let layout = TableLayout::compute(&tree, key, &TableConfig::default()).unwrap();
        (tree, layout)
    }

    #[test]
    fn test_basic_layout() {
        let (_, layout) = layout_of(&SerializedTable::grid(3, 2, |_, _| String::new()));
        assert_eq!(layout.total_width(), 92.0 * 2.0);
        assert_eq!(layout.total_height(), 33.0 * 3.0);
    }

    #[test]
    fn test_explicit_sizes() {
        let mut table = SerializedTable::grid(2, 2, |_, _| String::new());
        table.col_widths = Some(vec![100, 150]);
        table.rows[1].height = Some(60);
        let (tree, layout) = layout_of(&table);

        let root = tree.tables()[0];
        let row1 = tree.table(root).unwrap().rows[1];
        let cell = tree.row(row1).unwrap().cells[1];
        let rect = layout.cell_rect(cell).unwrap();
        assert_eq!(rect, Rect::new(100.0, 33.0, 150.0, 60.0));
    }

    #[test]
    fn test_merged_cell_rect_spans() {
        let mut table = SerializedTable::grid(2, 2, |_, _| String::new());
        table.rows[0].cells = vec![SerializedCell::text("m").with_span(2, 2)];
        table.rows[1].cells.clear();
        let (tree, layout) = layout_of(&table);

        let root = tree.tables()[0];
        let row0 = tree.table(root).unwrap().rows[0];
        let merged = tree.row(row0).unwrap().cells[0];
        let rect = layout.cell_rect(merged).unwrap();
        assert_eq!(rect.width, 184.0);
        assert_eq!(rect.height, 66.0);
        assert_eq!(layout.cell_at(Point::new(150.0, 50.0)), Some(merged));
    }

    #[test]
    fn test_hit_testing_bounds() {
        let (_, layout) = layout_of(&SerializedTable::grid(2, 2, |_, _| String::new()));
        assert_eq!(layout.col_at_x(0.0), Some(0));
        assert_eq!(layout.col_at_x(92.0), Some(1));
        assert_eq!(layout.col_at_x(184.0), None);
        assert_eq!(layout.row_at_y(-1.0), None);
        assert_eq!(layout.row_at_y(40.0), Some(1));
    }
}

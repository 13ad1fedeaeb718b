use super::TableLayout;
use crate::config::TableConfig;
use crate::document::Tree;
use crate::error::Result;
use crate::surface::RenderSurface;
use crate::types::{NodeKey, Point, Rect};

/// Rendering surface computed from the document itself.
///
/// Tables are stacked top to bottom starting at `origin`, separated by
/// `table_gap`, and scaled by `zoom`. Recompute after every committed update.
#[derive(Debug, Clone)]
pub struct LayoutSurface {
    pub origin: Point,
    pub zoom: f32,
    pub scroll: Point,
    tables: Vec<(Point, TableLayout)>,
}

impl LayoutSurface {
    pub fn compute(tree: &Tree, config: &TableConfig, origin: Point, zoom: f32) -> Result<Self> {
        let mut tables = Vec::with_capacity(tree.tables().len());
        let mut y = 0.0;
        for table in tree.tables() {
            let layout = TableLayout::compute(tree, *table, config)?;
            let height = layout.total_height();
            tables.push((Point::new(0.0, y), layout));
            y += height + config.table_gap;
        }
        Ok(Self {
            origin,
            zoom,
            scroll: Point::default(),
            tables,
        })
    }

    pub fn layouts(&self) -> impl Iterator<Item = &TableLayout> {
        self.tables.iter().map(|(_, l)| l)
    }

    fn to_client(&self, offset: Point, r: Rect) -> Rect {
        Rect::new(
            self.origin.x + (offset.x + r.x) * self.zoom,
            self.origin.y + (offset.y + r.y) * self.zoom,
            r.width * self.zoom,
            r.height * self.zoom,
        )
    }

    fn locate(&self, cell: NodeKey) -> Option<(Point, &TableLayout, Rect)> {
        self.tables
            .iter()
            .find_map(|(offset, layout)| layout.cell_rect(cell).map(|r| (*offset, layout, r)))
    }
}

impl RenderSurface for LayoutSurface {
    fn cell_rect(&self, cell: NodeKey) -> Option<Rect> {
        self.locate(cell).map(|(offset, _, r)| self.to_client(offset, r))
    }

    fn table_rect(&self, table: NodeKey) -> Option<Rect> {
        let (offset, layout) = self.tables.iter().find(|(_, l)| l.table == table)?;
        Some(self.to_client(
            *offset,
            Rect::new(0.0, 0.0, layout.total_width(), layout.total_height()),
        ))
    }

    fn cell_at(&self, point: Point) -> Option<NodeKey> {
        if self.zoom.is_nan() || self.zoom <= 0.0 {
            return None;
        }
        let local = Point::new(
            (point.x - self.origin.x) / self.zoom,
            (point.y - self.origin.y) / self.zoom,
        );
        self.tables.iter().find_map(|(offset, layout)| {
            layout.cell_at(Point::new(local.x - offset.x, local.y - offset.y))
        })
    }

    fn cell_height(&self, cell: NodeKey) -> Option<f32> {
        self.locate(cell).map(|(_, _, r)| r.height)
    }

    fn zoom(&self) -> f32 {
        self.zoom
    }

    fn scroll_offset(&self) -> Point {
        self.scroll
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::types::SerializedTable;

    #[test]
    fn test_zoom_and_origin_apply_to_rects() {
        let mut tree = Tree::new();
        let table = tree
            .import_table(&SerializedTable::grid(2, 2, |_, _| String::new()), None)
            .unwrap();
        let surface =
            LayoutSurface::compute(&tree, &TableConfig::default(), Point::new(10.0, 20.0), 2.0)
                .unwrap();

        let rect = surface.table_rect(table).unwrap();
        assert_eq!(rect, Rect::new(10.0, 20.0, 368.0, 132.0));

        let row1 = tree.table(table).unwrap().rows[1];
        let cell = tree.row(row1).unwrap().cells[1];
        assert_eq!(surface.cell_at(Point::new(10.0 + 100.0 * 2.0, 20.0 + 40.0 * 2.0)), Some(cell));
        // Rendered height is unzoomed
        assert_eq!(surface.cell_height(cell), Some(33.0));
    }

    #[test]
    fn test_tables_stack_with_gap() {
        let mut tree = Tree::new();
        tree.import_table(&SerializedTable::grid(1, 1, |_, _| String::new()), None)
            .unwrap();
        let second = tree
            .import_table(&SerializedTable::grid(1, 1, |_, _| String::new()), None)
            .unwrap();
        let surface =
            LayoutSurface::compute(&tree, &TableConfig::default(), Point::default(), 1.0).unwrap();
        assert_eq!(surface.table_rect(second).unwrap().y, 33.0 + 16.0);
    }
}

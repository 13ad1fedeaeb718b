//! Common test utilities and assertion helpers.
//!
//! `Harness` wraps an engine holding a single table and addresses cells by
//! grid position, so tests read in terms of rows and columns instead of node
//! keys.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::collections::HashMap;

use tablegrid::{
    LayoutSurface, NodeKey, Point, Rect, RenderSurface, Selection, SerializedTable, TableConfig,
    TableEngine, TableMap,
};

// ============================================================================
// Engine Harness
// ============================================================================

pub struct Harness {
    pub engine: TableEngine,
    pub table: NodeKey,
}

impl Harness {
    pub fn new(table: SerializedTable) -> Self {
        Self::with_config(table, TableConfig::default())
    }

    pub fn with_config(table: SerializedTable, config: TableConfig) -> Self {
        let mut engine = TableEngine::new(config);
        let table = engine.load_tables(&[table]).expect("table should load")[0];
        Self { engine, table }
    }

    pub fn map(&self) -> TableMap {
        TableMap::compute(self.engine.tree(), self.table).expect("table map should be consistent")
    }

    /// Cell covering grid position `(row, col)`.
    pub fn cell(&self, row: u32, col: u32) -> NodeKey {
        self.map()
            .get(row, col)
            .unwrap_or_else(|| panic!("no cell at ({row}, {col})"))
            .cell
    }

    pub fn caret(&mut self, row: u32, col: u32) {
        let cell = self.cell(row, col);
        self.engine.set_selection(Some(Selection::cursor(cell)));
    }

    pub fn select(&mut self, from: (u32, u32), to: (u32, u32)) {
        let anchor = self.cell(from.0, from.1);
        let focus = self.cell(to.0, to.1);
        self.engine.set_selection(Some(Selection::range(anchor, focus)));
    }

    pub fn export(&self) -> SerializedTable {
        self.engine
            .document()
            .export_table(self.table)
            .expect("table should export")
    }

    pub fn cell_count(&self) -> usize {
        self.export().rows.iter().map(|r| r.cells.len()).sum()
    }

    pub fn widths(&self) -> Vec<u32> {
        self.engine
            .column_widths(self.table)
            .expect("widths are initialized on load")
            .to_vec()
    }

    /// Text of every cell, row by row, blocks joined with `/`.
    pub fn texts(&self) -> Vec<Vec<String>> {
        self.export()
            .rows
            .iter()
            .map(|r| r.cells.iter().map(|c| c.joined_text("/")).collect())
            .collect()
    }

    pub fn surface(&self, zoom: f32) -> LayoutSurface {
        LayoutSurface::compute(
            self.engine.tree(),
            self.engine.config(),
            Point::default(),
            zoom,
        )
        .expect("layout should compute")
    }
}

// ============================================================================
// Assertions
// ============================================================================

/// Every grid position is owned by exactly one cell and there is one column
/// width per grid column.
pub fn assert_well_formed(engine: &TableEngine, table: NodeKey) {
    let map = TableMap::compute_lenient(engine.tree(), table).expect("table should map");
    assert!(map.gaps().is_empty(), "uncovered positions: {:?}", map.gaps());
    assert!(
        map.overlaps().is_empty(),
        "overlapping positions: {:?}",
        map.overlaps()
    );
    let widths = engine.column_widths(table).expect("widths present");
    assert_eq!(
        widths.len(),
        map.width() as usize,
        "one width per column expected"
    );
}

pub fn assert_span(harness: &Harness, row: u32, col: u32, col_span: u32, row_span: u32) {
    let map = harness.map();
    let m = map.get(row, col).expect("cell exists");
    assert_eq!(
        (m.start_row, m.start_col),
        (row, col),
        "({row}, {col}) is covered by a span starting elsewhere"
    );
    assert_eq!((m.col_span, m.row_span), (col_span, row_span));
}

// ============================================================================
// Stub Surface
// ============================================================================

/// Layout-backed surface whose rendered cell heights can be overridden.
pub struct StubSurface {
    pub layout: LayoutSurface,
    pub heights: HashMap<NodeKey, f32>,
}

impl StubSurface {
    pub fn new(layout: LayoutSurface) -> Self {
        Self {
            layout,
            heights: HashMap::new(),
        }
    }

    pub fn with_height(mut self, cell: NodeKey, height: f32) -> Self {
        self.heights.insert(cell, height);
        self
    }
}

impl RenderSurface for StubSurface {
    fn cell_rect(&self, cell: NodeKey) -> Option<Rect> {
        self.layout.cell_rect(cell)
    }

    fn table_rect(&self, table: NodeKey) -> Option<Rect> {
        self.layout.table_rect(table)
    }

    fn cell_at(&self, point: Point) -> Option<NodeKey> {
        self.layout.cell_at(point)
    }

    fn cell_height(&self, cell: NodeKey) -> Option<f32> {
        self.heights
            .get(&cell)
            .copied()
            .or_else(|| self.layout.cell_height(cell))
    }

    fn zoom(&self) -> f32 {
        self.layout.zoom()
    }

    fn scroll_offset(&self) -> Point {
        self.layout.scroll_offset()
    }
}

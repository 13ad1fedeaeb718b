//! Rendering surface: where cells and tables currently are on screen.
//!
//! The engine only reads from the surface, to position overlay affordances and
//! to turn pointer movement into pixel deltas. In a browser this is backed by
//! the DOM; [`crate::layout::LayoutSurface`] computes the same answers from the
//! document's own column widths and row heights.

use crate::types::{NodeKey, Point, Rect};

pub trait RenderSurface {
    /// Current bounding box of a cell, in client coordinates.
    fn cell_rect(&self, cell: NodeKey) -> Option<Rect>;

    /// Current bounding box of a table, in client coordinates.
    fn table_rect(&self, table: NodeKey) -> Option<Rect>;

    /// Cell under a client-coordinate point, if any.
    fn cell_at(&self, point: Point) -> Option<NodeKey>;

    /// Rendered (unzoomed) height of a cell's content box.
    fn cell_height(&self, cell: NodeKey) -> Option<f32>;

    /// Display zoom factor applied to everything on screen.
    fn zoom(&self) -> f32 {
        1.0
    }

    /// Page scroll offset added to overlay positions.
    fn scroll_offset(&self) -> Point {
        Point::default()
    }
}

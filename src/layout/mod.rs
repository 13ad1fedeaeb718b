//! Layout engine for table grids.
//!
//! This module handles:
//! - The grid map from `(row, column)` positions to owning cells, accounting for spans
//! - Pre-computing cell positions from column widths and row heights
//! - A rendering surface computed from that layout, for hosts without a DOM

mod surface;
mod table_layout;
mod table_map;

pub use surface::LayoutSurface;
pub use table_layout::TableLayout;
pub use table_map::{MapCell, TableMap};

/// Grid indices never exceed `u32`; saturate rather than wrap if they somehow do.
pub(crate) fn index_u32(i: usize) -> u32 {
    u32::try_from(i).unwrap_or(u32::MAX)
}

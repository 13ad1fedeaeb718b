//! tablegrid - table grid geometry and resize engine for rich-text editors
//!
//! Tables live in a document tree of table, row and cell nodes. This crate
//! keeps that tree consistent while users edit it:
//! - Grid mapping of row/column spans, including ragged and overlapping input
//! - Merge and unmerge of rectangular selections
//! - Row and column insertion and deletion that keeps spans intact
//! - Drag-to-resize of column widths and row heights with minimum clamps
//! - HTML, Markdown and JSON import/export
//!
//! # Usage (Rust)
//!
//! ```no_run
//! use tablegrid::{SerializedTable, Selection, TableConfig, TableEngine, TableMap};
//!
//! let mut engine = TableEngine::new(TableConfig::default());
//! let tables = engine.load_tables(&[SerializedTable::grid(3, 3, |r, c| format!("{r}{c}"))])?;
//! let map = TableMap::compute(engine.tree(), tables[0])?;
//! let (a, b) = (map.get(0, 0).map(|m| m.cell), map.get(1, 1).map(|m| m.cell));
//! if let (Some(a), Some(b)) = (a, b) {
//!     engine.set_selection(Some(Selection::range(a, b)));
//!     let _ = engine.merge_cells()?;
//! }
//! # Ok::<(), tablegrid::TableError>(())
//! ```
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { TableEditor } from 'tablegrid';
//! await init();
//! const editor = new TableEditor();
//! editor.load_html(html);
//! editor.select(0, 'A1:B2');
//! editor.dispatch('mergeCells');
//! ```

// Document model
pub mod config;
pub mod document;
pub mod error;
pub mod types;

// Editing
pub mod editor;
pub mod resize;

// Geometry
pub mod layout;
pub mod surface;

// Import/export
pub mod cell_ref;
pub mod export;
pub mod parser;
pub mod xml_helpers;

// JavaScript binding
pub mod wasm;

use wasm_bindgen::prelude::*;

pub use config::TableConfig;
pub use document::{Document, Tree, UpdateEvent, UpdateTag};
pub use editor::{MenuAnchor, Outcome, SkipReason, TableAction, TableEngine};
pub use error::{Result, TableError};
pub use layout::{LayoutSurface, TableMap};
pub use parser::TableFormat;
pub use resize::{PointerEvent, ResizeDirection, ResizeOverlay, ResizeState, TableCellResizer};
pub use surface::RenderSurface;
pub use wasm::TableEditor;

pub use types::*;

/// Convert tables between interchange formats.
///
/// # Errors
/// Returns an error if either format name is unknown or the input cannot be
/// parsed.
#[wasm_bindgen]
pub fn convert_tables(input: &str, from: &str, to: &str) -> std::result::Result<String, JsValue> {
    let convert = || -> Result<String> {
        let tables = parser::parse(input, from.parse()?)?;
        export::render(&tables, to.parse()?)
    };
    convert().map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

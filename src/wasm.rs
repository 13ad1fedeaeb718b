//! JavaScript binding: a table editor over a computed layout.
//!
//! `TableEditor` bundles the engine, the resize gesture handler and a
//! [`LayoutSurface`] positioned at a host-supplied origin and zoom. After
//! every change the surface is recomputed and the render callback (if any)
//! is invoked so the host can redraw tables and the resize overlay.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { TableEditor } from 'tablegrid';
//! await init();
//! const editor = new TableEditor();
//! editor.load_html(html);
//! editor.set_render_callback(() => draw(editor.overlay()));
//! root.addEventListener('mousemove', (e) => editor.pointer_move(e.clientX, e.clientY, e.buttons));
//! ```

use wasm_bindgen::prelude::*;

use crate::cell_ref::parse_shape;
use crate::config::TableConfig;
use crate::editor::{Outcome, TableAction, TableEngine};
use crate::error::{Result, TableError};
use crate::export;
use crate::layout::{LayoutSurface, TableMap};
use crate::parser::{self, TableFormat};
use crate::resize::{PointerEvent, TableCellResizer};
use crate::types::{Point, Selection};

fn js_err(e: TableError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct TableEditor {
    engine: TableEngine,
    resizer: TableCellResizer,
    surface: LayoutSurface,
    origin: Point,
    zoom: f32,
    #[cfg(target_arch = "wasm32")]
    render_callback: Option<js_sys::Function>,
}

#[wasm_bindgen]
impl TableEditor {
    /// Create an editor. `config_json` may override any `TableConfig` field.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> std::result::Result<TableEditor, JsValue> {
        #[cfg(target_arch = "wasm32")]
        console_error_panic_hook::set_once();

        let config = match config_json {
            Some(json) => TableConfig::from_json(&json).map_err(js_err)?,
            None => TableConfig::default(),
        };
        Self::with_config(config).map_err(js_err)
    }

    #[cfg(target_arch = "wasm32")]
    #[wasm_bindgen]
    pub fn set_render_callback(&mut self, callback: Option<js_sys::Function>) {
        self.render_callback = callback;
    }

    /// Append tables from XHTML. Returns how many were loaded.
    #[wasm_bindgen]
    pub fn load_html(&mut self, html: &str) -> std::result::Result<usize, JsValue> {
        self.load(html, TableFormat::Html).map_err(js_err)
    }

    #[wasm_bindgen]
    pub fn load_markdown(&mut self, markdown: &str) -> std::result::Result<usize, JsValue> {
        self.load(markdown, TableFormat::Markdown).map_err(js_err)
    }

    #[wasm_bindgen]
    pub fn load_json(&mut self, json: &str) -> std::result::Result<usize, JsValue> {
        self.load(json, TableFormat::Json).map_err(js_err)
    }

    #[wasm_bindgen]
    pub fn to_html(&self) -> std::result::Result<String, JsValue> {
        self.render(TableFormat::Html).map_err(js_err)
    }

    #[wasm_bindgen]
    pub fn to_markdown(&self) -> std::result::Result<String, JsValue> {
        self.render(TableFormat::Markdown).map_err(js_err)
    }

    #[wasm_bindgen]
    pub fn to_json(&self) -> std::result::Result<String, JsValue> {
        self.render(TableFormat::Json).map_err(js_err)
    }

    #[wasm_bindgen]
    pub fn table_count(&self) -> usize {
        self.engine.tree().tables().len()
    }

    /// Column widths of the table at `table_index`.
    #[wasm_bindgen]
    pub fn column_widths(&self, table_index: usize) -> Option<Vec<u32>> {
        let table = *self.engine.tree().tables().get(table_index)?;
        self.engine.column_widths(table).map(<[u32]>::to_vec)
    }

    /// Place the editor on the page and set the display zoom.
    #[wasm_bindgen]
    pub fn set_view(&mut self, origin_x: f32, origin_y: f32, zoom: f32) -> std::result::Result<(), JsValue> {
        self.origin = Point::new(origin_x, origin_y);
        self.zoom = zoom;
        self.refresh().map_err(js_err)
    }

    #[wasm_bindgen]
    pub fn set_scroll(&mut self, x: f32, y: f32) {
        self.surface.scroll = Point::new(x, y);
        self.notify();
    }

    /// Select `range` ("B2" or "A1:C3") in the table at `table_index`.
    #[wasm_bindgen]
    pub fn select(&mut self, table_index: usize, range: &str) -> bool {
        let selection = self.resolve_range(table_index, range);
        let found = selection.is_some();
        self.engine.set_selection(selection);
        found
    }

    #[wasm_bindgen]
    pub fn clear_selection(&mut self) {
        self.engine.set_selection(None);
    }

    #[wasm_bindgen]
    pub fn insert_table(&mut self, rows: u32, columns: u32) -> std::result::Result<bool, JsValue> {
        let outcome = self.engine.insert_table(rows, columns).map_err(js_err)?;
        self.after(outcome).map_err(js_err)
    }

    /// Menu entries for the current selection as `[{action, label}]`.
    #[wasm_bindgen]
    pub fn available_actions(&self) -> std::result::Result<JsValue, JsValue> {
        let entries: Vec<ActionEntry> = self
            .engine
            .available_actions()
            .into_iter()
            .map(|action| ActionEntry {
                action,
                label: action.label(),
            })
            .collect();
        Ok(serde_wasm_bindgen::to_value(&entries)?)
    }

    /// Run a menu action by name (`"mergeCells"`, `"insertRowAbove"`, ...).
    /// Returns whether the document changed.
    #[wasm_bindgen]
    pub fn dispatch(&mut self, action: &str) -> std::result::Result<bool, JsValue> {
        let action: TableAction = serde_json::from_value(serde_json::Value::String(action.into()))
            .map_err(|e| js_err(e.into()))?;
        self.run_action(action).map_err(js_err)
    }

    /// Anchor cell rectangle for the action menu, or `null`.
    #[wasm_bindgen]
    pub fn menu_anchor(&self) -> std::result::Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.engine.menu_anchor(&self.surface))?)
    }

    /// Route a DOM mouse event from the editor root.
    ///
    /// Moves are only queued; call [`TableEditor::flush`] once per frame.
    /// Returns whether the document changed.
    #[cfg(target_arch = "wasm32")]
    #[wasm_bindgen]
    pub fn handle_mouse_event(&mut self, event: &web_sys::MouseEvent) -> std::result::Result<bool, JsValue> {
        let (x, y) = (event.client_x() as f32, event.client_y() as f32);
        match event.type_().as_str() {
            "mousemove" => self.pointer_move(x, y, event.buttons()),
            "mousedown" if event.button() == 0 => {
                if self.pointer_down(x, y) {
                    event.prevent_default();
                }
            }
            "mouseup" if event.button() == 0 => return self.pointer_up(x, y),
            "mouseleave" => self.pointer_leave(),
            _ => {}
        }
        Ok(false)
    }

    /// Queue a pointer move. `buttons` is the DOM `MouseEvent.buttons` mask.
    #[wasm_bindgen]
    pub fn pointer_move(&mut self, x: f32, y: f32, buttons: u16) {
        self.resizer
            .pointer_move(PointerEvent::new(x, y, buttons & 1 == 1));
    }

    /// Process the queued pointer move; call once per animation frame.
    #[wasm_bindgen]
    pub fn flush(&mut self) -> bool {
        let changed = self.resizer.flush(&self.surface, self.engine.config());
        if changed {
            self.notify();
        }
        changed
    }

    /// Returns `true` when a resize drag started.
    #[wasm_bindgen]
    pub fn pointer_down(&mut self, x: f32, y: f32) -> bool {
        let started = self.resizer.pointer_down(
            Point::new(x, y),
            self.engine.tree(),
            &self.surface,
            self.engine.config(),
        );
        self.notify();
        started
    }

    /// Returns `true` when a drag was committed and changed the document.
    #[wasm_bindgen]
    pub fn pointer_up(&mut self, x: f32, y: f32) -> std::result::Result<bool, JsValue> {
        self.release(Point::new(x, y)).map_err(js_err)
    }

    #[wasm_bindgen]
    pub fn pointer_leave(&mut self) {
        self.resizer.pointer_leave();
        self.notify();
    }

    /// Abandon an in-progress drag (e.g. on Escape).
    #[wasm_bindgen]
    pub fn cancel_resize(&mut self) -> bool {
        let cancelled = self.resizer.cancel();
        if cancelled {
            self.notify();
        }
        cancelled
    }

    /// Resize affordances to draw, or `null` when hidden.
    #[wasm_bindgen]
    pub fn overlay(&self) -> std::result::Result<JsValue, JsValue> {
        let overlay = self.resizer.overlay(&self.surface, self.engine.config());
        Ok(serde_wasm_bindgen::to_value(&overlay)?)
    }
}

#[derive(serde::Serialize)]
struct ActionEntry {
    action: TableAction,
    label: &'static str,
}

impl TableEditor {
    fn with_config(config: TableConfig) -> Result<Self> {
        let engine = TableEngine::new(config);
        let origin = Point::default();
        let surface = LayoutSurface::compute(engine.tree(), engine.config(), origin, 1.0)?;
        Ok(Self {
            engine,
            resizer: TableCellResizer::new(),
            surface,
            origin,
            zoom: 1.0,
            #[cfg(target_arch = "wasm32")]
            render_callback: None,
        })
    }

    /// Create an editor without touching JS (non-wasm version for testing).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new_test(config: TableConfig) -> Result<Self> {
        Self::with_config(config)
    }

    pub fn engine(&self) -> &TableEngine {
        &self.engine
    }

    pub fn resizer(&self) -> &TableCellResizer {
        &self.resizer
    }

    pub fn surface(&self) -> &LayoutSurface {
        &self.surface
    }

    fn load(&mut self, input: &str, format: TableFormat) -> Result<usize> {
        let tables = parser::parse(input, format)?;
        let keys = self.engine.load_tables(&tables)?;
        self.refresh()?;
        Ok(keys.len())
    }

    fn render(&self, format: TableFormat) -> Result<String> {
        export::render(&self.engine.document().export_tables()?, format)
    }

    fn resolve_range(&self, table_index: usize, range: &str) -> Option<Selection> {
        let table = *self.engine.tree().tables().get(table_index)?;
        let shape = parse_shape(range)?;
        let map = TableMap::compute_lenient(self.engine.tree(), table).ok()?;
        let anchor = map.get(shape.from_y, shape.from_x)?.cell;
        let focus = map.get(shape.to_y, shape.to_x)?.cell;
        Some(if anchor == focus {
            Selection::cursor(anchor)
        } else {
            Selection::range(anchor, focus)
        })
    }

    fn run_action(&mut self, action: TableAction) -> Result<bool> {
        let outcome = self.engine.dispatch(action)?;
        self.after(outcome)
    }

    fn release(&mut self, position: Point) -> Result<bool> {
        let outcome = self
            .resizer
            .pointer_up(position, &mut self.engine, &self.surface)?;
        match outcome {
            Some(outcome) => self.after(outcome),
            None => {
                self.notify();
                Ok(false)
            }
        }
    }

    fn after(&mut self, outcome: Outcome) -> Result<bool> {
        if outcome.is_applied() {
            self.refresh()?;
        }
        Ok(outcome.is_applied())
    }

    /// Recompute the surface after a document or view change and redraw.
    fn refresh(&mut self) -> Result<()> {
        self.resizer.on_document_update(self.engine.tree());
        let scroll = self.surface.scroll;
        self.surface =
            LayoutSurface::compute(self.engine.tree(), self.engine.config(), self.origin, self.zoom)?;
        self.surface.scroll = scroll;
        self.notify();
        Ok(())
    }

    #[cfg(target_arch = "wasm32")]
    fn notify(&self) {
        if let Some(callback) = &self.render_callback {
            let _ = callback.call0(&JsValue::NULL);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn notify(&self) {}
}

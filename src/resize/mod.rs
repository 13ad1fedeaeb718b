//! Drag-to-resize gesture handling.
//!
//! `TableCellResizer` turns raw pointer events into a single resize commit:
//!
//! ```text
//! Idle ──move over cell──▶ Hovering(cell) ──down on handle──▶ Dragging(gesture)
//!  ▲                            │                                  │
//!  └────── leave / detach ──────┘◀──────── up (commit) / cancel ───┘
//! ```
//!
//! Pointer moves are queued and only processed by [`TableCellResizer::flush`];
//! the last queued move wins. Hosts call `flush` once per frame (or tick).

mod overlay;

pub use overlay::{Affordance, ResizeOverlay};

use serde::Serialize;

use crate::config::TableConfig;
use crate::document::Tree;
use crate::editor::{Outcome, TableEngine};
use crate::error::Result;
use crate::surface::RenderSurface;
use crate::types::{NodeKey, Point, Rect};
use overlay::{handle_rects, hit_handle, valid_zoom};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ResizeDirection {
    /// Dragging a cell's right edge
    Column,
    /// Dragging a cell's bottom edge
    Row,
}

impl ResizeDirection {
    pub fn cursor(self) -> &'static str {
        match self {
            ResizeDirection::Column => "col-resize",
            ResizeDirection::Row => "row-resize",
        }
    }
}

/// An in-progress drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeGesture {
    pub cell: NodeKey,
    pub direction: ResizeDirection,
    pub start: Point,
    pub current: Point,
    /// Table bounds when the drag started, for the guide line
    pub table_rect: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ResizeState {
    #[default]
    Idle,
    Hovering {
        cell: NodeKey,
    },
    Dragging(ResizeGesture),
}

/// A pointer event as seen by the resizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Client coordinates
    pub position: Point,
    /// Primary button held during the event
    pub primary_down: bool,
}

impl PointerEvent {
    pub fn new(x: f32, y: f32, primary_down: bool) -> Self {
        Self {
            position: Point::new(x, y),
            primary_down,
        }
    }
}

#[derive(Debug, Default)]
pub struct TableCellResizer {
    state: ResizeState,
    pending_move: Option<PointerEvent>,
    button_held: bool,
}

impl TableCellResizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ResizeState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, ResizeState::Dragging(_))
    }

    /// Cell whose affordances are showing, if any.
    pub fn active_cell(&self) -> Option<NodeKey> {
        match &self.state {
            ResizeState::Idle => None,
            ResizeState::Hovering { cell } => Some(*cell),
            ResizeState::Dragging(g) => Some(g.cell),
        }
    }

    /// Queue a pointer move. Only the most recent queued move is processed.
    pub fn pointer_move(&mut self, event: PointerEvent) {
        if self.pending_move.replace(event).is_some() {
            log::trace!("coalesced pointer move");
        }
    }

    /// Process the queued move, if any. Returns whether the overlay changed.
    pub fn flush(&mut self, surface: &dyn RenderSurface, config: &TableConfig) -> bool {
        let Some(event) = self.pending_move.take() else {
            return false;
        };
        let position = event.position;

        if let ResizeState::Dragging(gesture) = &mut self.state {
            gesture.current = position;
            return true;
        }

        let was_held = std::mem::replace(&mut self.button_held, event.primary_down);
        let before = self.state;

        // Handles hang half outside their cell; stay on it while over one
        if let ResizeState::Hovering { cell } = self.state {
            let on_handle = surface
                .cell_rect(cell)
                .and_then(|rect| hit_handle(rect, config.zone_width, position))
                .is_some();
            if on_handle {
                return was_held != self.button_held;
            }
        }

        match surface.cell_at(position) {
            Some(cell) => self.state = ResizeState::Hovering { cell },
            None if !self.button_held => self.state = ResizeState::Idle,
            None => {}
        }
        if self.state != before {
            log::debug!("resizer: {before:?} -> {:?}", self.state);
        }
        self.state != before || was_held != self.button_held
    }

    /// Primary button pressed. Starts a drag when it lands on a handle of the
    /// hovered cell. Returns whether a drag started.
    pub fn pointer_down(
        &mut self,
        position: Point,
        tree: &Tree,
        surface: &dyn RenderSurface,
        config: &TableConfig,
    ) -> bool {
        let ResizeState::Hovering { cell } = self.state else {
            if self.is_dragging() {
                log::debug!("resizer: ignoring pointer down during drag");
            }
            self.button_held = true;
            return false;
        };
        let direction = surface
            .cell_rect(cell)
            .and_then(|rect| hit_handle(rect, config.zone_width, position));
        let Some(direction) = direction else {
            self.button_held = true;
            return false;
        };
        let table_rect = tree
            .table_of(cell)
            .ok()
            .and_then(|table| surface.table_rect(table))
            .unwrap_or_default();

        self.pending_move = None;
        self.state = ResizeState::Dragging(ResizeGesture {
            cell,
            direction,
            start: position,
            current: position,
            table_rect,
        });
        log::debug!("resizer: dragging {cell} ({direction:?})");
        true
    }

    /// Primary button released. Commits an in-progress drag through `engine`.
    ///
    /// Returns the commit outcome, or `None` when no drag was in progress.
    pub fn pointer_up(
        &mut self,
        position: Point,
        engine: &mut TableEngine,
        surface: &dyn RenderSurface,
    ) -> Result<Option<Outcome>> {
        self.button_held = false;
        let ResizeState::Dragging(gesture) = self.state else {
            return Ok(None);
        };
        self.pending_move = None;
        self.state = ResizeState::Idle;

        let zoom = valid_zoom(surface.zoom());
        let outcome = match gesture.direction {
            ResizeDirection::Column => {
                engine.resize_column(gesture.cell, (position.x - gesture.start.x) / zoom)?
            }
            ResizeDirection::Row => {
                engine.resize_row(gesture.cell, (position.y - gesture.start.y) / zoom, surface)?
            }
        };
        log::debug!("resizer: drag on {} committed: {outcome:?}", gesture.cell);
        Ok(Some(outcome))
    }

    /// Pointer left the editor root. Hovering ends unless a button is held;
    /// a drag keeps going until the button is released.
    pub fn pointer_leave(&mut self) {
        if matches!(self.state, ResizeState::Hovering { .. }) && !self.button_held {
            self.pending_move = None;
            self.state = ResizeState::Idle;
        }
    }

    /// Abandon an in-progress drag without changing the document.
    pub fn cancel(&mut self) -> bool {
        if !self.is_dragging() {
            return false;
        }
        log::debug!("resizer: drag cancelled");
        self.reset();
        true
    }

    /// Re-check the active cell after a document update; a cell that was
    /// removed ends any hover or drag.
    pub fn on_document_update(&mut self, tree: &Tree) {
        if let Some(cell) = self.active_cell() {
            if !tree.is_attached(cell) {
                log::debug!("resizer: {cell} detached");
                self.reset();
            }
        }
    }

    fn reset(&mut self) {
        self.state = ResizeState::Idle;
        self.pending_move = None;
    }

    /// Handle rects of the hovered cell in client coordinates, for hosts that
    /// route pointer-down events themselves.
    pub fn handle_rects(&self, surface: &dyn RenderSurface, config: &TableConfig) -> Option<(Rect, Rect)> {
        let cell = self.active_cell()?;
        Some(handle_rects(surface.cell_rect(cell)?, config.zone_width))
    }
}

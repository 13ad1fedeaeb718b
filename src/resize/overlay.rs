//! Overlay affordances drawn over the hovered cell.
//!
//! Two handles straddle the cell's right and bottom edges. While dragging,
//! the active handle turns into a thin guide line spanning the whole table.

use serde::Serialize;

use super::{ResizeDirection, ResizeState, TableCellResizer};
use crate::config::TableConfig;
use crate::surface::RenderSurface;
use crate::types::{Point, Rect};

/// One draggable handle (or the guide line it became).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Affordance {
    pub direction: ResizeDirection,
    /// Page coordinates (client position plus scroll offset)
    pub rect: Rect,
    pub cursor: &'static str,
    /// Fill colour; only set on the guide line
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeOverlay {
    pub right: Affordance,
    pub bottom: Affordance,
}

impl ResizeOverlay {
    pub fn handle(&self, direction: ResizeDirection) -> &Affordance {
        match direction {
            ResizeDirection::Column => &self.right,
            ResizeDirection::Row => &self.bottom,
        }
    }
}

/// Right and bottom handle rects of a cell, in the cell's coordinate space.
pub(crate) fn handle_rects(cell: Rect, zone: f32) -> (Rect, Rect) {
    let right = Rect::new(cell.right() - zone / 2.0, cell.y, zone, cell.height);
    let bottom = Rect::new(cell.x, cell.bottom() - zone / 2.0, cell.width, zone);
    (right, bottom)
}

/// Which handle of `cell` (if any) contains `point`.
pub(crate) fn hit_handle(cell: Rect, zone: f32, point: Point) -> Option<ResizeDirection> {
    let (right, bottom) = handle_rects(cell, zone);
    if right.contains(point) {
        Some(ResizeDirection::Column)
    } else if bottom.contains(point) {
        Some(ResizeDirection::Row)
    } else {
        None
    }
}

fn handle(direction: ResizeDirection, rect: Rect) -> Affordance {
    Affordance {
        direction,
        rect,
        cursor: direction.cursor(),
        color: None,
    }
}

impl TableCellResizer {
    /// Current overlay, or `None` when nothing should be drawn.
    pub fn overlay(&self, surface: &dyn RenderSurface, config: &TableConfig) -> Option<ResizeOverlay> {
        let cell = match &self.state {
            ResizeState::Idle => return None,
            ResizeState::Hovering { .. } if self.button_held => return None,
            ResizeState::Hovering { cell } => *cell,
            ResizeState::Dragging(gesture) => gesture.cell,
        };
        let scroll = surface.scroll_offset();
        let (right, bottom) = handle_rects(surface.cell_rect(cell)?, config.zone_width);
        let mut overlay = ResizeOverlay {
            right: handle(ResizeDirection::Column, right.translate(scroll.x, scroll.y)),
            bottom: handle(ResizeDirection::Row, bottom.translate(scroll.x, scroll.y)),
        };

        if let ResizeState::Dragging(gesture) = &self.state {
            let zoom = valid_zoom(surface.zoom());
            let table = gesture.table_rect;
            let guide = match gesture.direction {
                ResizeDirection::Column => Rect::new(
                    scroll.x + gesture.current.x / zoom,
                    scroll.y + table.y,
                    config.guide_thickness,
                    table.height,
                ),
                ResizeDirection::Row => Rect::new(
                    scroll.x + table.x,
                    scroll.y + gesture.current.y / zoom,
                    table.width,
                    config.guide_thickness,
                ),
            };
            let active = match gesture.direction {
                ResizeDirection::Column => &mut overlay.right,
                ResizeDirection::Row => &mut overlay.bottom,
            };
            active.rect = guide;
            active.color = Some(config.guide_color.clone());
        }
        Some(overlay)
    }
}

/// Zoom factors that cannot scale a delta are treated as 1.
pub(crate) fn valid_zoom(zoom: f32) -> f32 {
    if zoom.is_finite() && zoom > 0.0 {
        zoom
    } else {
        1.0
    }
}

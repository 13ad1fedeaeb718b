//! Integration tests for drag-to-resize: pointer gestures through
//! `TableCellResizer` down to the committed column widths and row heights.
//!
//! Default geometry: columns are 92px wide and rows 33px tall, so in a
//! 3-column table the right edges sit at x = 92, 184, 276 and the bottom
//! edges at y = 33, 66, 99 (times the zoom).
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;
mod fixtures;

use std::cell::RefCell;
use std::rc::Rc;

use common::{assert_well_formed, Harness, StubSurface};
use fixtures::{cell, labelled_grid, TableBuilder};
use tablegrid::{
    Outcome, Point, PointerEvent, RenderSurface, ResizeDirection, ResizeState, SkipReason,
    TableCellResizer, UpdateTag,
};

/// Hover at `hover`, press at `down`, release at `up`.
fn drag(
    h: &mut Harness,
    surface: &dyn RenderSurface,
    hover: (f32, f32),
    down: (f32, f32),
    up: (f32, f32),
) -> Option<Outcome> {
    let mut resizer = TableCellResizer::new();
    resizer.pointer_move(PointerEvent::new(hover.0, hover.1, false));
    resizer.flush(surface, h.engine.config());
    assert!(
        resizer.pointer_down(
            Point::new(down.0, down.1),
            h.engine.tree(),
            surface,
            h.engine.config()
        ),
        "pointer down at {down:?} should start a drag"
    );
    resizer.pointer_move(PointerEvent::new(up.0, up.1, true));
    resizer.flush(surface, h.engine.config());
    resizer
        .pointer_up(Point::new(up.0, up.1), &mut h.engine, surface)
        .unwrap()
}

// ============================================================================
// COLUMN WIDTHS
// ============================================================================

#[test]
fn test_drag_second_column_right() {
    let mut h = Harness::new(labelled_grid(3, 3));
    let surface = h.surface(1.0);
    let outcome = drag(&mut h, &surface, (100.0, 10.0), (182.0, 10.0), (232.0, 10.0));

    assert_eq!(outcome, Some(Outcome::Applied));
    assert_eq!(h.widths(), vec![92, 142, 92]);
}

#[test]
fn test_drag_is_scaled_by_zoom() {
    let mut h = Harness::new(labelled_grid(2, 2));
    let surface = h.surface(2.0);
    // Right edge of column 0 is at 184 on a 2x surface
    let outcome = drag(&mut h, &surface, (50.0, 20.0), (184.0, 20.0), (284.0, 20.0));

    assert_eq!(outcome, Some(Outcome::Applied));
    assert_eq!(h.widths(), vec![142, 92]);
}

#[test]
fn test_column_never_below_minimum() {
    let mut h = Harness::new(TableBuilder::new().widths(&[200, 150]).row(&["a", "b"]).build());
    let surface = h.surface(1.0);
    let _ = drag(&mut h, &surface, (100.0, 10.0), (198.0, 10.0), (-400.0, 10.0));
    assert_eq!(h.widths(), vec![92, 150]);
}

#[test]
fn test_merged_cell_resizes_its_first_column() {
    let table = TableBuilder::new()
        .row_cells(vec![cell("a"), cell("wide").with_span(2, 1)])
        .row(&["b", "c", "d"])
        .build();
    let mut h = Harness::new(table);
    let wide = h.cell(0, 1);
    assert_eq!(h.engine.resize_column(wide, 10.0).unwrap(), Outcome::Applied);
    assert_eq!(h.widths(), vec![92, 102, 92]);
}

#[test]
fn test_resize_is_tagged_to_skip_scrolling() {
    let mut h = Harness::new(labelled_grid(1, 2));
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    h.engine.subscribe(move |e| sink.borrow_mut().push(e.clone()));

    let first = h.cell(0, 0);
    let _ = h.engine.resize_column(first, 8.0).unwrap();

    let events = events.borrow();
    assert_eq!(events.len(), 1);
    assert!(events[0].has_tag(UpdateTag::SkipScrollIntoView));
    assert!(events[0].has_tag(UpdateTag::Resize));
    assert!(!events[0].has_tag(UpdateTag::Structural));
}

// ============================================================================
// ROW HEIGHTS
// ============================================================================

#[test]
fn test_row_drag_clamps_to_minimum() {
    let mut h = Harness::new(labelled_grid(2, 3));
    let surface = StubSurface::new(h.surface(1.0))
        .with_height(h.cell(0, 0), 40.0)
        .with_height(h.cell(0, 1), 52.0)
        .with_height(h.cell(0, 2), 35.0);
    let row0 = h.engine.tree().table(h.table).unwrap().rows[0];

    let outcome = drag(&mut h, &surface, (40.0, 10.0), (40.0, 32.0), (40.0, -68.0));

    assert_eq!(outcome, Some(Outcome::Applied));
    assert_eq!(h.engine.row_height(row0), Some(33));
}

#[test]
fn test_row_grows_from_smallest_rendered_height() {
    let mut h = Harness::new(labelled_grid(2, 3));
    let surface = StubSurface::new(h.surface(1.0))
        .with_height(h.cell(1, 0), 40.0)
        .with_height(h.cell(1, 1), 52.0)
        .with_height(h.cell(1, 2), 35.0);
    let row1 = h.engine.tree().table(h.table).unwrap().rows[1];

    let cell = h.cell(1, 2);
    assert_eq!(
        h.engine.resize_row(cell, 10.0, &surface).unwrap(),
        Outcome::Applied
    );
    assert_eq!(h.engine.row_height(row1), Some(45));
}

#[test]
fn test_row_spanning_cell_resizes_its_last_row() {
    let table = TableBuilder::new()
        .row_cells(vec![cell("tall").with_span(1, 2), cell("b")])
        .row(&["c"])
        .build();
    let mut h = Harness::new(table);
    let surface = h.surface(1.0);
    let rows = h.engine.tree().table(h.table).unwrap().rows.clone();

    let tall = h.cell(0, 0);
    let _ = h.engine.resize_row(tall, 20.0, &surface).unwrap();

    assert_eq!(h.engine.row_height(rows[0]), None);
    assert_eq!(h.engine.row_height(rows[1]), Some(53));
}

#[test]
fn test_explicit_row_height_is_the_base() {
    let table = TableBuilder::new().row(&["a"]).height(60).build();
    let mut h = Harness::new(table);
    let surface = h.surface(1.0);
    let row = h.engine.tree().table(h.table).unwrap().rows[0];

    let cell = h.cell(0, 0);
    let _ = h.engine.resize_row(cell, -15.4, &surface).unwrap();
    assert_eq!(h.engine.row_height(row), Some(45));
}

// ============================================================================
// GESTURE LIFECYCLE
// ============================================================================

#[test]
fn test_overlay_follows_hover_and_drag() {
    let h = Harness::new(labelled_grid(2, 2));
    let surface = h.surface(1.0);
    let config = h.engine.config();
    let mut resizer = TableCellResizer::new();
    assert!(resizer.overlay(&surface, config).is_none());

    resizer.pointer_move(PointerEvent::new(120.0, 50.0, false));
    resizer.flush(&surface, config);
    let overlay = resizer.overlay(&surface, config).unwrap();
    assert_eq!(overlay.handle(ResizeDirection::Column).cursor, "col-resize");
    assert_eq!(overlay.handle(ResizeDirection::Row).cursor, "row-resize");

    assert!(resizer.pointer_down(Point::new(183.0, 50.0), h.engine.tree(), &surface, config));
    resizer.pointer_move(PointerEvent::new(200.0, 50.0, true));
    resizer.flush(&surface, config);
    let overlay = resizer.overlay(&surface, config).unwrap();
    let guide = overlay.handle(ResizeDirection::Column);
    assert_eq!(guide.color.as_deref(), Some("#adf"));
    // Guide spans the whole table height
    assert_eq!(guide.rect.height, 66.0);
}

#[test]
fn test_release_without_drag_changes_nothing() {
    let mut h = Harness::new(labelled_grid(2, 2));
    let surface = h.surface(1.0);
    let mut resizer = TableCellResizer::new();
    resizer.pointer_move(PointerEvent::new(40.0, 10.0, false));
    resizer.flush(&surface, h.engine.config());

    let revision = h.engine.document().revision();
    let outcome = resizer
        .pointer_up(Point::new(300.0, 10.0), &mut h.engine, &surface)
        .unwrap();
    assert_eq!(outcome, None);
    assert_eq!(h.engine.document().revision(), revision);
    assert!(matches!(resizer.state(), ResizeState::Hovering { .. }));
}

#[test]
fn test_drag_on_deleted_table_is_skipped() {
    let mut h = Harness::new(labelled_grid(2, 2));
    let surface = h.surface(1.0);
    let mut resizer = TableCellResizer::new();
    resizer.pointer_move(PointerEvent::new(40.0, 10.0, false));
    resizer.flush(&surface, h.engine.config());
    assert!(resizer.pointer_down(Point::new(90.0, 10.0), h.engine.tree(), &surface, h.engine.config()));

    h.caret(0, 0);
    let _ = h.engine.delete_table().unwrap();
    let outcome = resizer
        .pointer_up(Point::new(130.0, 10.0), &mut h.engine, &surface)
        .unwrap();
    assert_eq!(outcome, Some(Outcome::Skipped(SkipReason::Detached)));
}

#[test]
fn test_resizes_keep_table_well_formed() {
    let mut h = Harness::new(labelled_grid(3, 3));
    for (i, delta) in [30.0, -500.0, 12.6, f32::NAN].into_iter().enumerate() {
        let col = u32::try_from(i % 3).unwrap();
        let cell = h.cell(0, col);
        let _ = h.engine.resize_column(cell, delta).unwrap();
        assert_well_formed(&h.engine, h.table);
        assert!(h.widths().iter().all(|w| *w >= 92));
    }
    assert_eq!(h.widths(), vec![92, 92, 105]);
}

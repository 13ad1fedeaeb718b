//! Property tests: random edit sequences never break the grid.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

mod common;
mod fixtures;

use common::Harness;
use fixtures::labelled_grid;
use proptest::prelude::*;
use tablegrid::{TableConfig, TableMap};

#[derive(Debug, Clone)]
enum Op {
    InsertRow { after: bool },
    InsertColumn { after: bool, count: u32 },
    DeleteRow,
    DeleteColumn,
    Merge { rows: u32, cols: u32 },
    Unmerge,
    ResizeColumn(f32),
    ResizeRow(f32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<bool>().prop_map(|after| Op::InsertRow { after }),
        (any::<bool>(), 1u32..3).prop_map(|(after, count)| Op::InsertColumn { after, count }),
        Just(Op::DeleteRow),
        Just(Op::DeleteColumn),
        (0u32..3, 0u32..3).prop_map(|(rows, cols)| Op::Merge { rows, cols }),
        Just(Op::Unmerge),
        (-300.0f32..300.0).prop_map(Op::ResizeColumn),
        (-300.0f32..300.0).prop_map(Op::ResizeRow),
    ]
}

/// Apply `op` with the caret (or range anchor) at `pos`, wrapped into the
/// current grid.
fn apply(h: &mut Harness, op: &Op, pos: (u32, u32)) {
    let map = h.map();
    let row = pos.0 % map.height();
    let col = pos.1 % map.width();
    h.caret(row, col);
    let cell = h.cell(row, col);

    let _ = match op {
        Op::InsertRow { after } => h.engine.insert_row(*after),
        Op::InsertColumn { after, count } => h.engine.insert_column(*after, *count),
        Op::DeleteRow => h.engine.delete_row(),
        Op::DeleteColumn => h.engine.delete_column(),
        Op::Merge { rows, cols } => {
            let to = (
                (row + rows).min(map.height() - 1),
                (col + cols).min(map.width() - 1),
            );
            h.select((row, col), to);
            h.engine.merge_cells()
        }
        Op::Unmerge => h.engine.unmerge_selection(),
        Op::ResizeColumn(delta) => h.engine.resize_column(cell, *delta),
        Op::ResizeRow(delta) => {
            let surface = h.surface(1.0);
            h.engine.resize_row(cell, *delta, &surface)
        }
    }
    .unwrap();
}

fn non_empty_blocks(h: &Harness) -> usize {
    h.export()
        .rows
        .iter()
        .flat_map(|r| &r.cells)
        .flat_map(|c| &c.blocks)
        .filter(|b| !b.is_empty())
        .count()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_edits_keep_grid_covered(
        ops in prop::collection::vec((op_strategy(), any::<u32>(), any::<u32>()), 1..25)
    ) {
        let mut h = Harness::new(labelled_grid(3, 3));
        let min = TableConfig::default().min_column_width;

        for (op, r, c) in &ops {
            apply(&mut h, op, (*r, *c));

            let map = TableMap::compute_lenient(h.engine.tree(), h.table).unwrap();
            prop_assert!(map.width() >= 1 && map.height() >= 1, "table emptied by {:?}", op);
            prop_assert!(map.gaps().is_empty(), "gaps after {:?}: {:?}", op, map.gaps());
            prop_assert!(map.overlaps().is_empty(), "overlaps after {:?}", op);

            let widths = h.widths();
            prop_assert_eq!(widths.len(), map.width() as usize);
            prop_assert!(widths.iter().all(|w| *w >= min));
        }
    }

    #[test]
    fn prop_column_resize_is_clamped(delta in -500.0f32..500.0) {
        let mut h = Harness::new(labelled_grid(1, 2));
        let cell = h.cell(0, 0);
        let _ = h.engine.resize_column(cell, delta).unwrap();

        let expected = (92.0 + delta).round().max(92.0) as u32;
        prop_assert_eq!(h.widths(), vec![expected, 92]);
    }

    #[test]
    fn prop_merge_then_unmerge_keeps_cell_count(
        rows in 1u32..4, cols in 1u32..4, r in 0u32..3, c in 0u32..3
    ) {
        let mut h = Harness::new(labelled_grid(4, 4));
        let to = ((r + rows).min(3), (c + cols).min(3));
        h.select((r, c), to);
        prop_assert!(h.engine.merge_cells().unwrap().is_applied());

        h.caret(r, c);
        prop_assert!(h.engine.unmerge_selection().unwrap().is_applied());
        prop_assert_eq!(h.cell_count(), 16);
        prop_assert!(h.map().is_fully_covered());
        // Unmerge adds empty placeholders; the text blocks themselves are conserved
        prop_assert_eq!(non_empty_blocks(&h), 16);
    }
}

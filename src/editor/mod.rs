//! Table geometry engine.
//!
//! `TableEngine` owns the document, the host-pushed selection and the engine
//! configuration. Every mutating entry point runs inside one document
//! transaction; a reference that turns out to be detached makes the operation
//! a reported no-op instead of an error.

mod menu;
mod merge;
mod sizing;
mod structure;

pub use menu::{MenuAnchor, TableAction};
pub use merge::can_merge;

use std::fmt;

use crate::config::TableConfig;
use crate::document::{Document, ListenerId, Tree, UpdateEvent, UpdateTag};
use crate::error::{Result, TableError};
use crate::layout::TableMap;
use crate::types::{NodeKey, Selection, SelectionShape, SerializedTable};

/// Result of an operation that either changed the document or was skipped.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Skipped(SkipReason),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// Why an operation did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// There is no selection inside a table
    NoSelection,
    /// The reference cell or table is no longer in the document
    Detached,
    /// Deleting would leave the table without rows
    LastRow,
    /// Deleting would leave the table without columns
    LastColumn,
    /// The selection covers a single grid position
    NothingToMerge,
    /// The anchor cell does not span more than one position
    NotMerged,
    /// Unmerge needs a caret or a selection of exactly one cell
    MultiCellSelection,
    /// Requested table dimensions or column count are zero
    InvalidSize,
    /// The table has no width recorded for the resized column
    NoColumnWidth,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipReason::NoSelection => "no table selection",
            SkipReason::Detached => "reference is detached",
            SkipReason::LastRow => "cannot delete the last row",
            SkipReason::LastColumn => "cannot delete the last column",
            SkipReason::NothingToMerge => "selection covers a single cell",
            SkipReason::NotMerged => "cell is not merged",
            SkipReason::MultiCellSelection => "selection spans several cells",
            SkipReason::InvalidSize => "requested size must be positive",
            SkipReason::NoColumnWidth => "column has no width",
        })
    }
}

pub(crate) fn skipped(op: &str, reason: SkipReason) -> Outcome {
    log::debug!("{op} skipped: {reason}");
    Outcome::Skipped(reason)
}

#[derive(Debug)]
pub struct TableEngine {
    doc: Document,
    selection: Option<Selection>,
    config: TableConfig,
}

impl TableEngine {
    /// Engine over an empty document.
    pub fn new(config: TableConfig) -> Self {
        Self {
            doc: Document::new(),
            selection: None,
            config,
        }
    }

    /// Engine over an existing document. Tables without column widths get
    /// default widths immediately.
    pub fn with_document(doc: Document, config: TableConfig) -> Result<Self> {
        let mut engine = Self {
            doc,
            selection: None,
            config,
        };
        engine.update(&[], |_, _| Ok(()))?;
        Ok(engine)
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn tree(&self) -> &Tree {
        self.doc.tree()
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Host pushes the current selection after every selection change.
    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&UpdateEvent) + 'static) -> ListenerId {
        self.doc.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.doc.unsubscribe(id)
    }

    /// Current column widths of `table`, one per grid column.
    pub fn column_widths(&self, table: NodeKey) -> Option<&[u32]> {
        self.tree().table(table).ok()?.col_widths.as_deref()
    }

    /// Explicit height of `row`, if it was ever resized.
    pub fn row_height(&self, row: NodeKey) -> Option<u32> {
        self.tree().row(row).ok()?.height
    }

    pub fn column_count(&self, table: NodeKey) -> Result<u32> {
        Ok(TableMap::compute_lenient(self.tree(), table)?.width())
    }

    /// Append tables to the document.
    pub fn load_tables(&mut self, tables: &[SerializedTable]) -> Result<Vec<NodeKey>> {
        let keys = self.update(&[UpdateTag::Import], |tree, _| {
            tables
                .iter()
                .map(|t| tree.import_table(t, None))
                .collect::<Result<Vec<_>>>()
        })?;
        Ok(keys.unwrap_or_default())
    }

    /// Table and (span-expanded) shape of the current selection.
    pub fn selection_shape(&self) -> Option<(NodeKey, SelectionShape)> {
        let selection = self.selection?;
        let tree = self.tree();
        let anchor = selection.anchor_cell();
        let focus = selection.focus_cell();
        if !tree.is_attached(anchor) || !tree.is_attached(focus) {
            return None;
        }
        let table = tree.table_of(anchor).ok()?;
        if tree.table_of(focus).ok()? != table {
            return None;
        }
        let map = TableMap::compute_lenient(tree, table).ok()?;
        let shape = map.shape_between(anchor, focus)?;
        Some((table, map.expand_shape(shape)))
    }

    /// Resolve the selection to a table and shape, or say why not.
    fn reference(&self) -> std::result::Result<(NodeKey, SelectionShape), SkipReason> {
        let selection = self.selection.ok_or(SkipReason::NoSelection)?;
        let tree = self.tree();
        if !tree.is_attached(selection.anchor_cell()) || !tree.is_attached(selection.focus_cell()) {
            return Err(SkipReason::Detached);
        }
        self.selection_shape().ok_or(SkipReason::NoSelection)
    }

    /// Run `f` in one transaction, then normalize column widths.
    ///
    /// Returns `Ok(None)` when the transaction hit a detached reference; the
    /// tree is rolled back in that case.
    fn update<T>(
        &mut self,
        tags: &[UpdateTag],
        f: impl FnOnce(&mut Tree, &TableConfig) -> Result<T>,
    ) -> Result<Option<T>> {
        let config = &self.config;
        let result = self.doc.run(tags, |tree| {
            let value = f(tree, config)?;
            normalize_column_widths(tree, config)?;
            Ok(value)
        });
        match result {
            Ok(value) => Ok(Some(value)),
            Err(TableError::Detached(key)) => {
                log::debug!("update skipped: {key} is detached");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// Give every table exactly one width per grid column.
///
/// Tables seen for the first time get the default width everywhere; tables
/// whose width list drifted from the column count are padded or truncated.
fn normalize_column_widths(tree: &mut Tree, config: &TableConfig) -> Result<()> {
    let tables = tree.tables().to_vec();
    for table in tables {
        let width = TableMap::compute_lenient(tree, table)?.width() as usize;
        let node = tree.table_mut(table)?;
        match &mut node.col_widths {
            Some(widths) if widths.len() == width => {}
            Some(widths) => widths.resize(width, config.default_column_width),
            None => node.col_widths = Some(vec![config.default_column_width; width]),
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_widths_initialized_on_load() {
        let mut engine = TableEngine::new(TableConfig::default());
        let keys = engine
            .load_tables(&[SerializedTable::grid(2, 3, |_, _| String::new())])
            .unwrap();
        assert_eq!(engine.column_widths(keys[0]), Some(&[92, 92, 92][..]));
    }

    #[test]
    fn test_widths_padded_to_column_count() {
        let mut table = SerializedTable::grid(1, 3, |_, _| String::new());
        table.col_widths = Some(vec![120]);
        let doc = Document::from_tables(&[table]).unwrap();
        let engine = TableEngine::with_document(doc, TableConfig::default()).unwrap();
        let key = engine.tree().tables()[0];
        assert_eq!(engine.column_widths(key), Some(&[120, 92, 92][..]));
    }

    #[test]
    fn test_selection_shape_for_cursor_in_merged_cell() {
        let mut table = SerializedTable::grid(2, 2, |_, _| String::new());
        table.rows[0].cells[0] = crate::types::SerializedCell::text("m").with_span(2, 1);
        table.rows[0].cells.pop();
        let mut engine = TableEngine::new(TableConfig::default());
        let keys = engine.load_tables(&[table]).unwrap();
        let row0 = engine.tree().table(keys[0]).unwrap().rows[0];
        let cell = engine.tree().row(row0).unwrap().cells[0];

        engine.set_selection(Some(Selection::cursor(cell)));
        let (_, shape) = engine.selection_shape().unwrap();
        assert_eq!(shape, SelectionShape::new(0, 0, 1, 0));
    }
}

//! Node arena holding every table, row and cell of a document.
//!
//! Lookups return [`TableError::Detached`] for keys that no longer resolve and
//! [`TableError::InvariantViolation`] when a key resolves to the wrong kind of
//! node or the parent/child links disagree.

use std::collections::HashMap;

use crate::error::{Result, TableError};
use crate::types::{
    CellNode, Node, NodeKey, NodeKind, RowNode, SerializedCell, SerializedRow, SerializedTable,
    TableNode,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
    nodes: HashMap<NodeKey, Node>,
    /// Top-level tables in document order
    tables: Vec<NodeKey>,
    next_key: u32,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-level tables in document order
    pub fn tables(&self) -> &[NodeKey] {
        &self.tables
    }

    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(&key)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn table(&self, key: NodeKey) -> Result<&TableNode> {
        match self.nodes.get(&key) {
            Some(Node::Table(t)) => Ok(t),
            Some(other) => Err(wrong_kind(key, NodeKind::Table, other.kind())),
            None => Err(TableError::Detached(key)),
        }
    }

    pub fn row(&self, key: NodeKey) -> Result<&RowNode> {
        match self.nodes.get(&key) {
            Some(Node::Row(r)) => Ok(r),
            Some(other) => Err(wrong_kind(key, NodeKind::Row, other.kind())),
            None => Err(TableError::Detached(key)),
        }
    }

    pub fn cell(&self, key: NodeKey) -> Result<&CellNode> {
        match self.nodes.get(&key) {
            Some(Node::Cell(c)) => Ok(c),
            Some(other) => Err(wrong_kind(key, NodeKind::Cell, other.kind())),
            None => Err(TableError::Detached(key)),
        }
    }

    pub fn table_mut(&mut self, key: NodeKey) -> Result<&mut TableNode> {
        match self.nodes.get_mut(&key) {
            Some(Node::Table(t)) => Ok(t),
            Some(other) => Err(wrong_kind(key, NodeKind::Table, other.kind())),
            None => Err(TableError::Detached(key)),
        }
    }

    pub fn row_mut(&mut self, key: NodeKey) -> Result<&mut RowNode> {
        match self.nodes.get_mut(&key) {
            Some(Node::Row(r)) => Ok(r),
            Some(other) => Err(wrong_kind(key, NodeKind::Row, other.kind())),
            None => Err(TableError::Detached(key)),
        }
    }

    pub fn cell_mut(&mut self, key: NodeKey) -> Result<&mut CellNode> {
        match self.nodes.get_mut(&key) {
            Some(Node::Cell(c)) => Ok(c),
            Some(other) => Err(wrong_kind(key, NodeKind::Cell, other.kind())),
            None => Err(TableError::Detached(key)),
        }
    }

    /// Whether `key` is reachable from the list of top-level tables.
    pub fn is_attached(&self, key: NodeKey) -> bool {
        match self.nodes.get(&key) {
            Some(Node::Table(_)) => self.tables.contains(&key),
            Some(Node::Row(row)) => {
                self.is_attached(row.parent)
                    && self
                        .table(row.parent)
                        .is_ok_and(|t| t.rows.contains(&key))
            }
            Some(Node::Cell(cell)) => {
                self.is_attached(cell.parent)
                    && self.row(cell.parent).is_ok_and(|r| r.cells.contains(&key))
            }
            None => false,
        }
    }

    /// Resolve the table that owns `key` (a table resolves to itself).
    pub fn table_of(&self, key: NodeKey) -> Result<NodeKey> {
        match self.nodes.get(&key) {
            Some(Node::Table(_)) => Ok(key),
            Some(Node::Row(row)) => {
                self.table(row.parent)?;
                Ok(row.parent)
            }
            Some(Node::Cell(cell)) => {
                let row = self.row(cell.parent)?;
                self.table(row.parent)?;
                Ok(row.parent)
            }
            None => Err(TableError::Detached(key)),
        }
    }

    /// Index of `row` within its table.
    pub fn row_index(&self, row: NodeKey) -> Result<usize> {
        let parent = self.row(row)?.parent;
        self.table(parent)?
            .rows
            .iter()
            .position(|r| *r == row)
            .ok_or_else(|| {
                TableError::invariant(format!("row {row} is not listed in its table {parent}"))
            })
    }

    /// Fail with `Detached` unless `key` is attached.
    pub fn ensure_attached(&self, key: NodeKey) -> Result<()> {
        if self.is_attached(key) {
            Ok(())
        } else {
            Err(TableError::Detached(key))
        }
    }

    fn alloc(&mut self, node: Node) -> NodeKey {
        let key = NodeKey(self.next_key);
        self.next_key += 1;
        self.nodes.insert(key, node);
        key
    }

    /// Create an empty table at `index` among the top-level tables (end if `None`).
    pub fn create_table(&mut self, index: Option<usize>) -> NodeKey {
        let key = self.alloc(Node::Table(TableNode::default()));
        let at = index.unwrap_or(self.tables.len()).min(self.tables.len());
        self.tables.insert(at, key);
        key
    }

    /// Create an empty row at `index` in `table`.
    pub fn create_row(&mut self, table: NodeKey, index: usize) -> Result<NodeKey> {
        self.table(table)?;
        let key = self.alloc(Node::Row(RowNode {
            parent: table,
            cells: Vec::new(),
            height: None,
        }));
        let rows = &mut self.table_mut(table)?.rows;
        rows.insert(index.min(rows.len()), key);
        Ok(key)
    }

    /// Insert `cell` at `index` in `row`; the cell's parent is overwritten.
    pub fn create_cell(&mut self, row: NodeKey, index: usize, mut cell: CellNode) -> Result<NodeKey> {
        self.row(row)?;
        cell.parent = row;
        cell.clamp_spans();
        let key = self.alloc(Node::Cell(cell));
        let cells = &mut self.row_mut(row)?.cells;
        cells.insert(index.min(cells.len()), key);
        Ok(key)
    }

    /// Remove a cell from its row and from the arena, returning its data.
    pub fn remove_cell(&mut self, cell: NodeKey) -> Result<CellNode> {
        let parent = self.cell(cell)?.parent;
        self.row_mut(parent)?.cells.retain(|c| *c != cell);
        match self.nodes.remove(&cell) {
            Some(Node::Cell(data)) => Ok(data),
            _ => Err(TableError::Detached(cell)),
        }
    }

    /// Move a cell to `index` within `row` (which may be its current row).
    pub fn move_cell(&mut self, cell: NodeKey, row: NodeKey, index: usize) -> Result<()> {
        let old_parent = self.cell(cell)?.parent;
        self.row(row)?;
        self.row_mut(old_parent)?.cells.retain(|c| *c != cell);
        let cells = &mut self.row_mut(row)?.cells;
        cells.insert(index.min(cells.len()), cell);
        self.cell_mut(cell)?.parent = row;
        Ok(())
    }

    /// Remove a row and all its cells.
    pub fn remove_row(&mut self, row: NodeKey) -> Result<()> {
        let data = self.row(row)?.clone();
        self.table_mut(data.parent)?.rows.retain(|r| *r != row);
        for cell in data.cells {
            self.nodes.remove(&cell);
        }
        self.nodes.remove(&row);
        Ok(())
    }

    /// Remove a table with all rows and cells.
    pub fn remove_table(&mut self, table: NodeKey) -> Result<()> {
        let rows = self.table(table)?.rows.clone();
        for row in rows {
            self.remove_row(row)?;
        }
        self.tables.retain(|t| *t != table);
        self.nodes.remove(&table);
        Ok(())
    }

    /// Build nodes for a serialized table at `index` among the top-level tables.
    pub fn import_table(&mut self, table: &SerializedTable, index: Option<usize>) -> Result<NodeKey> {
        let key = self.create_table(index);
        self.table_mut(key)?.col_widths = table.col_widths.clone();
        for (r, row) in table.rows.iter().enumerate() {
            let row_key = self.create_row(key, r)?;
            self.row_mut(row_key)?.height = row.height;
            for (c, cell) in row.cells.iter().enumerate() {
                self.create_cell(
                    row_key,
                    c,
                    CellNode {
                        parent: row_key,
                        col_span: cell.col_span,
                        row_span: cell.row_span,
                        header: cell.header,
                        blocks: cell.blocks.clone(),
                    },
                )?;
            }
        }
        Ok(key)
    }

    /// Serialize an attached table.
    pub fn export_table(&self, table: NodeKey) -> Result<SerializedTable> {
        let node = self.table(table)?;
        let mut rows = Vec::with_capacity(node.rows.len());
        for row_key in &node.rows {
            let row = self.row(*row_key)?;
            let mut cells = Vec::with_capacity(row.cells.len());
            for cell_key in &row.cells {
                let cell = self.cell(*cell_key)?;
                cells.push(SerializedCell {
                    col_span: cell.col_span,
                    row_span: cell.row_span,
                    header: cell.header,
                    blocks: cell.blocks.clone(),
                });
            }
            rows.push(SerializedRow {
                height: row.height,
                cells,
            });
        }
        Ok(SerializedTable {
            col_widths: node.col_widths.clone(),
            rows,
        })
    }
}

fn wrong_kind(key: NodeKey, expected: NodeKind, found: NodeKind) -> TableError {
    TableError::invariant(format!("expected {key} to be a {expected}, found a {found}"))
}

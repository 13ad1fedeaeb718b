use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a node in the document arena.
///
/// Keys are never reused within a document, so a key that no longer resolves
/// means the node was removed (detached).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeKey(pub u32);

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A content block owned by a cell (a paragraph of text).
///
/// Content is opaque to the geometry engine; only emptiness matters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub text: String,
}

impl Block {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// An empty placeholder paragraph
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Length in characters, used for caret placement
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Table node: an ordered list of rows plus per-column widths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableNode {
    pub rows: Vec<NodeKey>,
    /// Column widths in pixels, one per grid column. `None` until first observed.
    pub col_widths: Option<Vec<u32>>,
}

/// Row node: an ordered list of cells and an optional explicit height.
#[derive(Debug, Clone, PartialEq)]
pub struct RowNode {
    pub parent: NodeKey,
    pub cells: Vec<NodeKey>,
    /// Height in pixels. `None` until the row is first resized.
    pub height: Option<u32>,
}

/// Largest accepted `colspan`, as in HTML.
pub const MAX_COL_SPAN: u32 = 1000;

/// Largest accepted `rowspan`, as in HTML.
pub const MAX_ROW_SPAN: u32 = 65534;

/// Cell node. Spans are always >= 1 and are clamped to the maximums on creation.
#[derive(Debug, Clone, PartialEq)]
pub struct CellNode {
    pub parent: NodeKey,
    pub col_span: u32,
    pub row_span: u32,
    /// Rendered as a header cell (`<th>`)
    pub header: bool,
    pub blocks: Vec<Block>,
}

impl CellNode {
    /// A unit cell holding one empty paragraph.
    pub fn placeholder(parent: NodeKey) -> Self {
        Self {
            parent,
            col_span: 1,
            row_span: 1,
            header: false,
            blocks: vec![Block::empty()],
        }
    }

    /// Clamp both spans into their accepted ranges.
    pub fn clamp_spans(&mut self) {
        self.col_span = self.col_span.clamp(1, MAX_COL_SPAN);
        self.row_span = self.row_span.clamp(1, MAX_ROW_SPAN);
    }

    pub fn is_merged(&self) -> bool {
        self.col_span > 1 || self.row_span > 1
    }

    /// True when the cell holds exactly one block and that block is empty.
    pub fn contains_empty_paragraph(&self) -> bool {
        matches!(self.blocks.as_slice(), [only] if only.is_empty())
    }
}

/// The closed set of node kinds the engine knows about.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Table(TableNode),
    Row(RowNode),
    Cell(CellNode),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Table(_) => NodeKind::Table,
            Node::Row(_) => NodeKind::Row,
            Node::Cell(_) => NodeKind::Cell,
        }
    }

    pub fn parent(&self) -> Option<NodeKey> {
        match self {
            Node::Table(_) => None,
            Node::Row(row) => Some(row.parent),
            Node::Cell(cell) => Some(cell.parent),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Table,
    Row,
    Cell,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeKind::Table => "table",
            NodeKind::Row => "row",
            NodeKind::Cell => "cell",
        })
    }
}

use serde::{Deserialize, Serialize};

use super::Block;

/// Detached, serializable form of a table.
///
/// This is the interchange format between the document arena and the
/// HTML/Markdown/JSON codecs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedTable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col_widths: Option<Vec<u32>>,
    pub rows: Vec<SerializedRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    pub cells: Vec<SerializedCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedCell {
    #[serde(default = "one")]
    pub col_span: u32,
    #[serde(default = "one")]
    pub row_span: u32,
    #[serde(default)]
    pub header: bool,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

fn one() -> u32 {
    1
}

impl SerializedCell {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            col_span: 1,
            row_span: 1,
            header: false,
            blocks: vec![Block::paragraph(text)],
        }
    }

    pub fn with_span(mut self, col_span: u32, row_span: u32) -> Self {
        self.col_span = col_span.max(1);
        self.row_span = row_span.max(1);
        self
    }

    pub fn as_header(mut self) -> Self {
        self.header = true;
        self
    }

    /// Plain text of all blocks, joined with `sep`
    pub fn joined_text(&self, sep: &str) -> String {
        self.blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join(sep)
    }
}

impl SerializedTable {
    /// A `rows × cols` table of unit cells with the given text generator.
    pub fn grid(rows: usize, cols: usize, mut text: impl FnMut(usize, usize) -> String) -> Self {
        Self {
            col_widths: None,
            rows: (0..rows)
                .map(|r| SerializedRow {
                    height: None,
                    cells: (0..cols).map(|c| SerializedCell::text(text(r, c))).collect(),
                })
                .collect(),
        }
    }
}

//! GitHub-flavoured Markdown pipe tables.
//!
//! Pipe tables cannot express spans, so every grid position gets its own
//! column and positions covered by a span (other than the cell's own
//! top-left one) are written empty. The first grid row is the header row.

use crate::document::Tree;
use crate::error::Result;
use crate::layout::TableMap;
use crate::types::{Block, SerializedTable};

/// Render one table as a pipe table. A table without rows renders empty.
pub fn write_table(table: &SerializedTable) -> Result<String> {
    let mut tree = Tree::new();
    let key = tree.import_table(table, None)?;
    let map = TableMap::compute_lenient(&tree, key)?;
    if map.height() == 0 || map.width() == 0 {
        return Ok(String::new());
    }

    let mut lines = Vec::with_capacity(map.height() as usize + 1);
    for row in 0..map.height() {
        let mut cells = Vec::with_capacity(map.width() as usize);
        for col in 0..map.width() {
            let text = match map.get(row, col) {
                Some(m) if m.start_row == row && m.start_col == col => {
                    cell_text(&tree.cell(m.cell)?.blocks)
                }
                _ => String::new(),
            };
            cells.push(text);
        }
        lines.push(format_row(&cells));
        if row == 0 {
            lines.push(format_row(&vec!["---".to_string(); cells.len()]));
        }
    }
    Ok(lines.join("\n"))
}

/// Render several tables separated by blank lines.
pub fn write_tables(tables: &[SerializedTable]) -> Result<String> {
    let rendered = tables
        .iter()
        .map(write_table)
        .collect::<Result<Vec<_>>>()?;
    Ok(rendered.join("\n\n"))
}

fn format_row(cells: &[String]) -> String {
    let mut line = String::from("|");
    for cell in cells {
        line.push(' ');
        line.push_str(cell);
        line.push_str(" |");
    }
    line
}

fn cell_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(|b| escape_cell(&b.text))
        .collect::<Vec<_>>()
        .join("<br>")
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', "<br>")
}

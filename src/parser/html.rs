//! XHTML table import.
//!
//! Reads every top-level `<table>` in a well-formed document. Rows from
//! `<thead>`/`<tbody>`/`<tfoot>` are flattened in document order; tables
//! nested inside a cell contribute their text to that cell.

use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Result, TableError};
use crate::types::{
    Block, SerializedCell, SerializedRow, SerializedTable, MAX_COL_SPAN, MAX_ROW_SPAN,
};
use crate::xml_helpers::{attr_u32, local_name_string, style_px};

/// Entities HTML authors use that XML does not predefine.
fn html_entity(name: &str) -> Option<&'static str> {
    match name {
        "nbsp" => Some("\u{a0}"),
        "ndash" => Some("\u{2013}"),
        "mdash" => Some("\u{2014}"),
        "hellip" => Some("\u{2026}"),
        "copy" => Some("\u{a9}"),
        _ => None,
    }
}

#[derive(Default)]
struct CellBuilder {
    cell: Option<SerializedCell>,
    text: String,
}

impl CellBuilder {
    fn open(e: &BytesStart, header: bool) -> Self {
        Self {
            cell: Some(SerializedCell {
                col_span: attr_u32(e, b"colspan").unwrap_or(1).clamp(1, MAX_COL_SPAN),
                row_span: attr_u32(e, b"rowspan").unwrap_or(1).clamp(1, MAX_ROW_SPAN),
                header,
                blocks: Vec::new(),
            }),
            text: String::new(),
        }
    }

    fn push_text(&mut self, text: &str) {
        for (i, word) in text.split(|c: char| c.is_ascii_whitespace()).enumerate() {
            if i > 0 && !self.text.ends_with([' ', '\n']) {
                self.text.push(' ');
            }
            self.text.push_str(word);
        }
    }

    /// End the current block. Empty blocks are kept only when `keep_empty`.
    fn flush_block(&mut self, keep_empty: bool) {
        let text = self.text.trim().to_string();
        self.text.clear();
        if let Some(cell) = self.cell.as_mut() {
            if !text.is_empty() || keep_empty {
                cell.blocks.push(Block::paragraph(text));
            }
        }
    }

    fn close(mut self) -> Option<SerializedCell> {
        self.flush_block(false);
        let mut cell = self.cell?;
        if cell.blocks.is_empty() {
            cell.blocks.push(Block::empty());
        }
        Some(cell)
    }
}

#[derive(Default)]
struct TableBuilder {
    table: SerializedTable,
    widths: Vec<Option<u32>>,
    cell: Option<CellBuilder>,
}

impl TableBuilder {
    fn finish(mut self) -> SerializedTable {
        if let Some(cell) = self.cell.take().and_then(CellBuilder::close) {
            self.push_cell(cell);
        }
        // Widths are only kept when every column declares one
        if !self.widths.is_empty() && self.widths.iter().all(Option::is_some) {
            self.table.col_widths = Some(self.widths.into_iter().flatten().collect());
        }
        self.table
    }

    fn push_cell(&mut self, cell: SerializedCell) {
        if self.table.rows.is_empty() {
            self.table.rows.push(SerializedRow::default());
        }
        if let Some(row) = self.table.rows.last_mut() {
            row.cells.push(cell);
        }
    }
}

/// Parse every top-level table in `html`.
pub fn parse_tables(html: &str) -> Result<Vec<SerializedTable>> {
    let mut xml = Reader::from_str(html);
    xml.trim_text(false);

    let mut tables = Vec::new();
    let mut current: Option<TableBuilder> = None;
    let mut depth = 0usize;

    loop {
        match xml.read_event()? {
            Event::Start(ref e) => {
                let name = local_name_string(e);
                if name == "table" {
                    depth += 1;
                    if depth == 1 {
                        current = Some(TableBuilder::default());
                    }
                    continue;
                }
                if depth != 1 {
                    continue;
                }
                if let Some(builder) = current.as_mut() {
                    start_element(builder, e, &name);
                }
            }
            Event::Empty(ref e) => {
                let name = local_name_string(e);
                if depth != 1 {
                    continue;
                }
                if let Some(builder) = current.as_mut() {
                    start_element(builder, e, &name);
                    end_element(builder, &name);
                }
            }
            Event::End(ref e) => {
                let name = std::str::from_utf8(e.local_name().as_ref())
                    .unwrap_or("")
                    .to_ascii_lowercase();
                if name == "table" {
                    if depth == 1 {
                        if let Some(builder) = current.take() {
                            tables.push(builder.finish());
                        }
                    }
                    depth = depth.saturating_sub(1);
                    continue;
                }
                if depth == 1 {
                    if let Some(builder) = current.as_mut() {
                        end_element(builder, &name);
                    }
                }
            }
            Event::Text(ref t) => {
                if let Some(cell) = current.as_mut().and_then(|b| b.cell.as_mut()) {
                    let text: Cow<'_, str> = t.unescape_with(html_entity)?;
                    cell.push_text(&text);
                }
            }
            Event::CData(ref t) => {
                if let Some(cell) = current.as_mut().and_then(|b| b.cell.as_mut()) {
                    cell.push_text(&String::from_utf8_lossy(t));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth > 0 {
        return Err(TableError::Parse("unterminated <table>".into()));
    }
    log::debug!("parsed {} table(s) from html", tables.len());
    Ok(tables)
}

fn start_element(builder: &mut TableBuilder, e: &BytesStart, name: &str) {
    match name {
        "col" => {
            let span = attr_u32(e, b"span").unwrap_or(1).clamp(1, MAX_COL_SPAN);
            let width = style_px(e, "width").or_else(|| attr_u32(e, b"width"));
            for _ in 0..span {
                builder.widths.push(width);
            }
        }
        "tr" => {
            if let Some(cell) = builder.cell.take().and_then(CellBuilder::close) {
                builder.push_cell(cell);
            }
            builder.table.rows.push(SerializedRow {
                height: style_px(e, "height").or_else(|| attr_u32(e, b"height")),
                cells: Vec::new(),
            });
        }
        "td" | "th" => {
            if let Some(cell) = builder.cell.take().and_then(CellBuilder::close) {
                builder.push_cell(cell);
            }
            builder.cell = Some(CellBuilder::open(e, name == "th"));
        }
        "p" | "div" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "li" => {
            if let Some(cell) = builder.cell.as_mut() {
                cell.flush_block(false);
            }
        }
        "br" => {
            if let Some(cell) = builder.cell.as_mut() {
                cell.text.push('\n');
            }
        }
        _ => {}
    }
}

fn end_element(builder: &mut TableBuilder, name: &str) {
    match name {
        "p" | "div" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "li" => {
            if let Some(cell) = builder.cell.as_mut() {
                cell.flush_block(true);
            }
        }
        "td" | "th" => {
            if let Some(cell) = builder.cell.take().and_then(CellBuilder::close) {
                builder.push_cell(cell);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spans_and_sizes() {
        let html = r#"
            <table>
              <colgroup><col style="width: 120px"/><col style="width: 92px"/></colgroup>
              <tbody>
                <tr style="height: 40px"><th colspan="2"><p>Title</p></th></tr>
                <tr><td><p>a</p><p>b</p></td><td><p></p></td></tr>
              </tbody>
            </table>"#;
        let tables = parse_tables(html).unwrap();
        assert_eq!(tables.len(), 1);
        let t = &tables[0];
        assert_eq!(t.col_widths, Some(vec![120, 92]));
        assert_eq!(t.rows[0].height, Some(40));
        assert_eq!(t.rows[0].cells[0].col_span, 2);
        assert!(t.rows[0].cells[0].header);
        assert_eq!(t.rows[1].cells[0].joined_text("|"), "a|b");
        assert_eq!(t.rows[1].cells[1].blocks, vec![Block::empty()]);
    }

    #[test]
    fn test_loose_text_and_entities() {
        let html = "<div><table><tr><td>  one&nbsp;two\n  three </td><td/></tr></table></div>";
        let tables = parse_tables(html).unwrap();
        let row = &tables[0].rows[0];
        assert_eq!(row.cells[0].blocks[0].text, "one\u{a0}two three");
        assert_eq!(row.cells[1].blocks, vec![Block::empty()]);
        assert_eq!(tables[0].col_widths, None);
    }

    #[test]
    fn test_multiple_tables() {
        let html = "<body><table><tr><td>1</td></tr></table><p>x</p>\
                    <table><tr><td>2</td><td>3</td></tr></table></body>";
        let tables = parse_tables(html).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[1].rows[0].cells.len(), 2);
    }

    #[test]
    fn test_oversized_spans_are_clamped() {
        let html = r#"<table><colgroup><col span="4294967295"/></colgroup>
            <tr><td colspan="99999">a</td></tr>
            <tr><td rowspan="4294967295">b</td></tr></table>"#;
        let t = &parse_tables(html).unwrap()[0];
        assert_eq!(t.rows[0].cells[0].col_span, MAX_COL_SPAN);
        assert_eq!(t.rows[1].cells[0].row_span, MAX_ROW_SPAN);
        assert_eq!(t.col_widths, None);
    }

    #[test]
    fn test_malformed_markup_is_error() {
        assert!(parse_tables("<table><tr><td>x</tr></table>").is_err());
        assert!(parse_tables("<table><tr><td>x</td></tr>").is_err());
    }
}

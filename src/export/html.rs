//! Generates XHTML markup for tables.
//!
//! Output is well-formed (void elements self-close), so it reads back
//! through [`crate::parser::html`].

use quick_xml::escape::escape;

use crate::types::{SerializedCell, SerializedTable};

/// Write one `<table>` element.
pub fn write_table(table: &SerializedTable) -> String {
    let mut out = String::with_capacity(256);
    out.push_str("<table>\n");

    // <colgroup>
    if let Some(widths) = table.col_widths.as_ref().filter(|w| !w.is_empty()) {
        out.push_str("<colgroup>");
        for width in widths {
            out.push_str(&format!("<col style=\"width: {width}px\"/>"));
        }
        out.push_str("</colgroup>\n");
    }

    for row in &table.rows {
        match row.height {
            Some(h) => out.push_str(&format!("<tr style=\"height: {h}px\">")),
            None => out.push_str("<tr>"),
        }
        for cell in &row.cells {
            write_cell(&mut out, cell);
        }
        out.push_str("</tr>\n");
    }

    out.push_str("</table>");
    out
}

/// Write several tables separated by newlines.
pub fn write_tables(tables: &[SerializedTable]) -> String {
    tables.iter().map(write_table).collect::<Vec<_>>().join("\n")
}

fn write_cell(out: &mut String, cell: &SerializedCell) {
    let tag = if cell.header { "th" } else { "td" };
    out.push('<');
    out.push_str(tag);
    if cell.col_span > 1 {
        out.push_str(&format!(" colspan=\"{}\"", cell.col_span));
    }
    if cell.row_span > 1 {
        out.push_str(&format!(" rowspan=\"{}\"", cell.row_span));
    }
    out.push('>');
    for block in &cell.blocks {
        out.push_str("<p>");
        // Line breaks inside a block survive as <br/>
        let mut lines = block.text.split('\n');
        if let Some(first) = lines.next() {
            out.push_str(&escape(first));
        }
        for line in lines {
            out.push_str("<br/>");
            out.push_str(&escape(line));
        }
        out.push_str("</p>");
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

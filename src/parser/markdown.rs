//! GitHub-flavoured Markdown pipe-table import.
//!
//! A table starts at a header line immediately followed by a delimiter line
//! (`| --- | :-: |`) with the same number of cells, and runs until the first
//! line that is blank or has no pipe. Body rows are padded or truncated to
//! the header width. `<br>` inside a cell separates blocks.

use crate::types::{Block, SerializedCell, SerializedRow, SerializedTable};

/// Parse every pipe table in `markdown`.
pub fn parse_tables(markdown: &str) -> Vec<SerializedTable> {
    let lines: Vec<&str> = markdown.lines().collect();
    let mut tables = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let header = lines.get(i).copied().map(split_row);
        let delimiter = lines.get(i + 1).copied().and_then(parse_delimiter);
        let (Some(Some(header)), Some(width)) = (header, delimiter) else {
            i += 1;
            continue;
        };
        if header.len() != width {
            i += 1;
            continue;
        }

        let mut rows = vec![make_row(&header, width, true)];
        i += 2;
        while let Some(cells) = lines.get(i).copied().and_then(split_row) {
            rows.push(make_row(&cells, width, false));
            i += 1;
        }
        tables.push(SerializedTable {
            col_widths: None,
            rows,
        });
    }
    log::debug!("parsed {} table(s) from markdown", tables.len());
    tables
}

fn make_row(cells: &[String], width: usize, header: bool) -> SerializedRow {
    let cells = (0..width)
        .map(|c| {
            let text = cells.get(c).map(String::as_str).unwrap_or("");
            SerializedCell {
                col_span: 1,
                row_span: 1,
                header,
                blocks: split_blocks(text),
            }
        })
        .collect();
    SerializedRow {
        height: None,
        cells,
    }
}

fn split_blocks(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut rest = text;
    loop {
        let lower = rest.to_ascii_lowercase();
        let next = ["<br>", "<br/>", "<br />"]
            .iter()
            .filter_map(|tag| lower.find(tag).map(|at| (at, tag.len())))
            .min();
        match next {
            Some((at, len)) => {
                blocks.push(Block::paragraph(rest.get(..at).unwrap_or("").trim()));
                rest = rest.get(at + len..).unwrap_or("");
            }
            None => {
                blocks.push(Block::paragraph(rest.trim()));
                return blocks;
            }
        }
    }
}

/// Split a table line into unescaped, trimmed cell texts. Returns `None` for
/// lines that cannot be table rows.
fn split_row(line: &str) -> Option<Vec<String>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || !trimmed.contains('|') {
        return None;
    }
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = match inner.strip_suffix('|') {
        Some(s) if !s.ends_with('\\') => s,
        _ => inner,
    };

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    cells.push(current.trim().to_string());
    Some(cells)
}

/// Number of columns declared by a delimiter line, if it is one.
fn parse_delimiter(line: &str) -> Option<usize> {
    let cells = split_row(line)?;
    let valid = cells.iter().all(|c| {
        let body = c.strip_prefix(':').unwrap_or(c);
        let body = body.strip_suffix(':').unwrap_or(body);
        !body.is_empty() && body.chars().all(|ch| ch == '-')
    });
    valid.then_some(cells.len())
}

//! Table export to HTML, Markdown and JSON.

pub mod html;
pub mod markdown;

use crate::error::Result;
use crate::parser::TableFormat;
use crate::types::SerializedTable;

/// Render `tables` in `format`.
pub fn render(tables: &[SerializedTable], format: TableFormat) -> Result<String> {
    match format {
        TableFormat::Html => Ok(html::write_tables(tables)),
        TableFormat::Markdown => markdown::write_tables(tables),
        TableFormat::Json => Ok(serde_json::to_string_pretty(tables)?),
    }
}

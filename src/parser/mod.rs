//! Table import from HTML, Markdown and JSON.

pub mod html;
pub mod markdown;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Result, TableError};
use crate::types::SerializedTable;

/// Interchange formats understood by the importers and exporters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TableFormat {
    #[default]
    Html,
    Markdown,
    Json,
}

impl TableFormat {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "html" | "htm" | "xhtml" => Some(TableFormat::Html),
            "md" | "markdown" => Some(TableFormat::Markdown),
            "json" => Some(TableFormat::Json),
            _ => None,
        }
    }
}

impl FromStr for TableFormat {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(TableFormat::Html),
            "markdown" | "md" => Ok(TableFormat::Markdown),
            "json" => Ok(TableFormat::Json),
            other => Err(TableError::Parse(format!("unknown format '{other}'"))),
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TableFormat::Html => "html",
            TableFormat::Markdown => "markdown",
            TableFormat::Json => "json",
        })
    }
}

/// Parse every table in `input`.
///
/// # Errors
/// Returns an error if HTML is not well-formed or JSON does not describe a
/// list of tables. Markdown never fails; text without tables yields no tables.
pub fn parse(input: &str, format: TableFormat) -> Result<Vec<SerializedTable>> {
    match format {
        TableFormat::Html => html::parse_tables(input),
        TableFormat::Markdown => Ok(markdown::parse_tables(input)),
        TableFormat::Json => Ok(serde_json::from_str(input)?),
    }
}

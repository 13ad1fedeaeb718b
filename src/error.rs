//! Structured error types for tablegrid.
//!
//! Benign races (a menu action firing after its cell was removed) surface as
//! [`TableError::Detached`] inside a transaction and are turned into a skipped
//! outcome by the engine. Everything else aborts the current transaction.

use crate::types::NodeKey;

/// All errors that can occur in table editing, import and export.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// The referenced node is no longer part of the document.
    #[error("Node {0} is detached from the document")]
    Detached(NodeKey),

    /// A structural assumption about the table tree does not hold.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// XML/XHTML parsing or writing error from quick-xml.
    #[error("XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed import input.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid engine configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TableError>;

impl TableError {
    /// Shorthand for building an [`TableError::InvariantViolation`].
    pub(crate) fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<TableError> for wasm_bindgen::JsValue {
    fn from(e: TableError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

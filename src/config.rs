//! Engine configuration.
//!
//! All fields have defaults, so an empty JSON object is a valid config.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};

/// Narrowest a column can be resized to, in pixels
pub const MIN_COLUMN_WIDTH: u32 = 92;

/// Shortest a row can be resized to, in pixels
pub const MIN_ROW_HEIGHT: u32 = 33;

/// Pixel width of the draggable band along a cell's right and bottom edges
pub const ZONE_WIDTH: f32 = 10.0;

/// Thickness of the guide line drawn while dragging
pub const GUIDE_THICKNESS: f32 = 3.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableConfig {
    pub min_column_width: u32,
    pub min_row_height: u32,
    /// Width given to every column of a table without explicit widths
    pub default_column_width: u32,
    pub zone_width: f32,
    pub guide_thickness: f32,
    pub guide_color: String,
    /// Vertical spacing between consecutive tables in the layout surface
    pub table_gap: f32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            min_column_width: MIN_COLUMN_WIDTH,
            min_row_height: MIN_ROW_HEIGHT,
            default_column_width: MIN_COLUMN_WIDTH,
            zone_width: ZONE_WIDTH,
            guide_thickness: GUIDE_THICKNESS,
            guide_color: "#adf".to_string(),
            table_gap: 16.0,
        }
    }
}

impl TableConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_column_width == 0 {
            return Err(TableError::Config("minColumnWidth must be positive".into()));
        }
        if self.min_row_height == 0 {
            return Err(TableError::Config("minRowHeight must be positive".into()));
        }
        if self.default_column_width < self.min_column_width {
            return Err(TableError::Config(format!(
                "defaultColumnWidth {} is below minColumnWidth {}",
                self.default_column_width, self.min_column_width
            )));
        }
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.zone_width) || !positive(self.guide_thickness) {
            return Err(TableError::Config(
                "zoneWidth and guideThickness must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = TableConfig::from_json("{}").unwrap();
        assert_eq!(config, TableConfig::default());
        assert_eq!(config.min_column_width, 92);
        assert_eq!(config.min_row_height, 33);
        assert_eq!(config.zone_width, 10.0);
    }

    #[test]
    fn test_partial_override() {
        let config = TableConfig::from_json(r#"{"minRowHeight": 20, "guideColor": "red"}"#).unwrap();
        assert_eq!(config.min_row_height, 20);
        assert_eq!(config.guide_color, "red");
        assert_eq!(config.min_column_width, MIN_COLUMN_WIDTH);
    }

    #[test]
    fn test_rejects_default_below_minimum() {
        let err = TableConfig::from_json(r#"{"defaultColumnWidth": 50}"#).unwrap_err();
        assert!(matches!(err, TableError::Config(_)));
    }

    #[test]
    fn test_rejects_zero_minimum() {
        assert!(TableConfig::from_json(r#"{"minRowHeight": 0}"#).is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = TableConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, TableError::Json(_)));
    }
}

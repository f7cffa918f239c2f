use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%Y";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read mapping file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid mapping file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Source header name for each canonical field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub details: String,
    pub posting_date: String,
    pub description: String,
    pub amount: String,
    pub transaction_type: String,
    pub balance: String,
    pub check_number: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        ColumnMapping {
            details: "Details".to_string(),
            posting_date: "Posting Date".to_string(),
            description: "Description".to_string(),
            amount: "Amount".to_string(),
            transaction_type: "Type".to_string(),
            balance: "Balance".to_string(),
            check_number: "Check or Slip #".to_string(),
        }
    }
}

/// How one bank export maps onto canonical transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementMapping {
    pub columns: ColumnMapping,
    /// Tried before the permissive fallbacks.
    pub date_format: String,
}

impl Default for StatementMapping {
    fn default() -> Self {
        StatementMapping {
            columns: ColumnMapping::default(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl StatementMapping {
    pub fn load(path: impl AsRef<Path>) -> Result<StatementMapping, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_partial_mapping_keeps_defaults() -> Result<()> {
        let mapping: StatementMapping = serde_json::from_str(r#"{"columns": {"posting_date": "Post Date"}}"#)?;

        assert_eq!(mapping.columns.posting_date, "Post Date");
        assert_eq!(mapping.columns.details, "Details");
        assert_eq!(mapping.date_format, DEFAULT_DATE_FORMAT);

        Ok(())
    }

    #[test]
    fn test_load_from_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("mapping.json");
        fs::write(&path, r#"{"date_format": "%Y-%m-%d", "columns": {"balance": "Running Bal."}}"#)?;

        let mapping = StatementMapping::load(&path)?;

        assert_eq!(mapping.date_format, "%Y-%m-%d");
        assert_eq!(mapping.columns.balance, "Running Bal.");

        Ok(())
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapping.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(StatementMapping::load(&path), Err(ConfigError::Json(_))));
    }
}

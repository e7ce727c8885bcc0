//! Parsed CSV table and column mapping

use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};

/// A delimited text file split into a header row and data rows
///
/// Produced by [`crate::parse::tokenize`]. Rows are kept exactly as the
/// tokenizer emitted them; short rows are padded with empty strings at
/// lookup time rather than being rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ParsedTable {
    /// Index of a header, if present
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Cell value by row and column index; out-of-range cells read as empty
    pub fn cell<'a>(&self, row: &'a [String], idx: Option<usize>) -> &'a str {
        idx.and_then(|i| row.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Which CSV column feeds which transaction field
///
/// Seeded by header heuristics ([`crate::parse::infer_mapping`]) and
/// editable by the caller before commit. Every present value must name an
/// existing header.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMapping {
    #[serde(default)]
    pub date_column: Option<String>,
    #[serde(default)]
    pub amount_column: Option<String>,
    #[serde(default)]
    pub currency_code_column: Option<String>,
    #[serde(default)]
    pub type_column: Option<String>,
    #[serde(default)]
    pub category_column: Option<String>,
    #[serde(default)]
    pub comment_column: Option<String>,
}

impl ColumnMapping {
    /// Check that every mapped column names an existing header
    pub fn validate(&self, headers: &[String]) -> Result<()> {
        let fields = [
            ("date", &self.date_column),
            ("amount", &self.amount_column),
            ("currency", &self.currency_code_column),
            ("type", &self.type_column),
            ("category", &self.category_column),
            ("comment", &self.comment_column),
        ];
        for (name, col) in fields {
            if let Some(col) = col {
                if !headers.iter().any(|h| h == col) {
                    return Err(Error::validation(format!(
                        "{} column '{}' not found in headers",
                        name, col
                    )));
                }
            }
        }
        Ok(())
    }

    /// Resolved column indices against a table, for hot row loops
    pub fn indices(&self, table: &ParsedTable) -> MappedIndices {
        let idx = |col: &Option<String>| col.as_deref().and_then(|c| table.column_index(c));
        MappedIndices {
            date: idx(&self.date_column),
            amount: idx(&self.amount_column),
            currency: idx(&self.currency_code_column),
            kind: idx(&self.type_column),
            category: idx(&self.category_column),
            comment: idx(&self.comment_column),
        }
    }
}

/// Column indices resolved once per table
#[derive(Debug, Clone, Copy)]
pub struct MappedIndices {
    pub date: Option<usize>,
    pub amount: Option<usize>,
    pub currency: Option<usize>,
    pub kind: Option<usize>,
    pub category: Option<usize>,
    pub comment: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ParsedTable {
        ParsedTable {
            headers: vec!["date".to_string(), "amount".to_string()],
            rows: vec![vec!["2024-01-02".to_string()]],
        }
    }

    #[test]
    fn test_short_row_reads_empty() {
        let t = table();
        let amount_idx = t.column_index("amount");
        assert_eq!(t.cell(&t.rows[0], amount_idx), "");
        assert_eq!(t.cell(&t.rows[0], t.column_index("date")), "2024-01-02");
    }

    #[test]
    fn test_mapping_validation() {
        let t = table();
        let mapping = ColumnMapping {
            date_column: Some("date".to_string()),
            ..Default::default()
        };
        assert!(mapping.validate(&t.headers).is_ok());

        let bad = ColumnMapping {
            amount_column: Some("sum".to_string()),
            ..Default::default()
        };
        assert!(bad.validate(&t.headers).is_err());
    }
}

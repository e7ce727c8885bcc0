//! Column-mapping inference from header names
//!
//! Candidate lists cover the header spellings seen in real exports fed to
//! the app, English and Russian alike. Matching is exact on the trimmed,
//! lower-cased header; candidate order decides between multiple hits. The
//! proposal is only a seed, the caller can override any field before
//! commit.

use crate::domain::ColumnMapping;

const DATE_NAMES: [&str; 6] = ["date", "дата", "occurred", "occurred_at", "posted", "дата операции"];
const AMOUNT_NAMES: [&str; 5] = ["amount", "сумма", "value", "debit", "credit"];
const CURRENCY_NAMES: [&str; 3] = ["currency", "валюта", "currency_code"];
const TYPE_NAMES: [&str; 4] = ["type", "тип", "direction", "income_expense"];
const CATEGORY_NAMES: [&str; 4] = ["category", "категория", "cat", "category_name"];
const COMMENT_NAMES: [&str; 5] = ["comment", "комментарий", "description", "memo", "note"];

/// Propose a column mapping for the given headers
pub fn infer_mapping(headers: &[String]) -> ColumnMapping {
    let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
    let map_by = |candidates: &[&str]| -> Option<String> {
        for cand in candidates {
            if let Some(idx) = lowered.iter().position(|h| h == cand) {
                return Some(headers[idx].clone());
            }
        }
        None
    };

    ColumnMapping {
        date_column: map_by(&DATE_NAMES),
        amount_column: map_by(&AMOUNT_NAMES),
        currency_code_column: map_by(&CURRENCY_NAMES),
        type_column: map_by(&TYPE_NAMES),
        category_column: map_by(&CATEGORY_NAMES),
        comment_column: map_by(&COMMENT_NAMES),
    }
}

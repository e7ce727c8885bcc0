//! Import service - CSV transaction import against the remote backend
//!
//! Orchestrates the whole wizard flow: tokenize, infer a mapping, reconcile
//! categories, preview row validity, then commit one transaction-create
//! call per valid row. The commit loop is strictly sequential; every
//! collaborator call is awaited before the next so the progress counter
//! stays meaningful and the backend never sees concurrent writes from one
//! import run.
//!
//! There is no rollback: a failure partway through leaves already-created
//! categories and transactions applied. That is an accepted limitation of
//! the design, surfaced to the caller as the propagated backend error.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::result::Result;
use crate::domain::{
    CategoryKind, CategoryRecord, ColumnMapping, Money, ParsedTable, PreparedTransaction,
};
use crate::parse::{
    detect_delimiter, infer_mapping, infer_type, parse_amount_minor_units, parse_date_seconds,
    tokenize,
};
use crate::ports::{CategoryClient, NewCategory, TenantClient, TransactionClient};
use crate::services::reconcile::{reconcile, CategoryResolver, Reconciliation};

/// Rows shown in the preview sample
const PREVIEW_SAMPLE_SIZE: usize = 10;

/// Currency used when neither the file nor the tenant supplies one
const FALLBACK_CURRENCY: &str = "RUB";

/// Process-local state for one run of the import wizard
///
/// Created when the wizard opens, discarded when it closes or completes.
/// Never persisted.
#[derive(Debug, Clone)]
pub struct ImportSession {
    pub table: ParsedTable,
    pub mapping: ColumnMapping,
    pub auto_create_missing_categories: bool,
    /// Manually resolved name -> category id, keyed by raw or normalized
    /// name; takes priority over any automatic match
    pub manual_category_map: HashMap<String, String>,
    pub default_currency: String,
    /// Locale used for translations of auto-created categories
    pub locale: String,
}

impl ImportSession {
    /// Open a session over raw file text
    ///
    /// Auto-detects the delimiter from the first line and seeds the column
    /// mapping from header heuristics; both are caller-editable afterwards
    /// via [`reparse`](Self::reparse) and the public fields.
    pub fn from_text(text: &str, quote: char, default_currency: &str, locale: &str) -> Self {
        let first_line = text.lines().next().unwrap_or("");
        let delimiter = detect_delimiter(first_line);
        let table = tokenize(text, delimiter, quote);
        let mapping = infer_mapping(&table.headers);
        Self {
            table,
            mapping,
            auto_create_missing_categories: false,
            manual_category_map: HashMap::new(),
            default_currency: default_currency.to_string(),
            locale: locale.to_string(),
        }
    }

    /// Re-tokenize with an explicit delimiter/quote, replacing the table
    /// wholesale and re-seeding the mapping
    pub fn reparse(&mut self, text: &str, delimiter: char, quote: char) {
        self.table = tokenize(text, delimiter, quote);
        self.mapping = infer_mapping(&self.table.headers);
    }

    /// Row-level validity counts and a bounded sample for user review
    pub fn preview(&self) -> ImportPreview {
        let idx = self.mapping.indices(&self.table);
        let mut valid = 0usize;
        let mut invalid = 0usize;
        let mut sample = Vec::new();

        for row in &self.table.rows {
            let raw_amount = self.table.cell(row, idx.amount);
            let amount = parse_amount_minor_units(raw_amount);
            let raw_type = idx.kind.map(|_| self.table.cell(row, idx.kind));
            let kind = infer_type(raw_type, amount);
            let raw_date = self.table.cell(row, idx.date);
            let seconds = parse_date_seconds(raw_date);

            let ok = seconds.is_some() && amount.is_some() && kind.is_some();
            if ok {
                valid += 1;
            } else {
                invalid += 1;
            }

            if sample.len() < PREVIEW_SAMPLE_SIZE {
                let currency = match self.table.cell(row, idx.currency) {
                    "" => self.default_currency.clone(),
                    c => c.to_string(),
                };
                sample.push(RowPreview {
                    date: raw_date.to_string(),
                    amount: raw_amount.to_string(),
                    currency,
                    transaction_type: raw_type.unwrap_or("").to_string(),
                    category: self.table.cell(row, idx.category).to_string(),
                    comment: self.table.cell(row, idx.comment).to_string(),
                    ok,
                });
            }
        }

        ImportPreview {
            total: self.table.rows.len(),
            valid,
            invalid,
            sample,
        }
    }

    /// Normalize one row into a transaction, without a category id
    ///
    /// Returns `None` when date, amount, or type fail to parse; such rows
    /// are excluded from commit, never submitted partially.
    fn prepare_row(&self, row: &[String]) -> Option<PreparedTransaction> {
        let idx = self.mapping.indices(&self.table);
        let amount = parse_amount_minor_units(self.table.cell(row, idx.amount))?;
        let occurred_at = parse_date_seconds(self.table.cell(row, idx.date))?;
        let raw_type = idx.kind.map(|_| self.table.cell(row, idx.kind));
        let transaction_type = infer_type(raw_type, Some(amount))?;

        let currency_code = match self.table.cell(row, idx.currency) {
            "" => self.default_currency.clone(),
            c => c.to_string(),
        };
        Some(PreparedTransaction {
            transaction_type,
            amount: Money {
                currency_code,
                minor_units: amount.abs(),
            },
            occurred_at,
            category_id: None,
            comment: self.table.cell(row, idx.comment).to_string(),
        })
    }
}

/// Commit progress, surfaced through a caller-supplied callback so a CLI,
/// a UI, or a test harness can all drive the same loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportProgress {
    Preparing,
    CreatingCategory { name: String },
    Inserting { current: usize, total: usize },
}

impl fmt::Display for ImportProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preparing => write!(f, "preparing"),
            Self::CreatingCategory { name } => write!(f, "creating category {}", name),
            Self::Inserting { current, total } => write!(f, "inserting {} / {}", current, total),
        }
    }
}

/// Preview of row validity before commit
#[derive(Debug, Clone, Serialize)]
pub struct ImportPreview {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    /// First rows of the file with raw per-field values
    pub sample: Vec<RowPreview>,
}

/// One sampled row with raw values and a validity flag
#[derive(Debug, Clone, Serialize)]
pub struct RowPreview {
    pub date: String,
    pub amount: String,
    pub currency: String,
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub category: String,
    pub comment: String,
    pub ok: bool,
}

/// Result of a committed import
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    /// Transactions actually created
    pub inserted: usize,
    /// Data rows in the file, valid or not
    pub total_rows: usize,
    /// Categories created before the transaction loop
    pub categories_created: usize,
}

/// Import service for CSV imports
pub struct ImportService {
    categories: Arc<dyn CategoryClient>,
    transactions: Arc<dyn TransactionClient>,
    tenants: Arc<dyn TenantClient>,
}

impl ImportService {
    pub fn new(
        categories: Arc<dyn CategoryClient>,
        transactions: Arc<dyn TransactionClient>,
        tenants: Arc<dyn TenantClient>,
    ) -> Self {
        Self {
            categories,
            transactions,
            tenants,
        }
    }

    /// Default currency for the session: the active tenant's, else the
    /// first membership's, else `RUB`
    pub async fn default_currency(&self, active_tenant_id: Option<&str>) -> Result<String> {
        let memberships = self.tenants.list_my_tenants().await?;
        let active = active_tenant_id
            .and_then(|id| memberships.iter().find(|m| m.tenant.id == id))
            .or_else(|| memberships.first());
        Ok(active
            .and_then(|m| m.tenant.default_currency_code.clone())
            .unwrap_or_else(|| FALLBACK_CURRENCY.to_string()))
    }

    /// List categories of one kind straight from the backend
    pub async fn list_categories(
        &self,
        kind: CategoryKind,
        include_inactive: bool,
    ) -> Result<Vec<CategoryRecord>> {
        self.categories.list_categories(kind, include_inactive).await
    }

    /// Active categories of both kinds, concatenated
    pub async fn load_categories(&self) -> Result<Vec<CategoryRecord>> {
        let mut all = self
            .categories
            .list_categories(CategoryKind::Income, false)
            .await?;
        all.extend(
            self.categories
                .list_categories(CategoryKind::Expense, false)
                .await?,
        );
        Ok(all)
    }

    /// Match the file's category names against the taxonomy
    pub fn reconcile_categories(
        &self,
        session: &ImportSession,
        categories: &[CategoryRecord],
    ) -> Reconciliation {
        reconcile(&session.table, &session.mapping, categories)
    }

    /// Create one category during manual mapping ("quick create")
    pub async fn quick_create_category(
        &self,
        name: &str,
        kind: CategoryKind,
        locale: &str,
    ) -> Result<CategoryRecord> {
        self.categories
            .create_category(&NewCategory::from_raw_name(name, kind, locale))
            .await
    }

    /// Commit the session: create missing categories first if opted in,
    /// then one transaction per valid row, in file order
    ///
    /// Invalid rows are skipped without being counted as inserted. Any
    /// backend rejection propagates immediately and aborts the remaining
    /// loop; nothing already applied is undone.
    pub async fn commit(
        &self,
        session: &ImportSession,
        categories: &[CategoryRecord],
        mut progress: impl FnMut(&ImportProgress),
    ) -> Result<ImportOutcome> {
        progress(&ImportProgress::Preparing);

        let reconciliation = self.reconcile_categories(session, categories);
        let mut resolver =
            CategoryResolver::new(reconciliation.matched, &session.manual_category_map);

        let mut categories_created = 0usize;
        if session.auto_create_missing_categories {
            for missing in &reconciliation.missing {
                progress(&ImportProgress::CreatingCategory {
                    name: missing.name.clone(),
                });
                let created = self
                    .categories
                    .create_category(&NewCategory::from_raw_name(
                        &missing.name,
                        missing.inferred_kind,
                        &session.locale,
                    ))
                    .await?;
                resolver.add_created(&missing.name, created.id);
                categories_created += 1;
            }
        }

        let idx = session.mapping.indices(&session.table);
        let total = session.table.rows.len();
        let mut inserted = 0usize;

        for (i, row) in session.table.rows.iter().enumerate() {
            let Some(mut tx) = session.prepare_row(row) else {
                continue;
            };
            tx.category_id = resolver.resolve(session.table.cell(row, idx.category).trim());

            progress(&ImportProgress::Inserting {
                current: i + 1,
                total,
            });
            self.transactions.create_transaction(&tx).await?;
            inserted += 1;
        }

        Ok(ImportOutcome {
            inserted,
            total_rows: total,
            categories_created,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(text: &str) -> ImportSession {
        ImportSession::from_text(text, '"', "RUB", "ru")
    }

    #[test]
    fn test_session_detects_delimiter_and_mapping() {
        let s = session("date;amount;category\n2024-01-02;-100;Food\n");
        assert_eq!(s.table.headers, vec!["date", "amount", "category"]);
        assert_eq!(s.mapping.date_column.as_deref(), Some("date"));
        assert_eq!(s.mapping.amount_column.as_deref(), Some("amount"));
        assert_eq!(s.mapping.category_column.as_deref(), Some("category"));
    }

    #[test]
    fn test_preview_counts_and_sample_flags() {
        let s = session("date,amount\n2024-01-02,-100\nnot a date,-100\n2024-01-03,abc\n");
        let p = s.preview();
        assert_eq!(p.total, 3);
        assert_eq!(p.valid, 1);
        assert_eq!(p.invalid, 2);
        assert!(p.sample[0].ok);
        assert!(!p.sample[1].ok);
        assert!(!p.sample[2].ok);
    }

    #[test]
    fn test_preview_sample_is_bounded() {
        let mut text = "date,amount\n".to_string();
        for i in 0..25 {
            text.push_str(&format!("2024-01-{:02},-10\n", (i % 28) + 1));
        }
        let p = session(&text).preview();
        assert_eq!(p.total, 25);
        assert_eq!(p.sample.len(), 10);
    }

    #[test]
    fn test_prepare_row_requires_all_three_fields() {
        let s = session("date,amount\n2024-01-02,-100\n2024-01-02,0\n,\n");
        assert!(s.prepare_row(&s.table.rows[0]).is_some());
        // Zero amount gives no type
        assert!(s.prepare_row(&s.table.rows[1]).is_none());
        assert!(s.prepare_row(&s.table.rows[2]).is_none());
    }

    #[test]
    fn test_prepare_row_absolute_amount_and_default_currency() {
        let s = session("date,amount,comment\n2024-01-02,-1200.50,Lunch\n");
        let tx = s.prepare_row(&s.table.rows[0]).unwrap();
        assert_eq!(tx.transaction_type, crate::domain::TransactionType::Expense);
        assert_eq!(tx.amount.minor_units, 120_050);
        assert_eq!(tx.amount.currency_code, "RUB");
        assert_eq!(tx.comment, "Lunch");
        assert!(tx.category_id.is_none());
    }

    #[test]
    fn test_progress_messages() {
        let msg = ImportProgress::Inserting {
            current: 3,
            total: 12,
        };
        assert_eq!(msg.to_string(), "inserting 3 / 12");
        let msg = ImportProgress::CreatingCategory {
            name: "Taxi".to_string(),
        };
        assert_eq!(msg.to_string(), "creating category Taxi");
    }
}
